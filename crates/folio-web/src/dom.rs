#![forbid(unsafe_code)]

//! [`Dom`] backed by the live document.
//!
//! Element handles are `web_sys::Element`, which compare by JS identity.
//! DOM calls that can throw are logged at `warn` and otherwise ignored.

use folio_core::{Dom, FocusOptions, Selector};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

/// The browser document as a [`Dom`].
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Dom for WebDom {
    type Node = Element;

    fn query_all(&self, scope: Option<&Element>, selector: &Selector) -> Vec<Element> {
        let css = selector.to_string();
        let result = match scope {
            Some(scope) => scope.query_selector_all(&css),
            None => self.document.query_selector_all(&css),
        };
        match result {
            Ok(list) => elements(&list),
            Err(err) => {
                warn!(selector = %css, error = ?err, "querySelectorAll failed");
                Vec::new()
            }
        }
    }

    fn query(&self, scope: Option<&Element>, selector: &Selector) -> Option<Element> {
        let css = selector.to_string();
        let result = match scope {
            Some(scope) => scope.query_selector(&css),
            None => self.document.query_selector(&css),
        };
        result.unwrap_or_else(|err| {
            warn!(selector = %css, error = ?err, "querySelector failed");
            None
        })
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            warn!(attribute = name, error = ?err, "setAttribute failed");
        }
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            warn!(class, error = ?err, "classList.add failed");
        }
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            warn!(class, error = ?err, "classList.remove failed");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&mut self, node: &Element, options: FocusOptions) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let js_options = web_sys::FocusOptions::new();
        js_options.set_prevent_scroll(options.prevent_scroll);
        if let Err(err) = element.focus_with_options(&js_options) {
            warn!(error = ?err, "focus failed");
        }
    }
}

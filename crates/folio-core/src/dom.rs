#![forbid(unsafe_code)]

//! DOM capability interface.
//!
//! The behaviors never hold a document; they receive a `&mut impl Dom` per
//! operation and keep only node handles. A handle is whatever the backend
//! uses to name an element (`web_sys::Element` in the browser, an arena index
//! in the in-memory fake). Handles compare by identity.
//!
//! # Failure Modes
//!
//! Every operation is infallible from the caller's point of view. Backends
//! that can fail (the browser rejecting an attribute name, say) log and carry
//! on; the page behaviors are presentation sugar and must never take the page
//! down.

use std::fmt;

use crate::selector::Selector;

/// Options for [`Dom::focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusOptions {
    /// Do not scroll the element into view when it receives focus.
    pub prevent_scroll: bool,
}

impl FocusOptions {
    /// Focus without forcing a scroll jump.
    #[must_use]
    pub const fn without_scroll() -> Self {
        Self {
            prevent_scroll: true,
        }
    }
}

/// Minimal element capability surface needed by the page behaviors.
pub trait Dom {
    /// Identity handle for an element.
    type Node: Clone + PartialEq + fmt::Debug;

    /// All elements matching `selector` in document order. With a `scope`,
    /// only descendants of that element are returned (the scope itself is
    /// excluded, as with `Element.querySelectorAll`).
    fn query_all(&self, scope: Option<&Self::Node>, selector: &Selector) -> Vec<Self::Node>;

    /// First element matching `selector`, in document order.
    fn query(&self, scope: Option<&Self::Node>, selector: &Selector) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Attribute value, if present.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set (or overwrite) an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Add a presentation class. Adding a class twice is a no-op.
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Remove a presentation class. Removing an absent class is a no-op.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Whether `node` carries `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// The element that currently has keyboard focus, if any.
    fn active_element(&self) -> Option<Self::Node>;

    /// Request keyboard focus. Backends follow browser semantics: an element
    /// that is not focusable silently ignores the request.
    fn focus(&mut self, node: &Self::Node, options: FocusOptions);
}

#![forbid(unsafe_code)]

//! [`IntersectionWatcher`] backed by `IntersectionObserver`.

use folio_core::{IntersectionEntry, IntersectionWatcher, WatchOptions};
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type EntriesCallback = Closure<dyn FnMut(Array)>;

/// An `IntersectionObserver` plus the callback that feeds it.
///
/// The inert variant observes nothing; it exists so a watcher value can
/// always be produced once the real observer has been ruled out.
pub struct WebWatcher {
    observer: Option<IntersectionObserver>,
    _callback: Option<EntriesCallback>,
}

impl std::fmt::Debug for WebWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebWatcher")
            .field("live", &self.observer.is_some())
            .finish()
    }
}

/// Convert a raw observer batch into core entries, skipping anything that is
/// not an element entry.
#[must_use]
pub fn entries_from_js(batch: &Array) -> Vec<IntersectionEntry<Element>> {
    batch
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .map(|entry| IntersectionEntry {
            target: entry.target(),
            is_intersecting: entry.is_intersecting(),
            ratio: entry.intersection_ratio(),
        })
        .collect()
}

impl WebWatcher {
    /// Create an observer with `options` that hands every batch to
    /// `on_entries`.
    ///
    /// # Errors
    ///
    /// The exception thrown by the `IntersectionObserver` constructor.
    pub fn new<F>(options: WatchOptions, mut on_entries: F) -> Result<Self, JsValue>
    where
        F: FnMut(Vec<IntersectionEntry<Element>>) + 'static,
    {
        let callback: EntriesCallback = Closure::new(move |batch: Array| {
            on_entries(entries_from_js(&batch));
        });
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            observer: Some(observer),
            _callback: Some(callback),
        })
    }

    /// A watcher that ignores every registration.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            observer: None,
            _callback: None,
        }
    }

    /// Whether a real observer backs this watcher.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.observer.is_some()
    }
}

impl IntersectionWatcher<Element> for WebWatcher {
    fn observe(&mut self, node: &Element) {
        if let Some(observer) = &self.observer {
            observer.observe(node);
        }
    }

    fn unobserve(&mut self, node: &Element) {
        if let Some(observer) = &self.observer {
            observer.unobserve(node);
        }
    }
}

impl Drop for WebWatcher {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

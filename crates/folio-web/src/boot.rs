#![forbid(unsafe_code)]

//! Browser entry point.
//!
//! Mounts the page once the document is parsed and wires listeners:
//!
//! - one shared `click` handler on every interactive element, routed by
//!   `event.currentTarget`;
//! - one `keydown` handler on the document, attached only while the overlay
//!   is trapping focus and detached again on close;
//! - one `setTimeout` per deferred anchor focus.
//!
//! The mounted state lives in a thread-local for the lifetime of the page.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_core::{Capabilities, KeyEvent, PageConfig, RevealMode};
use folio_runtime::Page;
use folio_widgets::DeferredFocus;
use js_sys::Reflect;
use tracing::{debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, KeyboardEvent, Window};

use crate::dom::WebDom;
use crate::probe;
use crate::watcher::WebWatcher;

type Shared = Rc<RefCell<Option<App>>>;

struct App {
    dom: WebDom,
    page: Page<Element, WebWatcher>,
    _click: Closure<dyn FnMut(Event)>,
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
    keydown_attached: bool,
}

thread_local! {
    static MOUNTED: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

impl App {
    /// Attach or detach the document keydown listener to match the overlay.
    fn sync_key_listener(&mut self) {
        let wanted = self.page.is_intercepting_keys();
        if wanted == self.keydown_attached {
            return;
        }
        let document = self.dom.document();
        let listener = self.keydown.as_ref().unchecked_ref();
        let result = if wanted {
            document.add_event_listener_with_callback("keydown", listener)
        } else {
            document.remove_event_listener_with_callback("keydown", listener)
        };
        match result {
            Ok(()) => {
                self.keydown_attached = wanted;
                debug!(attached = wanted, "keydown listener updated");
            }
            Err(err) => warn!(error = ?err, "keydown listener update failed"),
        }
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Probe the host once.
fn probe_capabilities(window: &Window) -> Capabilities {
    let reduced_motion = match window.match_media(probe::REDUCED_MOTION_QUERY) {
        Ok(Some(list)) => Some(list.matches()),
        Ok(None) | Err(_) => None,
    };
    let intersection_observer =
        Reflect::has(window, &JsValue::from_str(probe::INTERSECTION_OBSERVER_GLOBAL))
            .unwrap_or(false);
    probe::capabilities(reduced_motion, intersection_observer)
}

fn inline_config(document: &Document) -> PageConfig {
    let text = document
        .get_element_by_id(probe::CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    probe::page_config_or_default(text.as_deref())
}

fn schedule_focus(window: &Window, dom: &WebDom, deferred: DeferredFocus<Element>) {
    let mut dom = dom.clone();
    let delay = probe::timeout_millis(deferred.delay);
    let callback = Closure::once_into_js(move || deferred.run(&mut dom));
    if let Err(err) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        warn!(error = ?err, "setTimeout failed");
    }
}

fn on_click(shared: &Weak<RefCell<Option<App>>>, event: &Event) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Some(target) = event
        .current_target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return;
    };
    let mut slot = shared.borrow_mut();
    let Some(app) = slot.as_mut() else {
        return;
    };
    let activation = app.page.activate(&mut app.dom, &target);
    if activation.transition.is_some() {
        app.sync_key_listener();
    }
    if let Some(deferred) = activation.deferred {
        match window() {
            Ok(window) => schedule_focus(&window, &app.dom, deferred),
            Err(err) => warn!(error = ?err, "cannot schedule focus"),
        }
    }
}

fn on_keydown(shared: &Weak<RefCell<Option<App>>>, event: &KeyboardEvent) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut slot = shared.borrow_mut();
    let Some(app) = slot.as_mut() else {
        return;
    };
    let key = KeyEvent::from_dom(
        &event.key(),
        event.shift_key(),
        event.ctrl_key(),
        event.alt_key(),
        event.meta_key(),
    );
    let result = app.page.key_down(&mut app.dom, &key);
    if result.outcome.prevent_default() {
        event.prevent_default();
    }
    if result.transition.is_some() {
        app.sync_key_listener();
    }
}

fn on_entries(
    shared: &Weak<RefCell<Option<App>>>,
    entries: &[folio_core::IntersectionEntry<Element>],
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut slot = shared.borrow_mut();
    if let Some(app) = slot.as_mut() {
        app.page.intersections(&mut app.dom, entries);
    }
}

/// Mount the page behaviors on the current document.
///
/// # Errors
///
/// Fails when there is no window or document, or the page cannot mount.
pub fn mount() -> Result<(), JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let shared: Shared = Rc::new(RefCell::new(None));
    let mut capabilities = probe_capabilities(&window);
    let config = inline_config(&document);

    let mut watcher = None;
    if capabilities.reveal_mode() == RevealMode::Animate {
        let weak = Rc::downgrade(&shared);
        match WebWatcher::new(config.reveal.watch_options(), move |entries| {
            on_entries(&weak, &entries);
        }) {
            Ok(live) => watcher = Some(live),
            Err(err) => {
                warn!(error = ?err, "IntersectionObserver unavailable");
                capabilities.intersection_observer = false;
            }
        }
    }

    let mut dom = WebDom::new(document);
    let page = Page::mount(&mut dom, &capabilities, &config, move |_| {
        watcher.unwrap_or_else(WebWatcher::inert)
    })
    .map_err(|err| {
        error!(error = %err, "folio failed to mount");
        JsValue::from_str(&err.to_string())
    })?;

    let weak = Rc::downgrade(&shared);
    let click = Closure::<dyn FnMut(Event)>::new(move |event: Event| on_click(&weak, &event));
    let weak = Rc::downgrade(&shared);
    let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        on_keydown(&weak, &event);
    });

    for node in page.interactive_nodes() {
        if let Err(err) =
            node.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
        {
            warn!(error = ?err, "click listener registration failed");
        }
    }

    *shared.borrow_mut() = Some(App {
        dom,
        page,
        _click: click,
        keydown,
        keydown_attached: false,
    });
    MOUNTED.with(|mounted| *mounted.borrow_mut() = Some(shared));
    Ok(())
}

/// wasm entry point: mount now, or on `DOMContentLoaded` while the document
/// is still loading.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console-log")]
    crate::logging::init(tracing_subscriber::filter::LevelFilter::INFO);

    let document = window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if !probe::defers_mount(&document.ready_state()) {
        return mount();
    }
    let on_ready = Closure::once_into_js(|| {
        if let Err(err) = mount() {
            error!(error = ?err, "folio failed to start");
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
}

/// Whether the navigation overlay is currently open. Exposed for page
/// scripts and end-to-end tests.
#[wasm_bindgen(js_name = navigationOpen)]
pub fn navigation_open() -> bool {
    MOUNTED.with(|mounted| {
        mounted.borrow().as_ref().is_some_and(|shared| {
            shared
                .try_borrow()
                .ok()
                .and_then(|slot| {
                    slot.as_ref()
                        .and_then(|app| app.page.overlay().map(|o| o.is_open()))
                })
                .unwrap_or(false)
        })
    })
}

/// Number of elements still waiting for their reveal.
#[wasm_bindgen(js_name = pendingReveals)]
pub fn pending_reveals() -> usize {
    MOUNTED.with(|mounted| {
        mounted
            .borrow()
            .as_ref()
            .and_then(|shared| {
                shared
                    .try_borrow()
                    .ok()
                    .and_then(|slot| slot.as_ref().map(|app| app.page.reveal().pending().len()))
            })
            .unwrap_or(0)
    })
}

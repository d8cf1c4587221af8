#![forbid(unsafe_code)]

//! Browser host for folio.
//!
//! On `wasm32` this crate provides the `web-sys` implementations of the core
//! traits ([`dom::WebDom`], [`watcher::WebWatcher`]) and the
//! `#[wasm_bindgen(start)]` entry point in [`boot`] that mounts the page and
//! wires its listeners. The [`probe`] helpers are target independent so they
//! can be tested natively.
//!
//! # Configuration
//!
//! The page may carry an inline JSON block overriding any part of
//! `PageConfig`:
//!
//! ```html
//! <script type="application/json" id="folio-config">
//!   { "anchors": { "focus_delay_ms": 450 } }
//! </script>
//! ```
//!
//! A malformed block is logged and the defaults are used.

pub mod probe;

#[cfg(target_arch = "wasm32")]
pub mod boot;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(all(target_arch = "wasm32", feature = "console-log"))]
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod watcher;

#[cfg(target_arch = "wasm32")]
pub use dom::WebDom;
#[cfg(target_arch = "wasm32")]
pub use watcher::WebWatcher;

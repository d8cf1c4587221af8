#![forbid(unsafe_code)]

//! Core vocabulary for folio: the DOM capability model, selectors, key events,
//! environment capabilities and page configuration.
//!
//! Nothing in this crate touches a real browser. The behavioral units in
//! `folio-widgets` are written against the [`dom::Dom`] and
//! [`observe::IntersectionWatcher`] traits; `folio-web` implements them with
//! `web-sys`, and the [`testing`] module (feature `test-helpers`) implements
//! them in memory.

pub mod a11y;
pub mod config;
pub mod dom;
pub mod env;
pub mod event;
pub mod observe;
pub mod selector;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::{AnchorConfig, ConfigError, OverlayConfig, PageConfig, RevealConfig};
pub use dom::{Dom, FocusOptions};
pub use env::{Capabilities, MotionPreference, RevealMode, StaticReason};
pub use event::{KeyCode, KeyEvent, Modifiers};
pub use observe::{IntersectionEntry, IntersectionWatcher, WatchOptions};
pub use selector::{Selector, SelectorError};

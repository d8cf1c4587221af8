#![forbid(unsafe_code)]

//! Navigation overlay: a modal-style panel with focus management.
//!
//! # Focus Management
//!
//! - **Auto-focus**: the first navigation link receives focus when the
//!   overlay opens (skipped when there are no links).
//! - **Focus trap**: while open, Tab on the last focusable element wraps to
//!   the first and Shift+Tab on the first wraps to the last.
//! - **Focus restore**: the element focused before opening gets focus back
//!   when the overlay closes, however it was closed.
//! - **Escape to close**: Escape closes the overlay regardless of which
//!   element inside it has focus.
//!
//! # Host Contract
//!
//! The controller never registers listeners. Hosts forward activations of the
//! [`NavOverlay::controls`] and forward global keydowns **only while**
//! [`NavOverlay::is_trapping`] is true; every [`OverlayTransition`] tells the
//! host when to attach or detach that keydown listener.
//!
//! # Example
//!
//! ```ignore
//! let mut nav = NavOverlay::mount(&mut dom, &config.overlay)?;
//!
//! // The toggle was clicked.
//! if let Some(OverlayTransition::Opened) = nav.activate(&mut dom, &toggle) {
//!     attach_keydown_listener();
//! }
//!
//! // A keydown arrived while trapping.
//! let outcome = nav.handle_key(&mut dom, &key);
//! if outcome.prevent_default() {
//!     event.prevent_default();
//! }
//! ```

mod controller;
mod focus_trap;

pub use controller::{
    CloseReason, KeyOutcome, MountError, NavOverlay, OverlayState, OverlayTransition,
};
pub use focus_trap::{FocusTrap, TabDirection};

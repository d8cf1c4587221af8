#![forbid(unsafe_code)]

//! Page behaviors for folio.
//!
//! Three independent units, each owning only the elements it resolved when it
//! was mounted:
//!
//! - [`overlay`]: the navigation overlay with focus trap and restoration,
//! - [`anchor`]: focus handoff after in-page anchor navigation,
//! - [`reveal`]: one-shot reveal-on-scroll presentation classes.
//!
//! All three are written against [`folio_core::Dom`]; none of them schedules
//! work or registers listeners by itself. They return what happened and the
//! host acts on it.

pub mod anchor;
pub mod overlay;
pub mod reveal;

pub use anchor::{AnchorFocus, DeferredFocus};
pub use overlay::{
    CloseReason, FocusTrap, KeyOutcome, MountError, NavOverlay, OverlayState, OverlayTransition,
    TabDirection,
};
pub use reveal::{RevealCoordinator, RevealOutcome};

#![forbid(unsafe_code)]

//! folio public facade.
//!
//! Re-exports the core vocabulary, the page behaviors and (with the default
//! `runtime` feature) the page dispatcher. The browser host lives in
//! `folio-web`; this crate stays target independent.
//!
//! ```
//! use folio::prelude::*;
//! use folio::core::testing::{ElementSpec, FakeDom};
//!
//! let mut dom = FakeDom::new();
//! let body = dom.append(None, ElementSpec::new("body"));
//! dom.append(Some(body), ElementSpec::new("section").id("projects"));
//! let link = dom.append(Some(body), ElementSpec::new("a").href("#projects"));
//!
//! let anchors = AnchorFocus::mount(&mut dom, &AnchorConfig::default());
//! let deferred = anchors.activate(&dom, &link).unwrap();
//! assert!(deferred.options.prevent_scroll);
//! ```

pub use folio_core as core;
pub use folio_widgets as widgets;

#[cfg(feature = "runtime")]
pub use folio_runtime as runtime;

pub use folio_core::{Capabilities, Dom, PageConfig, Selector};
pub use folio_widgets::{AnchorFocus, NavOverlay, RevealCoordinator};

#[cfg(feature = "runtime")]
pub use folio_runtime::{Page, PageError};

/// Everything a host needs to mount and drive a page.
pub mod prelude {
    pub use folio_core::{
        AnchorConfig, Capabilities, ConfigError, Dom, FocusOptions, IntersectionEntry,
        IntersectionWatcher, KeyCode, KeyEvent, MotionPreference, OverlayConfig, PageConfig,
        RevealConfig, RevealMode, Selector, SelectorError, WatchOptions,
    };
    pub use folio_widgets::{
        AnchorFocus, CloseReason, DeferredFocus, KeyOutcome, MountError, NavOverlay,
        OverlayTransition, RevealCoordinator, RevealOutcome,
    };

    #[cfg(feature = "runtime")]
    pub use folio_runtime::{Activation, KeyDown, Page, PageError, TimerQueue};
}

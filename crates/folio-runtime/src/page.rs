#![forbid(unsafe_code)]

//! Page bootstrap and event dispatch.
//!
//! [`Page`] mounts the three behaviors once the document is ready and routes
//! host events to them. It keeps no DOM of its own: every call receives the
//! host's [`Dom`].
//!
//! # Dispatch rules
//!
//! - Activation goes to the navigation overlay first, then to the anchor
//!   coordinator. A navigation link that is also an in-page anchor closes the
//!   overlay (restoring focus to the toggle) and then schedules the deferred
//!   section focus, which fires later and wins.
//! - Keydowns only reach the overlay while it is trapping; the host learns
//!   when to listen from [`Activation::transition`] and
//!   [`Page::key_down`]'s [`KeyDown::transition`].
//! - Intersection batches go to the reveal coordinator.
//!
//! # Failure Modes
//!
//! An invalid configuration fails the whole mount. A missing overlay element
//! only disables the overlay: the anchor and reveal behaviors are independent
//! and still mount.

use std::fmt;

use folio_core::{
    Capabilities, ConfigError, Dom, IntersectionEntry, IntersectionWatcher, KeyEvent, PageConfig,
    RevealMode, WatchOptions,
};
use folio_widgets::{
    AnchorFocus, DeferredFocus, KeyOutcome, MountError, NavOverlay, OverlayTransition,
    RevealCoordinator, RevealOutcome,
};
use tracing::{debug, info, warn};

/// Errors that prevent the page from mounting.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// The configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid page configuration: {err}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for PageError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// What an activation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation<N> {
    /// Overlay state change, if any.
    pub transition: Option<OverlayTransition>,
    /// Focus request the host must run after its delay.
    pub deferred: Option<DeferredFocus<N>>,
}

impl<N> Activation<N> {
    fn none() -> Self {
        Self {
            transition: None,
            deferred: None,
        }
    }

    /// Whether the activation was handled by any behavior.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.transition.is_some() || self.deferred.is_some()
    }
}

/// What a keydown changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDown {
    pub outcome: KeyOutcome,
    /// Set when the key closed the overlay.
    pub transition: Option<OverlayTransition>,
}

/// The mounted page behaviors.
#[derive(Debug)]
pub struct Page<N, W> {
    overlay: Option<NavOverlay<N>>,
    overlay_error: Option<MountError>,
    anchors: AnchorFocus<N>,
    reveal: RevealCoordinator<N, W>,
}

impl<N, W> Page<N, W>
where
    N: Clone + PartialEq + fmt::Debug,
    W: IntersectionWatcher<N>,
{
    /// Mount every behavior against `dom`.
    ///
    /// `make_watcher` is only called when reveal animations run.
    ///
    /// # Errors
    ///
    /// [`PageError::Config`] when `config` fails validation.
    pub fn mount<D, F>(
        dom: &mut D,
        capabilities: &Capabilities,
        config: &PageConfig,
        make_watcher: F,
    ) -> Result<Self, PageError>
    where
        D: Dom<Node = N>,
        F: FnOnce(WatchOptions) -> W,
    {
        config.validate()?;

        let (overlay, overlay_error) = match NavOverlay::mount(dom, &config.overlay) {
            Ok(overlay) => (Some(overlay), None),
            Err(err) => {
                warn!(error = %err, "navigation overlay disabled");
                (None, Some(err))
            }
        };
        let anchors = AnchorFocus::mount(dom, &config.anchors);
        let reveal = RevealCoordinator::start(dom, capabilities, &config.reveal, make_watcher);

        let reveal_mode = match reveal.mode() {
            RevealMode::Animate => "animate",
            RevealMode::Static(reason) => reason.as_str(),
        };
        info!(
            overlay = overlay.is_some(),
            nav_links = overlay.as_ref().map_or(0, |o| o.links().len()),
            anchor_links = anchors.links().len(),
            sections = anchors.section_count(),
            reveal_candidates = reveal.pending().len(),
            reveal_mode,
            "page mounted"
        );

        Ok(Self {
            overlay,
            overlay_error,
            anchors,
            reveal,
        })
    }

    /// Every element the host must listen to for activation, without
    /// duplicates, overlay controls first.
    #[must_use]
    pub fn interactive_nodes(&self) -> Vec<N> {
        let mut nodes: Vec<N> = Vec::new();
        let overlay_controls = self.overlay.iter().flat_map(|overlay| overlay.controls());
        for node in overlay_controls.chain(self.anchors.links()) {
            if !nodes.contains(node) {
                nodes.push(node.clone());
            }
        }
        nodes
    }

    /// Route an activation (click) of `node`.
    pub fn activate<D: Dom<Node = N>>(&mut self, dom: &mut D, node: &N) -> Activation<N> {
        let mut activation = Activation::none();
        if let Some(overlay) = self.overlay.as_mut() {
            activation.transition = overlay.activate(dom, node);
        }
        activation.deferred = self.anchors.activate(dom, node);

        if let Some(transition) = activation.transition {
            log_transition(transition);
        }
        if let Some(deferred) = &activation.deferred {
            debug!(
                target_node = ?deferred.target,
                delay_ms = deferred.delay.as_millis() as u64,
                "deferred focus scheduled"
            );
        }
        activation
    }

    /// Route a global keydown. Hosts only need to forward keys while
    /// [`is_intercepting_keys`](Self::is_intercepting_keys) is true.
    pub fn key_down<D: Dom<Node = N>>(&mut self, dom: &mut D, key: &KeyEvent) -> KeyDown {
        let Some(overlay) = self.overlay.as_mut() else {
            return KeyDown {
                outcome: KeyOutcome::Ignored,
                transition: None,
            };
        };
        let was_open = overlay.is_open();
        let outcome = overlay.handle_key(dom, key);
        let transition = (was_open && !overlay.is_open())
            .then_some(OverlayTransition::Closed(folio_widgets::CloseReason::Escape));
        if let Some(transition) = transition {
            log_transition(transition);
        }
        KeyDown {
            outcome,
            transition,
        }
    }

    /// Route a batch of intersection entries.
    pub fn intersections<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        entries: &[IntersectionEntry<N>],
    ) -> RevealOutcome {
        self.reveal.handle_entries(dom, entries)
    }

    /// Whether the global keydown listener should be attached.
    #[must_use]
    pub fn is_intercepting_keys(&self) -> bool {
        self.overlay.as_ref().is_some_and(NavOverlay::is_trapping)
    }

    /// The navigation overlay, when it mounted.
    #[must_use]
    pub fn overlay(&self) -> Option<&NavOverlay<N>> {
        self.overlay.as_ref()
    }

    /// Mutable access to the navigation overlay, for programmatic control.
    pub fn overlay_mut(&mut self) -> Option<&mut NavOverlay<N>> {
        self.overlay.as_mut()
    }

    /// Why the overlay did not mount.
    #[must_use]
    pub fn overlay_error(&self) -> Option<&MountError> {
        self.overlay_error.as_ref()
    }

    /// The anchor focus coordinator.
    #[must_use]
    pub fn anchors(&self) -> &AnchorFocus<N> {
        &self.anchors
    }

    /// The reveal coordinator.
    #[must_use]
    pub fn reveal(&self) -> &RevealCoordinator<N, W> {
        &self.reveal
    }
}

fn log_transition(transition: OverlayTransition) {
    match transition {
        OverlayTransition::Opened => debug!("overlay opened"),
        OverlayTransition::Closed(reason) => debug!(reason = reason.as_str(), "overlay closed"),
    }
}

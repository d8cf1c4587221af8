#![forbid(unsafe_code)]

//! Navigation overlay state machine.
//!
//! # Invariants
//!
//! - The overlay's `open` class, its `aria-hidden` attribute and the
//!   toggle's `aria-expanded` attribute always mirror [`OverlayState`].
//! - The restore target is recorded on `Closed → Open` and taken (cleared)
//!   on `Open → Closed`; it never survives a close.
//! - Key events are only acted on while open. A host that keeps forwarding
//!   keys after the close transition sees [`KeyOutcome::Ignored`].
//! - Opening an open overlay or closing a closed one is a no-op and reports
//!   no transition.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Toggle, overlay or close control missing at mount | [`MountError::MissingElement`] |
//! | No navigation links | Opens without moving focus |
//! | Nothing was focused before opening | Closes without restoring focus |
//! | No focusable elements inside the overlay | Tab is never redirected |

use std::fmt;

use folio_core::a11y::{ARIA_EXPANDED, ARIA_HIDDEN, write_aria_bool};
use folio_core::{Dom, FocusOptions, KeyCode, KeyEvent, OverlayConfig, Selector};

use super::focus_trap::{FocusTrap, TabDirection};

/// Errors from resolving the overlay's structural elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// A required element is not in the document.
    MissingElement {
        role: &'static str,
        selector: String,
    },
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement { role, selector } => {
                write!(f, "navigation {role} not found (looked for `{selector}`)")
            }
        }
    }
}

impl std::error::Error for MountError {}

fn missing(role: &'static str, selector: impl fmt::Display) -> MountError {
    MountError::MissingElement {
        role,
        selector: selector.to_string(),
    }
}

/// Overlay visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// What closed the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The toggle was activated while open.
    Toggle,
    /// The explicit close control was activated.
    CloseControl,
    /// A navigation link inside the overlay was activated.
    NavLink,
    /// Escape was pressed while open.
    Escape,
    /// The host closed it directly.
    Programmatic,
}

impl CloseReason {
    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::CloseControl => "close-control",
            Self::NavLink => "nav-link",
            Self::Escape => "escape",
            Self::Programmatic => "programmatic",
        }
    }
}

/// A state change the host must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    /// Now open: start intercepting keydowns.
    Opened,
    /// Now closed: stop intercepting keydowns.
    Closed(CloseReason),
}

/// Result of forwarding a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; the browser default proceeds.
    Ignored,
    /// Escape closed the overlay.
    Closed,
    /// Focus wrapped around the trap boundary.
    Wrapped,
}

impl KeyOutcome {
    /// Whether the host must suppress the browser's default action.
    #[must_use]
    pub const fn prevent_default(self) -> bool {
        matches!(self, Self::Wrapped)
    }
}

/// The navigation overlay controller.
#[derive(Debug, Clone)]
pub struct NavOverlay<N> {
    toggle: N,
    overlay: N,
    close: N,
    links: Vec<N>,
    focusable: Selector,
    open_class: String,
    state: OverlayState,
    restore_focus: Option<N>,
}

impl<N: Clone + PartialEq + fmt::Debug> NavOverlay<N> {
    /// Resolve the overlay's elements and normalize them to the closed state.
    ///
    /// # Errors
    ///
    /// [`MountError::MissingElement`] when the toggle, the overlay container
    /// or its close control is absent.
    pub fn mount<D: Dom<Node = N>>(
        dom: &mut D,
        config: &OverlayConfig,
    ) -> Result<Self, MountError> {
        let toggle = dom
            .query(None, &config.toggle)
            .ok_or_else(|| missing("toggle", &config.toggle))?;
        let overlay = dom
            .element_by_id(&config.overlay_id)
            .ok_or_else(|| missing("overlay", format_args!("#{}", config.overlay_id)))?;
        let close = dom
            .query(Some(&overlay), &config.close)
            .ok_or_else(|| missing("close control", &config.close))?;
        let links = dom.query_all(Some(&overlay), &config.links);

        let nav = Self {
            toggle,
            overlay,
            close,
            links,
            focusable: config.focusable.clone(),
            open_class: config.open_class.clone(),
            state: OverlayState::Closed,
            restore_focus: None,
        };
        nav.apply_state(dom);

        #[cfg(feature = "tracing")]
        tracing::debug!(links = nav.links.len(), "navigation overlay mounted");

        Ok(nav)
    }

    fn apply_state<D: Dom<Node = N>>(&self, dom: &mut D) {
        let open = self.is_open();
        if open {
            dom.add_class(&self.overlay, &self.open_class);
        } else {
            dom.remove_class(&self.overlay, &self.open_class);
        }
        write_aria_bool(dom, &self.overlay, ARIA_HIDDEN, !open);
        write_aria_bool(dom, &self.toggle, ARIA_EXPANDED, open);
    }

    /// Open the overlay.
    ///
    /// Records the focused element for restoration, marks the overlay open
    /// and moves focus to the first navigation link.
    pub fn open<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Option<OverlayTransition> {
        if self.is_open() {
            return None;
        }
        self.restore_focus = dom.active_element();
        self.state = OverlayState::Open;
        self.apply_state(dom);
        if let Some(first) = self.links.first() {
            dom.focus(first, FocusOptions::default());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(restore = ?self.restore_focus, "navigation overlay opened");

        Some(OverlayTransition::Opened)
    }

    /// Close the overlay and restore focus to the element recorded on open.
    pub fn close<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        reason: CloseReason,
    ) -> Option<OverlayTransition> {
        if !self.is_open() {
            return None;
        }
        self.state = OverlayState::Closed;
        self.apply_state(dom);
        if let Some(previous) = self.restore_focus.take() {
            dom.focus(&previous, FocusOptions::default());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(reason = reason.as_str(), "navigation overlay closed");

        Some(OverlayTransition::Closed(reason))
    }

    /// Flip between open and closed.
    pub fn toggle<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Option<OverlayTransition> {
        match self.state {
            OverlayState::Closed => self.open(dom),
            OverlayState::Open => self.close(dom, CloseReason::Toggle),
        }
    }

    /// Handle activation (click, Enter, Space) of `node`.
    ///
    /// Returns `None` when `node` is not one of the overlay's controls or the
    /// activation did not change state.
    pub fn activate<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        node: &N,
    ) -> Option<OverlayTransition> {
        if *node == self.toggle {
            self.toggle(dom)
        } else if *node == self.close {
            self.close(dom, CloseReason::CloseControl)
        } else if self.links.contains(node) {
            self.close(dom, CloseReason::NavLink)
        } else {
            None
        }
    }

    /// Handle a global keydown. Only meaningful while open.
    pub fn handle_key<D: Dom<Node = N>>(&mut self, dom: &mut D, key: &KeyEvent) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        if key.code == KeyCode::Escape {
            self.close(dom, CloseReason::Escape);
            return KeyOutcome::Closed;
        }
        let Some(direction) = TabDirection::of(key) else {
            return KeyOutcome::Ignored;
        };

        // Re-query every time: the overlay's content may change while open.
        let members = dom.query_all(Some(&self.overlay), &self.focusable);
        let active = dom.active_element();
        match FocusTrap::new(&members).wrap_target(active.as_ref(), direction) {
            Some(target) => {
                dom.focus(target, FocusOptions::default());
                KeyOutcome::Wrapped
            }
            None => KeyOutcome::Ignored,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Whether the overlay is open.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    /// Whether the host should be forwarding global keydowns.
    #[inline]
    #[must_use]
    pub fn is_trapping(&self) -> bool {
        self.is_open()
    }

    /// The element focus returns to on close, while open.
    #[must_use]
    pub fn restore_target(&self) -> Option<&N> {
        self.restore_focus.as_ref()
    }

    /// The toggle control.
    #[must_use]
    pub fn toggle_control(&self) -> &N {
        &self.toggle
    }

    /// The overlay container.
    #[must_use]
    pub fn container(&self) -> &N {
        &self.overlay
    }

    /// The explicit close control.
    #[must_use]
    pub fn close_control(&self) -> &N {
        &self.close
    }

    /// Navigation links inside the overlay.
    #[must_use]
    pub fn links(&self) -> &[N] {
        &self.links
    }

    /// Every element whose activation the controller handles, in the order
    /// the host should register listeners: toggle, close control, links.
    pub fn controls(&self) -> impl Iterator<Item = &N> {
        [&self.toggle, &self.close].into_iter().chain(self.links.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::a11y::read_aria_bool;
    use folio_core::testing::{ElementSpec, FakeDom, NodeId};

    struct Fixture {
        dom: FakeDom,
        toggle: NodeId,
        overlay: NodeId,
        close: NodeId,
        links: Vec<NodeId>,
        outside: NodeId,
    }

    fn fixture(link_count: usize) -> Fixture {
        let mut dom = FakeDom::new();
        let body = dom.append(None, ElementSpec::new("body"));
        let header = dom.append(Some(body), ElementSpec::new("header"));
        let toggle = dom.append(
            Some(header),
            ElementSpec::new("button")
                .class("nav-toggle")
                .attr("aria-expanded", "false"),
        );
        let overlay = dom.append(
            Some(body),
            ElementSpec::new("div")
                .id("nav-overlay")
                .attr("aria-hidden", "true"),
        );
        let close = dom.append(Some(overlay), ElementSpec::new("button").class("nav-close"));
        let list = dom.append(Some(overlay), ElementSpec::new("ul").class("nav-list"));
        let links = (0..link_count)
            .map(|i| {
                let li = dom.append(Some(list), ElementSpec::new("li"));
                dom.append(Some(li), ElementSpec::new("a").href(&format!("#s{i}")))
            })
            .collect();
        let outside = dom.append(Some(body), ElementSpec::new("a").href("#elsewhere"));
        Fixture {
            dom,
            toggle,
            overlay,
            close,
            links,
            outside,
        }
    }

    fn mounted(link_count: usize) -> (Fixture, NavOverlay<NodeId>) {
        let mut fx = fixture(link_count);
        let nav = NavOverlay::mount(&mut fx.dom, &OverlayConfig::default()).unwrap();
        (fx, nav)
    }

    fn assert_closed_markers(fx: &Fixture) {
        assert!(!fx.dom.has_class(&fx.overlay, "open"));
        assert!(read_aria_bool(&fx.dom, &fx.overlay, ARIA_HIDDEN));
        assert_eq!(
            fx.dom.attribute(&fx.overlay, ARIA_HIDDEN).as_deref(),
            Some("true")
        );
        assert_eq!(
            fx.dom.attribute(&fx.toggle, ARIA_EXPANDED).as_deref(),
            Some("false")
        );
    }

    #[test]
    fn mount_resolves_elements() {
        let (fx, nav) = mounted(3);
        assert_eq!(nav.toggle_control(), &fx.toggle);
        assert_eq!(nav.container(), &fx.overlay);
        assert_eq!(nav.close_control(), &fx.close);
        assert_eq!(nav.links(), fx.links.as_slice());
        assert_eq!(nav.state(), OverlayState::Closed);
        assert_closed_markers(&fx);
    }

    #[test]
    fn mount_reports_missing_overlay() {
        let mut dom = FakeDom::new();
        dom.append(None, ElementSpec::new("button").class("nav-toggle"));
        let err = NavOverlay::mount(&mut dom, &OverlayConfig::default()).unwrap_err();
        assert_eq!(
            err,
            MountError::MissingElement {
                role: "overlay",
                selector: "#nav-overlay".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "navigation overlay not found (looked for `#nav-overlay`)"
        );
    }

    #[test]
    fn mount_reports_missing_toggle_and_close() {
        let mut dom = FakeDom::new();
        dom.append(None, ElementSpec::new("div").id("nav-overlay"));
        assert!(matches!(
            NavOverlay::mount(&mut dom, &OverlayConfig::default()),
            Err(MountError::MissingElement { role: "toggle", .. })
        ));
        dom.append(None, ElementSpec::new("button").class("nav-toggle"));
        assert!(matches!(
            NavOverlay::mount(&mut dom, &OverlayConfig::default()),
            Err(MountError::MissingElement {
                role: "close control",
                ..
            })
        ));
    }

    #[test]
    fn close_control_outside_overlay_does_not_count() {
        let mut dom = FakeDom::new();
        dom.append(None, ElementSpec::new("button").class("nav-toggle"));
        dom.append(None, ElementSpec::new("button").class("nav-close"));
        dom.append(None, ElementSpec::new("div").id("nav-overlay"));
        assert!(NavOverlay::mount(&mut dom, &OverlayConfig::default()).is_err());
    }

    #[test]
    fn open_marks_state_and_focuses_first_link() {
        let (mut fx, mut nav) = mounted(3);
        fx.dom.focus(&fx.toggle, FocusOptions::default());

        assert_eq!(nav.open(&mut fx.dom), Some(OverlayTransition::Opened));
        assert!(nav.is_open());
        assert!(nav.is_trapping());
        assert!(fx.dom.has_class(&fx.overlay, "open"));
        assert_eq!(
            fx.dom.attribute(&fx.overlay, ARIA_HIDDEN).as_deref(),
            Some("false")
        );
        assert!(read_aria_bool(&fx.dom, &fx.toggle, ARIA_EXPANDED));
        assert_eq!(fx.dom.active_element(), Some(fx.links[0]));
        assert_eq!(nav.restore_target(), Some(&fx.toggle));
    }

    #[test]
    fn open_without_links_keeps_focus() {
        let (mut fx, mut nav) = mounted(0);
        fx.dom.focus(&fx.toggle, FocusOptions::default());
        assert_eq!(nav.open(&mut fx.dom), Some(OverlayTransition::Opened));
        assert_eq!(fx.dom.active_element(), Some(fx.toggle));
    }

    #[test]
    fn open_twice_is_noop() {
        let (mut fx, mut nav) = mounted(2);
        fx.dom.focus(&fx.toggle, FocusOptions::default());
        nav.open(&mut fx.dom);
        assert_eq!(nav.open(&mut fx.dom), None);
        assert_eq!(nav.restore_target(), Some(&fx.toggle));
    }

    #[test]
    fn close_restores_and_clears_focus_target() {
        let (mut fx, mut nav) = mounted(2);
        fx.dom.focus(&fx.outside, FocusOptions::default());
        nav.open(&mut fx.dom);

        assert_eq!(
            nav.close(&mut fx.dom, CloseReason::Programmatic),
            Some(OverlayTransition::Closed(CloseReason::Programmatic))
        );
        assert_eq!(fx.dom.active_element(), Some(fx.outside));
        assert_eq!(nav.restore_target(), None);
        assert_closed_markers(&fx);
        assert_eq!(nav.close(&mut fx.dom, CloseReason::Programmatic), None);
    }

    #[test]
    fn close_without_prior_focus_skips_restore() {
        let (mut fx, mut nav) = mounted(2);
        nav.open(&mut fx.dom);
        assert_eq!(fx.dom.active_element(), Some(fx.links[0]));
        nav.close(&mut fx.dom, CloseReason::CloseControl);
        assert_eq!(fx.dom.active_element(), Some(fx.links[0]));
        assert!(!nav.is_open());
    }

    #[test]
    fn activation_routes_by_control() {
        let (mut fx, mut nav) = mounted(2);
        let toggle = fx.toggle;
        let close = fx.close;
        let link = fx.links[1];

        assert_eq!(
            nav.activate(&mut fx.dom, &toggle),
            Some(OverlayTransition::Opened)
        );
        assert_eq!(
            nav.activate(&mut fx.dom, &toggle),
            Some(OverlayTransition::Closed(CloseReason::Toggle))
        );
        nav.activate(&mut fx.dom, &toggle);
        assert_eq!(
            nav.activate(&mut fx.dom, &close),
            Some(OverlayTransition::Closed(CloseReason::CloseControl))
        );
        nav.activate(&mut fx.dom, &toggle);
        assert_eq!(
            nav.activate(&mut fx.dom, &link),
            Some(OverlayTransition::Closed(CloseReason::NavLink))
        );
        let outside = fx.outside;
        assert_eq!(nav.activate(&mut fx.dom, &outside), None);
    }

    #[test]
    fn link_activation_while_closed_changes_nothing() {
        let (mut fx, mut nav) = mounted(2);
        let link = fx.links[0];
        assert_eq!(nav.activate(&mut fx.dom, &link), None);
        assert_closed_markers(&fx);
    }

    #[test]
    fn escape_closes_from_any_position() {
        for position in 0..3 {
            let (mut fx, mut nav) = mounted(3);
            fx.dom.focus(&fx.toggle, FocusOptions::default());
            nav.open(&mut fx.dom);
            fx.dom.focus(&fx.links[position], FocusOptions::default());

            assert_eq!(
                nav.handle_key(&mut fx.dom, &KeyEvent::escape()),
                KeyOutcome::Closed
            );
            assert!(!nav.is_open());
            assert_eq!(fx.dom.active_element(), Some(fx.toggle));
        }
    }

    #[test]
    fn tab_wraps_at_boundaries() {
        let (mut fx, mut nav) = mounted(2);
        nav.open(&mut fx.dom);
        // Focusable order inside the overlay: close, link0, link1.
        let last = fx.links[1];
        fx.dom.focus(&last, FocusOptions::default());
        let outcome = nav.handle_key(&mut fx.dom, &KeyEvent::tab());
        assert_eq!(outcome, KeyOutcome::Wrapped);
        assert!(outcome.prevent_default());
        assert_eq!(fx.dom.active_element(), Some(fx.close));

        let outcome = nav.handle_key(&mut fx.dom, &KeyEvent::back_tab());
        assert_eq!(outcome, KeyOutcome::Wrapped);
        assert_eq!(fx.dom.active_element(), Some(last));
    }

    #[test]
    fn tab_in_middle_is_left_to_browser() {
        let (mut fx, mut nav) = mounted(3);
        nav.open(&mut fx.dom);
        let outcome = nav.handle_key(&mut fx.dom, &KeyEvent::tab());
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(!outcome.prevent_default());
        assert_eq!(fx.dom.active_element(), Some(fx.links[0]));
    }

    #[test]
    fn keys_ignored_while_closed() {
        let (mut fx, mut nav) = mounted(2);
        assert_eq!(
            nav.handle_key(&mut fx.dom, &KeyEvent::escape()),
            KeyOutcome::Ignored
        );
        assert_eq!(nav.handle_key(&mut fx.dom, &KeyEvent::tab()), KeyOutcome::Ignored);
    }

    #[test]
    fn other_keys_ignored_while_open() {
        let (mut fx, mut nav) = mounted(2);
        nav.open(&mut fx.dom);
        let enter = KeyEvent::new(KeyCode::Enter);
        assert_eq!(nav.handle_key(&mut fx.dom, &enter), KeyOutcome::Ignored);
        assert!(nav.is_open());
    }

    #[test]
    fn controls_lists_toggle_close_then_links() {
        let (fx, nav) = mounted(2);
        let controls: Vec<NodeId> = nav.controls().copied().collect();
        assert_eq!(
            controls,
            vec![fx.toggle, fx.close, fx.links[0], fx.links[1]]
        );
    }

    #[test]
    fn custom_open_class_is_used() {
        let mut fx = fixture(1);
        let config = OverlayConfig {
            open_class: "is-open".into(),
            ..OverlayConfig::default()
        };
        let mut nav = NavOverlay::mount(&mut fx.dom, &config).unwrap();
        nav.open(&mut fx.dom);
        assert!(fx.dom.has_class(&fx.overlay, "is-open"));
        assert!(!fx.dom.has_class(&fx.overlay, "open"));
    }
}

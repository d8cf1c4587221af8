#![forbid(unsafe_code)]

//! Deterministic host simulation.
//!
//! [`PageDriver`] plays the browser's part around a mounted [`Page`]: it
//! dispatches clicks and keys, performs the default Tab action when the page
//! does not suppress it, runs deferred focus requests off a virtual clock,
//! delivers intersection batches and keeps the keydown listener attached
//! exactly while the page asks for it.
//!
//! Every host-visible step is appended to a trace that can be exported as
//! JSONL for failure triage.

use folio_core::testing::{FakeDom, NodeId, RecordingWatcher};
use folio_core::{Capabilities, Dom, IntersectionEntry, KeyCode, KeyEvent, PageConfig};
use folio_runtime::{Page, PageError, TimerQueue};
use folio_widgets::{DeferredFocus, OverlayTransition};
use serde_json::json;
use web_time::{Duration, Instant};

/// The page type the driver hosts.
pub type FakePage = Page<NodeId, RecordingWatcher<NodeId>>;

/// One host-visible step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Virtual time since mount.
    pub at_ms: u64,
    pub kind: &'static str,
    pub detail: String,
}

/// Simulated browser around a [`FakePage`].
#[derive(Debug)]
pub struct PageDriver {
    dom: FakeDom,
    page: FakePage,
    timers: TimerQueue<DeferredFocus<NodeId>>,
    origin: Instant,
    elapsed: Duration,
    keydown_attached: bool,
    attaches: usize,
    detaches: usize,
    trace: Vec<TraceEvent>,
}

impl PageDriver {
    /// Mount the page on `dom` with the default configuration and a modern
    /// host.
    ///
    /// # Errors
    ///
    /// Whatever [`Page::mount`] reports.
    pub fn mount(dom: FakeDom) -> Result<Self, PageError> {
        Self::mount_with(dom, Capabilities::full(), &PageConfig::default())
    }

    /// Mount with explicit capabilities and configuration.
    ///
    /// # Errors
    ///
    /// Whatever [`Page::mount`] reports.
    pub fn mount_with(
        mut dom: FakeDom,
        capabilities: Capabilities,
        config: &PageConfig,
    ) -> Result<Self, PageError> {
        let page = Page::mount(&mut dom, &capabilities, config, RecordingWatcher::new)?;
        let mut driver = Self {
            dom,
            page,
            timers: TimerQueue::new(),
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            keydown_attached: false,
            attaches: 0,
            detaches: 0,
            trace: Vec::new(),
        };
        driver.record("mount", format!("{:?}", driver.page.reveal().mode()));
        Ok(driver)
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn record(&mut self, kind: &'static str, detail: String) {
        tracing::trace!(kind, detail = %detail, "host step");
        self.trace.push(TraceEvent {
            at_ms: self.elapsed.as_millis() as u64,
            kind,
            detail,
        });
    }

    fn sync_key_listener(&mut self) {
        let wanted = self.page.is_intercepting_keys();
        if wanted == self.keydown_attached {
            return;
        }
        self.keydown_attached = wanted;
        if wanted {
            self.attaches += 1;
            self.record("keydown-attach", String::new());
        } else {
            self.detaches += 1;
            self.record("keydown-detach", String::new());
        }
    }

    fn note_transition(&mut self, transition: Option<OverlayTransition>) {
        if let Some(transition) = transition {
            self.record("transition", format!("{transition:?}"));
            self.sync_key_listener();
        }
    }

    /// Dispatch a click on `node`.
    ///
    /// Only elements the page registered a listener on react, as in the
    /// browser. The click does not move focus (keyboard activation of the
    /// focused element behaves the same way).
    pub fn click(&mut self, node: NodeId) {
        self.record("click", format!("{node:?}"));
        if !self.page.interactive_nodes().contains(&node) {
            return;
        }
        let activation = self.page.activate(&mut self.dom, &node);
        self.note_transition(activation.transition);
        if let Some(deferred) = activation.deferred {
            self.record(
                "schedule-focus",
                format!("{:?} in {}ms", deferred.target, deferred.delay.as_millis()),
            );
            let now = self.now();
            self.timers.schedule(now, deferred.delay, deferred);
        }
    }

    /// Dispatch a keydown on the document, then the browser default action
    /// for Tab unless the page prevented it.
    pub fn press(&mut self, key: KeyEvent) {
        self.record("key", format!("{:?}{}", key.code, if key.shift() { "+shift" } else { "" }));
        let mut prevented = false;
        if self.keydown_attached {
            let result = self.page.key_down(&mut self.dom, &key);
            prevented = result.outcome.prevent_default();
            self.note_transition(result.transition);
        }
        if !prevented && key.code == KeyCode::Tab {
            self.dom.tab_navigate(key.shift());
        }
    }

    pub fn press_tab(&mut self) {
        self.press(KeyEvent::tab());
    }

    pub fn press_shift_tab(&mut self) {
        self.press(KeyEvent::back_tab());
    }

    pub fn press_escape(&mut self) {
        self.press(KeyEvent::escape());
    }

    /// Move the virtual clock forward and run every deferred focus that
    /// became due, in due order.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
        let now = self.now();
        for task in self.timers.pop_due(now) {
            self.record("run-focus", format!("{:?}", task.target));
            task.run(&mut self.dom);
        }
    }

    /// Advance the clock until every pending deferred focus has run.
    pub fn settle(&mut self) {
        while let Some(due) = self.timers.next_due() {
            let wait = due.saturating_duration_since(self.now());
            self.advance(wait);
        }
    }

    /// Deliver an intersection batch, as the viewport would after a scroll.
    pub fn intersect(&mut self, entries: &[IntersectionEntry<NodeId>]) -> usize {
        let outcome = self.page.intersections(&mut self.dom, entries);
        self.record(
            "intersect",
            format!("{} entries, {} revealed", entries.len(), outcome.revealed),
        );
        outcome.revealed
    }

    /// Scroll `nodes` into view: one intersecting entry each.
    pub fn scroll_into_view(&mut self, nodes: &[NodeId]) -> usize {
        let entries: Vec<_> = nodes
            .iter()
            .map(|node| IntersectionEntry::entering(*node, 1.0))
            .collect();
        self.intersect(&entries)
    }

    /// Focus an element directly, as a pointer click on a focusable control
    /// would.
    pub fn focus(&mut self, node: NodeId) {
        self.dom.focus(&node, folio_core::FocusOptions::default());
    }

    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.dom.active_element()
    }

    #[must_use]
    pub fn dom(&self) -> &FakeDom {
        &self.dom
    }

    #[must_use]
    pub fn page(&self) -> &FakePage {
        &self.page
    }

    /// Whether the keydown listener is currently attached.
    #[must_use]
    pub fn is_listening_for_keys(&self) -> bool {
        self.keydown_attached
    }

    /// `(attaches, detaches)` of the keydown listener so far.
    #[must_use]
    pub fn listener_counts(&self) -> (usize, usize) {
        (self.attaches, self.detaches)
    }

    /// Deferred focus requests not yet run.
    #[must_use]
    pub fn pending_focus(&self) -> usize {
        self.timers.len()
    }

    /// Virtual time since mount.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    /// The trace as JSON lines.
    #[must_use]
    pub fn trace_jsonl(&self) -> String {
        let mut out = String::new();
        for event in &self.trace {
            let line = json!({
                "at_ms": event.at_ms,
                "kind": event.kind,
                "detail": event.detail,
            });
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    /// BLAKE3 digest of the presentation state every behavior writes:
    /// classes, the accessibility attributes, `tabindex` and focus.
    #[must_use]
    pub fn state_digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for node in self.dom.document_order() {
            hasher.update(&(node.index() as u64).to_le_bytes());
            for class in self.dom.classes(node) {
                hasher.update(class.as_bytes());
                hasher.update(b" ");
            }
            for name in ["aria-hidden", "aria-expanded", "tabindex"] {
                if let Some(value) = self.dom.attribute(&node, name) {
                    hasher.update(name.as_bytes());
                    hasher.update(b"=");
                    hasher.update(value.as_bytes());
                }
                hasher.update(b";");
            }
        }
        if let Some(active) = self.focused() {
            hasher.update(b"focus:");
            hasher.update(&(active.index() as u64).to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

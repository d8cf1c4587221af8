#![forbid(unsafe_code)]

//! One-shot reveal-on-scroll.
//!
//! Candidates get a pending class (`reveal`) at start and a visible class
//! (`visible`) the first time they intersect the viewport, at which point
//! they are unobserved. The styling layer owns the actual transition.
//!
//! # Invariants
//!
//! - The visible marker is monotonic: it is only ever added.
//! - An element is unobserved exactly once, when it is revealed.
//! - In any [`RevealMode::Static`] mode no watcher exists and no class is
//!   touched, leaving the content in its fully visible default.

use folio_core::{
    Capabilities, Dom, IntersectionEntry, IntersectionWatcher, RevealConfig, RevealMode,
    WatchOptions,
};

/// Summary of one batch of intersection entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealOutcome {
    /// Elements revealed by this batch.
    pub revealed: usize,
    /// Entries that changed nothing (not intersecting, unknown or already
    /// revealed).
    pub ignored: usize,
}

/// Reveal-on-scroll coordinator.
#[derive(Debug)]
pub struct RevealCoordinator<N, W> {
    mode: RevealMode,
    watcher: Option<W>,
    pending: Vec<N>,
    revealed: usize,
    visible_class: String,
}

impl<N, W> RevealCoordinator<N, W>
where
    N: Clone + PartialEq + std::fmt::Debug,
    W: IntersectionWatcher<N>,
{
    /// Decide the reveal mode and, when animating, mark and watch every
    /// candidate.
    ///
    /// `make_watcher` is only called in [`RevealMode::Animate`].
    pub fn start<D, F>(
        dom: &mut D,
        capabilities: &Capabilities,
        config: &RevealConfig,
        make_watcher: F,
    ) -> Self
    where
        D: Dom<Node = N>,
        F: FnOnce(WatchOptions) -> W,
    {
        let mode = capabilities.reveal_mode();
        let RevealMode::Animate = mode else {
            #[cfg(feature = "tracing")]
            if let RevealMode::Static(reason) = mode {
                tracing::debug!(reason = reason.as_str(), "reveal animations disabled");
            }
            return Self {
                mode,
                watcher: None,
                pending: Vec::new(),
                revealed: 0,
                visible_class: config.visible_class.clone(),
            };
        };

        let candidates = dom.query_all(None, &config.targets);
        let mut watcher = make_watcher(config.watch_options());
        for node in &candidates {
            dom.add_class(node, &config.pending_class);
            watcher.observe(node);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(candidates = candidates.len(), "reveal watcher started");

        Self {
            mode,
            watcher: Some(watcher),
            pending: candidates,
            revealed: 0,
            visible_class: config.visible_class.clone(),
        }
    }

    /// Apply a batch of intersection entries.
    pub fn handle_entries<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        entries: &[IntersectionEntry<N>],
    ) -> RevealOutcome {
        let mut outcome = RevealOutcome::default();
        let Some(watcher) = self.watcher.as_mut() else {
            outcome.ignored = entries.len();
            return outcome;
        };
        for entry in entries {
            let position = entry
                .is_intersecting
                .then(|| self.pending.iter().position(|n| *n == entry.target))
                .flatten();
            match position {
                Some(index) => {
                    let node = self.pending.swap_remove(index);
                    dom.add_class(&node, &self.visible_class);
                    watcher.unobserve(&node);
                    outcome.revealed += 1;
                }
                None => outcome.ignored += 1,
            }
        }
        self.revealed += outcome.revealed;

        #[cfg(feature = "tracing")]
        if outcome.revealed > 0 {
            tracing::trace!(
                revealed = outcome.revealed,
                remaining = self.pending.len(),
                "reveal batch applied"
            );
        }

        outcome
    }

    /// The mode decided at start.
    #[must_use]
    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    /// Whether reveal animations are running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.watcher.is_some()
    }

    /// The watcher, when animating.
    #[must_use]
    pub fn watcher(&self) -> Option<&W> {
        self.watcher.as_ref()
    }

    /// Candidates still waiting to be revealed.
    #[must_use]
    pub fn pending(&self) -> &[N] {
        &self.pending
    }

    /// Total elements revealed so far.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::testing::{ElementSpec, FakeDom, NodeId, RecordingWatcher};
    use folio_core::{MotionPreference, StaticReason};
    use proptest::prelude::*;

    type Coordinator = RevealCoordinator<NodeId, RecordingWatcher<NodeId>>;

    fn page() -> (FakeDom, Vec<NodeId>, NodeId) {
        let mut dom = FakeDom::new();
        let body = dom.append(None, ElementSpec::new("body"));
        let mut cards = Vec::new();
        let roles = [
            "skill-card",
            "experience-group",
            "portfolio-card",
            "about-photo",
            "about-text",
        ];
        for class in roles {
            cards.push(dom.append(Some(body), ElementSpec::new("div").class(class)));
        }
        let plain = dom.append(Some(body), ElementSpec::new("div").class("footer"));
        (dom, cards, plain)
    }

    fn start(dom: &mut FakeDom, caps: Capabilities) -> Coordinator {
        RevealCoordinator::start(dom, &caps, &RevealConfig::default(), RecordingWatcher::new)
    }

    #[test]
    fn start_marks_and_watches_candidates() {
        let (mut dom, cards, plain) = page();
        let reveal = start(&mut dom, Capabilities::full());

        assert_eq!(reveal.mode(), RevealMode::Animate);
        let watcher = reveal.watcher().unwrap();
        assert_eq!(watcher.options().threshold, 0.15);
        assert_eq!(watcher.observed(), cards.as_slice());
        for card in &cards {
            assert!(dom.has_class(card, "reveal"));
            assert!(!dom.has_class(card, "visible"));
        }
        assert!(!dom.has_class(&plain, "reveal"));
    }

    #[test]
    fn intersecting_entry_reveals_and_unobserves() {
        let (mut dom, cards, _) = page();
        let mut reveal = start(&mut dom, Capabilities::full());

        let outcome = reveal.handle_entries(
            &mut dom,
            &[
                IntersectionEntry::entering(cards[1], 0.3),
                IntersectionEntry::leaving(cards[2]),
            ],
        );
        assert_eq!(outcome, RevealOutcome { revealed: 1, ignored: 1 });
        assert!(dom.has_class(&cards[1], "visible"));
        assert!(dom.has_class(&cards[1], "reveal"));
        assert!(!dom.has_class(&cards[2], "visible"));
        let watcher = reveal.watcher().unwrap();
        assert!(!watcher.is_observing(&cards[1]));
        assert!(watcher.is_observing(&cards[2]));
        assert_eq!(reveal.revealed_count(), 1);
    }

    #[test]
    fn repeated_intersection_is_ignored() {
        let (mut dom, cards, _) = page();
        let mut reveal = start(&mut dom, Capabilities::full());
        let entry = [IntersectionEntry::entering(cards[0], 1.0)];
        reveal.handle_entries(&mut dom, &entry);
        let again = reveal.handle_entries(&mut dom, &entry);

        assert_eq!(again, RevealOutcome { revealed: 0, ignored: 1 });
        assert_eq!(reveal.watcher().unwrap().unobserve_calls(), 1);
        assert_eq!(dom.classes(cards[0]), ["skill-card", "reveal", "visible"]);
    }

    #[test]
    fn reduced_motion_touches_nothing() {
        let (mut dom, cards, _) = page();
        let mut created = false;
        let mut reveal: Coordinator = RevealCoordinator::start(
            &mut dom,
            &Capabilities::reduced_motion(),
            &RevealConfig::default(),
            |options| {
                created = true;
                RecordingWatcher::new(options)
            },
        );
        assert!(!created);
        assert_eq!(reveal.mode(), RevealMode::Static(StaticReason::ReducedMotion));
        assert!(!reveal.is_animating());
        for card in &cards {
            assert!(dom.classes(*card).iter().all(|c| c != "reveal"));
        }

        let entering = [IntersectionEntry::entering(cards[0], 1.0)];
        let outcome = reveal.handle_entries(&mut dom, &entering);
        assert_eq!(outcome.ignored, 1);
        assert!(!dom.has_class(&cards[0], "visible"));
    }

    #[test]
    fn missing_capabilities_fall_back_to_static() {
        let cases = [
            (
                Capabilities {
                    motion: None,
                    intersection_observer: true,
                },
                StaticReason::MotionQueryUnsupported,
            ),
            (
                Capabilities {
                    motion: Some(MotionPreference::NoPreference),
                    intersection_observer: false,
                },
                StaticReason::IntersectionUnsupported,
            ),
        ];
        for (caps, reason) in cases {
            let (mut dom, cards, _) = page();
            let reveal = start(&mut dom, caps);
            assert_eq!(reveal.mode(), RevealMode::Static(reason));
            assert!(reveal.watcher().is_none());
            for card in &cards {
                assert_eq!(dom.classes(*card).len(), 1, "only the role class remains");
                assert!(!dom.has_class(card, "reveal"));
                assert!(!dom.has_class(card, "visible"));
            }
        }
    }

    #[test]
    fn custom_classes_and_threshold() {
        let (mut dom, cards, _) = page();
        let config = RevealConfig {
            threshold: 0.5,
            pending_class: "fade".into(),
            visible_class: "shown".into(),
            ..RevealConfig::default()
        };
        let mut reveal: Coordinator = RevealCoordinator::start(
            &mut dom,
            &Capabilities::full(),
            &config,
            RecordingWatcher::new,
        );
        assert_eq!(reveal.watcher().unwrap().options().threshold, 0.5);
        reveal.handle_entries(&mut dom, &[IntersectionEntry::entering(cards[3], 0.6)]);
        assert_eq!(dom.classes(cards[3]), ["about-photo", "fade", "shown"]);
    }

    proptest! {
        // Any sequence of entries reveals each candidate at most once, never
        // removes a visible marker, and unobserves exactly the revealed ones.
        #[test]
        fn reveal_is_monotonic_and_idempotent(
            batches in proptest::collection::vec(
                proptest::collection::vec((0usize..6, any::<bool>()), 0..8),
                0..12,
            )
        ) {
            let (mut dom, cards, plain) = page();
            let mut reveal = start(&mut dom, Capabilities::full());
            let all: Vec<NodeId> = cards.iter().copied().chain(std::iter::once(plain)).collect();
            let mut seen_visible = std::collections::HashSet::new();

            for batch in batches {
                let entries: Vec<_> = batch
                    .into_iter()
                    .map(|(i, hit)| IntersectionEntry {
                        target: all[i],
                        is_intersecting: hit,
                        ratio: if hit { 0.5 } else { 0.0 },
                    })
                    .collect();
                reveal.handle_entries(&mut dom, &entries);

                for node in &all {
                    let visible = dom.has_class(node, "visible");
                    if seen_visible.contains(node) {
                        prop_assert!(visible);
                    }
                    if visible {
                        seen_visible.insert(*node);
                    }
                }
            }

            prop_assert!(!dom.has_class(&plain, "visible"));
            prop_assert_eq!(reveal.revealed_count(), seen_visible.len());
            let watcher = reveal.watcher().unwrap();
            prop_assert_eq!(watcher.observe_calls(), cards.len());
            prop_assert_eq!(watcher.unobserve_calls(), seen_visible.len());
            prop_assert_eq!(watcher.observed().len() + seen_visible.len(), cards.len());
        }
    }
}

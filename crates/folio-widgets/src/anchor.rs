#![forbid(unsafe_code)]

//! In-page anchor focus handoff.
//!
//! Activating a `#fragment` link lets the browser smooth-scroll to the target
//! section. Once scrolling has settled, keyboard focus should follow, so that
//! the next Tab continues from the section instead of the link. Focus is
//! requested with `preventScroll`, which keeps the smooth scroll from being
//! cut short.
//!
//! "Settled" is a fixed delay ([`AnchorConfig::focus_delay_ms`]). The
//! coordinator only decides *what* to focus and *when*; it returns a
//! [`DeferredFocus`] and the host schedules it.
//!
//! Section containers are not focusable by default. Mounting sets
//! `tabindex="-1"` on every `section[id]` so the deferred focus can land.

use std::time::Duration;

use folio_core::a11y::make_programmatically_focusable;
use folio_core::{AnchorConfig, Dom, FocusOptions};

/// A focus request to run after `delay`.
///
/// Requests are independent: nothing cancels or merges them, so the last one
/// to fire wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredFocus<N> {
    pub target: N,
    pub delay: Duration,
    pub options: FocusOptions,
}

impl<N> DeferredFocus<N> {
    /// Perform the focus request.
    pub fn run<D: Dom<Node = N>>(&self, dom: &mut D) {
        dom.focus(&self.target, self.options);
    }
}

/// Coordinator for `a[href^="#"]` links.
#[derive(Debug, Clone)]
pub struct AnchorFocus<N> {
    links: Vec<N>,
    sections: usize,
    home_fragment: String,
    delay: Duration,
}

impl<N: Clone + PartialEq + std::fmt::Debug> AnchorFocus<N> {
    /// Prepare sections for programmatic focus and collect the anchor links.
    pub fn mount<D: Dom<Node = N>>(dom: &mut D, config: &AnchorConfig) -> Self {
        let sections = dom.query_all(None, &config.sections);
        for section in &sections {
            make_programmatically_focusable(dom, section);
        }
        let links = dom.query_all(None, &config.links);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sections = sections.len(),
            links = links.len(),
            "anchor focus mounted"
        );

        Self {
            links,
            sections: sections.len(),
            home_fragment: config.home_fragment.clone(),
            delay: config.focus_delay(),
        }
    }

    /// Handle activation of `node`.
    ///
    /// Returns the focus request to schedule, or `None` when `node` is not an
    /// anchor link, its fragment is empty or the home fragment, or nothing in
    /// the document carries that id.
    pub fn activate<D: Dom<Node = N>>(&self, dom: &D, node: &N) -> Option<DeferredFocus<N>> {
        if !self.links.contains(node) {
            return None;
        }
        let href = dom.attribute(node, "href")?;
        let id = self.fragment_id(&href)?;
        let Some(target) = dom.element_by_id(id) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(href = %href, "anchor target not found");
            return None;
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            href = %href,
            delay_ms = self.delay.as_millis() as u64,
            "anchor focus deferred"
        );

        Some(DeferredFocus {
            target,
            delay: self.delay,
            options: FocusOptions::without_scroll(),
        })
    }

    /// The id named by `href`, or `None` for links that should be left
    /// alone.
    fn fragment_id<'h>(&self, href: &'h str) -> Option<&'h str> {
        if href == self.home_fragment {
            return None;
        }
        match href.strip_prefix('#') {
            Some("") | None => None,
            Some(id) => Some(id),
        }
    }

    /// Links the coordinator handles, in document order.
    #[must_use]
    pub fn links(&self) -> &[N] {
        &self.links
    }

    /// Number of sections made focusable at mount.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections
    }

    /// Delay before focus is moved.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

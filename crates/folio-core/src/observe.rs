#![forbid(unsafe_code)]

//! Viewport intersection watching.
//!
//! Mirrors the shape of `IntersectionObserver`: a watcher is created with a
//! visibility threshold, elements are registered with
//! [`observe`](IntersectionWatcher::observe), and the host delivers batches of
//! [`IntersectionEntry`] back to whoever owns the watcher.

/// Configuration for a new watcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Fraction of the element (in `[0.0, 1.0]`) that must be inside the
    /// viewport for it to count as intersecting.
    pub threshold: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { threshold: 0.15 }
    }
}

/// One element's visibility change.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl<N> IntersectionEntry<N> {
    /// Entry for an element that crossed into view.
    pub fn entering(target: N, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting: true,
            ratio,
        }
    }

    /// Entry for an element that left the viewport.
    pub fn leaving(target: N) -> Self {
        Self {
            target,
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Registration surface of a viewport intersection watcher.
pub trait IntersectionWatcher<N> {
    /// Start reporting visibility changes for `node`.
    fn observe(&mut self, node: &N);

    /// Stop reporting visibility changes for `node`.
    fn unobserve(&mut self, node: &N);
}

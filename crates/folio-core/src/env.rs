#![forbid(unsafe_code)]

//! Host capability detection results.
//!
//! The host probes its environment once at start-up and hands the result to
//! the behaviors. Animations only run when every capability they depend on is
//! positively present; anything unknown degrades to the static presentation,
//! which is the page's fully visible default.

/// The user's motion preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPreference {
    NoPreference,
    Reduce,
}

/// Why reveal animations are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticReason {
    /// The user asked for reduced motion.
    ReducedMotion,
    /// The host cannot answer the reduced-motion query.
    MotionQueryUnsupported,
    /// The host has no viewport intersection watching.
    IntersectionUnsupported,
}

impl StaticReason {
    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReducedMotion => "reduced-motion",
            Self::MotionQueryUnsupported => "motion-query-unsupported",
            Self::IntersectionUnsupported => "intersection-unsupported",
        }
    }
}

/// Whether reveal-on-scroll animations should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    Animate,
    Static(StaticReason),
}

/// What the host environment supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `None` when the reduced-motion media query is unavailable.
    pub motion: Option<MotionPreference>,
    /// Whether viewport intersection watching is available.
    pub intersection_observer: bool,
}

impl Capabilities {
    /// A modern host with no motion preference.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            motion: Some(MotionPreference::NoPreference),
            intersection_observer: true,
        }
    }

    /// A modern host whose user prefers reduced motion.
    #[must_use]
    pub const fn reduced_motion() -> Self {
        Self {
            motion: Some(MotionPreference::Reduce),
            intersection_observer: true,
        }
    }

    /// Decide the reveal mode. Reduced motion wins over missing features so
    /// logs report the user's choice first.
    #[must_use]
    pub const fn reveal_mode(&self) -> RevealMode {
        match (self.motion, self.intersection_observer) {
            (Some(MotionPreference::Reduce), _) => RevealMode::Static(StaticReason::ReducedMotion),
            (None, _) => RevealMode::Static(StaticReason::MotionQueryUnsupported),
            (Some(MotionPreference::NoPreference), false) => {
                RevealMode::Static(StaticReason::IntersectionUnsupported)
            }
            (Some(MotionPreference::NoPreference), true) => RevealMode::Animate,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

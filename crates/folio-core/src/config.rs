#![forbid(unsafe_code)]

//! Page configuration.
//!
//! [`PageConfig::default`] describes the portfolio markup the behaviors were
//! written for. Sites with different markup override individual fields; with
//! the `config` feature the whole structure can be loaded from TOML or JSON,
//! where every field is optional and selectors are written as CSS strings:
//!
//! ```toml
//! [overlay]
//! toggle = ".menu-button"
//!
//! [anchors]
//! focus_delay_ms = 450
//!
//! [reveal]
//! targets = ".card, .timeline-entry"
//! threshold = 0.25
//! ```
//!
//! Loaded configurations are validated before they are returned.

use std::fmt;
use std::time::Duration;

use crate::observe::WatchOptions;
use crate::selector::{AttrOp, Compound, Selector};

/// Errors from loading or validating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The document could not be parsed.
    Parse {
        format: &'static str,
        message: String,
    },
    /// A field holds a value the behaviors cannot use.
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { format, message } => write!(f, "invalid {format} config: {message}"),
            Self::Invalid { field, reason } => write!(f, "invalid value for {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Navigation overlay wiring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct OverlayConfig {
    /// The control that opens and closes the overlay.
    pub toggle: Selector,
    /// `id` of the overlay container.
    pub overlay_id: String,
    /// Explicit close control, searched inside the overlay.
    pub close: Selector,
    /// Navigation links inside the overlay; the first receives focus on open.
    pub links: Selector,
    /// Elements the focus trap cycles through, searched inside the overlay.
    pub focusable: Selector,
    /// Class marking the overlay visually open.
    pub open_class: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            toggle: Selector::class("nav-toggle"),
            overlay_id: "nav-overlay".to_string(),
            close: Selector::class("nav-close"),
            links: Selector::descendant(Compound::class("nav-list"), Compound::tag("a")),
            focusable: Selector::any_of([Selector::tag("a"), Selector::tag("button")]),
            open_class: "open".to_string(),
        }
    }
}

/// In-page anchor focus handoff.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct AnchorConfig {
    /// Section containers made programmatically focusable.
    pub sections: Selector,
    /// Links whose activation is intercepted.
    pub links: Selector,
    /// Fragment that scrolls to the top of the page and is never intercepted.
    pub home_fragment: String,
    /// Delay before focusing the target, approximating smooth-scroll duration.
    pub focus_delay_ms: u64,
}

impl AnchorConfig {
    /// The focus delay as a [`Duration`].
    #[must_use]
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            sections: Selector::compound(
                Compound::tag("section").with_attr("id", AttrOp::Exists),
            ),
            links: Selector::compound(
                Compound::tag("a").with_attr("href", AttrOp::Prefix("#".to_string())),
            ),
            home_fragment: "#home".to_string(),
            focus_delay_ms: 600,
        }
    }
}

/// Reveal-on-scroll animation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct RevealConfig {
    /// Elements that animate in.
    pub targets: Selector,
    /// Minimum visible fraction before an element counts as in view.
    pub threshold: f64,
    /// Class applied to every candidate while it waits to be revealed.
    pub pending_class: String,
    /// Class applied once the candidate has been seen.
    pub visible_class: String,
}

impl RevealConfig {
    /// Options for the intersection watcher.
    #[must_use]
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            threshold: self.threshold,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            targets: Selector::any_of(
                [
                    "skill-card",
                    "experience-group",
                    "portfolio-card",
                    "about-photo",
                    "about-text",
                ]
                .into_iter()
                .map(Selector::class),
            ),
            threshold: 0.15,
            pending_class: "reveal".to_string(),
            visible_class: "visible".to_string(),
        }
    }
}

/// Configuration for all page behaviors.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct PageConfig {
    pub overlay: OverlayConfig,
    pub anchors: AnchorConfig,
    pub reveal: RevealConfig,
}

impl PageConfig {
    /// Check every field for values the behaviors cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_class("overlay.open_class", &self.overlay.open_class)?;
        check_class("reveal.pending_class", &self.reveal.pending_class)?;
        check_class("reveal.visible_class", &self.reveal.visible_class)?;
        if self.reveal.pending_class == self.reveal.visible_class {
            return Err(invalid(
                "reveal.visible_class",
                "must differ from reveal.pending_class",
            ));
        }
        if self.overlay.overlay_id.is_empty()
            || self.overlay.overlay_id.chars().any(char::is_whitespace)
        {
            return Err(invalid(
                "overlay.overlay_id",
                "must be a non-empty id without whitespace",
            ));
        }
        if !self.anchors.home_fragment.starts_with('#') {
            return Err(invalid("anchors.home_fragment", "must start with '#'"));
        }
        let t = self.reveal.threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(invalid(
                "reveal.threshold",
                format!("{t} is outside [0.0, 1.0]"),
            ));
        }
        Ok(())
    }

    /// Load and validate a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML or unknown fields,
    /// [`ConfigError::Invalid`] for values that fail validation.
    #[cfg(feature = "config")]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            format: "TOML",
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// [`ConfigError::Invalid`] for values that fail validation.
    #[cfg(feature = "config")]
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input).map_err(|e| ConfigError::Parse {
            format: "JSON",
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_class(field: &'static str, class: &str) -> Result<(), ConfigError> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(invalid(field, "must be a single non-empty class name"));
    }
    Ok(())
}

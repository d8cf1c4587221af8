#![forbid(unsafe_code)]

//! Host probing helpers that do not need a browser.
//!
//! The wasm entry point gathers raw facts (does the motion query match, is
//! `IntersectionObserver` defined, what does the inline config block say) and
//! these functions turn them into core types.

use std::time::Duration;

use folio_core::{Capabilities, ConfigError, MotionPreference, PageConfig};
use tracing::warn;

/// Media query for the user's reduced-motion preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Global constructor whose presence means viewport watching is available.
pub const INTERSECTION_OBSERVER_GLOBAL: &str = "IntersectionObserver";

/// Id of the optional `<script type="application/json">` configuration block.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// Whether mounting must wait for `DOMContentLoaded`, given
/// `document.readyState`. Only `"loading"` defers; `"interactive"` and
/// `"complete"` mount immediately.
#[must_use]
pub fn defers_mount(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Build [`Capabilities`] from raw probe results.
///
/// `reduced_motion` is `None` when the media query could not be evaluated.
#[must_use]
pub fn capabilities(reduced_motion: Option<bool>, intersection_observer: bool) -> Capabilities {
    Capabilities {
        motion: reduced_motion.map(|reduce| {
            if reduce {
                MotionPreference::Reduce
            } else {
                MotionPreference::NoPreference
            }
        }),
        intersection_observer,
    }
}

/// Parse the inline configuration block, if any.
///
/// A missing or blank block yields the defaults.
///
/// # Errors
///
/// Returns the [`ConfigError`] for malformed JSON or invalid values.
pub fn page_config(inline: Option<&str>) -> Result<PageConfig, ConfigError> {
    match inline.map(str::trim) {
        None | Some("") => Ok(PageConfig::default()),
        Some(json) => PageConfig::from_json_str(json),
    }
}

/// Like [`page_config`], but falls back to the defaults (with a warning) on
/// error so a typo in the markup never disables the page behaviors.
#[must_use]
pub fn page_config_or_default(inline: Option<&str>) -> PageConfig {
    page_config(inline).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring inline folio configuration");
        PageConfig::default()
    })
}

/// `setTimeout` delay argument for `delay`, saturating at `i32::MAX`.
#[must_use]
pub fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

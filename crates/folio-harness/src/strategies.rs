#![forbid(unsafe_code)]

//! `proptest` strategies for user sessions against the portfolio fixture.

use proptest::prelude::*;
use web_time::Duration;

use crate::driver::PageDriver;
use crate::fixture::Portfolio;

/// One thing a visitor can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ClickToggle,
    ClickClose,
    /// Click the n-th overlay navigation link (modulo their count).
    ClickNavLink(usize),
    ClickHeroCta,
    ClickEmptyLink,
    ClickBackToTop,
    Tab,
    ShiftTab,
    Escape,
    /// Advance the virtual clock by this many milliseconds.
    Wait(u64),
    /// Scroll the n-th reveal candidate (modulo their count) into view.
    Reveal(usize),
}

impl Action {
    /// Perform the action on `driver`.
    pub fn apply(self, driver: &mut PageDriver, page: &Portfolio) {
        match self {
            Self::ClickToggle => {
                if let Some(toggle) = page.toggle {
                    driver.click(toggle);
                }
            }
            Self::ClickClose => {
                if let Some(close) = page.close {
                    driver.click(close);
                }
            }
            Self::ClickNavLink(n) => {
                if !page.nav_links.is_empty() {
                    driver.click(page.nav_links[n % page.nav_links.len()]);
                }
            }
            Self::ClickHeroCta => driver.click(page.hero_cta),
            Self::ClickEmptyLink => driver.click(page.empty_link),
            Self::ClickBackToTop => driver.click(page.back_to_top),
            Self::Tab => driver.press_tab(),
            Self::ShiftTab => driver.press_shift_tab(),
            Self::Escape => driver.press_escape(),
            Self::Wait(ms) => driver.advance(Duration::from_millis(ms)),
            Self::Reveal(n) => {
                if !page.reveal_targets.is_empty() {
                    let target = page.reveal_targets[n % page.reveal_targets.len()];
                    driver.scroll_into_view(&[target]);
                }
            }
        }
    }
}

/// Any single action, weighted towards overlay interaction.
pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::ClickToggle),
        1 => Just(Action::ClickClose),
        2 => (0usize..8).prop_map(Action::ClickNavLink),
        1 => Just(Action::ClickHeroCta),
        1 => Just(Action::ClickEmptyLink),
        1 => Just(Action::ClickBackToTop),
        4 => Just(Action::Tab),
        2 => Just(Action::ShiftTab),
        2 => Just(Action::Escape),
        2 => (0u64..900).prop_map(Action::Wait),
        2 => (0usize..16).prop_map(Action::Reveal),
    ]
}

/// A session of up to `max_len` actions.
pub fn session(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(action(), 0..max_len)
}

/// Only keyboard actions, for focus-trap properties.
pub fn keyboard_session(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(
        prop_oneof![4 => Just(Action::Tab), 3 => Just(Action::ShiftTab)],
        0..max_len,
    )
}

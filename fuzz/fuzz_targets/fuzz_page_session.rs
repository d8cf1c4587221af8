#![no_main]

use arbitrary::Arbitrary;
use folio_harness::{Action, PageDriver, Portfolio};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    ClickToggle,
    ClickClose,
    ClickNavLink(u8),
    ClickHeroCta,
    ClickBackToTop,
    Tab,
    ShiftTab,
    Escape,
    Wait(u16),
    Reveal(u8),
}

impl From<Step> for Action {
    fn from(step: Step) -> Self {
        match step {
            Step::ClickToggle => Action::ClickToggle,
            Step::ClickClose => Action::ClickClose,
            Step::ClickNavLink(n) => Action::ClickNavLink(usize::from(n)),
            Step::ClickHeroCta => Action::ClickHeroCta,
            Step::ClickBackToTop => Action::ClickBackToTop,
            Step::Tab => Action::Tab,
            Step::ShiftTab => Action::ShiftTab,
            Step::Escape => Action::Escape,
            Step::Wait(ms) => Action::Wait(u64::from(ms)),
            Step::Reveal(n) => Action::Reveal(usize::from(n)),
        }
    }
}

fuzz_target!(|steps: Vec<Step>| {
    let site = Portfolio::standard();
    let Ok(mut driver) = PageDriver::mount(site.dom.clone()) else {
        return;
    };
    for step in steps.into_iter().take(256) {
        Action::from(step).apply(&mut driver, &site);
        let open = driver.page().is_intercepting_keys();
        assert_eq!(driver.is_listening_for_keys(), open);
        let (attaches, detaches) = driver.listener_counts();
        assert_eq!(attaches - detaches, usize::from(open));
    }
});

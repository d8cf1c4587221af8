#![forbid(unsafe_code)]

//! End-to-end scenarios on the reference portfolio page.

use std::time::Duration;

use folio_core::{Capabilities, Dom, FocusOptions, PageConfig, RevealMode, StaticReason};
use folio_harness::{PageDriver, Portfolio};
use pretty_assertions::assert_eq;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn mounted() -> (Portfolio, PageDriver) {
    let site = Portfolio::standard();
    let driver = PageDriver::mount(site.dom.clone()).unwrap();
    (site, driver)
}

fn toggle(site: &Portfolio) -> folio_core::testing::NodeId {
    site.toggle.unwrap()
}

fn overlay(site: &Portfolio) -> folio_core::testing::NodeId {
    site.overlay.unwrap()
}

// ============================================================================
// Navigation overlay
// ============================================================================

#[test]
fn toggle_opens_and_nav_link_closes() {
    let (site, mut driver) = mounted();
    driver.focus(toggle(&site));

    driver.click(toggle(&site));
    let dom = driver.dom();
    assert_eq!(dom.attribute(&toggle(&site), "aria-expanded").as_deref(), Some("true"));
    assert_eq!(dom.attribute(&overlay(&site), "aria-hidden").as_deref(), Some("false"));
    assert!(dom.has_class(&overlay(&site), "open"));
    assert_eq!(driver.focused(), Some(site.nav_links[0]));
    assert!(driver.is_listening_for_keys());

    driver.click(site.nav_links[2]);
    let dom = driver.dom();
    assert_eq!(dom.attribute(&toggle(&site), "aria-expanded").as_deref(), Some("false"));
    assert_eq!(dom.attribute(&overlay(&site), "aria-hidden").as_deref(), Some("true"));
    assert!(!dom.has_class(&overlay(&site), "open"));
    assert_eq!(driver.focused(), Some(toggle(&site)));
    assert!(!driver.is_listening_for_keys());
}

#[test]
fn nav_link_focus_handoff_follows_restore() {
    let (site, mut driver) = mounted();
    driver.focus(toggle(&site));
    driver.click(toggle(&site));
    driver.click(site.nav_links[3]);
    assert_eq!(driver.focused(), Some(toggle(&site)));

    driver.advance(ms(600));
    assert_eq!(driver.focused(), Some(site.section("projects")));
}

#[test]
fn close_control_and_toggle_both_close() {
    let (site, mut driver) = mounted();
    driver.focus(toggle(&site));

    driver.click(toggle(&site));
    driver.click(site.close.unwrap());
    assert!(!driver.page().is_intercepting_keys());
    assert_eq!(driver.focused(), Some(toggle(&site)));

    driver.click(toggle(&site));
    driver.click(toggle(&site));
    assert!(!driver.page().is_intercepting_keys());
    assert_eq!(driver.focused(), Some(toggle(&site)));
}

#[test]
fn escape_closes_from_every_position() {
    let (site, mut driver) = mounted();
    driver.focus(toggle(&site));
    driver.click(toggle(&site));

    let members = std::iter::once(site.close.unwrap()).chain(site.nav_links.iter().copied());
    for member in members.collect::<Vec<_>>() {
        if !driver.page().is_intercepting_keys() {
            driver.click(toggle(&site));
        }
        driver.focus(member);
        driver.press_escape();
        assert!(!driver.page().is_intercepting_keys());
        assert_eq!(driver.focused(), Some(toggle(&site)));
    }
}

#[test]
fn tab_wraps_inside_overlay() {
    let (site, mut driver) = mounted();
    driver.click(toggle(&site));
    let last = *site.nav_links.last().unwrap();
    let close = site.close.unwrap();

    for expected in &site.nav_links[1..] {
        driver.press_tab();
        assert_eq!(driver.focused(), Some(*expected));
    }
    driver.press_tab();
    assert_eq!(driver.focused(), Some(close), "forward from the last link wraps");

    driver.press_shift_tab();
    assert_eq!(driver.focused(), Some(last), "backward from the first member wraps");
}

#[test]
fn shift_tab_from_first_link_reaches_close_control() {
    let (site, mut driver) = mounted();
    driver.click(toggle(&site));
    driver.press_shift_tab();
    assert_eq!(driver.focused(), site.close);
}

#[test]
fn overlay_without_links_still_opens() {
    let site = Portfolio::builder().nav_links(&[]).build();
    let mut driver = PageDriver::mount(site.dom.clone()).unwrap();
    driver.focus(toggle(&site));

    driver.click(toggle(&site));
    assert!(driver.page().is_intercepting_keys());
    assert_eq!(driver.focused(), Some(toggle(&site)));

    // The close control is the only member: Tab from it stays on it.
    driver.focus(site.close.unwrap());
    driver.press_tab();
    assert_eq!(driver.focused(), site.close);

    driver.press_escape();
    assert_eq!(driver.focused(), Some(toggle(&site)));
}

#[test]
fn close_without_prior_focus_skips_restore() {
    let (site, mut driver) = mounted();
    assert_eq!(driver.focused(), None);
    driver.click(toggle(&site));
    let focus_requests = driver.dom().focus_log().len();

    driver.press_escape();
    assert_eq!(driver.dom().focus_log().len(), focus_requests);
    assert_eq!(driver.focused(), Some(site.nav_links[0]));
}

#[test]
fn listener_attach_detach_stays_balanced() {
    let (site, mut driver) = mounted();
    for round in 0..12 {
        driver.click(toggle(&site));
        match round % 4 {
            0 => driver.click(toggle(&site)),
            1 => driver.click(site.close.unwrap()),
            2 => driver.press_escape(),
            _ => driver.click(site.nav_links[round % site.nav_links.len()]),
        }
        assert!(!driver.is_listening_for_keys());
    }
    assert_eq!(driver.listener_counts(), (12, 12));
}

#[test]
fn keys_while_closed_never_reach_the_page() {
    let (site, mut driver) = mounted();
    driver.focus(site.hero_cta);
    driver.press_escape();
    driver.press_tab();
    assert_eq!(driver.listener_counts(), (0, 0));
    assert_eq!(driver.focused(), Some(site.empty_link));
}

#[test]
fn missing_overlay_leaves_other_behaviors_working() {
    let site = Portfolio::builder().without_overlay().build();
    let mut driver = PageDriver::mount(site.dom.clone()).unwrap();
    assert!(driver.page().overlay().is_none());

    driver.click(site.hero_cta);
    driver.advance(ms(600));
    assert_eq!(driver.focused(), Some(site.section("projects")));
    assert_eq!(driver.scroll_into_view(&site.reveal_targets[..2]), 2);
}

#[test]
fn missing_close_control_disables_only_the_overlay() {
    let site = Portfolio::builder().without_close_control().build();
    let driver = PageDriver::mount(site.dom.clone()).unwrap();
    assert!(driver.page().overlay().is_none());
    assert!(driver.page().overlay_error().is_some());
    assert_eq!(driver.page().anchors().links().len(), 8);
}

// ============================================================================
// Anchor focus
// ============================================================================

#[test]
fn projects_anchor_focuses_section_after_delay() {
    let (site, mut driver) = mounted();
    let projects = site.section("projects");

    driver.click(site.hero_cta);
    assert_eq!(driver.pending_focus(), 1);
    driver.advance(ms(599));
    assert_ne!(driver.focused(), Some(projects));

    driver.advance(ms(1));
    assert_eq!(driver.focused(), Some(projects));
    let last = driver.dom().focus_log().last().copied().unwrap();
    assert_eq!(last.node, projects);
    assert!(last.prevent_scroll, "focus must not force a scroll");
}

#[test]
fn home_and_empty_anchors_schedule_nothing() {
    let (site, mut driver) = mounted();
    driver.click(site.back_to_top);
    driver.click(site.empty_link);
    assert_eq!(driver.pending_focus(), 0);
    driver.advance(ms(1_000));
    assert_eq!(driver.focused(), None);
}

#[test]
fn later_deferred_focus_wins() {
    let (site, mut driver) = mounted();
    driver.click(site.hero_cta);
    driver.advance(ms(300));
    driver.click(toggle(&site));
    driver.click(site.nav_links[0]);
    assert_eq!(driver.pending_focus(), 2);

    driver.advance(ms(300));
    assert_eq!(driver.focused(), Some(site.section("projects")));
    driver.advance(ms(300));
    assert_eq!(driver.focused(), Some(site.section("about")));
}

#[test]
fn sections_need_mount_to_be_focusable() {
    let site = Portfolio::standard();
    let mut bare = site.dom.clone();
    let about = site.section("about");
    bare.focus(&about, FocusOptions::without_scroll());
    assert_eq!(bare.active_element(), None);

    let driver = PageDriver::mount(site.dom.clone()).unwrap();
    for section in site.sections.values() {
        assert_eq!(driver.dom().attribute(section, "tabindex").as_deref(), Some("-1"));
        assert!(!driver.dom().is_tabbable(*section));
    }
}

#[test]
fn configured_delay_is_honored() {
    let site = Portfolio::standard();
    let config = PageConfig::from_toml_str("[anchors]\nfocus_delay_ms = 250\n").unwrap();
    let mut driver =
        PageDriver::mount_with(site.dom.clone(), Capabilities::full(), &config).unwrap();

    driver.click(site.hero_cta);
    driver.advance(ms(250));
    assert_eq!(driver.focused(), Some(site.section("projects")));
}

// ============================================================================
// Reveal on scroll
// ============================================================================

#[test]
fn candidates_reveal_once() {
    let (site, mut driver) = mounted();
    for target in &site.reveal_targets {
        assert!(driver.dom().has_class(target, "reveal"));
    }

    assert_eq!(driver.scroll_into_view(&site.reveal_targets[..3]), 3);
    assert_eq!(driver.scroll_into_view(&site.reveal_targets[..3]), 0);
    let watcher = driver.page().reveal().watcher().unwrap();
    assert_eq!(watcher.unobserve_calls(), 3);
    assert_eq!(watcher.observed().len(), site.reveal_targets.len() - 3);
    for target in &site.reveal_targets[..3] {
        assert_eq!(
            driver.dom().classes(*target).last().map(String::as_str),
            Some("visible")
        );
    }
}

#[test]
fn reduced_motion_leaves_page_untouched() {
    let site = Portfolio::standard();
    let mut driver = PageDriver::mount_with(
        site.dom.clone(),
        Capabilities::reduced_motion(),
        &PageConfig::default(),
    )
    .unwrap();
    assert_eq!(
        driver.page().reveal().mode(),
        RevealMode::Static(StaticReason::ReducedMotion)
    );
    let before = driver.state_digest();
    assert_eq!(driver.scroll_into_view(&site.reveal_targets), 0);
    assert_eq!(driver.state_digest(), before);
    for target in &site.reveal_targets {
        assert!(!driver.dom().has_class(target, "reveal"));
        assert!(!driver.dom().has_class(target, "visible"));
        assert_eq!(driver.dom().classes(*target).len(), 1, "role class only");
    }
}

#[test]
fn missing_intersection_support_falls_back_to_static() {
    let site = Portfolio::standard();
    let caps = Capabilities {
        intersection_observer: false,
        ..Capabilities::full()
    };
    let driver = PageDriver::mount_with(site.dom.clone(), caps, &PageConfig::default()).unwrap();
    assert!(driver.page().reveal().watcher().is_none());
    assert!(
        site.reveal_targets
            .iter()
            .all(|t| !driver.dom().has_class(t, "reveal"))
    );
}

// ============================================================================
// Trace
// ============================================================================

#[test]
fn trace_exports_as_jsonl() {
    let (site, mut driver) = mounted();
    driver.click(toggle(&site));
    driver.press_escape();
    driver.click(site.hero_cta);
    driver.settle();

    let jsonl = driver.trace_jsonl();
    let kinds: Vec<String> = jsonl
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["kind"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        kinds,
        [
            "mount",
            "click",
            "transition",
            "keydown-attach",
            "key",
            "transition",
            "keydown-detach",
            "click",
            "schedule-focus",
            "run-focus",
        ]
    );
    assert_eq!(driver.trace().last().unwrap().at_ms, 600);
}

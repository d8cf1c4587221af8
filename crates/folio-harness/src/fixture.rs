#![forbid(unsafe_code)]

//! Reference portfolio page built on the in-memory DOM.
//!
//! The default page mirrors the site markup the behaviors were written for:
//!
//! ```text
//! body
//! ├── header
//! │   └── button.nav-toggle[aria-expanded=false]
//! ├── div#nav-overlay[aria-hidden=true]
//! │   ├── button.nav-close
//! │   └── ul.nav-list > li > a[href=#…]  (one per nav link)
//! ├── section#home     └── a.cta[href=#projects]
//! ├── section#about    ├── div.about-photo └── div.about-text
//! ├── section#skills   └── div.skill-card × 3
//! ├── section#experience └── div.experience-group × 2
//! ├── section#projects └── div.portfolio-card × 3
//! ├── section#contact  └── a[href=#]
//! └── footer           └── a[href=#home]
//! ```

use std::collections::BTreeMap;

use folio_core::testing::{ElementSpec, FakeDom, NodeId};

const DEFAULT_NAV: [&str; 5] = ["#about", "#skills", "#experience", "#projects", "#contact"];

/// Builder for [`Portfolio`].
#[derive(Debug, Clone)]
pub struct PortfolioBuilder {
    nav_links: Vec<String>,
    overlay: bool,
    close_control: bool,
    skill_cards: usize,
    project_cards: usize,
}

impl Default for PortfolioBuilder {
    fn default() -> Self {
        Self {
            nav_links: DEFAULT_NAV.iter().map(|s| (*s).to_string()).collect(),
            overlay: true,
            close_control: true,
            skill_cards: 3,
            project_cards: 3,
        }
    }
}

impl PortfolioBuilder {
    /// Replace the overlay's navigation links.
    #[must_use]
    pub fn nav_links(mut self, hrefs: &[&str]) -> Self {
        self.nav_links = hrefs.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Leave the overlay (and its toggle) out of the page.
    #[must_use]
    pub fn without_overlay(mut self) -> Self {
        self.overlay = false;
        self
    }

    /// Leave the overlay's close control out.
    #[must_use]
    pub fn without_close_control(mut self) -> Self {
        self.close_control = false;
        self
    }

    /// Number of `.skill-card` and `.portfolio-card` elements.
    #[must_use]
    pub fn cards(mut self, skills: usize, projects: usize) -> Self {
        self.skill_cards = skills;
        self.project_cards = projects;
        self
    }

    #[must_use]
    pub fn build(self) -> Portfolio {
        let mut dom = FakeDom::new();
        let body = dom.append(None, ElementSpec::new("body"));
        let header = dom.append(Some(body), ElementSpec::new("header"));

        let mut toggle = None;
        let mut overlay = None;
        let mut close = None;
        let mut nav_links = Vec::new();
        if self.overlay {
            toggle = Some(dom.append(
                Some(header),
                ElementSpec::new("button")
                    .class("nav-toggle")
                    .attr("aria-controls", "nav-overlay")
                    .attr("aria-expanded", "false"),
            ));
            let container = dom.append(
                Some(body),
                ElementSpec::new("div")
                    .id("nav-overlay")
                    .class("nav-overlay")
                    .attr("aria-hidden", "true"),
            );
            if self.close_control {
                close = Some(dom.append(
                    Some(container),
                    ElementSpec::new("button").class("nav-close"),
                ));
            }
            let list = dom.append(Some(container), ElementSpec::new("ul").class("nav-list"));
            for href in &self.nav_links {
                let item = dom.append(Some(list), ElementSpec::new("li"));
                nav_links.push(dom.append(Some(item), ElementSpec::new("a").href(href)));
            }
            overlay = Some(container);
        }

        let mut sections = BTreeMap::new();
        let mut section = |dom: &mut FakeDom, id: &str| {
            let node = dom.append(Some(body), ElementSpec::new("section").id(id));
            sections.insert(id.to_string(), node);
            node
        };

        let home = section(&mut dom, "home");
        let hero_cta = dom.append(Some(home), ElementSpec::new("a").class("cta").href("#projects"));

        let about = section(&mut dom, "about");
        let mut reveal_targets = vec![
            dom.append(Some(about), ElementSpec::new("div").class("about-photo")),
            dom.append(Some(about), ElementSpec::new("div").class("about-text")),
        ];

        let skills = section(&mut dom, "skills");
        for _ in 0..self.skill_cards {
            reveal_targets.push(dom.append(
                Some(skills),
                ElementSpec::new("div").class("skill-card"),
            ));
        }

        let experience = section(&mut dom, "experience");
        for _ in 0..2 {
            reveal_targets.push(dom.append(
                Some(experience),
                ElementSpec::new("div").class("experience-group"),
            ));
        }

        let projects = section(&mut dom, "projects");
        for _ in 0..self.project_cards {
            reveal_targets.push(dom.append(
                Some(projects),
                ElementSpec::new("div").class("portfolio-card"),
            ));
        }

        let contact = section(&mut dom, "contact");
        let empty_link = dom.append(Some(contact), ElementSpec::new("a").href("#"));

        let footer = dom.append(Some(body), ElementSpec::new("footer"));
        let back_to_top = dom.append(Some(footer), ElementSpec::new("a").href("#home"));

        Portfolio {
            dom,
            toggle,
            overlay,
            close,
            nav_links,
            sections,
            hero_cta,
            empty_link,
            back_to_top,
            reveal_targets,
        }
    }
}

/// A built page plus handles to its interesting elements.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub dom: FakeDom,
    pub toggle: Option<NodeId>,
    pub overlay: Option<NodeId>,
    pub close: Option<NodeId>,
    pub nav_links: Vec<NodeId>,
    pub sections: BTreeMap<String, NodeId>,
    /// `a.cta[href=#projects]` inside `#home`.
    pub hero_cta: NodeId,
    /// `a[href=#]` inside `#contact`.
    pub empty_link: NodeId,
    /// `a[href=#home]` in the footer.
    pub back_to_top: NodeId,
    /// Every reveal candidate, in document order.
    pub reveal_targets: Vec<NodeId>,
}

impl Portfolio {
    /// The default page.
    #[must_use]
    pub fn standard() -> Self {
        PortfolioBuilder::default().build()
    }

    #[must_use]
    pub fn builder() -> PortfolioBuilder {
        PortfolioBuilder::default()
    }

    /// Section by id.
    ///
    /// # Panics
    ///
    /// If the page has no such section.
    #[must_use]
    pub fn section(&self, id: &str) -> NodeId {
        match self.sections.get(id) {
            Some(node) => *node,
            None => panic!("fixture has no section #{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Dom, Selector};

    #[test]
    fn standard_page_matches_default_selectors() {
        let page = Portfolio::standard();
        let dom = &page.dom;
        let targets = Selector::parse(
            ".skill-card, .experience-group, .portfolio-card, .about-photo, .about-text",
        )
        .unwrap();
        assert_eq!(dom.query_all(None, &targets), page.reveal_targets);
        assert_eq!(page.reveal_targets.len(), 10);

        let fragments = Selector::parse("a[href^=\"#\"]").unwrap();
        assert_eq!(dom.query_all(None, &fragments).len(), 5 + 3);
        assert_eq!(page.sections.len(), 6);
    }

    #[test]
    fn builder_variants() {
        let bare = Portfolio::builder().without_overlay().build();
        assert!(bare.toggle.is_none());
        assert!(bare.nav_links.is_empty());

        let no_links = Portfolio::builder().nav_links(&[]).build();
        assert!(no_links.overlay.is_some());
        assert!(no_links.nav_links.is_empty());

        let small = Portfolio::builder().cards(1, 0).build();
        assert_eq!(small.reveal_targets.len(), 5);
    }

    #[test]
    #[should_panic(expected = "no section #blog")]
    fn unknown_section_panics() {
        let _ = Portfolio::standard().section("blog");
    }
}

#![forbid(unsafe_code)]

//! Test harness for folio pages.
//!
//! - [`fixture`]: the reference portfolio page on the in-memory DOM.
//! - [`driver`]: [`PageDriver`], a deterministic host with a virtual clock,
//!   default Tab navigation and keydown listener bookkeeping.
//! - [`strategies`]: `proptest` strategies for visitor sessions.
//!
//! ```
//! use folio_harness::{PageDriver, Portfolio};
//! use std::time::Duration;
//!
//! let site = Portfolio::standard();
//! let mut driver = PageDriver::mount(site.dom.clone()).unwrap();
//! driver.click(site.hero_cta);
//! driver.advance(Duration::from_millis(600));
//! assert_eq!(driver.focused(), Some(site.section("projects")));
//! ```

pub mod driver;
pub mod fixture;
pub mod strategies;

pub use driver::{FakePage, PageDriver, TraceEvent};
pub use fixture::{Portfolio, PortfolioBuilder};
pub use strategies::Action;

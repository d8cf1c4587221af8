#![forbid(unsafe_code)]

//! Runtime glue for folio pages.
//!
//! [`Page`] mounts the behaviors from `folio-widgets` and dispatches host
//! events to them. [`TimerQueue`] holds deferred focus requests for hosts
//! that drive their own clock (tests, the simulated host in
//! `folio-harness`); the browser host uses `setTimeout` instead.
//!
//! The runtime always emits `tracing` events; enable the `tracing` feature to
//! get the behavior units' own instrumentation too.

pub mod page;
pub mod timer;

pub use page::{Activation, KeyDown, Page, PageError};
pub use timer::{TimerId, TimerQueue};

//! Sondear: browser end-to-end harness for the QA Automation Sandbox.
//!
//! Drives a headless Chromium session against the sandbox site and verifies
//! its pages through page objects. The crate supplies the glue — locators,
//! page models, fixtures, a named-step verification pipeline, and HTML/JSON
//! reporting — while the browser itself (navigation, waiting, input) stays
//! behind a thin CDP facade.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────┐
//! │ Scenario   │───►│ Page Model  │───►│ Headless   │
//! │ (harness)  │    │ (locators,  │    │ Browser    │
//! │            │    │  actions)   │    │ (chromium) │
//! └────────────┘    └─────────────┘    └────────────┘
//!        │                 │
//!        ▼                 ▼
//!   Reporter          FixtureStore
//!   (HTML/JSON)       (texts.json)
//! ```
//!
//! Enable the `browser` feature for live CDP control; without it, a
//! scriptable mock page backs the same API for deterministic unit tests.

#![warn(missing_docs)]

mod browser;
mod checks;
mod config;
mod fixture;
mod harness;
mod locator;
mod page_object;
mod reporter;
mod result;
mod wait;

/// Logging setup for binaries and examples
pub mod logging;

/// Page models for the sandbox site
pub mod pages;

pub use browser::{Browser, BrowserConfig, Page};
#[cfg(not(feature = "browser"))]
pub use browser::MockElement;
pub use checks::{CheckResult, CheckStatus, Verification};
pub use config::{HarnessConfig, HarnessConfigBuilder, ReporterOptions, DEFAULT_BASE_URL};
pub use fixture::FixtureStore;
pub use harness::{pattern_matches, Harness};
pub use locator::{Locator, LocatorOptions, Selector};
pub use page_object::{PageObject, UrlMatcher};
pub use reporter::{
    FailureMode, ReportArtifacts, Reporter, ScenarioResult, TestStatus,
};
pub use result::{SondearError, SondearResult};
pub use wait::{wait_until, WaitOptions};

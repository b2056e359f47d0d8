//! Locator abstraction for element selection.
//!
//! A locator pairs a semantic name's query expression with wait options. It
//! is a description, not a handle: every action and assertion re-queries the
//! live page, because the page under test is mutable and reactive. Zero
//! matches raise nothing at construction time; absence surfaces only when a
//! subsequent action or assertion times out.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Test ID selector (`data-testid` attribute)
    TestId(String),
    /// CSS selector (e.g. `button.primary`)
    Css(String),
    /// Text content selector
    Text(String),
}

impl Selector {
    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::TestId(id) => format!("[data-testid=\"{id}\"]"),
            Self::Css(s) => s.clone(),
            Self::Text(t) => format!("text \"{t}\""),
        }
    }

    /// JavaScript expression resolving to the first matching element (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::TestId(id) => format!("document.querySelector('[data-testid={id:?}]')"),
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).find(el => el.textContent.includes({t:?}))"
            ),
        }
    }

    /// JavaScript expression counting matching elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::TestId(id) => format!("document.querySelectorAll('[data-testid={id:?}]').length"),
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => el.textContent.includes({t:?})).length"
            ),
        }
    }

    /// JavaScript expression testing that the first match is rendered visible
    #[must_use]
    pub fn to_visibility_query(&self) -> String {
        format!(
            "(() => {{ const el = {query}; if (!el) return false; \
             const r = el.getBoundingClientRect(); const s = getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; }})()",
            query = self.to_query()
        )
    }

    /// JavaScript expression returning the first match's exact `textContent`
    ///
    /// Returns null when nothing matches; the text itself is not trimmed or
    /// normalized in any way.
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const el = {query}; return el ? el.textContent : null; }})()",
            query = self.to_query()
        )
    }

    /// JavaScript expression clicking the first match
    ///
    /// Returns true on dispatch, false when nothing matched.
    #[must_use]
    pub fn to_click_query(&self) -> String {
        format!(
            "(() => {{ const el = {query}; if (!el) return false; el.click(); return true; }})()",
            query = self.to_query()
        )
    }
}

/// Locator options for wait behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting, in milliseconds
    pub timeout_ms: u64,
    /// Polling interval for auto-waiting, in milliseconds
    pub poll_interval_ms: u64,
    /// Whether actions require the element to be visible first
    pub visible: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            visible: true,
        }
    }
}

impl LocatorOptions {
    /// Timeout as a Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// A re-queryable description of one page element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a locator from a selector with default options
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Create a locator for a `data-testid` value
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::new(Selector::test_id(id))
    }

    /// Set a custom wait timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the visibility requirement for actions
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.options.visible = visible;
        self
    }

    /// The selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The wait options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        self.selector.describe()
    }
}

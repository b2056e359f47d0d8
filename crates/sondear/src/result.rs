//! Result and error types for Sondear.
//!
//! The error taxonomy mirrors what the driver surfaces: launch failures,
//! navigation failures, missing elements, timed-out waits, and assertion
//! mismatches. Nothing here retries or translates; every failure propagates
//! unchanged to the harness, which marks the scenario failed.

use thiserror::Error;

/// Result type for Sondear operations
pub type SondearResult<T> = Result<T, SondearError>;

/// Errors that can occur while driving the browser or verifying a page
#[derive(Debug, Error)]
pub enum SondearError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page-level error (evaluation, protocol)
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a selector
    #[error("No element matched selector {selector}")]
    ElementNotFound {
        /// The selector that matched nothing
        selector: String,
    },

    /// A wait condition did not hold within its timeout
    #[error("Timed out after {ms}ms waiting for {condition}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// The condition that was being waited on
        condition: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// Fixture could not be loaded or resolved
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SondearError {
    /// Whether this error is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error is an assertion mismatch
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}

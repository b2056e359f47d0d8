//! Wait mechanisms for synchronization with the live page.
//!
//! One polling primitive: evaluate a probe until it holds or the timeout
//! elapses. This is the only retry behavior anywhere in the crate; callers
//! never layer their own recovery on top of it.

use crate::locator::LocatorOptions;
use crate::result::{SondearError, SondearResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl From<&LocatorOptions> for WaitOptions {
    fn from(options: &LocatorOptions) -> Self {
        Self {
            timeout_ms: options.timeout_ms,
            poll_interval_ms: options.poll_interval_ms,
        }
    }
}

/// Poll `probe` until it returns true or the timeout elapses.
///
/// `condition` names what is being waited on; it appears verbatim in the
/// timeout error. Probe errors propagate immediately without further polling.
///
/// # Errors
///
/// Returns `Timeout` when the condition never held, or the probe's own error.
pub async fn wait_until<F, Fut>(
    condition: &str,
    options: &WaitOptions,
    mut probe: F,
) -> SondearResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SondearResult<bool>>,
{
    let started = Instant::now();
    loop {
        if probe().await? {
            return Ok(());
        }
        if started.elapsed() >= options.timeout() {
            return Err(SondearError::Timeout {
                ms: options.timeout_ms,
                condition: condition.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

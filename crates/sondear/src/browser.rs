//! Browser control for headless testing.
//!
//! A thin facade over the Chrome DevTools Protocol. With the `browser`
//! feature enabled it drives a real Chromium via chromiumoxide; without it,
//! a scriptable mock stands in so the page-object layer and verification
//! pipeline can be exercised deterministically in unit tests.
//!
//! All element queries go through JavaScript expressions generated by
//! [`crate::locator::Selector`]; nothing holds a resolved element handle
//! across calls.

use crate::result::{SondearError, SondearResult};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, SondearError, SondearResult};
    use crate::locator::Locator;
    use crate::wait::{wait_until, WaitOptions};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> SondearResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|e| SondearError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| SondearError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            tracing::debug!(
                headless = config.headless,
                width = config.viewport_width,
                height = config.viewport_height,
                "browser launched"
            );

            // Drive the CDP event stream for the lifetime of the browser
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if the page cannot be created
        pub async fn new_page(&self) -> SondearResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| SondearError::Page {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns error if shutdown fails
        pub async fn close(self) -> SondearResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| SondearError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a live CDP connection
    #[derive(Debug)]
    pub struct Page {
        /// Page width
        pub width: u32,
        /// Page height
        pub height: u32,
        url: String,
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Returns a `Navigation` error if the load fails
        pub async fn goto(&mut self, url: &str) -> SondearResult<()> {
            tracing::debug!(url, "navigating");
            {
                let page = self.inner.lock().await;
                page.goto(url)
                    .await
                    .map_err(|e| SondearError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
            }
            self.url = url.to_string();
            Ok(())
        }

        /// Evaluate a JavaScript expression on the live page
        ///
        /// # Errors
        ///
        /// Returns a `Page` error if evaluation fails or the result does not
        /// deserialize into `T`
        pub async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> SondearResult<T> {
            let page = self.inner.lock().await;
            let result = page.evaluate(expr).await.map_err(|e| SondearError::Page {
                message: e.to_string(),
            })?;
            result.into_value().map_err(|e| SondearError::Page {
                message: e.to_string(),
            })
        }

        /// Whether the locator currently matches a rendered, visible element
        ///
        /// # Errors
        ///
        /// Returns a `Page` error if evaluation fails
        pub async fn is_visible(&self, locator: &Locator) -> SondearResult<bool> {
            self.eval(&locator.selector().to_visibility_query()).await
        }

        /// Wait until the locator matches a visible element
        ///
        /// # Errors
        ///
        /// Returns `Timeout` when the element never becomes visible within
        /// the locator's timeout
        pub async fn wait_for_visible(&self, locator: &Locator) -> SondearResult<()> {
            let condition = format!("{} visible", locator.describe());
            let options = WaitOptions::from(locator.options());
            wait_until(&condition, &options, || self.is_visible(locator)).await
        }

        /// Click the element the locator matches
        ///
        /// Waits for the element to be visible first (per the locator's
        /// options), then dispatches a click. A hidden element fails with a
        /// `Timeout`, never a silent no-op.
        ///
        /// # Errors
        ///
        /// Returns `Timeout` if the element never becomes actionable, or
        /// `ElementNotFound` if it vanishes between the wait and the click
        pub async fn click(&mut self, locator: &Locator) -> SondearResult<()> {
            if locator.options().visible {
                self.wait_for_visible(locator).await?;
            }
            tracing::debug!(selector = %locator.describe(), "click");
            let clicked: bool = self.eval(&locator.selector().to_click_query()).await?;
            if clicked {
                Ok(())
            } else {
                Err(SondearError::ElementNotFound {
                    selector: locator.describe(),
                })
            }
        }

        /// Exact `textContent` of the matched element, untrimmed
        ///
        /// # Errors
        ///
        /// Returns `ElementNotFound` when nothing matches
        pub async fn text_content(&self, locator: &Locator) -> SondearResult<String> {
            let text: Option<String> = self.eval(&locator.selector().to_text_query()).await?;
            text.ok_or_else(|| SondearError::ElementNotFound {
                selector: locator.describe(),
            })
        }

        /// Number of elements currently matching the locator
        ///
        /// # Errors
        ///
        /// Returns a `Page` error if evaluation fails
        pub async fn count(&self, locator: &Locator) -> SondearResult<u64> {
            self.eval(&locator.selector().to_count_query()).await
        }

        /// Capture a PNG screenshot of the current page state
        ///
        /// # Errors
        ///
        /// Returns a `Screenshot` error if capture fails
        pub async fn screenshot(&self) -> SondearResult<Vec<u8>> {
            let page = self.inner.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                page.execute(params)
                    .await
                    .map_err(|e| SondearError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| SondearError::Screenshot {
                    message: e.to_string(),
                })
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// ============================================================================
// Mock implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, SondearError, SondearResult};
    use crate::locator::{Locator, Selector};
    use std::collections::HashMap;

    /// A scripted element in the mock page
    #[derive(Debug, Clone)]
    pub struct MockElement {
        /// Whether the element is rendered visible
        pub visible: bool,
        /// The element's exact text content
        pub text: String,
    }

    impl MockElement {
        /// A visible element with the given text
        #[must_use]
        pub fn visible(text: impl Into<String>) -> Self {
            Self {
                visible: true,
                text: text.into(),
            }
        }

        /// A hidden element with the given text
        #[must_use]
        pub fn hidden(text: impl Into<String>) -> Self {
            Self {
                visible: false,
                text: text.into(),
            }
        }
    }

    /// Browser instance (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance (mock)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn launch(config: BrowserConfig) -> SondearResult<Self> {
            Ok(Self { config })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn new_page(&self) -> SondearResult<Page> {
            Ok(Page::new(
                self.config.viewport_width,
                self.config.viewport_height,
            ))
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn close(self) -> SondearResult<()> {
            Ok(())
        }
    }

    /// A scriptable page standing in for the real driver.
    ///
    /// Elements are registered under their `data-testid` value (or raw CSS
    /// string); queries resolve against that registry. The failure semantics
    /// match the live driver: acting on a hidden or absent element times out
    /// rather than silently succeeding.
    #[derive(Debug)]
    pub struct Page {
        /// Page width
        pub width: u32,
        /// Page height
        pub height: u32,
        url: String,
        elements: HashMap<String, MockElement>,
        clicks: Vec<String>,
    }

    impl Page {
        /// Create a new empty mock page
        #[must_use]
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                url: String::from("about:blank"),
                elements: HashMap::new(),
                clicks: Vec::new(),
            }
        }

        /// Register an element under a `data-testid` value or CSS string
        pub fn insert_element(&mut self, key: impl Into<String>, element: MockElement) {
            let _ = self.elements.insert(key.into(), element);
        }

        /// Selectors clicked so far, in order
        #[must_use]
        pub fn clicks(&self) -> &[String] {
            &self.clicks
        }

        fn resolve(&self, locator: &Locator) -> Option<&MockElement> {
            match locator.selector() {
                Selector::TestId(id) => self.elements.get(id),
                Selector::Css(css) => self.elements.get(css),
                Selector::Text(text) => self.elements.values().find(|el| el.text.contains(text)),
            }
        }

        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn goto(&mut self, url: &str) -> SondearResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        /// Evaluate a JavaScript expression (unsupported in mock mode)
        ///
        /// # Errors
        ///
        /// Always fails; enable the `browser` feature for live evaluation
        pub async fn eval<T: serde::de::DeserializeOwned>(&self, _expr: &str) -> SondearResult<T> {
            Err(SondearError::Page {
                message: "No browser connection. Enable the 'browser' feature for live evaluation."
                    .to_string(),
            })
        }

        /// Whether the locator currently matches a visible element
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn is_visible(&self, locator: &Locator) -> SondearResult<bool> {
            Ok(self.resolve(locator).is_some_and(|el| el.visible))
        }

        /// Wait until the locator matches a visible element
        ///
        /// The mock does not actually wait; an invisible or absent element
        /// fails immediately with the timeout the live driver would report.
        ///
        /// # Errors
        ///
        /// Returns `Timeout` when the element is not visible
        pub async fn wait_for_visible(&self, locator: &Locator) -> SondearResult<()> {
            if self.is_visible(locator).await? {
                Ok(())
            } else {
                Err(SondearError::Timeout {
                    ms: locator.options().timeout_ms,
                    condition: format!("{} visible", locator.describe()),
                })
            }
        }

        /// Click the element the locator matches
        ///
        /// # Errors
        ///
        /// Returns `Timeout` when the element is hidden or absent
        pub async fn click(&mut self, locator: &Locator) -> SondearResult<()> {
            if locator.options().visible {
                self.wait_for_visible(locator).await?;
            } else if self.resolve(locator).is_none() {
                return Err(SondearError::ElementNotFound {
                    selector: locator.describe(),
                });
            }
            self.clicks.push(locator.describe());
            Ok(())
        }

        /// Exact text content of the matched element, untrimmed
        ///
        /// # Errors
        ///
        /// Returns `ElementNotFound` when nothing matches
        pub async fn text_content(&self, locator: &Locator) -> SondearResult<String> {
            self.resolve(locator)
                .map(|el| el.text.clone())
                .ok_or_else(|| SondearError::ElementNotFound {
                    selector: locator.describe(),
                })
        }

        /// Number of elements currently matching the locator
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn count(&self, locator: &Locator) -> SondearResult<u64> {
            let n = match locator.selector() {
                Selector::TestId(id) => u64::from(self.elements.contains_key(id)),
                Selector::Css(css) => u64::from(self.elements.contains_key(css)),
                Selector::Text(text) => self
                    .elements
                    .values()
                    .filter(|el| el.text.contains(text))
                    .count() as u64,
            };
            Ok(n)
        }

        /// Capture a screenshot (empty in mock mode)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn screenshot(&self) -> SondearResult<Vec<u8>> {
            Ok(vec![])
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, MockElement, Page};

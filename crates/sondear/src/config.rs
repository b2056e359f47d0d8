//! Harness configuration.
//!
//! A static record of runner and reporter options, consumed once at harness
//! startup. The defaults reproduce the sandbox suite's original settings
//! verbatim; nothing here validates or transforms at runtime beyond joining
//! relative page paths onto the base URL.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default navigation root for the suite
pub const DEFAULT_BASE_URL: &str = "https://qa-automation-sandbox.vercel.app/";

/// Options for report artifact emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterOptions {
    /// Directory report artifacts are written under
    pub report_dir: PathBuf,
    /// Overwrite a fixed filename instead of appending a timestamp
    pub overwrite: bool,
    /// Emit the HTML artifact
    pub html: bool,
    /// Emit the JSON artifact
    pub json: bool,
    /// chrono format string for the filename timestamp component
    pub timestamp: String,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("reports"),
            overwrite: false,
            html: true,
            json: true,
            timestamp: "%m%d%Y_%H%M%S".to_string(),
        }
    }
}

/// Static configuration for a test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Navigation root used by relative visits
    pub base_url: String,
    /// Fixed rendering surface width
    pub viewport_width: u32,
    /// Fixed rendering surface height
    pub viewport_height: u32,
    /// Pattern selecting which scenarios the harness runs
    pub spec_pattern: String,
    /// Record session video (owned by the driver; carried, not interpreted)
    pub video: bool,
    /// Capture a screenshot artifact when a scenario fails
    pub screenshot_on_run_failure: bool,
    /// Directory fixture files are loaded from
    pub fixtures_dir: PathBuf,
    /// Name of the report-generation plugin
    pub reporter: String,
    /// Options handed to the reporter
    pub reporter_options: ReporterOptions,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
            spec_pattern: "specs/**".to_string(),
            video: false,
            screenshot_on_run_failure: true,
            fixtures_dir: PathBuf::from("fixtures"),
            reporter: "informe".to_string(),
            reporter_options: ReporterOptions::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    /// Join a relative page path onto the base URL
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Builder for `HarnessConfig`
#[derive(Debug, Clone, Default)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    /// Set the scenario selection pattern
    #[must_use]
    pub fn spec_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.spec_pattern = pattern.into();
        self
    }

    /// Enable/disable session video recording
    #[must_use]
    pub const fn video(mut self, enabled: bool) -> Self {
        self.config.video = enabled;
        self
    }

    /// Enable/disable screenshot capture on scenario failure
    #[must_use]
    pub const fn screenshot_on_run_failure(mut self, enabled: bool) -> Self {
        self.config.screenshot_on_run_failure = enabled;
        self
    }

    /// Set the fixtures directory
    #[must_use]
    pub fn fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.fixtures_dir = dir.into();
        self
    }

    /// Set the reporter plugin name
    #[must_use]
    pub fn reporter(mut self, name: impl Into<String>) -> Self {
        self.config.reporter = name.into();
        self
    }

    /// Set the reporter options
    #[must_use]
    pub fn reporter_options(mut self, options: ReporterOptions) -> Self {
        self.config.reporter_options = options;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> HarnessConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_suite_settings() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.viewport_width, 1920);
        assert_eq!(config.viewport_height, 1080);
        assert!(!config.video);
        assert!(config.screenshot_on_run_failure);
        assert_eq!(config.reporter, "informe");
    }

    #[test]
    fn test_reporter_options_defaults() {
        let options = ReporterOptions::default();
        assert_eq!(options.report_dir, PathBuf::from("reports"));
        assert!(!options.overwrite);
        assert!(options.html);
        assert!(options.json);
        assert_eq!(options.timestamp, "%m%d%Y_%H%M%S");
    }

    #[test]
    fn test_page_url_joins_without_double_slash() {
        let config = HarnessConfig::default();
        assert_eq!(
            config.page_url("/"),
            "https://qa-automation-sandbox.vercel.app/"
        );
        assert_eq!(
            config.page_url("/playground"),
            "https://qa-automation-sandbox.vercel.app/playground"
        );
        assert_eq!(
            config.page_url("playground"),
            "https://qa-automation-sandbox.vercel.app/playground"
        );
    }

    #[test]
    fn test_builder_chain() {
        let config = HarnessConfig::builder()
            .base_url("http://localhost:3000")
            .viewport(1280, 720)
            .spec_pattern("specs/home*")
            .video(true)
            .screenshot_on_run_failure(false)
            .build();

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 720);
        assert_eq!(config.spec_pattern, "specs/home*");
        assert!(config.video);
        assert!(!config.screenshot_on_run_failure);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = HarnessConfig::builder()
            .base_url("http://localhost:8080")
            .reporter_options(ReporterOptions {
                overwrite: true,
                ..ReporterOptions::default()
            })
            .build();

        let json = serde_json::to_string(&config).unwrap();
        let back: HarnessConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.base_url, "http://localhost:8080");
        assert!(back.reporter_options.overwrite);
    }
}

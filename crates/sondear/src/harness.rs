//! Scenario harness.
//!
//! Owns the run lifecycle: browser launch, fixture store, reporter, the
//! spec-pattern filter, and artifact emission at the end. Scenarios execute
//! strictly sequentially; every scenario gets a fresh page, and the page
//! models it uses are constructed per run, so nothing leaks across
//! scenarios. The harness does bookkeeping only — scenario bodies drive the
//! page themselves and hand their outcome back for recording.

use crate::browser::{Browser, BrowserConfig, Page};
use crate::checks::Verification;
use crate::config::HarnessConfig;
use crate::fixture::FixtureStore;
use crate::reporter::{
    write_screenshot, FailureMode, ReportArtifacts, Reporter, ScenarioResult,
};
use crate::result::SondearResult;
use std::time::Instant;

/// Runs scenarios against one browser session
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    fixtures: FixtureStore,
    reporter: Reporter,
    browser: Browser,
}

impl Harness {
    /// Launch a harness with a browser sized to the configured viewport
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch(config: HarnessConfig) -> SondearResult<Self> {
        let browser_config = BrowserConfig::default()
            .with_viewport(config.viewport_width, config.viewport_height);
        Self::launch_with(config, browser_config).await
    }

    /// Launch with an explicit browser configuration (CI sandboxing, custom
    /// chromium path)
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch_with(
        config: HarnessConfig,
        browser_config: BrowserConfig,
    ) -> SondearResult<Self> {
        tracing::info!(
            base_url = %config.base_url,
            spec_pattern = %config.spec_pattern,
            video = config.video,
            "starting run"
        );

        let browser = Browser::launch(browser_config).await?;
        let fixtures = FixtureStore::new(config.fixtures_dir.clone());
        let mut reporter = Reporter::new();
        reporter.start();

        Ok(Self {
            config,
            fixtures,
            reporter,
            browser,
        })
    }

    /// Abort the run on the first failing scenario
    #[must_use]
    pub fn fail_fast(mut self) -> Self {
        self.reporter = std::mem::take(&mut self.reporter).with_failure_mode(FailureMode::FailFast);
        self
    }

    /// The run configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The fixture store
    #[must_use]
    pub const fn fixtures(&self) -> &FixtureStore {
        &self.fixtures
    }

    /// The reporter
    #[must_use]
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Whether a spec path is selected by the configured pattern
    #[must_use]
    pub fn should_run(&self, spec: &str) -> bool {
        pattern_matches(&self.config.spec_pattern, spec)
    }

    /// Record a scenario as skipped (filtered out by the spec pattern)
    ///
    /// # Errors
    ///
    /// Never fails in collect-all mode
    pub fn skip(&mut self, spec: &str, name: &str) -> SondearResult<()> {
        tracing::debug!(spec, name, "scenario skipped");
        self.reporter.record(ScenarioResult::skipped(spec, name))
    }

    /// Create a fresh page for the next scenario
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be created
    pub async fn new_page(&self) -> SondearResult<Page> {
        self.browser.new_page().await
    }

    /// Record a scenario that ran a verification pipeline.
    ///
    /// The executed steps are attached to the result; the first failing step
    /// becomes the scenario error.
    ///
    /// # Errors
    ///
    /// In fail-fast mode, propagates the failure to abort the run
    pub async fn record_verification(
        &mut self,
        spec: &str,
        name: &str,
        started: Instant,
        verification: &Verification,
        page: &Page,
    ) -> SondearResult<()> {
        let duration = started.elapsed();
        let result = match verification.to_result() {
            Ok(()) => ScenarioResult::passed(spec, name, duration),
            Err(e) => ScenarioResult::failed(spec, name, duration, e.to_string()),
        }
        .with_checks(verification.checks().to_vec());
        self.finish_scenario(result, page).await
    }

    /// Record a scenario from a plain outcome (navigation, clicks).
    ///
    /// # Errors
    ///
    /// In fail-fast mode, propagates the failure to abort the run
    pub async fn record_outcome(
        &mut self,
        spec: &str,
        name: &str,
        started: Instant,
        outcome: SondearResult<()>,
        page: &Page,
    ) -> SondearResult<()> {
        let duration = started.elapsed();
        let result = match outcome {
            Ok(()) => ScenarioResult::passed(spec, name, duration),
            Err(e) => ScenarioResult::failed(spec, name, duration, e.to_string()),
        };
        self.finish_scenario(result, page).await
    }

    async fn finish_scenario(
        &mut self,
        mut result: ScenarioResult,
        page: &Page,
    ) -> SondearResult<()> {
        if result.status.is_failed() {
            tracing::warn!(
                scenario = %result.name,
                error = result.error.as_deref().unwrap_or(""),
                "scenario failed"
            );
            if self.config.screenshot_on_run_failure {
                match page.screenshot().await {
                    Ok(png) if !png.is_empty() => {
                        match write_screenshot(
                            &self.config.reporter_options,
                            &result.name,
                            &png,
                        ) {
                            Ok(path) => result = result.with_screenshot(path),
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to write failure screenshot");
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "failed to capture failure screenshot"),
                }
            }
        } else {
            tracing::info!(scenario = %result.name, "scenario passed");
        }

        self.reporter.record(result)
    }

    /// Write report artifacts and shut the browser down.
    ///
    /// # Errors
    ///
    /// Returns error if artifact writing or browser shutdown fails
    pub async fn finish(self) -> SondearResult<ReportArtifacts> {
        tracing::info!(summary = %self.reporter.summary(), "run finished");
        let artifacts = self.reporter.write(&self.config.reporter_options)?;
        self.browser.close().await?;
        Ok(artifacts)
    }
}

/// Match a spec path against a pattern.
///
/// `*` matches one path segment (or part of one); `**` matches any number of
/// segments, including none.
#[must_use]
pub fn pattern_matches(pattern: &str, spec: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let spec_segments: Vec<&str> = spec.split('/').filter(|s| !s.is_empty()).collect();
    segments_match(&pattern_segments, &spec_segments)
}

fn segments_match(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|i| segments_match(rest, &path[i..])),
        Some((&segment, rest)) => match path.split_first() {
            Some((&actual, path_rest)) => {
                segment_matches(segment, actual) && segments_match(rest, path_rest)
            }
            None => false,
        },
    }
}

/// Match one segment, honoring embedded `*` wildcards
fn segment_matches(pattern: &str, actual: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == actual;
    }

    let mut remaining = actual;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match remaining.strip_prefix(part) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return remaining.ends_with(part);
        } else {
            match remaining.find(part) {
                Some(idx) => remaining = &remaining[idx + part.len()..],
                None => return false,
            }
        }
    }
    // Pattern ended with '*'
    true
}

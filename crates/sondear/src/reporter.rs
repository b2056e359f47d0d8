//! Test reporting and artifact emission.
//!
//! The reporter collects scenario results and renders them as a
//! self-contained HTML page and a JSON document (stats + per-suite results,
//! the shape report dashboards consume). Artifact filenames carry a
//! timestamp component unless `overwrite` is set.

use crate::checks::CheckResult;
use crate::config::ReporterOptions;
use crate::result::{SondearError, SondearResult};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Failure mode for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Keep running remaining scenarios after a failure (runner default)
    #[default]
    CollectAll,
    /// Abort the run on the first failing scenario
    FailFast,
}

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
    /// Scenario was skipped (filtered out by the spec pattern)
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Result of one executed scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Spec path the scenario belongs to, e.g. "specs/home"
    pub spec: String,
    /// Scenario name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Wall-clock duration
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Executed verification steps, if the scenario ran a pipeline
    pub checks: Vec<CheckResult>,
    /// Failure screenshot artifact path, if one was captured
    pub screenshot: Option<PathBuf>,
    /// When the scenario completed
    pub completed_at: SystemTime,
}

impl ScenarioResult {
    /// Create a passing scenario result
    #[must_use]
    pub fn passed(spec: impl Into<String>, name: impl Into<String>, duration: Duration) -> Self {
        Self {
            spec: spec.into(),
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            checks: Vec::new(),
            screenshot: None,
            completed_at: SystemTime::now(),
        }
    }

    /// Create a failing scenario result
    #[must_use]
    pub fn failed(
        spec: impl Into<String>,
        name: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            spec: spec.into(),
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            checks: Vec::new(),
            screenshot: None,
            completed_at: SystemTime::now(),
        }
    }

    /// Create a skipped scenario result
    #[must_use]
    pub fn skipped(spec: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            checks: Vec::new(),
            screenshot: None,
            completed_at: SystemTime::now(),
        }
    }

    /// Attach the executed verification steps
    #[must_use]
    pub fn with_checks(mut self, checks: Vec<CheckResult>) -> Self {
        self.checks = checks;
        self
    }

    /// Attach a failure screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot = Some(path.into());
        self
    }
}

/// Paths of the artifacts a run produced
#[derive(Debug, Clone, Default)]
pub struct ReportArtifacts {
    /// HTML report path, when emitted
    pub html: Option<PathBuf>,
    /// JSON report path, when emitted
    pub json: Option<PathBuf>,
}

/// Collects scenario results and emits report artifacts
#[derive(Debug, Default)]
pub struct Reporter {
    results: Vec<ScenarioResult>,
    failure_mode: FailureMode,
    suite_name: String,
    started_at: Option<SystemTime>,
}

impl Reporter {
    /// Create a reporter that keeps running after failures
    #[must_use]
    pub fn new() -> Self {
        Self {
            suite_name: "QA Automation Sandbox".to_string(),
            ..Default::default()
        }
    }

    /// Create a reporter that aborts the run on the first failure
    #[must_use]
    pub fn fail_fast() -> Self {
        Self {
            failure_mode: FailureMode::FailFast,
            suite_name: "QA Automation Sandbox".to_string(),
            ..Default::default()
        }
    }

    /// Set the suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Mark the start of the run
    pub fn start(&mut self) {
        self.started_at = Some(SystemTime::now());
    }

    /// Record a scenario result
    ///
    /// # Errors
    ///
    /// In fail-fast mode, returns an `Assertion` error when the scenario
    /// failed, aborting the run
    pub fn record(&mut self, result: ScenarioResult) -> SondearResult<()> {
        let failure = result
            .status
            .is_failed()
            .then(|| (result.name.clone(), result.error.clone().unwrap_or_default()));

        self.results.push(result);

        if self.failure_mode == FailureMode::FailFast {
            if let Some((name, error)) = failure {
                return Err(SondearError::Assertion {
                    message: format!("fail-fast: scenario '{name}' failed: {error}"),
                });
            }
        }

        Ok(())
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Total scenario count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Pass rate over executed scenarios (0.0 to 1.0; empty runs pass)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.total_count() - self.skipped_count();
        if executed == 0 {
            return 1.0;
        }
        self.passed_count() as f64 / executed as f64
    }

    /// Whether no scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Total duration across scenarios
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// All recorded results
    #[must_use]
    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    /// Failing results only
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// One-line run summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        )
    }

    /// Render the JSON report document
    ///
    /// # Errors
    ///
    /// Returns a JSON error if serialization fails
    pub fn render_json(&self) -> SondearResult<String> {
        let document = self.build_document();
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn build_document(&self) -> ReportDocument {
        let start: DateTime<Utc> = self.started_at.unwrap_or_else(SystemTime::now).into();
        let end: DateTime<Utc> = self
            .results
            .iter()
            .map(|r| r.completed_at)
            .max()
            .unwrap_or_else(SystemTime::now)
            .into();

        // Group scenarios by spec path; each spec becomes one suite entry.
        let mut suites: Vec<SuiteReport> = Vec::new();
        for result in &self.results {
            let test = TestReport {
                uuid: Uuid::new_v4(),
                title: result.name.clone(),
                state: result.status,
                duration_ms: result.duration.as_millis() as u64,
                err: result.error.clone(),
                checks: result.checks.clone(),
                screenshot: result
                    .screenshot
                    .as_ref()
                    .map(|p| p.display().to_string()),
            };
            match suites.iter_mut().find(|s| s.title == result.spec) {
                Some(suite) => suite.tests.push(test),
                None => suites.push(SuiteReport {
                    uuid: Uuid::new_v4(),
                    title: result.spec.clone(),
                    tests: vec![test],
                }),
            }
        }

        ReportDocument {
            stats: ReportStats {
                suites: suites.len(),
                tests: self.total_count(),
                passes: self.passed_count(),
                failures: self.failed_count(),
                skipped: self.skipped_count(),
                pass_percent: self.pass_rate() * 100.0,
                duration_ms: self.total_duration().as_millis() as u64,
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            },
            results: suites,
        }
    }

    /// Render the HTML report content
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        html.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Sondear Test Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .progress-bar { background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }
        .passed { background: #4caf50; height: 100%; }
        .scenario { padding: 10px; margin: 5px 0; border-radius: 4px; }
        .scenario.pass { background: #e8f5e9; border-left: 4px solid #4caf50; }
        .scenario.fail { background: #ffebee; border-left: 4px solid #f44336; }
        .scenario.skip { background: #fff3e0; border-left: 4px solid #ff9800; }
        .spec { color: #666; font-size: 0.85em; }
        .error { color: #d32f2f; font-family: monospace; white-space: pre-wrap; }
        .checks { margin: 6px 0 0 12px; font-size: 0.9em; }
        .checks li.failed { color: #d32f2f; }
    </style>
</head>
<body>
"#,
        );

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>Results: {}/{} passed ({:.1}%)</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {:.1}%"></div>
    </div>
    <p>Duration: {:.2}s</p>
</div>
"#,
            escape_html(&self.suite_name),
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0,
            self.pass_rate() * 100.0,
            self.total_duration().as_secs_f64()
        ));

        html.push_str("<h2>Scenarios</h2>\n");
        for result in &self.results {
            let class = match result.status {
                TestStatus::Passed => "pass",
                TestStatus::Failed => "fail",
                TestStatus::Skipped => "skip",
            };

            html.push_str(&format!(
                r#"<div class="scenario {}">
    <strong>{}</strong> <span class="spec">({})</span> - {:?} ({:.2}ms)
"#,
                class,
                escape_html(&result.name),
                escape_html(&result.spec),
                result.status,
                result.duration.as_secs_f64() * 1000.0
            ));

            if let Some(error) = &result.error {
                html.push_str(&format!(
                    "    <div class=\"error\">{}</div>\n",
                    escape_html(error)
                ));
            }

            // Per-check breakdown, shown for scenarios that ran a pipeline
            // and did not pass cleanly.
            if !result.checks.is_empty() && result.status.is_failed() {
                html.push_str("    <ul class=\"checks\">\n");
                for check in &result.checks {
                    let check_class = match check.status {
                        crate::checks::CheckStatus::Passed => "passed",
                        crate::checks::CheckStatus::Failed => "failed",
                    };
                    html.push_str(&format!(
                        "        <li class=\"{}\">{}{}</li>\n",
                        check_class,
                        escape_html(&check.name),
                        check
                            .message
                            .as_ref()
                            .map(|m| format!(": {}", escape_html(m)))
                            .unwrap_or_default()
                    ));
                }
                html.push_str("    </ul>\n");
            }

            html.push_str("</div>\n");
        }

        html.push_str(
            r#"
<footer>
    <p>Generated by Sondear</p>
</footer>
</body>
</html>
"#,
        );

        html
    }

    /// Write the configured artifacts under the report directory.
    ///
    /// When `overwrite` is false the filename carries a timestamp rendered
    /// with the configured chrono format, so prior artifacts survive.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or files cannot be written
    pub fn write(&self, options: &ReporterOptions) -> SondearResult<ReportArtifacts> {
        std::fs::create_dir_all(&options.report_dir)?;

        let stem = if options.overwrite {
            "report".to_string()
        } else {
            format!("report_{}", Local::now().format(&options.timestamp))
        };

        let mut artifacts = ReportArtifacts::default();

        if options.html {
            let path = options.report_dir.join(format!("{stem}.html"));
            std::fs::write(&path, self.render_html())?;
            tracing::info!(path = %path.display(), "HTML report written");
            artifacts.html = Some(path);
        }

        if options.json {
            let path = options.report_dir.join(format!("{stem}.json"));
            std::fs::write(&path, self.render_json()?)?;
            tracing::info!(path = %path.display(), "JSON report written");
            artifacts.json = Some(path);
        }

        Ok(artifacts)
    }
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Path helper: artifact directory for failure screenshots
#[must_use]
pub fn screenshot_dir(options: &ReporterOptions) -> PathBuf {
    options.report_dir.join("screenshots")
}

/// Write a failure screenshot and return its path
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written
pub fn write_screenshot(
    options: &ReporterOptions,
    scenario: &str,
    png: &[u8],
) -> SondearResult<PathBuf> {
    let dir = screenshot_dir(options);
    std::fs::create_dir_all(&dir)?;
    let slug: String = scenario
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let path = dir.join(format!(
        "{slug}_{}.png",
        Local::now().format(&options.timestamp)
    ));
    std::fs::write(&path, png)?;
    Ok(path)
}

// ============================================================================
// JSON document shape
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportStats {
    suites: usize,
    tests: usize,
    passes: usize,
    failures: usize,
    skipped: usize,
    pass_percent: f64,
    duration_ms: u64,
    start: String,
    end: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SuiteReport {
    uuid: Uuid,
    title: String,
    tests: Vec<TestReport>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestReport {
    uuid: Uuid,
    title: String,
    state: TestStatus,
    duration_ms: u64,
    err: Option<String>,
    checks: Vec<CheckResult>,
    screenshot: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReportDocument {
    stats: ReportStats,
    results: Vec<SuiteReport>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod status_tests {
        use super::*;

        #[test]
        fn test_status_predicates() {
            assert!(TestStatus::Passed.is_passed());
            assert!(!TestStatus::Passed.is_failed());
            assert!(TestStatus::Failed.is_failed());
            assert!(!TestStatus::Skipped.is_passed());
        }
    }

    mod scenario_result_tests {
        use super::*;

        #[test]
        fn test_passed_result() {
            let result =
                ScenarioResult::passed("specs/home", "loads home page", Duration::from_millis(80));
            assert_eq!(result.status, TestStatus::Passed);
            assert!(result.error.is_none());
            assert!(result.screenshot.is_none());
        }

        #[test]
        fn test_failed_result_with_screenshot() {
            let result = ScenarioResult::failed(
                "specs/home",
                "verifies elements",
                Duration::from_millis(120),
                "subtitle mismatch",
            )
            .with_screenshot("reports/screenshots/verifies_elements.png");

            assert!(result.status.is_failed());
            assert_eq!(result.error.as_deref(), Some("subtitle mismatch"));
            assert!(result.screenshot.is_some());
        }
    }

    mod reporter_tests {
        use super::*;

        #[test]
        fn test_collect_all_keeps_running() {
            let mut reporter = Reporter::new();
            reporter
                .record(ScenarioResult::failed(
                    "specs/home",
                    "t1",
                    Duration::ZERO,
                    "boom",
                ))
                .unwrap();
            reporter
                .record(ScenarioResult::passed("specs/home", "t2", Duration::ZERO))
                .unwrap();

            assert_eq!(reporter.failed_count(), 1);
            assert_eq!(reporter.passed_count(), 1);
            assert!(!reporter.all_passed());
        }

        #[test]
        fn test_fail_fast_aborts() {
            let mut reporter = Reporter::fail_fast();
            let result = reporter.record(ScenarioResult::failed(
                "specs/home",
                "t1",
                Duration::ZERO,
                "boom",
            ));
            assert!(result.is_err());
            // The failing result is still recorded before the abort
            assert_eq!(reporter.failed_count(), 1);
        }

        #[test]
        fn test_pass_rate_ignores_skipped() {
            let mut reporter = Reporter::new();
            reporter
                .record(ScenarioResult::passed("specs/home", "t1", Duration::ZERO))
                .unwrap();
            reporter
                .record(ScenarioResult::skipped("specs/shop", "t2"))
                .unwrap();

            assert!((reporter.pass_rate() - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_summary() {
            let mut reporter = Reporter::new().with_name("Sandbox Suite");
            reporter
                .record(ScenarioResult::passed("specs/home", "t1", Duration::ZERO))
                .unwrap();
            let summary = reporter.summary();
            assert!(summary.contains("Sandbox Suite"));
            assert!(summary.contains("1/1"));
        }
    }

    mod render_tests {
        use super::*;

        fn reporter_with_mixed_results() -> Reporter {
            let mut reporter = Reporter::new();
            reporter.start();
            reporter
                .record(ScenarioResult::passed(
                    "specs/home",
                    "loads home page",
                    Duration::from_millis(340),
                ))
                .unwrap();

            let mut checks = Vec::new();
            let mut v = crate::checks::Verification::new("home page elements");
            let _ = v.record("hero title visible", Ok(()));
            let _ = v.record_eq("hero subtitle text", "a", "b");
            checks.extend_from_slice(v.checks());

            reporter
                .record(
                    ScenarioResult::failed(
                        "specs/home",
                        "verifies elements",
                        Duration::from_millis(120),
                        "subtitle mismatch",
                    )
                    .with_checks(checks),
                )
                .unwrap();
            reporter
        }

        #[test]
        fn test_render_html_contains_scenarios_and_checks() {
            let reporter = reporter_with_mixed_results();
            let html = reporter.render_html();
            assert!(html.contains("loads home page"));
            assert!(html.contains("verifies elements"));
            assert!(html.contains("subtitle mismatch"));
            assert!(html.contains("hero subtitle text"));
        }

        #[test]
        fn test_render_html_escapes_error_text() {
            let mut reporter = Reporter::new();
            reporter
                .record(ScenarioResult::failed(
                    "specs/home",
                    "t",
                    Duration::ZERO,
                    "expected <div> & more",
                ))
                .unwrap();
            let html = reporter.render_html();
            assert!(html.contains("&lt;div&gt;"));
            assert!(html.contains("&amp;"));
        }

        #[test]
        fn test_render_json_shape() {
            let reporter = reporter_with_mixed_results();
            let json = reporter.render_json().unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();

            assert_eq!(value["stats"]["tests"], 2);
            assert_eq!(value["stats"]["passes"], 1);
            assert_eq!(value["stats"]["failures"], 1);
            // One suite: both scenarios share the spec path
            assert_eq!(value["results"].as_array().unwrap().len(), 1);
            assert_eq!(value["results"][0]["title"], "specs/home");
            assert_eq!(value["results"][0]["tests"][1]["state"], "failed");
        }
    }

    mod write_tests {
        use super::*;

        #[test]
        fn test_write_honors_toggles_and_overwrite() {
            let dir = tempfile::tempdir().unwrap();
            let options = ReporterOptions {
                report_dir: dir.path().to_path_buf(),
                overwrite: true,
                html: true,
                json: false,
                timestamp: "%m%d%Y_%H%M%S".to_string(),
            };

            let mut reporter = Reporter::new();
            reporter
                .record(ScenarioResult::passed("specs/home", "t", Duration::ZERO))
                .unwrap();

            let artifacts = reporter.write(&options).unwrap();
            assert_eq!(
                artifacts.html.as_deref(),
                Some(dir.path().join("report.html").as_path())
            );
            assert!(artifacts.json.is_none());
            assert!(dir.path().join("report.html").exists());
            assert!(!dir.path().join("report.json").exists());
        }

        #[test]
        fn test_write_timestamps_when_not_overwriting() {
            let dir = tempfile::tempdir().unwrap();
            let options = ReporterOptions {
                report_dir: dir.path().to_path_buf(),
                overwrite: false,
                html: false,
                json: true,
                timestamp: "%Y".to_string(),
            };

            let reporter = Reporter::new();
            let artifacts = reporter.write(&options).unwrap();
            let json_path = artifacts.json.unwrap();
            let name = json_path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("report_"));
            assert!(name.ends_with(".json"));
            assert_ne!(name, "report_.json");
        }

        #[test]
        fn test_write_screenshot_slugs_scenario_name() {
            let dir = tempfile::tempdir().unwrap();
            let options = ReporterOptions {
                report_dir: dir.path().to_path_buf(),
                timestamp: "%Y".to_string(),
                ..ReporterOptions::default()
            };

            let path = write_screenshot(&options, "verifies elements", &[137, 80]).unwrap();
            assert!(path.exists());
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("verifies_elements_"));
            assert!(name.ends_with(".png"));
        }
    }
}

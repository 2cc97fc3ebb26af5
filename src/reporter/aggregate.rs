use crate::configuration::constants::common::RESULT_FILE_SUFFIX;
use crate::reporter::allure::{Status, TestResult};
use std::fmt;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    Pass,
    Fail,
    /// The results directory was not there at all
    Unknown,
}

impl OverallStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            OverallStatus::Pass => "✅",
            OverallStatus::Fail => "❌",
            OverallStatus::Unknown => "⚠️",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            OverallStatus::Pass => "status-pass",
            OverallStatus::Fail => "status-fail",
            OverallStatus::Unknown => "status-unknown",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OverallStatus::Pass => "PASS",
            OverallStatus::Fail => "FAIL",
            OverallStatus::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Pass percentage kept in hundredths so formatting never depends on float rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassRate {
    /// Nothing ran, displayed as a bare `0`
    NotApplicable,
    Hundredths(u64),
}

impl PassRate {
    /// `passed / total * 100` rounded half up to two decimals
    pub fn of(passed: usize, total: usize) -> Self {
        if total == 0 {
            return PassRate::NotApplicable;
        }
        let (passed, total) = (passed as u128, total as u128);
        PassRate::Hundredths(((passed * 20_000 + total) / (2 * total)) as u64)
    }

    pub fn exceeds(&self, percent: u64) -> bool {
        match self {
            PassRate::NotApplicable => false,
            PassRate::Hundredths(value) => *value > percent * 100,
        }
    }
}

impl fmt::Display for PassRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PassRate::NotApplicable => f.write_str("0"),
            PassRate::Hundredths(value) => write!(f, "{}.{:02}", value / 100, value % 100),
        }
    }
}

/// Totals of one test run. Accumulation is commutative, failure names are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Counted in `total` only: broken, missing or unsupported status
    pub unrecognized: usize,
    directory_found: bool,
    failures: Vec<String>,
}

impl Summary {
    pub fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            unrecognized: 0,
            directory_found: true,
            failures: Vec::new(),
        }
    }

    pub fn missing() -> Self {
        Self {
            directory_found: false,
            ..Self::new()
        }
    }

    pub fn record(&mut self, result: TestResult) {
        self.total += 1;
        match result.status {
            Status::Passed => self.passed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Failed => {
                self.failed += 1;
                if let Some(name) = result.display_name() {
                    let at = self.failures.partition_point(|known| known.as_str() < name);
                    self.failures.insert(at, name.to_owned());
                }
            }
            Status::Broken | Status::Unknown => self.unrecognized += 1,
        }
    }

    pub fn overall_status(&self) -> OverallStatus {
        if !self.directory_found {
            OverallStatus::Unknown
        } else if self.failed > 0 {
            OverallStatus::Fail
        } else {
            OverallStatus::Pass
        }
    }

    pub fn pass_percentage(&self) -> PassRate {
        PassRate::of(self.passed, self.total)
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

impl Extend<TestResult> for Summary {
    fn extend<T: IntoIterator<Item = TestResult>>(&mut self, iter: T) {
        iter.into_iter().for_each(|result| self.record(result));
    }
}

impl FromIterator<TestResult> for Summary {
    fn from_iter<T: IntoIterator<Item = TestResult>>(iter: T) -> Self {
        let mut summary = Summary::new();
        summary.extend(iter);
        summary
    }
}

fn is_result_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.ends_with(RESULT_FILE_SUFFIX))
}

/// Scans `dir` for result files. Never fails: problems are logged and degrade the summary.
pub fn aggregate(dir: &Path) -> Summary {
    if !dir.is_dir() {
        warn!("{} directory not found", dir.display());
        return Summary::missing();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read {}: {}", dir.display(), e);
            return Summary::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Failed to read entry of {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|path| is_result_file(path))
        .collect();
    paths.sort();
    debug!("Found {} result files in {}", paths.len(), dir.display());

    paths
        .iter()
        .filter_map(|path| match TestResult::from_file(path) {
            Ok(result) => {
                trace!("{} -> {}", path.display(), result.status);
                Some(result)
            }
            Err(e) => {
                warn!("Skipping result file, {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn statuses(values: &[Status]) -> Vec<TestResult> {
        values.iter().cloned().map(TestResult::from).collect()
    }

    #[test]
    fn test_one_of_each_status() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1-result.json"), r#"{"status":"passed"}"#).unwrap();
        fs::write(dir.path().join("2-result.json"), r#"{"status":"failed"}"#).unwrap();
        fs::write(dir.path().join("3-result.json"), r#"{"status":"skipped"}"#).unwrap();

        let summary = aggregate(dir.path());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.overall_status(), OverallStatus::Fail);
        assert_eq!(summary.pass_percentage().to_string(), "33.33");
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1-result.json"), "{ status: passed").unwrap();

        let summary = aggregate(dir.path());

        assert_eq!(summary, Summary::new());
        assert_eq!(summary.overall_status(), OverallStatus::Pass);
        assert_eq!(summary.pass_percentage().to_string(), "0");
    }

    #[test]
    fn test_missing_directory_is_unknown() {
        let dir = tempfile::tempdir().unwrap();

        let summary = aggregate(&dir.path().join("allure-results"));

        assert_eq!(summary.total, 0);
        assert_eq!(summary.overall_status(), OverallStatus::Unknown);
    }

    #[test]
    fn test_file_in_place_of_directory_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allure-results");
        fs::write(&path, "").unwrap();

        assert_eq!(aggregate(&path).overall_status(), OverallStatus::Unknown);
    }

    #[test]
    fn test_only_result_files_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1-result.json"), r#"{"status":"passed"}"#).unwrap();
        fs::write(dir.path().join("1-container.json"), r#"{"status":"failed"}"#).unwrap();
        fs::write(dir.path().join("environment.properties"), "a=b").unwrap();
        fs::write(dir.path().join("2-attachment.txt"), "log").unwrap();

        let summary = aggregate(dir.path());

        assert_eq!(summary.total, 1);
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn test_non_object_records_count_as_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1-result.json"), r#"{"status":"passed"}"#).unwrap();
        fs::write(dir.path().join("2-result.json"), "[]").unwrap();
        fs::write(dir.path().join("3-result.json"), r#""passed""#).unwrap();
        fs::write(dir.path().join("4-result.json"), "null").unwrap();

        let summary = aggregate(dir.path());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.unrecognized, 2);
        assert_eq!(summary.overall_status(), OverallStatus::Pass);
        assert_eq!(summary.pass_percentage().to_string(), "33.33");
    }

    #[test]
    fn test_unrecognized_status_counts_toward_total_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1-result.json"), r#"{"status":"broken"}"#).unwrap();
        fs::write(dir.path().join("2-result.json"), r#"{"name":"no status"}"#).unwrap();
        fs::write(dir.path().join("3-result.json"), r#"{"status":"passed"}"#).unwrap();

        let summary = aggregate(dir.path());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.unrecognized, 2);
        assert_eq!(
            summary.total,
            summary.passed + summary.failed + summary.skipped + summary.unrecognized
        );
        assert_eq!(summary.overall_status(), OverallStatus::Pass);
    }

    #[test]
    fn test_accumulation_is_order_independent() {
        let named = |name: &str| TestResult {
            name: Some(name.to_owned()),
            ..TestResult::from(Status::Failed)
        };
        let mut results = statuses(&[
            Status::Passed,
            Status::Skipped,
            Status::Broken,
            Status::Passed,
        ]);
        results.push(named("checkout"));
        results.push(named("login"));
        results.push(named("balance"));

        let forward: Summary = results.iter().cloned().collect();
        let backward: Summary = results.iter().rev().cloned().collect();
        let mut rotated = results.clone();
        rotated.rotate_left(3);
        let rotated: Summary = rotated.into_iter().collect();

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
        assert_eq!(forward.failures(), &["balance", "checkout", "login"]);
    }

    #[test]
    fn test_pass_rate_formatting() {
        assert_eq!(PassRate::of(0, 0).to_string(), "0");
        assert_eq!(PassRate::of(0, 4).to_string(), "0.00");
        assert_eq!(PassRate::of(10, 10).to_string(), "100.00");
        assert_eq!(PassRate::of(2, 3).to_string(), "66.67");
        assert_eq!(PassRate::of(1, 800).to_string(), "0.13");
        assert_eq!(PassRate::of(1, 8), PassRate::Hundredths(1250));
    }

    #[test]
    fn test_pass_rate_threshold() {
        assert!(!PassRate::of(0, 0).exceeds(5));
        assert!(!PassRate::of(1, 20).exceeds(5));
        assert!(PassRate::of(6, 100).exceeds(5));
    }
}

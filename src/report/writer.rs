use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::{ExistingReportPolicy, ScanConfig};
use crate::error::Result;
use crate::report::markdown::DailyReport;

/// Where a report landed on disk.
#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub path: PathBuf,
    pub replaced: bool,
    pub latest_written: bool,
}

pub struct ReportWriter {
    findings_dir: PathBuf,
    latest_report: Option<PathBuf>,
    policy: ExistingReportPolicy,
}

impl ReportWriter {
    pub fn new(findings_dir: impl Into<PathBuf>) -> Self {
        Self {
            findings_dir: findings_dir.into(),
            latest_report: None,
            policy: ExistingReportPolicy::Overwrite,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            findings_dir: config.findings_dir.clone(),
            latest_report: config.latest_report.clone(),
            policy: config.on_existing,
        }
    }

    pub fn with_latest_report(mut self, path: Option<PathBuf>) -> Self {
        self.latest_report = path;
        self
    }

    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.findings_dir
            .join(format!("{}.md", date.format("%Y-%m-%d")))
    }

    /// True when the policy says a run for `date` should not happen.
    pub fn should_skip(&self, date: NaiveDate) -> bool {
        self.policy == ExistingReportPolicy::Skip && self.report_path(date).exists()
    }

    pub fn write(&self, report: &DailyReport) -> Result<WrittenReport> {
        fs::create_dir_all(&self.findings_dir)?;

        let path = self.report_path(report.date);
        let replaced = path.exists();
        if replaced {
            tracing::warn!("Overwriting existing report {}", path.display());
        }

        fs::write(&path, &report.body)?;
        tracing::info!("Report saved to: {}", path.display());

        // The dated file is the record; the latest copy is best effort.
        let latest_written = match &self.latest_report {
            Some(latest) => match write_latest(latest, &report.body) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Could not write {}: {}", latest.display(), e);
                    false
                }
            },
            None => false,
        };

        Ok(WrittenReport {
            path,
            replaced,
            latest_written,
        })
    }
}

fn write_latest(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;
    tracing::debug!("Latest report copied to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn report(body: &str) -> DailyReport {
        DailyReport {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            title: "Monitor".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_writes_dated_file() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("findings"));

        let written = writer.write(&report("# hello\n")).unwrap();

        assert_eq!(written.path, dir.path().join("findings").join("2026-10-16.md"));
        assert!(!written.replaced);
        assert_eq!(fs::read_to_string(&written.path).unwrap(), "# hello\n");
    }

    #[test]
    fn test_rerun_overwrites_and_says_so() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());

        writer.write(&report("first")).unwrap();
        let written = writer.write(&report("second")).unwrap();

        assert!(written.replaced);
        assert_eq!(fs::read_to_string(&written.path).unwrap(), "second");
    }

    #[test]
    fn test_latest_report_copy() {
        let dir = tempdir().unwrap();
        let latest = dir.path().join("latest_report.md");
        let writer = ReportWriter::new(dir.path().join("findings")).with_latest_report(Some(latest.clone()));

        let written = writer.write(&report("body")).unwrap();

        assert!(written.latest_written);
        assert_eq!(fs::read_to_string(latest).unwrap(), "body");
    }

    #[test]
    fn test_unwritable_latest_copy_keeps_dated_report() {
        let dir = tempdir().unwrap();
        let latest = dir.path().join("latest_report.md");
        fs::create_dir_all(&latest).unwrap();
        let writer = ReportWriter::new(dir.path().join("findings")).with_latest_report(Some(latest));

        let written = writer.write(&report("body")).unwrap();

        assert!(!written.latest_written);
        assert_eq!(fs::read_to_string(&written.path).unwrap(), "body");
    }

    #[test]
    fn test_skip_policy_only_skips_when_report_exists() {
        let dir = tempdir().unwrap();
        let config = ScanConfig {
            findings_dir: dir.path().to_path_buf(),
            latest_report: None,
            on_existing: ExistingReportPolicy::Skip,
            ..ScanConfig::default()
        };
        let writer = ReportWriter::from_config(&config);
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        assert!(!writer.should_skip(date));
        writer.write(&report("body")).unwrap();
        assert!(writer.should_skip(date));
    }
}

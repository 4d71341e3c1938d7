use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_INSTRUCTION: &str = r#"Which of these appear to be INTERACTIVE VIEWERS or creative presentation tools (web-based, with UI, playable experiences)?

Exclude:
- Training/research code (CUDA kernels, model training scripts)
- Raw data/datasets
- Python-only tools with no viewer component
- Forks of existing projects (should already be filtered out)
- Academic paper implementations without viewer
- Purely backend/API projects

For each interesting viewer project, provide:
1. The repo name and URL
2. What makes it interesting (unique features, novel approach, etc.)
3. Technology stack if discernible

If none of the repos appear to be interactive viewers, say so clearly.

Format your response as markdown suitable for a daily report."#;

/// Credentials and deployment settings read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub issue_repository: Option<IssueTarget>,
    pub lookback_hours: Option<u32>,
    pub findings_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} environment variable not set", key)))
        };

        let github_token = required("GITHUB_TOKEN")?;
        let anthropic_api_key = required("ANTHROPIC_API_KEY")?;

        let anthropic_model = lookup("ANTHROPIC_MODEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let issue_repository = lookup("GITHUB_REPOSITORY")
            .filter(|v| !v.is_empty())
            .map(|v| IssueTarget::parse(&v))
            .transpose()?;

        let lookback_hours = lookup("SCAN_LOOKBACK_HOURS")
            .and_then(|v| v.parse().ok())
            .filter(|h| *h > 0);

        let findings_dir = lookup("FINDINGS_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            github_token,
            anthropic_api_key,
            anthropic_model,
            issue_repository,
            lookback_hours,
            findings_dir,
        })
    }
}

/// The `owner/name` repository tracking issues are opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTarget {
    pub owner: String,
    pub repo: String,
}

impl IssueTarget {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(Error::Config(format!(
                "Invalid issue repository '{}', expected owner/name",
                value
            ))),
        }
    }
}

impl std::fmt::Display for IssueTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExistingReportPolicy {
    /// Replace a report already written for the same date.
    #[default]
    Overwrite,
    /// Leave the existing report alone and skip the run.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ClassifierMode {
    /// One model call with the whole (capped) repository set.
    #[default]
    Single,
    /// One model call per token-budgeted batch.
    Chunked,
}

/// Everything a scan run needs besides credentials. Passed explicitly to
/// each pipeline component so tests can substitute their own values.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub title: String,
    pub subject: String,
    pub queries: Vec<String>,
    pub lookback_hours: u32,
    pub per_page: u32,
    pub max_pages: u32,
    pub instruction: String,
    pub labels: Vec<String>,
    pub max_classified_repos: usize,
    pub classifier: ClassifierMode,
    pub findings_dir: PathBuf,
    pub latest_report: Option<PathBuf>,
    pub on_existing: ExistingReportPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            title: "3DGS Viewer Monitor".to_string(),
            subject: "3D Gaussian Splatting".to_string(),
            queries: [
                "gaussian splatting",
                "3dgs",
                "gsplat viewer",
                "splat viewer",
                "3d gaussian splat",
                "gaussian splat viewer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            lookback_hours: 24,
            per_page: 100,
            max_pages: 1,
            instruction: DEFAULT_INSTRUCTION.to_string(),
            labels: vec!["daily-scan".to_string(), "automated".to_string()],
            max_classified_repos: 150,
            classifier: ClassifierMode::Single,
            findings_dir: PathBuf::from("findings"),
            latest_report: Some(PathBuf::from("latest_report.md")),
            on_existing: ExistingReportPolicy::Overwrite,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.queries.iter().all(|q| q.trim().is_empty()) {
            return Err(Error::Config("At least one search query is required".to_string()));
        }
        if self.lookback_hours == 0 {
            return Err(Error::Config("Lookback window must be at least one hour".to_string()));
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(Error::Config(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        if self.max_classified_repos == 0 {
            return Err(Error::Config("max_classified_repos must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_github_token_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "sk")])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("GITHUB_TOKEN")));
    }

    #[test]
    fn test_missing_anthropic_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("GITHUB_TOKEN", "ghp")])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("ANTHROPIC_API_KEY")));
    }

    #[test]
    fn test_blank_credential_is_treated_as_missing() {
        let result = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "  "),
            ("ANTHROPIC_API_KEY", "sk"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp"),
            ("ANTHROPIC_API_KEY", "sk"),
            ("GITHUB_REPOSITORY", "octo/monitor"),
            ("SCAN_LOOKBACK_HOURS", "48"),
        ]))
        .unwrap();

        assert_eq!(config.anthropic_model, DEFAULT_MODEL);
        assert_eq!(
            config.issue_repository,
            Some(IssueTarget {
                owner: "octo".to_string(),
                repo: "monitor".to_string()
            })
        );
        assert_eq!(config.lookback_hours, Some(48));
        assert!(config.findings_dir.is_none());
    }

    #[test]
    fn test_issue_target_parse() {
        assert!(IssueTarget::parse("octo/monitor").is_ok());
        assert!(IssueTarget::parse("octo").is_err());
        assert!(IssueTarget::parse("/monitor").is_err());
        assert!(IssueTarget::parse("a/b/c").is_err());
    }

    #[test]
    fn test_default_scan_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.queries.len(), 6);
        assert_eq!(config.labels, vec!["daily-scan", "automated"]);
    }

    #[test]
    fn test_empty_queries_rejected() {
        let config = ScanConfig {
            queries: vec![" ".to_string()],
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

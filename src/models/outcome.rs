use super::repository::RepositoryRecord;

/// What one search query produced during a run.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    pub records: Vec<RepositoryRecord>,
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn found(query: &str, records: Vec<RepositoryRecord>) -> Self {
        Self {
            query: query.to_string(),
            records,
            error: None,
        }
    }

    pub fn failed(query: &str, error: String) -> Self {
        Self {
            query: query.to_string(),
            records: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// The model's verdict on one run's repository set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    Analysis(String),
    NoRepositories,
    Failed(String),
}

impl ClassificationResult {
    /// Markdown for the report's analysis section.
    pub fn to_markdown(&self, lookback_hours: u32) -> String {
        match self {
            ClassificationResult::Analysis(text) => text.trim().to_string(),
            ClassificationResult::NoRepositories => format!(
                "No new repositories found in the last {} hours.",
                lookback_hours
            ),
            ClassificationResult::Failed(reason) => format!(
                "> **Classification unavailable.** The model call failed: {}\n>\n\
                 > The full repository list below is unfiltered.",
                reason.replace('\n', " ")
            ),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ClassificationResult::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_classification_renders_placeholder() {
        let md = ClassificationResult::Failed("timeout\nafter 120s".to_string()).to_markdown(24);
        assert!(md.contains("Classification unavailable"));
        assert!(md.contains("timeout after 120s"));
    }

    #[test]
    fn test_analysis_is_verbatim_apart_from_outer_whitespace() {
        let md = ClassificationResult::Analysis("\n## Viewers\n- one\n\n".to_string()).to_markdown(24);
        assert_eq!(md, "## Viewers\n- one");
    }
}

use std::sync::Arc;

use crate::config::IssueTarget;
use crate::github::IssueProvider;
use crate::models::{CreatedIssue, NewIssue};
use crate::report::DailyReport;

#[derive(Debug, Clone)]
pub enum PublishOutcome {
    Created(CreatedIssue),
    Skipped(String),
    Failed(String),
}

pub struct IssuePublisher {
    issues: Arc<dyn IssueProvider>,
    target: Option<IssueTarget>,
    labels: Vec<String>,
}

impl IssuePublisher {
    pub fn new(issues: Arc<dyn IssueProvider>, target: Option<IssueTarget>, labels: Vec<String>) -> Self {
        Self {
            issues,
            target,
            labels,
        }
    }

    pub fn issue_for(&self, report: &DailyReport) -> NewIssue {
        NewIssue {
            title: report.heading(),
            body: report.body.clone(),
            labels: self.labels.clone(),
        }
    }

    /// Open the tracking issue. Failures are logged and reported, never
    /// raised: the report file on disk is the durable record.
    pub async fn publish(&self, report: &DailyReport) -> PublishOutcome {
        let Some(target) = &self.target else {
            tracing::info!("No issue repository configured, skipping issue creation");
            return PublishOutcome::Skipped("no issue repository configured".to_string());
        };

        let issue = self.issue_for(report);
        match self.issues.create_issue(target, &issue).await {
            Ok(created) => {
                tracing::info!("Opened issue #{} on {}: {}", created.number, target, created.html_url);
                PublishOutcome::Created(created)
            }
            Err(e) => {
                tracing::warn!("Issue creation on {} failed: {}", target, e);
                PublishOutcome::Failed(e.to_string())
            }
        }
    }
}

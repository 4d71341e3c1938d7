use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::{IssueTarget, ScanConfig};
use crate::error::Result;
use crate::github::{IssueProvider, SearchProvider};
use crate::llm::ModelProvider;
use crate::report::{render_report, ReportContext, ReportWriter, WrittenReport};
use crate::scan::aggregator::aggregate;
use crate::scan::classifier::{build_classifier, Classifier};
use crate::scan::publisher::{IssuePublisher, PublishOutcome};
use crate::scan::query_runner::{window_start, QueryRunner};

/// What a run did, for the console summary.
#[derive(Debug)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub skipped: bool,
    pub queries_run: usize,
    pub queries_failed: usize,
    pub repos_found: usize,
    pub classification_failed: bool,
    pub report: Option<WrittenReport>,
    pub issue: PublishOutcome,
}

pub struct ScanPipeline {
    runner: QueryRunner,
    classifier: Box<dyn Classifier>,
    writer: ReportWriter,
    publisher: IssuePublisher,
    config: ScanConfig,
}

impl ScanPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        model: Arc<dyn ModelProvider>,
        issues: Arc<dyn IssueProvider>,
        issue_target: Option<IssueTarget>,
        config: ScanConfig,
    ) -> Self {
        Self {
            runner: QueryRunner::new(search),
            classifier: build_classifier(model, &config),
            writer: ReportWriter::from_config(&config),
            publisher: IssuePublisher::new(issues, issue_target, config.labels.clone()),
            config,
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.runner = self.runner.with_progress(show_progress);
        self
    }

    /// Search, classify, write and publish for the run starting at `now`.
    /// Only a report that cannot be written fails the run.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let date = now.date_naive();

        if self.writer.should_skip(date) {
            tracing::info!(
                "Report {} already exists, skipping run",
                self.writer.report_path(date).display()
            );
            return Ok(RunSummary {
                date,
                skipped: true,
                queries_run: 0,
                queries_failed: 0,
                repos_found: 0,
                classification_failed: false,
                report: None,
                issue: PublishOutcome::Skipped("report already exists".to_string()),
            });
        }

        // Step 1: Search
        let since = window_start(now, self.config.lookback_hours);
        tracing::info!("Searching for repos created since {}", since.format("%Y-%m-%dT%H:%M:%SZ"));
        let outcomes = self.runner.run(&self.config, since).await;
        let queries_failed = outcomes.iter().filter(|o| o.is_failed()).count();

        // Step 2: Deduplicate
        let aggregation = aggregate(&outcomes);
        tracing::info!(
            "Total unique repos found: {} ({} duplicates removed)",
            aggregation.count(),
            aggregation.duplicates_removed()
        );

        // Step 3: Classify
        let classification = self.classifier.classify(&aggregation.records).await;

        // Step 4: Render and save
        let report = render_report(&ReportContext {
            config: &self.config,
            date,
            outcomes: &outcomes,
            aggregation: &aggregation,
            classification: &classification,
        });
        let written = self.writer.write(&report)?;

        // Step 5: Publish
        let issue = self.publisher.publish(&report).await;

        Ok(RunSummary {
            date,
            skipped: false,
            queries_run: outcomes.len(),
            queries_failed,
            repos_found: aggregation.count(),
            classification_failed: classification.is_failed(),
            report: Some(written),
            issue,
        })
    }
}

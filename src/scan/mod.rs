pub mod query_runner;
pub mod aggregator;
pub mod classifier;
pub mod publisher;
pub mod pipeline;

pub use query_runner::QueryRunner;
pub use aggregator::{aggregate, Aggregation};
pub use classifier::{ChunkedClassifier, Classifier, ModelClassifier};
pub use publisher::{IssuePublisher, PublishOutcome};
pub use pipeline::{RunSummary, ScanPipeline};

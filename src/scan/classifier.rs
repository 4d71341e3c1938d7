use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ClassifierMode, ScanConfig};
use crate::llm::{ClassificationRequest, ModelProvider, RepoBatcher};
use crate::models::{ClassificationResult, RepositoryRecord};

/// Separates interactive viewers from everything else in a repository set.
/// Implementations never fail: a broken model call becomes
/// [`ClassificationResult::Failed`].
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, records: &[RepositoryRecord]) -> ClassificationResult;
}

/// One model call for the whole set, capped at `max_classified_repos`.
pub struct ModelClassifier {
    model: Arc<dyn ModelProvider>,
    config: ScanConfig,
}

impl ModelClassifier {
    pub fn new(model: Arc<dyn ModelProvider>, config: ScanConfig) -> Self {
        Self { model, config }
    }
}

#[async_trait]
impl Classifier for ModelClassifier {
    async fn classify(&self, records: &[RepositoryRecord]) -> ClassificationResult {
        if records.is_empty() {
            return ClassificationResult::NoRepositories;
        }

        let cap = self.config.max_classified_repos.min(records.len());
        let (included, omitted) = records.split_at(cap);
        if !omitted.is_empty() {
            tracing::warn!(
                "Classifying the first {} of {} repos; {} exceed the prompt cap",
                included.len(),
                records.len(),
                omitted.len()
            );
        }

        let request = ClassificationRequest::new(included, &self.config);
        tracing::info!(
            "Asking {} to classify {} repos (~{} tokens)",
            self.model.name(),
            included.len(),
            request.estimate_tokens()
        );

        match self.model.complete(&request.to_prompt()).await {
            Ok(text) => {
                let mut text = text.trim().to_string();
                if !omitted.is_empty() {
                    text.push_str(&omitted_note(omitted));
                }
                ClassificationResult::Analysis(text)
            }
            Err(e) => {
                tracing::warn!("Classification failed, continuing without it: {}", e);
                ClassificationResult::Failed(e.to_string())
            }
        }
    }
}

/// One model call per token-budgeted batch; narratives are concatenated.
pub struct ChunkedClassifier {
    model: Arc<dyn ModelProvider>,
    batcher: RepoBatcher,
    config: ScanConfig,
}

impl ChunkedClassifier {
    pub fn new(model: Arc<dyn ModelProvider>, config: ScanConfig) -> Self {
        let batcher = RepoBatcher::new(model.max_context_tokens());
        Self {
            model,
            batcher,
            config,
        }
    }

    pub fn with_batcher(mut self, batcher: RepoBatcher) -> Self {
        self.batcher = batcher;
        self
    }
}

#[async_trait]
impl Classifier for ChunkedClassifier {
    async fn classify(&self, records: &[RepositoryRecord]) -> ClassificationResult {
        if records.is_empty() {
            return ClassificationResult::NoRepositories;
        }

        let batches = self.batcher.create_batches(records);
        let total = batches.len();
        tracing::info!("Classifying {} repos in {} batch(es)", records.len(), total);

        let mut sections = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (i, batch) in batches.into_iter().enumerate() {
            let request = ClassificationRequest::new(batch, &self.config);
            match self.model.complete(&request.to_prompt()).await {
                Ok(text) if total == 1 => sections.push(text.trim().to_string()),
                Ok(text) => sections.push(format!(
                    "### Batch {} of {}\n\n{}",
                    i + 1,
                    total,
                    text.trim()
                )),
                Err(e) => {
                    tracing::warn!("Classification batch {} of {} failed: {}", i + 1, total, e);
                    failures.push(format!("batch {} ({} repos): {}", i + 1, batch.len(), e));
                }
            }
        }

        if sections.is_empty() {
            return ClassificationResult::Failed(failures.join("; "));
        }

        let mut text = sections.join("\n\n");
        if !failures.is_empty() {
            text.push_str("\n\n_Some batches could not be classified:_\n");
            for failure in &failures {
                text.push_str(&format!("- {}\n", failure));
            }
        }
        ClassificationResult::Analysis(text.trim_end().to_string())
    }
}

pub fn build_classifier(model: Arc<dyn ModelProvider>, config: &ScanConfig) -> Box<dyn Classifier> {
    match config.classifier {
        ClassifierMode::Single => Box::new(ModelClassifier::new(model, config.clone())),
        ClassifierMode::Chunked => Box::new(ChunkedClassifier::new(model, config.clone())),
    }
}

fn omitted_note(omitted: &[RepositoryRecord]) -> String {
    format!(
        "\n\n_Note: {} repositories exceeded the classification cap and were not analysed. \
         They are still listed below:_ {}",
        omitted.len(),
        omitted
            .iter()
            .map(|r| r.full_name())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

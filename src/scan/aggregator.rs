use std::collections::HashSet;

use crate::models::{QueryOutcome, RepositoryRecord};

/// The deduplicated repository set for one run.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub records: Vec<RepositoryRecord>,
    /// Search hits across all queries before deduplication.
    pub total_hits: usize,
}

impl Aggregation {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.total_hits - self.records.len()
    }
}

/// Merge per-query results in query order. The first occurrence of a
/// repository wins; forks never make it through.
pub fn aggregate(outcomes: &[QueryOutcome]) -> Aggregation {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut total_hits = 0;

    for record in outcomes.iter().flat_map(|o| o.records.iter()) {
        if record.fork {
            continue;
        }
        total_hits += 1;
        if seen.insert(record.id()) {
            records.push(record.clone());
        }
    }

    Aggregation {
        records,
        total_hits,
    }
}

use crate::llm::prompts::estimate_record_chars;
use crate::models::RepositoryRecord;

pub struct RepoBatcher {
    max_tokens: usize,
    reserved_tokens: usize,
}

impl RepoBatcher {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            // Reserve tokens for the instruction (~400) and response (~2000)
            reserved_tokens: 2_500,
        }
    }

    /// Split records into consecutive batches that each fit the prompt
    /// budget. Order is preserved and every record lands in exactly one
    /// batch.
    pub fn create_batches<'a>(&self, records: &'a [RepositoryRecord]) -> Vec<&'a [RepositoryRecord]> {
        let available_tokens = self.max_tokens.saturating_sub(self.reserved_tokens).max(1);
        let mut batches = Vec::new();
        let mut start = 0;
        let mut current_tokens = 0;

        for (i, record) in records.iter().enumerate() {
            let record_tokens = estimate_record_chars(record) / 4 + 1;

            if current_tokens + record_tokens > available_tokens && i > start {
                batches.push(&records[start..i]);
                start = i;
                current_tokens = 0;
            }

            current_tokens += record_tokens;
        }

        if start < records.len() {
            batches.push(&records[start..]);
        }

        batches
    }
}

impl Default for RepoBatcher {
    fn default() -> Self {
        Self::new(200_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn records(n: usize) -> Vec<RepositoryRecord> {
        (0..n)
            .map(|i| RepositoryRecord {
                owner: "owner".to_string(),
                name: format!("repo-{}", i),
                description: Some("d".repeat(200)),
                url: format!("https://github.com/owner/repo-{}", i),
                stars: 0,
                fork: false,
                created_at: Utc::now(),
                language: None,
                topics: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_everything_fits_one_batch() {
        let records = records(10);
        let batches = RepoBatcher::default().create_batches(&records);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 10);
    }

    #[test]
    fn test_small_budget_splits_without_losing_records() {
        let records = records(25);
        // ~80 tokens per record, so a 500-token budget holds six
        let batches = RepoBatcher::new(3_000).create_batches(&records);
        assert!(batches.len() > 1);
        assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 25);
        assert_eq!(batches[0][0].name, "repo-0");
        assert_eq!(batches.last().unwrap().last().unwrap().name, "repo-24");
    }

    #[test]
    fn test_empty_input() {
        assert!(RepoBatcher::default().create_batches(&[]).is_empty());
    }
}

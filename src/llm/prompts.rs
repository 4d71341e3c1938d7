use crate::config::ScanConfig;
use crate::models::RepositoryRecord;

/// Descriptions longer than this are cut so one verbose README blurb can't
/// crowd out the rest of the prompt.
const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct ClassificationRequest<'a> {
    pub records: &'a [RepositoryRecord],
    pub subject: &'a str,
    pub lookback_hours: u32,
    pub instruction: &'a str,
}

impl<'a> ClassificationRequest<'a> {
    pub fn new(records: &'a [RepositoryRecord], config: &'a ScanConfig) -> Self {
        Self {
            records,
            subject: &config.subject,
            lookback_hours: config.lookback_hours,
            instruction: &config.instruction,
        }
    }

    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            "Here are GitHub repos found in the last {} hours related to {}:\n\n",
            self.lookback_hours, self.subject
        );

        for record in self.records {
            prompt.push_str(&format_record(record));
        }

        prompt.push('\n');
        prompt.push_str(self.instruction);
        prompt
    }

    pub fn estimate_tokens(&self) -> usize {
        let char_count: usize = self.records.iter().map(estimate_record_chars).sum();
        // Rough estimate: ~4 characters per token
        (char_count + self.instruction.len()) / 4
    }
}

pub(crate) fn format_record(record: &RepositoryRecord) -> String {
    let description = record
        .description
        .as_deref()
        .map(truncate_description)
        .unwrap_or_else(|| "No description".to_string());
    let topics = if record.topics.is_empty() {
        "None".to_string()
    } else {
        record.topics.join(", ")
    };

    format!(
        "- **{}** ({}, {} stars)\n  Description: {}\n  URL: {}\n  Topics: {}\n",
        record.full_name(),
        record.language.as_deref().unwrap_or("Unknown"),
        record.stars,
        description,
        record.url,
        topics
    )
}

pub(crate) fn estimate_record_chars(record: &RepositoryRecord) -> usize {
    // Fixed overhead covers the labels and markdown around each field.
    80 + record.owner.len()
        + record.name.len()
        + record.url.len()
        + record
            .description
            .as_deref()
            .map_or(14, |d| d.len().min(MAX_DESCRIPTION_CHARS + 3))
        + record.topics.iter().map(|t| t.len() + 2).sum::<usize>()
}

fn truncate_description(description: &str) -> String {
    let single_line = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > MAX_DESCRIPTION_CHARS {
        let cut: String = single_line.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{}...", cut)
    } else {
        single_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, description: Option<&str>) -> RepositoryRecord {
        RepositoryRecord {
            owner: "alice".to_string(),
            name: name.to_string(),
            description: description.map(String::from),
            url: format!("https://github.com/alice/{}", name),
            stars: 3,
            fork: false,
            created_at: Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap(),
            language: Some("TypeScript".to_string()),
            topics: vec!["webgl".to_string(), "3dgs".to_string()],
        }
    }

    #[test]
    fn test_prompt_embeds_every_record_and_instruction() {
        let config = ScanConfig::default();
        let records = vec![record("splat-web", Some("WebGL viewer")), record("gs-train", None)];
        let prompt = ClassificationRequest::new(&records, &config).to_prompt();

        assert!(prompt.starts_with(
            "Here are GitHub repos found in the last 24 hours related to 3D Gaussian Splatting:"
        ));
        assert!(prompt.contains("- **alice/splat-web** (TypeScript, 3 stars)"));
        assert!(prompt.contains("URL: https://github.com/alice/gs-train"));
        assert!(prompt.contains("Description: No description"));
        assert!(prompt.contains("Topics: webgl, 3dgs"));
        assert!(prompt.ends_with(&config.instruction));
    }

    #[test]
    fn test_long_description_is_cut() {
        let long = "x".repeat(2_000);
        let formatted = format_record(&record("big", Some(&long)));
        assert!(formatted.contains(&format!("{}...", "x".repeat(MAX_DESCRIPTION_CHARS))));
        assert!(!formatted.contains(&"x".repeat(MAX_DESCRIPTION_CHARS + 1)));
    }
}

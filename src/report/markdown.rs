use chrono::NaiveDate;

use crate::config::ScanConfig;
use crate::models::{ClassificationResult, QueryOutcome, RepositoryRecord};
use crate::scan::Aggregation;

/// A rendered daily report, ready to write to disk and post as an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub title: String,
    pub body: String,
}

impl DailyReport {
    pub fn heading(&self) -> String {
        format!("{} - {}", self.title, self.date.format("%Y-%m-%d"))
    }
}

pub struct ReportContext<'a> {
    pub config: &'a ScanConfig,
    pub date: NaiveDate,
    pub outcomes: &'a [QueryOutcome],
    pub aggregation: &'a Aggregation,
    pub classification: &'a ClassificationResult,
}

/// Render the report. Output depends only on the context, so the same
/// inputs always produce the same bytes.
pub fn render_report(ctx: &ReportContext<'_>) -> DailyReport {
    let date = ctx.date.format("%Y-%m-%d").to_string();
    let mut output = String::new();

    output.push_str(&format!("# {} - {}\n\n", ctx.config.title, date));

    output.push_str("## Summary\n\n");
    output.push_str(&format!("- **Repos scanned**: {}\n", ctx.aggregation.count()));
    output.push_str(&format!(
        "- **Search hits**: {} ({} duplicates removed)\n",
        ctx.aggregation.total_hits,
        ctx.aggregation.duplicates_removed()
    ));
    output.push_str(&format!(
        "- **Search queries**: {}\n",
        ctx.outcomes
            .iter()
            .map(|o| o.query.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    output.push_str(&format!(
        "- **Time range**: Last {} hours\n",
        ctx.config.lookback_hours
    ));

    if !ctx.outcomes.is_empty() {
        output.push_str("\n| Query | Repos found |\n|-------|-------------|\n");
        for outcome in ctx.outcomes {
            let found = if outcome.is_failed() {
                "failed".to_string()
            } else {
                outcome.records.len().to_string()
            };
            output.push_str(&format!("| {} | {} |\n", escape_cell(&outcome.query), found));
        }
    }

    output.push_str("\n## Analysis\n\n");
    output.push_str(&ctx.classification.to_markdown(ctx.config.lookback_hours));
    output.push_str("\n\n## All Repos Found\n\n");

    if ctx.aggregation.records.is_empty() {
        output.push_str(&format!(
            "*No new repos found in the last {} hours.*\n",
            ctx.config.lookback_hours
        ));
    } else {
        for record in &ctx.aggregation.records {
            output.push_str(&format_listing(record));
        }
    }

    output.push_str(&format!(
        "\n---\n*Generated for {} by {}*\n",
        date, ctx.config.title
    ));

    DailyReport {
        date: ctx.date,
        title: ctx.config.title.clone(),
        body: output,
    }
}

fn format_listing(record: &RepositoryRecord) -> String {
    let description = record
        .description
        .as_deref()
        .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_else(|| "No description".to_string());
    let topics = if record.topics.is_empty() {
        "None".to_string()
    } else {
        record.topics.join(", ")
    };

    format!(
        "### [{}]({})\n\n\
         - **Language**: {}\n\
         - **Stars**: {}\n\
         - **Created**: {}\n\
         - **Topics**: {}\n\
         - **Description**: {}\n\n",
        record.full_name(),
        record.url,
        record.language.as_deref().unwrap_or("Unknown"),
        record.stars,
        record.created_at.format("%Y-%m-%d %H:%M UTC"),
        topics,
        description
    )
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

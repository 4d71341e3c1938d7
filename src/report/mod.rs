pub mod markdown;
pub mod writer;

pub use markdown::{render_report, DailyReport, ReportContext};
pub use writer::{ReportWriter, WrittenReport};

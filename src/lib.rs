pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod llm;
pub mod scan;
pub mod report;

pub use config::{Config, ScanConfig};
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use llm::{ClaudeProvider, ModelProvider};
pub use scan::ScanPipeline;

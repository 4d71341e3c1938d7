pub mod provider;
pub mod claude;
pub mod prompts;
pub mod batcher;

pub use provider::ModelProvider;
pub use claude::ClaudeProvider;
pub use prompts::ClassificationRequest;
pub use batcher::RepoBatcher;

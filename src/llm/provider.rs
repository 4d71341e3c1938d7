use async_trait::async_trait;
use crate::error::Result;

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send a single user prompt and return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
    fn max_context_tokens(&self) -> usize;
    fn name(&self) -> &str;
}

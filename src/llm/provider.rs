use async_trait::async_trait;
use crate::errors::LabsightError;
use super::types::{ChatRequest, LLMResponse};

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// One chat completion. A reply without content yields an empty string.
    async fn complete_chat(&self, request: &ChatRequest) -> Result<LLMResponse, LabsightError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}

use std::sync::Arc;
use tracing::{debug, warn};
use crate::errors::LabsightError;
use crate::extraction::ExtractedContent;
use crate::llm::{ChatRequest, LLMProvider};
use super::prompt::{build_messages, system_prompt};

/// Sends extracted report content to the model and returns its raw answer.
pub struct Interpreter {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    max_tokens: u32,
}

impl Interpreter {
    pub fn new(provider: Arc<dyn LLMProvider>, lifestyle_guidance: &str, max_tokens: u32) -> Self {
        Self {
            provider,
            system_prompt: system_prompt(lifestyle_guidance),
            max_tokens,
        }
    }

    /// One completion call, no retries. Any provider failure becomes
    /// `AnalysisFailed`.
    pub async fn interpret(&self, content: &ExtractedContent) -> Result<String, LabsightError> {
        let messages = build_messages(&self.system_prompt, content);
        if messages.len() == 1 {
            warn!("PDF has no extractable text, sending the instruction without report content");
        }

        let request = ChatRequest {
            messages,
            json_output: true,
            max_tokens: self.max_tokens,
        };

        let response = self.provider.complete_chat(&request).await.map_err(|e| {
            LabsightError::AnalysisFailed(format!("{} call failed: {}", self.provider.provider_name(), e))
        })?;

        debug!(
            provider = self.provider.provider_name(),
            model = %response.model,
            chars = response.content.len(),
            "Model answered"
        );
        Ok(response.content)
    }
}

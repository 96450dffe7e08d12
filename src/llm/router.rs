use std::sync::Arc;
use tracing::warn;
use crate::config::LLMConfig;
use crate::errors::LabsightError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::{OpenAIProvider, DEFAULT_BASE_URL};

pub fn create_provider(config: &LLMConfig) -> Result<Arc<dyn LLMProvider>, LabsightError> {
    let api_key = config.resolved_api_key();
    let model = config.model.as_deref();
    let base_url = config.resolved_base_url();

    match config.provider.as_str() {
        "openai" => {
            let key = api_key.ok_or_else(|| missing_key("openai"))?;
            let url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            Ok(Arc::new(OpenAIProvider::with_base_url(&key, model, &url)))
        }
        "anthropic" => {
            let key = api_key.ok_or_else(|| missing_key("anthropic"))?;
            Ok(match base_url {
                Some(url) => Arc::new(AnthropicProvider::with_base_url(&key, model, &url)),
                None => Arc::new(AnthropicProvider::new(&key, model)),
            })
        }
        "local" => {
            let url = base_url.ok_or_else(|| {
                LabsightError::Config("llm.base_url is required for the local provider".into())
            })?;
            if api_key.is_none() {
                warn!(base_url = %url, "No API key for local provider, sending unauthenticated requests");
            }
            let key = api_key.unwrap_or_default();
            Ok(Arc::new(OpenAIProvider::with_base_url(&key, model, &url).named("local")))
        }
        other => Err(LabsightError::Config(format!("Unknown LLM provider: {}", other))),
    }
}

fn missing_key(provider: &str) -> LabsightError {
    LabsightError::Config(format!(
        "No API key for {provider}: set llm.api_key or the provider's API key environment variable"
    ))
}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};
use crate::errors::LabsightError;
use super::provider::LLMProvider;
use super::types::{ChatRequest, ContentPart, LLMResponse, Message, MessageContent};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI chat completions, or any server speaking the same protocol.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    name: String,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            name: "openai".to_string(),
        }
    }

    /// Rename for logs, e.g. `local` for a self-hosted endpoint.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn message_json(message: &Message) -> Value {
    let content = match &message.content {
        MessageContent::Text(text) => json!(text),
        MessageContent::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text(text) => json!({"type": "text", "text": text}),
                    ContentPart::Image { media_type, data } => json!({
                        "type": "image_url",
                        "image_url": { "url": format!("data:{};base64,{}", media_type, data) },
                    }),
                })
                .collect(),
        ),
    };
    json!({"role": message.role, "content": content})
}

pub(crate) fn build_body(model: &str, request: &ChatRequest) -> Value {
    let messages: Vec<Value> = request.messages.iter().map(message_json).collect();
    let mut body = json!({
        "model": model,
        "messages": messages,
        "max_tokens": request.max_tokens,
    });
    if request.json_output {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

pub(crate) fn parse_completion(data: &Value, model: &str) -> Result<LLMResponse, LabsightError> {
    if let Some(error) = data.get("error") {
        return Err(LabsightError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
    }

    let content = match data["choices"][0]["message"]["content"].as_str() {
        Some(text) => text.to_string(),
        None => {
            warn!(model = %model, "Completion carried no message content");
            String::new()
        }
    };

    Ok(LLMResponse {
        content,
        input_tokens: data["usage"]["prompt_tokens"].as_u64(),
        output_tokens: data["usage"]["completion_tokens"].as_u64(),
        model: data["model"].as_str().unwrap_or(model).to_string(),
    })
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete_chat(&self, request: &ChatRequest) -> Result<LLMResponse, LabsightError> {
        let body = build_body(&self.model, request);

        let mut builder = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| LabsightError::Network(format!("{} request failed: {}", self.name, e)))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(LabsightError::RateLimit(format!("{} rate limit", self.name)));
        }
        if status.as_u16() == 401 {
            return Err(LabsightError::Authentication(format!("Invalid {} API key", self.name)));
        }

        let data: Value = resp.json().await
            .map_err(|e| LabsightError::LLMApi(format!("Failed to parse {} response: {}", self.name, e)))?;

        if !status.is_success() && data.get("error").is_none() {
            return Err(LabsightError::LLMApi(format!("{} returned HTTP {}", self.name, status)));
        }

        let response = parse_completion(&data, &self.model)?;
        debug!(
            provider = %self.name,
            model = %response.model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Chat completion"
        );
        Ok(response)
    }

    fn provider_name(&self) -> &str { &self.name }
    fn model_name(&self) -> &str { &self.model }
}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};
use crate::errors::LabsightError;
use super::provider::LLMProvider;
use super::types::{ChatRequest, ContentPart, LLMResponse, MessageContent};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// User turn sent when a request carries only a system instruction; the
/// messages API rejects an empty `messages` list.
pub const EMPTY_CONTENT_TURN: &str = "The report has no extractable text.";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, "https://api.anthropic.com")
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn content_json(content: &MessageContent) -> Value {
    match content {
        MessageContent::Text(text) => json!(text),
        MessageContent::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text(text) => json!({"type": "text", "text": text}),
                    ContentPart::Image { media_type, data } => json!({
                        "type": "image",
                        "source": { "type": "base64", "media_type": media_type, "data": data },
                    }),
                })
                .collect(),
        ),
    }
}

/// System messages move to the top-level `system` field. The messages API
/// has no JSON mode; the system instruction already demands JSON.
pub(crate) fn build_body(model: &str, request: &ChatRequest) -> Value {
    let system: Vec<String> = request.messages.iter()
        .filter(|m| m.is_system())
        .map(|m| m.text())
        .collect();
    let mut messages: Vec<Value> = request.messages.iter()
        .filter(|m| !m.is_system())
        .map(|m| json!({"role": m.role, "content": content_json(&m.content)}))
        .collect();
    if messages.is_empty() {
        messages.push(json!({"role": "user", "content": EMPTY_CONTENT_TURN}));
    }

    let mut body = json!({
        "model": model,
        "max_tokens": request.max_tokens,
        "messages": messages,
    });
    if !system.is_empty() {
        body["system"] = json!(system.join("\n\n"));
    }
    body
}

pub(crate) fn parse_message(data: &Value, model: &str) -> Result<LLMResponse, LabsightError> {
    if let Some(error) = data.get("error") {
        let msg = error["message"].as_str().unwrap_or("Unknown error");
        return Err(LabsightError::LLMApi(msg.to_string()));
    }

    let content: String = data["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b["type"] == "text")
                .filter_map(|b| b["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if content.is_empty() {
        warn!(model = %model, "Anthropic message carried no text content");
    }

    Ok(LLMResponse {
        content,
        input_tokens: data["usage"]["input_tokens"].as_u64(),
        output_tokens: data["usage"]["output_tokens"].as_u64(),
        model: model.to_string(),
    })
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete_chat(&self, request: &ChatRequest) -> Result<LLMResponse, LabsightError> {
        let body = build_body(&self.model, request);

        let resp = self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LabsightError::Network(format!("Anthropic API request failed: {}", e)))?;

        let status = resp.status();
        if status == 429 {
            return Err(LabsightError::RateLimit("Anthropic rate limit exceeded".into()));
        }
        if status == 401 {
            return Err(LabsightError::Authentication("Invalid Anthropic API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| LabsightError::LLMApi(format!("Failed to parse Anthropic response: {}", e)))?;

        if !status.is_success() && data.get("error").is_none() {
            return Err(LabsightError::LLMApi(format!("Anthropic returned HTTP {}", status)));
        }

        let response = parse_message(&data, &self.model)?;
        debug!(
            model = %self.model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Anthropic completion"
        );
        Ok(response)
    }

    fn provider_name(&self) -> &str { "anthropic" }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Message;

    #[test]
    fn test_system_message_hoisted() {
        let request = ChatRequest {
            messages: vec![Message::system("Output JSON."), Message::user("CBC text")],
            json_output: true,
            max_tokens: 512,
        };
        let body = build_body("claude", &request);
        assert_eq!(body["system"], "Output JSON.");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "CBC text");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_instruction_only_request_still_has_user_turn() {
        let request = ChatRequest {
            messages: crate::analysis::prompt::build_messages(
                "Output JSON.",
                &crate::extraction::ExtractedContent::Text(String::new()),
            ),
            json_output: true,
            max_tokens: 512,
        };
        let body = build_body("claude", &request);
        assert_eq!(body["system"], "Output JSON.");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], EMPTY_CONTENT_TURN);
    }

    #[test]
    fn test_image_block_shape() {
        let request = ChatRequest {
            messages: vec![Message::user_parts(vec![ContentPart::Image {
                media_type: "image/jpeg".into(),
                data: "QUJD".into(),
            }])],
            json_output: true,
            max_tokens: 512,
        };
        let body = build_body("claude", &request);
        let block = &body["messages"][0]["content"][0];
        assert_eq!(block["type"], "image");
        assert_eq!(block["source"]["type"], "base64");
        assert_eq!(block["source"]["media_type"], "image/jpeg");
        assert_eq!(block["source"]["data"], "QUJD");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_parse_message_joins_text_blocks() {
        let data = json!({
            "content": [{"type": "text", "text": "{\"title\":"}, {"type": "text", "text": "\"CBC\"}"}],
            "usage": {"input_tokens": 10, "output_tokens": 4}
        });
        let resp = parse_message(&data, "claude").unwrap();
        assert_eq!(resp.content, "{\"title\":\"CBC\"}");
        assert_eq!(resp.input_tokens, Some(10));
    }

    #[test]
    fn test_parse_message_error() {
        let data = json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}});
        assert!(matches!(parse_message(&data, "claude"), Err(LabsightError::LLMApi(_))));
    }
}

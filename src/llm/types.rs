use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    /// Base64 image data with its media type.
    Image { media_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self { role: "system".to_string(), content: MessageContent::Text(content.to_string()) }
    }
    pub fn user(content: &str) -> Self {
        Self { role: "user".to_string(), content: MessageContent::Text(content.to_string()) }
    }
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self { role: "user".to_string(), content: MessageContent::Parts(parts) }
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }

    /// Concatenated text of the message, ignoring images.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(t) => t.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text(t) => Some(t.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// Ask the provider to constrain output to a single JSON object.
    pub json_output: bool,
    pub max_tokens: u32,
}

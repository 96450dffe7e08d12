pub mod anthropic;
pub mod openai;
pub mod provider;
pub mod router;
pub mod types;

pub use provider::LLMProvider;
pub use router::create_provider;
pub use types::{ChatRequest, ContentPart, LLMResponse, Message, MessageContent};

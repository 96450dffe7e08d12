use crate::extraction::ExtractedContent;
use crate::llm::{ContentPart, Message};

pub const SYSTEM_INSTRUCTION: &str = r#"You are a medical AI assistant that analyzes medical lab reports.
Extract the following information and output ONLY valid JSON matching this schema:
{
  "title": "A short descriptive title (e.g. Complete Blood Count)",
  "summary": "A brief overall summary of the health status (plain language, max 2 sentences)",
  "metrics": {
    "totalTests": <number>,
    "normalTests": <number>,
    "abnormalTests": <number>,
    "abnormalAlerts": [
      { "name": "Test name", "value": "Result value", "expected": "Normal range", "unit": "Unit" }
    ],
    "normalList": [
      { "name": "Test name", "value": "Result value", "unit": "Unit" }
    ]
  },
  "dietRecommendations": ["Suggestion 1", "Suggestion 2"],
  "exerciseRecommendations": ["Exercise 1", "Exercise 2"]
}"#;

pub const TEXT_PREAMBLE: &str = "Here is the text extracted from the lab report:";
pub const IMAGE_PREAMBLE: &str = "Here is the image of the lab report.";

/// The fixed instruction plus optional lifestyle guidance.
pub fn system_prompt(lifestyle_guidance: &str) -> String {
    let guidance = lifestyle_guidance.trim();
    if guidance.is_empty() {
        SYSTEM_INSTRUCTION.to_string()
    } else {
        format!("{}\n{}", SYSTEM_INSTRUCTION, guidance)
    }
}

/// System instruction followed by the report content.
///
/// A PDF without a text layer produces no user message at all; the model
/// then only sees the instruction.
pub fn build_messages(system: &str, content: &ExtractedContent) -> Vec<Message> {
    let mut messages = vec![Message::system(system)];
    match content {
        ExtractedContent::Text(text) if !text.trim().is_empty() => {
            messages.push(Message::user(&format!("{}\n\n{}", TEXT_PREAMBLE, text)));
        }
        ExtractedContent::Text(_) => {}
        ExtractedContent::Image { media_type, data } => {
            messages.push(Message::user_parts(vec![
                ContentPart::Text(IMAGE_PREAMBLE.to_string()),
                ContentPart::Image { media_type: media_type.clone(), data: data.clone() },
            ]));
        }
    }
    messages
}

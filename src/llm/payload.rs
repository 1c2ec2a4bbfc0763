use serde_json::{ json, Value };
use crate::models::chat::ChatMessage;

/// Request bodies the backend might accept, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Messages,
    Prompt,
    Input,
    Text,
}

impl PayloadShape {
    pub const ALL: [PayloadShape; 4] = [
        PayloadShape::Messages,
        PayloadShape::Prompt,
        PayloadShape::Input,
        PayloadShape::Text,
    ];

    pub fn field(&self) -> &'static str {
        match self {
            PayloadShape::Messages => "messages",
            PayloadShape::Prompt => "prompt",
            PayloadShape::Input => "input",
            PayloadShape::Text => "text",
        }
    }

    pub fn build(&self, model: &str, messages: &[ChatMessage], user_text: &str) -> Value {
        match self {
            PayloadShape::Messages => json!({ "model": model, "messages": messages }),
            PayloadShape::Prompt => json!({ "model": model, "prompt": user_text }),
            PayloadShape::Input => json!({ "model": model, "input": user_text }),
            PayloadShape::Text => json!({ "model": model, "text": user_text }),
        }
    }
}

/// Newline-joined user turns, or the last message when there are none.
pub fn derive_user_text(messages: &[ChatMessage]) -> String {
    let joined = messages
        .iter()
        .filter(|m| m.is_user())
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if !joined.is_empty() {
        return joined;
    }
    messages
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

use serde::{ Serialize, Deserialize, Deserializer };
use serde_json::{ Map, Value };

/// One persisted turn of the conversation log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

/// Older history files may hold `"content": null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error> where D: Deserializer<'de> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// A role-tagged message as sent by the client. Unknown fields ride along
/// untouched so the backend sees exactly what the browser sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
            extra: Map::new(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
    pub model: Option<String>,
}

impl ChatRequest {
    /// Folds the single-message form into the message-list form.
    pub fn into_messages(self) -> (Vec<ChatMessage>, Option<String>) {
        let model = self.model.filter(|m| !m.trim().is_empty());
        let messages = match self.messages {
            Some(list) => list,
            None => vec![ChatMessage::new("user", self.message.as_deref().unwrap_or(""))],
        };
        (messages, model)
    }
}

/// What one candidate payload got back from the backend.
#[derive(Clone, Debug, Serialize)]
pub struct AttemptRecord {
    pub payload: Value,
    pub status_code: u16,
    pub body: Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatReply {
    Assistant {
        assistant: String,
    },
    Unrecognized {
        assistant: String,
        raw_response: Vec<AttemptRecord>,
    },
}

#[derive(Debug, Default)]
pub struct SaveConversationRequest {
    pub conversation: Option<Value>,
    pub filename: Option<String>,
}

impl SaveConversationRequest {
    /// Picks the fields out of a loose JSON body. A non-string `filename`
    /// counts as absent rather than spoiling the conversation.
    pub fn from_value(mut body: Value) -> Self {
        let conversation = body.get_mut("conversation").map(Value::take);
        let filename = body
            .get("filename")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { conversation, filename }
    }
}

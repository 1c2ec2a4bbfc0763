use crate::error::RelayError;
use crate::history::HistoryStore;
use crate::llm::{ BridgeOutcome, OllamaBridge };
use crate::models::chat::{ ChatReply, ChatRequest, HistoryEntry };
use log::info;
use std::sync::Arc;

/// Sits between the HTTP layer and the backend: normalizes the request,
/// forwards it and records successful turns.
#[derive(Clone)]
pub struct ChatRelay {
    bridge: OllamaBridge,
    history_store: Arc<dyn HistoryStore>,
}

impl ChatRelay {
    pub fn new(bridge: OllamaBridge, history_store: Arc<dyn HistoryStore>) -> Self {
        Self { bridge, history_store }
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history_store
    }

    pub async fn process_chat(&self, request: ChatRequest) -> Result<ChatReply, RelayError> {
        let (messages, model) = request.into_messages();
        let outcome = self.bridge.send(&messages, model.as_deref()).await?;

        match outcome {
            BridgeOutcome::Reply(text) => {
                let mut turn: Vec<HistoryEntry> = messages
                    .iter()
                    .filter(|m| m.is_user())
                    .map(|m| HistoryEntry::user(m.content.clone()))
                    .collect();
                turn.push(HistoryEntry::assistant(text.clone()));

                info!("Recorded chat turn ({} user message(s))", turn.len() - 1);
                self.history_store.append(turn).await;
                Ok(ChatReply::Assistant { assistant: text })
            }
            BridgeOutcome::Exhausted(attempts) =>
                Ok(ChatReply::Unrecognized {
                    assistant: String::new(),
                    raw_response: attempts,
                }),
        }
    }
}

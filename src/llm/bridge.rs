use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use log::{ debug, error, info };
use super::extract::{ aggregate_ndjson, extract_structured, is_model_not_found, Extraction };
use super::payload::{ derive_user_text, PayloadShape };
use crate::error::RelayError;
use crate::models::chat::{ AttemptRecord, ChatMessage };

pub const DEFAULT_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "gemma3:1b";

#[derive(Debug)]
pub enum BridgeOutcome {
    Reply(String),
    /// Every candidate got an answer, none of them readable.
    Exhausted(Vec<AttemptRecord>),
}

/// Talks to an Ollama-style endpoint whose request shape is not pinned down,
/// probing each [`PayloadShape`] until one produces text.
#[derive(Debug, Clone)]
pub struct OllamaBridge {
    http: HttpClient,
    url: String,
    default_model: String,
}

impl OllamaBridge {
    pub fn new(
        url: Option<String>,
        default_model: Option<String>,
        timeout: Duration
    ) -> Result<Self, reqwest::Error> {
        let url = url.unwrap_or_else(|| DEFAULT_URL.to_string());
        let default_model = default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let http = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self { http, url, default_model })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub async fn send(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>
    ) -> Result<BridgeOutcome, RelayError> {
        let model = model.unwrap_or(&self.default_model);
        let user_text = derive_user_text(messages);
        let mut attempts = Vec::with_capacity(PayloadShape::ALL.len());

        for shape in PayloadShape::ALL {
            let payload = shape.build(model, messages, &user_text);
            debug!("Trying '{}' payload against {}", shape.field(), self.url);

            let resp = match self.http.post(&self.url).json(&payload).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    error!("Backend at {} unreachable: {}", self.url, e);
                    return Err(RelayError::BackendUnreachable(e));
                }
            };
            let status = resp.status().as_u16();
            let body_text = resp.text().await.map_err(|e| {
                error!("Failed to read backend response body: {}", e);
                RelayError::BackendUnreachable(e)
            })?;

            let parsed = serde_json::from_str::<Value>(&body_text).ok();
            let streamed = aggregate_ndjson(&body_text).filter(|s| !s.is_empty());

            let extracted = parsed
                .as_ref()
                .map(extract_structured)
                .unwrap_or(Extraction::NotFound)
                .or_else(|| streamed.map(Extraction::Found).unwrap_or(Extraction::NotFound));

            if is_model_not_found(status, parsed.as_ref()) {
                info!("Backend reports model '{}' is not installed", model);
                return Err(RelayError::ModelNotFound {
                    model: model.to_string(),
                    raw: parsed.unwrap_or(Value::Null),
                });
            }

            debug!("'{}' payload answered with status {}", shape.field(), status);
            attempts.push(AttemptRecord {
                payload,
                status_code: status,
                body: parsed.unwrap_or(Value::String(body_text)),
            });

            if let Extraction::Found(text) = extracted {
                return Ok(BridgeOutcome::Reply(text));
            }
        }

        info!("No candidate payload produced assistant text ({} attempts)", attempts.len());
        Ok(BridgeOutcome::Exhausted(attempts))
    }
}

use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::{ json, Value };
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid request body: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("invalid conversation payload")]
    InvalidConversation,

    #[error("invalid export filename")]
    InvalidFilename,

    #[error("export not found")]
    ExportNotFound,

    #[error("failed to write export: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("failed to connect to backend: {0}")]
    BackendUnreachable(#[from] reqwest::Error),

    #[error("model '{model}' not found on backend")]
    ModelNotFound {
        model: String,
        raw: Value,
    },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            | RelayError::InvalidRequest(_)
            | RelayError::InvalidConversation
            | RelayError::InvalidFilename => StatusCode::BAD_REQUEST,
            RelayError::ExportNotFound | RelayError::ModelNotFound { .. } => StatusCode::NOT_FOUND,
            RelayError::WriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> Value {
        match self {
            RelayError::Unauthorized => json!({ "error": "unauthorized" }),
            RelayError::InvalidRequest(e) =>
                json!({
                    "error": "invalid_request",
                    "details": e.to_string(),
                }),
            RelayError::InvalidConversation => json!({ "error": "invalid_conversation" }),
            RelayError::InvalidFilename => json!({ "error": "invalid_filename" }),
            RelayError::ExportNotFound => json!({ "error": "not_found" }),
            RelayError::WriteFailed(e) =>
                json!({
                    "error": "write_failed",
                    "details": e.to_string(),
                }),
            RelayError::BackendUnreachable(e) =>
                json!({
                    "error": "Failed to connect to Ollama",
                    "details": e.to_string(),
                }),
            RelayError::ModelNotFound { model, raw } =>
                json!({
                    "error": "model_not_found",
                    "message": format!("Model '{}' not found on Ollama.", model),
                    "help": "Run 'ollama list' to see installed models and 'ollama pull <model>' to install one locally.",
                    "example_install": format!("ollama pull {}", model),
                    "raw_response": raw,
                }),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_names_model_and_install_step() {
        let err = RelayError::ModelNotFound {
            model: "gemma3:1b".into(),
            raw: json!({ "error": "model 'gemma3:1b' not found" }),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let body = err.body();
        assert_eq!(body["error"], "model_not_found");
        assert_eq!(body["example_install"], "ollama pull gemma3:1b");
        assert!(body["message"].as_str().unwrap().contains("gemma3:1b"));
    }

    #[test]
    fn write_failure_carries_cause() {
        let err = RelayError::WriteFailed(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body()["details"], "read-only");
    }
}

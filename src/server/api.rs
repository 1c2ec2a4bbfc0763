use crate::error::RelayError;
use crate::export::ExportWriter;
use crate::models::chat::{ ChatReply, ChatRequest, SaveConversationRequest };
use crate::relay::ChatRelay;
use std::path::{ Path as FsPath, PathBuf };
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{ DefaultBodyLimit, Path, State },
    http::{ header, HeaderMap, HeaderValue },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use serde_json::{ json, Value };
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::{ ServeDir, ServeFile };
use log::{ info, warn };

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
    pub exports: ExportWriter,
    pub admin_token: Option<String>,
}

pub fn router(state: AppState, static_dir: PathBuf, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .route("/api/history", get(get_history_handler))
        .route("/api/clear-history", post(clear_history_handler))
        .route("/api/save-conversation", post(save_conversation_handler))
        .route("/exports/{*filename}", get(serve_export_handler))
        .route("/api/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(state)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), RelayError> {
    let Some(required) = state.admin_token.as_deref() else {
        return Ok(());
    };
    let provided = headers.get(ADMIN_TOKEN_HEADER).and_then(|v| v.to_str().ok());
    if provided != Some(required) {
        warn!("Rejected request with bad or missing {} header", ADMIN_TOKEN_HEADER);
        return Err(RelayError::Unauthorized);
    }
    Ok(())
}

async fn get_history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, RelayError> {
    authorize(&state, &headers)?;
    let history = state.relay.history().all().await;
    Ok(Json(json!({ "history": history })))
}

async fn clear_history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, RelayError> {
    authorize(&state, &headers)?;
    state.relay.history().clear().await;
    info!("Chat history cleared");
    Ok(Json(json!({ "ok": true })))
}

async fn save_conversation_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    authorize(&state, &headers)?;
    let req = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => SaveConversationRequest::from_value(value),
        Err(e) => {
            warn!("Unparsable save-conversation body: {}", e);
            SaveConversationRequest::default()
        }
    };
    let url = state.exports.write(req.conversation.as_ref(), req.filename.as_deref()).await?;
    Ok(Json(json!({ "ok": true, "url": url })))
}

async fn serve_export_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Response, RelayError> {
    authorize(&state, &headers)?;
    let path = state.exports.resolve(&filename)?;
    let contents = tokio::fs::read(&path).await.map_err(|e| {
        warn!("Export {} unavailable: {}", path.display(), e);
        RelayError::ExportNotFound
    })?;

    let name = FsPath::new(&filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export.txt");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok(
        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            contents,
        ).into_response()
    )
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, RelayError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        ChatRequest::default()
    } else {
        serde_json::from_slice::<ChatRequest>(&body).map_err(|e| {
            warn!("Rejected chat request body: {}", e);
            RelayError::InvalidRequest(e)
        })?
    };
    let reply = state.relay.process_chat(req).await?;
    Ok(Json(reply))
}

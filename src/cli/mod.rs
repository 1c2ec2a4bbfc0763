use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Inference endpoint that receives the candidate payloads (e.g., http://localhost:11434/api/generate)
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434/api/generate")]
    pub ollama_url: String,

    /// Model used when a chat request does not name one.
    #[arg(long, env = "OLLAMA_MODEL", default_value = "gemma3:1b")]
    pub ollama_model: String,

    /// Seconds to wait for the backend before giving up on a chat request.
    #[arg(long, env = "BACKEND_TIMEOUT_SECS", default_value = "30")]
    pub backend_timeout_secs: u64,

    // --- History Store Args ---
    /// History store type (file, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "file")]
    pub history_type: String,

    /// JSON file backing the chat history when HISTORY_TYPE is file.
    #[arg(long, env = "HISTORY_FILE", default_value = "chat_history.json")]
    pub history_file: PathBuf,

    /// Directory where exported conversations are written and served from.
    #[arg(long, env = "EXPORTS_DIR", default_value = "exports")]
    pub exports_dir: PathBuf,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,

    /// Directory holding index.html and the front-end assets.
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Optional shared secret. If set, history and export endpoints require a matching X-ADMIN-TOKEN header.
    #[arg(long, env = "ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// Largest request body accepted, in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "2097152")]
    pub max_body_bytes: usize,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// The admin token, with blank values treated as unset.
    pub fn admin_token(&self) -> Option<String> {
        self.admin_token.clone().filter(|t| !t.trim().is_empty())
    }
}

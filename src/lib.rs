pub mod cli;
pub mod error;
pub mod export;
pub mod history;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use export::ExportWriter;
use history::initialize_history_store;
use llm::OllamaBridge;
use log::{ info, warn };
use relay::ChatRelay;
use server::Server;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Backend URL: {}", args.ollama_url);
    info!("Default Model: {}", args.ollama_model);
    info!("Backend Timeout: {}s", args.backend_timeout_secs);
    info!("History Store Type: {}", args.history_type);
    info!("History File: {}", args.history_file.display());
    info!("Exports Dir: {}", args.exports_dir.display());
    info!("Static Dir: {}", args.static_dir.display());
    info!("Max Body Bytes: {}", args.max_body_bytes);
    info!("Admin Token: {}", if args.admin_token().is_some() { "set" } else { "unset" });
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let bridge = OllamaBridge::new(
        Some(args.ollama_url.clone()),
        Some(args.ollama_model.clone()),
        Duration::from_secs(args.backend_timeout_secs)
    )?;
    let history_store = initialize_history_store(&args).await?;
    let relay = Arc::new(ChatRelay::new(bridge, history_store));

    let exports = ExportWriter::new(args.exports_dir.clone());
    if let Err(e) = exports.ensure_dir().await {
        warn!("Could not create exports directory {}: {}", exports.dir().display(), e);
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, relay, exports, args);
    server.run().await?;

    Ok(())
}

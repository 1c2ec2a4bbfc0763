mod file;
mod memory;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use crate::cli::Args;
use crate::models::chat::HistoryEntry;

pub use file::FileHistoryStore;
pub use memory::MemoryHistoryStore;

/// Append-only log of chat turns. Persistence is best-effort: implementations
/// log write failures and never hand them back to the caller.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entries: Vec<HistoryEntry>);

    async fn clear(&self);

    async fn all(&self) -> Vec<HistoryEntry>;

    async fn persist(&self);
}

pub async fn create_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "file" => {
            let store = FileHistoryStore::load(&args.history_file).await;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryHistoryStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub async fn initialize_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    info!("Chat history will be stored in: {} at {}", args.history_type, args.history_file.display());
    create_history_store(args).await
}

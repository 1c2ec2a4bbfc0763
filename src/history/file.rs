use async_trait::async_trait;
use log::{ debug, error, warn };
use std::path::{ Path, PathBuf };
use tokio::sync::Mutex;
use crate::history::HistoryStore;
use crate::models::chat::HistoryEntry;

/// History mirrored to a single pretty-printed JSON array on disk.
///
/// The mutex is held across each mutation and the rewrite that follows it,
/// so the file always reflects some complete state of the log.
pub struct FileHistoryStore {
    path: PathBuf,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl FileHistoryStore {
    /// Reads `path` if it exists. Missing or unreadable files start empty.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) =>
                match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!("Ignoring malformed history file {}: {}", path.display(), e);
                        Vec::new()
                    }
                }
            Err(e) => {
                debug!("No history loaded from {}: {}", path.display(), e);
                Vec::new()
            }
        };

        Self { path, entries: Mutex::new(entries) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, entries: &[HistoryEntry]) {
        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize history: {}", e);
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&self.path, json).await {
            error!("Failed to save history to {}: {}", self.path.display(), e);
        }
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn append(&self, entries: Vec<HistoryEntry>) {
        let mut guard = self.entries.lock().await;
        guard.extend(entries);
        self.write(&guard).await;
    }

    async fn clear(&self) {
        let mut guard = self.entries.lock().await;
        guard.clear();
        self.write(&guard).await;
    }

    async fn all(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.clone()
    }

    async fn persist(&self) {
        let guard = self.entries.lock().await;
        self.write(&guard).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileHistoryStore::load(dir.path().join("none.json")).await;
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileHistoryStore::load(&path).await;
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn null_content_entries_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[{"role":"user","content":null},{"role":"assistant","content":"hi"}]"#
        ).unwrap();

        let store = FileHistoryStore::load(&path).await;
        assert_eq!(store.all().await, vec![HistoryEntry::user(""), HistoryEntry::assistant("hi")]);
    }

    #[tokio::test]
    async fn append_rewrites_file_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let store = FileHistoryStore::load(&path).await;
        store.append(vec![HistoryEntry::user("héllo"), HistoryEntry::assistant("hi")]).await;

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("héllo"));
        assert!(raw.contains("\n  "));

        let reloaded = FileHistoryStore::load(&path).await;
        assert_eq!(reloaded.all().await, vec![
            HistoryEntry::user("héllo"),
            HistoryEntry::assistant("hi"),
        ]);
    }

    #[tokio::test]
    async fn clear_empties_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let store = FileHistoryStore::load(&path).await;
        store.append(vec![HistoryEntry::user("x")]).await;
        store.clear().await;
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn persist_restores_deleted_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let store = FileHistoryStore::load(&path).await;
        store.append(vec![HistoryEntry::user("x")]).await;
        std::fs::remove_file(store.path()).unwrap();

        store.persist().await;
        let reloaded = FileHistoryStore::load(&path).await;
        assert_eq!(reloaded.all().await, vec![HistoryEntry::user("x")]);
    }

    #[tokio::test]
    async fn unwritable_path_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let store = FileHistoryStore::load(dir.path().join("missing/dir/history.json")).await;
        store.append(vec![HistoryEntry::user("kept in memory")]).await;
        assert_eq!(store.all().await.len(), 1);
    }
}

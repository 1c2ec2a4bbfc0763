use async_trait::async_trait;
use tokio::sync::Mutex;
use crate::history::HistoryStore;
use crate::models::chat::HistoryEntry;

/// History that lives only as long as the process.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, entries: Vec<HistoryEntry>) {
        self.entries.lock().await.extend(entries);
    }

    async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    async fn all(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.clone()
    }

    async fn persist(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_clear() {
        let store = MemoryHistoryStore::new();
        store.append(vec![HistoryEntry::user("a"), HistoryEntry::assistant("b")]).await;
        assert_eq!(store.all().await.len(), 2);
        store.clear().await;
        assert!(store.all().await.is_empty());
    }
}

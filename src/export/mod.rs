use chrono::Utc;
use log::info;
use serde_json::Value;
use std::path::{ Path, PathBuf };
use crate::error::RelayError;

const DEFAULT_BASE_NAME: &str = "conversation";

/// Writes conversation transcripts under a single exports directory and
/// resolves download names against it.
#[derive(Clone, Debug)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the transcript and returns the download path for it.
    pub async fn write(
        &self,
        conversation: Option<&Value>,
        filename: Option<&str>
    ) -> Result<String, RelayError> {
        let entries = match conversation {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => {
                return Err(RelayError::InvalidConversation);
            }
        };

        let text = render_transcript(entries);
        let base = match filename {
            Some(name) if !name.is_empty() => sanitize_filename(name),
            _ => DEFAULT_BASE_NAME.to_string(),
        };
        let fname = format!("{}-{}.txt", base, Utc::now().timestamp());

        tokio::fs::write(self.dir.join(&fname), text).await.map_err(RelayError::WriteFailed)?;
        info!("Exported conversation ({} entries) to {}", entries.len(), fname);

        Ok(format!("/exports/{}", fname))
    }

    pub fn resolve(&self, filename: &str) -> Result<PathBuf, RelayError> {
        let rooted = filename.starts_with(|c: char| c == '/' || c == '\\');
        if filename.is_empty() || filename.contains("..") || rooted {
            return Err(RelayError::InvalidFilename);
        }
        Ok(self.dir.join(filename))
    }
}

/// `User: ...` for user turns, `Assistant: ...` for everything else.
pub fn render_transcript(entries: &[Value]) -> String {
    entries
        .iter()
        .map(|entry| {
            let role = entry.get("role").and_then(Value::as_str).unwrap_or("user");
            let content = match entry.get("content") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            let prefix = if role == "user" { "User" } else { "Assistant" };
            format!("{}: {}", prefix, content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
        .collect()
}

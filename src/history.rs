use chrono::{DateTime, Local};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A finished transcription headed for storage.
#[derive(Clone, Debug, Serialize)]
pub struct HistoryRecord {
    pub content: String,
    pub user_id: String,
    pub emotion: String,
    pub recorded_at: DateTime<Local>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("history endpoint returned status {0}")]
    Status(u16),
}

/// Persistence seam for finished transcriptions. Callers fire and forget;
/// see [`submit_detached`].
pub trait HistoryStore: Send + Sync {
    fn insert(&self, record: &HistoryRecord) -> Result<(), StoreError>;
}

/// Append-only CSV log under the project data dir, header on first write.
#[derive(Clone, Debug)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pilsa") {
            pd.data_dir().join("history.csv")
        } else {
            PathBuf::from("pilsa_history.csv")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for CsvHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for CsvHistoryStore {
    fn insert(&self, record: &HistoryRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = !self.path.exists();

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(["recorded_at", "user_id", "emotion", "content"])?;
        }
        let recorded_at = record.recorded_at.format("%c").to_string();
        writer.write_record([
            recorded_at.as_str(),
            record.user_id.as_str(),
            record.emotion.as_str(),
            record.content.as_str(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

/// JSON POST of `{content, user_id, emotion}` to a configured endpoint.
pub struct HttpHistoryStore {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpHistoryStore {
    pub fn new(endpoint: &str) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_owned(),
            client,
        })
    }
}

impl HistoryStore for HttpHistoryStore {
    fn insert(&self, record: &HistoryRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "content": record.content,
                "user_id": record.user_id,
                "emotion": record.emotion,
            }))
            .send()?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Fire-and-forget submission on a detached thread. Failures are logged and
/// never retried; the comparison and timer state never see the outcome.
pub fn submit_detached(store: Arc<dyn HistoryStore>, record: HistoryRecord) {
    std::thread::spawn(move || match store.insert(&record) {
        Ok(()) => debug!("stored finished transcription for {}", record.user_id),
        Err(e) => warn!("history insert failed (dropping record): {e}"),
    });
}

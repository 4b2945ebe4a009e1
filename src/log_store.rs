use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::contact::Submission;

/// One row of the submission log. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub received_at: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub situation: String,
    pub message: String,
}

impl From<&Submission> for LogRow {
    fn from(submission: &Submission) -> Self {
        Self {
            received_at: submission.received_at_display(),
            name: submission.name.clone(),
            phone: submission.phone.clone(),
            email: submission.email.clone().unwrap_or_default(),
            situation: submission.situation.clone(),
            message: submission.message.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log encoding error: {0}")]
    Csv(#[from] csv::Error),
    #[error("log task failed: {0}")]
    Task(String),
}

/// Append-only tabular sink for submissions.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn append(&self, row: &LogRow) -> Result<(), LogStoreError>;
}

/// CSV file log. Writes a header row when the file is new or empty.
pub struct CsvLogStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogStore for CsvLogStore {
    async fn append(&self, row: &LogRow) -> Result<(), LogStoreError> {
        // Serialize appends from this process so rows never interleave.
        let _guard = self.lock.lock().await;

        let path = self.path.clone();
        let row = row.clone();
        tokio::task::spawn_blocking(move || write_row(&path, &row))
            .await
            .map_err(|e| LogStoreError::Task(e.to_string()))?
    }
}

fn write_row(path: &Path, row: &LogRow) -> Result<(), LogStoreError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(row)?;
    writer.flush()?;
    Ok(())
}

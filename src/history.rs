//! Prediction history persisted as a single JSON document.
//!
//! Every append rewrites the whole document: the new contents go to a sibling temporary file
//! which is then renamed over the target. All reads and writes within the process are
//! serialized by the store mutex, so concurrent appends never lose each other's records.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

pub use self::record::*;
use crate::model::Features;
use crate::prelude::*;

mod record;

/// Result of reading the history document.
#[derive(Debug, PartialEq)]
pub enum History {
    /// The document does not exist yet.
    Absent,

    Loaded(Vec<PredictionRecord>),

    /// The document exists but could not be read or parsed.
    Corrupted { reason: String },
}

impl History {
    /// Falls back to the empty history when nothing could be loaded.
    #[must_use]
    pub fn into_records(self) -> Vec<PredictionRecord> {
        match self {
            Self::Loaded(records) => records,
            Self::Absent | Self::Corrupted { .. } => Vec::new(),
        }
    }
}

pub struct HistoryStore {
    path: PathBuf,

    /// Latest timestamp handed out by [`HistoryStore::record`], also serializes file access.
    last_timestamp: Mutex<Option<DateTime>>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_timestamp: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> History {
        let _guard = self.lock();
        self.read()
    }

    /// Returns all the records in the order they were appended.
    pub fn load_all(&self) -> Vec<PredictionRecord> {
        self.load().into_records()
    }

    /// Appends the record to the history and returns it as stored.
    ///
    /// Timestamps never decrease between successive records: a record older than the last one
    /// is stamped with the last timestamp. An unreadable history is replaced by the new
    /// single-record one.
    pub fn append(&self, mut record: PredictionRecord) -> Result<PredictionRecord> {
        let mut last_timestamp = self.lock();
        if let Some(last_timestamp) = *last_timestamp {
            record.timestamp = record.timestamp.max(last_timestamp);
        }
        let mut records = self.read().into_records();
        records.push(record.clone());
        self.write(&records)?;
        *last_timestamp = Some(record.timestamp);
        Ok(record)
    }

    /// Timestamps a new record and appends it to the history.
    #[instrument(level = "debug", skip_all, fields(prediction = prediction))]
    pub fn record(&self, features: Features, prediction: f64) -> Result<PredictionRecord> {
        self.append(PredictionRecord {
            timestamp: Utc::now(),
            features,
            prediction,
        })
    }

    /// Deletes the history document, succeeds if it is already missing.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub fn clear(&self) -> Result {
        let _guard = self.lock();
        match fs::remove_file(&self.path) {
            Ok(_) => {
                info!("cleared");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error)
                .with_context(|| format!("failed to remove `{}`", self.path.display())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<DateTime>> {
        // The guarded value stays consistent even if a writer panicked.
        self.last_timestamp.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> History {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return History::Absent,
            Err(error) => {
                warn!(path = %self.path.display(), "failed to read the history: {:#}", error);
                return History::Corrupted {
                    reason: error.to_string(),
                };
            }
        };
        match serde_json::from_slice(&contents) {
            Ok(records) => History::Loaded(records),
            Err(error) => {
                warn!(path = %self.path.display(), "history is corrupted: {:#}", error);
                History::Corrupted {
                    reason: error.to_string(),
                }
            }
        }
    }

    fn write(&self, records: &[PredictionRecord]) -> Result {
        let start_instant = Instant::now();
        let contents = serde_json::to_vec_pretty(records)?;
        let tmp_path = self.tmp_path();

        let result = Self::write_file(&tmp_path, &contents)
            .and_then(|_| Ok(fs::rename(&tmp_path, &self.path)?))
            .and_then(|_| self.sync_parent());
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result.with_context(|| format!("failed to write `{}`", self.path.display()))?;

        debug!(
            n_records = records.len(),
            elapsed = ?start_instant.elapsed(),
            path = %self.path.display(),
            "written",
        );
        Ok(())
    }

    fn write_file(path: &Path, contents: &[u8]) -> Result {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(())
    }

    /// Makes the rename durable.
    #[cfg(unix)]
    fn sync_parent(&self) -> Result {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn sync_parent(&self) -> Result {
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }
}

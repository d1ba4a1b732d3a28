//! Append-only batch of extracted records.
//!
//! The store holds no lock of its own. Concurrent `append` and
//! `export_and_clear` calls against the same key interleave arbitrarily: an
//! export may read a half-written batch and an append may land in a file an
//! export is about to delete. Callers must serialize access per key.

use crate::domain::{AppError, ClearOutcome, Record, Result, StoreState, DATA_FIELD};
use crate::infrastructure::BatchStorage;

use super::codec;

/// Persisted accumulator addressed by one resource key.
#[derive(Debug)]
pub struct AccumulatorStore<S> {
    storage: S,
    key: String,
}

impl<S: BatchStorage> AccumulatorStore<S> {
    /// Creates a store over `storage` for the resource `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Resource key of this batch.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Location of the batch, for display.
    pub fn location(&self) -> String {
        self.storage.describe(&self.key)
    }

    /// Current lifecycle state.
    ///
    /// # Errors
    /// Returns `Io` if the storage cannot be queried.
    pub fn state(&self) -> Result<StoreState> {
        Ok(match self.storage.len(&self.key)? {
            None => StoreState::Absent,
            Some(0) => StoreState::Empty,
            Some(_) => StoreState::NonEmpty,
        })
    }

    /// Appends records, writing the header only when the batch starts fresh.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    /// Returns `Io` on any storage failure. Nothing is retried.
    pub fn append(&self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        match self.state()? {
            StoreState::Absent | StoreState::Empty => {
                let text = codec::encode(records, true);
                self.storage.write(&self.key, text.as_bytes())?;
            }
            StoreState::NonEmpty => {
                let text = codec::encode(records, false);
                self.storage
                    .append(&self.key, format!("\n{text}").as_bytes())?;
            }
        }

        tracing::info!(key = %self.key, count = records.len(), "Appended records to batch");
        Ok(records.len())
    }

    /// Returns the full batch and deletes it.
    ///
    /// A failed deletion is logged and does not fail the call: the content
    /// has already been read and is returned regardless.
    ///
    /// # Errors
    /// Returns `NotFound` if no batch exists and `Io` if reading fails.
    pub fn export_and_clear(&self) -> Result<Vec<u8>> {
        let bytes = self.storage.read(&self.key)?.ok_or_else(|| AppError::NotFound {
            message: "No data extracted yet. Perform an extraction first.".into(),
        })?;

        match self.storage.remove(&self.key) {
            Ok(_) => tracing::info!(key = %self.key, bytes = bytes.len(), "Exported and cleared batch"),
            Err(e) => tracing::error!(key = %self.key, error = %e, "Failed to delete batch after export"),
        }

        Ok(bytes)
    }

    /// Deletes the batch if it exists. Idempotent.
    ///
    /// # Errors
    /// Returns `Io` if an existing batch cannot be deleted.
    pub fn clear(&self) -> Result<ClearOutcome> {
        if self.state()? == StoreState::Absent {
            return Ok(ClearOutcome::NothingToClear);
        }

        if self.storage.remove(&self.key)? {
            tracing::info!(key = %self.key, "Cleared batch");
            Ok(ClearOutcome::Cleared)
        } else {
            Ok(ClearOutcome::NothingToClear)
        }
    }

    /// Number of records currently in the batch.
    ///
    /// Counts non-empty lines after the header, the same lines `decode`
    /// turns into rows for the line-per-record form the unquoted writer
    /// produces. A record containing a line break therefore counts once per
    /// line.
    ///
    /// # Errors
    /// Returns `Io` if the batch cannot be read.
    pub fn size(&self) -> Result<usize> {
        let Some(bytes) = self.storage.read(&self.key)? else {
            return Ok(0);
        };
        let text = String::from_utf8_lossy(&bytes);
        Ok(text
            .lines()
            .filter(|line| !line.is_empty())
            .count()
            .saturating_sub(1))
    }

    /// Puts previously exported content back as the whole batch.
    ///
    /// # Errors
    /// Returns `Io` if the batch cannot be written.
    pub fn restore(&self, bytes: &[u8]) -> Result<()> {
        self.storage.write(&self.key, bytes)?;
        tracing::warn!(key = %self.key, bytes = bytes.len(), "Restored batch after failed delivery");
        Ok(())
    }

    /// Current records, decoded with the header.
    ///
    /// # Errors
    /// Returns `Io` if the batch cannot be read and `Parse` if it is malformed.
    pub fn records(&self) -> Result<Vec<Record>> {
        let Some(bytes) = self.storage.read(&self.key)? else {
            return Ok(Vec::new());
        };
        let text = String::from_utf8_lossy(&bytes);
        Ok(codec::decode(&text, true)?
            .iter()
            .map(|row| Record::new(row.get(DATA_FIELD).unwrap_or_default()))
            .collect())
    }
}

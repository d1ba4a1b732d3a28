//! Request/response surface over the extractor and the accumulator store.
//!
//! Each method is one user action. The service keeps no counter of its own;
//! totals always come from the store.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{AppConfig, AppError, ClearOutcome, Result, StoreState};
use crate::infrastructure::{BatchStorage, LocalStorage};

use super::accumulator::AccumulatorStore;
use super::extractor::{extract, ExtractOptions};

/// Response to an extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    /// Records extracted and appended by this call.
    pub count: usize,
    /// Records in the batch afterwards, if the batch could be read back.
    pub total: Option<usize>,
}

/// Exported batch content.
#[derive(Debug, Clone)]
pub struct Download {
    /// Raw batch bytes.
    pub bytes: Vec<u8>,
    /// Suggested file name.
    pub filename: String,
}

/// Response to a clear.
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Whether a batch was actually removed.
    pub cleared: bool,
}

/// Snapshot of the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStatus {
    /// Lifecycle state.
    pub state: StoreState,
    /// Records currently in the batch.
    pub records: usize,
    /// Where the batch lives.
    pub location: String,
}

/// Batch operations bound to one store.
#[derive(Debug)]
pub struct BatchService<S> {
    store: AccumulatorStore<S>,
    options: ExtractOptions,
    download_name: String,
}

impl BatchService<LocalStorage> {
    /// Builds a filesystem-backed service from configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            AccumulatorStore::new(
                LocalStorage::new(config.data_dir()),
                config.batch.file_name.clone(),
            ),
            ExtractOptions::from(&config.extract),
            config.batch.download_name.clone(),
        )
    }
}

impl<S: BatchStorage> BatchService<S> {
    /// Creates a service.
    pub fn new(
        store: AccumulatorStore<S>,
        options: ExtractOptions,
        download_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            options,
            download_name: download_name.into(),
        }
    }

    /// Underlying store.
    pub const fn store(&self) -> &AccumulatorStore<S> {
        &self.store
    }

    /// Extracts comments from `html` and appends them to the batch.
    ///
    /// # Errors
    /// Returns `InvalidInput` for empty markup, `ExtractionFailed` for a bad
    /// selector and `Io` if the batch cannot be written.
    pub fn extract(&self, html: &str) -> Result<ExtractResponse> {
        let records = extract(html, &self.options)?;
        let count = self.store.append(&records)?;

        // The records are saved at this point; failing here would invite a
        // duplicating retry.
        let total = match self.store.size() {
            Ok(total) => Some(total),
            Err(e) => {
                tracing::warn!(error = %e, count, "Failed to read batch size after append");
                None
            }
        };

        Ok(ExtractResponse { count, total })
    }

    /// Exports the batch and deletes it.
    ///
    /// # Errors
    /// Returns `NotFound` if nothing has been extracted yet.
    pub fn download(&self) -> Result<Download> {
        let bytes = self.store.export_and_clear()?;
        Ok(Download {
            bytes,
            filename: self.download_name.clone(),
        })
    }

    /// Exports the batch into the file at `path`, clearing it only once the
    /// bytes are written.
    ///
    /// The file is created before the batch is touched. If writing the bytes
    /// fails afterwards, the exported content is restored as the batch.
    ///
    /// # Errors
    /// Returns `NotFound` if nothing has been extracted yet and `Io` if the
    /// file cannot be created or written.
    pub fn download_to(&self, path: &Path) -> Result<Download> {
        let mut file = File::create(path)
            .map_err(|e| AppError::io(format!("Failed to create {}", path.display()), e))?;

        let download = match self.download() {
            Ok(download) => download,
            Err(e) => {
                drop(file);
                if let Err(remove_err) = std::fs::remove_file(path) {
                    tracing::debug!(error = %remove_err, "Failed to remove unused download file");
                }
                return Err(e);
            }
        };

        if let Err(e) = file.write_all(&download.bytes).and_then(|()| file.flush()) {
            self.store.restore(&download.bytes)?;
            return Err(AppError::io(
                format!("Failed to write {}", path.display()),
                e,
            ));
        }

        Ok(download)
    }

    /// Clears the batch on explicit user request.
    ///
    /// # Errors
    /// Returns `Io` if an existing batch cannot be deleted.
    pub fn clear(&self) -> Result<ClearResponse> {
        let outcome = self.store.clear()?;
        Ok(clear_response(outcome, "Extraction data cleared."))
    }

    /// Clears the batch once a merge has completed.
    ///
    /// Same effect as [`Self::clear`]; kept separate so the merge flow and the
    /// user's clear are distinguishable in output and logs.
    ///
    /// # Errors
    /// Returns `Io` if an existing batch cannot be deleted.
    pub fn clear_after_merge(&self) -> Result<ClearResponse> {
        let outcome = self.store.clear()?;
        tracing::debug!(?outcome, "Clear after merge");
        Ok(clear_response(outcome, "Data cleared after merge operation."))
    }

    /// Current state and authoritative record count.
    ///
    /// # Errors
    /// Returns `Io` if the batch cannot be read.
    pub fn status(&self) -> Result<BatchStatus> {
        Ok(BatchStatus {
            state: self.store.state()?,
            records: self.store.size()?,
            location: self.store.location(),
        })
    }
}

fn clear_response(outcome: ClearOutcome, cleared_message: &str) -> ClearResponse {
    match outcome {
        ClearOutcome::Cleared => ClearResponse {
            message: cleared_message.to_string(),
            cleared: true,
        },
        ClearOutcome::NothingToClear => ClearResponse {
            message: "No data to clear.".to_string(),
            cleared: false,
        },
    }
}

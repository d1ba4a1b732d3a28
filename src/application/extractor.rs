//! Comment extraction service.
//!
//! Selects marked elements from pasted markup and turns their visible text
//! into records.

use scraper::{Html, Selector};

use crate::domain::{AppError, ExtractConfig, Record, Result};

/// Options for comment extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// CSS selector marking eligible elements.
    pub selector: String,
    /// Texts shorter than this many UTF-16 code units are discarded.
    pub min_length: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&ExtractConfig::default())
    }
}

impl From<&ExtractConfig> for ExtractOptions {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            selector: config.selector.clone(),
            min_length: config.min_length,
        }
    }
}

/// Extracts records from a markup fragment, in document order.
///
/// Pure function of its input: no deduplication and no memory across calls.
///
/// # Errors
/// Returns `InvalidInput` if the fragment is empty and `ExtractionFailed` if
/// the selector cannot be parsed.
pub fn extract(fragment: &str, options: &ExtractOptions) -> Result<Vec<Record>> {
    if fragment.is_empty() {
        return Err(AppError::invalid_input("HTML content is missing."));
    }

    let selector = Selector::parse(&options.selector).map_err(|e| AppError::ExtractionFailed {
        message: format!("Invalid selector '{}': {e}", options.selector),
    })?;

    let document = Html::parse_document(fragment);
    let mut records = Vec::new();
    let mut matched = 0usize;

    for element in document.select(&selector) {
        matched += 1;
        let text = element.text().collect::<String>();
        let text = text.trim();

        let length = text.encode_utf16().count();
        if length < options.min_length {
            tracing::debug!(length, "Skipping short match");
            continue;
        }

        records.push(Record::new(text));
    }

    tracing::info!(
        matched,
        kept = records.len(),
        selector = %options.selector,
        "Extracted comments from markup"
    );

    Ok(records)
}

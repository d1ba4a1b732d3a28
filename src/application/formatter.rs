//! Output formatting for command responses.
//!
//! Supports human-readable text and JSON for scripting.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::domain::{AppError, Record, Result, StoreState};

use super::batch_service::{BatchStatus, ClearResponse, ExtractResponse};

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON format for programmatic use.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: text, json")),
        }
    }
}

/// Serializes any response as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(AppError::json)
}

/// Formats an extraction response.
pub fn format_extract(response: &ExtractResponse) -> String {
    let total = response
        .total
        .map_or_else(|| "unknown".to_string(), |total| total.to_string());

    if response.count == 0 {
        format!(
            "{} No new comments found ({} in batch)",
            "•".yellow(),
            total.cyan()
        )
    } else {
        format!(
            "{} Extracted {} new comments ({} in batch)",
            "✓".green().bold(),
            response.count.to_string().green(),
            total.cyan()
        )
    }
}

/// Formats a clear response.
pub fn format_clear(response: &ClearResponse) -> String {
    if response.cleared {
        format!("{} {}", "✓".green().bold(), response.message)
    } else {
        format!("{} {}", "•".yellow(), response.message)
    }
}

/// Formats batch status for display.
pub fn format_status(status: &BatchStatus) -> String {
    let state = match status.state {
        StoreState::Absent => status.state.to_string().dimmed(),
        StoreState::Empty => status.state.to_string().yellow(),
        StoreState::NonEmpty => status.state.to_string().green(),
    };

    format!(
        "{}\n  State: {}\n  Records: {}\n  Location: {}",
        "📦 Batch".bold(),
        state,
        status.records.to_string().cyan(),
        status.location
    )
}

/// Formats a table of batch records.
pub fn format_records_table(records: &[Record], limit: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Comment"]);

    for (i, record) in records.iter().take(limit).enumerate() {
        table.add_row(vec![(i + 1).to_string(), truncate(&record.data, 70)]);
    }

    let mut out = table.to_string();
    if records.len() > limit {
        out.push_str(&format!("\n… {} more", records.len() - limit));
    }
    out
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("first\nsecond", 20), "first");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("rất tốt, giao nhanh", 8), "rất t...");
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_extract_json_shape() {
        let json = format_json(&ExtractResponse {
            count: 2,
            total: Some(7),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["total"], 7);
    }

    #[test]
    fn test_extract_with_unknown_total() {
        let response = ExtractResponse {
            count: 3,
            total: None,
        };
        assert!(format_extract(&response).contains("unknown in batch"));

        let value: serde_json::Value =
            serde_json::from_str(&format_json(&response).unwrap()).unwrap();
        assert!(value["total"].is_null());
    }

    #[test]
    fn test_records_table_limits_rows() {
        let records: Vec<Record> = (0..5).map(|i| Record::new(format!("comment {i}"))).collect();
        let out = format_records_table(&records, 2);
        assert!(out.contains("comment 0"));
        assert!(!out.contains("comment 3"));
        assert!(out.ends_with("… 3 more"));
    }
}

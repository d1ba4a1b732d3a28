//! Domain models for extracted comments and the batch they accumulate into.

use serde::{Deserialize, Serialize};

/// Name of the single column written to batch exports.
pub const DATA_FIELD: &str = "data";

/// A single extracted text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Free text; may contain delimiters or line breaks.
    pub data: String,
}

impl Record {
    /// Creates a record from any string-like value.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// One decoded row of delimited text, keeping the header's field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field. Later duplicates of a name are kept but shadowed by `get`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Looks up a value by field name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in header order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A named delimited-text resource (a merge input or the merge output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Display name, usually the file name.
    pub name: String,
    /// Full text content.
    pub content: String,
}

impl Resource {
    /// Creates a resource.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Lifecycle state of the batch resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreState {
    /// No resource exists.
    Absent,
    /// Resource exists with zero bytes.
    Empty,
    /// Resource exists and holds at least one record.
    NonEmpty,
}

impl std::fmt::Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Empty => write!(f, "empty"),
            Self::NonEmpty => write!(f, "non-empty"),
        }
    }
}

/// Result of an explicit clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// A batch existed and was removed.
    Cleared,
    /// There was nothing to remove.
    NothingToClear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_field_order() {
        let row: Row = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("c"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_store_state_serializes_uppercase() {
        let json = serde_json::to_string(&StoreState::NonEmpty).unwrap();
        assert_eq!(json, "\"NONEMPTY\"");
    }
}

//! Merging of previously exported batch files.

use crate::domain::{AppError, Resource, Result};

use super::codec;

/// Concatenates the rows of every input, in input order, into one resource.
///
/// Rows are neither deduplicated nor projected onto a common set of columns;
/// the output header is taken from the first row (see [`codec::encode_merged`]).
///
/// # Errors
/// Returns `InvalidInput` for fewer than two inputs and `Parse` as soon as any
/// input fails to decode. No partial output is produced.
pub fn merge(resources: &[Resource], output_name: &str) -> Result<Resource> {
    if resources.len() < 2 {
        return Err(AppError::invalid_input(
            "At least 2 CSV files are required to merge.",
        ));
    }

    let mut rows = Vec::new();
    for resource in resources {
        let decoded = codec::decode(&resource.content, true).map_err(|e| match e {
            AppError::Parse { line, message } => AppError::Parse {
                line,
                message: format!("{}: {message}", resource.name),
            },
            other => other,
        })?;
        tracing::debug!(name = %resource.name, rows = decoded.len(), "Decoded merge input");
        rows.extend(decoded);
    }

    let content = codec::encode_merged(&rows)?;

    tracing::info!(
        inputs = resources.len(),
        rows = rows.len(),
        output = output_name,
        "Merged CSV files"
    );

    Ok(Resource::new(output_name, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_input_order() {
        let first = Resource::new("a.csv", "data\nfirst a\nsecond a");
        let second = Resource::new("b.csv", "data\nfirst b\nsecond b\nthird b");

        let merged = merge(&[first, second], "merged.csv").unwrap();
        assert_eq!(merged.name, "merged.csv");

        let rows = codec::decode(&merged.content, true).unwrap();
        let values: Vec<&str> = rows.iter().filter_map(|r| r.get("data")).collect();
        assert_eq!(
            values,
            vec!["first a", "second a", "first b", "second b", "third b"]
        );
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let a = Resource::new("a.csv", "data\nsame comment");
        let b = Resource::new("b.csv", "data\nsame comment");

        let merged = merge(&[a, b], "merged.csv").unwrap();
        assert_eq!(codec::decode(&merged.content, true).unwrap().len(), 2);
    }

    #[test]
    fn test_merged_output_can_be_merged_again() {
        let a = Resource::new("a.csv", "data\none line");
        let b = Resource::new("b.csv", "data\n\"quoted, with comma\"");
        let first = merge(&[a, b], "m1.csv").unwrap();

        let c = Resource::new("c.csv", "data\nthird line");
        let second = merge(&[first, c], "m2.csv").unwrap();

        let rows = codec::decode(&second.content, true).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get("data"), Some("quoted, with comma"));
    }

    #[test]
    fn test_single_input_is_invalid() {
        let only = Resource::new("a.csv", "data\nx");
        let err = merge(&[only], "merged.csv").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[test]
    fn test_bad_input_aborts_merge() {
        let good = Resource::new("good.csv", "data\nfine");
        let bad = Resource::new("bad.csv", "data\n\"unterminated");

        let err = merge(&[good, bad], "merged.csv").unwrap_err();
        match err {
            AppError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.starts_with("bad.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

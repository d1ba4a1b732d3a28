//! Delimited-text codec for batch exports and merged files.
//!
//! Encoding of batch records is deliberately unquoted: values are written
//! verbatim, so a value containing a comma or a line break will not survive
//! a quoted read-back. Merged output is fully quoted.

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use crate::domain::{AppError, Record, Result, Row, DATA_FIELD};

/// Byte-order marker prefixed to merged output.
pub const BOM: char = '\u{FEFF}';

/// Encodes records as a single `data` column, one line per record.
///
/// Values are written verbatim, an empty value included: it becomes an empty
/// line, which `decode` skips. The output never ends with a line terminator;
/// callers appending to an existing batch must insert the separator
/// themselves.
///
/// Lines are joined directly rather than through a `csv::Writer`: with
/// quoting off the writer only differs by quoting a lone empty field.
#[must_use]
pub fn encode(records: &[Record], include_header: bool) -> String {
    let header = include_header.then_some(DATA_FIELD);
    header
        .into_iter()
        .chain(records.iter().map(|record| record.data.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes delimited text into rows.
///
/// With `has_header` the first line names the fields; otherwise fields are
/// keyed by zero-based column index. Empty lines are skipped (lines holding
/// only whitespace are rows) and a leading byte-order marker is ignored.
///
/// # Errors
/// Returns `Parse` if a quoted field is never closed or the text is otherwise
/// malformed.
pub fn decode(text: &str, has_header: bool) -> Result<Vec<Row>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    check_quotes(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(text.as_bytes());

    let names: Option<Vec<String>> = if has_header {
        Some(
            reader
                .headers()
                .map_err(csv_error)?
                .iter()
                .map(str::to_string)
                .collect(),
        )
    } else {
        None
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let row: Row = match &names {
            Some(names) => names
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.as_str(), value))
                .collect(),
            None => record
                .iter()
                .enumerate()
                .map(|(i, value)| (i.to_string(), value))
                .collect(),
        };
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), has_header, "Decoded delimited text");
    Ok(rows)
}

/// Encodes merged rows with every field quoted and a byte-order marker.
///
/// The header comes from the first row only. Later rows are written by
/// looking up those names: missing fields become empty and extra fields are
/// dropped. Rows with a different field set are not reconciled.
///
/// # Errors
/// Returns error if the underlying writer fails.
pub fn encode_merged(rows: &[Row]) -> Result<String> {
    let Some(first) = rows.first() else {
        return Ok(BOM.to_string());
    };
    let names: Vec<&str> = first.names().collect();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&names).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record(names.iter().map(|name| row.get(name).unwrap_or("")))
            .map_err(csv_error)?;
    }

    let text = finish(writer)?;
    let body = text.strip_suffix("\r\n").unwrap_or(&text);
    Ok(format!("{BOM}{body}"))
}

/// Flushes a writer and returns its buffer as text.
fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::io("Failed to flush encoded text", e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::parse(0, e.to_string()))
}

/// Fails if a quoted field is still open at end of input.
fn check_quotes(text: &str) -> Result<()> {
    let mut line = 1u64;
    let mut opened_at = 0u64;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                opened_at = line;
                at_field_start = false;
            }
            ',' | '\r' => at_field_start = true,
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(AppError::parse(opened_at, "quoted field is never closed"));
    }
    Ok(())
}

fn csv_error(err: csv::Error) -> AppError {
    let line = err.position().map_or(0, csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => AppError::io(message, source),
        _ => AppError::parse(line, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(values: &[&str]) -> Vec<Record> {
        values.iter().map(|v| Record::new(*v)).collect()
    }

    #[test]
    fn test_encode_with_header() {
        let text = encode(&records(&["first comment", "second comment"]), true);
        assert_eq!(text, "data\nfirst comment\nsecond comment");
    }

    #[test]
    fn test_encode_without_header_has_no_trailing_newline() {
        let text = encode(&records(&["only one"]), false);
        assert_eq!(text, "only one");
    }

    #[test]
    fn test_encode_writes_values_verbatim() {
        let text = encode(&records(&["a, b", "say \"hi\""]), false);
        assert_eq!(text, "a, b\nsay \"hi\"");
    }

    #[test]
    fn test_unquoted_delimiter_splits_on_read_back() {
        let text = encode(&records(&["red, green"]), true);
        let rows = decode(&text, true).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("data"), Some("red"));
    }

    #[test]
    fn test_encode_empty_value_is_an_empty_line() {
        let text = encode(&records(&[""]), true);
        assert_eq!(text, "data\n");
        assert!(decode(&text, true).unwrap().is_empty());
    }

    #[test]
    fn test_decode_keeps_whitespace_only_lines() {
        let rows = decode("data\n   \nfoo", true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("data"), Some("   "));
    }

    #[test]
    fn test_decode_with_header() {
        let rows = decode("data\nhello world\nsecond line", true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("data"), Some("hello world"));
        assert_eq!(rows[1].get("data"), Some("second line"));
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let rows = decode("data\n\nfirst\n\n\nsecond\n", true).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_decode_without_header_uses_column_index() {
        let rows = decode("a,b\nc,d", false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("0"), Some("a"));
        assert_eq!(rows[1].get("1"), Some("d"));
    }

    #[test]
    fn test_decode_quoted_field_with_newline() {
        let rows = decode("data\n\"line one\nline two\"\nnext", true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("data"), Some("line one\nline two"));
    }

    #[test]
    fn test_decode_unbalanced_quote_fails() {
        let err = decode("data\nok\n\"never closed\nmore", true).unwrap_err();
        assert!(matches!(err, AppError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_decode_strips_bom() {
        let rows = decode("\u{FEFF}\"data\"\r\n\"x\"", true).unwrap();
        assert_eq!(rows[0].get("data"), Some("x"));
    }

    #[test]
    fn test_encode_merged_quotes_everything() {
        let rows = vec![
            [("data", "plain")].into_iter().collect::<Row>(),
            [("data", "has \"quote\"")].into_iter().collect::<Row>(),
        ];
        let text = encode_merged(&rows).unwrap();
        assert_eq!(
            text,
            "\u{FEFF}\"data\"\r\n\"plain\"\r\n\"has \"\"quote\"\"\""
        );
    }

    #[test]
    fn test_encode_merged_header_from_first_row() {
        let rows = vec![
            [("data", "one")].into_iter().collect::<Row>(),
            [("text", "two"), ("data", "three")]
                .into_iter()
                .collect::<Row>(),
            [("text", "four")].into_iter().collect::<Row>(),
        ];
        let text = encode_merged(&rows).unwrap();
        assert_eq!(
            text,
            "\u{FEFF}\"data\"\r\n\"one\"\r\n\"three\"\r\n\"\""
        );
    }

    #[test]
    fn test_encode_merged_empty_is_bom_only() {
        assert_eq!(encode_merged(&[]).unwrap(), "\u{FEFF}");
    }
}

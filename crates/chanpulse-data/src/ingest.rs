use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::DataError;

/// An in-memory raw tabular export: header-addressed rows of one CSV file.
///
/// Header names are normalized (BOM stripped, trimmed, lowercased) so column
/// lookup is insensitive to export quirks. Row-level problems are the
/// caller's concern; this layer only fails on unreadable or structurally
/// unparsable files.
#[derive(Debug)]
pub struct Table {
    path: String,
    index: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl Table {
    /// Read a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Io`] if the file cannot be opened and
    /// [`DataError::Csv`] if the header or records cannot be parsed.
    pub fn read(path: &Path) -> Result<Self, DataError> {
        let display = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| DataError::Io {
            path: display.clone(),
            source: e,
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| DataError::Csv {
            path: display.clone(),
            source: e,
        })?;

        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (normalize_header(name), i))
            .collect();

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DataError::Csv {
                path: display.clone(),
                source: e,
            })?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            records.push(record);
        }

        Ok(Self {
            path: display,
            index,
            records,
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Column position by normalized header name.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumn`] if the header row lacks the column.
    pub fn column(&self, name: &str) -> Result<usize, DataError> {
        self.index
            .get(&normalize_header(name))
            .copied()
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
            })
    }

    #[must_use]
    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    /// Cell value at `(record, column)`; absent cells read as empty. Flexible
    /// exports may produce short rows, so out-of-range is not an error.
    #[must_use]
    pub fn cell<'a>(&self, record: &'a StringRecord, column: usize) -> &'a str {
        record.get(column).unwrap_or("")
    }
}

fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Parse a numeric cell defensively: bare digits (`12345`) or quoted
/// thousands-grouped strings (`"12,345"`) both normalize to an integer, and a
/// blank cell counts as zero. Returns `None` for anything else so the caller
/// can skip (and count) the malformed row.
#[must_use]
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '"' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Some(0);
    }
    cleaned.parse().ok()
}

/// Like [`parse_count`] but treats blank as absent rather than zero, for
/// optional ordinal fields such as a search rank.
#[must_use]
pub fn parse_optional_rank(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_count(trimmed).and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("table.csv");
        let mut file = std::fs::File::create(&path).expect("create csv");
        file.write_all(contents.as_bytes()).expect("write csv");
        (dir, path)
    }

    #[test]
    fn parse_count_accepts_bare_digits() {
        assert_eq!(parse_count("12345"), Some(12345));
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn parse_count_accepts_quoted_thousands_grouping() {
        // The csv layer strips the surrounding quotes; the comma survives.
        assert_eq!(parse_count("1,258"), Some(1258));
        assert_eq!(parse_count("12,345,678"), Some(12_345_678));
        // Some exports double-quote inside an already-quoted field.
        assert_eq!(parse_count("\"8,904\""), Some(8904));
    }

    #[test]
    fn parse_count_blank_is_zero_and_garbage_is_none() {
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("   "), Some(0));
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("12.5"), None);
    }

    #[test]
    fn parse_optional_rank_blank_is_absent() {
        assert_eq!(parse_optional_rank(""), None);
        assert_eq!(parse_optional_rank("4"), Some(4));
        assert_eq!(parse_optional_rank("bogus"), None);
    }

    #[test]
    fn read_table_indexes_headers_case_insensitively() {
        let (_dir, path) = write_csv("Keyword,Posts\nshrink,\"1,258\"\n");
        let table = Table::read(&path).expect("readable table");
        let keyword = table.column("keyword").expect("keyword column");
        let posts = table.column("POSTS").expect("posts column");
        assert_eq!(table.records().len(), 1);
        let record = &table.records()[0];
        assert_eq!(table.cell(record, keyword), "shrink");
        assert_eq!(parse_count(table.cell(record, posts)), Some(1258));
    }

    #[test]
    fn read_table_strips_bom_and_skips_blank_lines() {
        let (_dir, path) = write_csv("\u{feff}keyword,posts\n\nshrink,10\n,,\n");
        let table = Table::read(&path).expect("readable table");
        assert!(table.column("keyword").is_ok());
        assert_eq!(table.records().len(), 1);
    }

    #[test]
    fn read_table_missing_column_is_an_error() {
        let (_dir, path) = write_csv("keyword,posts\nshrink,10\n");
        let table = Table::read(&path).expect("readable table");
        let err = table.column("comments").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "comments"));
    }

    #[test]
    fn read_table_missing_file_is_io_error() {
        let err = Table::read(Path::new("/nonexistent/table.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let (_dir, path) = write_csv("keyword,posts,comments\nshrink,10\n");
        let table = Table::read(&path).expect("readable table");
        let comments = table.column("comments").expect("comments column");
        assert_eq!(table.cell(&table.records()[0], comments), "");
    }
}

//! Dataset loading module
//!
//! Reads the player statistics CSV into an ordered in-memory table. Column
//! types are inferred from content: a column where every non-empty cell
//! parses as a float is numeric, everything else stays text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One parsed CSV cell, tagged by the inferred column type.
///
/// `Null` marks an empty or unparseable cell in a numeric column. It
/// serializes as JSON `null` and sorts below every number.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Whole-number columns stay integers in the JSON output
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Null => serializer.serialize_none(),
        }
    }
}

impl Value {
    /// Text content of the cell, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Comparison key for largest-N selection. Missing and non-numeric
    /// values rank below every real number; NaN is treated as missing.
    pub fn sort_key(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            _ => f64::NEG_INFINITY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// The full dataset: column names in file order plus one row per CSV record.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by its exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, column). Out-of-range lookups yield `Null`.
    pub fn value(&self, row: usize, column: usize) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Value::Null)
    }

    /// Borrowed view of one row, serialized as a JSON object in column order.
    pub fn row(&self, row: usize) -> RowView<'_> {
        RowView {
            table: self,
            row,
            columns: None,
        }
    }

    /// Like [`Table::row`], restricted to the given columns, in that order.
    pub fn row_projection<'a>(&'a self, row: usize, columns: &'a [usize]) -> RowView<'a> {
        RowView {
            table: self,
            row,
            columns: Some(columns),
        }
    }
}

/// One table row as a serializable field-name → value mapping.
pub struct RowView<'a> {
    table: &'a Table,
    row: usize,
    columns: Option<&'a [usize]>,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let all: Vec<usize>;
        let columns = match self.columns {
            Some(c) => c,
            None => {
                all = (0..self.table.headers.len()).collect();
                &all
            }
        };

        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for &col in columns {
            map.serialize_entry(&self.table.headers[col], self.table.value(self.row, col))?;
        }
        map.end()
    }
}

/// Load the dataset from a CSV file on disk.
///
/// The file is re-read on every call: the service holds no dataset cache,
/// so responses always reflect the file's current content.
pub fn load(path: &Path) -> Result<Table, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    from_reader(file).map_err(|e| DatasetError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse CSV from any reader. Split out so tests can feed inline strings.
pub(crate) fn from_reader<R: Read>(rdr: R) -> Result<Table, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for record in reader.records() {
        raw.push(record?);
    }

    // A column is numeric when it has at least one parseable cell and no
    // non-empty cell that fails to parse.
    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| {
            let mut any_number = false;
            let no_failures = raw.iter().all(|record| match record.get(col) {
                None => true,
                Some(cell) if cell.trim().is_empty() => true,
                Some(cell) => {
                    let parsed = cell.trim().parse::<f64>().is_ok();
                    any_number |= parsed;
                    parsed
                }
            });
            any_number && no_failures
        })
        .collect();

    let rows = raw
        .iter()
        .map(|record| {
            (0..headers.len())
                .map(|col| {
                    let cell = record.get(col).unwrap_or("");
                    if numeric[col] {
                        cell.trim().parse::<f64>().map_or(Value::Null, Value::Number)
                    } else {
                        Value::Text(cell.to_string())
                    }
                })
                .collect()
        })
        .collect();

    Ok(Table { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv_data: &str) -> Table {
        from_reader(csv_data.as_bytes()).unwrap()
    }

    #[test]
    fn headers_keep_file_order() {
        let t = table("PlayerName,TeamName,Position,KDA\nFaker,T1,Mid,5.6\n");
        assert_eq!(t.headers(), ["PlayerName", "TeamName", "Position", "KDA"]);
    }

    #[test]
    fn numeric_columns_parse_as_numbers() {
        let t = table("PlayerName,KDA\nFaker,5.6\nChovy,7.1\n");
        assert_eq!(t.value(0, 1), &Value::Number(5.6));
        assert_eq!(t.value(1, 1), &Value::Number(7.1));
    }

    #[test]
    fn text_columns_stay_text() {
        let t = table("PlayerName,TeamName\nFaker,T1\nChovy,GEN\n");
        assert_eq!(t.value(0, 0), &Value::Text("Faker".to_string()));
        assert_eq!(t.value(1, 1), &Value::Text("GEN".to_string()));
    }

    #[test]
    fn mixed_column_falls_back_to_text() {
        // One unparseable cell keeps the whole column textual.
        let t = table("PlayerName,KDA\nFaker,5.6\nChovy,n/a\n");
        assert_eq!(t.value(0, 1), &Value::Text("5.6".to_string()));
        assert_eq!(t.value(1, 1), &Value::Text("n/a".to_string()));
    }

    #[test]
    fn empty_cell_in_numeric_column_is_null() {
        let t = table("PlayerName,KDA\nFaker,5.6\nChovy,\n");
        assert_eq!(t.value(0, 1), &Value::Number(5.6));
        assert_eq!(t.value(1, 1), &Value::Null);
    }

    #[test]
    fn all_empty_column_is_text() {
        let t = table("PlayerName,KDA\nFaker,\nChovy,\n");
        assert_eq!(t.value(0, 1), &Value::Text(String::new()));
    }

    #[test]
    fn rows_keep_file_order() {
        let t = table("PlayerName,KDA\nZeus,3.0\nOner,4.0\nFaker,5.0\n");
        assert_eq!(t.len(), 3);
        assert_eq!(t.value(0, 0).as_text(), Some("Zeus"));
        assert_eq!(t.value(2, 0).as_text(), Some("Faker"));
    }

    #[test]
    fn row_serializes_all_fields_in_order() {
        let t = table("PlayerName,TeamName,KDA\nFaker,T1,5.6\n");
        let json = serde_json::to_string(&t.row(0)).unwrap();
        assert_eq!(json, r#"{"PlayerName":"Faker","TeamName":"T1","KDA":5.6}"#);
    }

    #[test]
    fn row_projection_serializes_selected_fields() {
        let t = table("PlayerName,TeamName,Position,KDA\nFaker,T1,Mid,5.6\n");
        let columns = [0, 3];
        let json = serde_json::to_string(&t.row_projection(0, &columns)).unwrap();
        assert_eq!(json, r#"{"PlayerName":"Faker","KDA":5.6}"#);
    }

    #[test]
    fn whole_numbers_serialize_without_decimal_point() {
        let t = table("PlayerName,DPM\nFaker,608\n");
        let json = serde_json::to_string(&t.row(0)).unwrap();
        assert_eq!(json, r#"{"PlayerName":"Faker","DPM":608}"#);
    }

    #[test]
    fn null_serializes_as_json_null() {
        let t = table("PlayerName,KDA\nFaker,5.6\nChovy,\n");
        let json = serde_json::to_string(&t.row(1)).unwrap();
        assert_eq!(json, r#"{"PlayerName":"Chovy","KDA":null}"#);
    }

    #[test]
    fn sort_key_ranks_missing_below_numbers() {
        assert!(Value::Number(0.0).sort_key() > Value::Null.sort_key());
        assert!(Value::Number(-10.0).sort_key() > Value::Text("x".to_string()).sort_key());
        assert_eq!(Value::Number(f64::NAN).sort_key(), f64::NEG_INFINITY);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("no/such/file.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn empty_csv_has_no_rows() {
        let t = table("PlayerName,KDA\n");
        assert!(t.is_empty());
        assert_eq!(t.headers().len(), 2);
    }
}

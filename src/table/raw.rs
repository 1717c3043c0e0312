//! Raw-data ingestion: CSV/TXT bytes or one worksheet of an xlsx/xlsm file,
//! parsed into a column-named table of [`Value`]s. The file name decides the
//! container; the first line or row always carries the column names.

use crate::helpers::normalize::normalize_header;
use crate::table::value::Value;
use calamine::{open_workbook_from_rs, Reader, Xlsx, XlsxError};
use encoding_rs::UTF_8;
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;

/// Errors raised while reading raw-data or mapping input files.
#[derive(Error, Debug)]
pub enum RawTableError {
    /// Unsupported or unrecognized file format
    #[error("cannot detect file format for '{name}' (expected .csv, .txt, .xlsx or .xlsm)")]
    UnsupportedFormat { name: String },

    /// Text input that is not valid UTF-8
    #[error("text input is not valid UTF-8")]
    InvalidEncoding,

    /// Malformed CSV input
    #[error("invalid csv data: {0}")]
    InvalidCsv(#[from] csv::Error),

    /// Error in Excel 2007+ format (.xlsx, .xlsm)
    #[error("invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] XlsxError),

    /// Requested worksheet does not exist
    #[error("sheet '{name}' not found in workbook")]
    SheetNotFound { name: String },

    /// Workbook contains no worksheets at all
    #[error("workbook has no sheets")]
    NoSheets,
}

/// An ordered, column-named table of scalar values.
///
/// Every row holds exactly one value per column. Column names are kept as
/// supplied; lookups go through the normalized index where the first
/// occurrence of a name wins.
#[derive(Clone, Debug, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    /// Reads a table from file bytes, dispatching on the file-name extension:
    /// `.csv`/`.txt` are comma-delimited text, `.xlsx`/`.xlsm` are workbooks
    /// (with `sheet` selecting a worksheet by name, defaulting to the first).
    pub fn read(bytes: &[u8], file_name: &str, sheet: Option<&str>) -> Result<Self, RawTableError> {
        let name = file_name.to_ascii_lowercase();
        if name.ends_with(".csv") || name.ends_with(".txt") {
            Self::from_csv(bytes)
        } else if name.ends_with(".xlsx") || name.ends_with(".xlsm") {
            Self::from_spreadsheet(bytes, sheet)
        } else {
            Err(RawTableError::UnsupportedFormat {
                name: file_name.to_owned(),
            })
        }
    }

    /// Parses comma-delimited UTF-8 text; the first line names the columns.
    /// Short rows are padded with empty values, long rows are truncated.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, RawTableError> {
        let (text, _, had_errors) = UTF_8.decode(bytes);
        if had_errors {
            return Err(RawTableError::InvalidEncoding);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.to_owned())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<Value> = record.iter().map(Value::from_csv_field).collect();
            row.resize(columns.len(), Value::Empty);
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }

    /// Parses one worksheet of an xlsx/xlsm workbook; row 1 names the columns.
    pub fn from_spreadsheet(bytes: &[u8], sheet: Option<&str>) -> Result<Self, RawTableError> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)?;

        let names = workbook.sheet_names();
        let name = match sheet {
            Some(requested) => {
                if !names.iter().any(|candidate| candidate == requested) {
                    return Err(RawTableError::SheetNotFound {
                        name: requested.to_owned(),
                    });
                }
                requested.to_owned()
            }
            None => names.first().ok_or(RawTableError::NoSheets)?.clone(),
        };

        let range = workbook.worksheet_range(&name)?;
        let mut row_iter = range.rows();
        let columns: Vec<String> = match row_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| Value::from(cell).to_string())
                .collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for data_row in row_iter {
            let mut row: Vec<Value> = data_row.iter().map(Value::from).collect();
            row.resize(columns.len(), Value::Empty);
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns true when the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds the normalized column-name index. The first occurrence of a
    /// normalized name wins; unnamed columns are not indexed.
    pub(crate) fn column_index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::new();
        for (position, column) in self.columns.iter().enumerate() {
            let key = normalize_header(column);
            if !key.is_empty() {
                index.entry(key).or_insert(position);
            }
        }
        index
    }
}

/// Lists the worksheet names of an xlsx/xlsm workbook, in workbook order.
/// The collaborator uses this to offer a sheet selector for raw uploads.
pub fn sheet_names(bytes: &[u8]) -> Result<Vec<String>, RawTableError> {
    let cursor = Cursor::new(bytes.to_vec());
    let workbook: Xlsx<_> = open_workbook_from_rs(cursor)?;
    Ok(workbook.sheet_names())
}

//! Template header indexing: one scan of row 1 of the first sheet into a
//! normalized-header → column-position map, built once per fill and read-only
//! afterwards.

use crate::fill::FillError;
use crate::helpers::normalize::normalize_header;
use indexmap::IndexMap;
use umya_spreadsheet::Worksheet;

/// Row of the first sheet that defines the target column positions.
pub const HEADER_ROW: u32 = 1;

/// Maps normalized header text to a 1-based column position.
#[derive(Clone, Debug)]
pub struct HeaderIndex {
    columns: IndexMap<String, u32>,
}

impl HeaderIndex {
    /// Scans the header row across every populated column. The first
    /// occurrence of a header text wins when row 1 repeats itself; cells that
    /// normalize to nothing are ignored. An entirely empty header row is a
    /// structure error that aborts the whole fill.
    pub fn scan(sheet: &Worksheet) -> Result<Self, FillError> {
        let mut columns = IndexMap::new();
        for column in 1..=sheet.get_highest_column() {
            let Some(cell) = sheet.get_cell((column, HEADER_ROW)) else {
                continue;
            };
            let key = normalize_header(&cell.get_value());
            if !key.is_empty() && !columns.contains_key(&key) {
                columns.insert(key, column);
            }
        }
        if columns.is_empty() {
            return Err(FillError::MissingHeaderRow);
        }
        Ok(Self { columns })
    }

    /// Looks up a header by any spelling variant of its text.
    pub fn get(&self, header: &str) -> Option<u32> {
        self.columns.get(&normalize_header(header)).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

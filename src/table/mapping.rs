//! Mapping-table resolution: turns a user-supplied two-column file into
//! validated (source column, target header) pairs. Role columns are found by
//! alias matching, so both column order and header spelling variants in the
//! file are irrelevant.

use crate::error::{MasterfileError, ResultMessage};
use crate::helpers::normalize::normalize_header;
use crate::table::raw::{RawTable, RawTableError};
use std::collections::HashSet;
use thiserror::Error;

/// Accepted header aliases for the SOURCE role (raw-data column names),
/// checked in priority order.
pub const SOURCE_ALIASES: [&str; 6] = [
    "header of row sheet",
    "header of raw sheet",
    "raw header",
    "raw",
    "source",
    "from",
];

/// Accepted header aliases for the TARGET role (template header names),
/// checked in priority order.
pub const TARGET_ALIASES: [&str; 6] = [
    "header of masterfile template",
    "masterfile header",
    "template header",
    "template",
    "target",
    "to",
];

/// Errors raised while resolving a mapping table.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Underlying file could not be read as a table
    #[error("{0}")]
    InputError(#[from] RawTableError),

    /// Neither role column could be matched against its alias set
    #[error(
        "mapping file must contain two columns: \
         'header of row sheet' (source) and 'header of masterfile template' (target)"
    )]
    MissingRoleColumns,
}

/// One resolved mapping pair: a raw-data column feeding a template header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    /// Raw-data column name, trimmed as supplied in the mapping file
    pub source: String,
    /// Template header name, trimmed as supplied in the mapping file
    pub target: String,
}

/// An ordered list of mapping entries with unique targets.
#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    /// Reads and resolves a mapping file (CSV/TXT or xlsx/xlsm).
    pub fn read(bytes: &[u8], file_name: &str) -> Result<Self, MasterfileError> {
        Self::read_inner(bytes, file_name)
            .map_err(MasterfileError::from)
            .with_prefix("failed to read mapping")
    }

    fn read_inner(bytes: &[u8], file_name: &str) -> Result<Self, MappingError> {
        let table = RawTable::read(bytes, file_name, None)?;
        Self::resolve(&table)
    }

    /// Resolves role columns by alias, then projects, trims, filters and
    /// deduplicates the pairs. Entry order is first-seen file order; later
    /// entries for an already-mapped target are dropped.
    pub fn resolve(table: &RawTable) -> Result<Self, MappingError> {
        let source_position = find_role_column(table, &SOURCE_ALIASES);
        let target_position = find_role_column(table, &TARGET_ALIASES);
        let (Some(source_position), Some(target_position)) = (source_position, target_position)
        else {
            return Err(MappingError::MissingRoleColumns);
        };

        let mut entries = Vec::new();
        let mut seen_targets = HashSet::new();
        for row in table.rows() {
            let source = row[source_position].to_string().trim().to_owned();
            let target = row[target_position].to_string().trim().to_owned();
            if source.is_empty() || target.is_empty() {
                continue;
            }
            // First mapping wins per target header; key on the normalized
            // text so header variants cannot smuggle in a second entry.
            if seen_targets.insert(normalize_header(&target)) {
                entries.push(MappingEntry { source, target });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finds the position of the first table column whose normalized name matches
/// one of the role aliases, scanning aliases in priority order.
fn find_role_column(table: &RawTable, aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        let key = normalize_header(alias);
        let position = table
            .columns()
            .iter()
            .position(|column| normalize_header(column) == key);
        if position.is_some() {
            return position;
        }
    }
    None
}

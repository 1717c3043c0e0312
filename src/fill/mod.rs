//! # Sheet Filling Module
//!
//! The write side of the pipeline: indexing the template's header row,
//! joining raw rows to mapped target columns, writing values into the first
//! sheet while round-tripping everything else in the workbook untouched, and
//! the post-write duplicate highlighting pass.
use thiserror::Error;

pub mod filler;
pub mod header_index;
pub mod highlight;

pub use filler::{fill_masterfile, FillOutcome, FillWarnings, DATA_START_ROW};
pub use header_index::{HeaderIndex, HEADER_ROW};
pub use highlight::{highlight_duplicates, HIGHLIGHT_COLOR, HIGHLIGHT_LABELS};

/// Errors that abort a fill operation. Missing mapping columns are not
/// errors; they degrade to [`FillWarnings`].
#[derive(Error, Debug)]
pub enum FillError {
    /// Row 1 of the first sheet holds no usable header text
    #[error("no headers found in row 1 of the first sheet; ensure row 1 contains headers")]
    MissingHeaderRow,

    /// Template file name carries an extension other than .xlsx/.xlsm
    #[error("unsupported template file '{name}' (expected .xlsx or .xlsm)")]
    UnsupportedTemplate { name: String },

    /// Template workbook contains no worksheets at all
    #[error("template workbook has no sheets")]
    NoSheets,

    /// Template bytes could not be deserialized as a workbook
    #[error("invalid template workbook: {0}")]
    InvalidTemplate(String),

    /// Filled workbook could not be serialized back to bytes
    #[error("failed to serialize filled workbook: {0}")]
    SerializeFailed(String),
}

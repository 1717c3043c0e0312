//! # Masterfile Filler
//!
//! Copies column-mapped values from a raw tabular dataset into the first
//! sheet of a spreadsheet "masterfile" template and flags duplicate values in
//! the identifier columns. The crate is a pure core with no UI: callers hand
//! in file bytes and get back file bytes plus warnings.
//!
//! ## Features
//!
//! - **Header-mapped filling**: a user-supplied two-column mapping joins raw
//!   columns to template headers; values are written starting at row 3, with
//!   rows 1–2 and every other sheet preserved byte-for-byte
//! - **Tolerant header matching**: headers are compared through a strict
//!   alphanumeric normalizer, so "Partner SKU", "partner_sku" and
//!   "Partner-SKU#" all name the same column
//! - **Flexible mapping files**: role columns are found by alias in any
//!   order; CSV/TXT and xlsx/xlsm containers are both accepted
//! - **Duplicate highlighting**: the "Partner SKU" and "Barcode" columns are
//!   scanned after the fill and duplicate values get a solid yellow fill
//! - **Best-effort semantics**: unresolvable mapping entries degrade to
//!   warnings and a partial fill; only a headerless template aborts
//!
//! ## Entry points
//!
//! [`RawTable::read`] and [`MappingTable::read`] parse the two inputs,
//! [`fill_masterfile`] runs the fill+highlight pipeline, and
//! [`artifact::mapping_template`] produces the sample mapping workbook.
pub mod artifact;
pub mod error;
pub mod fill;
pub mod helpers;
pub mod table;

pub use crate::error::MasterfileError;
pub use crate::fill::{
    fill_masterfile, FillError, FillOutcome, FillWarnings, HeaderIndex, DATA_START_ROW,
    HEADER_ROW, HIGHLIGHT_COLOR, HIGHLIGHT_LABELS,
};
pub use crate::helpers::normalize::normalize_header;
pub use crate::table::{sheet_names, MappingEntry, MappingTable, RawTable, Value};

//! Tabular input handling: raw-data tables, mapping tables, and the scalar
//! values they carry. Both readers share the same container dispatch
//! (CSV/TXT text or one worksheet of an xlsx/xlsm workbook).

pub mod mapping;
pub mod raw;
pub mod value;

pub use mapping::{MappingEntry, MappingTable};
pub use raw::{sheet_names, RawTable};
pub use value::Value;

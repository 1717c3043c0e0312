//! Downloadable artifacts the collaborator hands to the user: the default
//! names/MIME type for the filled workbook and the on-demand sample mapping
//! workbook. Nothing here depends on uploaded state.

use crate::error::MasterfileError;
use crate::fill::FillError;
use std::io::Cursor;

/// Default file name of the filled masterfile artifact.
pub const FILLED_FILE_NAME: &str = "filled_masterfile.xlsx";

/// Default file name of the sample mapping artifact.
pub const MAPPING_TEMPLATE_FILE_NAME: &str = "mapping_template.xlsx";

/// MIME type of xlsx artifacts.
pub const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Sample pairs shipped in the mapping template, one row each.
const SAMPLE_PAIRS: [(&str, &str); 6] = [
    ("sku", "SKU"),
    ("name", "Title"),
    ("description", "Description"),
    ("price", "Price"),
    ("qty", "Quantity"),
    ("category", "Category"),
];

/// Builds the two-column sample mapping workbook: a sheet named "mapping"
/// with the canonical role headers in row 1 and six example pairs below.
pub fn mapping_template() -> Result<Vec<u8>, MasterfileError> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_active_sheet_mut();
    sheet.set_name("mapping");
    sheet.get_cell_mut("A1").set_value("header of row sheet");
    sheet
        .get_cell_mut("B1")
        .set_value("header of masterfile template");
    for (offset, (source, target)) in SAMPLE_PAIRS.iter().enumerate() {
        let row = offset as u32 + 2;
        sheet.get_cell_mut((1, row)).set_value(*source);
        sheet.get_cell_mut((2, row)).set_value(*target);
    }

    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
        .map_err(|e| FillError::SerializeFailed(e.to_string()))?;
    Ok(cursor.into_inner())
}

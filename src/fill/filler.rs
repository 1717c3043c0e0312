//! The fill engine: resolves mapping entries against the raw table and the
//! template's header row, then writes one output row per raw row into the
//! first sheet, starting at [`DATA_START_ROW`]. The workbook is deserialized,
//! mutated in place and re-serialized, so sheets, styles, formulas and merges
//! outside the written cells survive unchanged.

use crate::error::MasterfileError;
use crate::fill::header_index::HeaderIndex;
use crate::fill::highlight::{highlight_duplicates, HIGHLIGHT_LABELS};
use crate::fill::FillError;
use crate::helpers::normalize::normalize_header;
use crate::table::value::Value;
use crate::table::{MappingTable, RawTable};
use std::io::Cursor;
use tracing::{debug, warn};
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet};

/// First data row of the first sheet. Row 1 carries the headers and row 2 is
/// reserved template content; both are never written.
pub const DATA_START_ROW: u32 = 3;

/// Mapping entries that could not be resolved. These degrade the fill to a
/// partial write instead of failing it; order is first-seen, deduplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FillWarnings {
    /// Mapping sources with no matching raw-data column
    pub missing_raw: Vec<String>,
    /// Mapping targets with no matching header in row 1
    pub missing_template: Vec<String>,
}

impl FillWarnings {
    pub fn is_empty(&self) -> bool {
        self.missing_raw.is_empty() && self.missing_template.is_empty()
    }
}

/// Result of a fill operation: the serialized workbook plus warnings.
#[derive(Clone, Debug)]
pub struct FillOutcome {
    pub bytes: Vec<u8>,
    pub warnings: FillWarnings,
}

/// Checks the template file name against the two supported container
/// variants: plain `.xlsx` and macro-enabled `.xlsm`. The whole document is
/// round-tripped, so an `.xlsm` template keeps its embedded macro project.
fn ensure_supported_template(name: &str) -> Result<(), FillError> {
    let lowered = name.to_ascii_lowercase();
    if lowered.ends_with(".xlsx") || lowered.ends_with(".xlsm") {
        Ok(())
    } else {
        Err(FillError::UnsupportedTemplate {
            name: name.to_owned(),
        })
    }
}

/// Fills the first sheet of the template with header-mapped raw values and
/// runs the duplicate highlighting pass over the written range.
///
/// The template bytes are never consumed; the same slice can be passed to any
/// number of fill calls. Output bytes are produced only after the entire
/// fill+highlight pipeline has succeeded.
pub fn fill_masterfile(
    template: &[u8],
    template_name: &str,
    mapping: &MappingTable,
    raw: &RawTable,
) -> Result<FillOutcome, MasterfileError> {
    ensure_supported_template(template_name)?;
    let mut book = load_template(template)?;
    let sheet = book
        .get_sheet_collection_mut()
        .get_mut(0)
        .ok_or(FillError::NoSheets)?;

    let header_index = HeaderIndex::scan(sheet)?;
    debug!(headers = header_index.len(), "indexed template header row");

    let (pairs, warnings) = active_pairs(mapping, raw, &header_index);
    debug!(
        pairs = pairs.len(),
        rows = raw.rows().len(),
        "writing raw rows from row {DATA_START_ROW}"
    );

    write_rows(sheet, &pairs, raw);
    highlight_duplicates(sheet, &header_index, &HIGHLIGHT_LABELS, DATA_START_ROW);

    let bytes = serialize(&book)?;
    Ok(FillOutcome { bytes, warnings })
}

fn load_template(bytes: &[u8]) -> Result<Spreadsheet, FillError> {
    let cursor = Cursor::new(bytes.to_vec());
    umya_spreadsheet::reader::xlsx::read_reader(cursor, true)
        .map_err(|e| FillError::InvalidTemplate(e.to_string()))
}

fn serialize(book: &Spreadsheet) -> Result<Vec<u8>, FillError> {
    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut cursor)
        .map_err(|e| FillError::SerializeFailed(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Resolves every mapping entry to an active (raw column, target column)
/// pair, collecting unresolvable entries as warnings. The raw side is checked
/// first, matching the order in which the warnings are reported.
fn active_pairs(
    mapping: &MappingTable,
    raw: &RawTable,
    header_index: &HeaderIndex,
) -> (Vec<(usize, u32)>, FillWarnings) {
    let raw_index = raw.column_index();
    let mut pairs = Vec::new();
    let mut warnings = FillWarnings::default();
    for entry in mapping.entries() {
        let Some(&raw_position) = raw_index.get(&normalize_header(&entry.source)) else {
            warn!(column = %entry.source, "raw column missing, mapping entry skipped");
            push_unique(&mut warnings.missing_raw, &entry.source);
            continue;
        };
        let Some(target_column) = header_index.get(&entry.target) else {
            warn!(header = %entry.target, "template header missing, mapping entry skipped");
            push_unique(&mut warnings.missing_template, &entry.target);
            continue;
        };
        pairs.push((raw_position, target_column));
    }
    (pairs, warnings)
}

fn push_unique(list: &mut Vec<String>, text: &str) {
    if !list.iter().any(|existing| existing == text) {
        list.push(text.to_owned());
    }
}

/// Writes one output row per raw row, in raw order, sequentially with no
/// gaps. Blank raw values overwrite the target cell with an explicit empty
/// string so stale template content cannot survive underneath a fill.
fn write_rows(sheet: &mut Worksheet, pairs: &[(usize, u32)], raw: &RawTable) {
    for (offset, row) in raw.rows().iter().enumerate() {
        let target_row = DATA_START_ROW + offset as u32;
        for &(raw_position, target_column) in pairs {
            write_value(
                sheet.get_cell_mut((target_column, target_row)),
                &row[raw_position],
            );
        }
    }
}

fn write_value(cell: &mut Cell, value: &Value) {
    match value {
        Value::Number(number) => {
            cell.set_value_number(*number);
        }
        Value::Bool(flag) => {
            cell.set_value_bool(*flag);
        }
        // Empty renders as "", text stays as-is, datetimes as ISO text
        _ => {
            cell.set_value_string(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_fixture() -> Vec<u8> {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_active_sheet_mut();
        sheet.set_name("Master");
        sheet.get_cell_mut("A1").set_value("SKU");
        sheet.get_cell_mut("B1").set_value("Title");
        sheet.get_cell_mut("C1").set_value("Barcode");
        sheet.get_cell_mut("A2").set_value("reserved");
        sheet.get_cell_mut("A3").set_value("STALE");

        let second = book.new_sheet("Notes").expect("unique sheet name");
        second.get_cell_mut("A1").set_value("untouched");
        second.get_cell_mut("B2").set_formula("=1+1");
        second
            .get_cell_mut("C1")
            .get_style_mut()
            .set_background_color("FF00B0F0");
        second.add_merge_cells("A5:B6");

        let mut cursor = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
            .expect("write template fixture");
        cursor.into_inner()
    }

    fn mapping_fixture(csv: &[u8]) -> MappingTable {
        let table = RawTable::from_csv(csv).expect("mapping csv");
        MappingTable::resolve(&table).expect("mapping fixture")
    }

    fn reload(bytes: &[u8]) -> Spreadsheet {
        umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes.to_vec()), true)
            .expect("reload output workbook")
    }

    fn cell_text(sheet: &Worksheet, coordinate: &str) -> String {
        sheet
            .get_cell(coordinate)
            .map(|cell| cell.get_value().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn fills_from_row_3_in_raw_order() {
        let raw = RawTable::from_csv(b"sku,name\nA1,Widget\nA1,Gadget\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\nname,Title\n");
        let outcome = fill_masterfile(&template_fixture(), "master.xlsx", &mapping, &raw).unwrap();
        assert!(outcome.warnings.is_empty());

        let book = reload(&outcome.bytes);
        let sheet = &book.get_sheet_collection_no_check()[0];
        assert_eq!(cell_text(sheet, "A3"), "A1");
        assert_eq!(cell_text(sheet, "B3"), "Widget");
        assert_eq!(cell_text(sheet, "A4"), "A1");
        assert_eq!(cell_text(sheet, "B4"), "Gadget");
        // Unmapped template column stays blank.
        assert_eq!(cell_text(sheet, "C3"), "");
    }

    #[test]
    fn preserves_header_reserved_row_and_other_sheets() {
        let raw = RawTable::from_csv(b"sku\nA1\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\n");
        let outcome = fill_masterfile(&template_fixture(), "master.xlsx", &mapping, &raw).unwrap();

        let book = reload(&outcome.bytes);
        let sheets = book.get_sheet_collection_no_check();
        assert_eq!(sheets.len(), 2);

        let first = &sheets[0];
        assert_eq!(first.get_name(), "Master");
        assert_eq!(cell_text(first, "A1"), "SKU");
        assert_eq!(cell_text(first, "B1"), "Title");
        assert_eq!(cell_text(first, "A2"), "reserved");

        let second = &sheets[1];
        assert_eq!(second.get_name(), "Notes");
        assert_eq!(cell_text(second, "A1"), "untouched");

        let formula_cell = second.get_cell("B2").expect("formula cell survives");
        assert!(formula_cell.is_formula());
        assert_eq!(formula_cell.get_formula().trim_start_matches('='), "1+1");

        let fill = second
            .get_cell("C1")
            .expect("styled cell survives")
            .get_style()
            .get_background_color()
            .map(|color| color.get_argb().to_owned());
        assert_eq!(fill.as_deref(), Some("FF00B0F0"));

        assert_eq!(second.get_merge_cells().len(), 1);
    }

    #[test]
    fn blank_raw_values_overwrite_stale_cells() {
        // The template fixture carries "STALE" at A3; a raw row with a blank
        // sku must replace it with an empty string, not leave it standing.
        let raw = RawTable::from_csv(b"sku,name\n,Widget\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\nname,Title\n");
        let outcome = fill_masterfile(&template_fixture(), "master.xlsx", &mapping, &raw).unwrap();

        let book = reload(&outcome.bytes);
        let sheet = &book.get_sheet_collection_no_check()[0];
        assert_eq!(cell_text(sheet, "A3"), "");
        assert_eq!(cell_text(sheet, "B3"), "Widget");
    }

    #[test]
    fn na_sentinel_fields_never_reach_the_sheet() {
        // "NaN"/"null" style fields count as missing data; the target cell
        // must end up empty, not hold the sentinel spelling as text.
        let raw = RawTable::from_csv(b"sku,name\nNaN,null\nA2,None\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\nname,Title\n");
        let outcome = fill_masterfile(&template_fixture(), "master.xlsx", &mapping, &raw).unwrap();

        let book = reload(&outcome.bytes);
        let sheet = &book.get_sheet_collection_no_check()[0];
        assert_eq!(cell_text(sheet, "A3"), "");
        assert_eq!(cell_text(sheet, "B3"), "");
        assert_eq!(cell_text(sheet, "A4"), "A2");
        assert_eq!(cell_text(sheet, "B4"), "");
    }

    #[test]
    fn unresolved_entries_become_warnings_and_partial_fill() {
        let raw = RawTable::from_csv(b"sku\nA1\n").unwrap();
        let mapping =
            mapping_fixture(b"source,target\nsku,SKU\nmissing_col,Title\nsku,Nowhere\n");
        let outcome = fill_masterfile(&template_fixture(), "master.xlsx", &mapping, &raw).unwrap();

        assert_eq!(outcome.warnings.missing_raw, ["missing_col"]);
        assert_eq!(outcome.warnings.missing_template, ["Nowhere"]);

        let book = reload(&outcome.bytes);
        let sheet = &book.get_sheet_collection_no_check()[0];
        assert_eq!(cell_text(sheet, "A3"), "A1");
        assert_eq!(cell_text(sheet, "B3"), "");
    }

    #[test]
    fn headerless_template_aborts() {
        let mut book = umya_spreadsheet::new_file();
        book.get_active_sheet_mut().get_cell_mut("A3").set_value("data, no headers");
        let mut cursor = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor).expect("fixture");

        let raw = RawTable::from_csv(b"sku\nA1\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\n");
        let error =
            fill_masterfile(&cursor.into_inner(), "master.xlsx", &mapping, &raw).unwrap_err();
        assert!(matches!(
            error,
            MasterfileError::FillError(FillError::MissingHeaderRow)
        ));
    }

    #[test]
    fn numbers_keep_their_type() {
        let raw = RawTable::from_csv(b"sku,qty\nA1,12\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nqty,Title\n");
        let outcome = fill_masterfile(&template_fixture(), "master.xlsx", &mapping, &raw).unwrap();

        let book = reload(&outcome.bytes);
        let sheet = &book.get_sheet_collection_no_check()[0];
        assert_eq!(cell_text(sheet, "B3"), "12");
    }

    #[test]
    fn datetimes_are_written_as_iso_text() {
        use chrono::NaiveDate;

        let mut book = umya_spreadsheet::new_file();
        let cell = book.get_active_sheet_mut().get_cell_mut("A1");
        let stamp = NaiveDate::from_ymd_opt(2024, 3, 1)
            .expect("NaiveDate literal")
            .and_hms_opt(0, 0, 0)
            .expect("midnight");
        write_value(cell, &Value::DateTime(stamp));
        assert_eq!(cell.get_value(), "2024-03-01");
    }

    #[test]
    fn template_bytes_are_reusable_across_calls() {
        let template = template_fixture();
        let raw = RawTable::from_csv(b"sku\nA1\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\n");
        let first = fill_masterfile(&template, "master.xlsx", &mapping, &raw).unwrap();
        let second = fill_masterfile(&template, "master.xlsx", &mapping, &raw).unwrap();
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn macro_enabled_extension_is_accepted() {
        let raw = RawTable::from_csv(b"sku\nA1\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\n");
        let outcome = fill_masterfile(&template_fixture(), "master.XLSM", &mapping, &raw).unwrap();

        let book = reload(&outcome.bytes);
        let sheet = &book.get_sheet_collection_no_check()[0];
        assert_eq!(cell_text(sheet, "A3"), "A1");
    }

    #[test]
    fn unknown_template_extension_is_rejected() {
        let raw = RawTable::from_csv(b"sku\nA1\n").unwrap();
        let mapping = mapping_fixture(b"source,target\nsku,SKU\n");
        let error =
            fill_masterfile(&template_fixture(), "master.ods", &mapping, &raw).unwrap_err();
        assert!(error.to_string().contains("master.ods"));
    }
}

//! Duplicate highlighting: a post-write pass that marks every cell taking
//! part in a duplicate value group within the identifier columns. Runs over
//! final written values, never over raw input.

use crate::fill::header_index::HeaderIndex;
use std::collections::HashMap;
use tracing::debug;
use umya_spreadsheet::Worksheet;

/// The identifier columns checked for duplicates. Labels resolve through the
/// normalized header index; labels absent from the template are skipped.
pub const HIGHLIGHT_LABELS: [&str; 2] = ["Partner SKU", "Barcode"];

/// Solid fill applied to every duplicate cell (ARGB yellow).
pub const HIGHLIGHT_COLOR: &str = "FFFFFF00";

/// Scans each labelled column from `start_row` to the sheet's last populated
/// row and marks every cell whose non-empty trimmed value occurs more than
/// once, comparing case-insensitively. Blank cells neither count nor get
/// marked. The pass is idempotent.
pub fn highlight_duplicates(
    sheet: &mut Worksheet,
    index: &HeaderIndex,
    labels: &[&str],
    start_row: u32,
) {
    for label in labels {
        let Some(column) = index.get(label) else {
            continue;
        };
        mark_duplicates_in_column(sheet, column, start_row);
    }
}

fn mark_duplicates_in_column(sheet: &mut Worksheet, column: u32, start_row: u32) {
    let last_row = sheet.get_highest_row();
    if last_row < start_row {
        return;
    }

    let mut counts: HashMap<String, u32> = HashMap::new();
    for row in start_row..=last_row {
        if let Some(key) = cell_key(sheet, column, row) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut marked = 0u32;
    for row in start_row..=last_row {
        let Some(key) = cell_key(sheet, column, row) else {
            continue;
        };
        if counts.get(&key).copied().unwrap_or(0) > 1 {
            sheet
                .get_cell_mut((column, row))
                .get_style_mut()
                .set_background_color(HIGHLIGHT_COLOR);
            marked += 1;
        }
    }
    debug!(column, marked, "duplicate scan finished");
}

/// Comparison key of a cell: trimmed, lowercased text. None for blank cells.
fn cell_key(sheet: &Worksheet, column: u32, row: u32) -> Option<String> {
    let value = sheet.get_cell((column, row))?.get_value();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

//! Bus roster workbook: one row per bus, serial columns left blank.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::document::style;
use crate::error::{DocumentError, Result};

const HEADERS: [&str; 7] = [
    "Fornitore",
    "Bolla Produzione",
    "Bolla Vendita",
    "Bus",
    "Descrizione",
    "Serial Number (SN)",
    "SN Fornitore",
];

const COLUMN_WIDTHS: [(u16, f64); 6] = [
    (0, 15.0),
    (1, 20.0),
    (2, 20.0),
    (3, 12.0),
    (4, 30.0),
    (5, 20.0),
];

/// Parameters of a bus roster document.
#[derive(Debug, Clone)]
pub struct BusRosterRequest {
    pub production_note: String,
    pub sales_note: String,
    pub bus_count: u32,
    pub bus_start: u32,
    pub supplier: String,
}

/// Write the roster workbook. Returns the number of bus rows.
pub fn write_bus_roster(request: &BusRosterRequest, path: &Path) -> Result<u32> {
    if request.production_note.is_empty() || request.sales_note.is_empty() {
        return Err(DocumentError::MissingNotes.into());
    }
    if request.bus_count == 0 {
        return Err(DocumentError::EmptyBusCount.into());
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Documento Bus")?;

    let header_format = style::header();
    let body_format = style::body();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (col, width) in COLUMN_WIDTHS {
        sheet.set_column_width(col, width)?;
    }

    for offset in 0..request.bus_count {
        let row = offset + 1;
        let bus = request.bus_start + offset;
        sheet.write_string_with_format(row, 0, &request.supplier, &body_format)?;
        sheet.write_string_with_format(row, 1, &request.production_note, &body_format)?;
        sheet.write_string_with_format(row, 2, &request.sales_note, &body_format)?;
        sheet.write_string_with_format(row, 3, format!("Bus {bus:02}"), &body_format)?;
        // Description and serial are filled in by hand on the floor.
        sheet.write_string_with_format(row, 4, "", &body_format)?;
        sheet.write_string_with_format(row, 5, "", &body_format)?;
    }

    workbook.save(path)?;
    Ok(request.bus_count)
}

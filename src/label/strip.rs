//! Strip sheet: one row of 8 strips per bus/board-type combination,
//! a white set followed by an inverted black set.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rect, Rgb};
use tracing::info;

use crate::document::reader::read_first_sheet;
use crate::error::{LabelError, Result};
use crate::label::{pt_to_mm, start_offset, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const COLUMNS_PER_ROW: u32 = 8;
const ROW_HEIGHT: f32 = 14.5;
const FONT_SIZE: f32 = 7.5;

const MARGIN_TOP: f32 = 2.5;
const MARGIN_BOTTOM: f32 = 0.0;
const MARGIN_LEFT: f32 = 1.0;
// Negative: strips are allowed to bleed past the right edge of the sheet.
const MARGIN_RIGHT: f32 = -1.0;

/// Options of the strip sheet.
#[derive(Debug, Clone)]
pub struct StripOptions {
    /// Keep only these board types.
    pub board_types: Option<Vec<String>>,
    pub repeat: u32,
    pub start_row: u32,
    pub start_col: u32,
    /// Prefix every strip with its bus number.
    pub with_counter: bool,
    /// Append the inverted (black background) set.
    pub with_black: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            board_types: None,
            repeat: 1,
            start_row: 1,
            start_col: 1,
            with_counter: true,
            with_black: true,
        }
    }
}

/// Generate the strip-sheet PDF. Returns the white-set slot count.
pub fn generate_strip_sheet(input: &Path, output: &Path, options: &StripOptions) -> Result<u32> {
    let data = read_first_sheet(input)?;
    data.require_columns(&["Bus", "Tipo Scheda"])?;

    let rows: Vec<&Vec<String>> = match &options.board_types {
        Some(types) => {
            if types.is_empty() {
                return Err(LabelError::EmptyTypeFilter.into());
            }
            let filtered: Vec<&Vec<String>> = data
                .rows
                .iter()
                .filter(|row| types.contains(&data.cell(row, "Tipo Scheda")))
                .collect();
            if filtered.is_empty() {
                return Err(LabelError::NoMatchingTypes.into());
            }
            filtered
        }
        None => data.rows.iter().collect(),
    };

    // Unique (bus, board type) combinations, sorted.
    let combinations: BTreeSet<(String, String)> = rows
        .iter()
        .map(|row| (data.cell(row, "Bus"), data.cell(row, "Tipo Scheda")))
        .filter(|(_, board)| !board.is_empty())
        .collect();

    let mut labels: Vec<String> = combinations
        .iter()
        .map(|(bus, board)| {
            if options.with_counter {
                let bus = bus.replace("BUS", "").trim().to_string();
                format!("BUS {bus} – {board}")
            } else {
                board.clone()
            }
        })
        .collect();

    if options.repeat > 1 {
        let base = labels.clone();
        for _ in 1..options.repeat {
            labels.extend(base.iter().cloned());
        }
    }

    // The black set repeats the labels without the leading padding.
    let black_labels = labels.clone();
    let padding = start_offset(options.start_row, options.start_col, COLUMNS_PER_ROW);
    let mut white_labels = vec![String::new(); padding];
    white_labels.append(&mut labels);

    let usable_width = PAGE_WIDTH_MM - MARGIN_LEFT - MARGIN_RIGHT;
    let label_width = usable_width / COLUMNS_PER_ROW as f32;
    let rows_per_page =
        ((PAGE_HEIGHT_MM - MARGIN_TOP - MARGIN_BOTTOM) / ROW_HEIGHT).floor() as u32;

    let (doc, first_page, first_layer) =
        PdfDocument::new("Strips", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "strips");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut page_row = 0u32;

    let draw_set = |set: &[String], black: bool, layer: &mut printpdf::PdfLayerReference, page_row: &mut u32| {
        for chunk in set.chunks(COLUMNS_PER_ROW as usize) {
            if *page_row >= rows_per_page {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "strips");
                *layer = doc.get_page(page).get_layer(new_layer);
                *page_row = 0;
            }

            let y = PAGE_HEIGHT_MM - MARGIN_TOP - (*page_row as f32 + 1.0) * ROW_HEIGHT;

            for col in 0..COLUMNS_PER_ROW as usize {
                let x = MARGIN_LEFT + col as f32 * label_width;
                let text = chunk.get(col).map(String::as_str).unwrap_or("");

                let background = if black {
                    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
                } else {
                    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
                };
                layer.set_fill_color(background);
                layer.add_rect(
                    Rect::new(Mm(x), Mm(y), Mm(x + label_width), Mm(y + ROW_HEIGHT))
                        .with_mode(PaintMode::Fill),
                );

                if !text.is_empty() {
                    let text_color = if black {
                        Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
                    } else {
                        Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
                    };
                    layer.set_fill_color(text_color);
                    layer.use_text(
                        text,
                        FONT_SIZE,
                        Mm(x + 2.0),
                        Mm(y + ROW_HEIGHT / 2.0 - pt_to_mm(5.0)),
                        &font,
                    );
                }
            }
            *page_row += 1;
        }
    };

    draw_set(&white_labels, false, &mut layer, &mut page_row);
    if options.with_black {
        draw_set(&black_labels, true, &mut layer, &mut page_row);
    }

    doc.save(&mut BufWriter::new(File::create(output)?))?;
    info!(strips = white_labels.len(), output = %output.display(), "strip sheet written");
    Ok(white_labels.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn write_input(dir: &Path) -> PathBuf {
        let path = dir.join("batch.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Bus").expect("header");
        sheet.write_string(0, 1, "Tipo Scheda").expect("header");
        let rows = [
            ["BUS 1", "SL1"],
            ["BUS 1", "SL1"],
            ["BUS 1", "SL2"],
            ["BUS 2", "SL1"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet
                    .write_string(r as u32 + 1, c as u16, *value)
                    .expect("cell");
            }
        }
        workbook.save(&path).expect("save");
        path
    }

    #[test]
    fn deduplicates_bus_board_combinations() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("strips.pdf");

        let count =
            generate_strip_sheet(&input, &output, &StripOptions::default()).expect("generate");
        // (BUS 1, SL1), (BUS 1, SL2), (BUS 2, SL1)
        assert_eq!(count, 3);
        assert!(std::fs::read(&output)
            .expect("read pdf")
            .starts_with(b"%PDF"));
    }

    #[test]
    fn padding_applies_to_the_white_set_only() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("strips.pdf");

        let options = StripOptions {
            start_col: 3,
            ..Default::default()
        };
        let count = generate_strip_sheet(&input, &output, &options).expect("generate");
        assert_eq!(count, 5);
    }

    #[test]
    fn board_type_filter_must_match() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("strips.pdf");

        let options = StripOptions {
            board_types: Some(vec!["XX".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            generate_strip_sheet(&input, &output, &options),
            Err(Error::Label(LabelError::NoMatchingTypes))
        ));
    }
}

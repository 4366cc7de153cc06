//! Sticker sheet: 4x21 grid of part-number labels with an optional logo.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::GenericImageView;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use tracing::{info, warn};

use crate::document::reader::read_first_sheet;
use crate::error::{LabelError, Result};
use crate::label::{pt_to_mm, start_offset, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const COLS: u32 = 4;
const ROWS: u32 = 21;

const MARGIN_LEFT: f32 = 5.0;
const MARGIN_RIGHT: f32 = 5.0;
const MARGIN_TOP: f32 = 10.0;
const MARGIN_BOTTOM: f32 = 10.0;

const SPACING_X: f32 = 3.0;
const SPACING_Y: f32 = 0.0;

/// Gap between the logo and the text block.
const IMAGE_MARGIN: f32 = 2.0;
const LINE_SPACING: f32 = 2.0;

/// Options of the sticker sheet.
#[derive(Debug, Clone)]
pub struct SheetOptions {
    pub logo: Option<PathBuf>,
    /// Keep only rows whose 12NC code is in this list.
    pub codes: Option<Vec<String>>,
    pub repeat: u32,
    pub start_row: u32,
    pub start_col: u32,
    pub font_size: f32,
    pub logo_width_mm: f32,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            logo: None,
            codes: None,
            repeat: 1,
            start_row: 1,
            start_col: 1,
            font_size: 5.0,
            logo_width_mm: 10.0,
        }
    }
}

struct Logo {
    image: printpdf::image_crate::DynamicImage,
    /// DPI that renders the bitmap at the requested width.
    dpi: f32,
    height_mm: f32,
}

/// Generate the sticker-sheet PDF. Returns the slot count including padding.
pub fn generate_sticker_sheet(
    input: &Path,
    output: &Path,
    options: &SheetOptions,
) -> Result<u32> {
    let data = read_first_sheet(input)?;
    data.require_columns(&["CODE 12NC", "SN", "Bus", "Tipo Scheda"])?;

    let rows: Vec<&Vec<String>> = data
        .rows
        .iter()
        .filter(|row| !data.cell(row, "Tipo Scheda").is_empty())
        .collect();

    let rows = match &options.codes {
        Some(codes) => {
            let selected: Vec<String> = codes.iter().map(|c| c.trim().to_string()).collect();
            if selected.is_empty() {
                return Err(LabelError::EmptyCodeFilter.into());
            }
            let filtered: Vec<&Vec<String>> = rows
                .iter()
                .filter(|row| selected.contains(&data.cell(row, "CODE 12NC").trim().to_string()))
                .copied()
                .collect();
            if filtered.is_empty() {
                let mut available: Vec<String> = rows
                    .iter()
                    .map(|row| data.cell(row, "CODE 12NC").trim().to_string())
                    .collect();
                available.sort();
                available.dedup();
                return Err(LabelError::NoMatchingCodes { available }.into());
            }
            filtered
        }
        None => rows,
    };

    let mut labels: Vec<(String, String)> = rows
        .iter()
        .map(|row| {
            let line1 = format!(
                "PN. {}  S.N. {}",
                data.cell(row, "CODE 12NC"),
                data.cell(row, "SN")
            );
            let bus = data.cell(row, "Bus").trim().to_string();
            let board = data.cell(row, "Tipo Scheda");
            let line2 = if bus.to_uppercase().starts_with("BUS") {
                format!("{bus} – {board}")
            } else {
                format!("BUS {bus} – {board}")
            };
            (line1, line2)
        })
        .collect();

    if options.repeat > 1 {
        let base = labels.clone();
        for _ in 1..options.repeat {
            labels.extend(base.iter().cloned());
        }
    }

    let padding = start_offset(options.start_row, options.start_col, COLS);
    let mut slots = vec![(String::new(), String::new()); padding];
    slots.append(&mut labels);

    let usable_width = PAGE_WIDTH_MM - MARGIN_LEFT - MARGIN_RIGHT - (COLS - 1) as f32 * SPACING_X;
    let usable_height =
        PAGE_HEIGHT_MM - MARGIN_TOP - MARGIN_BOTTOM - (ROWS - 1) as f32 * SPACING_Y;
    let label_width = usable_width / COLS as f32;
    let label_height = usable_height / ROWS as f32;

    let logo = options.logo.as_deref().and_then(|path| {
        load_logo(path, options.logo_width_mm).map_or_else(
            |reason| {
                warn!(path = %path.display(), %reason, "failed to load logo, labels are text-only");
                None
            },
            Some,
        )
    });

    let (doc, first_page, first_layer) =
        PdfDocument::new("Labels", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "labels");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let per_page = (COLS * ROWS) as usize;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    let font_size_mm = pt_to_mm(options.font_size);

    for (i, (line1, line2)) in slots.iter().enumerate() {
        if i > 0 && i % per_page == 0 {
            let (page, new_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "labels");
            layer = doc.get_page(page).get_layer(new_layer);
        }
        if line1.is_empty() && line2.is_empty() {
            continue;
        }

        let slot = i % per_page;
        let col = (slot % COLS as usize) as f32;
        let row = (slot / COLS as usize) as f32;

        let x = MARGIN_LEFT + col * (label_width + SPACING_X);
        let y = PAGE_HEIGHT_MM - MARGIN_TOP - (row + 1.0) * label_height - row * SPACING_Y;

        if let Some(logo) = &logo {
            let image = Image::from_dynamic_image(&logo.image);
            image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(x + 2.0)),
                    translate_y: Some(Mm(y + (label_height - logo.height_mm) / 2.0)),
                    dpi: Some(logo.dpi),
                    ..Default::default()
                },
            );
        }

        // Text sits to the right of the logo slot whether or not it loaded.
        let text_x = x + options.logo_width_mm + IMAGE_MARGIN + 2.0;
        let text_height = font_size_mm * 2.0 + LINE_SPACING;
        let text_start_y = y + (label_height + text_height) / 2.0 - font_size_mm;

        layer.use_text(line1, options.font_size, Mm(text_x), Mm(text_start_y), &font);
        layer.use_text(
            line2,
            options.font_size,
            Mm(text_x),
            Mm(text_start_y - font_size_mm - LINE_SPACING),
            &bold,
        );
    }

    doc.save(&mut BufWriter::new(File::create(output)?))?;
    info!(labels = slots.len(), output = %output.display(), "sticker sheet written");
    Ok(slots.len() as u32)
}

fn load_logo(path: &Path, width_mm: f32) -> std::result::Result<Logo, String> {
    let image = printpdf::image_crate::open(path).map_err(|e| e.to_string())?;
    let (width_px, height_px) = image.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err("image has zero size".to_string());
    }
    // Choose the DPI that maps the pixel width onto the requested width.
    let dpi = width_px as f32 * 25.4 / width_mm;
    let height_mm = height_px as f32 * width_mm / width_px as f32;
    Ok(Logo {
        image,
        dpi,
        height_mm,
    })
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
        for (col, header) in ["CODE 12NC", "SN", "Bus", "Tipo Scheda"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).expect("header");
        }
        let rows = [
            ["3104", "J25 00000", "BUS 1", "SL1"],
            ["3105", "J25 00001", "2", "SL2"],
            ["3106", "J25 00002", "BUS 2", ""],
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
    fn writes_a_pdf_and_skips_rows_without_board_type() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("labels.pdf");

        let count =
            generate_sticker_sheet(&input, &output, &SheetOptions::default()).expect("generate");
        // Third row has no board type.
        assert_eq!(count, 2);

        let bytes = std::fs::read(&output).expect("read pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn repeat_and_start_offset_extend_the_slot_count() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("labels.pdf");

        let options = SheetOptions {
            repeat: 3,
            start_row: 2,
            start_col: 2,
            ..Default::default()
        };
        let count = generate_sticker_sheet(&input, &output, &options).expect("generate");
        // 2 labels x 3 repetitions + 5 padding slots.
        assert_eq!(count, 11);
    }

    #[test]
    fn code_filter_rejects_unknown_codes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("labels.pdf");

        let options = SheetOptions {
            codes: Some(vec!["9999".to_string()]),
            ..Default::default()
        };
        let err = generate_sticker_sheet(&input, &output, &options).expect_err("no match");
        match err {
            Error::Label(LabelError::NoMatchingCodes { available }) => {
                assert_eq!(available, vec!["3104", "3105"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_logo_degrades_to_text_only() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("labels.pdf");

        let options = SheetOptions {
            logo: Some(dir.path().join("missing.png")),
            ..Default::default()
        };
        let count = generate_sticker_sheet(&input, &output, &options).expect("generate");
        assert_eq!(count, 2);
    }
}

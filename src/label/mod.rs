//! PDF label generation on A4: sticker grids and strip sheets.

pub mod sheet;
pub mod strip;

pub use sheet::{generate_sticker_sheet, SheetOptions};
pub use strip::{generate_strip_sheet, StripOptions};

/// A4 in millimeters. `f32` to match printpdf's `Mm`.
pub(crate) const PAGE_WIDTH_MM: f32 = 210.0;
pub(crate) const PAGE_HEIGHT_MM: f32 = 297.0;

/// Points to millimeters (printpdf positions are metric, font sizes are pt).
pub(crate) fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// Blank slots to skip for a 1-based start row/column.
pub(crate) fn start_offset(start_row: u32, start_col: u32, columns: u32) -> usize {
    ((start_row.saturating_sub(1)) * columns + start_col.saturating_sub(1)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_offset_is_row_major() {
        assert_eq!(start_offset(1, 1, 4), 0);
        assert_eq!(start_offset(1, 3, 4), 2);
        assert_eq!(start_offset(3, 2, 4), 9);
    }

    #[test]
    fn points_convert_to_millimeters() {
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-5);
    }
}

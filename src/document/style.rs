//! Shared cell formats for generated workbooks.

use rust_xlsxwriter::{Color, Format, FormatAlign};

/// Fill color of header rows.
const HEADER_FILL: Color = Color::RGB(0x1F4E79);

/// Bold white 12pt on dark blue, centered and wrapped.
pub fn header() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::White)
        .set_background_color(HEADER_FILL)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// 11pt, centered and wrapped.
pub fn body() -> Format {
    Format::new()
        .set_font_size(11)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

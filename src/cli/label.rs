//! Handlers for `labelsmith label`.

use crate::cli::{output, LabelCommand, LabelSheetArgs, LabelStripArgs};
use crate::error::Result;
use crate::label::sheet::{generate_sticker_sheet, SheetOptions};
use crate::label::strip::{generate_strip_sheet, StripOptions};

pub fn execute(command: &LabelCommand) -> Result<()> {
    match command {
        LabelCommand::Sheet(args) => sheet(args),
        LabelCommand::Strip(args) => strip(args),
    }
}

fn sheet(args: &LabelSheetArgs) -> Result<()> {
    let options = SheetOptions {
        logo: args.logo.clone(),
        codes: if args.codes.is_empty() {
            None
        } else {
            Some(args.codes.clone())
        },
        repeat: args.repeat,
        start_row: args.start_row,
        start_col: args.start_col,
        font_size: args.font_size,
        logo_width_mm: args.logo_width,
    };

    let slots = generate_sticker_sheet(&args.input, &args.output, &options)?;
    output::ok(&format!(
        "Sticker sheet written to {} ({slots} labels)",
        args.output.display()
    ));
    Ok(())
}

fn strip(args: &LabelStripArgs) -> Result<()> {
    let options = StripOptions {
        board_types: if args.board_types.is_empty() {
            None
        } else {
            Some(args.board_types.clone())
        },
        repeat: args.repeat,
        start_row: args.start_row,
        start_col: args.start_col,
        with_counter: !args.no_counter,
        with_black: !args.no_black,
    };

    let slots = generate_strip_sheet(&args.input, &args.output, &options)?;
    output::ok(&format!(
        "Strip sheet written to {} ({slots} strips)",
        args.output.display()
    ));
    Ok(())
}

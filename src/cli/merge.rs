//! Handler for `labelsmith merge`.

use crate::cli::{output, MergeArgs};
use crate::document::merge::merge_workbooks;
use crate::error::Result;

pub fn execute(args: &MergeArgs) -> Result<()> {
    let rows = merge_workbooks(&args.files, &args.sort_by, !args.descending, &args.output)?;
    output::ok(&format!(
        "Merged {} workbooks into {} ({rows} rows)",
        args.files.len(),
        args.output.display()
    ));
    Ok(())
}

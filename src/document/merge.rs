//! Merge same-shaped workbooks and stable-sort by a column.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::document::reader::read_first_sheet;
use crate::error::{DocumentError, Result};

/// Concatenate the input workbooks in argument order, sort by `sort_by` and
/// write an unstyled result. All cells are treated as text. Returns the row
/// count.
///
/// Every workbook must expose the same header row; the sort is stable, so
/// rows with equal keys keep their concatenation order.
pub fn merge_workbooks(
    files: &[PathBuf],
    sort_by: &str,
    ascending: bool,
    output: &Path,
) -> Result<u32> {
    if files.is_empty() {
        return Err(DocumentError::NoInputFiles.into());
    }

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for file in files {
        let data = read_first_sheet(file)?;
        match &headers {
            None => headers = Some(data.headers),
            Some(expected) => {
                if *expected != data.headers {
                    return Err(DocumentError::ColumnMismatch {
                        file: file.clone(),
                        expected: expected.clone(),
                        found: data.headers,
                    }
                    .into());
                }
            }
        }
        rows.extend(data.rows);
    }

    let headers = headers.unwrap_or_default();
    let key = headers
        .iter()
        .position(|h| h == sort_by)
        .ok_or_else(|| DocumentError::UnknownSortColumn(sort_by.to_string()))?;

    if ascending {
        rows.sort_by(|a, b| a[key].cmp(&b[key]));
    } else {
        rows.sort_by(|a, b| b[key].cmp(&a[key]));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32 + 1, c as u16, value)?;
        }
    }
    workbook.save(output)?;

    info!(files = files.len(), rows = rows.len(), "merge written");
    Ok(rows.len() as u32)
}

//! Reading the first worksheet of an input workbook as text.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::error::{DocumentError, Result};

/// First worksheet of a workbook: header row plus data rows, all as text.
#[derive(Debug)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Index of a named column.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DocumentError::MissingColumn(name.to_string()).into())
    }

    /// Ensure every listed column is present.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }

    /// Cell by row index and column name; empty when the row is short.
    pub fn cell(&self, row: &[String], name: &str) -> String {
        self.column(name)
            .ok()
            .and_then(|idx| row.get(idx).cloned())
            .unwrap_or_default()
    }
}

/// Load the first worksheet, converting every cell to its text form.
pub fn read_first_sheet(path: &Path) -> Result<SheetData> {
    if !path.exists() {
        return Err(DocumentError::InputNotFound(path.to_path_buf()).into());
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DocumentError::EmptyWorkbook)??;

    let mut rows = range.rows().map(|row| {
        row.iter().map(cell_text).collect::<Vec<String>>()
    });
    let headers = rows.next().unwrap_or_default();
    let width = headers.len();
    let rows = rows
        .map(|mut row| {
            row.resize(width.max(row.len()), String::new());
            row
        })
        .collect();

    Ok(SheetData { headers, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Whole floats print without the trailing `.0` so 12NC codes survive.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn reads_text_and_numeric_cells() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("input.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Descrizione").expect("header");
        sheet.write_string(0, 1, "CODE 12NC").expect("header");
        sheet.write_string(1, 0, "CPU").expect("cell");
        sheet.write_number(1, 1, 310412345678.0).expect("cell");
        workbook.save(&path).expect("save");

        let data = read_first_sheet(&path).expect("read");
        assert_eq!(data.headers, vec!["Descrizione", "CODE 12NC"]);
        assert_eq!(data.rows[0][1], "310412345678");
        assert_eq!(data.cell(&data.rows[0], "Descrizione"), "CPU");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_first_sheet(Path::new("missing.xlsx")).expect_err("missing");
        assert!(matches!(
            err,
            Error::Document(DocumentError::InputNotFound(_))
        ));
    }

    #[test]
    fn missing_column_names_the_column() {
        let data = SheetData {
            headers: vec!["A".into()],
            rows: vec![],
        };
        let err = data.column("SN").expect_err("missing column");
        assert!(err.to_string().contains("'SN'"));
    }
}

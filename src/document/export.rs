//! Filtered exports derived from a batch sheet: box labels and ERP import.
//!
//! Both exports share the same contract: the input workbook must carry the
//! batch-sheet columns, rows are filtered by the selected descriptions, and
//! operator-supplied extra fields fill the columns the input does not have.
//! Every output value is uppercased.

use std::collections::HashMap;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::document::reader::read_first_sheet;
use crate::document::style;
use crate::error::{DocumentError, Result};

const REQUIRED_COLUMNS: [&str; 6] = [
    "Fornitore",
    "Descrizione",
    "CODE 12NC",
    "SN",
    "Bus",
    "Tipo Scheda",
];

const BOX_HEADERS: [&str; 19] = [
    "CODE 12NC",
    "DESCRIZIONE",
    "SN",
    "SN Fornitore",
    "Codice MAC",
    "CLIENTE",
    "Bolla Vendita Techrail",
    "Bolla Produzione",
    "Bus",
    "Modello Pullman",
    "Tipo Scheda",
    "PW Schede",
    "PATH Certificato SSH",
    "PATH Certificato OVPN",
    "IP_VPN",
    "Ordine Acquisto",
    "SN1",
    "SN3",
    "Ente_Trasporto",
];

const BOX_WIDTHS: [f64; 19] = [
    18.0, 40.0, 15.0, 15.0, 15.0, 15.0, 20.0, 20.0, 12.0, 20.0, 15.0, 15.0, 25.0, 25.0, 15.0,
    20.0, 15.0, 15.0, 20.0,
];

const ERP_HEADERS: [&str; 36] = [
    "Fornitore",
    "CODE 12NC",
    "Sigla",
    "SN",
    "SN1",
    "SN2",
    "SN3",
    "quantità",
    "CLIENTE",
    "Ente_Trasporto",
    "PW Schede",
    "Unità techrail 3::Sigla",
    "Data ordine",
    "DESCRIZIONE",
    "Modello Pullman",
    "PATH Certificato SSH",
    "Codice MAC",
    "Codice fornitore",
    "Bolla Vendita Techrail",
    "Ordine",
    "Bus",
    "PATH Certificato OVPN",
    "SN Fornitore",
    "Bolla Produzione",
    "Unità techrail 3::Tipo etichetta",
    "Sito",
    "Tipo Scheda",
    "IP_VPN",
    "Unità techrail 3::CB Codice 12NC",
    "CB matricola",
    "Data Ricezione",
    "Ordine Acquisto",
    "NUC CB",
    "Nota",
    "SISTEMA",
    "flag",
];

/// Input column -> output column for the box-labels export.
const BOX_INPUT_MAP: [(&str, &str); 9] = [
    ("CODE 12NC", "CODE 12NC"),
    ("Descrizione", "DESCRIZIONE"),
    ("SN", "SN"),
    ("SN Fornitore", "SN Fornitore"),
    ("Codice MAC", "Codice MAC"),
    ("Bus", "Bus"),
    ("Tipo Scheda", "Tipo Scheda"),
    ("SN1", "SN1"),
    ("SN3", "SN3"),
];

/// Input column -> output column for the ERP export.
const ERP_INPUT_MAP: [(&str, &str); 24] = [
    ("Fornitore", "Fornitore"),
    ("CODE 12NC", "CODE 12NC"),
    ("Descrizione", "DESCRIZIONE"),
    ("SN", "SN"),
    ("SN Fornitore", "SN Fornitore"),
    ("Codice MAC", "Codice MAC"),
    ("Bus", "Bus"),
    ("Tipo Scheda", "Tipo Scheda"),
    ("Sigla", "Sigla"),
    ("quantità", "quantità"),
    ("Codice fornitore", "Codice fornitore"),
    ("Ordine", "Ordine"),
    (
        "Unità techrail 3::Tipo etichetta",
        "Unità techrail 3::Tipo etichetta",
    ),
    ("Sito", "Sito"),
    (
        "Unità techrail 3::CB Codice 12NC",
        "Unità techrail 3::CB Codice 12NC",
    ),
    ("CB matricola", "CB matricola"),
    ("Data Ricezione", "Data Ricezione"),
    ("NUC CB", "NUC CB"),
    ("Nota", "Nota"),
    ("SISTEMA", "SISTEMA"),
    ("flag", "flag"),
    ("SN1", "SN1"),
    ("SN2", "SN2"),
    ("SN3", "SN3"),
];

/// Operator-supplied fields for columns the batch sheet does not carry.
#[derive(Debug, Clone, Default)]
pub struct ExtraFields {
    pub customer: Option<String>,
    pub sales_note: Option<String>,
    pub production_note: Option<String>,
    pub bus_model: Option<String>,
    pub board_password: Option<String>,
    pub ssh_cert_path: Option<String>,
    pub ovpn_cert_path: Option<String>,
    pub vpn_ip: Option<String>,
    pub purchase_order: Option<String>,
    pub transport_authority: Option<String>,
    /// ERP export only.
    pub unit_code: Option<String>,
    /// ERP export only.
    pub order_date: Option<String>,
}

impl ExtraFields {
    fn as_columns(&self) -> Vec<(&'static str, &str)> {
        [
            ("CLIENTE", &self.customer),
            ("Bolla Vendita Techrail", &self.sales_note),
            ("Bolla Produzione", &self.production_note),
            ("Modello Pullman", &self.bus_model),
            ("PW Schede", &self.board_password),
            ("PATH Certificato SSH", &self.ssh_cert_path),
            ("PATH Certificato OVPN", &self.ovpn_cert_path),
            ("IP_VPN", &self.vpn_ip),
            ("Ordine Acquisto", &self.purchase_order),
            ("Ente_Trasporto", &self.transport_authority),
            ("Unità techrail 3::Sigla", &self.unit_code),
            ("Data ordine", &self.order_date),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
        .collect()
    }
}

/// Generate the box-labels workbook (`EtichetteBOX` sheet).
pub fn generate_box_labels(
    input: &Path,
    output: &Path,
    selected_descriptions: &[String],
    extra: &ExtraFields,
) -> Result<u32> {
    generate_filtered(
        input,
        output,
        selected_descriptions,
        extra,
        "EtichetteBOX",
        &BOX_HEADERS,
        &BOX_INPUT_MAP,
        |sheet| {
            for (col, width) in BOX_WIDTHS.iter().enumerate() {
                sheet.set_column_width(col as u16, *width)?;
            }
            Ok(())
        },
        false,
    )
}

/// Generate the ERP-import workbook (`ImportGestionale` sheet).
pub fn generate_erp_import(
    input: &Path,
    output: &Path,
    selected_descriptions: &[String],
    extra: &ExtraFields,
) -> Result<u32> {
    generate_filtered(
        input,
        output,
        selected_descriptions,
        extra,
        "ImportGestionale",
        &ERP_HEADERS,
        &ERP_INPUT_MAP,
        |sheet| {
            for col in 0..ERP_HEADERS.len() {
                sheet.set_column_width(col as u16, 15.0)?;
            }
            Ok(())
        },
        true,
    )
}

#[allow(clippy::too_many_arguments)]
fn generate_filtered(
    input: &Path,
    output: &Path,
    selected_descriptions: &[String],
    extra: &ExtraFields,
    sheet_name: &str,
    output_headers: &[&str],
    input_map: &[(&str, &str)],
    set_widths: impl Fn(&mut rust_xlsxwriter::Worksheet) -> Result<()>,
    with_sn2: bool,
) -> Result<u32> {
    let data = read_first_sheet(input)?;
    data.require_columns(&REQUIRED_COLUMNS)?;
    let desc_col = data.column("Descrizione")?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    let header_format = style::header();
    let body_format = style::body();
    for (col, header) in output_headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    set_widths(sheet)?;

    let mut out_row = 1u32;
    for row in &data.rows {
        let description = &row[desc_col];
        if description.is_empty() || !selected_descriptions.contains(description) {
            continue;
        }

        let mut values: HashMap<&str, String> = HashMap::new();
        for (input_col, output_col) in input_map {
            values.insert(output_col, data.cell(row, input_col).to_uppercase());
        }
        for (output_col, value) in extra.as_columns() {
            values.insert(output_col, value.to_uppercase());
        }
        split_serial(&mut values, with_sn2);

        for (col, header) in output_headers.iter().enumerate() {
            let value = values.get(header).map(String::as_str).unwrap_or("");
            sheet.write_string_with_format(out_row, col as u16, value, &body_format)?;
        }
        out_row += 1;
    }

    let rows = out_row - 1;
    if rows == 0 {
        return Err(DocumentError::NoMatchingRows.into());
    }

    workbook.save(output)?;
    info!(rows, output = %output.display(), "export written");
    Ok(rows)
}

/// Derive `SN1`/`SN3` (and optionally an always-empty `SN2`) from `SN`,
/// splitting at the first space.
fn split_serial(values: &mut HashMap<&str, String>, with_sn2: bool) {
    let serial = values.get("SN").cloned().unwrap_or_default();
    let (sn1, sn3) = match serial.split_once(' ') {
        Some((first, rest)) if !rest.trim().is_empty() => {
            (first.to_string(), rest.to_uppercase())
        }
        Some((first, _)) => (first.to_string(), String::new()),
        None => (serial.clone(), String::new()),
    };
    values.insert("SN1", sn1.to_uppercase());
    values.insert("SN3", sn3);
    if with_sn2 {
        values.insert("SN2", String::new());
    }
}

/// Sorted distinct non-blank values of the `Descrizione` column.
pub fn unique_descriptions(input: &Path) -> Result<Vec<String>> {
    let data = read_first_sheet(input)?;
    let desc_col = data.column("Descrizione")?;
    let mut descriptions: Vec<String> = data
        .rows
        .iter()
        .map(|row| row[desc_col].trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    descriptions.sort();
    descriptions.dedup();
    Ok(descriptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::PathBuf;

    /// Minimal batch sheet with two descriptions.
    fn write_input(dir: &Path) -> PathBuf {
        let path = dir.join("batch.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = [
            "Fornitore",
            "Bolla Produzione",
            "Bolla Vendita",
            "Descrizione",
            "CODE 12NC",
            "SN",
            "Bus",
            "Tipo Scheda",
            "SN Fornitore",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).expect("header");
        }
        let rows = [
            ["techrail", "bp-1", "bv-1", "cpu board", "3104", "J25 00138", "BUS 1", "SL1", ""],
            ["techrail", "bp-1", "bv-1", "psu", "3105", "J25 00000", "BUS 1", "", ""],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet
                    .write_string(r as u32 + 1, c as u16, *value)
                    .expect("cell");
            }
        }
        workbook.save(&path).expect("save input");
        path
    }

    #[test]
    fn box_export_filters_uppercases_and_splits_serials() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("box.xlsx");

        let extra = ExtraFields {
            customer: Some("acme".to_string()),
            ..Default::default()
        };
        let rows = generate_box_labels(
            &input,
            &output,
            &["cpu board".to_string()],
            &extra,
        )
        .expect("export");
        assert_eq!(rows, 1);

        let data = read_first_sheet(&output).expect("read back");
        assert_eq!(data.headers.len(), 19);
        let row = &data.rows[0];
        assert_eq!(data.cell(row, "DESCRIZIONE"), "CPU BOARD");
        assert_eq!(data.cell(row, "CLIENTE"), "ACME");
        assert_eq!(data.cell(row, "SN"), "J25 00138");
        assert_eq!(data.cell(row, "SN1"), "J25");
        assert_eq!(data.cell(row, "SN3"), "00138");
    }

    #[test]
    fn erp_export_has_empty_sn2() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("erp.xlsx");

        let rows = generate_erp_import(
            &input,
            &output,
            &["cpu board".to_string(), "psu".to_string()],
            &ExtraFields::default(),
        )
        .expect("export");
        assert_eq!(rows, 2);

        let data = read_first_sheet(&output).expect("read back");
        assert_eq!(data.headers.len(), 36);
        let row = &data.rows[0];
        assert_eq!(data.cell(row, "SN2"), "");
        assert_eq!(data.cell(row, "Fornitore"), "TECHRAIL");
    }

    #[test]
    fn no_matching_descriptions_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let output = dir.path().join("box.xlsx");

        let err = generate_box_labels(
            &input,
            &output,
            &["unknown".to_string()],
            &ExtraFields::default(),
        )
        .expect_err("no rows");
        assert!(matches!(
            err,
            Error::Document(DocumentError::NoMatchingRows)
        ));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bad.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Descrizione").expect("header");
        workbook.save(&path).expect("save");

        let err = generate_box_labels(
            &path,
            &dir.path().join("out.xlsx"),
            &["x".to_string()],
            &ExtraFields::default(),
        )
        .expect_err("missing column");
        assert!(err.to_string().contains("Fornitore"));
    }

    #[test]
    fn unique_descriptions_are_sorted_and_deduplicated() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = write_input(dir.path());
        let descriptions = unique_descriptions(&input).expect("descriptions");
        assert_eq!(descriptions, vec!["cpu board", "psu"]);
    }
}

//! Batch sheet: per-bus component rows with freshly issued serials.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::{info, warn};

use crate::document::style;
use crate::domain::component::board_type;
use crate::domain::{Component, PrefixStart};
use crate::error::{DocumentError, Result};
use crate::store::{ComponentStore, SerialRegistry};

const HEADERS: [&str; 9] = [
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

const COLUMN_WIDTHS: [(u16, f64); 9] = [
    (0, 15.0),
    (1, 20.0),
    (2, 20.0),
    (3, 40.0),
    (4, 18.0),
    (5, 15.0),
    (6, 12.0),
    (7, 15.0),
    (8, 15.0),
];

/// One component of a batch, with per-run overrides applied.
#[derive(Debug, Clone)]
pub struct BatchComponent {
    pub name: String,
    pub quantity: u32,
    pub serial_start: Option<u32>,
    pub board_prefix: Option<String>,
    pub indexed: bool,
    pub prefix_start: Option<PrefixStart>,
    pub code_12nc: Option<String>,
}

impl BatchComponent {
    pub fn from_component(component: &Component, quantity: u32) -> Self {
        Self {
            name: component.name.clone(),
            quantity,
            serial_start: component.serial_start,
            board_prefix: component.board_prefix.clone(),
            indexed: component.indexed,
            prefix_start: component.prefix_start.clone(),
            code_12nc: Some(component.code_12nc.clone()),
        }
    }
}

/// Parameters of a batch document.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub production_note: String,
    pub sales_note: String,
    pub bus_count: u32,
    pub bus_start: u32,
    pub supplier: String,
    pub components: Vec<BatchComponent>,
}

/// What a batch run produced.
#[derive(Debug)]
pub struct BatchOutcome {
    pub rows: u32,
    /// Last counter issued per component name.
    pub last_serials: Vec<(String, u32)>,
}

/// Write the batch workbook, issuing serials and synchronizing the stores.
pub fn write_batch_sheet(
    request: &BatchRequest,
    registry: &mut SerialRegistry,
    store: &mut ComponentStore,
    path: &Path,
) -> Result<BatchOutcome> {
    if request.production_note.is_empty() || request.sales_note.is_empty() {
        return Err(DocumentError::MissingNotes.into());
    }
    if request.bus_count == 0 {
        return Err(DocumentError::EmptyBusCount.into());
    }
    if request.components.is_empty() {
        return Err(DocumentError::NoComponents.into());
    }

    // Resolve the 12NC of every component up front so nothing is issued when
    // one of them is missing a mandatory code.
    let mut codes = Vec::with_capacity(request.components.len());
    for component in &request.components {
        codes.push(registry.resolve_code(&component.name, component.code_12nc.as_deref())?);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Componenti per Bus")?;

    let header_format = style::header();
    let body_format = style::body();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (col, width) in COLUMN_WIDTHS {
        sheet.set_column_width(col, width)?;
    }

    let mut row = 1u32;
    let mut first_use = vec![true; request.components.len()];

    for bus_offset in 0..request.bus_count {
        let bus = request.bus_start + bus_offset;
        for (idx, component) in request.components.iter().enumerate() {
            let code = codes[idx].clone().unwrap_or_default();
            for unit in 0..component.quantity as usize {
                // The explicit start applies only to the very first serial of
                // the run; after that the registry continues the sequence.
                let serial = if first_use[idx] {
                    first_use[idx] = false;
                    registry.issue(
                        &component.name,
                        component.serial_start,
                        codes[idx].as_deref(),
                    )?
                } else {
                    registry.issue(&component.name, None, None)?
                };

                let board = board_type(
                    component.board_prefix.as_deref(),
                    component.indexed,
                    component.prefix_start.as_ref(),
                    unit,
                );

                sheet.write_string_with_format(row, 0, &request.supplier, &body_format)?;
                sheet.write_string_with_format(row, 1, &request.production_note, &body_format)?;
                sheet.write_string_with_format(row, 2, &request.sales_note, &body_format)?;
                sheet.write_string_with_format(row, 3, &component.name, &body_format)?;
                sheet.write_string_with_format(row, 4, &code, &body_format)?;
                sheet.write_string_with_format(row, 5, serial.to_string(), &body_format)?;
                sheet.write_string_with_format(row, 6, format!("BUS {bus}"), &body_format)?;
                sheet.write_string_with_format(row, 7, &board, &body_format)?;
                sheet.write_string_with_format(row, 8, "", &body_format)?;
                row += 1;
            }
        }
    }

    workbook.save(path)?;

    // Synchronize the component database with the counters just used, so the
    // next batch continues where this one stopped. Per-run prefix starts are
    // kept in the database too.
    let mut last_serials = Vec::new();
    for component in &request.components {
        let Some(last) = registry.last_serial(&component.name) else {
            continue;
        };
        last_serials.push((component.name.clone(), last));
        match store.find(&component.name).cloned() {
            Some(mut db_component) => {
                db_component.serial_start = Some(last + 1);
                db_component.prefix_start = component.prefix_start.clone();
                store.update(&component.name, db_component)?;
            }
            None => warn!(
                component = %component.name,
                "component used in batch is not in the database"
            ),
        }
    }

    info!(rows = row - 1, buses = request.bus_count, "batch sheet written");
    Ok(BatchOutcome {
        rows: row - 1,
        last_serials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::reader::read_first_sheet;
    use crate::error::{Error, StoreError};

    fn setup() -> (tempfile::TempDir, SerialRegistry, ComponentStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let registry = SerialRegistry::open(dir.path()).expect("registry");
        let store = ComponentStore::open(dir.path()).expect("store");
        (dir, registry, store)
    }

    fn request(components: Vec<BatchComponent>) -> BatchRequest {
        BatchRequest {
            production_note: "BP-1".to_string(),
            sales_note: "BV-1".to_string(),
            bus_count: 2,
            bus_start: 1,
            supplier: "TECHRAIL".to_string(),
            components,
        }
    }

    fn component(name: &str, quantity: u32) -> BatchComponent {
        BatchComponent {
            name: name.to_string(),
            quantity,
            serial_start: None,
            board_prefix: None,
            indexed: true,
            prefix_start: None,
            code_12nc: Some("310412345678".to_string()),
        }
    }

    #[test]
    fn issues_sequential_serials_across_buses() {
        let (dir, mut registry, mut store) = setup();
        store
            .add(Component::new("CPU", "310412345678"))
            .expect("add");
        let path = dir.path().join("batch.xlsx");

        let outcome = write_batch_sheet(
            &request(vec![component("CPU", 2)]),
            &mut registry,
            &mut store,
            &path,
        )
        .expect("write");

        // 2 buses x 2 units
        assert_eq!(outcome.rows, 4);
        assert_eq!(outcome.last_serials, vec![("CPU".to_string(), 3)]);

        let data = read_first_sheet(&path).expect("read back");
        let serials: Vec<&str> = data.rows.iter().map(|r| r[5].as_str()).collect();
        let counters: Vec<&str> = serials
            .iter()
            .map(|s| s.split(' ').nth(1).expect("counter part"))
            .collect();
        assert_eq!(counters, vec!["00000", "00001", "00002", "00003"]);
        assert_eq!(data.rows[0][6], "BUS 1");
        assert_eq!(data.rows[2][6], "BUS 2");
    }

    #[test]
    fn board_index_restarts_every_bus() {
        let (dir, mut registry, mut store) = setup();
        store
            .add(Component::new("CPU", "310412345678"))
            .expect("add");
        let path = dir.path().join("batch.xlsx");

        let mut cpu = component("CPU", 2);
        cpu.board_prefix = Some("SL".to_string());
        write_batch_sheet(&request(vec![cpu]), &mut registry, &mut store, &path).expect("write");

        let data = read_first_sheet(&path).expect("read back");
        let boards: Vec<&str> = data.rows.iter().map(|r| r[7].as_str()).collect();
        assert_eq!(boards, vec!["SL1", "SL2", "SL1", "SL2"]);
    }

    #[test]
    fn database_serial_start_advances_after_batch() {
        let (dir, mut registry, mut store) = setup();
        store
            .add(Component::new("CPU", "310412345678"))
            .expect("add");
        let path = dir.path().join("batch.xlsx");

        write_batch_sheet(
            &request(vec![component("CPU", 1)]),
            &mut registry,
            &mut store,
            &path,
        )
        .expect("write");

        // 2 serials issued (one per bus): 0 and 1, so the next start is 2.
        assert_eq!(store.find("CPU").expect("cpu").serial_start, Some(2));
    }

    #[test]
    fn explicit_start_applies_to_first_serial_only() {
        let (dir, mut registry, mut store) = setup();
        store
            .add(Component::new("CPU", "310412345678"))
            .expect("add");
        let path = dir.path().join("batch.xlsx");

        let mut cpu = component("CPU", 1);
        cpu.serial_start = Some(50);
        write_batch_sheet(&request(vec![cpu]), &mut registry, &mut store, &path).expect("write");

        let data = read_first_sheet(&path).expect("read back");
        let counters: Vec<&str> = data
            .rows
            .iter()
            .map(|r| r[5].split(' ').nth(1).expect("counter"))
            .collect();
        assert_eq!(counters, vec!["00050", "00051"]);
    }

    #[test]
    fn unknown_component_without_code_is_rejected_before_issuing() {
        let (dir, mut registry, mut store) = setup();
        let path = dir.path().join("batch.xlsx");

        let mut cpu = component("CPU", 1);
        cpu.code_12nc = None;
        let err = write_batch_sheet(&request(vec![cpu]), &mut registry, &mut store, &path)
            .expect_err("missing code");
        assert!(matches!(err, Error::Store(StoreError::MissingCode(_))));
        assert!(!registry.contains("CPU"));
    }

    #[test]
    fn empty_component_list_is_rejected() {
        let (dir, mut registry, mut store) = setup();
        let path = dir.path().join("batch.xlsx");
        assert!(matches!(
            write_batch_sheet(&request(vec![]), &mut registry, &mut store, &path),
            Err(Error::Document(DocumentError::NoComponents))
        ));
    }
}

//! Handlers for `labelsmith serial`.

use tabled::{Table, Tabled};

use crate::cli::{output, SerialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::store::SerialRegistry;

#[derive(Tabled)]
struct SerialRow {
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Last SN")]
    last_serial: u32,
    #[tabled(rename = "Last used")]
    last_used: String,
    #[tabled(rename = "CODE 12NC")]
    code: String,
}

pub fn execute(command: &SerialCommand, config: &Config) -> Result<()> {
    match command {
        SerialCommand::List => list(config),
    }
}

fn list(config: &Config) -> Result<()> {
    let registry = SerialRegistry::open(&config.storage.db_dir)?;

    output::section("Serial registry");
    if registry.records().is_empty() {
        output::note("No serials issued yet.");
        return Ok(());
    }

    let rows: Vec<SerialRow> = registry
        .records()
        .iter()
        .map(|(description, record)| SerialRow {
            description: description.clone(),
            last_serial: record.last_serial,
            last_used: record.last_used_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            code: record.code_12nc.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    output::table(&Table::new(rows).to_string());
    Ok(())
}

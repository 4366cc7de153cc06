//! Handler for `labelsmith bus`.

use crate::cli::{output, BusArgs};
use crate::config::Config;
use crate::document::bus::write_bus_roster;
use crate::document::BusRosterRequest;
use crate::error::Result;

pub fn execute(args: &BusArgs, config: &Config) -> Result<()> {
    let request = BusRosterRequest {
        production_note: args.production_note.clone(),
        sales_note: args.sales_note.clone(),
        bus_count: args.count,
        bus_start: args.start,
        supplier: args
            .supplier
            .clone()
            .unwrap_or_else(|| config.document.supplier.clone()),
    };

    let rows = write_bus_roster(&request, &args.output)?;
    output::ok(&format!(
        "Bus roster written to {} ({rows} buses)",
        args.output.display()
    ));
    Ok(())
}

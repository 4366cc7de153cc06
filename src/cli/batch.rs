//! Handler for `labelsmith batch`.

use std::collections::HashMap;

use tracing::warn;

use crate::cli::component::parse_prefix_start;
use crate::cli::{output, BatchArgs};
use crate::config::Config;
use crate::document::batch::write_batch_sheet;
use crate::document::{BatchComponent, BatchRequest};
use crate::domain::PrefixStart;
use crate::error::{Error, Result, StoreError};
use crate::store::{ComponentStore, PresetStore, SerialRegistry};

pub fn execute(args: &BatchArgs, config: &Config) -> Result<()> {
    let mut store = ComponentStore::open(&config.storage.db_dir)?;
    let mut registry = SerialRegistry::open(&config.storage.db_dir)?;

    let serial_overrides = parse_overrides(&args.serial_starts, |value| {
        value
            .parse::<u32>()
            .map_err(|_| Error::InvalidArgument(format!("invalid serial start '{value}'")))
    })?;
    let prefix_overrides = parse_overrides(&args.prefix_starts, parse_prefix_start)?;

    let components = collect_components(args, config, &store, &serial_overrides, &prefix_overrides)?;

    // An override naming a component that is not part of the batch is almost
    // certainly an operator typo.
    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    for name in unmatched_overrides(serial_overrides.keys(), &names)
        .into_iter()
        .chain(unmatched_overrides(prefix_overrides.keys(), &names))
    {
        output::warn(&format!(
            "override for '{name}' ignored: component is not part of this batch"
        ));
    }

    let request = BatchRequest {
        production_note: args.production_note.clone(),
        sales_note: args.sales_note.clone(),
        bus_count: args.buses,
        bus_start: args.bus_start,
        supplier: args
            .supplier
            .clone()
            .unwrap_or_else(|| config.document.supplier.clone()),
        components,
    };

    let outcome = write_batch_sheet(&request, &mut registry, &mut store, &args.output)?;

    output::ok(&format!(
        "Batch sheet written to {} ({} rows)",
        args.output.display(),
        outcome.rows
    ));
    for (name, last) in &outcome.last_serials {
        output::key_value(name, format!("last SN {last:05}, next start {}", last + 1));
    }
    Ok(())
}

/// Resolve `--preset` and `--component` specs against the database.
///
/// Preset entries that are no longer in the database are skipped with a
/// warning; explicitly named components must exist.
fn collect_components(
    args: &BatchArgs,
    config: &Config,
    store: &ComponentStore,
    serial_overrides: &HashMap<String, u32>,
    prefix_overrides: &HashMap<String, PrefixStart>,
) -> Result<Vec<BatchComponent>> {
    // name -> quantity, in first-appearance order
    let mut order: Vec<String> = Vec::new();
    let mut quantities: HashMap<String, u32> = HashMap::new();

    if let Some(preset_name) = &args.preset {
        let presets = PresetStore::open(&config.storage.db_dir);
        let preset = presets.load(preset_name)?;
        for name in preset.components {
            if store.find(&name).is_none() {
                warn!(component = %name, "preset entry is no longer in the database");
                output::warn(&format!("skipping '{name}': not in the database"));
                continue;
            }
            if !quantities.contains_key(&name) {
                order.push(name.clone());
            }
            quantities.insert(name, 1);
        }
    }

    for spec in &args.components {
        let (name, quantity) = parse_component_spec(spec)?;
        if store.find(&name).is_none() {
            return Err(StoreError::ComponentNotFound(name).into());
        }
        if !quantities.contains_key(&name) {
            order.push(name.clone());
        }
        quantities.insert(name, quantity);
    }

    let components = order
        .into_iter()
        .map(|name| {
            let component = store.find(&name).cloned().unwrap_or_else(|| {
                unreachable!("collected names are checked against the store")
            });
            let mut batch = BatchComponent::from_component(&component, quantities[&name]);
            if let Some(start) = serial_overrides.get(&name) {
                batch.serial_start = Some(*start);
            }
            if let Some(start) = prefix_overrides.get(&name) {
                batch.prefix_start = Some(start.clone());
            }
            batch
        })
        .collect();
    Ok(components)
}

/// Parse `NAME` or `NAME:QTY`.
fn parse_component_spec(spec: &str) -> Result<(String, u32)> {
    match spec.rsplit_once(':') {
        Some((name, quantity)) => {
            let quantity: u32 = quantity.parse().map_err(|_| {
                Error::InvalidArgument(format!("invalid quantity in component spec '{spec}'"))
            })?;
            if quantity == 0 {
                return Err(Error::InvalidArgument(format!(
                    "quantity must be greater than 0 in '{spec}'"
                )));
            }
            Ok((name.to_string(), quantity))
        }
        None => Ok((spec.to_string(), 1)),
    }
}

/// Override keys that match none of the batch component names, sorted.
fn unmatched_overrides<'a>(
    keys: impl Iterator<Item = &'a String>,
    names: &[&str],
) -> Vec<String> {
    let mut unmatched: Vec<String> = keys
        .filter(|key| !names.contains(&key.as_str()))
        .cloned()
        .collect();
    unmatched.sort();
    unmatched
}

/// Parse repeated `NAME=VALUE` overrides with a per-value parser.
fn parse_overrides<T>(
    specs: &[String],
    parse: impl Fn(&str) -> Result<T>,
) -> Result<HashMap<String, T>> {
    let mut overrides = HashMap::new();
    for spec in specs {
        let (name, value) = spec.split_once('=').ok_or_else(|| {
            Error::InvalidArgument(format!("invalid override '{spec}' (expected NAME=VALUE)"))
        })?;
        overrides.insert(name.to_string(), parse(value)?);
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_spec_defaults_to_quantity_one() {
        assert_eq!(
            parse_component_spec("CPU BOARD").expect("spec"),
            ("CPU BOARD".to_string(), 1)
        );
        assert_eq!(
            parse_component_spec("CPU:3").expect("spec"),
            ("CPU".to_string(), 3)
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(parse_component_spec("CPU:0").is_err());
        assert!(parse_component_spec("CPU:x").is_err());
    }

    #[test]
    fn overrides_outside_the_batch_are_flagged() {
        let mut overrides = HashMap::new();
        overrides.insert("CPU".to_string(), 5u32);
        overrides.insert("TYPO".to_string(), 7u32);

        let unmatched = unmatched_overrides(overrides.keys(), &["CPU", "PSU"]);
        assert_eq!(unmatched, vec!["TYPO"]);
        assert!(unmatched_overrides(overrides.keys(), &["CPU", "TYPO"]).is_empty());
    }

    #[test]
    fn overrides_parse_name_value_pairs() {
        let overrides = parse_overrides(&["CPU=5".to_string()], |value| {
            value
                .parse::<u32>()
                .map_err(|_| Error::InvalidArgument(value.to_string()))
        })
        .expect("overrides");
        assert_eq!(overrides["CPU"], 5);

        assert!(parse_overrides(&["CPU".to_string()], |_| Ok(())).is_err());
    }
}

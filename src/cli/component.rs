//! Handlers for `labelsmith component`.

use dialoguer::Confirm;
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::cli::{ComponentAddArgs, ComponentCommand, ComponentEditArgs, ComponentRemoveArgs};
use crate::config::Config;
use crate::domain::{Component, PrefixStart};
use crate::error::{Error, Result};
use crate::store::ComponentStore;

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CODE 12NC")]
    code: String,
    #[tabled(rename = "Next SN")]
    next_serial: String,
    #[tabled(rename = "Board prefix")]
    prefix: String,
    #[tabled(rename = "Indexed")]
    indexed: String,
}

pub fn execute(command: &ComponentCommand, config: &Config) -> Result<()> {
    let mut store = ComponentStore::open(&config.storage.db_dir)?;
    match command {
        ComponentCommand::Add(args) => add(&mut store, args),
        ComponentCommand::Edit(args) => edit(&mut store, args),
        ComponentCommand::Remove(args) => remove(&mut store, args),
        ComponentCommand::List => list(&store),
        ComponentCommand::Show { name } => show(&store, name),
    }
}

/// Parse the `--prefix-start` spec of the component commands.
pub(crate) fn parse_prefix_start(spec: &str) -> Result<PrefixStart> {
    PrefixStart::parse(spec).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid prefix start '{spec}' (expected N or N,N,...)"
        ))
    })
}

fn add(store: &mut ComponentStore, args: &ComponentAddArgs) -> Result<()> {
    let component = Component {
        name: args.name.clone(),
        code_12nc: args.code_12nc.clone(),
        serial_start: args.serial_start,
        board_prefix: args.board_prefix.clone(),
        indexed: !args.no_index,
        prefix_start: args
            .prefix_start
            .as_deref()
            .map(parse_prefix_start)
            .transpose()?,
    };
    store.add(component)?;
    output::ok(&format!("Component '{}' added", args.name));
    Ok(())
}

fn edit(store: &mut ComponentStore, args: &ComponentEditArgs) -> Result<()> {
    let mut component = store
        .find(&args.name)
        .cloned()
        .ok_or_else(|| crate::error::StoreError::ComponentNotFound(args.name.clone()))?;

    if let Some(rename) = &args.rename {
        component.name = rename.clone();
    }
    if let Some(code) = &args.code_12nc {
        component.code_12nc = code.clone();
    }
    if let Some(start) = args.serial_start {
        component.serial_start = Some(start);
    }
    if let Some(prefix) = &args.board_prefix {
        component.board_prefix = Some(prefix.clone());
    }
    if let Some(indexed) = args.indexed {
        component.indexed = indexed;
    }
    if let Some(spec) = &args.prefix_start {
        component.prefix_start = Some(parse_prefix_start(spec)?);
    }
    if args.clear_serial_start {
        component.serial_start = None;
    }
    if args.clear_board_prefix {
        component.board_prefix = None;
    }
    if args.clear_prefix_start {
        component.prefix_start = None;
    }

    let new_name = component.name.clone();
    store.update(&args.name, component)?;
    output::ok(&format!("Component '{new_name}' updated"));
    Ok(())
}

fn remove(store: &mut ComponentStore, args: &ComponentRemoveArgs) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove component '{}'?", args.name))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Aborted.");
            return Ok(());
        }
    }
    store.remove(&args.name)?;
    output::ok(&format!("Component '{}' removed", args.name));
    Ok(())
}

fn list(store: &ComponentStore) -> Result<()> {
    output::section("Components");
    if store.all().is_empty() {
        output::note("No components registered.");
        return Ok(());
    }

    let rows: Vec<ComponentRow> = store
        .all()
        .iter()
        .map(|c| ComponentRow {
            name: c.name.clone(),
            code: c.code_12nc.clone(),
            next_serial: c
                .serial_start
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            prefix: c.board_prefix.clone().unwrap_or_else(|| "-".to_string()),
            indexed: if c.indexed { "yes" } else { "no" }.to_string(),
        })
        .collect();
    output::table(&Table::new(rows).to_string());
    Ok(())
}

fn show(store: &ComponentStore, name: &str) -> Result<()> {
    let component = store
        .find(name)
        .ok_or_else(|| crate::error::StoreError::ComponentNotFound(name.to_string()))?;

    output::section(&component.name);
    output::key_value("CODE 12NC", &component.code_12nc);
    output::key_value(
        "Next SN",
        component
            .serial_start
            .map(|s| s.to_string())
            .unwrap_or_else(|| "registry".to_string()),
    );
    output::key_value(
        "Board prefix",
        component.board_prefix.as_deref().unwrap_or("-"),
    );
    output::key_value("Indexed", if component.indexed { "yes" } else { "no" });
    match &component.prefix_start {
        Some(PrefixStart::Offset(start)) => output::key_value("Prefix start", start),
        Some(PrefixStart::Sequence(values)) => output::key_value(
            "Prefix start",
            values
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        None => output::key_value("Prefix start", "-"),
    }
    Ok(())
}

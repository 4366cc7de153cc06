//! Handlers for `labelsmith preset`.

use dialoguer::Confirm;
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::cli::{PresetCommand, PresetRemoveArgs, PresetSaveArgs};
use crate::config::Config;
use crate::error::Result;
use crate::store::{ComponentStore, PresetStore};

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Components")]
    components: usize,
}

pub fn execute(command: &PresetCommand, config: &Config) -> Result<()> {
    let presets = PresetStore::open(&config.storage.db_dir);
    match command {
        PresetCommand::Save(args) => save(&presets, config, args),
        PresetCommand::List => list(&presets),
        PresetCommand::Show { name } => show(&presets, config, name),
        PresetCommand::Remove(args) => remove(&presets, args),
    }
}

fn save(presets: &PresetStore, config: &Config, args: &PresetSaveArgs) -> Result<()> {
    // Warn about names the database does not know, like the original tool.
    let store = ComponentStore::open(&config.storage.db_dir)?;
    for name in &args.components {
        if store.find(name).is_none() {
            output::warn(&format!("component '{name}' is not in the database"));
        }
    }

    if presets.exists(&args.name)? && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Preset '{}' exists. Overwrite?", args.name))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Aborted.");
            return Ok(());
        }
    }

    presets.save(&args.name, args.components.clone())?;
    output::ok(&format!(
        "Preset '{}' saved ({} components)",
        args.name,
        args.components.len()
    ));
    Ok(())
}

fn list(presets: &PresetStore) -> Result<()> {
    output::section("Presets");
    let all = presets.list()?;
    if all.is_empty() {
        output::note("No presets saved.");
        return Ok(());
    }

    let rows: Vec<PresetRow> = all
        .iter()
        .map(|p| PresetRow {
            name: p.name.clone(),
            created: p.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            components: p.components.len(),
        })
        .collect();
    output::table(&Table::new(rows).to_string());
    Ok(())
}

fn show(presets: &PresetStore, config: &Config, name: &str) -> Result<()> {
    let preset = presets.load(name)?;
    let store = ComponentStore::open(&config.storage.db_dir)?;

    output::section(&preset.name);
    output::key_value("Created", preset.created_at.format("%Y-%m-%d %H:%M:%S"));
    for component in &preset.components {
        if store.find(component).is_some() {
            output::note(&format!("  {component}"));
        } else {
            output::warn(&format!("{component} (no longer in the database)"));
        }
    }
    Ok(())
}

fn remove(presets: &PresetStore, args: &PresetRemoveArgs) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove preset '{}'?", args.name))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Aborted.");
            return Ok(());
        }
    }
    presets.remove(&args.name)?;
    output::ok(&format!("Preset '{}' removed", args.name));
    Ok(())
}

//! Handler for `labelsmith check`.

use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

pub fn execute_config(path: &Path) -> Result<()> {
    output::section("Configuration");

    if !path.exists() {
        output::warn(&format!(
            "{} not found, built-in defaults apply",
            path.display()
        ));
        let defaults = Config::default();
        output::key_value("Database dir", defaults.storage.db_dir.display());
        output::key_value("Supplier", &defaults.document.supplier);
        return Ok(());
    }

    let config = Config::load(path)?;
    output::ok(&format!("{} is valid", path.display()));
    output::key_value("Database dir", config.storage.db_dir.display());
    output::key_value("Supplier", &config.document.supplier);
    output::key_value("Log level", &config.logging.level);
    output::key_value("Log format", &config.logging.format);
    Ok(())
}

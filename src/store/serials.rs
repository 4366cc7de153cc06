//! Serial-number registry: last issued counter per component description.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::SerialNumber;
use crate::error::{Result, StoreError};

const STATE_FILE: &str = "serial_state.json";

/// Per-description registry record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialRecord {
    pub last_serial: u32,
    pub last_used_at: DateTime<Local>,
    #[serde(default)]
    pub code_12nc: Option<String>,
}

/// Issues serial numbers and persists the last counter per description.
#[derive(Debug)]
pub struct SerialRegistry {
    path: PathBuf,
    state: BTreeMap<String, SerialRecord>,
}

impl SerialRegistry {
    /// Open the registry under the given database directory.
    pub fn open(db_dir: &Path) -> Result<Self> {
        let path = db_dir.join(STATE_FILE);
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::ReadFile {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, state })
    }

    /// Issue the next serial for a description.
    ///
    /// An explicit `start` always wins; otherwise the counter continues from
    /// the stored record, or begins at 0 for a new description. A `None`
    /// `code_12nc` preserves the stored code.
    pub fn issue(
        &mut self,
        description: &str,
        start: Option<u32>,
        code_12nc: Option<&str>,
    ) -> Result<SerialNumber> {
        let now = Local::now();
        let counter = match (start, self.state.get(description)) {
            (Some(start), _) => start,
            (None, Some(record)) => record.last_serial + 1,
            (None, None) => 0,
        };

        let code = code_12nc.map(str::to_string).or_else(|| {
            self.state
                .get(description)
                .and_then(|record| record.code_12nc.clone())
        });
        self.state.insert(
            description.to_string(),
            SerialRecord {
                last_serial: counter,
                last_used_at: now,
                code_12nc: code,
            },
        );
        self.save()?;

        let serial = SerialNumber::new(now.date_naive(), counter);
        debug!(description, counter, %serial, "issued serial");
        Ok(serial)
    }

    /// Decide the 12NC code to use for an issue run.
    ///
    /// A code is mandatory the first time a description is ever seen;
    /// afterwards the stored code is the fallback.
    pub fn resolve_code(
        &self,
        description: &str,
        provided: Option<&str>,
    ) -> Result<Option<String>> {
        match self.state.get(description) {
            Some(record) => Ok(provided
                .map(str::to_string)
                .or_else(|| record.code_12nc.clone())),
            None => match provided {
                Some(code) => Ok(Some(code.to_string())),
                None => Err(StoreError::MissingCode(description.to_string()).into()),
            },
        }
    }

    /// Last issued counter for a description, if any.
    pub fn last_serial(&self, description: &str) -> Option<u32> {
        self.state.get(description).map(|record| record.last_serial)
    }

    pub fn contains(&self, description: &str) -> bool {
        self.state.contains_key(description)
    }

    pub fn records(&self) -> &BTreeMap<String, SerialRecord> {
        &self.state
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn registry() -> (tempfile::TempDir, SerialRegistry) {
        let dir = tempfile::tempdir().expect("temp dir");
        let registry = SerialRegistry::open(dir.path()).expect("open registry");
        (dir, registry)
    }

    #[test]
    fn new_description_starts_at_zero() {
        let (_dir, mut registry) = registry();
        let serial = registry.issue("CPU", None, Some("3104")).expect("issue");
        assert_eq!(serial.counter(), 0);
        assert_eq!(registry.last_serial("CPU"), Some(0));
    }

    #[test]
    fn counters_continue_from_last() {
        let (_dir, mut registry) = registry();
        registry.issue("CPU", None, Some("3104")).expect("first");
        let serial = registry.issue("CPU", None, None).expect("second");
        assert_eq!(serial.counter(), 1);
    }

    #[test]
    fn explicit_start_always_wins() {
        let (_dir, mut registry) = registry();
        registry.issue("CPU", None, Some("3104")).expect("first");
        let serial = registry.issue("CPU", Some(100), None).expect("restart");
        assert_eq!(serial.counter(), 100);
        assert_eq!(registry.last_serial("CPU"), Some(100));
    }

    #[test]
    fn follow_up_issue_preserves_stored_code() {
        let (dir, mut registry) = registry();
        registry.issue("CPU", None, Some("3104")).expect("first");
        registry.issue("CPU", None, None).expect("second");

        let reloaded = SerialRegistry::open(dir.path()).expect("reopen");
        let record = reloaded.records().get("CPU").expect("record");
        assert_eq!(record.code_12nc.as_deref(), Some("3104"));
        assert_eq!(record.last_serial, 1);
    }

    #[test]
    fn code_required_for_unknown_description() {
        let (_dir, registry) = registry();
        let err = registry.resolve_code("NEW", None).expect_err("missing");
        assert!(matches!(err, Error::Store(StoreError::MissingCode(_))));
        assert_eq!(
            registry.resolve_code("NEW", Some("42")).expect("provided"),
            Some("42".to_string())
        );
    }
}

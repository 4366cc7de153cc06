//! Component database persisted as a single JSON file.

use std::path::{Path, PathBuf};

use crate::domain::Component;
use crate::error::{Result, StoreError};

const COMPONENTS_FILE: &str = "components.json";

/// CRUD access to the registered components.
///
/// The file is rewritten after every mutation so a crash never loses more
/// than the operation in flight.
#[derive(Debug)]
pub struct ComponentStore {
    path: PathBuf,
    components: Vec<Component>,
}

impl ComponentStore {
    /// Open the store under the given database directory.
    pub fn open(db_dir: &Path) -> Result<Self> {
        let path = db_dir.join(COMPONENTS_FILE);
        let components = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::ReadFile {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            Vec::new()
        };
        Ok(Self { path, components })
    }

    /// Add a new component. Names are unique.
    pub fn add(&mut self, component: Component) -> Result<()> {
        if self.find(&component.name).is_some() {
            return Err(StoreError::DuplicateComponent(component.name).into());
        }
        self.components.push(component);
        self.save()
    }

    /// Replace the component registered under `name`.
    ///
    /// A rename must not collide with another registered component.
    pub fn update(&mut self, name: &str, component: Component) -> Result<()> {
        if component.name != name && self.find(&component.name).is_some() {
            return Err(StoreError::DuplicateComponent(component.name).into());
        }
        let slot = self
            .components
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::ComponentNotFound(name.to_string()))?;
        *slot = component;
        self.save()
    }

    /// Remove the component registered under `name`.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.components.len();
        self.components.retain(|c| c.name != name);
        if self.components.len() == before {
            return Err(StoreError::ComponentNotFound(name.to_string()).into());
        }
        self.save()
    }

    pub fn find(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn all(&self) -> &[Component] {
        &self.components
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.components)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

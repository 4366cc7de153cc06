//! JSON-backed persistence under the database directory.
//!
//! Three stores share the same layout: the component database
//! (`components.json`), the serial registry (`serial_state.json`) and the
//! preset directory (`presets/`). Absent files behave as empty stores;
//! corrupt files are structured errors.

pub mod components;
pub mod presets;
pub mod serials;

pub use components::ComponentStore;
pub use presets::{Preset, PresetStore};
pub use serials::{SerialRecord, SerialRegistry};

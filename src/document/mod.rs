//! Excel document generation and transformation.

pub mod batch;
pub mod bus;
pub mod export;
pub mod merge;
pub mod reader;
pub mod style;

pub use batch::{BatchComponent, BatchOutcome, BatchRequest};
pub use bus::BusRosterRequest;
pub use export::ExtraFields;

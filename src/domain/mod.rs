//! Core domain types: components, serial numbers, board-type rendering.

pub mod component;
pub mod serial;

pub use component::{Component, PrefixStart};
pub use serial::SerialNumber;

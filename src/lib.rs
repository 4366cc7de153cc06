//! Labelsmith - production label and serial-number document generator.
//!
//! This crate generates the paperwork that accompanies electronic boards
//! through production: serial-number batch sheets, bus rosters, filtered
//! exports for shipping and ERP import, and printable PDF label sheets.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from a TOML file
//! - [`domain`] - Core types: components, board prefixes, serial numbers
//! - [`store`] - JSON-backed stores: component database, serial registry, presets
//! - [`document`] - Excel workbook generation and transformation
//! - [`label`] - PDF label sheets (sticker grid and strip layout)
//! - [`cli`] - Command-line interface and handlers
//! - [`error`] - Error types for the crate

pub mod cli;
pub mod config;
pub mod document;
pub mod domain;
pub mod error;
pub mod label;
pub mod store;

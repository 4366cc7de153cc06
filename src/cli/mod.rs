//! Command-line interface definitions.

pub mod batch;
pub mod bus;
pub mod check;
pub mod component;
pub mod export;
pub mod label;
pub mod merge;
pub mod output;
pub mod preset;
pub mod serial;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Labelsmith - production label and serial-number document generator.
#[derive(Parser, Debug)]
#[command(name = "labelsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "labelsmith.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the component database
    #[command(subcommand)]
    Component(ComponentCommand),

    /// Manage component-list presets
    #[command(subcommand)]
    Preset(PresetCommand),

    /// Inspect the serial-number registry
    #[command(subcommand)]
    Serial(SerialCommand),

    /// Generate a bus roster workbook
    Bus(BusArgs),

    /// Generate a batch sheet, issuing serial numbers
    Batch(BatchArgs),

    /// Generate filtered exports from a batch sheet
    #[command(subcommand)]
    Export(ExportCommand),

    /// List the unique descriptions of a workbook
    Descriptions(DescriptionsArgs),

    /// Generate PDF label sheets
    #[command(subcommand)]
    Label(LabelCommand),

    /// Merge same-shaped workbooks and sort by a column
    Merge(MergeArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `labelsmith component`
#[derive(Subcommand, Debug)]
pub enum ComponentCommand {
    /// Register a new component
    Add(ComponentAddArgs),
    /// Edit an existing component
    Edit(ComponentEditArgs),
    /// Remove a component
    Remove(ComponentRemoveArgs),
    /// List all components
    List,
    /// Show one component
    Show { name: String },
}

/// Subcommands for `labelsmith preset`
#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// Save a named component list
    Save(PresetSaveArgs),
    /// List saved presets, newest first
    List,
    /// Show the components of a preset
    Show { name: String },
    /// Delete a preset
    Remove(PresetRemoveArgs),
}

/// Subcommands for `labelsmith serial`
#[derive(Subcommand, Debug)]
pub enum SerialCommand {
    /// Show the last issued serial per description
    List,
}

/// Subcommands for `labelsmith export`
#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Box-labels workbook (EtichetteBOX sheet)
    Box(ExportArgs),
    /// ERP-import workbook (ImportGestionale sheet)
    Erp(ExportArgs),
}

/// Subcommands for `labelsmith label`
#[derive(Subcommand, Debug)]
pub enum LabelCommand {
    /// 4x21 sticker grid with an optional logo
    Sheet(LabelSheetArgs),
    /// Strip rows per bus/board combination, white then black set
    Strip(LabelStripArgs),
}

/// Subcommands for `labelsmith check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file
    Config,
}

#[derive(Parser, Debug)]
pub struct ComponentAddArgs {
    /// Component name (unique)
    pub name: String,

    /// 12NC product code
    #[arg(long = "code-12nc")]
    pub code_12nc: String,

    /// Counter of the next serial to issue
    #[arg(long)]
    pub serial_start: Option<u32>,

    /// Board-type prefix, e.g. SL
    #[arg(long)]
    pub board_prefix: Option<String>,

    /// Write the bare prefix without an index
    #[arg(long)]
    pub no_index: bool,

    /// Board-index start: a number or a comma-separated sequence
    #[arg(long)]
    pub prefix_start: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ComponentEditArgs {
    /// Component to edit
    pub name: String,

    /// New name
    #[arg(long)]
    pub rename: Option<String>,

    #[arg(long = "code-12nc")]
    pub code_12nc: Option<String>,

    #[arg(long)]
    pub serial_start: Option<u32>,

    #[arg(long)]
    pub board_prefix: Option<String>,

    /// Enable or disable board indexing
    #[arg(long)]
    pub indexed: Option<bool>,

    #[arg(long)]
    pub prefix_start: Option<String>,

    /// Let the registry decide the next serial
    #[arg(long, conflicts_with = "serial_start")]
    pub clear_serial_start: bool,

    /// Remove the board-type prefix
    #[arg(long, conflicts_with = "board_prefix")]
    pub clear_board_prefix: bool,

    /// Remove the board-index start
    #[arg(long, conflicts_with = "prefix_start")]
    pub clear_prefix_start: bool,
}

#[derive(Parser, Debug)]
pub struct ComponentRemoveArgs {
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct PresetSaveArgs {
    /// Preset name
    pub name: String,

    /// Component names to include
    #[arg(long = "component", required = true)]
    pub components: Vec<String>,

    /// Overwrite an existing preset without asking
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct PresetRemoveArgs {
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct BusArgs {
    /// Production note number
    #[arg(long)]
    pub production_note: String,

    /// Sales note number
    #[arg(long)]
    pub sales_note: String,

    /// Number of buses
    #[arg(long)]
    pub count: u32,

    /// Number of the first bus
    #[arg(long, default_value = "1")]
    pub start: u32,

    /// Supplier name (defaults to the configured one)
    #[arg(long)]
    pub supplier: Option<String>,

    /// Output workbook
    #[arg(short, long, default_value = "bus_roster.xlsx")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct BatchArgs {
    #[arg(long)]
    pub production_note: String,

    #[arg(long)]
    pub sales_note: String,

    /// Number of buses
    #[arg(long)]
    pub buses: u32,

    /// Number of the first bus
    #[arg(long, default_value = "1")]
    pub bus_start: u32,

    /// Supplier name (defaults to the configured one)
    #[arg(long)]
    pub supplier: Option<String>,

    /// Component to include, as NAME or NAME:QTY
    #[arg(long = "component")]
    pub components: Vec<String>,

    /// Load a saved preset of component names
    #[arg(long)]
    pub preset: Option<String>,

    /// Per-component serial start override, as NAME=N
    #[arg(long = "serial-start")]
    pub serial_starts: Vec<String>,

    /// Per-component board-index start override, as NAME=N or NAME=N,N,...
    #[arg(long = "prefix-start")]
    pub prefix_starts: Vec<String>,

    /// Output workbook
    #[arg(short, long, default_value = "batch.xlsx")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Input batch sheet
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output workbook
    #[arg(short, long)]
    pub output: PathBuf,

    /// Description to include (repeatable)
    #[arg(long = "description")]
    pub descriptions: Vec<String>,

    /// Include every description found in the input
    #[arg(long, conflicts_with = "descriptions")]
    pub all: bool,

    #[arg(long)]
    pub customer: Option<String>,

    #[arg(long)]
    pub sales_note: Option<String>,

    #[arg(long)]
    pub production_note: Option<String>,

    #[arg(long)]
    pub bus_model: Option<String>,

    #[arg(long)]
    pub board_password: Option<String>,

    #[arg(long)]
    pub ssh_cert: Option<String>,

    #[arg(long)]
    pub ovpn_cert: Option<String>,

    #[arg(long)]
    pub vpn_ip: Option<String>,

    #[arg(long)]
    pub purchase_order: Option<String>,

    #[arg(long)]
    pub transport_authority: Option<String>,

    /// Unit code column (ERP export only)
    #[arg(long)]
    pub unit_code: Option<String>,

    /// Order date column (ERP export only)
    #[arg(long)]
    pub order_date: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DescriptionsArgs {
    /// Input workbook
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
pub struct LabelSheetArgs {
    /// Input batch sheet
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PDF
    #[arg(short, long)]
    pub output: PathBuf,

    /// Logo image placed on every label
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Keep only rows with this 12NC code (repeatable)
    #[arg(long = "code")]
    pub codes: Vec<String>,

    /// Print the whole set this many times
    #[arg(long, default_value = "1")]
    pub repeat: u32,

    /// First grid row to print on (1-based)
    #[arg(long, default_value = "1")]
    pub start_row: u32,

    /// First grid column to print on (1-based)
    #[arg(long, default_value = "1")]
    pub start_col: u32,

    /// Font size in points
    #[arg(long, default_value = "5")]
    pub font_size: f32,

    /// Logo width in millimeters
    #[arg(long, default_value = "10")]
    pub logo_width: f32,
}

#[derive(Parser, Debug)]
pub struct LabelStripArgs {
    /// Input batch sheet
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PDF
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep only these board types (repeatable)
    #[arg(long = "board-type")]
    pub board_types: Vec<String>,

    /// Print the whole set this many times
    #[arg(long, default_value = "1")]
    pub repeat: u32,

    /// First row to print on (1-based)
    #[arg(long, default_value = "1")]
    pub start_row: u32,

    /// First column to print on (1-based)
    #[arg(long, default_value = "1")]
    pub start_col: u32,

    /// Omit the bus number prefix
    #[arg(long)]
    pub no_counter: bool,

    /// Skip the inverted black set
    #[arg(long)]
    pub no_black: bool,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Workbooks to merge, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Column to sort by
    #[arg(long)]
    pub sort_by: String,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    /// Output workbook
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Route a parsed command to its handler.
pub fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Component(command) => component::execute(command, config),
        Commands::Preset(command) => preset::execute(command, config),
        Commands::Serial(command) => serial::execute(command, config),
        Commands::Bus(args) => bus::execute(args, config),
        Commands::Batch(args) => batch::execute(args, config),
        Commands::Export(command) => export::execute(command),
        Commands::Descriptions(args) => export::list_descriptions(args),
        Commands::Label(command) => label::execute(command),
        Commands::Merge(args) => merge::execute(args),
        Commands::Check(CheckCommand::Config) => check::execute_config(&cli.config),
    }
}

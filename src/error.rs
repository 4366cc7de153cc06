use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by the JSON-backed stores under the database directory.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("component '{0}' already exists")]
    DuplicateComponent(String),

    #[error("component '{0}' not found")]
    ComponentNotFound(String),

    #[error("12NC code is required the first time component '{0}' is issued")]
    MissingCode(String),

    #[error("preset '{0}' not found")]
    PresetNotFound(String),

    #[error("invalid preset name: '{0}'")]
    InvalidPresetName(String),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while building or transforming workbooks.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("column '{0}' not found in input file")]
    MissingColumn(String),

    #[error("workbook contains no sheets")]
    EmptyWorkbook,

    #[error("no rows matched the selected descriptions")]
    NoMatchingRows,

    #[error("production note and sales note are required")]
    MissingNotes,

    #[error("bus count must be greater than 0")]
    EmptyBusCount,

    #[error("at least one component is required")]
    NoComponents,

    #[error("no input files to merge")]
    NoInputFiles,

    #[error("sort column '{0}' does not exist")]
    UnknownSortColumn(String),

    #[error("inconsistent columns in {file}: expected {expected:?}, found {found:?}")]
    ColumnMismatch {
        file: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Errors raised while laying out PDF label sheets.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("no 12NC codes selected")]
    EmptyCodeFilter,

    #[error("no rows matched the selected 12NC codes (available: {available:?})")]
    NoMatchingCodes { available: Vec<String> },

    #[error("no board types selected")]
    EmptyTypeFilter,

    #[error("no rows matched the selected board types")]
    NoMatchingTypes,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("spreadsheet read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

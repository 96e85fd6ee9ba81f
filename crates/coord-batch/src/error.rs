use std::io;

use thiserror::Error;

use crate::workflow::Stage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("too many rows: {found} (maximum {max})")]
    TooManyRows { found: usize, max: usize },

    #[error("row {row} has {found} columns (maximum {max})")]
    TooManyColumns { row: usize, found: usize, max: usize },

    #[error("cell at row {row}, column {column} is {length} characters long (maximum {max})")]
    CellTooLong {
        row: usize,
        column: usize,
        length: usize,
        max: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("input coordinates are not finite numbers ({x}, {y})")]
    NonFiniteInput { x: f64, y: f64 },

    #[error("invalid UTM zone {0}, must be between 1 and 60")]
    InvalidZone(u8),

    #[error("latitude {0} is outside the valid range (-90 to 90)")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside the valid range (-180 to 180)")]
    LongitudeOutOfRange(f64),

    #[error("projection produced non-finite coordinates")]
    NonFiniteResult,

    #[error("invalid projection definition '{definition}': {message}")]
    Definition { definition: String, message: String },

    #[error("UTM coordinates ({x}, {y}) are outside the valid range ({min} to {max})")]
    UtmOutOfRange { x: f64, y: f64, min: f64, max: f64 },

    #[error("transformation failed: {0}")]
    Transform(String),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("column for '{0}' is not mapped")]
    UnmappedColumn(&'static str),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("unsupported coordinate systems: {0}")]
    Projection(#[from] ProjectionError),

    #[error("clipboard write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid output: {0}")]
    InvalidOutput(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("event '{event}' is not accepted while {stage}")]
    InvalidEvent { stage: Stage, event: &'static str },

    #[error("event '{event}' rejected: {reason}")]
    GuardRejected { event: &'static str, reason: String },

    #[error("a clipboard write is still pending")]
    Busy,

    #[error("failed to format clipboard text: {0}")]
    Format(String),
}

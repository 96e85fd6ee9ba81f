//! Batch coordinate conversion for pasted spreadsheet data.
//!
//! Raw text is split into a grid, columns are mapped to coordinate roles,
//! every row is projected independently and the results are rendered as
//! tab-separated text ready to paste back into a spreadsheet. [`Workflow`]
//! ties those steps together as an explicit state machine.

mod clipboard;
mod dms;
mod engine;
mod error;
mod header;
mod mapping;
mod model;
mod options;
mod profile;
mod projector;
mod table_parse;
mod warning;
mod workflow;

pub use clipboard::{ClipboardSink, ERROR_SENTINEL, WriterSink, format_for_clipboard};
pub use dms::{Axis, decimal_to_dms};
pub use engine::{GEOGRAPHIC_DECIMALS, PROJECTED_DECIMALS, convert_rows, round_to, unit_decimals};
pub use error::{ConvertError, ParseError, ProjectionError, WorkflowError};
pub use header::looks_like_header;
pub use mapping::{ColumnMapping, Role};
pub use model::{BatchOutcome, Coordinate, ConversionRow, CoordinateSystem, ParsedTable, Point};
pub use options::{
    ConversionParameters, CoordinateKind, DataLimits, Datum, HeaderMode, Hemisphere,
    MAX_CLIPBOARD_DECIMALS, MAX_UTM_COORDINATE, MAX_UTM_ZONE, MIN_UTM_COORDINATE, MIN_UTM_ZONE,
    OutputFormat, validate_zone,
};
pub use profile::{ColumnRole, ConversionProfile};
pub use projector::{Proj4Projector, Projector, proj_definition, validate_system};
pub use table_parse::{decode_input_bytes, parse_grid, parse_table};
pub use warning::{ParseWarning, WarningCode};
pub use workflow::{Event, Stage, Workflow, WorkflowState, transition};

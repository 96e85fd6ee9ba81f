//! The conversion workflow as an explicit state machine.
//!
//! [`transition`] decides where an event leads without touching state;
//! [`Workflow::dispatch`] applies the event, runs entry actions and performs
//! the synchronous work of the transient `ParsingData` and `Converting`
//! stages before returning the stage the machine settled in.

use std::fmt::{self, Display, Formatter};

use tracing::debug;

use crate::clipboard::{ClipboardSink, format_for_clipboard};
use crate::engine::convert_rows;
use crate::error::WorkflowError;
use crate::mapping::{ColumnMapping, Role};
use crate::model::{ConversionRow, ParsedTable};
use crate::options::{
    ConversionParameters, CoordinateKind, DataLimits, Datum, HeaderMode, Hemisphere,
    MAX_CLIPBOARD_DECIMALS, OutputFormat, validate_zone,
};
use crate::profile::ConversionProfile;
use crate::projector::{Proj4Projector, Projector};
use crate::table_parse::parse_table;
use crate::warning::ParseWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    DataInput,
    ParsingData,
    ColumnMapping,
    ParameterInput,
    Converting,
    Results,
    Copying,
    Error,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DataInput => "data_input",
            Self::ParsingData => "parsing_data",
            Self::ColumnMapping => "column_mapping",
            Self::ParameterInput => "parameter_input",
            Self::Converting => "converting",
            Self::Results => "results",
            Self::Copying => "copying",
            Self::Error => "error",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PasteData(String),
    RequestParse,
    /// Assigns one role; a column already held by the other role is released.
    AssignColumn {
        role: Role,
        column: Option<usize>,
    },
    MapColumns {
        first: usize,
        second: usize,
    },
    SetZone(i64),
    SetHemisphere(Hemisphere),
    SetSourceDatum(Datum),
    SetTargetDatum(Datum),
    SetOutputFormat(OutputFormat),
    SetClipboardDecimals(usize),
    RequestConvert,
    RequestCopy,
    ClipboardWritten,
    ClipboardFailed(String),
    Reset,
    Retry,
    ClearErrors,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PasteData(_) => "paste_data",
            Self::RequestParse => "request_parse",
            Self::AssignColumn { .. } => "assign_column",
            Self::MapColumns { .. } => "map_columns",
            Self::SetZone(_) => "set_zone",
            Self::SetHemisphere(_) => "set_hemisphere",
            Self::SetSourceDatum(_) => "set_source_datum",
            Self::SetTargetDatum(_) => "set_target_datum",
            Self::SetOutputFormat(_) => "set_output_format",
            Self::SetClipboardDecimals(_) => "set_clipboard_decimals",
            Self::RequestConvert => "request_convert",
            Self::RequestCopy => "request_copy",
            Self::ClipboardWritten => "clipboard_written",
            Self::ClipboardFailed(_) => "clipboard_failed",
            Self::Reset => "reset",
            Self::Retry => "retry",
            Self::ClearErrors => "clear_errors",
        }
    }

    #[must_use]
    pub const fn is_parameter_setter(&self) -> bool {
        matches!(
            self,
            Self::SetZone(_)
                | Self::SetHemisphere(_)
                | Self::SetSourceDatum(_)
                | Self::SetTargetDatum(_)
                | Self::SetOutputFormat(_)
                | Self::SetClipboardDecimals(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub kind: CoordinateKind,
    pub stage: Stage,
    pub raw_input: String,
    pub table: ParsedTable,
    pub mapping: ColumnMapping,
    pub parameters: ConversionParameters,
    pub rows: Vec<ConversionRow>,
    pub errors: Vec<String>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub is_processing: bool,
    pub copy_success: bool,
}

impl WorkflowState {
    #[must_use]
    pub fn new(kind: CoordinateKind) -> Self {
        Self {
            kind,
            stage: Stage::Idle,
            raw_input: String::new(),
            table: ParsedTable::default(),
            mapping: ColumnMapping::default(),
            parameters: ConversionParameters::default(),
            rows: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            total_rows: 0,
            valid_rows: 0,
            is_processing: false,
            copy_success: false,
        }
    }

    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    #[must_use]
    pub fn failed_rows(&self) -> usize {
        self.total_rows.saturating_sub(self.valid_rows)
    }
}

fn reject(event: &Event, reason: impl Into<String>) -> WorkflowError {
    WorkflowError::GuardRejected {
        event: event.name(),
        reason: reason.into(),
    }
}

fn check_column(state: &WorkflowState, column: usize) -> Result<(), String> {
    let count = state.table.column_count();
    if count > 0 && column >= count {
        return Err(format!(
            "column {} does not exist, the table has {count} columns",
            column + 1
        ));
    }
    Ok(())
}

fn guard_map_columns(state: &WorkflowState, first: usize, second: usize) -> Result<(), String> {
    if first == second {
        return Err(format!("both roles point at column {}", first + 1));
    }
    check_column(state, first)?;
    check_column(state, second)
}

fn guard_parameter(event: &Event) -> Result<(), String> {
    match event {
        Event::SetZone(zone) => validate_zone(*zone).map(|_| ()),
        Event::SetClipboardDecimals(decimals) if *decimals > MAX_CLIPBOARD_DECIMALS => Err(format!(
            "clipboard decimals {decimals} exceed the maximum of {MAX_CLIPBOARD_DECIMALS}"
        )),
        _ => Ok(()),
    }
}

fn guard_convert(state: &WorkflowState) -> Result<(), String> {
    let profile = state.kind.profile();
    if !state.mapping.is_complete() {
        return Err(format!(
            "columns for '{}' and '{}' must both be mapped",
            profile.role(Role::First).key,
            profile.role(Role::Second).key
        ));
    }
    profile.check_parameters(&state.parameters)
}

fn retry_target(state: &WorkflowState) -> Stage {
    if !state.table.is_empty() && guard_convert(state).is_ok() {
        Stage::Converting
    } else if !state.raw_input.trim().is_empty() {
        Stage::ParsingData
    } else {
        Stage::Idle
    }
}

/// Decides the next stage for `event` without mutating anything. Transient
/// stages never receive external events; [`Workflow`] leaves them itself.
pub fn transition(
    stage: Stage,
    event: &Event,
    state: &WorkflowState,
) -> Result<Stage, WorkflowError> {
    match (stage, event) {
        (Stage::Copying, Event::ClipboardWritten | Event::ClipboardFailed(_)) => Ok(Stage::Results),
        (Stage::Copying, _) => Err(WorkflowError::Busy),
        (_, Event::Reset) => Ok(Stage::Idle),

        (Stage::Idle | Stage::DataInput, Event::PasteData(_)) => Ok(Stage::DataInput),
        (Stage::DataInput, Event::RequestParse) => Ok(Stage::ParsingData),

        (Stage::ColumnMapping, Event::AssignColumn { column, .. }) => {
            if let Some(column) = column {
                check_column(state, *column).map_err(|reason| reject(event, reason))?;
            }
            Ok(Stage::ColumnMapping)
        }
        (Stage::ColumnMapping, Event::MapColumns { first, second }) => {
            guard_map_columns(state, *first, *second).map_err(|reason| reject(event, reason))?;
            Ok(Stage::ParameterInput)
        }

        (Stage::ParameterInput | Stage::Results, event) if event.is_parameter_setter() => {
            guard_parameter(event).map_err(|reason| reject(event, reason))?;
            Ok(stage)
        }
        (Stage::ParameterInput | Stage::Results, Event::RequestConvert) => {
            guard_convert(state).map_err(|reason| reject(event, reason))?;
            Ok(Stage::Converting)
        }

        (Stage::Results, Event::RequestCopy) => Ok(Stage::Copying),
        (Stage::Results, Event::ClearErrors) => Ok(Stage::Results),

        (Stage::Error, Event::Retry) => Ok(retry_target(state)),
        (Stage::Error, Event::ClearErrors) => Ok(Stage::Idle),

        (stage, event) => Err(WorkflowError::InvalidEvent {
            stage,
            event: event.name(),
        }),
    }
}

/// Owns the workflow state and drives it through [`transition`].
#[derive(Debug)]
pub struct Workflow<P = Proj4Projector> {
    projector: P,
    header_mode: HeaderMode,
    limits: DataLimits,
    state: WorkflowState,
}

impl Workflow {
    #[must_use]
    pub fn new(kind: CoordinateKind) -> Self {
        Self::with_projector(kind, Proj4Projector)
    }
}

impl<P: Projector> Workflow<P> {
    #[must_use]
    pub fn with_projector(kind: CoordinateKind, projector: P) -> Self {
        Self {
            projector,
            header_mode: HeaderMode::default(),
            limits: DataLimits::default(),
            state: WorkflowState::new(kind),
        }
    }

    #[must_use]
    pub fn with_header_mode(mut self, header_mode: HeaderMode) -> Self {
        self.header_mode = header_mode;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: DataLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &WorkflowState {
        &self.state
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.state.stage
    }

    #[must_use]
    pub fn profile(&self) -> &'static ConversionProfile {
        self.state.kind.profile()
    }

    /// Applies `event` and returns the stage the workflow settled in. A
    /// rejected event leaves the state untouched.
    pub fn dispatch(&mut self, event: Event) -> Result<Stage, WorkflowError> {
        let previous = self.state.stage;
        let next = transition(previous, &event, &self.state)?;
        debug!(from = %previous, to = %next, event = event.name(), "workflow transition");

        let reenter = next != previous || event == Event::Reset;
        let copied = matches!(event, Event::ClipboardWritten);
        self.apply_event(event);
        if reenter {
            self.enter(next);
        }
        if copied {
            self.state.copy_success = true;
        }
        Ok(self.state.stage)
    }

    /// Formats the current results and moves to `Copying`. The caller writes
    /// the returned text and reports back with `ClipboardWritten` or
    /// `ClipboardFailed`.
    pub fn request_copy(&mut self) -> Result<String, WorkflowError> {
        if self.state.stage == Stage::Copying {
            return Err(WorkflowError::Busy);
        }
        if self.state.stage != Stage::Results {
            return Err(WorkflowError::InvalidEvent {
                stage: self.state.stage,
                event: Event::RequestCopy.name(),
            });
        }
        let text = self.clipboard_text()?;
        self.dispatch(Event::RequestCopy)?;
        Ok(text)
    }

    /// Runs both copy phases against `sink`; returns whether the write succeeded.
    pub fn copy_to(&mut self, sink: &mut impl ClipboardSink) -> Result<bool, WorkflowError> {
        let text = self.request_copy()?;
        let settle = match sink.write_text(&text) {
            Ok(()) => Event::ClipboardWritten,
            Err(message) => Event::ClipboardFailed(message),
        };
        self.dispatch(settle)?;
        Ok(self.state.copy_success)
    }

    pub fn clipboard_text(&self) -> Result<String, WorkflowError> {
        format_for_clipboard(&self.state.rows, self.profile(), &self.state.parameters)
            .map_err(|error| WorkflowError::Format(error.to_string()))
    }

    fn apply_event(&mut self, event: Event) {
        let state = &mut self.state;
        let params = &mut state.parameters;
        match event {
            Event::PasteData(raw) => {
                state.raw_input = raw;
                state.errors.clear();
            }
            Event::AssignColumn { role, column } => state.mapping.assign(role, column),
            Event::MapColumns { first, second } => {
                state.mapping.assign(Role::First, Some(first));
                state.mapping.assign(Role::Second, Some(second));
            }
            Event::SetZone(zone) => {
                if let Ok(zone) = validate_zone(zone) {
                    params.utm_zone = Some(zone);
                }
            }
            Event::SetHemisphere(hemisphere) => params.hemisphere = Some(hemisphere),
            Event::SetSourceDatum(datum) => params.source_datum = datum,
            Event::SetTargetDatum(datum) => params.target_datum = datum,
            Event::SetOutputFormat(format) => params.output_format = format,
            Event::SetClipboardDecimals(decimals) => params.clipboard_decimals = Some(decimals),
            Event::ClipboardFailed(message) => {
                state.errors.push(format!("clipboard write failed: {message}"));
            }
            Event::ClearErrors => state.errors.clear(),
            Event::RequestParse
            | Event::RequestConvert
            | Event::RequestCopy
            | Event::ClipboardWritten
            | Event::Reset
            | Event::Retry => {}
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.state.stage = stage;
        match stage {
            Stage::Idle => self.state = WorkflowState::new(self.state.kind),
            Stage::ParsingData => self.run_parse(),
            Stage::Converting => self.run_conversion(),
            Stage::Results => self.state.copy_success = false,
            Stage::DataInput
            | Stage::ColumnMapping
            | Stage::ParameterInput
            | Stage::Copying
            | Stage::Error => {}
        }
    }

    fn run_parse(&mut self) {
        self.state.is_processing = true;
        self.state.table = ParsedTable::default();
        self.state.warnings.clear();
        self.state.mapping = ColumnMapping::default();

        let parsed = parse_table(
            &self.state.raw_input,
            self.profile().header_vocabulary,
            self.header_mode,
            &self.limits,
        );
        self.state.is_processing = false;

        match parsed {
            Ok((table, warnings)) => {
                self.state.total_rows = table.rows.len();
                self.state.table = table;
                self.state.warnings = warnings;
                self.settle(Stage::ParsingData, Stage::ColumnMapping);
            }
            Err(error) => {
                self.state.errors.push(error.to_string());
                self.settle(Stage::ParsingData, Stage::Error);
            }
        }
    }

    fn run_conversion(&mut self) {
        self.state.is_processing = true;
        let outcome = convert_rows(
            &self.state.table.rows,
            &self.state.mapping,
            &self.state.parameters,
            self.profile(),
            &self.projector,
        );
        self.state.is_processing = false;

        match outcome {
            Ok(outcome) => {
                self.state.total_rows = outcome.total();
                self.state.valid_rows = outcome.success_count;
                self.state.rows = outcome.rows;
                self.settle(Stage::Converting, Stage::Results);
            }
            Err(error) => {
                self.state.rows.clear();
                self.state.total_rows = self.state.table.rows.len();
                self.state.valid_rows = 0;
                self.state.errors.push(error.to_string());
                self.settle(Stage::Converting, Stage::Error);
            }
        }
    }

    fn settle(&mut self, from: Stage, to: Stage) {
        debug!(from = %from, to = %to, "workflow stage completed");
        self.enter(to);
    }
}

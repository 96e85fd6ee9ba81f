use std::str::FromStr;

use coord_batch::{
    ClipboardSink, ConversionRow, CoordinateKind, DataLimits, Datum, Event, HeaderMode,
    Hemisphere, OutputFormat, Role, Stage, Workflow, transition,
};

use crate::error::ApiError;
use crate::models::{
    ConvertRequest, ConvertResponse, KindDescriptor, KindsResponse, RowResponse, WarningResponse,
};

/// Collects clipboard text destined for an HTTP response body.
#[derive(Debug, Default)]
pub struct ResponseBody(pub String);

impl ClipboardSink for ResponseBody {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        self.0.push_str(text);
        Ok(())
    }
}

fn parse_field<T>(field: &str, value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = String>,
{
    value
        .map(T::from_str)
        .transpose()
        .map_err(|error| ApiError::BadRequest(format!("invalid {field}: {error}")))
}

pub fn parse_header_mode(value: Option<&str>) -> Result<HeaderMode, ApiError> {
    Ok(parse_field("header", value)?.unwrap_or_default())
}

/// Row limit from the `MAX_ROWS` variable; unset keeps the default.
pub fn limits_from_max_rows(value: Option<&str>) -> Result<DataLimits, ApiError> {
    let mut limits = DataLimits::default();
    if let Some(raw) = value {
        limits.max_rows = raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|rows| *rows > 0)
            .ok_or_else(|| ApiError::Internal(format!("invalid MAX_ROWS value '{raw}'")))?;
    }
    Ok(limits)
}

fn request_events(request: &ConvertRequest) -> Result<Vec<Event>, ApiError> {
    let (first, second) = request.columns;
    let mut events = vec![
        Event::PasteData(request.raw.clone()),
        Event::RequestParse,
        Event::MapColumns { first, second },
    ];

    let source_datum: Option<Datum> = parse_field("source_datum", request.source_datum.as_deref())?;
    let target_datum: Option<Datum> = parse_field("target_datum", request.target_datum.as_deref())?;
    let hemisphere: Option<Hemisphere> = parse_field("hemisphere", request.hemisphere.as_deref())?;
    let format: Option<OutputFormat> = parse_field("format", request.format.as_deref())?;

    events.extend(request.zone.map(Event::SetZone));
    events.extend(hemisphere.map(Event::SetHemisphere));
    events.extend(source_datum.map(Event::SetSourceDatum));
    events.extend(target_datum.map(Event::SetTargetDatum));
    events.extend(format.map(Event::SetOutputFormat));
    events.extend(request.decimals.map(Event::SetClipboardDecimals));
    events.push(Event::RequestConvert);
    Ok(events)
}

/// Drives a fresh workflow through every step of `request` and leaves it in `Results`.
pub fn run_workflow(
    request: &ConvertRequest,
    header_mode: HeaderMode,
    limits: DataLimits,
) -> Result<Workflow, ApiError> {
    let kind = CoordinateKind::from_str(&request.kind).map_err(ApiError::BadRequest)?;
    let mut workflow = Workflow::new(kind)
        .with_header_mode(header_mode)
        .with_limits(limits);

    for event in request_events(request)? {
        let working_stage = transition(workflow.stage(), &event, workflow.state())?;
        if workflow.dispatch(event)? == Stage::Error {
            let message = workflow
                .state()
                .first_error()
                .unwrap_or("conversion failed")
                .to_string();
            return Err(stage_error(working_stage, message));
        }
    }
    Ok(workflow)
}

/// Maps a failure of the transient stage the workflow was running to an API error.
pub fn stage_error(failed: Stage, message: String) -> ApiError {
    match failed {
        Stage::ParsingData => ApiError::Parse(message),
        Stage::Converting => ApiError::Validation(message),
        _ => ApiError::Internal(message),
    }
}

fn row_response(index: usize, row: &ConversionRow) -> RowResponse {
    RowResponse {
        row: index + 1,
        original: row.original.clone(),
        source: [row.source.point.x, row.source.point.y],
        converted: row
            .is_ok()
            .then_some([row.converted.point.x, row.converted.point.y]),
        error: row.error.clone(),
    }
}

pub fn convert_response(
    request: &ConvertRequest,
    header_mode: HeaderMode,
    limits: DataLimits,
) -> Result<ConvertResponse, ApiError> {
    let workflow = run_workflow(request, header_mode, limits)?;
    let state = workflow.state();
    Ok(ConvertResponse {
        kind: state.kind.to_string(),
        header: state.table.header.clone(),
        total_rows: state.total_rows,
        valid_rows: state.valid_rows,
        failed_rows: state.failed_rows(),
        rows: state
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| row_response(index, row))
            .collect(),
        warnings: state
            .warnings
            .iter()
            .map(|warning| WarningResponse {
                code: warning.code.as_str().to_string(),
                message: warning.message.clone(),
                row: warning.row,
            })
            .collect(),
    })
}

pub fn clipboard_response(
    request: &ConvertRequest,
    header_mode: HeaderMode,
    limits: DataLimits,
) -> Result<String, ApiError> {
    let mut workflow = run_workflow(request, header_mode, limits)?;
    let mut body = ResponseBody::default();
    if !workflow.copy_to(&mut body)? {
        let message = workflow
            .state()
            .errors
            .last()
            .cloned()
            .unwrap_or_default();
        return Err(ApiError::Internal(message));
    }
    Ok(body.0)
}

pub fn kinds_response() -> KindsResponse {
    let items = CoordinateKind::ALL
        .into_iter()
        .map(|kind| {
            let profile = kind.profile();
            let mut required_parameters = vec!["zone".to_string()];
            if profile.requires_hemisphere {
                required_parameters.push("hemisphere".to_string());
            }
            if profile.requires_distinct_datums {
                required_parameters.push("source_datum != target_datum".to_string());
            }
            KindDescriptor {
                kind: kind.to_string(),
                roles: Role::BOTH
                    .iter()
                    .map(|role| profile.role(*role).key.to_string())
                    .collect(),
                required_parameters,
                clipboard_headers: profile
                    .clipboard_headers(OutputFormat::Decimal)
                    .iter()
                    .map(|header| (*header).to_string())
                    .collect(),
            }
        })
        .collect();
    KindsResponse { items }
}

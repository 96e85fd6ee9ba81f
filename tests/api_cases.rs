use coord_batch::{DataLimits, HeaderMode, Stage};
use coord_batch_worker::convert_pipeline::{
    clipboard_response, convert_response, kinds_response, limits_from_max_rows, parse_header_mode,
    stage_error,
};
use coord_batch_worker::error::ApiError;
use coord_batch_worker::models::{ConvertRequest, ErrorResponse, WarningResponse};
use pretty_assertions::assert_eq;

fn utm_request(raw: &str) -> ConvertRequest {
    ConvertRequest {
        kind: "utm-to-latlong".to_string(),
        raw: raw.to_string(),
        columns: (0, 1),
        zone: Some(18),
        hemisphere: Some("N".to_string()),
        source_datum: None,
        target_datum: None,
        format: None,
        decimals: None,
    }
}

#[test]
fn parses_minimal_request_body() {
    let request: ConvertRequest = serde_json::from_str(
        r#"{"kind":"latlong-to-utm","raw":"-12.0464,-77.0428","columns":[0,1],"zone":18}"#,
    )
    .expect("request should deserialize");

    assert_eq!(request.columns, (0, 1));
    assert_eq!(request.zone, Some(18));
    assert_eq!(request.hemisphere, None);
    assert_eq!(request.decimals, None);
}

#[test]
fn convert_reports_every_row_in_order() {
    let response = convert_response(
        &utm_request("Easting Northing\n500000 4649776\nbad 4649776\n"),
        HeaderMode::AutoDetect,
        DataLimits::default(),
    )
    .expect("conversion should succeed");

    assert_eq!(response.kind, "utm-to-latlong");
    assert_eq!(
        response.header,
        Some(vec!["Easting".to_string(), "Northing".to_string()])
    );
    assert_eq!(
        (response.total_rows, response.valid_rows, response.failed_rows),
        (2, 1, 1)
    );
    assert_eq!(
        response.rows.iter().map(|row| row.row).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(response.rows[0].converted.is_some());
    assert_eq!(response.rows[1].converted, None);
    assert_eq!(
        response.rows[1].error.as_deref(),
        Some("invalid easting value 'bad'")
    );
}

#[test]
fn forced_header_mode_reports_unrecognized_header() {
    let response = convert_response(
        &utm_request("este norte\n500000 4649776\n"),
        HeaderMode::NoHeader,
        DataLimits::default(),
    )
    .expect("conversion should succeed");
    assert_eq!(response.total_rows, 2);
    assert_eq!(response.valid_rows, 1);

    let response = convert_response(
        &utm_request("este norte\n500000 4649776\n"),
        HeaderMode::AutoDetect,
        DataLimits::default(),
    )
    .expect("conversion should succeed");
    assert_eq!(
        response.warnings,
        vec![WarningResponse {
            code: "header_not_recognized".to_string(),
            message: "first row has no numeric cells but matched no header keyword; keeping it as data"
                .to_string(),
            row: Some(1),
        }]
    );
}

#[test]
fn clipboard_endpoint_returns_tab_separated_text() {
    let mut request = utm_request("500000\t4649776");
    request.format = Some("dms".to_string());

    let text = clipboard_response(&request, HeaderMode::AutoDetect, DataLimits::default())
        .expect("clipboard text should render");
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Latitude DMS\tLongitude DMS");
    assert!(lines[1].ends_with("\"N\t75°0'0.00\"W"), "{text}");
}

#[test]
fn guard_failures_map_to_validation_errors() {
    let mut request = utm_request("500000 4649776");
    request.zone = None;
    let error = convert_response(&request, HeaderMode::AutoDetect, DataLimits::default())
        .expect_err("zone is required");
    assert_eq!(
        error.to_error_response(),
        ErrorResponse {
            code: "validation_error".to_string(),
            message: "event 'request_convert' rejected: UTM zone must be set".to_string(),
        }
    );
    assert_eq!(error.status_code(), 422);

    request.zone = Some(61);
    let error = convert_response(&request, HeaderMode::AutoDetect, DataLimits::default())
        .expect_err("zone is out of range");
    assert!(matches!(error, ApiError::Validation(_)));
}

#[test]
fn bad_option_values_are_bad_requests() {
    let mut request = utm_request("500000 4649776");
    request.kind = "mgrs".to_string();
    let error = convert_response(&request, HeaderMode::AutoDetect, DataLimits::default())
        .expect_err("unknown kind");
    assert_eq!(error.status_code(), 400);

    let mut request = utm_request("500000 4649776");
    request.source_datum = Some("NAD27".to_string());
    let error = convert_response(&request, HeaderMode::AutoDetect, DataLimits::default())
        .expect_err("unknown datum");
    assert_eq!(
        error.message(),
        "invalid source_datum: unknown datum 'NAD27', expected WGS84 or PSAD56"
    );

    assert!(parse_header_mode(Some("maybe")).is_err());
    assert_eq!(
        parse_header_mode(None).expect("default header mode"),
        HeaderMode::AutoDetect
    );
}

#[test]
fn row_limit_comes_from_max_rows() {
    let limits = limits_from_max_rows(Some("1")).expect("valid limit");
    assert_eq!(limits.max_rows, 1);
    assert!(limits_from_max_rows(Some("zero")).is_err());
    assert_eq!(
        limits_from_max_rows(None).expect("default limit"),
        DataLimits::default()
    );

    let error = convert_response(
        &utm_request("500000 4649776\n500001 4649776"),
        HeaderMode::AutoDetect,
        limits,
    )
    .expect_err("too many rows");
    assert_eq!(error.code(), "parse_error");
    assert_eq!(error.message(), "too many rows: 2 (maximum 1)");
}

#[test]
fn lists_all_kinds() {
    let kinds = kinds_response();
    let names = kinds
        .items
        .iter()
        .map(|item| item.kind.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["latlong-to-utm", "utm-to-latlong", "utm-datum"]);
    assert_eq!(kinds.items[0].roles, vec!["lat", "lng"]);
    assert_eq!(kinds.items[0].required_parameters, vec!["zone"]);
    assert_eq!(
        kinds.items[2].required_parameters,
        vec!["zone", "hemisphere", "source_datum != target_datum"]
    );
}

#[test]
fn workflow_failures_are_classified_by_stage() {
    let error = stage_error(Stage::ParsingData, "too many rows: 2 (maximum 1)".to_string());
    assert_eq!(error.code(), "parse_error");

    let error = stage_error(
        Stage::Converting,
        "unsupported coordinate systems: invalid UTM zone 61, must be between 1 and 60"
            .to_string(),
    );
    assert_eq!(error.code(), "validation_error");
    assert_eq!(error.status_code(), 422);

    let error = stage_error(Stage::Results, "unexpected".to_string());
    assert_eq!(error.status_code(), 500);
}

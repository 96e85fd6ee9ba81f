use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::dms::{Axis, decimal_to_dms};
use crate::engine::unit_decimals;
use crate::error::ConvertError;
use crate::model::{ConversionRow, Coordinate, CoordinateSystem};
use crate::options::{ConversionParameters, CoordinateKind, OutputFormat};
use crate::profile::ConversionProfile;

pub const ERROR_SENTINEL: &str = "ERROR";

/// Destination for formatted clipboard text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// Adapts any `io::Write` (stdout, a file) into a clipboard sink.
#[derive(Debug)]
pub struct WriterSink<W>(pub W);

impl<W: Write> ClipboardSink for WriterSink<W> {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        self.0
            .write_all(text.as_bytes())
            .and_then(|()| self.0.flush())
            .map_err(|error| error.to_string())
    }
}

fn number(value: f64, decimals: Option<usize>, system: &CoordinateSystem) -> String {
    let precision = decimals.unwrap_or_else(|| unit_decimals(system));
    format!("{value:.precision$}")
}

fn utm_fields(coordinate: &Coordinate) -> [String; 2] {
    match coordinate.system {
        CoordinateSystem::Utm {
            zone, hemisphere, ..
        } => [zone.to_string(), hemisphere.to_string()],
        CoordinateSystem::Geographic { .. } => [String::new(), String::new()],
    }
}

fn record_for(
    row: &ConversionRow,
    kind: CoordinateKind,
    params: &ConversionParameters,
) -> Vec<String> {
    let decimals = params.clipboard_decimals;
    let source = &row.source;
    let converted = &row.converted;
    match kind {
        CoordinateKind::UtmToLatLong => match params.output_format {
            OutputFormat::Decimal => vec![
                number(converted.latitude(), decimals, &converted.system),
                number(converted.longitude(), decimals, &converted.system),
            ],
            OutputFormat::Dms => vec![
                decimal_to_dms(converted.latitude(), Axis::Latitude),
                decimal_to_dms(converted.longitude(), Axis::Longitude),
            ],
        },
        CoordinateKind::LatLongToUtm => {
            let [zone, hemisphere] = utm_fields(converted);
            vec![
                number(source.latitude(), decimals, &source.system),
                number(source.longitude(), decimals, &source.system),
                number(converted.point.x, decimals, &converted.system),
                number(converted.point.y, decimals, &converted.system),
                zone,
                hemisphere,
                converted.system.datum().to_string(),
            ]
        }
        CoordinateKind::UtmDatum => {
            let [zone, hemisphere] = utm_fields(source);
            vec![
                number(source.point.x, decimals, &source.system),
                number(source.point.y, decimals, &source.system),
                zone,
                hemisphere,
                source.system.datum().to_string(),
                number(converted.point.x, decimals, &converted.system),
                number(converted.point.y, decimals, &converted.system),
                converted.system.datum().to_string(),
            ]
        }
    }
}

/// Renders converted rows as tab-separated text: one header line, then one
/// line per row. Failed rows become `ERROR` in every column.
pub fn format_for_clipboard(
    rows: &[ConversionRow],
    profile: &ConversionProfile,
    params: &ConversionParameters,
) -> Result<String, ConvertError> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let headers = profile.clipboard_headers(params.output_format);
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::<u8>::new());
    writer.write_record(headers)?;
    for row in rows {
        if row.is_ok() {
            writer.write_record(record_for(row, profile.kind, params))?;
        } else {
            writer.write_record(vec![ERROR_SENTINEL; headers.len()])?;
        }
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ConvertError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes).map_err(|error| {
        ConvertError::InvalidOutput(format!("invalid utf-8 clipboard text: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{ClipboardSink, WriterSink, format_for_clipboard};
    use crate::error::ConvertError;
    use crate::model::{Coordinate, CoordinateSystem, ConversionRow, Point};
    use crate::options::{ConversionParameters, CoordinateKind, Datum, Hemisphere, OutputFormat};

    const GEO: CoordinateSystem = CoordinateSystem::Geographic {
        datum: Datum::Wgs84,
    };

    fn utm(datum: Datum) -> CoordinateSystem {
        CoordinateSystem::Utm {
            zone: 18,
            hemisphere: Hemisphere::South,
            datum,
        }
    }

    fn ok_row(source: Coordinate, converted: Coordinate) -> ConversionRow {
        ConversionRow {
            original: vec![],
            source,
            converted,
            error: None,
        }
    }

    fn failed_row(source: CoordinateSystem, target: CoordinateSystem) -> ConversionRow {
        ConversionRow {
            original: vec!["bad".to_string()],
            source: Coordinate::placeholder(source),
            converted: Coordinate::placeholder(target),
            error: Some("invalid easting value 'bad'".to_string()),
        }
    }

    #[test]
    fn empty_batch_formats_to_empty_string() {
        let text = format_for_clipboard(
            &[],
            CoordinateKind::UtmDatum.profile(),
            &ConversionParameters::default(),
        )
        .expect("empty batch should format");
        assert_eq!(text, "");
    }

    #[test]
    fn formats_decimal_and_dms_latlong() {
        let rows = vec![
            ok_row(
                Coordinate::new(Point::new(500_000.0, 9_000_000.0), utm(Datum::Wgs84)),
                Coordinate::new(Point::new(-75.0, -9.04), GEO),
            ),
            failed_row(utm(Datum::Wgs84), GEO),
        ];
        let profile = CoordinateKind::UtmToLatLong.profile();

        let text = format_for_clipboard(&rows, profile, &ConversionParameters::default())
            .expect("rows should format");
        assert_eq!(
            text,
            "Latitude\tLongitude\n-9.04000000\t-75.00000000\nERROR\tERROR\n"
        );

        let params = ConversionParameters {
            output_format: OutputFormat::Dms,
            ..ConversionParameters::default()
        };
        let text = format_for_clipboard(&rows, profile, &params).expect("rows should format");
        assert_eq!(
            text,
            "Latitude DMS\tLongitude DMS\n9°2'24.00\"S\t75°0'0.00\"W\nERROR\tERROR\n"
        );
    }

    #[test]
    fn formats_datum_shift_with_custom_decimals() {
        let rows = vec![ok_row(
            Coordinate::new(Point::new(500_000.0, 9_000_000.0), utm(Datum::Wgs84)),
            Coordinate::new(Point::new(500_251.37, 9_000_372.1), utm(Datum::Psad56)),
        )];
        let params = ConversionParameters {
            clipboard_decimals: Some(1),
            ..ConversionParameters::default()
        };

        let text = format_for_clipboard(&rows, CoordinateKind::UtmDatum.profile(), &params)
            .expect("rows should format");
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "500000.0\t9000000.0\t18\tS\tWGS84\t500251.4\t9000372.1\tPSAD56"
        );
    }

    #[test]
    fn latlong_to_utm_layout_repeats_sentinel_across_columns() {
        let rows = vec![
            ok_row(
                Coordinate::new(Point::new(-77.0428, -12.0464), GEO),
                Coordinate::new(Point::new(279_020.55, 8_667_305.27), utm(Datum::Wgs84)),
            ),
            failed_row(GEO, utm(Datum::Wgs84)),
        ];
        let text = format_for_clipboard(
            &rows,
            CoordinateKind::LatLongToUtm.profile(),
            &ConversionParameters::default(),
        )
        .expect("rows should format");
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "Latitude\tLongitude\tX UTM\tY UTM\tUTM Zone\tHemisphere\tDatum"
        );
        assert_eq!(
            lines[1],
            "-12.04640000\t-77.04280000\t279020.55\t8667305.27\t18\tS\tWGS84"
        );
        assert_eq!(lines[2], vec!["ERROR"; 7].join("\t"));
    }

    #[test]
    fn flush_failures_surface_as_io_errors() {
        let error = ConvertError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(error, ConvertError::Io(_)));
        assert_eq!(error.to_string(), "I/O error: closed");
    }

    #[test]
    fn writer_sink_collects_text() {
        let mut sink = WriterSink(Vec::<u8>::new());
        sink.write_text("a\tb\n").expect("vec writes cannot fail");
        assert_eq!(sink.0, b"a\tb\n");
    }
}

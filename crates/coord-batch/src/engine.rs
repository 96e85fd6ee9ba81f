use tracing::{debug, info};

use crate::error::ConvertError;
use crate::mapping::{ColumnMapping, Role};
use crate::model::{BatchOutcome, Coordinate, CoordinateSystem, ConversionRow, Point};
use crate::options::ConversionParameters;
use crate::profile::ConversionProfile;
use crate::projector::Projector;

pub const PROJECTED_DECIMALS: usize = 2;
pub const GEOGRAPHIC_DECIMALS: usize = 8;

#[must_use]
pub const fn unit_decimals(system: &CoordinateSystem) -> usize {
    if system.is_geographic() {
        GEOGRAPHIC_DECIMALS
    } else {
        PROJECTED_DECIMALS
    }
}

#[must_use]
pub fn round_to(value: f64, decimals: usize) -> f64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn round_for_system(point: Point, system: &CoordinateSystem) -> Point {
    let decimals = unit_decimals(system);
    Point::new(round_to(point.x, decimals), round_to(point.y, decimals))
}

fn read_value(
    row: &[String],
    column: usize,
    role: Role,
    profile: &ConversionProfile,
) -> Result<f64, String> {
    let label = profile.role(role).label;
    let cell = row
        .get(column)
        .ok_or_else(|| format!("missing {label} value in column {}", column + 1))?;
    cell.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {label} value '{cell}'"))
}

struct BatchContext<'a, P: ?Sized> {
    columns: (usize, usize),
    params: &'a ConversionParameters,
    profile: &'a ConversionProfile,
    projector: &'a P,
    source_system: CoordinateSystem,
}

impl<P: Projector + ?Sized> BatchContext<'_, P> {
    fn convert_row(&self, row: &[String]) -> ConversionRow {
        let source_placeholder = Coordinate::placeholder(self.source_system);
        let failed = |source: Coordinate, target: CoordinateSystem, error: String| ConversionRow {
            original: row.to_vec(),
            source,
            converted: Coordinate::placeholder(target),
            error: Some(error),
        };

        let values = read_value(row, self.columns.0, Role::First, self.profile).and_then(
            |first| {
                read_value(row, self.columns.1, Role::Second, self.profile)
                    .map(|second| (first, second))
            },
        );
        let (first, second) = match values {
            Ok(values) => values,
            Err(error) => {
                let target = self
                    .profile
                    .target_system(self.params, None)
                    .unwrap_or(self.source_system);
                return failed(source_placeholder, target, error);
            }
        };

        let point = self.profile.point_from_values(first, second);
        let source = Coordinate::new(point, self.source_system);
        let target = match self.profile.target_system(self.params, Some(point)) {
            Ok(target) => target,
            Err(error) => return failed(source, self.source_system, error.to_string()),
        };

        match self.projector.project(point, &self.source_system, &target) {
            Ok(projected) => ConversionRow {
                original: row.to_vec(),
                source,
                converted: Coordinate::new(round_for_system(projected, &target), target),
                error: None,
            },
            Err(error) => failed(source, target, error.to_string()),
        }
    }
}

/// Converts every row in order. A bad row is recorded and skipped; only
/// missing preconditions or unusable coordinate systems fail the batch.
pub fn convert_rows<P: Projector + ?Sized>(
    rows: &[Vec<String>],
    mapping: &ColumnMapping,
    params: &ConversionParameters,
    profile: &ConversionProfile,
    projector: &P,
) -> Result<BatchOutcome, ConvertError> {
    let first = mapping
        .get(Role::First)
        .ok_or(ConvertError::UnmappedColumn(profile.role(Role::First).key))?;
    let second = mapping
        .get(Role::Second)
        .ok_or(ConvertError::UnmappedColumn(profile.role(Role::Second).key))?;

    let source_system = profile.source_system(params)?;
    let batch_target = profile.target_system(params, None)?;
    projector.check_systems(&source_system, &batch_target)?;

    let context = BatchContext {
        columns: (first, second),
        params,
        profile,
        projector,
        source_system,
    };

    let mut outcome = BatchOutcome::default();
    for (index, row) in rows.iter().enumerate() {
        let converted = context.convert_row(row);
        match &converted.error {
            None => outcome.success_count += 1,
            Some(error) => debug!(row = index + 1, %error, "row conversion failed"),
        }
        outcome.rows.push(converted);
    }

    info!(
        kind = %profile.kind,
        total = outcome.total(),
        converted = outcome.success_count,
        "batch conversion finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{convert_rows, round_to};
    use crate::error::{ConvertError, ProjectionError};
    use crate::mapping::ColumnMapping;
    use crate::model::{CoordinateSystem, Point};
    use crate::options::{ConversionParameters, CoordinateKind, Hemisphere};
    use crate::projector::Projector;

    /// Shifts every point by a fixed offset and counts calls.
    struct OffsetProjector {
        calls: Cell<usize>,
    }

    impl Projector for OffsetProjector {
        fn project(
            &self,
            point: Point,
            _source: &CoordinateSystem,
            target: &CoordinateSystem,
        ) -> Result<Point, ProjectionError> {
            self.calls.set(self.calls.get() + 1);
            if point.x < 0.0 {
                return Err(ProjectionError::Transform("negative easting".to_string()));
            }
            if target.is_geographic() {
                Ok(Point::new(-75.123_456_789_1, 42.987_654_321_9))
            } else {
                Ok(Point::new(point.x + 0.0042, point.y + 0.0061))
            }
        }
    }

    fn grid(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    fn utm_params() -> ConversionParameters {
        ConversionParameters {
            utm_zone: Some(18),
            hemisphere: Some(Hemisphere::North),
            ..ConversionParameters::default()
        }
    }

    #[test]
    fn keeps_order_and_counts_failures() {
        let projector = OffsetProjector {
            calls: Cell::new(0),
        };
        let rows = grid(&[
            &["1", "500000", "4649776"],
            &["2", "abc", "4649776"],
            &["3", "-1", "10"],
            &["4", "700000"],
            &["5", "700000", "9300000"],
        ]);
        let mapping = ColumnMapping::pair(1, 2).expect("distinct columns");

        let outcome = convert_rows(
            &rows,
            &mapping,
            &utm_params(),
            CoordinateKind::UtmDatum.profile(),
            &projector,
        )
        .expect("batch should run");

        assert_eq!(outcome.total(), 5);
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.success_count + outcome.failed_count(), outcome.total());
        let ids = outcome
            .rows
            .iter()
            .map(|row| row.original[0].as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        assert_eq!(
            outcome.rows[1].error.as_deref(),
            Some("invalid easting value 'abc'")
        );
        assert_eq!(outcome.rows[1].converted.point, Point::new(0.0, 0.0));
        assert_eq!(
            outcome.rows[2].error.as_deref(),
            Some("transformation failed: negative easting")
        );
        assert_eq!(
            outcome.rows[3].error.as_deref(),
            Some("missing northing value in column 3")
        );
        // Rows 2 and 4 never reach the projector.
        assert_eq!(projector.calls.get(), 3);
    }

    #[test]
    fn rounds_to_unit_precision() {
        let projector = OffsetProjector {
            calls: Cell::new(0),
        };
        let mapping = ColumnMapping::pair(0, 1).expect("distinct columns");

        let outcome = convert_rows(
            &grid(&[&["500000.001", "100.001"]]),
            &mapping,
            &utm_params(),
            CoordinateKind::UtmDatum.profile(),
            &projector,
        )
        .expect("batch should run");
        assert_eq!(outcome.rows[0].converted.point, Point::new(500_000.01, 100.01));

        let outcome = convert_rows(
            &grid(&[&["500000", "4649776"]]),
            &mapping,
            &utm_params(),
            CoordinateKind::UtmToLatLong.profile(),
            &projector,
        )
        .expect("batch should run");
        assert_eq!(
            outcome.rows[0].converted.point,
            Point::new(-75.123_456_79, 42.987_654_32)
        );
    }

    #[test]
    fn missing_preconditions_fail_the_batch() {
        let projector = OffsetProjector {
            calls: Cell::new(0),
        };
        let rows = grid(&[&["1", "2"]]);

        let err = convert_rows(
            &rows,
            &ColumnMapping::default(),
            &utm_params(),
            CoordinateKind::UtmDatum.profile(),
            &projector,
        )
        .expect_err("unmapped columns");
        assert!(matches!(err, ConvertError::UnmappedColumn("x")));

        let err = convert_rows(
            &rows,
            &ColumnMapping::pair(0, 1).expect("distinct columns"),
            &ConversionParameters::default(),
            CoordinateKind::UtmToLatLong.profile(),
            &projector,
        )
        .expect_err("zone missing");
        assert!(matches!(err, ConvertError::MissingParameter("utm_zone")));
    }

    #[test]
    fn rounding_helper() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(-75.123_456_789, 8), -75.123_456_79);
    }
}

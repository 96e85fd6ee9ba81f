use proj4rs::Proj;

use crate::error::ProjectionError;
use crate::model::{CoordinateSystem, Point};
use crate::options::{
    Datum, Hemisphere, MAX_UTM_COORDINATE, MAX_UTM_ZONE, MIN_UTM_COORDINATE, MIN_UTM_ZONE,
};

/// Converts a single point between coordinate systems.
pub trait Projector {
    fn project(
        &self,
        point: Point,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<Point, ProjectionError>;

    /// Checked once per batch, before any row is projected.
    fn check_systems(
        &self,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<(), ProjectionError> {
        validate_system(source)?;
        validate_system(target)
    }
}

impl<P: Projector + ?Sized> Projector for &P {
    fn project(
        &self,
        point: Point,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<Point, ProjectionError> {
        (**self).project(point, source, target)
    }

    fn check_systems(
        &self,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<(), ProjectionError> {
        (**self).check_systems(source, target)
    }
}

fn datum_definition(datum: Datum) -> &'static str {
    match datum {
        Datum::Wgs84 => "+datum=WGS84",
        // International 1924 ellipsoid, 3-parameter shift to WGS84.
        Datum::Psad56 => "+ellps=intl +towgs84=-288,175,-376,0,0,0,0",
    }
}

pub fn validate_system(system: &CoordinateSystem) -> Result<(), ProjectionError> {
    match system {
        CoordinateSystem::Utm { zone, .. } if !(MIN_UTM_ZONE..=MAX_UTM_ZONE).contains(zone) => {
            Err(ProjectionError::InvalidZone(*zone))
        }
        _ => Ok(()),
    }
}

fn validate_geographic(point: Point) -> Result<(), ProjectionError> {
    if !(-90.0..=90.0).contains(&point.y) {
        return Err(ProjectionError::LatitudeOutOfRange(point.y));
    }
    if !(-180.0..=180.0).contains(&point.x) {
        return Err(ProjectionError::LongitudeOutOfRange(point.x));
    }
    Ok(())
}

fn validate_utm(point: Point) -> Result<(), ProjectionError> {
    let range = MIN_UTM_COORDINATE..=MAX_UTM_COORDINATE;
    if range.contains(&point.x) && range.contains(&point.y) {
        return Ok(());
    }
    Err(ProjectionError::UtmOutOfRange {
        x: point.x,
        y: point.y,
        min: MIN_UTM_COORDINATE,
        max: MAX_UTM_COORDINATE,
    })
}

/// proj4 definition string for a coordinate system.
pub fn proj_definition(system: &CoordinateSystem) -> Result<String, ProjectionError> {
    validate_system(system)?;
    let definition = match system {
        CoordinateSystem::Geographic { datum } => {
            format!("+proj=longlat {} +no_defs", datum_definition(*datum))
        }
        CoordinateSystem::Utm {
            zone,
            hemisphere,
            datum,
        } => {
            let south = if *hemisphere == Hemisphere::South {
                " +south"
            } else {
                ""
            };
            format!(
                "+proj=utm +zone={zone}{south} {} +units=m +no_defs",
                datum_definition(*datum)
            )
        }
    };
    Ok(definition)
}

fn build_proj(system: &CoordinateSystem) -> Result<Proj, ProjectionError> {
    let definition = proj_definition(system)?;
    Proj::from_proj_string(&definition).map_err(|error| ProjectionError::Definition {
        definition,
        message: error.to_string(),
    })
}

/// Projector backed by `proj4rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proj4Projector;

impl Projector for Proj4Projector {
    fn project(
        &self,
        point: Point,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<Point, ProjectionError> {
        if !point.is_finite() {
            return Err(ProjectionError::NonFiniteInput {
                x: point.x,
                y: point.y,
            });
        }
        validate_system(source)?;
        validate_system(target)?;
        if source.is_geographic() {
            validate_geographic(point)?;
        } else {
            validate_utm(point)?;
        }

        if source == target {
            return Ok(point);
        }

        let from = build_proj(source)?;
        let to = build_proj(target)?;

        let mut xyz = if source.is_geographic() {
            (point.x.to_radians(), point.y.to_radians(), 0.0)
        } else {
            (point.x, point.y, 0.0)
        };
        proj4rs::transform::transform(&from, &to, &mut xyz)
            .map_err(|error| ProjectionError::Transform(error.to_string()))?;

        let projected = if target.is_geographic() {
            Point::new(xyz.0.to_degrees(), xyz.1.to_degrees())
        } else {
            Point::new(xyz.0, xyz.1)
        };

        if !projected.is_finite() {
            return Err(ProjectionError::NonFiniteResult);
        }
        if target.is_geographic() {
            validate_geographic(projected)?;
        }
        Ok(projected)
    }

    fn check_systems(
        &self,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<(), ProjectionError> {
        build_proj(source)?;
        build_proj(target)?;
        Ok(())
    }
}

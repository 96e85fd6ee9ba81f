//! Per-kind conversion strategy: which roles a row carries, which
//! parameters must be configured, how headers are recognized and how the
//! clipboard table is laid out.

use crate::error::ConvertError;
use crate::mapping::Role;
use crate::model::{CoordinateSystem, Point};
use crate::options::{ConversionParameters, CoordinateKind, Hemisphere, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRole {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ConversionProfile {
    pub kind: CoordinateKind,
    pub roles: [ColumnRole; 2],
    pub header_vocabulary: &'static [&'static str],
    pub requires_hemisphere: bool,
    pub requires_distinct_datums: bool,
}

const UTM_VOCABULARY: &[&str] = &["x", "y", "easting", "northing", "coord", "utm"];

static LATLONG_TO_UTM: ConversionProfile = ConversionProfile {
    kind: CoordinateKind::LatLongToUtm,
    roles: [
        ColumnRole {
            key: "lat",
            label: "latitude",
        },
        ColumnRole {
            key: "lng",
            label: "longitude",
        },
    ],
    header_vocabulary: &[
        "lat",
        "lng",
        "long",
        "latitude",
        "longitude",
        "coord",
        "x",
        "y",
    ],
    requires_hemisphere: false,
    requires_distinct_datums: false,
};

static UTM_TO_LATLONG: ConversionProfile = ConversionProfile {
    kind: CoordinateKind::UtmToLatLong,
    roles: [
        ColumnRole {
            key: "x",
            label: "easting",
        },
        ColumnRole {
            key: "y",
            label: "northing",
        },
    ],
    header_vocabulary: UTM_VOCABULARY,
    requires_hemisphere: true,
    requires_distinct_datums: false,
};

static UTM_DATUM: ConversionProfile = ConversionProfile {
    kind: CoordinateKind::UtmDatum,
    roles: [
        ColumnRole {
            key: "x",
            label: "easting",
        },
        ColumnRole {
            key: "y",
            label: "northing",
        },
    ],
    header_vocabulary: UTM_VOCABULARY,
    requires_hemisphere: true,
    requires_distinct_datums: true,
};

impl CoordinateKind {
    #[must_use]
    pub fn profile(self) -> &'static ConversionProfile {
        match self {
            Self::LatLongToUtm => &LATLONG_TO_UTM,
            Self::UtmToLatLong => &UTM_TO_LATLONG,
            Self::UtmDatum => &UTM_DATUM,
        }
    }
}

impl ConversionProfile {
    #[must_use]
    pub const fn role(&self, role: Role) -> &ColumnRole {
        &self.roles[role.index()]
    }

    #[must_use]
    pub fn role_for_key(&self, key: &str) -> Option<Role> {
        let key = key.trim().to_ascii_lowercase();
        Role::BOTH
            .into_iter()
            .find(|role| self.role(*role).key == key || self.role(*role).label == key)
    }

    /// Guard used before a conversion may start.
    pub fn check_parameters(&self, params: &ConversionParameters) -> Result<(), String> {
        if params.utm_zone.is_none() {
            return Err("UTM zone must be set".to_string());
        }
        if self.requires_hemisphere && params.hemisphere.is_none() {
            return Err("hemisphere must be set".to_string());
        }
        if self.requires_distinct_datums && params.source_datum == params.target_datum {
            return Err(format!(
                "source and target datum are both {}",
                params.source_datum
            ));
        }
        Ok(())
    }

    pub fn source_system(
        &self,
        params: &ConversionParameters,
    ) -> Result<CoordinateSystem, ConvertError> {
        match self.kind {
            CoordinateKind::LatLongToUtm => Ok(CoordinateSystem::Geographic {
                datum: params.source_datum,
            }),
            CoordinateKind::UtmToLatLong | CoordinateKind::UtmDatum => Ok(CoordinateSystem::Utm {
                zone: required_zone(params)?,
                hemisphere: required_hemisphere(params)?,
                datum: params.source_datum,
            }),
        }
    }

    /// Target system for a row. Geographic input without a configured
    /// hemisphere takes it from the sign of the row's latitude.
    pub fn target_system(
        &self,
        params: &ConversionParameters,
        source: Option<Point>,
    ) -> Result<CoordinateSystem, ConvertError> {
        match self.kind {
            CoordinateKind::LatLongToUtm => Ok(CoordinateSystem::Utm {
                zone: required_zone(params)?,
                hemisphere: params
                    .hemisphere
                    .or_else(|| source.map(|point| Hemisphere::from_latitude(point.y)))
                    .unwrap_or(Hemisphere::North),
                datum: params.target_datum,
            }),
            CoordinateKind::UtmToLatLong => Ok(CoordinateSystem::Geographic {
                datum: params.target_datum,
            }),
            CoordinateKind::UtmDatum => Ok(CoordinateSystem::Utm {
                zone: required_zone(params)?,
                hemisphere: required_hemisphere(params)?,
                datum: params.target_datum,
            }),
        }
    }

    /// Orders the two mapped cell values as `x`/`y`.
    #[must_use]
    pub fn point_from_values(&self, first: f64, second: f64) -> Point {
        match self.kind {
            CoordinateKind::LatLongToUtm => Point::new(second, first),
            CoordinateKind::UtmToLatLong | CoordinateKind::UtmDatum => Point::new(first, second),
        }
    }

    #[must_use]
    pub fn clipboard_headers(&self, format: OutputFormat) -> &'static [&'static str] {
        match (self.kind, format) {
            (CoordinateKind::UtmToLatLong, OutputFormat::Decimal) => &["Latitude", "Longitude"],
            (CoordinateKind::UtmToLatLong, OutputFormat::Dms) => {
                &["Latitude DMS", "Longitude DMS"]
            }
            (CoordinateKind::LatLongToUtm, _) => &[
                "Latitude",
                "Longitude",
                "X UTM",
                "Y UTM",
                "UTM Zone",
                "Hemisphere",
                "Datum",
            ],
            (CoordinateKind::UtmDatum, _) => &[
                "X UTM Original",
                "Y UTM Original",
                "UTM Zone",
                "Hemisphere",
                "Source Datum",
                "X UTM Converted",
                "Y UTM Converted",
                "Target Datum",
            ],
        }
    }
}

fn required_zone(params: &ConversionParameters) -> Result<u8, ConvertError> {
    params
        .utm_zone
        .ok_or(ConvertError::MissingParameter("utm_zone"))
}

fn required_hemisphere(params: &ConversionParameters) -> Result<Hemisphere, ConvertError> {
    params
        .hemisphere
        .ok_or(ConvertError::MissingParameter("hemisphere"))
}

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

pub const MIN_UTM_ZONE: u8 = 1;
pub const MAX_UTM_ZONE: u8 = 60;

/// Bounds accepted for UTM eastings and northings, in meters.
pub const MIN_UTM_COORDINATE: f64 = -1_000_000.0;
pub const MAX_UTM_COORDINATE: f64 = 10_000_000.0;

/// Upper bound for clipboard decimals; f64 carries no more than this.
pub const MAX_CLIPBOARD_DECIMALS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateKind {
    LatLongToUtm,
    UtmToLatLong,
    UtmDatum,
}

impl CoordinateKind {
    pub const ALL: [Self; 3] = [Self::LatLongToUtm, Self::UtmToLatLong, Self::UtmDatum];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LatLongToUtm => "latlong-to-utm",
            Self::UtmToLatLong => "utm-to-latlong",
            Self::UtmDatum => "utm-datum",
        }
    }
}

impl Display for CoordinateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "latlong-to-utm" | "latlng-to-utm" | "geo-to-utm" => Ok(Self::LatLongToUtm),
            "utm-to-latlong" | "utm-to-latlng" | "utm-to-geo" => Ok(Self::UtmToLatLong),
            "utm-datum" | "utm-to-utm" | "datum" => Ok(Self::UtmDatum),
            other => Err(format!(
                "unknown coordinate kind '{other}', expected latlong-to-utm, utm-to-latlong or utm-datum"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datum {
    Wgs84,
    Psad56,
}

impl Datum {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wgs84 => "WGS84",
            Self::Psad56 => "PSAD56",
        }
    }
}

impl Display for Datum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Datum {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "WGS84" => Ok(Self::Wgs84),
            "PSAD56" => Ok(Self::Psad56),
            _ => Err(format!(
                "unknown datum '{}', expected WGS84 or PSAD56",
                value.trim()
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    #[must_use]
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude >= 0.0 { Self::North } else { Self::South }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Hemisphere {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(Self::North),
            "S" | "SOUTH" => Ok(Self::South),
            _ => Err(format!(
                "invalid hemisphere '{}', expected N or S",
                value.trim()
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Decimal,
    Dms,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::Dms => "dms",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "decimal" | "dd" => Ok(Self::Decimal),
            "dms" => Ok(Self::Dms),
            other => Err(format!(
                "unknown output format '{other}', expected decimal or dms"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    #[default]
    AutoDetect,
    HasHeader,
    NoHeader,
}

impl FromStr for HeaderMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" | "auto-detect" => Ok(Self::AutoDetect),
            "yes" | "true" | "has-header" => Ok(Self::HasHeader),
            "no" | "false" | "no-header" => Ok(Self::NoHeader),
            other => Err(format!(
                "invalid header mode '{other}', expected auto, yes or no"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLimits {
    pub max_rows: usize,
    pub max_columns: usize,
    pub max_cell_length: usize,
}

impl Default for DataLimits {
    fn default() -> Self {
        Self {
            max_rows: 10_000,
            max_columns: 50,
            max_cell_length: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionParameters {
    pub utm_zone: Option<u8>,
    pub hemisphere: Option<Hemisphere>,
    pub source_datum: Datum,
    pub target_datum: Datum,
    pub output_format: OutputFormat,
    /// `None` falls back to the unit default (2 for meters, 8 for degrees).
    pub clipboard_decimals: Option<usize>,
}

impl Default for ConversionParameters {
    fn default() -> Self {
        Self {
            utm_zone: None,
            hemisphere: None,
            source_datum: Datum::Wgs84,
            target_datum: Datum::Wgs84,
            output_format: OutputFormat::Decimal,
            clipboard_decimals: None,
        }
    }
}

/// Validates a user supplied zone number and narrows it.
pub fn validate_zone(zone: i64) -> Result<u8, String> {
    u8::try_from(zone)
        .ok()
        .filter(|zone| (MIN_UTM_ZONE..=MAX_UTM_ZONE).contains(zone))
        .ok_or_else(|| {
            format!("invalid UTM zone {zone}, must be between {MIN_UTM_ZONE} and {MAX_UTM_ZONE}")
        })
}

#[cfg(test)]
mod tests {
    use super::{CoordinateKind, Datum, HeaderMode, Hemisphere, OutputFormat, validate_zone};
    use std::str::FromStr;

    #[test]
    fn parses_kind_aliases() {
        assert_eq!(
            CoordinateKind::from_str("UTM_to_LatLong").expect("kind should parse"),
            CoordinateKind::UtmToLatLong
        );
        assert_eq!(
            CoordinateKind::from_str("utm-to-utm").expect("kind should parse"),
            CoordinateKind::UtmDatum
        );
        let err = CoordinateKind::from_str("mgrs").expect_err("unknown kind should fail");
        assert!(err.contains("unknown coordinate kind"));
    }

    #[test]
    fn parses_datums_loosely() {
        assert_eq!(Datum::from_str("wgs 84"), Ok(Datum::Wgs84));
        assert_eq!(Datum::from_str("psad-56"), Ok(Datum::Psad56));
        assert!(Datum::from_str("NAD27").is_err());
    }

    #[test]
    fn hemisphere_follows_latitude_sign() {
        assert_eq!(Hemisphere::from_latitude(0.0), Hemisphere::North);
        assert_eq!(Hemisphere::from_latitude(-12.5), Hemisphere::South);
        assert_eq!(Hemisphere::from_str("south"), Ok(Hemisphere::South));
        assert!(Hemisphere::from_str("E").is_err());
    }

    #[test]
    fn parses_format_and_header_mode() {
        assert_eq!(OutputFormat::from_str("DMS"), Ok(OutputFormat::Dms));
        assert_eq!(HeaderMode::from_str("no"), Ok(HeaderMode::NoHeader));
        assert_eq!(HeaderMode::from_str("auto"), Ok(HeaderMode::AutoDetect));
    }

    #[test]
    fn zone_bounds_are_inclusive() {
        assert_eq!(validate_zone(1), Ok(1));
        assert_eq!(validate_zone(60), Ok(60));
        assert!(validate_zone(0).is_err());
        assert!(validate_zone(61).is_err());
        assert!(validate_zone(-3).is_err());
    }
}

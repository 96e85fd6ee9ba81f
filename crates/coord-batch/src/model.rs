use crate::options::{Datum, Hemisphere};

/// Planar or angular position. `x` is easting or longitude, `y` is northing or latitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    Geographic {
        datum: Datum,
    },
    Utm {
        zone: u8,
        hemisphere: Hemisphere,
        datum: Datum,
    },
}

impl CoordinateSystem {
    #[must_use]
    pub const fn is_geographic(self) -> bool {
        matches!(self, Self::Geographic { .. })
    }

    #[must_use]
    pub const fn datum(self) -> Datum {
        match self {
            Self::Geographic { datum } | Self::Utm { datum, .. } => datum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub point: Point,
    pub system: CoordinateSystem,
}

impl Coordinate {
    #[must_use]
    pub const fn new(point: Point, system: CoordinateSystem) -> Self {
        Self { point, system }
    }

    /// Zero-valued stand-in carried by failed rows.
    #[must_use]
    pub const fn placeholder(system: CoordinateSystem) -> Self {
        Self {
            point: Point::new(0.0, 0.0),
            system,
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.point.y
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.point.x
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRow {
    pub original: Vec<String>,
    pub source: Coordinate,
    pub converted: Coordinate,
    pub error: Option<String>,
}

impl ConversionRow {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    pub rows: Vec<ConversionRow>,
    pub success_count: usize,
}

impl BatchOutcome {
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_ok()).count()
    }
}

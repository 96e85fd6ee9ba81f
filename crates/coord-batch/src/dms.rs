#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Formats signed decimal degrees as `D°M'S.ss"H`.
#[must_use]
pub fn decimal_to_dms(decimal: f64, axis: Axis) -> String {
    let direction = match (axis, decimal >= 0.0) {
        (Axis::Latitude, true) => 'N',
        (Axis::Latitude, false) => 'S',
        (Axis::Longitude, true) => 'E',
        (Axis::Longitude, false) => 'W',
    };

    // Round once in hundredths of a second so 59.999" carries into the minutes.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = (decimal.abs() * 360_000.0).round() as u64;
    let degrees = total / 360_000;
    let minutes = (total % 360_000) / 6_000;
    let hundredths = total % 6_000;

    format!(
        "{degrees}°{minutes}'{}.{:02}\"{direction}",
        hundredths / 100,
        hundredths % 100
    )
}

#[cfg(test)]
mod tests {
    use super::{Axis, decimal_to_dms};

    #[test]
    fn formats_latitude_and_longitude() {
        assert_eq!(decimal_to_dms(42.0, Axis::Latitude), "42°0'0.00\"N");
        assert_eq!(decimal_to_dms(-12.0464, Axis::Latitude), "12°2'47.04\"S");
        assert_eq!(decimal_to_dms(-77.0428, Axis::Longitude), "77°2'34.08\"W");
        assert_eq!(decimal_to_dms(0.5, Axis::Longitude), "0°30'0.00\"E");
    }

    #[test]
    fn carries_rounded_seconds() {
        assert_eq!(
            decimal_to_dms(10.999_999_9, Axis::Latitude),
            "11°0'0.00\"N"
        );
    }
}

use salah::prelude::{Coordinates, Qiblah};

use crate::config::settings::LocationConfig;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Great-circle direction to the Kaaba, in degrees clockwise from true North.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QiblaBearing(f64);

impl QiblaBearing {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Qiblah::new(Coordinates::new(latitude, longitude)).value())
    }

    pub fn from_location(loc: &LocationConfig) -> Self {
        Self::new(loc.latitude, loc.longitude)
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Nearest of the 16 compass points, e.g. "WNW".
    pub fn compass_point(&self) -> &'static str {
        let idx = ((self.0.rem_euclid(360.0) / 22.5).round() as usize) % COMPASS_POINTS.len();
        COMPASS_POINTS[idx]
    }
}

impl std::fmt::Display for QiblaBearing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}° {}", self.0, self.compass_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jakarta_faces_west_north_west() {
        let q = QiblaBearing::from_location(&LocationConfig::default());
        assert!((q.degrees() - 295.0).abs() < 1.0, "{}", q.degrees());
        assert_eq!(q.compass_point(), "WNW");
    }

    #[test]
    fn known_bearings() {
        let nyc = QiblaBearing::new(40.7128, -74.0059);
        assert!((nyc.degrees() - 58.48).abs() < 0.01);
        assert_eq!(nyc.compass_point(), "ENE");

        let sydney = QiblaBearing::new(-33.8688, 151.2093);
        assert!((sydney.degrees() - 277.5).abs() < 0.01);
        assert_eq!(sydney.compass_point(), "W");
    }

    #[test]
    fn display_rounds_to_one_decimal() {
        let q = QiblaBearing(58.4817);
        assert_eq!(q.to_string(), "58.5° ENE");
        assert_eq!(QiblaBearing(359.0).compass_point(), "N");
    }
}

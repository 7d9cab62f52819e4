use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in signed decimal degrees.
///
/// Negative latitude lies south of the equator, negative longitude west of
/// the prime meridian.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate only when both components are finite and within
    /// the valid degree ranges. Metadata decoding goes through here so that
    /// malformed position data never surfaces as a location.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= 90.0
            && longitude.abs() <= 180.0
        {
            Some(Self::new(latitude, longitude))
        } else {
            None
        }
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

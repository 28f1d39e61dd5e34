//! Geographical primitives shared by the query builders, parsers and frames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use fmi_timeseries::LatLon;
///
/// let helsinki = LatLon(60.1699, 24.9384);
/// assert_eq!(helsinki.0, 60.1699); // Latitude
/// assert_eq!(helsinki.1, 24.9384); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// Formats as `lat,lon`, the form FMI expects in its `latlon` query parameter.
impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

/// A rectangular area given by its south-west and north-east corners.
///
/// FMI takes bounding boxes as `min_lon,min_lat,max_lon,max_lat`, which is also
/// the order of the [`BoundingBox::new`] arguments.
///
/// # Examples
///
/// ```
/// use fmi_timeseries::{BoundingBox, LatLon};
///
/// let uusimaa = BoundingBox::new(23.5, 59.9, 26.5, 60.8);
/// assert!(uusimaa.contains(LatLon(60.17, 24.94)));
/// assert_eq!(uusimaa.to_string(), "23.5,59.9,26.5,60.8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, location: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&location.0)
            && (self.min_lon..=self.max_lon).contains(&location.1)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

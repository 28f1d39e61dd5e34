use crate::types::geo::LatLon;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One grid cell value set at one timestamp.
///
/// `values[i]` belongs to the i-th [`crate::GridField`] the parser was created with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRecord {
    /// Naive UTC.
    pub timestamp: NaiveDateTime,
    pub location: LatLon,
    pub values: Vec<f64>,
}

impl GridRecord {
    pub fn latitude(&self) -> f64 {
        self.location.0
    }

    pub fn longitude(&self) -> f64 {
        self.location.1
    }
}

/// One scalar value for a fixed point, truncated to its calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRecord {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A single (time, value) measurement from a WaterML timeseries or a forecast payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointObservation {
    pub time: DateTime<FixedOffset>,
    pub value: f64,
}

/// Mean of one calendar day's observations, rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub value: f64,
}

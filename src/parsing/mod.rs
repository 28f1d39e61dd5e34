//! Parsers turning FMI payloads into records and polars tables.

pub mod array_decoder;
pub(crate) mod entries;
pub mod error;
pub mod forecast;
pub mod grid;
pub mod point;
pub mod policy;
pub mod timestamp;
pub mod xml;

pub(crate) const TIME_FIELD: &str = "utctime";
pub(crate) const COORDINATE_FIELD: &str = "latlon";

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_DATE: &str = "date";

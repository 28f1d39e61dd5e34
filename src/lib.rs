mod client;
mod config;
mod error;
mod frames;
mod parsing;
mod resample;
mod types;

pub use error::FmiError;

pub use client::error::TransportError;
pub use client::fetch::{Fetch, HttpFetcher};
pub use client::fmi_client::*;
pub use client::query::{FmiQuery, Service, DEFAULT_BASE_URL};
pub use config::*;

pub use frames::daily_frame::DailyFrame;
pub use frames::grid_frame::GridFrame;

pub use parsing::array_decoder::EncodedArray;
pub use parsing::error::ParseError;
pub use parsing::forecast::ForecastParser;
pub use parsing::grid::{grid_table, GridTimeseriesParser};
pub use parsing::point::{point_table, PointTimeseriesParser};
pub use parsing::policy::{Diagnostic, FailurePolicy, Parsed};
pub use parsing::timestamp::{normalize_timestamp, parse_timestamp, parse_utc_naive};
pub use parsing::xml::namespaces::{ExpandedName, NamespaceMap};
pub use parsing::xml::observations::ObservationParser;
pub use parsing::xml::tree::{Element, XmlAttribute, XmlDocument};
pub use parsing::{COL_DATE, COL_LATITUDE, COL_LONGITUDE, COL_TIMESTAMP};

pub use resample::{daily_table, resample_daily};

pub use types::geo::{BoundingBox, LatLon};
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::kriging_model::{GridField, KrigingModel};
pub use types::records::{DailyAggregate, GridRecord, PointObservation, PointRecord};

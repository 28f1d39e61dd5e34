//! Parser for multi-point (bounding box) timeseries responses.
//!
//! Each entry carries one timestamp, a `latlon` coordinate array and one encoded
//! value array per requested parameter, all aligned by index:
//!
//! ```json
//! [{"utctime": "2025-03-01 06:00:00",
//!   "WaterEquivalentOfSnow": "[12.5 30.1]",
//!   "latlon": "[60.1 24.9 61.2 25.0]"}]
//! ```

use crate::parsing::array_decoder::EncodedArray;
use crate::parsing::entries::{as_object, json_entries, required_str};
use crate::parsing::error::ParseError;
use crate::parsing::policy::{FailurePolicy, Parsed};
use crate::parsing::timestamp::parse_utc_naive;
use crate::parsing::{COL_LATITUDE, COL_LONGITUDE, COL_TIMESTAMP, COORDINATE_FIELD, TIME_FIELD};
use crate::types::kriging_model::GridField;
use crate::types::records::GridRecord;
use log::debug;
use polars::prelude::*;
use serde_json::Value;

pub struct GridTimeseriesParser<'a> {
    fields: &'a [GridField],
    policy: FailurePolicy,
}

impl<'a> GridTimeseriesParser<'a> {
    pub fn new(fields: &'a [GridField]) -> Self {
        Self {
            fields,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Expands one entry into one record per coordinate. Any failure means no
    /// records at all for the entry.
    fn parse_entry(&self, index: usize, entry: &Value) -> Result<Vec<GridRecord>, ParseError> {
        let entry = as_object(index, entry)?;
        let timestamp = parse_utc_naive(required_str(entry, TIME_FIELD)?)?;
        let coordinates = EncodedArray::new(required_str(entry, COORDINATE_FIELD)?)
            .coordinates()
            .map_err(|e| e.in_field(COORDINATE_FIELD))?;

        let columns = self
            .fields
            .iter()
            .map(|field| {
                let values = EncodedArray::new(required_str(entry, field.source)?)
                    .values()
                    .map_err(|e| e.in_field(field.source))?;
                if values.len() != coordinates.len() {
                    return Err(ParseError::LengthMismatch {
                        field: field.source.to_string(),
                        expected: coordinates.len(),
                        found: values.len(),
                    });
                }
                Ok(values)
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(coordinates
            .iter()
            .enumerate()
            .map(|(i, location)| GridRecord {
                timestamp,
                location: *location,
                values: columns.iter().map(|column| column[i]).collect(),
            })
            .collect())
    }

    pub fn parse_records(&self, payload: &Value) -> Result<Parsed<Vec<GridRecord>>, ParseError> {
        let Some(entries) = json_entries(payload) else {
            return Ok(Parsed::new(Vec::new()));
        };

        let mut records = Vec::new();
        let mut diagnostics = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let outcome = self.parse_entry(index, entry);
            if let Some(rows) = self.policy.handle(index, outcome, &mut diagnostics)? {
                records.extend(rows);
            }
        }
        debug!(
            "Parsed {} grid records from {} entries ({} skipped)",
            records.len(),
            entries.len(),
            diagnostics.len()
        );
        Ok(Parsed {
            data: records,
            diagnostics,
        })
    }

    pub fn parse(&self, payload: &Value) -> Result<Parsed<DataFrame>, ParseError> {
        self.parse_records(payload)?
            .try_map(|records| grid_table(&records, self.fields))
    }
}

/// Builds the `timestamp, latitude, longitude, <field columns...>` table.
/// No records gives a table with no columns. Every record must carry exactly one
/// value per field.
pub fn grid_table(records: &[GridRecord], fields: &[GridField]) -> Result<DataFrame, ParseError> {
    if records.is_empty() {
        return Ok(DataFrame::empty());
    }
    if let Some(record) = records.iter().find(|r| r.values.len() != fields.len()) {
        return Err(ParseError::LengthMismatch {
            field: format!("values at {}", record.timestamp),
            expected: fields.len(),
            found: record.values.len(),
        });
    }

    let timestamps = DatetimeChunked::from_naive_datetime(
        COL_TIMESTAMP.into(),
        records.iter().map(|r| r.timestamp),
        TimeUnit::Milliseconds,
    );
    let mut columns: Vec<Column> = Vec::with_capacity(fields.len() + 3);
    columns.push(timestamps.into_series().into());
    columns.push(
        Series::new(
            COL_LATITUDE.into(),
            records.iter().map(GridRecord::latitude).collect::<Vec<f64>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            COL_LONGITUDE.into(),
            records.iter().map(GridRecord::longitude).collect::<Vec<f64>>(),
        )
        .into(),
    );
    for (i, field) in fields.iter().enumerate() {
        let values: Vec<f64> = records.iter().map(|r| r.values[i]).collect();
        columns.push(Series::new(field.column.into(), values).into());
    }

    Ok(DataFrame::new(columns)?)
}

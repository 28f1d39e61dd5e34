//! Parser for single-point timeseries responses, where every parameter is a
//! plain scalar:
//!
//! ```json
//! [{"utctime": "2025-06-01 00:00:00", "EffectiveTemperatureSum": 312.4}]
//! ```
//!
//! If an entry nevertheless carries an encoded `latlon` array (FMI does this for
//! some multi-point queries), the entry's value is repeated once per decoded
//! coordinate. The coordinates themselves are not part of the output.

use crate::parsing::array_decoder::EncodedArray;
use crate::parsing::entries::{as_object, json_entries, optional_number, required_str};
use crate::parsing::error::ParseError;
use crate::parsing::policy::{FailurePolicy, Parsed};
use crate::parsing::timestamp::parse_utc_naive;
use crate::parsing::{COL_DATE, COORDINATE_FIELD, TIME_FIELD};
use crate::types::records::PointRecord;
use log::debug;
use polars::prelude::*;
use serde_json::Value;

pub struct PointTimeseriesParser<'a> {
    source: &'a str,
    column: &'a str,
    policy: FailurePolicy,
}

impl<'a> PointTimeseriesParser<'a> {
    /// `source` is the JSON key holding the value, `column` the output column name.
    pub fn new(source: &'a str, column: &'a str) -> Self {
        Self {
            source,
            column,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn parse_entry(&self, index: usize, entry: &Value) -> Result<Vec<PointRecord>, ParseError> {
        let entry = as_object(index, entry)?;
        let date = parse_utc_naive(required_str(entry, TIME_FIELD)?)?.date();
        let raw_value = entry
            .get(self.source)
            .ok_or_else(|| ParseError::MissingField(self.source.to_string()))?;
        let value = optional_number(raw_value, self.source)?;

        let repeats = match entry.get(COORDINATE_FIELD).and_then(Value::as_str) {
            Some(raw) if !raw.trim().is_empty() => EncodedArray::new(raw)
                .coordinates()
                .map_err(|e| e.in_field(COORDINATE_FIELD))?
                .len(),
            _ => 1,
        };
        Ok(vec![PointRecord { date, value }; repeats])
    }

    pub fn parse_records(&self, payload: &Value) -> Result<Parsed<Vec<PointRecord>>, ParseError> {
        let Some(entries) = json_entries(payload) else {
            return Ok(Parsed::new(Vec::new()));
        };

        let mut records = Vec::with_capacity(entries.len());
        let mut diagnostics = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let outcome = self.parse_entry(index, entry);
            if let Some(rows) = self.policy.handle(index, outcome, &mut diagnostics)? {
                records.extend(rows);
            }
        }
        debug!(
            "Parsed {} point records for '{}' ({} skipped)",
            records.len(),
            self.source,
            diagnostics.len()
        );
        Ok(Parsed {
            data: records,
            diagnostics,
        })
    }

    pub fn parse(&self, payload: &Value) -> Result<Parsed<DataFrame>, ParseError> {
        self.parse_records(payload)?
            .try_map(|records| point_table(&records, self.column))
    }
}

/// Builds the two-column `date, <column>` table. No records gives a table with
/// no columns.
pub fn point_table(records: &[PointRecord], column: &str) -> Result<DataFrame, ParseError> {
    if records.is_empty() {
        return Ok(DataFrame::empty());
    }
    let dates = DateChunked::from_naive_date(COL_DATE.into(), records.iter().map(|r| r.date));
    let values: Vec<Option<f64>> = records.iter().map(|r| r.value).collect();
    Ok(DataFrame::new(vec![
        dates.into_series().into(),
        Series::new(column.into(), values).into(),
    ])?)
}

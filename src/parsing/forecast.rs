//! Parser for point forecasts delivered as JSON by the timeseries endpoint
//! (e.g. the `virenwc` road weather producer).
//!
//! The payload is either a bare array or `{"data": [...]}`; each entry has a
//! `utctime` that may be ISO-8601, compact (`20250618T090000`) or `Z`-suffixed,
//! and a scalar value field.

use crate::parsing::entries::{as_object, json_entries, optional_number};
use crate::parsing::error::ParseError;
use crate::parsing::policy::{FailurePolicy, Parsed};
use crate::parsing::timestamp::parse_timestamp;
use crate::parsing::TIME_FIELD;
use crate::types::records::PointObservation;
use log::warn;
use serde_json::Value;

pub struct ForecastParser<'a> {
    source: &'a str,
    policy: FailurePolicy,
}

impl<'a> ForecastParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `Ok(None)` for entries without a timestamp or value; those are gaps in the
    /// forecast rather than malformed data.
    fn parse_entry(
        &self,
        index: usize,
        entry: &Value,
    ) -> Result<Option<PointObservation>, ParseError> {
        let entry = as_object(index, entry)?;
        let time = match entry.get(TIME_FIELD).and_then(Value::as_str) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };
        let value = match entry.get(self.source) {
            Some(raw) => optional_number(raw, self.source)?,
            None => None,
        };
        let Some(value) = value else {
            return Ok(None);
        };
        Ok(Some(PointObservation {
            time: parse_timestamp(time)?,
            value,
        }))
    }

    pub fn parse(&self, payload: &Value) -> Result<Parsed<Vec<PointObservation>>, ParseError> {
        let Some(entries) = json_entries(payload) else {
            return Ok(Parsed::new(Vec::new()));
        };
        if entries.is_empty() {
            warn!("No forecast data returned");
            return Ok(Parsed::new(Vec::new()));
        }

        let mut observations = Vec::with_capacity(entries.len());
        let mut diagnostics = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let outcome = self.parse_entry(index, entry);
            if let Some(Some(observation)) = self.policy.handle(index, outcome, &mut diagnostics)? {
                observations.push(observation);
            }
        }

        if observations.is_empty() {
            warn!(
                "Forecast data parsed but contains no valid '{}' entries",
                self.source
            );
        }
        Ok(Parsed {
            data: observations,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_bare_array_with_compact_timestamps() -> Result<(), ParseError> {
        let payload = json!([
            {"utctime": "20250618T090000", "Temperature": 14.2},
            {"utctime": "20250618T100000Z", "Temperature": "15.0"}
        ]);

        let parsed = ForecastParser::new("Temperature").parse(&payload)?;
        assert!(parsed.is_clean());
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(
            parsed.data[0].time,
            Utc.with_ymd_and_hms(2025, 6, 18, 9, 0, 0).unwrap()
        );
        assert_eq!(parsed.data[1].value, 15.0);
        Ok(())
    }

    #[test]
    fn test_data_object() -> Result<(), ParseError> {
        let payload = json!({"data": [{"utctime": "2025-06-18T09:00:00Z", "Temperature": 3}]});
        let parsed = ForecastParser::new("Temperature").parse(&payload)?;
        assert_eq!(parsed.data.len(), 1);
        Ok(())
    }

    #[test]
    fn test_unexpected_shape_is_empty() -> Result<(), ParseError> {
        let parsed = ForecastParser::new("Temperature").parse(&json!(17))?;
        assert!(parsed.data.is_empty());
        assert!(parsed.is_clean());
        Ok(())
    }

    #[test]
    fn test_gaps_are_ignored_and_bad_timestamps_skipped() -> Result<(), ParseError> {
        let payload = json!([
            {"utctime": "2025-06-18T09:00:00Z", "Temperature": null},
            {"Temperature": 4.0},
            {"utctime": "not a time", "Temperature": 4.0},
            {"utctime": "2025-06-18T11:00:00Z", "Temperature": 6.5}
        ]);

        let parsed = ForecastParser::new("Temperature").parse(&payload)?;
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].value, 6.5);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].index, 2);
        Ok(())
    }

    #[test]
    fn test_strict_aborts_on_bad_timestamp() {
        let payload = json!([{"utctime": "garbage", "Temperature": 1.0}]);
        let result = ForecastParser::new("Temperature")
            .with_policy(FailurePolicy::Strict)
            .parse(&payload);
        assert!(matches!(result, Err(ParseError::MalformedTimestamp(_))));
    }
}

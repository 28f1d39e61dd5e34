//! Daily resampling of point observations.

use crate::parsing::error::ParseError;
use crate::parsing::COL_DATE;
use crate::types::records::{DailyAggregate, PointObservation};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Halves go to the even neighbour, so 12.25 becomes 12.2.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Averages observations per calendar day, rounded to one decimal.
///
/// The day of an observation is the date in its own UTC offset; nothing is
/// re-localized. Days come out in ascending order and only days with at least one
/// finite value appear.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use fmi_timeseries::{resample_daily, PointObservation};
///
/// let at = |d, h| Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap().fixed_offset();
/// let observations = vec![
///     PointObservation { time: at(1, 0), value: 10.0 },
///     PointObservation { time: at(1, 12), value: 20.0 },
///     PointObservation { time: at(2, 0), value: 5.0 },
/// ];
///
/// let daily = resample_daily(&observations);
/// assert_eq!(daily.len(), 2);
/// assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
/// assert_eq!(daily[0].value, 15.0);
/// assert_eq!(daily[1].value, 5.0);
/// ```
pub fn resample_daily(observations: &[PointObservation]) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for observation in observations.iter().filter(|o| o.value.is_finite()) {
        let (sum, count) = days.entry(observation.time.date_naive()).or_default();
        *sum += observation.value;
        *count += 1;
    }

    days.into_iter()
        .map(|(date, (sum, count))| DailyAggregate {
            date,
            value: round_one_decimal(sum / count as f64),
        })
        .collect()
}

/// Builds the `date, <column>` table for daily aggregates. No aggregates gives a
/// table with no columns.
pub fn daily_table(aggregates: &[DailyAggregate], column: &str) -> Result<DataFrame, ParseError> {
    if aggregates.is_empty() {
        return Ok(DataFrame::empty());
    }
    let dates = DateChunked::from_naive_date(COL_DATE.into(), aggregates.iter().map(|a| a.date));
    let values: Vec<f64> = aggregates.iter().map(|a| a.value).collect();
    Ok(DataFrame::new(vec![
        dates.into_series().into(),
        Series::new(column.into(), values).into(),
    ])?)
}

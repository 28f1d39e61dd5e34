//! Contains the `DailyFrame` structure for lazy operations on per-day tables.

use crate::parsing::COL_DATE;
use chrono::NaiveDate;
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding a `date` column and one value column.
///
/// Produced by [`crate::FmiClient::temperature_sum_point`] (`tempSum`),
/// [`crate::FmiClient::temperature_forecast`] and
/// [`crate::FmiClient::road_weather_forecast`] (`avgTemp`).
///
/// A table built from an empty response has no columns; filters return it unchanged.
#[derive(Clone)]
pub struct DailyFrame {
    /// The underlying Polars LazyFrame containing the daily data.
    pub frame: LazyFrame,
    empty: bool,
}

impl DailyFrame {
    pub fn new(df: DataFrame) -> Self {
        Self {
            empty: df.width() == 0,
            frame: df.lazy(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Filters the daily data based on a Polars predicate expression.
    ///
    /// # Example
    ///
    /// ```
    /// # use fmi_timeseries::{daily_table, resample_daily, DailyFrame, PointObservation};
    /// use chrono::{TimeZone, Utc};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let at = |d| Utc.with_ymd_and_hms(2025, 6, d, 12, 0, 0).unwrap().fixed_offset();
    /// let observations = vec![
    ///     PointObservation { time: at(1), value: 18.0 },
    ///     PointObservation { time: at(2), value: 22.5 },
    /// ];
    /// let df = daily_table(&resample_daily(&observations), "avgTemp")?;
    ///
    /// let warm = DailyFrame::new(df).filter(col("avgTemp").gt(lit(20.0f64)));
    /// assert_eq!(warm.frame.collect()?.height(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> DailyFrame {
        if self.empty {
            return self.clone();
        }
        DailyFrame {
            frame: self.frame.clone().filter(predicate),
            empty: false,
        }
    }

    /// Keeps days with `start <= date <= end`.
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> DailyFrame {
        self.filter(
            col(COL_DATE)
                .gt_eq(lit(start))
                .and(col(COL_DATE).lt_eq(lit(end))),
        )
    }

    /// Collecting the result yields zero or one row.
    pub fn get_at(&self, date: NaiveDate) -> DailyFrame {
        self.filter(col(COL_DATE).eq(lit(date)))
    }
}

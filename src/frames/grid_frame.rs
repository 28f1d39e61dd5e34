//! Contains the `GridFrame` structure for lazy operations on gridded kriging data.

use crate::parsing::{COL_LATITUDE, COL_LONGITUDE, COL_TIMESTAMP};
use crate::types::geo::BoundingBox;
use crate::types::into_utc_trait::IntoUtcDateTime;
use polars::prelude::{col, lit, DataFrame, DataType, Expr, IntoLazy, LazyFrame, TimeUnit};

/// A wrapper around a Polars `LazyFrame` holding a grid timeseries table:
/// `timestamp`, `latitude`, `longitude` and one column per requested field.
///
/// Instances are typically obtained via [`crate::FmiClient::snow_depth`],
/// [`crate::FmiClient::daily_weather`], [`crate::FmiClient::temperature_sum`] or
/// [`crate::FmiClient::grid`].
///
/// # Note on Datetimes
///
/// The `timestamp` column is timezone-naive and holds UTC. The filtering methods
/// accept anything implementing [`IntoUtcDateTime`] and compare on its naive UTC
/// representation.
///
/// # Empty results
///
/// A response without any valid entry produces a table with no columns. Every
/// filtering method returns such a frame unchanged instead of failing on the
/// missing columns.
#[derive(Clone)]
pub struct GridFrame {
    /// The underlying Polars LazyFrame containing the grid data.
    pub frame: LazyFrame,
    empty: bool,
}

impl GridFrame {
    pub fn new(df: DataFrame) -> Self {
        Self {
            empty: df.width() == 0,
            frame: df.lazy(),
        }
    }

    /// `true` when the source response had no usable entries.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Filters the grid data based on a Polars predicate expression.
    ///
    /// # Example
    ///
    /// ```
    /// # use fmi_timeseries::{GridFrame, GridTimeseriesParser, KrigingModel};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let payload = serde_json::json!([{
    ///     "utctime": "2025-03-01 06:00:00",
    ///     "WaterEquivalentOfSnow": "[12.5 30.1]",
    ///     "latlon": "[60.1 24.9 61.2 25.0]"
    /// }]);
    /// let df = GridTimeseriesParser::new(KrigingModel::Snow.fields()).parse(&payload)?.data;
    ///
    /// let deep = GridFrame::new(df).filter(col("snow_water_equivalent").gt(lit(20.0f64)));
    /// assert_eq!(deep.frame.collect()?.height(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> GridFrame {
        if self.empty {
            return self.clone();
        }
        GridFrame {
            frame: self.frame.clone().filter(predicate),
            empty: false,
        }
    }

    /// Keeps rows with `start <= timestamp <= end`.
    pub fn get_range(&self, start: impl IntoUtcDateTime, end: impl IntoUtcDateTime) -> GridFrame {
        let start_naive = start.into_naive_utc();
        let end_naive = end.into_naive_utc();
        let timestamp = || col(COL_TIMESTAMP).cast(DataType::Datetime(TimeUnit::Milliseconds, None));
        self.filter(
            timestamp()
                .gt_eq(lit(start_naive))
                .and(timestamp().lt_eq(lit(end_naive))),
        )
    }

    /// Keeps rows whose timestamp equals `timestamp` exactly.
    pub fn get_at(&self, timestamp: impl IntoUtcDateTime) -> GridFrame {
        let naive = timestamp.into_naive_utc();
        self.filter(
            col(COL_TIMESTAMP)
                .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                .eq(lit(naive)),
        )
    }

    /// Keeps grid points inside the bounding box (edges included).
    ///
    /// FMI does not guarantee that every returned coordinate lies in the requested
    /// box, and the parser does not check it either.
    pub fn within(&self, bbox: BoundingBox) -> GridFrame {
        self.filter(
            col(COL_LATITUDE)
                .gt_eq(lit(bbox.min_lat))
                .and(col(COL_LATITUDE).lt_eq(lit(bbox.max_lat)))
                .and(col(COL_LONGITUDE).gt_eq(lit(bbox.min_lon)))
                .and(col(COL_LONGITUDE).lt_eq(lit(bbox.max_lon))),
        )
    }
}

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Anything that can bound a filter on the naive-UTC `timestamp` column of a grid table.
pub trait IntoUtcDateTime {
    fn into_utc(self) -> DateTime<Utc>;

    fn into_naive_utc(self) -> NaiveDateTime
    where
        Self: Sized,
    {
        self.into_utc().naive_utc()
    }
}

/// Naive datetimes are already UTC in FMI tables.
impl IntoUtcDateTime for NaiveDateTime {
    fn into_utc(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self)
    }
}

impl IntoUtcDateTime for DateTime<Utc> {
    fn into_utc(self) -> DateTime<Utc> {
        self
    }
}

impl IntoUtcDateTime for DateTime<FixedOffset> {
    fn into_utc(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

/// Midnight UTC at the start of the date.
impl IntoUtcDateTime for NaiveDate {
    fn into_utc(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.and_time(NaiveTime::default()))
    }
}

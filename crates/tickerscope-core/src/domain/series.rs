use serde::{Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::{date, format_description};
use time::{Date, OffsetDateTime};

use crate::{Symbol, ValidationError};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// First day of the default analysis window.
pub const DEFAULT_START_DATE: Date = date!(2020 - 01 - 01);

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

fn serialize_date<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

fn serialize_optional_date<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.collect_str(date),
        None => serializer.serialize_none(),
    }
}

/// Half-open `[start, end)` window of calendar days, both at UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "serialize_date")]
    pub start: Date,
    #[serde(serialize_with = "serialize_date")]
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// From `start` up to (not including) today in UTC.
    pub fn until_today(start: Date) -> Result<Self, ValidationError> {
        Self::new(start, OffsetDateTime::now_utc().date())
    }

    pub fn start_unix(&self) -> i64 {
        self.start.midnight().assume_utc().unix_timestamp()
    }

    pub fn end_unix(&self) -> i64 {
        self.end.midnight().assume_utc().unix_timestamp()
    }
}

/// One trading day of the daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRow {
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub close: Option<f64>,
    pub adj_close: f64,
    pub volume: Option<u64>,
}

impl PriceRow {
    pub fn new(date: Date, close: Option<f64>, adj_close: f64, volume: Option<u64>) -> Self {
        Self {
            date,
            close,
            adj_close,
            volume,
        }
    }
}

/// Daily price history for one symbol, ordered by ascending date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries {
    pub symbol: Symbol,
    pub rows: Vec<PriceRow>,
}

impl HistoricalSeries {
    /// Builds a series, sorting rows by date and keeping the last row seen for a
    /// repeated date.
    pub fn new(symbol: Symbol, mut rows: Vec<PriceRow>) -> Self {
        rows.sort_by_key(|row| row.date);
        rows.reverse();
        rows.dedup_by_key(|row| row.date);
        rows.reverse();
        Self { symbol, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn adj_closes(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.adj_close).collect()
    }

    pub fn first_date(&self) -> Option<Date> {
        self.rows.first().map(|row| row.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.rows.last().map(|row| row.date)
    }
}

/// Serialized span of a series, used in analysis summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesSpan {
    pub rows: usize,
    #[serde(serialize_with = "serialize_optional_date")]
    pub first: Option<Date>,
    #[serde(serialize_with = "serialize_optional_date")]
    pub last: Option<Date>,
}

impl From<&HistoricalSeries> for SeriesSpan {
    fn from(series: &HistoricalSeries) -> Self {
        Self {
            rows: series.len(),
            first: series.first_date(),
            last: series.last_date(),
        }
    }
}

//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`GlobalQuote`] | Current quote, field for field as the provider sent it |
//! | [`PriceRow`] | One trading day (date, close, adjusted close, volume) |
//! | [`HistoricalSeries`] | Date-ordered daily rows for one symbol |
//! | [`DateRange`] | Half-open calendar window for history downloads |

mod quote;
mod series;
mod symbol;

pub use quote::{GlobalQuote, LiveBlock, PLACEHOLDER};
pub use series::{
    parse_date, DateRange, HistoricalSeries, PriceRow, SeriesSpan, DEFAULT_START_DATE,
};
pub use symbol::Symbol;

//! # Tickerscope Core
//!
//! Symbol lookup, live quotes and historical price statistics.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Alpha Vantage search/quote, Yahoo daily chart) |
//! | [`analysis`] | Daily returns, volatility, rolling means, [`HistoricalAnalyzer`] |
//! | [`config`] | [`ProviderConfig`]: API key, base URLs, timeout |
//! | [`data_source`] | Provider traits and request/response types |
//! | [`domain`] | Domain models (Symbol, GlobalQuote, HistoricalSeries) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`live`] | [`QuoteFetcher`] and the [`LiveQuotePrinter`] polling loop |
//! | [`resolver`] | [`SymbolResolver`]: company name to ticker |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerscope_core::{AlphaVantageAdapter, ProviderConfig, Resolution, SymbolResolver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let adapter = Arc::new(AlphaVantageAdapter::new(ProviderConfig::new("demo")));
//!     let resolver = SymbolResolver::new(adapter);
//!
//!     match resolver.resolve("International Business Machines").await {
//!         Resolution::Found { symbol, .. } => println!("ticker: {symbol}"),
//!         Resolution::NotFound(reason) => println!("{reason}"),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │ SymbolResolver │ LiveQuotePrinter │ HistoricalAnalyzer │
//! └────────┬─────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Provider traits │────▶│ HTTP Client      │
//! │ (adapters)      │     │ (reqwest/canned) │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - The API key is supplied through [`ProviderConfig`] and is masked in logs and `Debug`
//!   output.

pub mod adapters;
pub mod analysis;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod live;
pub mod resolver;
pub mod source;

pub use adapters::{AlphaVantageAdapter, YahooAdapter};

pub use analysis::{
    analyze_series, AnalysisSummary, DerivedColumns, HistoricalAnalysis, HistoricalAnalyzer,
    LONG_WINDOW, SHORT_WINDOW,
};

pub use config::{ProviderConfig, API_KEY_ENV, DEMO_API_KEY};

pub use data_source::{
    HistoryRequest, HistorySource, QuoteSource, SearchBatch, SearchMatch, SearchRequest,
    SourceError, SourceErrorKind, SymbolSearch,
};

pub use domain::{
    parse_date, DateRange, GlobalQuote, HistoricalSeries, PriceRow, SeriesSpan, Symbol,
    DEFAULT_START_DATE, PLACEHOLDER,
};

pub use error::ValidationError;

pub use http_client::{
    CannedHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use live::{
    LiveError, LiveFormat, LiveOptions, LiveQuotePrinter, LiveReport, QuoteFetcher, Sleeper,
    TokioSleeper, DEFAULT_REFRESH_INTERVAL,
};

pub use resolver::{NotFoundReason, Resolution, SymbolResolver};

pub use source::ProviderId;

//! Provider contracts and request/response types.
//!
//! | Trait | Request | Response | Provider |
//! |-------|---------|----------|----------|
//! | [`SymbolSearch`] | [`SearchRequest`] | [`SearchBatch`] | Alpha Vantage `SYMBOL_SEARCH` |
//! | [`QuoteSource`] | [`Symbol`] | [`GlobalQuote`] | Alpha Vantage `GLOBAL_QUOTE` |
//! | [`HistorySource`] | [`HistoryRequest`] | [`HistoricalSeries`] | Yahoo chart API |
//!
//! All three return [`SourceError`] on failure; callers decide which failures are
//! recoverable.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::{DateRange, GlobalQuote, HistoricalSeries, ProviderId, Symbol};

/// Boxed future returned by provider traits.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The request never produced a response (connect failure, timeout).
    Transport,
    /// The provider answered with a non-2xx status.
    Status,
    /// The body was not the expected JSON shape.
    Malformed,
    /// The provider answered with an informational or throttling notice instead of data.
    RateLimited,
    /// The provider had nothing for the request (empty series).
    NoData,
    InvalidRequest,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    status: Option<u16>,
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn status(provider: ProviderId, status: u16) -> Self {
        Self {
            kind: SourceErrorKind::Status,
            message: format!("{provider} returned status {status}"),
            status: Some(status),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
            status: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            status: None,
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: message.into(),
            status: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            status: None,
        }
    }

    /// Appends provider-supplied detail to the message.
    pub fn with_detail(mut self, detail: impl AsRef<str>) -> Self {
        let detail = detail.as_ref().trim();
        if !detail.is_empty() {
            self.message = format!("{}: {detail}", self.message);
        }
        self
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status for [`SourceErrorKind::Status`] errors.
    pub const fn http_status(&self) -> Option<u16> {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Status => "source.status",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Free-text instrument search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Result<Self, SourceError> {
        let query = query.into();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SourceError::invalid_request(
                "search query must not be empty",
            ));
        }
        Ok(Self {
            query: trimmed.to_owned(),
        })
    }
}

/// One search hit, in provider ranking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    /// Raw symbol text; validated into a [`Symbol`] only when selected.
    pub symbol: String,
    pub name: Option<String>,
    pub region: Option<String>,
    pub currency: Option<String>,
    pub match_score: Option<f64>,
}

/// Search response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBatch {
    pub query: String,
    pub matches: Vec<SearchMatch>,
    /// Informational or throttling text the provider sent in place of matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Daily history download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: DateRange,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: DateRange) -> Self {
        Self { symbol, range }
    }
}

/// Resolves free text to ranked instrument matches.
pub trait SymbolSearch: Send + Sync {
    fn id(&self) -> ProviderId;

    /// # Errors
    ///
    /// Returns [`SourceError`] with kind `Transport`, `Status` (body not parsed) or
    /// `Malformed`. A missing or empty match list is an `Ok` batch with no matches.
    fn search<'a>(&'a self, req: SearchRequest) -> SourceFuture<'a, SearchBatch>;
}

/// Fetches the current quote for one symbol.
pub trait QuoteSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// # Errors
    ///
    /// Any failure, including a payload without a quote object, is an error; an empty
    /// quote object is `Ok`.
    fn quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, GlobalQuote>;
}

/// Downloads a daily price series.
pub trait HistorySource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn daily_history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, HistoricalSeries>;
}

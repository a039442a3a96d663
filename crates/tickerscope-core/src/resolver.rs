//! Company name to ticker symbol lookup.
//!
//! Lookup failures are not errors: every way the search can go wrong collapses into
//! [`Resolution::NotFound`] with a reason the caller prints before ending the run.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use tracing::{info, warn};

use crate::data_source::{SearchMatch, SearchRequest, SourceErrorKind, SymbolSearch};
use crate::Symbol;

/// Why a company name did not resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum NotFoundReason {
    EmptyQuery,
    /// The request never got a response.
    Transport(String),
    /// Non-2xx status; the body was not looked at.
    Status(u16),
    /// The body was unreadable or the first match had no usable symbol.
    Malformed(String),
    /// `bestMatches` was empty or absent. Carries any provider notice sent instead.
    NoMatches { notice: Option<String> },
}

impl Display for NotFoundReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => f.write_str("Company name cannot be empty."),
            Self::Transport(message) => write!(f, "Request failed: {message}"),
            Self::Status(code) => write!(f, "Request failed with status code {code}"),
            Self::Malformed(message) => write!(
                f,
                "An error occurred while parsing the JSON data: {message}"
            ),
            Self::NoMatches { .. } => f.write_str("No matching ticker found."),
        }
    }
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found {
        symbol: Symbol,
        best_match: SearchMatch,
    },
    NotFound(NotFoundReason),
}

/// Maps free text to the provider's best-ranked ticker.
#[derive(Clone)]
pub struct SymbolResolver {
    search: Arc<dyn SymbolSearch>,
}

impl SymbolResolver {
    pub fn new(search: Arc<dyn SymbolSearch>) -> Self {
        Self { search }
    }

    pub async fn resolve(&self, company_name: &str) -> Resolution {
        let request = match SearchRequest::new(company_name) {
            Ok(request) => request,
            Err(_) => return Resolution::NotFound(NotFoundReason::EmptyQuery),
        };

        let batch = match self.search.search(request).await {
            Ok(batch) => batch,
            Err(error) => {
                warn!(provider = %self.search.id(), %error, "symbol search failed");
                let reason = match (error.kind(), error.http_status()) {
                    (SourceErrorKind::Status, Some(code)) => NotFoundReason::Status(code),
                    (SourceErrorKind::Malformed, _) => {
                        NotFoundReason::Malformed(error.message().to_owned())
                    }
                    _ => NotFoundReason::Transport(error.message().to_owned()),
                };
                return Resolution::NotFound(reason);
            }
        };

        let Some(best_match) = batch.matches.into_iter().next() else {
            info!(query = %batch.query, "no matching ticker");
            return Resolution::NotFound(NotFoundReason::NoMatches {
                notice: batch.notice,
            });
        };

        match Symbol::parse(&best_match.symbol) {
            Ok(symbol) => {
                info!(query = %batch.query, %symbol, "resolved ticker");
                Resolution::Found { symbol, best_match }
            }
            Err(error) => Resolution::NotFound(NotFoundReason::Malformed(format!(
                "best match symbol '{}' is invalid: {error}",
                best_match.symbol
            ))),
        }
    }
}

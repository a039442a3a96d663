use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data_source::{
    QuoteSource, SearchBatch, SearchMatch, SearchRequest, SourceError, SourceFuture, SymbolSearch,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{GlobalQuote, ProviderConfig, ProviderId, Symbol};

/// Alpha Vantage adapter for symbol search and live quotes.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    config: ProviderConfig,
}

impl AlphaVantageAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ProviderConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn search_url(&self, keywords: &str) -> String {
        format!(
            "{}/query?function=SYMBOL_SEARCH&keywords={}&apikey={}",
            self.config.alphavantage_base_url,
            urlencoding::encode(keywords),
            urlencoding::encode(&self.config.api_key)
        )
    }

    fn quote_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}/query?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            self.config.alphavantage_base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&self.config.api_key)
        )
    }

    async fn get(&self, url: String) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(url).with_timeout_ms(self.config.timeout_ms);
        debug!(url = %request.redacted_url(), "alphavantage request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::transport(format!("alphavantage transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::status(ProviderId::Alphavantage, response.status));
        }
        Ok(response)
    }

    async fn execute_search(&self, req: SearchRequest) -> Result<SearchBatch, SourceError> {
        let response = self.get(self.search_url(&req.query)).await?;

        let parsed: AlphaVantageSearchResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::malformed(format!("failed to parse search response: {e}")))?;

        let notice = parsed.notice();
        if let Some(notice) = &notice {
            warn!(%notice, "alphavantage search returned a notice instead of matches");
        }

        let matches = parsed
            .best_matches
            .unwrap_or_default()
            .into_iter()
            .map(SearchMatch::from)
            .collect::<Vec<_>>();
        debug!(query = %req.query, matches = matches.len(), "alphavantage search parsed");

        Ok(SearchBatch {
            query: req.query,
            matches,
            notice,
        })
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<GlobalQuote, SourceError> {
        let response = self.get(self.quote_url(symbol)).await?;
        parse_quote_body(&response.body)
    }
}

impl SymbolSearch for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn search<'a>(&'a self, req: SearchRequest) -> SourceFuture<'a, SearchBatch> {
        Box::pin(self.execute_search(req))
    }
}

impl QuoteSource for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, GlobalQuote> {
        Box::pin(self.fetch_quote(symbol))
    }
}

/// Extracts the `Global Quote` object; its absence is an error, its emptiness is not.
fn parse_quote_body(body: &str) -> Result<GlobalQuote, SourceError> {
    let parsed: AlphaVantageQuoteResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse alphavantage quote: {e}")))?;

    if let Some(quote) = parsed.quote {
        return Ok(quote);
    }

    if let Some(notice) = parsed.note.or(parsed.information) {
        return Err(SourceError::rate_limited(
            "alphavantage returned a notice instead of a quote",
        )
        .with_detail(notice));
    }

    let error = SourceError::malformed("no 'Global Quote' in alphavantage response");
    Err(match parsed.error_message {
        Some(message) => error.with_detail(message),
        None => error,
    })
}

#[derive(Debug, Deserialize)]
struct AlphaVantageQuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlphaVantageSearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<AlphaVantageSearchMatch>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

impl AlphaVantageSearchResponse {
    fn notice(&self) -> Option<String> {
        self.note
            .clone()
            .or_else(|| self.information.clone())
            .or_else(|| self.error_message.clone())
    }
}

#[derive(Debug, Deserialize)]
struct AlphaVantageSearchMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: Option<String>,
    #[serde(rename = "4. region")]
    region: Option<String>,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
    #[serde(rename = "9. matchScore")]
    match_score: Option<String>,
}

impl From<AlphaVantageSearchMatch> for SearchMatch {
    fn from(value: AlphaVantageSearchMatch) -> Self {
        Self {
            symbol: value.symbol,
            name: value.name,
            region: value.region,
            currency: value.currency,
            match_score: value
                .match_score
                .and_then(|score| score.trim().parse::<f64>().ok()),
        }
    }
}

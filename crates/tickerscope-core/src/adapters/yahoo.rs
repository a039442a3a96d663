use std::sync::Arc;

use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::data_source::{HistoryRequest, HistorySource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{HistoricalSeries, PriceRow, ProviderConfig, ProviderId};

/// Yahoo Finance chart adapter for daily price history.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    config: ProviderConfig,
}

impl YahooAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ProviderConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn chart_url(&self, req: &HistoryRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%2Csplit&includeAdjustedClose=true",
            self.config.yahoo_base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.start_unix(),
            req.range.end_unix()
        )
    }

    async fn fetch_daily_history(
        &self,
        req: HistoryRequest,
    ) -> Result<HistoricalSeries, SourceError> {
        let request = HttpRequest::get(self.chart_url(&req))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.config.timeout_ms);
        debug!(url = %request.url, "yahoo chart request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::transport(format!("yahoo transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            // Yahoo explains most non-2xx answers (unknown symbol, bad range) in chart.error.
            let detail = serde_json::from_str::<YahooChartResponse>(&response.body)
                .ok()
                .and_then(|parsed| parsed.chart.error)
                .map(|error| error.to_string())
                .unwrap_or_default();
            warn!(status = response.status, %detail, "yahoo chart request failed");
            return Err(SourceError::status(ProviderId::Yahoo, response.status).with_detail(detail));
        }

        let rows = parse_chart_body(&response.body)?;
        if rows.is_empty() {
            return Err(SourceError::no_data(format!(
                "yahoo returned no daily rows for {} between {} and {}",
                req.symbol, req.range.start, req.range.end
            )));
        }

        debug!(symbol = %req.symbol, rows = rows.len(), "yahoo chart parsed");
        Ok(HistoricalSeries::new(req.symbol, rows))
    }
}

impl HistorySource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, HistoricalSeries> {
        Box::pin(self.fetch_daily_history(req))
    }
}

/// Turns a chart payload into daily rows, dropping days without an adjusted close.
///
/// Dates are taken in the exchange's local time (`meta.gmtoffset`) so a session that opens
/// late in UTC keeps its own trading date.
fn parse_chart_body(body: &str) -> Result<Vec<PriceRow>, SourceError> {
    let parsed: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = parsed.chart.error {
        return Err(SourceError::no_data("yahoo chart API error").with_detail(error.to_string()));
    }

    let result = parsed
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::malformed("no chart result in yahoo response"))?;

    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let offset = Duration::seconds(result.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0));
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .and_then(|blocks| blocks.into_iter().next())
        .map(|block| block.adjclose);
    if adjclose.is_none() {
        debug!("yahoo chart has no adjclose block; using close");
    }

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.into_iter().enumerate() {
        let close = quote.close.get(i).copied().flatten();
        let adj_close = match &adjclose {
            Some(values) => values.get(i).copied().flatten(),
            None => close,
        };
        let Some(adj_close) = adj_close.filter(|value| value.is_finite()) else {
            continue;
        };

        let date = OffsetDateTime::from_unix_timestamp(ts)
            .map_err(|e| SourceError::malformed(format!("invalid timestamp {ts}: {e}")))?
            .saturating_add(offset)
            .date();
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map(|value| value.round() as u64);

        rows.push(PriceRow::new(date, close, adj_close, volume));
    }

    Ok(rows)
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    description: String,
}

impl std::fmt::Display for YahooChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description, self.code)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Option<Vec<YahooChartAdjClose>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use time::macros::date;

    #[test]
    fn rows_without_adjusted_close_are_dropped() {
        let body = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": -18000},
            "timestamp": [1704205800, 1704292200, 1704378600],
            "indicators": {
                "quote": [{"close": [185.64, null, 181.91], "volume": [82488700, 58414500, null]}],
                "adjclose": [{"adjclose": [184.73, null, 181.02]}]
            }
        }], "error": null}}"#;

        let rows = parse_chart_body(body).expect("chart should parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date!(2024 - 01 - 02));
        assert_eq!(rows[0].adj_close, 184.73);
        assert_eq!(rows[0].volume, Some(82_488_700));
        assert_eq!(rows[1].date, date!(2024 - 01 - 04));
        assert_eq!(rows[1].volume, None);
    }

    #[test]
    fn close_is_used_when_adjclose_block_is_missing() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1704205800],
            "indicators": {"quote": [{"close": [185.64], "volume": [1]}]}
        }]}}"#;

        let rows = parse_chart_body(body).expect("chart should parse");
        assert_eq!(rows[0].adj_close, 185.64);
    }

    #[test]
    fn chart_error_payload_is_reported() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;

        let error = parse_chart_body(body).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert!(error.message().contains("symbol may be delisted"));
    }

    #[test]
    fn missing_timestamps_mean_no_rows() {
        let body = r#"{"chart": {"result": [{"indicators": {"quote": [{}]}}]}}"#;
        assert!(parse_chart_body(body).expect("parses").is_empty());
    }
}

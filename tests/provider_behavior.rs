//! Behavior-driven tests for symbol resolution and quote fetching.
//!
//! Every test runs offline against a `CannedHttpClient` that replays scripted provider
//! responses and records the requests it was sent.

use std::sync::Arc;

use tickerscope_core::{
    AlphaVantageAdapter, CannedHttpClient, DateRange, HistoricalAnalyzer, HttpError,
    HttpResponse, NotFoundReason, ProviderConfig, QuoteFetcher, Resolution, SourceErrorKind,
    Symbol, SymbolResolver, YahooAdapter, DEFAULT_START_DATE,
};

fn alphavantage(client: &CannedHttpClient) -> Arc<AlphaVantageAdapter> {
    Arc::new(AlphaVantageAdapter::with_http_client(
        Arc::new(client.clone()),
        ProviderConfig::new("test-key"),
    ))
}

fn resolver(client: &CannedHttpClient) -> SymbolResolver {
    SymbolResolver::new(alphavantage(client))
}

// =============================================================================
// SymbolResolver
// =============================================================================

#[tokio::test]
async fn when_search_has_matches_resolver_returns_first_symbol() {
    // Given: Alpha Vantage ranks two listings for the company
    let client = CannedHttpClient::new().with_json(
        r#"{"bestMatches": [
            {"1. symbol": "IBM", "2. name": "International Business Machines Corp",
             "3. type": "Equity", "4. region": "United States", "8. currency": "USD",
             "9. matchScore": "1.0000"},
            {"1. symbol": "IBML", "2. name": "iShares iBonds Dec 2023 Term Muni Bond ETF"}
        ]}"#,
    );

    // When: The user types the company name
    let resolution = resolver(&client).resolve("International Business Machines").await;

    // Then: The first match's symbol is returned
    match resolution {
        Resolution::Found { symbol, best_match } => {
            assert_eq!(symbol.as_str(), "IBM");
            assert_eq!(
                best_match.name.as_deref(),
                Some("International Business Machines Corp")
            );
        }
        other => panic!("expected a resolved symbol, got {other:?}"),
    }

    // And: The request carried the encoded keywords and the configured key
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let expected_query =
        "function=SYMBOL_SEARCH&keywords=International%20Business%20Machines&apikey=test-key";
    assert!(requests[0].url.contains(expected_query));
}

#[tokio::test]
async fn when_match_list_is_empty_resolver_reports_no_match() {
    // Given: A search with no hits
    let client = CannedHttpClient::new().with_json(r#"{"bestMatches": []}"#);

    // When: The name is resolved
    let resolution = resolver(&client).resolve("Nonexistent Widgets Ltd").await;

    // Then: The not-found sentinel carries the no-match message
    let Resolution::NotFound(reason) = resolution else {
        panic!("empty match list must not resolve");
    };
    assert_eq!(reason, NotFoundReason::NoMatches { notice: None });
    assert_eq!(reason.to_string(), "No matching ticker found.");
}

#[tokio::test]
async fn when_match_list_is_missing_resolver_reports_no_match_with_notice() {
    // Given: The provider throttled the call and sent a note instead of matches
    let client = CannedHttpClient::new()
        .with_json(r#"{"Information": "Our standard API rate limit is 25 requests per day."}"#);

    // When: The name is resolved
    let resolution = resolver(&client).resolve("Apple").await;

    // Then: It is a no-match, and the notice is kept for the user
    match resolution {
        Resolution::NotFound(NotFoundReason::NoMatches { notice: Some(notice) }) => {
            assert!(notice.contains("25 requests per day"));
        }
        other => panic!("expected no-match with notice, got {other:?}"),
    }
}

#[tokio::test]
async fn when_status_is_not_success_resolver_returns_sentinel_without_parsing() {
    // Given: A 503 whose body would otherwise parse into a valid match
    let client = CannedHttpClient::new().with_response(HttpResponse::new(
        503,
        r#"{"bestMatches": [{"1. symbol": "IBM"}]}"#,
    ));

    // When: The name is resolved
    let resolution = resolver(&client).resolve("IBM").await;

    // Then: The status is reported and the body is ignored
    assert_eq!(resolution, Resolution::NotFound(NotFoundReason::Status(503)));
    assert_eq!(
        NotFoundReason::Status(503).to_string(),
        "Request failed with status code 503"
    );
}

#[tokio::test]
async fn when_body_is_not_json_resolver_reports_parse_failure() {
    // Given: An HTML maintenance page with a 200 status
    let client = CannedHttpClient::new().with_json("<html>maintenance</html>");

    // When: The name is resolved
    let resolution = resolver(&client).resolve("IBM").await;

    // Then: A parse failure is reported
    match resolution {
        Resolution::NotFound(reason @ NotFoundReason::Malformed(_)) => {
            assert!(reason
                .to_string()
                .starts_with("An error occurred while parsing the JSON data:"));
        }
        other => panic!("expected malformed reason, got {other:?}"),
    }
}

#[tokio::test]
async fn when_first_match_has_no_symbol_resolver_reports_parse_failure() {
    // Given: A match entry missing its symbol key
    let client = CannedHttpClient::new().with_json(r#"{"bestMatches": [{"2. name": "IBM"}]}"#);

    // When / Then
    let resolution = resolver(&client).resolve("IBM").await;
    assert!(matches!(
        resolution,
        Resolution::NotFound(NotFoundReason::Malformed(_))
    ));
}

#[tokio::test]
async fn when_transport_fails_resolver_reports_request_failure() {
    // Given: The connection cannot be established
    let client = CannedHttpClient::new().with_error(HttpError::new("connection refused"));

    // When / Then
    let resolution = resolver(&client).resolve("IBM").await;
    match resolution {
        Resolution::NotFound(NotFoundReason::Transport(message)) => {
            assert!(message.contains("connection refused"));
        }
        other => panic!("expected transport reason, got {other:?}"),
    }
}

#[tokio::test]
async fn when_company_name_is_blank_no_request_is_sent() {
    let client = CannedHttpClient::new();

    let resolution = resolver(&client).resolve("   ").await;

    assert_eq!(resolution, Resolution::NotFound(NotFoundReason::EmptyQuery));
    assert!(client.requests().is_empty());
}

// =============================================================================
// QuoteFetcher
// =============================================================================

#[tokio::test]
async fn when_global_quote_is_well_formed_fetcher_returns_fields_unchanged() {
    // Given: A complete Global Quote payload
    let client = CannedHttpClient::new().with_json(
        r#"{"Global Quote": {
            "01. symbol": "IBM", "02. open": "186.2000", "03. high": "188.0000",
            "04. low": "184.1000", "05. price": "187.2100", "06. volume": "4218400",
            "07. latest trading day": "2024-05-03", "08. previous close": "185.0000",
            "09. change": "2.2100", "10. change percent": "1.1946%"
        }}"#,
    );
    let fetcher = QuoteFetcher::new(alphavantage(&client));
    let symbol = Symbol::parse("IBM").expect("valid");

    // When: The quote is fetched
    let quote = fetcher.fetch(&symbol).await.expect("quote should parse");

    // Then: Every field is carried over verbatim
    assert_eq!(quote.symbol.as_deref(), Some("IBM"));
    assert_eq!(quote.open.as_deref(), Some("186.2000"));
    assert_eq!(quote.high.as_deref(), Some("188.0000"));
    assert_eq!(quote.low.as_deref(), Some("184.1000"));
    assert_eq!(quote.price.as_deref(), Some("187.2100"));
    assert_eq!(quote.volume.as_deref(), Some("4218400"));
    assert_eq!(quote.latest_trading_day.as_deref(), Some("2024-05-03"));
    assert_eq!(quote.previous_close.as_deref(), Some("185.0000"));
    assert_eq!(quote.change.as_deref(), Some("2.2100"));
    assert_eq!(quote.change_percent.as_deref(), Some("1.1946%"));

    let url = &client.requests()[0].url;
    assert!(url.contains("function=GLOBAL_QUOTE&symbol=IBM&apikey=test-key"));
}

#[tokio::test]
async fn when_global_quote_key_is_missing_fetcher_fails_hard() {
    // Given: A throttling note in place of the quote
    let client = CannedHttpClient::new()
        .with_json(r#"{"Note": "Thank you for using Alpha Vantage! 5 calls per minute."}"#);
    let fetcher = QuoteFetcher::new(alphavantage(&client));
    let symbol = Symbol::parse("IBM").expect("valid");

    // When
    let error = fetcher.fetch(&symbol).await.expect_err("missing quote must fail");

    // Then: The failure propagates with the provider's note
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert!(error.message().contains("5 calls per minute"));
}

// =============================================================================
// HistoricalAnalyzer download path
// =============================================================================

#[tokio::test]
async fn when_yahoo_rejects_symbol_analyzer_fails_with_status_detail() {
    // Given: Yahoo answers 404 with its chart error object
    let client = CannedHttpClient::new().with_response(HttpResponse::new(
        404,
        r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#,
    ));
    let yahoo = YahooAdapter::with_http_client(Arc::new(client.clone()), ProviderConfig::default());
    let analyzer = HistoricalAnalyzer::new(Arc::new(yahoo));
    let range = DateRange::until_today(DEFAULT_START_DATE).expect("range");

    // When
    let error = analyzer
        .analyze(Symbol::parse("ZZZZ").expect("valid"), range)
        .await
        .expect_err("404 must fail");

    // Then
    assert_eq!(error.kind(), SourceErrorKind::Status);
    assert_eq!(error.http_status(), Some(404));
    assert!(error.message().contains("symbol may be delisted"));

    let url = &client.requests()[0].url;
    assert!(url.starts_with(
        "https://query1.finance.yahoo.com/v8/finance/chart/ZZZZ?period1=1577836800&period2="
    ));
    assert!(url.contains("interval=1d"));
}

#[tokio::test]
async fn when_yahoo_returns_no_rows_analyzer_reports_no_data() {
    let client = CannedHttpClient::new().with_json(
        r#"{"chart": {"result": [{"timestamp": [], "indicators": {"quote": [{}]}}], "error": null}}"#,
    );
    let yahoo = YahooAdapter::with_http_client(Arc::new(client), ProviderConfig::default());
    let analyzer = HistoricalAnalyzer::new(Arc::new(yahoo));
    let range = DateRange::until_today(DEFAULT_START_DATE).expect("range");

    let error = analyzer
        .analyze(Symbol::parse("IBM").expect("valid"), range)
        .await
        .expect_err("empty series must fail");

    assert_eq!(error.kind(), SourceErrorKind::NoData);
}

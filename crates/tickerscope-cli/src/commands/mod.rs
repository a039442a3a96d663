mod analyze;
mod interactive;
mod live;
mod resolve;

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, warn};

use tickerscope_core::{
    AlphaVantageAdapter, HistoricalAnalyzer, HttpClient, ProviderConfig, QuoteFetcher,
    ReqwestHttpClient, SymbolResolver, YahooAdapter, DEMO_API_KEY,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Provider wiring shared by every command.
pub struct AppContext {
    config: ProviderConfig,
    pub json: bool,
    http_client: Arc<dyn HttpClient>,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Self {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(DEMO_API_KEY);
        let config = ProviderConfig::new(api_key).with_timeout_ms(cli.timeout_ms);
        if config.uses_demo_key() {
            warn!("using the Alpha Vantage demo key; most symbols will return no data");
        }
        debug!(?config, "provider configuration");

        Self::new(config, Arc::new(ReqwestHttpClient::new()), cli.json)
    }

    pub fn new(config: ProviderConfig, http_client: Arc<dyn HttpClient>, json: bool) -> Self {
        Self {
            config,
            json,
            http_client,
        }
    }

    fn alphavantage(&self) -> Arc<AlphaVantageAdapter> {
        Arc::new(AlphaVantageAdapter::with_http_client(
            Arc::clone(&self.http_client),
            self.config.clone(),
        ))
    }

    pub fn resolver(&self) -> SymbolResolver {
        SymbolResolver::new(self.alphavantage())
    }

    pub fn quote_fetcher(&self) -> QuoteFetcher {
        QuoteFetcher::new(self.alphavantage())
    }

    pub fn analyzer(&self) -> HistoricalAnalyzer {
        HistoricalAnalyzer::new(Arc::new(YahooAdapter::with_http_client(
            Arc::clone(&self.http_client),
            self.config.clone(),
        )))
    }
}

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let ctx = AppContext::from_cli(cli);

    match &cli.command {
        None => interactive::run(&ctx).await,
        Some(Command::Resolve(args)) => resolve::run(args, &ctx).await,
        Some(Command::Live(args)) => live::run(args, &ctx).await,
        Some(Command::Analyze(args)) => analyze::run(args, &ctx).await,
    }
}

use std::fmt::{Debug, Formatter};

use crate::http_client::DEFAULT_TIMEOUT_MS;

/// Environment variable holding the Alpha Vantage API key.
pub const API_KEY_ENV: &str = "TICKERSCOPE_ALPHAVANTAGE_API_KEY";

/// Key Alpha Vantage accepts for its documented sample symbols.
pub const DEMO_API_KEY: &str = "demo";

pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Settings shared by the provider adapters, built once and passed in at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub alphavantage_base_url: String,
    pub yahoo_base_url: String,
    pub timeout_ms: u64,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            alphavantage_base_url: String::from(ALPHAVANTAGE_BASE_URL),
            yahoo_base_url: String::from(YAHOO_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_alphavantage_base_url(mut self, url: impl Into<String>) -> Self {
        self.alphavantage_base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn with_yahoo_base_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(DEMO_API_KEY)
    }
}

impl Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("alphavantage_base_url", &self.alphavantage_base_url)
            .field("yahoo_base_url", &self.yahoo_base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

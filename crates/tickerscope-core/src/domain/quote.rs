use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Text shown for any quote field the provider left out.
pub const PLACEHOLDER: &str = "N/A";

/// Current-quote record, field for field as the provider sent it.
///
/// Values stay as the provider's text so nothing is lost or reformatted on the way to the
/// terminal. The serde names are the Alpha Vantage `Global Quote` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol", default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "02. open", default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(rename = "03. high", default, skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
    #[serde(rename = "04. low", default, skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
    #[serde(rename = "05. price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(rename = "06. volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(
        rename = "07. latest trading day",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_trading_day: Option<String>,
    #[serde(
        rename = "08. previous close",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change", default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(
        rename = "10. change percent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub change_percent: Option<String>,
}

impl GlobalQuote {
    /// True when the provider answered with an empty object, which is what Alpha Vantage
    /// does for symbols it does not quote.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn price_or_placeholder(&self) -> &str {
        or_placeholder(&self.price)
    }

    pub fn previous_close_or_placeholder(&self) -> &str {
        or_placeholder(&self.previous_close)
    }

    pub fn volume_or_placeholder(&self) -> &str {
        or_placeholder(&self.volume)
    }

    /// `"<high> - <low>"`, each side falling back to the placeholder on its own.
    pub fn day_range(&self) -> String {
        format!("{} - {}", or_placeholder(&self.high), or_placeholder(&self.low))
    }

    /// Renders the live quote block printed on every polling tick.
    pub fn live_block<'a>(&'a self, symbol: &'a str) -> LiveBlock<'a> {
        LiveBlock {
            symbol,
            quote: self,
        }
    }
}

fn or_placeholder(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}

/// Display adapter for one polling tick.
pub struct LiveBlock<'a> {
    symbol: &'a str,
    quote: &'a GlobalQuote,
}

impl Display for LiveBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Live Stock Data for {}:", self.symbol)?;
        writeln!(f, "Last Price: {}", self.quote.price_or_placeholder())?;
        writeln!(f, "Previous Close: {}", self.quote.previous_close_or_placeholder())?;
        writeln!(f, "Day Range: {}", self.quote.day_range())?;
        writeln!(f, "Volume: {}", self.quote.volume_or_placeholder())?;
        write!(f, "{}", "-".repeat(30))
    }
}

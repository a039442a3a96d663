//! Live quote polling.
//!
//! [`LiveQuotePrinter`] fetches a quote, prints it, sleeps, and repeats. Without an
//! iteration limit it never returns on its own; callers race it against a shutdown signal.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::data_source::{QuoteSource, SourceError};
use crate::{GlobalQuote, Symbol, ValidationError};

/// Default pause between polls.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Suspends the polling loop between fetches.
pub trait Sleeper: Send + Sync {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Wall-clock sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Thin wrapper that fetches one quote and logs it.
#[derive(Clone)]
pub struct QuoteFetcher {
    source: Arc<dyn QuoteSource>,
}

impl QuoteFetcher {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Returns the provider's quote fields unchanged.
    pub async fn fetch(&self, symbol: &Symbol) -> Result<GlobalQuote, SourceError> {
        let quote = self.source.quote(symbol).await?;
        debug!(provider = %self.source.id(), %symbol, empty = quote.is_empty(), "quote fetched");
        Ok(quote)
    }
}

/// How each tick is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveFormat {
    /// Human-readable block per tick.
    #[default]
    Text,
    /// One JSON object per line.
    JsonLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveOptions {
    pub interval: Duration,
    /// Stop after this many fetches; `None` polls forever.
    pub max_iterations: Option<usize>,
    pub format: LiveFormat,
}

impl LiveOptions {
    pub fn new(interval: Duration) -> Result<Self, ValidationError> {
        if interval.is_zero() {
            return Err(ValidationError::ZeroInterval);
        }
        Ok(Self {
            interval,
            max_iterations: None,
            format: LiveFormat::Text,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_format(mut self, format: LiveFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            max_iterations: None,
            format: LiveFormat::Text,
        }
    }
}

/// Summary of a bounded polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveReport {
    pub iterations: usize,
    pub empty_quotes: usize,
}

#[derive(Debug, Error)]
pub enum LiveError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to write quote output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to encode quote: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct LiveTick<'a> {
    symbol: &'a str,
    iteration: usize,
    quote: &'a GlobalQuote,
}

/// Polls [`QuoteFetcher`] on a fixed interval and prints every result.
pub struct LiveQuotePrinter {
    fetcher: QuoteFetcher,
    sleeper: Arc<dyn Sleeper>,
    options: LiveOptions,
}

impl LiveQuotePrinter {
    pub fn new(fetcher: QuoteFetcher, sleeper: Arc<dyn Sleeper>, options: LiveOptions) -> Self {
        Self {
            fetcher,
            sleeper,
            options,
        }
    }

    /// Runs the loop. A fetch failure ends it with that error; the sleep only happens
    /// between fetches, never after the last one of a bounded run.
    pub async fn run<W: Write>(
        &self,
        symbol: &Symbol,
        out: &mut W,
    ) -> Result<LiveReport, LiveError> {
        let mut report = LiveReport::default();
        info!(
            %symbol,
            interval_secs = self.options.interval.as_secs_f64(),
            max_iterations = ?self.options.max_iterations,
            "starting live quotes"
        );

        loop {
            if self
                .options
                .max_iterations
                .is_some_and(|max| report.iterations >= max)
            {
                return Ok(report);
            }

            let quote = self.fetcher.fetch(symbol).await?;
            report.iterations += 1;
            if quote.is_empty() {
                report.empty_quotes += 1;
            }
            self.write_tick(symbol, report.iterations, &quote, out)?;

            let finished = self
                .options
                .max_iterations
                .is_some_and(|max| report.iterations >= max);
            if finished {
                return Ok(report);
            }
            self.sleeper.sleep(self.options.interval).await;
        }
    }

    fn write_tick<W: Write>(
        &self,
        symbol: &Symbol,
        iteration: usize,
        quote: &GlobalQuote,
        out: &mut W,
    ) -> Result<(), LiveError> {
        // Rendered up front so each tick reaches the sink in a single write.
        let rendered = match self.options.format {
            LiveFormat::Text if quote.is_empty() => {
                format!("No data available for {symbol} at this time.\n")
            }
            LiveFormat::Text => format!("{}\n", quote.live_block(symbol.as_str())),
            LiveFormat::JsonLines => {
                let tick = LiveTick {
                    symbol: symbol.as_str(),
                    iteration,
                    quote,
                };
                format!("{}\n", serde_json::to_string(&tick)?)
            }
        };
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

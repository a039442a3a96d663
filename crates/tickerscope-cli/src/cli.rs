//! CLI argument definitions for tickerscope.
//!
//! Without a subcommand the tool runs the interactive session: it asks for a company name,
//! resolves the ticker, then asks whether to stream live quotes or run the historical
//! analysis.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | (none) | Interactive session |
//! | `resolve` | Company name to ticker symbol |
//! | `live` | Poll and print the current quote |
//! | `analyze` | Daily history statistics and chart |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--api-key` | `$TICKERSCOPE_ALPHAVANTAGE_API_KEY` or `demo` | Alpha Vantage key |
//! | `--timeout-ms` | `10000` | Per-request timeout |
//! | `--json` | `false` | Machine-readable output |
//! | `-v` | warn | Log verbosity on stderr (`-v` info, `-vv` debug) |
//!
//! # Examples
//!
//! ```bash
//! tickerscope
//! tickerscope resolve international business machines
//! tickerscope live IBM --interval-secs 60 --iterations 10
//! tickerscope analyze IBM --start 2021-01-01 --chart ibm.svg
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use tickerscope_core::{API_KEY_ENV, DEFAULT_START_DATE};

/// Stock ticker lookup, live quotes and price history analysis.
#[derive(Debug, Parser)]
#[command(
    name = "tickerscope",
    author,
    version,
    about = "Stock ticker lookup, live quotes and price history analysis",
    long_about = "tickerscope resolves a company name to its ticker symbol via Alpha Vantage, \
then either polls the live quote or downloads daily history from Yahoo Finance to report \
average volume, volatility and 100/200-day moving averages with an SVG chart.\n\
\n\
Run without a command for the interactive session."
)]
pub struct Cli {
    /// Alpha Vantage API key.
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Increase log verbosity (repeatable). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🔍 Resolve a company name to its best-matching ticker symbol.
    ///
    /// # Examples
    ///
    ///   tickerscope resolve apple
    ///   tickerscope resolve "tesco plc" --json
    Resolve(ResolveArgs),

    /// 💰 Print the live quote on a fixed polling interval.
    ///
    /// Runs until Ctrl-C unless --iterations is given.
    ///
    /// # Examples
    ///
    ///   tickerscope live IBM
    ///   tickerscope live IBM --interval-secs 60 --iterations 5
    Live(LiveArgs),

    /// 📈 Analyze daily price history and render a chart.
    ///
    /// # Examples
    ///
    ///   tickerscope analyze IBM
    ///   tickerscope analyze MSFT --start 2022-01-01 --chart msft.svg
    Analyze(AnalyzeArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Company name; several words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub company: Vec<String>,
}

impl ResolveArgs {
    pub fn company_name(&self) -> String {
        self.company.join(" ")
    }
}

/// Polling options shared by `live` and the interactive session.
#[derive(Debug, Clone, Args)]
pub struct LiveOptionsArgs {
    /// Seconds between quote fetches.
    #[arg(long, default_value_t = 30)]
    pub interval_secs: u64,

    /// Stop after this many fetches (default: run until Ctrl-C).
    #[arg(long)]
    pub iterations: Option<usize>,
}

impl Default for LiveOptionsArgs {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            iterations: None,
        }
    }
}

/// Arguments for the `live` command.
#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Ticker symbol (e.g., IBM).
    pub symbol: String,

    #[command(flatten)]
    pub options: LiveOptionsArgs,
}

/// Analysis options shared by `analyze` and the interactive session.
#[derive(Debug, Clone, Args)]
pub struct AnalyzeOptionsArgs {
    /// First day of the history window (YYYY-MM-DD).
    #[arg(long, default_value_t = DEFAULT_START_DATE.to_string())]
    pub start: String,

    /// Day after the last one included (YYYY-MM-DD, default: today UTC).
    #[arg(long)]
    pub end: Option<String>,

    /// Where to write the SVG chart (default: <SYMBOL>_analysis.svg).
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Skip chart rendering.
    #[arg(long, default_value_t = false, conflicts_with = "chart")]
    pub no_chart: bool,
}

impl Default for AnalyzeOptionsArgs {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_DATE.to_string(),
            end: None,
            chart: None,
            no_chart: false,
        }
    }
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol (e.g., IBM).
    pub symbol: String,

    #[command(flatten)]
    pub options: AnalyzeOptionsArgs,
}

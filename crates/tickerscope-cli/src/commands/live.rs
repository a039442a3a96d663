use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tickerscope_core::{LiveFormat, LiveOptions, LiveQuotePrinter, Symbol, TokioSleeper};

use crate::cli::{LiveArgs, LiveOptionsArgs};
use crate::error::CliError;

use super::AppContext;

pub async fn run(args: &LiveArgs, ctx: &AppContext) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    stream(ctx, &symbol, &args.options, ctx.json, &mut io::stdout()).await?;
    Ok(ExitCode::SUCCESS)
}

pub(super) fn live_options(args: &LiveOptionsArgs, json: bool) -> Result<LiveOptions, CliError> {
    let format = if json {
        LiveFormat::JsonLines
    } else {
        LiveFormat::Text
    };
    Ok(LiveOptions::new(Duration::from_secs(args.interval_secs))?
        .with_max_iterations(args.iterations)
        .with_format(format))
}

/// Prints quotes until the iteration limit or Ctrl-C.
pub(super) async fn stream<W: Write>(
    ctx: &AppContext,
    symbol: &Symbol,
    args: &LiveOptionsArgs,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let printer = LiveQuotePrinter::new(
        ctx.quote_fetcher(),
        Arc::new(TokioSleeper),
        live_options(args, json)?,
    );

    tokio::select! {
        result = printer.run(symbol, out) => {
            let report = result?;
            info!(
                iterations = report.iterations,
                empty_quotes = report.empty_quotes,
                "live quotes finished"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            info!(%symbol, "interrupted, stopping live quotes");
        }
    }

    Ok(())
}

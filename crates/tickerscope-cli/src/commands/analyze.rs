use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::json;
use tracing::info;

use tickerscope_core::{parse_date, AnalysisSummary, DateRange, HistoricalAnalysis, Symbol};

use crate::chart;
use crate::cli::{AnalyzeArgs, AnalyzeOptionsArgs};
use crate::error::CliError;

use super::AppContext;

pub async fn run(args: &AnalyzeArgs, ctx: &AppContext) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let mut stdout = io::stdout().lock();
    report(ctx, symbol, &args.options, ctx.json, &mut stdout).await?;
    Ok(ExitCode::SUCCESS)
}

/// Downloads and analyzes the series, prints the statistics, then writes the chart.
pub(super) async fn report<W: Write>(
    ctx: &AppContext,
    symbol: Symbol,
    args: &AnalyzeOptionsArgs,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let range = date_range(args)?;
    let analysis = ctx.analyzer().analyze(symbol, range).await?;
    let chart_path = (!args.no_chart).then(|| {
        args.chart
            .clone()
            .unwrap_or_else(|| default_chart_path(&analysis.summary.symbol))
    });

    // The JSON document names the chart, so it is only written once the chart exists.
    if json {
        if let Some(path) = chart_path.as_deref() {
            render_chart(&analysis, path)?;
        }
        let value = json!({
            "summary": analysis.summary,
            "chart": chart_path.as_ref().map(|path| path.display().to_string()),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    write_statistics(&analysis.summary, out)?;
    out.flush()?;
    if let Some(path) = chart_path {
        render_chart(&analysis, &path)?;
        writeln!(out, "Chart saved to {}", path.display())?;
    }
    Ok(())
}

fn render_chart(analysis: &HistoricalAnalysis, path: &Path) -> Result<(), CliError> {
    chart::render_analysis_chart(analysis, path)?;
    info!(path = %path.display(), "chart written");
    Ok(())
}

fn date_range(args: &AnalyzeOptionsArgs) -> Result<DateRange, CliError> {
    let start = parse_date(&args.start)?;
    let range = match args.end.as_deref() {
        Some(end) => DateRange::new(start, parse_date(end)?)?,
        None => DateRange::until_today(start)?,
    };
    Ok(range)
}

fn default_chart_path(symbol: &Symbol) -> PathBuf {
    PathBuf::from(format!("{}_analysis.svg", symbol.as_str()))
}

fn write_statistics<W: Write>(summary: &AnalysisSummary, out: &mut W) -> Result<(), CliError> {
    match summary.average_volume {
        Some(volume) => writeln!(out, "Average daily volume: {volume:.2}")?,
        None => writeln!(out, "Average daily volume: N/A")?,
    }
    match summary.volatility {
        Some(volatility) => writeln!(out, "Stock volatility: {:.2}%", volatility * 100.0)?,
        None => writeln!(out, "Stock volatility: N/A")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tickerscope_core::{CannedHttpClient, ProviderConfig, SeriesSpan};
    use time::macros::date;

    const THREE_DAYS: &str = r#"{"chart": {"result": [{
        "meta": {"gmtoffset": -18000},
        "timestamp": [1704205800, 1704292200, 1704378600],
        "indicators": {
            "quote": [{"close": [100.0, 110.0, 121.0], "volume": [10, 20, 30]}],
            "adjclose": [{"adjclose": [100.0, 110.0, 121.0]}]
        }
    }], "error": null}}"#;

    fn summary() -> AnalysisSummary {
        AnalysisSummary {
            symbol: Symbol::parse("IBM").expect("valid"),
            span: SeriesSpan {
                rows: 3,
                first: Some(date!(2024 - 01 - 02)),
                last: Some(date!(2024 - 01 - 04)),
            },
            average_volume: Some(4_321_987.5),
            volatility: Some(0.014_26),
            latest_adj_close: Some(187.5),
            latest_ma_short: None,
            latest_ma_long: None,
        }
    }

    fn options_with_chart(chart: PathBuf) -> AnalyzeOptionsArgs {
        AnalyzeOptionsArgs {
            end: Some(String::from("2024-01-05")),
            chart: Some(chart),
            ..AnalyzeOptionsArgs::default()
        }
    }

    #[test]
    fn text_statistics_use_two_decimals_and_percent() {
        let mut out = Vec::new();
        write_statistics(&summary(), &mut out).expect("write");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Average daily volume: 4321987.50\nStock volatility: 1.43%\n"
        );
    }

    #[test]
    fn missing_statistics_print_placeholder() {
        let mut summary = summary();
        summary.average_volume = None;
        summary.volatility = None;
        let mut out = Vec::new();
        write_statistics(&summary, &mut out).expect("write");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Average daily volume: N/A\nStock volatility: N/A\n"
        );
    }

    #[test]
    fn default_chart_is_named_after_symbol() {
        let symbol = Symbol::parse("tsco.lon").expect("valid");
        assert_eq!(default_chart_path(&symbol), PathBuf::from("TSCO.LON_analysis.svg"));
    }

    #[test]
    fn explicit_end_must_follow_start() {
        let args = AnalyzeOptionsArgs {
            start: String::from("2024-01-05"),
            end: Some(String::from("2024-01-01")),
            ..AnalyzeOptionsArgs::default()
        };
        let error = date_range(&args).expect_err("inverted range");
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn report_prints_statistics_then_chart_path() {
        // Given: Yahoo returns three days
        let client = CannedHttpClient::new().with_json(THREE_DAYS);
        let ctx = AppContext::new(ProviderConfig::default(), Arc::new(client), false);
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("IBM_analysis.svg");

        // When
        let mut out = Vec::new();
        report(
            &ctx,
            Symbol::parse("IBM").expect("valid"),
            &options_with_chart(path.clone()),
            false,
            &mut out,
        )
        .await
        .expect("report should succeed");

        // Then
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            format!(
                "Average daily volume: 20.00\nStock volatility: 0.00%\nChart saved to {}\n",
                path.display()
            )
        );
        assert!(path.exists());
    }

    #[tokio::test]
    async fn statistics_survive_a_chart_write_failure() {
        // Given: The chart path points into a directory that does not exist
        let client = CannedHttpClient::new().with_json(THREE_DAYS);
        let ctx = AppContext::new(ProviderConfig::default(), Arc::new(client), false);
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("chart.svg");

        // When
        let mut out = Vec::new();
        let error = report(
            &ctx,
            Symbol::parse("IBM").expect("valid"),
            &options_with_chart(path),
            false,
            &mut out,
        )
        .await
        .expect_err("chart write must fail");

        // Then: The statistics were already printed
        assert_eq!(error.exit_code(), 11);
        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.starts_with("Average daily volume: 20.00\n"));
        assert!(!printed.contains("Chart saved to"));
    }
}

//! Descriptive statistics over a daily price series.
//!
//! Undefined values are `None` rather than NaN: the first daily return, and every rolling
//! mean whose window does not yet have enough rows behind it.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::data_source::{HistoryRequest, HistorySource, SourceError};
use crate::{DateRange, HistoricalSeries, SeriesSpan, Symbol, ValidationError};

/// Window of the short moving average, in trading days.
pub const SHORT_WINDOW: usize = 100;
/// Window of the long moving average, in trading days.
pub const LONG_WINDOW: usize = 200;

/// Fractional change from the previous value; `None` for the first value and after a zero.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    if values.is_empty() {
        return changes;
    }
    changes.push(None);
    changes.extend(values.windows(2).map(|pair| {
        let (previous, current) = (pair[0], pair[1]);
        (previous != 0.0).then(|| current / previous - 1.0)
    }));
    changes
}

/// Trailing arithmetic mean. Row `i` is defined once `i >= window - 1`.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>, ValidationError> {
    if window == 0 {
        return Err(ValidationError::ZeroWindow);
    }

    Ok((0..values.len())
        .map(|i| {
            (i + 1 >= window).then(|| {
                let slice = &values[i + 1 - window..=i];
                slice.iter().sum::<f64>() / window as f64
            })
        })
        .collect())
}

/// Mean of the values, `None` when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let center = mean(values.iter().copied())?;
    let squares = values.iter().map(|value| (value - center).powi(2)).sum::<f64>();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

/// Per-row columns derived from the adjusted close.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumns {
    pub daily_returns: Vec<Option<f64>>,
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
}

/// Headline numbers printed after an analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub symbol: Symbol,
    pub span: SeriesSpan,
    pub average_volume: Option<f64>,
    /// Standard deviation of daily returns, as a fraction.
    pub volatility: Option<f64>,
    pub latest_adj_close: Option<f64>,
    pub latest_ma_short: Option<f64>,
    pub latest_ma_long: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalAnalysis {
    pub series: HistoricalSeries,
    pub derived: DerivedColumns,
    pub summary: AnalysisSummary,
}

/// Computes every derived column and the summary for a series.
pub fn analyze_series(series: HistoricalSeries) -> HistoricalAnalysis {
    let closes = series.adj_closes();

    let daily_returns = pct_change(&closes);
    // Both windows are non-zero constants.
    let ma_short = rolling_mean(&closes, SHORT_WINDOW).unwrap_or_default();
    let ma_long = rolling_mean(&closes, LONG_WINDOW).unwrap_or_default();

    let returns = daily_returns.iter().flatten().copied().collect::<Vec<_>>();
    let summary = AnalysisSummary {
        symbol: series.symbol.clone(),
        span: SeriesSpan::from(&series),
        average_volume: mean(
            series
                .rows
                .iter()
                .filter_map(|row| row.volume)
                .map(|volume| volume as f64),
        ),
        volatility: sample_std_dev(&returns),
        latest_adj_close: closes.last().copied(),
        latest_ma_short: ma_short.last().copied().flatten(),
        latest_ma_long: ma_long.last().copied().flatten(),
    };

    HistoricalAnalysis {
        series,
        derived: DerivedColumns {
            daily_returns,
            ma_short,
            ma_long,
        },
        summary,
    }
}

/// Downloads a daily series and analyzes it.
#[derive(Clone)]
pub struct HistoricalAnalyzer {
    source: Arc<dyn HistorySource>,
}

impl HistoricalAnalyzer {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self { source }
    }

    pub async fn analyze(
        &self,
        symbol: Symbol,
        range: DateRange,
    ) -> Result<HistoricalAnalysis, SourceError> {
        info!(
            provider = %self.source.id(),
            %symbol,
            start = %range.start,
            end = %range.end,
            "downloading history"
        );
        let series = self
            .source
            .daily_history(HistoryRequest::new(symbol, range))
            .await?;

        let analysis = analyze_series(series);
        info!(
            symbol = %analysis.summary.symbol,
            rows = analysis.summary.span.rows,
            "history analyzed"
        );
        Ok(analysis)
    }
}

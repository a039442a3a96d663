//! SVG rendering of an analyzed series.

use std::path::Path;

use plotters::prelude::*;

use tickerscope_core::HistoricalAnalysis;

use crate::error::CliError;

const CHART_SIZE: (u32, u32) = (1280, 720);
const MA_SHORT_COLOR: RGBColor = RGBColor(230, 126, 34);
const MA_LONG_COLOR: RGBColor = RGBColor(192, 57, 43);

fn chart_error(error: impl std::fmt::Display) -> CliError {
    CliError::Chart(error.to_string())
}

/// Draws adjusted close with both moving averages and a legend.
///
/// The x axis is the row index; tick labels show the row's date so that non-trading days
/// leave no gaps.
pub fn render_analysis_chart(analysis: &HistoricalAnalysis, path: &Path) -> Result<(), CliError> {
    let rows = &analysis.series.rows;
    if rows.is_empty() {
        return Err(CliError::Chart(format!(
            "no rows to plot for {}",
            analysis.series.symbol
        )));
    }

    let closes = analysis.series.adj_closes();
    let plotted = closes
        .iter()
        .copied()
        .chain(analysis.derived.ma_short.iter().flatten().copied())
        .chain(analysis.derived.ma_long.iter().flatten().copied());
    let (low, high) = plotted.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
        (low.min(value), high.max(value))
    });
    let padding = ((high - low) * 0.05).max(1.0);
    let x_max = rows.len().saturating_sub(1).max(1) as f64;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} adjusted close", analysis.series.symbol),
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(0f64..x_max, (low - padding)..(high + padding))
        .map_err(chart_error)?;

    let date_label = |x: &f64| {
        rows.get(x.round() as usize)
            .map(|row| row.date.to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .y_desc("Price")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(LineSeries::new(
            closes.iter().enumerate().map(|(i, value)| (i as f64, *value)),
            &BLUE,
        ))
        .map_err(chart_error)?
        .label("Adj Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    for (label, values, color) in [
        ("100ma", &analysis.derived.ma_short, MA_SHORT_COLOR),
        ("200ma", &analysis.derived.ma_long, MA_LONG_COLOR),
    ] {
        let points = values
            .iter()
            .enumerate()
            .filter_map(|(i, value)| value.map(|value| (i as f64, value)));
        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(chart_error)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

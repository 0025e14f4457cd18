use crate::charts::figure::{cutoff_line, forecast_band, line_trace, titled_layout};
use crate::error::{DashboardError, Result};
use crate::models::{ForecastTable, Quantity, ReadingTable};
use crate::processors::ReportContext;
use crate::utils::constants::DATETIME_LABEL_FORMAT;
use chrono::NaiveDateTime;
use plotly::Plot;
use serde::Serialize;

/// The three stacked charts of the historical page.
#[derive(Serialize)]
pub struct HistoricalFigures {
    pub daily: Plot,
    pub weekly: Plot,
    pub monthly: Plot,
}

pub fn historical_figures(context: &ReportContext, quantity: Quantity) -> HistoricalFigures {
    HistoricalFigures {
        daily: table_figure(&context.daily, quantity),
        weekly: table_figure(&context.weekly, quantity),
        monthly: table_figure(&context.monthly, quantity),
    }
}

/// One line per station, titled e.g. "Weekly Pressure by Station".
pub fn table_figure(table: &ReadingTable, quantity: Quantity) -> Plot {
    let mut plot = Plot::new();
    for series in table.series(quantity) {
        plot.add_trace(line_trace(Some(series.station.as_str()), series.x, series.y));
    }

    let title = format!("{} {} by Station", table.granularity().name(), quantity);
    plot.set_layout(titled_layout(title, quantity.name()).show_legend(true));
    plot
}

/// Forecast line with a dashed marker at the cutoff and the forecast region shaded.
pub fn prediction_figure(forecast: &ForecastTable, quantity: Quantity) -> Result<Plot> {
    if !forecast.has_quantity(quantity) {
        return Err(DashboardError::QuantityUnavailable(quantity.to_string()));
    }

    let x = forecast
        .rows()
        .iter()
        .map(|r| datetime_label(r.created_at))
        .collect();
    let y = forecast
        .rows()
        .iter()
        .map(|r| r.measurements.get(quantity))
        .collect();

    let cutoff = datetime_label(forecast.cutoff());
    let shapes = vec![
        cutoff_line(cutoff.clone()),
        forecast_band(cutoff, datetime_label(forecast.last_timestamp())),
    ];

    let mut plot = Plot::new();
    plot.add_trace(line_trace(None, x, y));
    plot.set_layout(
        titled_layout(format!("Prediction for {}", quantity), quantity.name())
            .shapes(shapes)
            .show_legend(false),
    );
    Ok(plot)
}

fn datetime_label(timestamp: NaiveDateTime) -> String {
    timestamp.format(DATETIME_LABEL_FORMAT).to_string()
}

pub mod builder;
pub mod figure;

pub use builder::{historical_figures, prediction_figure, table_figure, HistoricalFigures};

pub mod table_summary;

pub use table_summary::{describe_context, ForecastStatistics, QuantityStats, TableStatistics};

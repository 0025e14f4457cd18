pub mod forecast_reader;
pub mod sensor_store;

pub use forecast_reader::ForecastReader;
pub use sensor_store::{SensorStore, DAILY_COLUMNS};

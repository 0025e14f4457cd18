/// Raw sensor table and its key columns
pub const STORE_TABLE: &str = "WeatherData";
pub const STORE_STATION_COLUMN: &str = "station";
pub const STORE_TIMESTAMP_COLUMN: &str = "createdAt";

/// Forecast file timestamp column
pub const FORECAST_TIMESTAMP_COLUMN: &str = "createdAt";

/// Number of trailing forecast rows; the cutoff is the first of them
pub const FORECAST_HORIZON: usize = 24;

/// Sea-level pressure correction
pub const PRESSURE_CORRECTION_STATION: &str = "PoS";
pub const PRESSURE_CORRECTION_FACTOR: f64 = 1.03;

/// Valid ranges for bounded quantities
pub const TEMPERATURE_BOUNDS: (f64, f64) = (-50.0, 60.0);
pub const PRESSURE_BOUNDS: (f64, f64) = (950.0, 1060.0);
pub const SOIL_MOISTURE_BOUNDS: (f64, f64) = (0.0, 150.0);
pub const SOIL_TEMPERATURE_BOUNDS: (f64, f64) = (-50.0, 60.0);

/// Configuration defaults
pub const DEFAULT_DATABASE_PATH: &str = "sensor_daten.sqlite";
pub const DEFAULT_FORECAST_PATH: &str = "predictions.parquet";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8050";
pub const DEFAULT_CONFIG_FILE: &str = "sensor-dashboard.toml";
pub const ENV_PREFIX: &str = "SENSOR_DASHBOARD";

/// Display formats
pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";
pub const MONTH_LABEL_FORMAT: &str = "%Y-%m";
pub const DATETIME_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Browser-side chart library
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

use crate::error::{DashboardError, Result};
use crate::models::{Measurements, Quantity, Reading};
use crate::utils::constants::{STORE_STATION_COLUMN, STORE_TABLE, STORE_TIMESTAMP_COLUMN};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Column order of the daily table.
pub const DAILY_COLUMNS: [&str; 10] = [
    "Station",
    "Date",
    "Temperature",
    "Humidity",
    "Pressure",
    "SoilMoisture",
    "SoilTemperature",
    "Light",
    "PM25",
    "PM10",
];

#[derive(Debug, FromRow)]
struct DailyRow {
    station: String,
    date: String,
    temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    soil_moisture: Option<f64>,
    soil_temperature: Option<f64>,
    light: Option<f64>,
    pm25: Option<f64>,
    pm10: Option<f64>,
}

impl DailyRow {
    fn into_reading(self) -> Result<Reading> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")?;

        let mut measurements = Measurements::new();
        measurements.set(Quantity::Temperature, self.temperature);
        measurements.set(Quantity::Humidity, self.humidity);
        measurements.set(Quantity::Pressure, self.pressure);
        measurements.set(Quantity::SoilMoisture, self.soil_moisture);
        measurements.set(Quantity::SoilTemperature, self.soil_temperature);
        measurements.set(Quantity::Light, self.light);
        measurements.set(Quantity::Pm25, self.pm25);
        measurements.set(Quantity::Pm10, self.pm10);

        Ok(Reading::new(self.station, date, measurements))
    }
}

/// Read-only access to the raw sensor database.
pub struct SensorStore {
    path: PathBuf,
    pool: SqlitePool,
}

impl SensorStore {
    /// Opens the database read-only. A missing file is an error, never created.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DashboardError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("sensor database not found: {}", path.display()),
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        debug!("Opened sensor store {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            pool,
        })
    }

    /// Daily aggregation query: means per (station, day), maximum for light.
    pub fn daily_query() -> String {
        let aggregates: Vec<String> = Quantity::ALL
            .iter()
            .map(|q| {
                let function = if q.is_daily_maximum() { "MAX" } else { "AVG" };
                format!(
                    "CAST({}({}) AS REAL) AS {}",
                    function,
                    q.store_column(),
                    sql_alias(*q)
                )
            })
            .collect();

        format!(
            "SELECT {station} AS station, DATE({ts}) AS date, {aggregates} \
             FROM {table} \
             WHERE DATE({ts}) IS NOT NULL AND {station} IS NOT NULL \
             GROUP BY {station}, DATE({ts}) \
             ORDER BY {station}, DATE({ts})",
            station = STORE_STATION_COLUMN,
            ts = STORE_TIMESTAMP_COLUMN,
            aggregates = aggregates.join(", "),
            table = STORE_TABLE,
        )
    }

    /// Counts raw rows the daily query leaves out: no station, or a timestamp
    /// SQLite cannot read as a date.
    pub fn skipped_query() -> String {
        format!(
            "SELECT COUNT(*) FROM {table} \
             WHERE DATE({ts}) IS NULL OR {station} IS NULL",
            station = STORE_STATION_COLUMN,
            ts = STORE_TIMESTAMP_COLUMN,
            table = STORE_TABLE,
        )
    }

    /// Runs the daily aggregation and returns rows ordered by station then date.
    pub async fn fetch_daily(&self) -> Result<Vec<Reading>> {
        let skipped: i64 = sqlx::query_scalar(&Self::skipped_query())
            .fetch_one(&self.pool)
            .await?;
        if skipped > 0 {
            warn!(
                "Skipping {} rows without a station or a readable timestamp",
                skipped
            );
        }

        let query = Self::daily_query();
        let rows: Vec<DailyRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        let readings = rows
            .into_iter()
            .map(DailyRow::into_reading)
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Loaded {} daily rows from {}",
            readings.len(),
            self.path.display()
        );

        Ok(readings)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn sql_alias(quantity: Quantity) -> &'static str {
    match quantity {
        Quantity::Temperature => "temperature",
        Quantity::Humidity => "humidity",
        Quantity::Pressure => "pressure",
        Quantity::SoilMoisture => "soil_moisture",
        Quantity::SoilTemperature => "soil_temperature",
        Quantity::Light => "light",
        Quantity::Pm25 => "pm25",
        Quantity::Pm10 => "pm10",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;
    use sqlx::sqlite::SqliteConnection;
    use tempfile::TempDir;

    async fn create_store(dir: &TempDir, rows: &[(&str, &str, f64, f64, f64)]) -> PathBuf {
        let path = dir.path().join("sensors.sqlite");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();

        sqlx::query(
            "CREATE TABLE WeatherData (
                station TEXT, createdAt TEXT, Temperatur REAL, rel_Luftfeuchte REAL,
                Luftdruck REAL, Bodenfeuchte REAL, Bodentemperatur REAL, Licht INTEGER,
                PM25 REAL, PM10 REAL)",
        )
        .execute(&mut conn)
        .await
        .unwrap();

        for (station, created_at, temperature, pressure, light) in rows {
            sqlx::query(
                "INSERT INTO WeatherData (station, createdAt, Temperatur, Luftdruck, Licht)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(*station)
            .bind(*created_at)
            .bind(*temperature)
            .bind(*pressure)
            .bind(*light as i64)
            .execute(&mut conn)
            .await
            .unwrap();
        }

        conn.close().await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_daily_means_and_light_maximum() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = create_store(
            &dir,
            &[
                ("PoS", "2024-01-01 08:00:00", 10.0, 900.0, 100.0),
                ("PoS", "2024-01-01 16:00:00", 14.0, 905.0, 300.0),
                ("PoS", "2024-01-02 12:00:00", 5.0, 1000.0, 50.0),
            ],
        )
        .await;

        let store = SensorStore::open(&path).await?;
        let rows = store.fetch_daily().await?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].get(Quantity::Temperature), Some(12.0));
        assert_eq!(rows[0].get(Quantity::Pressure), Some(902.5));
        assert_eq!(rows[0].get(Quantity::Light), Some(300.0));
        assert_eq!(rows[0].get(Quantity::Humidity), None);
        assert_eq!(rows[1].get(Quantity::Light), Some(50.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_rows_ordered_by_station_then_date() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = create_store(
            &dir,
            &[
                ("Zoo", "2024-01-01 08:00:00", 1.0, 1000.0, 1.0),
                ("Alm", "2024-01-03 08:00:00", 2.0, 1000.0, 1.0),
                ("Alm", "2024-01-02 08:00:00", 3.0, 1000.0, 1.0),
            ],
        )
        .await;

        let store = SensorStore::open(&path).await?;
        let rows = store.fetch_daily().await?;
        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.station.clone(), r.date.to_string()))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Alm".to_string(), "2024-01-02".to_string()),
                ("Alm".to_string(), "2024-01-03".to_string()),
                ("Zoo".to_string(), "2024-01-01".to_string()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_timestamp_is_skipped() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = create_store(
            &dir,
            &[
                ("A", "2024-01-01 08:00:00", 5.0, 1000.0, 1.0),
                ("A", "n/a", 6.0, 1000.0, 1.0),
            ],
        )
        .await;

        let store = SensorStore::open(&path).await?;
        let rows = store.fetch_daily().await?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].get(Quantity::Temperature), Some(5.0));

        let skipped: i64 = sqlx::query_scalar(&SensorStore::skipped_query())
            .fetch_one(&store.pool)
            .await?;
        assert_eq!(skipped, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_database_fails_fast() {
        let dir = TempDir::new().unwrap();
        let result = SensorStore::open(&dir.path().join("absent.sqlite")).await;
        assert!(matches!(result, Err(DashboardError::Io(_))));
        assert!(!dir.path().join("absent.sqlite").exists());
    }

    #[test]
    fn test_query_aggregates_every_quantity() {
        let query = SensorStore::daily_query();
        assert!(query.contains("CAST(MAX(Licht) AS REAL) AS light"));
        assert!(query.contains("CAST(AVG(Luftdruck) AS REAL) AS pressure"));
        assert!(query.contains("GROUP BY station, DATE(createdAt)"));
        assert!(query.contains("ORDER BY station, DATE(createdAt)"));
        assert_eq!(DAILY_COLUMNS.len(), Quantity::ALL.len() + 2);
    }
}

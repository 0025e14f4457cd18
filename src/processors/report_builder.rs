use crate::error::Result;
use crate::models::{ForecastTable, Granularity, Reading, ReadingTable};
use crate::processors::{CleaningReport, ReadingCleaner, Resampler};
use crate::readers::{ForecastReader, SensorStore};
use crate::utils::progress::ProgressReporter;
use std::path::PathBuf;
use tracing::info;

/// Everything the dashboard shows, computed once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub daily: ReadingTable,
    pub weekly: ReadingTable,
    pub monthly: ReadingTable,
    pub forecast: ForecastTable,
    pub cleaning: CleaningReport,
}

impl ReportContext {
    /// Derives the cleaned daily, weekly and monthly tables from raw daily rows.
    pub fn from_parts(daily_rows: Vec<Reading>, forecast: ForecastTable) -> Self {
        let (cleaned, cleaning) = ReadingCleaner::new().clean(daily_rows);
        let daily = ReadingTable::new(Granularity::Daily, cleaned);
        let weekly = Resampler::weekly().resample(&daily);
        let monthly = Resampler::monthly().resample(&daily);

        Self {
            daily,
            weekly,
            monthly,
            forecast,
            cleaning,
        }
    }

    pub fn table(&self, granularity: Granularity) -> &ReadingTable {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
        }
    }
}

/// Loads both inputs and derives the report tables. Any failure is fatal.
pub struct ReportBuilder {
    database_path: PathBuf,
    forecast_path: PathBuf,
}

impl ReportBuilder {
    pub fn new(database_path: impl Into<PathBuf>, forecast_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            forecast_path: forecast_path.into(),
        }
    }

    pub async fn build(&self, progress: Option<&ProgressReporter>) -> Result<ReportContext> {
        if let Some(p) = progress {
            p.set_message("Querying sensor store...");
        }

        let store = SensorStore::open(&self.database_path).await?;
        let daily_rows = store.fetch_daily().await?;
        store.close().await;

        if let Some(p) = progress {
            p.set_message("Loading forecast...");
        }

        let forecast = ForecastReader::new().read(&self.forecast_path)?;

        if let Some(p) = progress {
            p.set_message("Cleaning and resampling...");
        }

        let context = ReportContext::from_parts(daily_rows, forecast);

        info!(
            "Report ready: {} daily, {} weekly, {} monthly rows; {} forecast rows",
            context.daily.len(),
            context.weekly.len(),
            context.monthly.len(),
            context.forecast.len()
        );

        if let Some(p) = progress {
            p.finish_with_message("Report tables ready");
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastRow, Measurements, Quantity};
    use chrono::{Duration, NaiveDate};

    fn forecast() -> ForecastTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rows = (0..24)
            .map(|i| ForecastRow::new(start + Duration::hours(i), Measurements::new()))
            .collect();
        ForecastTable::new(rows, vec![Quantity::Temperature]).unwrap()
    }

    #[test]
    fn test_from_parts_derives_all_tables_from_daily() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = vec![
            Reading::new("PoS", day, Measurements::new().with(Quantity::Pressure, 902.5)),
            Reading::new("Hof", day, Measurements::new().with(Quantity::Pressure, 1000.0)),
        ];

        let context = ReportContext::from_parts(rows, forecast());

        assert_eq!(context.daily.len(), 2);
        assert_eq!(context.weekly.len(), 2);
        assert_eq!(context.monthly.len(), 2);
        // 902.5 * 1.03 = 929.575, below the valid range
        assert_eq!(context.daily.rows()[1].station, "PoS");
        assert_eq!(context.daily.rows()[1].get(Quantity::Pressure), None);
        assert_eq!(context.weekly.rows()[1].get(Quantity::Pressure), None);
        assert_eq!(context.table(Granularity::Monthly).rows()[0].get(Quantity::Pressure), Some(1000.0));
        assert_eq!(context.cleaning.total_clipped(), 1);
    }

    #[tokio::test]
    async fn test_build_fails_without_database() {
        let builder = ReportBuilder::new("/nonexistent/sensors.sqlite", "/nonexistent/f.parquet");
        assert!(builder.build(None).await.is_err());
    }
}

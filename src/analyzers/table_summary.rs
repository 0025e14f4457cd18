use crate::models::{ForecastTable, Quantity, ReadingTable};
use crate::processors::ReportContext;
use crate::readers::DAILY_COLUMNS;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantityStats {
    pub present: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl QuantityStats {
    fn from_values(values: impl Iterator<Item = Option<f64>>) -> Self {
        let mut present = 0;
        let mut missing = 0;
        let mut sum = 0.0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;

        for value in values {
            match value {
                Some(v) => {
                    present += 1;
                    sum += v;
                    min = Some(min.map_or(v, |m| m.min(v)));
                    max = Some(max.map_or(v, |m| m.max(v)));
                }
                None => missing += 1,
            }
        }

        Self {
            present,
            missing,
            min,
            max,
            mean: (present > 0).then(|| sum / present as f64),
        }
    }

    pub fn missing_percentage(&self) -> f64 {
        let total = self.present + self.missing;
        if total == 0 {
            0.0
        } else {
            100.0 * self.missing as f64 / total as f64
        }
    }

    fn describe(&self) -> String {
        match (self.min, self.max, self.mean) {
            (Some(min), Some(max), Some(mean)) => format!(
                "min {:.2}, max {:.2}, mean {:.2}, {:.1}% missing",
                min,
                max,
                mean,
                self.missing_percentage()
            ),
            _ => "No valid measurements".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableStatistics {
    pub name: String,
    pub rows: usize,
    pub stations: Vec<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub quantities: BTreeMap<Quantity, QuantityStats>,
}

impl TableStatistics {
    pub fn from_table(table: &ReadingTable) -> Self {
        let quantities = table
            .quantities()
            .iter()
            .map(|q| {
                let values = table.rows().iter().map(|r| r.get(*q));
                (*q, QuantityStats::from_values(values))
            })
            .collect();

        Self {
            name: table.granularity().name().to_string(),
            rows: table.len(),
            stations: table.stations().into_iter().map(String::from).collect(),
            date_range: table.date_range(),
            quantities,
        }
    }

    pub fn summary(&self) -> String {
        let range = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "empty".to_string(),
        };

        let mut summary = format!(
            "{} table: {} rows, {} stations ({})\nDate Range: {}\n",
            self.name,
            self.rows,
            self.stations.len(),
            self.stations.join(", "),
            range
        );
        for (quantity, stats) in &self.quantities {
            summary.push_str(&format!("  {:<16} {}\n", quantity.name(), stats.describe()));
        }
        summary
    }
}

#[derive(Debug, Clone)]
pub struct ForecastStatistics {
    pub rows: usize,
    pub first: NaiveDateTime,
    pub cutoff: NaiveDateTime,
    pub last: NaiveDateTime,
    pub historical_rows: usize,
    pub forecast_rows: usize,
    pub quantities: BTreeMap<Quantity, QuantityStats>,
}

impl ForecastStatistics {
    pub fn from_table(table: &ForecastTable) -> Self {
        let quantities = table
            .quantities()
            .iter()
            .map(|q| {
                let values = table.rows().iter().map(|r| r.measurements.get(*q));
                (*q, QuantityStats::from_values(values))
            })
            .collect();

        Self {
            rows: table.len(),
            first: table.first_timestamp(),
            cutoff: table.cutoff(),
            last: table.last_timestamp(),
            historical_rows: table.historical().len(),
            forecast_rows: table.forecast().len(),
            quantities,
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Forecast table: {} rows ({} historical, {} forecast)\n\
            Time Range: {} to {}\n\
            Cutoff: {}\n",
            self.rows,
            self.historical_rows,
            self.forecast_rows,
            self.first,
            self.last,
            self.cutoff
        );
        for (quantity, stats) in &self.quantities {
            summary.push_str(&format!("  {:<16} {}\n", quantity.name(), stats.describe()));
        }
        summary
    }
}

/// Text report of every table in the context.
pub fn describe_context(context: &ReportContext) -> String {
    let mut report = format!("Columns: {}\n\n", DAILY_COLUMNS.join(", "));

    for table in [&context.daily, &context.weekly, &context.monthly] {
        report.push_str(&TableStatistics::from_table(table).summary());
        report.push('\n');
    }
    report.push_str(&ForecastStatistics::from_table(&context.forecast).summary());
    report.push('\n');
    report.push_str(&context.cleaning.generate_summary());

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastRow, Granularity, Measurements, Reading};
    use chrono::Duration;

    #[test]
    fn test_table_statistics() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let table = ReadingTable::new(
            Granularity::Daily,
            vec![
                Reading::new("A", day, Measurements::new().with(Quantity::Humidity, 40.0)),
                Reading::new("B", day, Measurements::new().with(Quantity::Humidity, 60.0)),
                Reading::new("B", day + Duration::days(1), Measurements::new()),
            ],
        );

        let stats = TableStatistics::from_table(&table);
        let humidity = &stats.quantities[&Quantity::Humidity];

        assert_eq!(stats.rows, 3);
        assert_eq!(stats.stations, vec!["A", "B"]);
        assert_eq!(humidity.present, 2);
        assert_eq!(humidity.missing, 1);
        assert_eq!(humidity.mean, Some(50.0));
        assert_eq!(humidity.min, Some(40.0));
        assert!(stats.summary().contains("No valid measurements"));
    }

    #[test]
    fn test_forecast_statistics() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rows = (0..26)
            .map(|i| {
                ForecastRow::new(
                    start + Duration::hours(i),
                    Measurements::new().with(Quantity::Pm10, 5.0),
                )
            })
            .collect();
        let table = ForecastTable::new(rows, vec![Quantity::Pm10]).unwrap();

        let stats = ForecastStatistics::from_table(&table);

        assert_eq!(stats.historical_rows, 2);
        assert_eq!(stats.forecast_rows, 24);
        assert_eq!(stats.cutoff, start + Duration::hours(2));
        assert!(stats.summary().contains("Cutoff: 2024-02-01 02:00:00"));
    }
}

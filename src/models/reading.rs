use crate::models::quantity::{Measurements, Quantity};
use crate::utils::constants::{DATE_LABEL_FORMAT, MONTH_LABEL_FORMAT};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One (station, day) record, or one (station, bucket) record after resampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub station: String,
    pub date: NaiveDate,
    pub measurements: Measurements,
}

impl Reading {
    pub fn new(station: impl Into<String>, date: NaiveDate, measurements: Measurements) -> Self {
        Self {
            station: station.into(),
            date,
            measurements,
        }
    }

    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        self.measurements.get(quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }

    /// Last day of the bucket containing `date`. Weeks end on Sunday.
    pub fn bucket_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                let days_to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
                date + Duration::days(days_to_sunday as i64)
            }
            Granularity::Monthly => month_end(date),
        }
    }

    /// End of the bucket following the one ending at `end`.
    pub fn next_bucket_end(&self, end: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => end + Duration::days(1),
            Granularity::Weekly => end + Duration::days(7),
            Granularity::Monthly => month_end(end + Duration::days(1)),
        }
    }

    /// Axis label for a bucket end date.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Monthly => date.format(MONTH_LABEL_FORMAT).to_string(),
            _ => date.format(DATE_LABEL_FORMAT).to_string(),
        }
    }
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // The first of a month always exists, so the fallback is unreachable.
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// One station's values for a single quantity, ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSeries {
    pub station: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
}

/// An immutable table of readings at one granularity, sorted by station then date.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingTable {
    granularity: Granularity,
    rows: Vec<Reading>,
}

impl ReadingTable {
    pub fn new(granularity: Granularity, mut rows: Vec<Reading>) -> Self {
        rows.sort_by(|a, b| a.station.cmp(&b.station).then_with(|| a.date.cmp(&b.date)));
        Self { granularity, rows }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stations(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.station.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.date).min()?;
        let last = self.rows.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Quantities offered for selection: every numeric column of the table.
    pub fn quantities(&self) -> &'static [Quantity] {
        &Quantity::ALL
    }

    /// Projects the table onto one quantity, one series per station.
    pub fn series(&self, quantity: Quantity) -> Vec<StationSeries> {
        let mut series: Vec<StationSeries> = Vec::new();

        for row in &self.rows {
            let needs_new = series
                .last()
                .map_or(true, |s| s.station != row.station);
            if needs_new {
                series.push(StationSeries {
                    station: row.station.clone(),
                    x: Vec::new(),
                    y: Vec::new(),
                });
            }
            if let Some(current) = series.last_mut() {
                current.x.push(self.granularity.label(row.date));
                current.y.push(row.get(quantity));
            }
        }

        series
    }
}

use crate::models::{Quantity, Reading};
use crate::utils::constants::{PRESSURE_CORRECTION_FACTOR, PRESSURE_CORRECTION_STATION};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ClippedValue {
    pub station: String,
    pub date: NaiveDate,
    pub quantity: Quantity,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CleaningReport {
    pub total_rows: usize,
    pub corrected_rows: usize,
    pub clipped_counts: BTreeMap<Quantity, usize>,
    pub clipped_values: Vec<ClippedValue>,
}

impl CleaningReport {
    pub fn total_clipped(&self) -> usize {
        self.clipped_counts.values().sum()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Daily Rows: {}\n", self.total_rows));
        summary.push_str(&format!(
            "Pressure-Corrected Rows ({}): {}\n",
            PRESSURE_CORRECTION_STATION, self.corrected_rows
        ));
        summary.push_str(&format!("Clipped Values: {}\n", self.total_clipped()));

        for (quantity, count) in &self.clipped_counts {
            summary.push_str(&format!("  {}: {}\n", quantity, count));
        }

        if !self.clipped_values.is_empty() {
            summary.push_str("\nFirst 10 Clipped Values:\n");
            for (i, clipped) in self.clipped_values.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} on {}: {} = {:.2}\n",
                    i + 1,
                    clipped.station,
                    clipped.date,
                    clipped.quantity,
                    clipped.value
                ));
            }
        }

        summary
    }
}

/// Applies the pressure correction and outlier clipping to daily readings.
pub struct ReadingCleaner {
    max_recorded_clips: usize,
}

impl ReadingCleaner {
    pub fn new() -> Self {
        Self {
            max_recorded_clips: 100,
        }
    }

    pub fn with_max_recorded_clips(max_recorded_clips: usize) -> Self {
        Self { max_recorded_clips }
    }

    /// Corrects then clips every row. Rows are never dropped.
    pub fn clean(&self, mut rows: Vec<Reading>) -> (Vec<Reading>, CleaningReport) {
        let mut report = CleaningReport {
            total_rows: rows.len(),
            ..Default::default()
        };

        for row in &mut rows {
            if correct_pressure(row) {
                report.corrected_rows += 1;
            }
            self.clip(row, &mut report);
        }

        if report.total_clipped() > 0 {
            warn!(
                "Clipped {} out-of-range values across {} rows",
                report.total_clipped(),
                report.total_rows
            );
        }
        debug!(
            "Corrected pressure on {} rows for station {}",
            report.corrected_rows, PRESSURE_CORRECTION_STATION
        );

        (rows, report)
    }

    fn clip(&self, row: &mut Reading, report: &mut CleaningReport) {
        for quantity in Quantity::ALL {
            let Some(value) = row.measurements.get(quantity) else {
                continue;
            };
            if within_bounds(quantity, value) {
                continue;
            }

            row.measurements.set(quantity, None);
            *report.clipped_counts.entry(quantity).or_default() += 1;

            if report.clipped_values.len() < self.max_recorded_clips {
                report.clipped_values.push(ClippedValue {
                    station: row.station.clone(),
                    date: row.date,
                    quantity,
                    value,
                });
            }
        }
    }
}

impl Default for ReadingCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduces pressure to sea level for the one station that reports station
/// pressure. Returns whether the row was corrected.
pub fn correct_pressure(row: &mut Reading) -> bool {
    if row.station != PRESSURE_CORRECTION_STATION {
        return false;
    }
    match row.measurements.get(Quantity::Pressure) {
        Some(pressure) => {
            row.measurements
                .set(Quantity::Pressure, Some(pressure * PRESSURE_CORRECTION_FACTOR));
            true
        }
        None => false,
    }
}

/// Unbounded quantities always pass.
pub fn within_bounds(quantity: Quantity, value: f64) -> bool {
    match quantity.bounds() {
        Some((min, max)) => (min..=max).contains(&value),
        None => true,
    }
}

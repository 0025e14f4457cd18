use crate::error::{DashboardError, Result};
use crate::models::quantity::{Measurements, Quantity};
use crate::utils::constants::FORECAST_HORIZON;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub created_at: NaiveDateTime,
    pub measurements: Measurements,
}

impl ForecastRow {
    pub fn new(created_at: NaiveDateTime, measurements: Measurements) -> Self {
        Self {
            created_at,
            measurements,
        }
    }
}

/// Time-ordered forecast table split into a historical prefix and a
/// forecast suffix at the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
    quantities: Vec<Quantity>,
    cutoff: NaiveDateTime,
}

impl ForecastTable {
    /// Builds the table, rejecting files that are too short or not strictly
    /// ascending in time.
    pub fn new(rows: Vec<ForecastRow>, mut quantities: Vec<Quantity>) -> Result<Self> {
        if rows.len() < FORECAST_HORIZON {
            return Err(DashboardError::InsufficientForecast {
                rows: rows.len(),
                required: FORECAST_HORIZON,
            });
        }

        if let Some(pos) = rows
            .windows(2)
            .position(|pair| pair[0].created_at >= pair[1].created_at)
        {
            return Err(DashboardError::UnorderedForecast { row: pos + 1 });
        }

        quantities.sort();
        quantities.dedup();

        let cutoff = rows[rows.len() - FORECAST_HORIZON].created_at;

        Ok(Self {
            rows,
            quantities,
            cutoff,
        })
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Quantities present in the source file.
    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    pub fn has_quantity(&self, quantity: Quantity) -> bool {
        self.quantities.contains(&quantity)
    }

    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    pub fn first_timestamp(&self) -> NaiveDateTime {
        self.rows[0].created_at
    }

    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.rows[self.rows.len() - 1].created_at
    }

    pub fn historical(&self) -> &[ForecastRow] {
        &self.rows[..self.rows.len() - FORECAST_HORIZON]
    }

    pub fn forecast(&self) -> &[ForecastRow] {
        &self.rows[self.rows.len() - FORECAST_HORIZON..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn hourly_rows(count: usize) -> Vec<ForecastRow> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| {
                ForecastRow::new(
                    start + Duration::hours(i as i64),
                    Measurements::new().with(Quantity::Temperature, i as f64),
                )
            })
            .collect()
    }

    #[test]
    fn test_cutoff_is_24th_from_last() {
        let rows = hourly_rows(30);
        let expected = rows[6].created_at;
        let table = ForecastTable::new(rows, vec![Quantity::Temperature]).unwrap();

        assert_eq!(table.cutoff(), expected);
        assert_eq!(table.historical().len(), 6);
        assert_eq!(table.forecast().len(), 24);
        assert_eq!(table.forecast()[0].created_at, expected);
    }

    #[test]
    fn test_exactly_horizon_rows_has_cutoff_at_first_row() {
        let rows = hourly_rows(24);
        let first = rows[0].created_at;
        let table = ForecastTable::new(rows, vec![]).unwrap();
        assert_eq!(table.cutoff(), first);
        assert!(table.historical().is_empty());
    }

    #[test]
    fn test_short_forecast_is_rejected() {
        let result = ForecastTable::new(hourly_rows(23), vec![Quantity::Temperature]);
        assert!(matches!(
            result,
            Err(DashboardError::InsufficientForecast { rows: 23, required: 24 })
        ));
    }

    #[test]
    fn test_unordered_forecast_is_rejected() {
        let mut rows = hourly_rows(30);
        rows.swap(10, 11);
        let result = ForecastTable::new(rows, vec![Quantity::Temperature]);
        assert!(matches!(result, Err(DashboardError::UnorderedForecast { row: 11 })));
    }

    #[test]
    fn test_duplicate_timestamps_are_rejected() {
        let mut rows = hourly_rows(30);
        rows[5].created_at = rows[4].created_at;
        assert!(ForecastTable::new(rows, vec![]).is_err());
    }

    #[test]
    fn test_quantities_are_deduplicated() {
        let table = ForecastTable::new(
            hourly_rows(24),
            vec![Quantity::Pressure, Quantity::Temperature, Quantity::Pressure],
        )
        .unwrap();
        assert_eq!(table.quantities(), &[Quantity::Temperature, Quantity::Pressure]);
        assert!(!table.has_quantity(Quantity::Light));
    }
}

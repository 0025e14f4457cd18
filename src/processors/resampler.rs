use crate::models::{Granularity, Measurements, Quantity, Reading, ReadingTable};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Running sum and count per quantity for one bucket.
#[derive(Debug, Clone, Default)]
struct BucketAccumulator {
    sums: [f64; 8],
    counts: [usize; 8],
}

impl BucketAccumulator {
    fn add(&mut self, measurements: &Measurements) {
        for (i, (_, value)) in measurements.iter().enumerate() {
            if let Some(value) = value {
                self.sums[i] += value;
                self.counts[i] += 1;
            }
        }
    }

    fn mean(&self) -> Measurements {
        let mut measurements = Measurements::new();
        for (i, quantity) in Quantity::ALL.into_iter().enumerate() {
            if self.counts[i] > 0 {
                measurements.set(quantity, Some(self.sums[i] / self.counts[i] as f64));
            }
        }
        measurements
    }
}

/// Regroups a table onto a coarser calendar grid, averaging within buckets.
pub struct Resampler {
    granularity: Granularity,
}

impl Resampler {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn weekly() -> Self {
        Self::new(Granularity::Weekly)
    }

    pub fn monthly() -> Self {
        Self::new(Granularity::Monthly)
    }

    /// Resamples each station independently. Every bucket between a station's
    /// first and last reading appears, empty ones with all values missing.
    pub fn resample(&self, table: &ReadingTable) -> ReadingTable {
        let grouped = self.group_by_station_and_bucket(table.rows());

        let mut rows = Vec::new();
        for (station, buckets) in grouped {
            let (Some(first), Some(last)) = (
                buckets.keys().next().copied(),
                buckets.keys().next_back().copied(),
            ) else {
                continue;
            };

            let mut end = first;
            while end <= last {
                let measurements = buckets
                    .get(&end)
                    .map(BucketAccumulator::mean)
                    .unwrap_or_default();
                rows.push(Reading::new(station.clone(), end, measurements));
                end = self.granularity.next_bucket_end(end);
            }
        }

        debug!(
            "Resampled {} {} rows into {} {} rows",
            table.len(),
            table.granularity().name().to_lowercase(),
            rows.len(),
            self.granularity.name().to_lowercase()
        );

        ReadingTable::new(self.granularity, rows)
    }

    fn group_by_station_and_bucket(
        &self,
        rows: &[Reading],
    ) -> BTreeMap<String, BTreeMap<NaiveDate, BucketAccumulator>> {
        let mut grouped: BTreeMap<String, BTreeMap<NaiveDate, BucketAccumulator>> =
            BTreeMap::new();

        for row in rows {
            let end = self.granularity.bucket_end(row.date);
            grouped
                .entry(row.station.clone())
                .or_default()
                .entry(end)
                .or_default()
                .add(&row.measurements);
        }

        grouped
    }
}

use crate::error::{DashboardError, Result};
use crate::models::{ForecastRow, ForecastTable, Measurements, Quantity};
use crate::utils::constants::FORECAST_TIMESTAMP_COLUMN;
use arrow::array::timezone::Tz;
use arrow::array::{Array, ArrayRef, Float64Array, TimestampMillisecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads the precomputed forecast Parquet file into memory.
pub struct ForecastReader {
    batch_size: usize,
}

impl ForecastReader {
    pub fn new() -> Self {
        Self { batch_size: 8192 }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn read(&self, path: &Path) -> Result<ForecastTable> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let schema = builder.schema().clone();
        if schema.column_with_name(FORECAST_TIMESTAMP_COLUMN).is_none() {
            return Err(DashboardError::MissingColumn(
                FORECAST_TIMESTAMP_COLUMN.to_string(),
            ));
        }

        let quantities: Vec<(Quantity, &'static str)> = Quantity::ALL
            .into_iter()
            .filter_map(|q| {
                q.file_aliases()
                    .iter()
                    .find(|alias| schema.column_with_name(alias).is_some())
                    .map(|alias| (q, *alias))
            })
            .collect();

        debug!(
            "Forecast columns: {:?}",
            quantities.iter().map(|(_, c)| *c).collect::<Vec<_>>()
        );

        let reader = builder.with_batch_size(self.batch_size).build()?;

        let mut rows = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;
            self.append_batch(&batch, &quantities, &mut rows)?;
        }

        let table = ForecastTable::new(rows, quantities.into_iter().map(|(q, _)| q).collect())?;

        info!(
            "Loaded {} forecast rows from {} (cutoff {})",
            table.len(),
            path.display(),
            table.cutoff()
        );

        Ok(table)
    }

    fn append_batch(
        &self,
        batch: &RecordBatch,
        quantities: &[(Quantity, &'static str)],
        rows: &mut Vec<ForecastRow>,
    ) -> Result<()> {
        let timestamps = timestamp_column(batch, FORECAST_TIMESTAMP_COLUMN)?;
        let timestamps = timestamps
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .ok_or_else(|| {
                DashboardError::InvalidFormat(format!(
                    "Invalid {} column type",
                    FORECAST_TIMESTAMP_COLUMN
                ))
            })?;

        let mut value_columns = Vec::with_capacity(quantities.len());
        for (quantity, column) in quantities {
            value_columns.push((*quantity, float_column(batch, column)?));
        }

        for i in 0..batch.num_rows() {
            if timestamps.is_null(i) {
                return Err(DashboardError::InvalidFormat(format!(
                    "Null {} at row {}",
                    FORECAST_TIMESTAMP_COLUMN,
                    rows.len()
                )));
            }
            let created_at = timestamps.value_as_datetime(i).ok_or_else(|| {
                DashboardError::InvalidFormat(format!(
                    "Timestamp out of range at row {}",
                    rows.len()
                ))
            })?;

            let mut measurements = Measurements::new();
            for (quantity, values) in &value_columns {
                let value = if values.is_null(i) {
                    None
                } else {
                    Some(values.value(i))
                };
                measurements.set(*quantity, value);
            }

            rows.push(ForecastRow::new(created_at, measurements));
        }

        Ok(())
    }
}

impl Default for ForecastReader {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
}

/// Timestamps may be stored with any unit, with a time zone, or as ISO text.
/// Zoned values become wall-clock time in their stored zone.
fn timestamp_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let array = column(batch, name)?;
    let target = DataType::Timestamp(TimeUnit::Millisecond, None);

    let array = match array.data_type() {
        DataType::Timestamp(_, Some(zone)) => local_wall_clock(array, zone)?,
        DataType::Timestamp(_, None)
        | DataType::Date32
        | DataType::Date64
        | DataType::Utf8
        | DataType::LargeUtf8 => cast(array, &target)?,
        other => {
            return Err(DashboardError::InvalidFormat(format!(
                "Unsupported {} column type: {}",
                name, other
            )))
        }
    };

    Ok(array)
}

fn local_wall_clock(array: &ArrayRef, zone: &Arc<str>) -> Result<ArrayRef> {
    let tz: Tz = zone.parse()?;
    let zoned = cast(
        array,
        &DataType::Timestamp(TimeUnit::Millisecond, Some(zone.clone())),
    )?;
    let zoned = zoned
        .as_any()
        .downcast_ref::<TimestampMillisecondArray>()
        .ok_or_else(|| DashboardError::InvalidFormat(format!("Invalid timestamp zone {}", zone)))?;

    let local: TimestampMillisecondArray = (0..zoned.len())
        .map(|i| {
            if zoned.is_null(i) {
                return None;
            }
            zoned
                .value_as_datetime_with_tz(i, tz)
                .map(|dt| dt.naive_local().and_utc().timestamp_millis())
        })
        .collect();

    Ok(Arc::new(local))
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let array = column(batch, name)?;
    if !array.data_type().is_numeric() {
        return Err(DashboardError::InvalidFormat(format!(
            "Column {} is not numeric: {}",
            name,
            array.data_type()
        )));
    }

    let values = cast(array, &DataType::Float64)?;
    values
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| DashboardError::InvalidFormat(format!("Invalid {} column type", name)))
}

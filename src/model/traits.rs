use crate::error::StorageError;
use crate::model::consumption::ConsumptionRecord;
use crate::model::types::TimeWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use influxdb2::models::DataPoint;

/// Trait for types that can be converted to InfluxDB data points.
pub trait DataPointBuilder: Send + Sync {
    /// Converts the value into an InfluxDB DataPoint.
    ///
    /// # Returns
    /// - `Ok(DataPoint)` if conversion succeeds
    /// - `Err` if the data cannot be converted to a valid DataPoint
    fn to_point(&self) -> Result<DataPoint, StorageError>;
}

/// The time-series store consumption records are reconciled against.
///
/// Implementations provide range queries by meter tag and a write that does
/// not return until the points have been delivered.
#[async_trait]
pub trait ConsumptionStore: Send + Sync {
    /// Timestamps of points already stored for `meter_number` inside `window`,
    /// considering only the given field names.
    async fn stored_timestamps(
        &self,
        meter_number: &str,
        window: &TimeWindow,
        fields: &[&str],
    ) -> Result<Vec<DateTime<Utc>>, StorageError>;

    /// Writes one point per record and flushes before returning.
    async fn write(&self, records: &[ConsumptionRecord]) -> Result<(), StorageError>;
}

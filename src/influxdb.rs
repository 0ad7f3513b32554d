use crate::config::InfluxConfig;
use crate::error::StorageError;
use crate::model::{
    ConsumptionRecord, ConsumptionStore, DataPointBuilder, TimeWindow, MEASUREMENT, METER_TAG,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::prelude::stream;
use influxdb2::models::{DataPoint, Query};
use influxdb2_structmap::value::Value;

pub struct Client {
    client: influxdb2::Client,
    bucket: String,
}

impl Client {
    pub(crate) fn new(config: InfluxConfig) -> Self {
        let client = influxdb2::Client::new(config.url, config.org, config.token);
        Self {
            client,
            bucket: config.bucket,
        }
    }

    /// Sends all points in a single write request.
    pub async fn write_points(&self, points: Vec<DataPoint>) -> Result<(), StorageError> {
        let count = points.len();
        self.client
            .write(self.bucket.as_str(), stream::iter(points))
            .await
            .map_err(|e| StorageError::write_failed(count, e))
    }
}

#[async_trait]
impl ConsumptionStore for Client {
    async fn stored_timestamps(
        &self,
        meter_number: &str,
        window: &TimeWindow,
        fields: &[&str],
    ) -> Result<Vec<DateTime<Utc>>, StorageError> {
        let flux = existing_points_query(&self.bucket, meter_number, window, fields);
        tracing::debug!("Querying stored points: {}", flux);

        let records = self
            .client
            .query_raw(Some(Query::new(flux)))
            .await
            .map_err(StorageError::query_failed)?;

        Ok(records
            .iter()
            .filter_map(|record| match record.values.get("_time") {
                Some(Value::TimeRFC(time)) => Some(time.with_timezone(&Utc)),
                _ => None,
            })
            .collect())
    }

    async fn write(&self, records: &[ConsumptionRecord]) -> Result<(), StorageError> {
        let points = records
            .iter()
            .map(|record| record.to_point())
            .collect::<Result<Vec<_>, _>>()?;
        self.write_points(points).await
    }
}

/// Builds the Flux query returning this meter's stored bucket values inside
/// `window`.
pub fn existing_points_query(
    bucket: &str,
    meter_number: &str,
    window: &TimeWindow,
    fields: &[&str],
) -> String {
    let field_filter = fields
        .iter()
        .map(|field| format!(r#"r["_field"] == "{}""#, flux_escape(field)))
        .collect::<Vec<_>>()
        .join(" or ");

    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {start}, stop: {stop})
  |> filter(fn: (r) => r["_measurement"] == "{measurement}")
  |> filter(fn: (r) => r["{tag}"] == "{meter}")
  |> filter(fn: (r) => {field_filter})"#,
        bucket = flux_escape(bucket),
        start = window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        stop = window.stop.to_rfc3339_opts(SecondsFormat::Secs, true),
        measurement = MEASUREMENT,
        tag = METER_TAG,
        meter = flux_escape(meter_number),
        field_filter = field_filter,
    )
}

fn flux_escape(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', r#"\""#)
}

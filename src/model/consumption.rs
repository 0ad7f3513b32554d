use crate::error::StorageError;
use crate::model::traits::DataPointBuilder;
use chrono::DateTime;
use chrono_tz::Tz;
use influxdb2::models::DataPoint;
use std::collections::BTreeMap;

/// InfluxDB measurement all consumption points are written to.
pub const MEASUREMENT: &str = "toronto_hydro";

/// Tag carrying the meter number.
pub const METER_TAG: &str = "meter";

/// Every bucket name a record can carry.
pub const BUCKETS: [&str; 18] = [
    "UsageOffPeak",
    "UsageMidPeak",
    "UsageOnPeak",
    "UsageLowTier",
    "UsageHighTier",
    "UsageULOOvernight",
    "UsageULOOffPeak",
    "UsageULOMidPeak",
    "UsageULOOnPeak",
    "CostOffPeak",
    "CostMidPeak",
    "CostOnPeak",
    "CostLowTier",
    "CostHighTier",
    "CostULOOvernight",
    "CostULOOffPeak",
    "CostULOMidPeak",
    "CostULOOnPeak",
];

// The portal has shipped two header vocabularies for the same quantities.
const COLUMNS: [(&str, &str); 28] = [
    ("Usage off-peak (kWh)", "UsageOffPeak"),
    ("Usage TOU off-peak (kWh)", "UsageOffPeak"),
    ("Usage mid-peak (kWh)", "UsageMidPeak"),
    ("Usage TOU mid-peak (kWh)", "UsageMidPeak"),
    ("Usage on-peak (kWh)", "UsageOnPeak"),
    ("Usage TOU on-peak (kWh)", "UsageOnPeak"),
    ("Usage low-tier (kWh)", "UsageLowTier"),
    ("Usage tier 1 (kWh)", "UsageLowTier"),
    ("Usage high-tier (kWh)", "UsageHighTier"),
    ("Usage tier 2 (kWh)", "UsageHighTier"),
    ("Usage ULO overnight (kWh)", "UsageULOOvernight"),
    ("Usage ULO off-peak (kWh)", "UsageULOOffPeak"),
    ("Usage ULO mid-peak (kWh)", "UsageULOMidPeak"),
    ("Usage ULO on-peak (kWh)", "UsageULOOnPeak"),
    ("Cost off-peak ($)", "CostOffPeak"),
    ("Cost TOU off-peak ($)", "CostOffPeak"),
    ("Cost mid-peak ($)", "CostMidPeak"),
    ("Cost TOU mid-peak ($)", "CostMidPeak"),
    ("Cost on-peak ($)", "CostOnPeak"),
    ("Cost TOU on-peak ($)", "CostOnPeak"),
    ("Cost low-tier ($)", "CostLowTier"),
    ("Cost tier 1 ($)", "CostLowTier"),
    ("Cost high-tier ($)", "CostHighTier"),
    ("Cost tier 2 ($)", "CostHighTier"),
    ("Cost ULO overnight ($)", "CostULOOvernight"),
    ("Cost ULO off-peak ($)", "CostULOOffPeak"),
    ("Cost ULO mid-peak ($)", "CostULOMidPeak"),
    ("Cost ULO on-peak ($)", "CostULOOnPeak"),
];

/// Returns the bucket a CSV column feeds, or `None` for columns we don't track.
pub fn bucket_for_column(column: &str) -> Option<&'static str> {
    COLUMNS
        .iter()
        .find(|(name, _)| *name == column.trim())
        .map(|(_, bucket)| *bucket)
}

/// One hour of usage and cost for one meter.
///
/// Only the buckets whose columns were present in the payload are stored;
/// [`ConsumptionRecord::value`] reads absent buckets as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRecord {
    pub meter_number: String,
    pub timestamp: DateTime<Tz>,
    pub buckets: BTreeMap<String, f64>,
}

impl ConsumptionRecord {
    pub fn new(meter_number: impl Into<String>, timestamp: DateTime<Tz>) -> Self {
        Self {
            meter_number: meter_number.into(),
            timestamp,
            buckets: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_bucket(mut self, bucket: impl Into<String>, value: f64) -> Self {
        self.buckets.insert(bucket.into(), value);
        self
    }

    #[cfg(test)]
    pub fn value(&self, bucket: &str) -> f64 {
        self.buckets.get(bucket).copied().unwrap_or(0.0)
    }

    /// A record carries data when at least one bucket is positive.
    pub fn has_data(&self) -> bool {
        self.buckets.values().any(|v| *v > 0.0)
    }

    /// Fields written to the store: positive buckets only.
    pub fn point_fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.buckets
            .iter()
            .filter(|(_, v)| **v > 0.0)
            .map(|(k, v)| (k.as_str(), *v))
    }
}

impl DataPointBuilder for ConsumptionRecord {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let timestamp = self.timestamp.timestamp_nanos_opt().ok_or_else(|| {
            StorageError::InvalidDataPoint(format!("timestamp overflow: {}", self.timestamp))
        })?;

        let mut builder =
            DataPoint::builder(MEASUREMENT).tag(METER_TAG, self.meter_number.clone());
        for (name, value) in self.point_fields() {
            builder = builder.field(name.to_string(), value);
        }

        builder
            .timestamp(timestamp)
            .build()
            .map_err(|e| StorageError::InvalidDataPoint(e.to_string()))
    }
}

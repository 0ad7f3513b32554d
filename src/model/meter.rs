use chrono::NaiveDate;
use serde_derive::Deserialize;

/// A metering point on the account, as listed by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Meter {
    /// Externally visible meter number, used as the store tag
    #[serde(rename = "meterNum")]
    pub meter_number: String,
    /// Portal-internal service point id, sent when fetching hourly data
    #[serde(rename = "id")]
    pub internal_id: String,
    #[serde(rename = "startDate")]
    pub valid_from: NaiveDate,
    /// First day without data
    #[serde(rename = "endDate")]
    pub valid_to: NaiveDate,
}

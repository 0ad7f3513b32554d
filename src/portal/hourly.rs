//! Hourly consumption download and CSV parsing.
//!
//! The portal answers `getHourlyChartData` with a banner line such as
//! `# Your hourly usage (2000-01-01)` followed by a CSV table. The header row
//! depends on the account's tariff: tiered accounts get low/high tier
//! columns, time-of-use accounts get off/mid/on-peak columns, and
//! ultra-low-overnight accounts get the ULO set. Rows are keyed by an hour
//! label ("12 a.m." .. "11 p.m.") rather than a timestamp.

use crate::config::MalformedSlotPolicy;
use crate::error::{PayloadError, PortalError};
use crate::model::consumption::bucket_for_column;
use crate::model::time_slot;
use crate::model::{ConsumptionRecord, Meter};
use crate::portal::session::PortalSession;
use chrono::NaiveDate;
use chrono_tz::Tz;
use csv::{ReaderBuilder, StringRecord, Trim};

const TIME_COLUMN: &str = "Time";
const COMMENT_MARKER: char = '#';

/// Downloads and parses one day of hourly data for a meter.
#[derive(Debug, Clone)]
pub struct ConsumptionFetcher {
    timezone: Tz,
    slot_policy: MalformedSlotPolicy,
}

impl ConsumptionFetcher {
    pub fn new(timezone: Tz, slot_policy: MalformedSlotPolicy) -> Self {
        Self {
            timezone,
            slot_policy,
        }
    }

    pub async fn fetch_day(
        &self,
        session: &PortalSession,
        meter: &Meter,
        date: NaiveDate,
    ) -> Result<Vec<ConsumptionRecord>, PortalError> {
        let date_string = date.format("%Y-%m-%d").to_string();
        tracing::info!(
            "Getting consumption data for meter {} and date {}",
            meter.meter_number,
            date_string
        );

        let url = session.endpoints().hourly_data()?;
        let body = session
            .post_form(
                url,
                &[
                    ("spIDs", meter.internal_id.as_str()),
                    ("meterNum", meter.meter_number.as_str()),
                    ("date", date_string.as_str()),
                ],
            )
            .await
            .map_err(|source| PortalError::DataUnavailable {
                meter: meter.meter_number.clone(),
                date,
                source,
            })?;

        self.parse(&body, &meter.meter_number, date)
    }

    /// Parses a raw `getHourlyChartData` body into records for `date`.
    pub fn parse(
        &self,
        body: &str,
        meter_number: &str,
        date: NaiveDate,
    ) -> Result<Vec<ConsumptionRecord>, PortalError> {
        let data = strip_comments(body);
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(data.as_bytes());
        let headers = reader.headers().map_err(PayloadError::from)?.clone();
        let time_index = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or_else(|| PayloadError::MissingColumn(TIME_COLUMN.to_string()))?;
        let columns = bucket_columns(&headers);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(PayloadError::from)?;
            let label = row.get(time_index).unwrap_or_default();

            let timestamp = match time_slot::resolve(label, date, &self.timezone) {
                Ok(timestamp) => timestamp,
                Err(e) => match self.slot_policy {
                    MalformedSlotPolicy::Skip => {
                        tracing::warn!(
                            "Skipping row for meter {} on {}: {}",
                            meter_number,
                            date,
                            e
                        );
                        continue;
                    }
                    MalformedSlotPolicy::Abort => return Err(e.into()),
                },
            };

            let mut record = ConsumptionRecord::new(meter_number, timestamp);
            for (index, column, bucket) in &columns {
                let value = parse_cell(column, row.get(*index).unwrap_or_default())?;
                *record.buckets.entry(bucket.to_string()).or_insert(0.0) += value;
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// Drops every line carrying the comment marker.
pub fn strip_comments(body: &str) -> String {
    body.lines()
        .filter(|line| !line.contains(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

// (column index, header text, bucket) for every header we track
fn bucket_columns(headers: &StringRecord) -> Vec<(usize, String, &'static str)> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            bucket_for_column(header).map(|bucket| (index, header.to_string(), bucket))
        })
        .collect()
}

fn parse_cell(column: &str, text: &str) -> Result<f64, PayloadError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse::<f64>()
        .map_err(|_| PayloadError::number_parse(column, text))
}

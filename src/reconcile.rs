//! Reconciliation of freshly scraped records against the points already in
//! the store.
//!
//! Duplicate suppression is purely time-based: a record is dropped when the
//! store already holds any tracked field for the same meter at exactly the
//! same instant, regardless of the stored values.

use crate::error::ReconcileError;
use crate::model::{ConsumptionRecord, ConsumptionStore, Meter, TimeWindow, BUCKETS};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Counts reported by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub written: usize,
    /// Records whose timestamp was already stored
    pub duplicates: usize,
    /// Records with no positive bucket
    pub empty: usize,
}

impl ReconcileOutcome {
    pub fn skipped(&self) -> usize {
        self.duplicates + self.empty
    }
}

pub struct ExportReconciler<'a, S: ConsumptionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConsumptionStore + ?Sized> ExportReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Writes the records of `meter` the store does not hold yet.
    ///
    /// All records must belong to `meter` and the batch must not be empty.
    /// Points already flushed stay written if a later step fails.
    pub async fn reconcile(
        &self,
        meter: &Meter,
        records: Vec<ConsumptionRecord>,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        if let Some(foreign) = records
            .iter()
            .find(|r| r.meter_number != meter.meter_number)
        {
            return Err(ReconcileError::ForeignRecord {
                expected: meter.meter_number.clone(),
                found: foreign.meter_number.clone(),
            });
        }
        let window = TimeWindow::around(records.iter().map(|r| &r.timestamp), Duration::hours(1))
            .ok_or_else(|| ReconcileError::EmptyBatch(meter.meter_number.clone()))?;

        let stored: HashSet<DateTime<Utc>> = self
            .store
            .stored_timestamps(&meter.meter_number, &window, &BUCKETS)
            .await?
            .into_iter()
            .collect();

        let mut outcome = ReconcileOutcome::default();
        let mut pending = Vec::with_capacity(records.len());
        for record in records {
            let timestamp = record.timestamp.with_timezone(&Utc);
            if stored.contains(&timestamp) {
                outcome.duplicates += 1;
            } else if !record.has_data() {
                tracing::debug!("No data for {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
                outcome.empty += 1;
            } else {
                tracing::debug!("Inserting {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
                pending.push(record);
            }
        }

        if pending.is_empty() {
            tracing::info!(
                "No new metrics for meter {}, skipping export to InfluxDB",
                meter.meter_number
            );
            return Ok(outcome);
        }

        self.store.write(&pending).await?;
        outcome.written = pending.len();
        tracing::info!(
            "Meter {}: wrote {} point(s), skipped {} ({} already stored, {} without data)",
            meter.meter_number,
            outcome.written,
            outcome.skipped(),
            outcome.duplicates,
            outcome.empty
        );
        Ok(outcome)
    }
}

//! One export cycle: log in, discover meters, fetch each meter's recent days
//! and reconcile them into the store, then log out.

use crate::config::{CollectorConfig, MalformedSlotPolicy, TorontoHydroConfig};
use crate::error::{ConfigError, PortalError};
use crate::model::{ConsumptionStore, Meter};
use crate::portal::{list_meters, ConsumptionFetcher, Credentials, PortalClient, PortalSession};
use crate::reconcile::ExportReconciler;
use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use std::time::{Duration, Instant};

/// Delay between successive day fetches of one meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[cfg(test)]
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct CycleOptions {
    pub lookback_days: u32,
    pub pacing: Pacing,
    pub meter_override: Option<String>,
    pub timezone: Tz,
    pub slot_policy: MalformedSlotPolicy,
}

impl CycleOptions {
    pub fn from_config(
        collector: &CollectorConfig,
        portal: &TorontoHydroConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            lookback_days: collector.look_days_in_past,
            pacing: Pacing::new(collector.request_delay()),
            meter_override: portal.meter.clone(),
            timezone: collector.timezone()?,
            slot_policy: collector.malformed_slot_policy,
        })
    }
}

/// Totals logged at the end of a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub meters: usize,
    pub days_fetched: usize,
    pub days_failed: usize,
    pub written: usize,
    pub skipped: usize,
}

pub struct Orchestrator<S: ConsumptionStore> {
    client: PortalClient,
    credentials: Credentials,
    store: S,
    fetcher: ConsumptionFetcher,
    options: CycleOptions,
}

impl<S: ConsumptionStore> Orchestrator<S> {
    pub fn new(
        client: PortalClient,
        credentials: Credentials,
        store: S,
        options: CycleOptions,
    ) -> Self {
        let fetcher = ConsumptionFetcher::new(options.timezone, options.slot_policy);
        Self {
            client,
            credentials,
            store,
            fetcher,
            options,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current date in the account timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.options.timezone).date_naive()
    }

    /// Runs one cycle as of `today`.
    ///
    /// Fails only when login or meter discovery fails; per-day and per-meter
    /// failures are logged and counted.
    pub async fn run_cycle(&self, today: NaiveDate) -> Result<CycleSummary, PortalError> {
        tracing::info!("Getting Toronto Hydro energy consumption...");
        let started = Instant::now();

        let session = self.client.login(&self.credentials).await.map_err(|e| {
            tracing::error!("Login failed, skipping cycle: {}", e);
            e
        })?;

        let meters = match list_meters(&session).await {
            Ok(meters) => self.select_meters(meters),
            Err(e) => {
                tracing::error!("Meter discovery failed, skipping cycle: {}", e);
                close(session).await;
                return Err(e);
            }
        };

        let mut summary = CycleSummary::default();
        for meter in &meters {
            summary.meters += 1;
            self.export_meter(&session, meter, today, &mut summary).await;
        }

        close(session).await;
        tracing::info!(
            "Finished in {:?}: {} meter(s), {} day(s) fetched, {} failed, {} written, {} skipped",
            started.elapsed(),
            summary.meters,
            summary.days_fetched,
            summary.days_failed,
            summary.written,
            summary.skipped
        );
        Ok(summary)
    }

    fn select_meters(&self, meters: Vec<Meter>) -> Vec<Meter> {
        match &self.options.meter_override {
            None => meters,
            Some(number) => {
                let selected: Vec<Meter> = meters
                    .into_iter()
                    .filter(|m| &m.meter_number == number)
                    .collect();
                if selected.is_empty() {
                    tracing::warn!("Meter {} is not listed on this account", number);
                }
                selected
            }
        }
    }

    async fn export_meter(
        &self,
        session: &PortalSession,
        meter: &Meter,
        today: NaiveDate,
        summary: &mut CycleSummary,
    ) {
        let mut batch = Vec::new();
        for (i, date) in self.days_to_fetch(meter, today).into_iter().enumerate() {
            if i > 0 {
                self.options.pacing.wait().await;
            }
            match self.fetcher.fetch_day(session, meter, date).await {
                Ok(records) => {
                    summary.days_fetched += 1;
                    batch.extend(records);
                }
                Err(e) => {
                    summary.days_failed += 1;
                    tracing::error!(
                        "Failed to get data for meter {} on {}: {}",
                        meter.meter_number,
                        date,
                        e
                    );
                }
            }
        }

        if batch.is_empty() {
            tracing::info!(
                "No data gathered for meter {}, skipping export to InfluxDB",
                meter.meter_number
            );
            return;
        }

        match ExportReconciler::new(&self.store).reconcile(meter, batch).await {
            Ok(outcome) => {
                summary.written += outcome.written;
                summary.skipped += outcome.skipped();
            }
            Err(e) => tracing::error!(
                "Failed to export meter {} to InfluxDB: {}",
                meter.meter_number,
                e
            ),
        }
    }

    /// Days from `max(today - lookback, valid_from)` up to `valid_to`,
    /// excluding `valid_to`, which never has values.
    fn days_to_fetch(&self, meter: &Meter, today: NaiveDate) -> Vec<NaiveDate> {
        let lookback = today
            .checked_sub_days(Days::new(u64::from(self.options.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let start = lookback.max(meter.valid_from);
        start
            .iter_days()
            .take_while(|date| *date < meter.valid_to)
            .collect()
    }
}

async fn close(session: PortalSession) {
    if let Err(e) = session.logout().await {
        tracing::warn!("Logout failed: {}", e);
    }
}

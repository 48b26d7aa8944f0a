//! The `Analytics` facade and its shared computation helpers.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info};

use stockwise_anomaly::{Anomaly, AnomalyPattern, DriftObservation, detect, find_pattern};
use stockwise_confidence::{ConfidenceInputs, ConfidenceReport, score};
use stockwise_core::{AnalyticsPolicy, EngineError, EngineResult, SkuId, StoreId, TransferId};
use stockwise_forecast::{
    DailyForecast, DemandProfile, curve_from_hour_means, forecast_daily, synthesized_curve,
    weighted_hour_mean,
};
use stockwise_timeseries::{
    CommittedTransfer, CycleCount, SeriesKey, Sku, Store, TelemetryReading, TimeSeriesStore,
    TransferDraft, TransferRecord, TransferStatus,
};

/// Hourly samples consulted per (hour, weekday) slot when building an
/// observed curve.
const HOURLY_LOOKBACK_WEEKS: usize = 8;

/// Read/write facade over the time series store.
#[derive(Debug, Clone)]
pub struct Analytics {
    store: Arc<TimeSeriesStore>,
    policy: AnalyticsPolicy,
}

impl Analytics {
    pub fn new(store: Arc<TimeSeriesStore>, policy: AnalyticsPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    pub fn policy(&self) -> &AnalyticsPolicy {
        &self.policy
    }

    // ----- boundary validation -----

    pub(crate) fn require_store(&self, store_id: StoreId) -> EngineResult<Store> {
        self.store
            .store(store_id)?
            .ok_or(EngineError::UnknownStore(store_id))
    }

    pub(crate) fn require_sku(&self, sku_id: SkuId) -> EngineResult<Sku> {
        self.store
            .sku(sku_id)?
            .ok_or(EngineError::UnknownSku(sku_id))
    }

    // ----- shared computation -----

    pub(crate) fn lookback_start(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.policy.forecast.lookback_days as u64))
            .unwrap_or(today)
    }

    /// Daily forecast over the lookback window, optionally discounting
    /// flagged anomaly dates.
    pub(crate) fn daily_forecast(
        &self,
        key: SeriesKey,
        today: NaiveDate,
        discounted: &[NaiveDate],
    ) -> EngineResult<DailyForecast> {
        let sales = self
            .store
            .sales_between(key, self.lookback_start(today), today)?;
        Ok(forecast_daily(&sales, discounted, today, &self.policy.forecast))
    }

    /// Demand profile: daily forecast plus an hourly curve — observed when
    /// the key has hourly data, synthesized (and tagged) otherwise.
    pub(crate) fn demand_profile(
        &self,
        key: SeriesKey,
        today: NaiveDate,
        forecast: DailyForecast,
    ) -> EngineResult<DemandProfile> {
        let weekday = today.succ_opt().unwrap_or(today).weekday();
        let mut means = [0.0; 24];
        for (hour, mean) in means.iter_mut().enumerate() {
            let samples: Vec<f64> = self
                .store
                .hourly_samples(key, hour as u32, weekday, HOURLY_LOOKBACK_WEEKS)?
                .into_iter()
                .map(f64::from)
                .collect();
            *mean = weighted_hour_mean(&samples, self.policy.forecast.decay);
        }

        let curve = match curve_from_hour_means(means, forecast.daily_demand) {
            Some(curve) => curve,
            None => {
                debug!(
                    store_id = %key.store_id,
                    sku_id = %key.sku_id,
                    "no hourly observations; synthesizing intraday curve"
                );
                synthesized_curve(forecast.daily_demand, self.policy.hours)
            }
        };
        Ok(DemandProfile::new(forecast, curve))
    }

    /// Day-over-day drawdown evidence for the anomaly detector: every pair
    /// of consecutive-date snapshots in the window, joined with that day's
    /// recorded movements.
    pub(crate) fn drift_observations(
        &self,
        key: SeriesKey,
        today: NaiveDate,
    ) -> EngineResult<Vec<DriftObservation>> {
        let snapshots = self
            .store
            .snapshots_between(key, self.lookback_start(today), today)?;

        let mut observations = Vec::new();
        for pair in snapshots.windows(2) {
            let (prior, current) = (&pair[0], &pair[1]);
            if prior.date.succ_opt() != Some(current.date) {
                continue;
            }
            observations.push(DriftObservation {
                date: current.date,
                prior_on_hand: prior.on_hand,
                on_hand: current.on_hand,
                receipts: self.store.receipts_on(key, current.date)?,
                transfers_in: self.store.transfers_in_on(key, current.date)?,
                transfers_out: self.store.transfers_out_on(key, current.date)?,
                recorded_sales: self.store.sale_on(key, current.date)?,
            });
        }
        Ok(observations)
    }

    /// Anomalies, pattern report, and confidence for one key, derived from
    /// an already-computed forecast.
    pub(crate) fn quality_report(
        &self,
        key: SeriesKey,
        sku: &Sku,
        forecast: &DailyForecast,
        today: NaiveDate,
    ) -> EngineResult<(Vec<Anomaly>, AnomalyPattern, ConfidenceReport)> {
        let observations = self.drift_observations(key, today)?;
        let anomalies = detect(&observations, forecast, &self.policy.anomaly);
        let pattern = find_pattern(&anomalies, &self.policy.anomaly);

        let days_since_count = self
            .store
            .last_cycle_count(key)?
            .map(|count| (today - count.date).num_days());
        let report = score(
            &ConfidenceInputs {
                anomalies: &anomalies,
                pattern: &pattern,
                days_since_count,
                perishable: sku.perishable,
            },
            &self.policy.confidence,
        );
        Ok((anomalies, pattern, report))
    }

    // ----- write operations -----

    /// Record a physical count; the count row and the implied snapshot
    /// land atomically.
    pub fn record_cycle_count(&self, count: CycleCount) -> EngineResult<()> {
        self.require_store(count.store_id)?;
        self.require_sku(count.sku_id)?;
        self.store.record_cycle_count(count)
    }

    /// Commit a transfer draft onto the ledger. Idempotent per
    /// (from, to, SKU, requested-at).
    pub fn commit_transfer(&self, draft: TransferDraft) -> EngineResult<CommittedTransfer> {
        self.require_store(draft.from_store_id)?;
        self.require_store(draft.to_store_id)?;
        self.require_sku(draft.sku_id)?;
        let committed = self.store.commit_transfer(draft)?;
        info!(
            transfer_id = %committed.id,
            replayed = committed.replayed,
            "transfer draft commit"
        );
        Ok(committed)
    }

    /// Advance a committed transfer through its lifecycle.
    pub fn update_transfer_status(
        &self,
        id: TransferId,
        status: TransferStatus,
        as_of: NaiveDate,
    ) -> EngineResult<TransferRecord> {
        self.store.update_transfer_status(id, status, as_of)
    }

    /// Ingest a telemetry reading (collaborator pass-through; readings are
    /// stored raw, calibration belongs upstream).
    pub fn record_telemetry(&self, reading: TelemetryReading) -> EngineResult<()> {
        self.require_store(reading.store_id)?;
        self.store.record_telemetry(reading)
    }
}

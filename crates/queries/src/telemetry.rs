//! Telemetry status: latest readings with staleness and range checks.
//!
//! Readings are evaluated raw against the configured per-sensor bounds.
//! No calibration offsets are applied here — that belongs to the
//! ingestion collaborator.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::{EngineError, EngineResult, StoreId};
use stockwise_timeseries::{Store, TelemetryReading};

use crate::engine::Analytics;

/// Latest reading for one sensor, with derived health flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub sensor: String,
    pub value: f64,
    pub unit: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub age_minutes: i64,
    pub stale: bool,
    /// None when no bound is configured for the sensor.
    pub in_range: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryStatusResponse {
    pub store: Store,
    pub sensors: Vec<SensorStatus>,
    /// Human-readable out-of-range findings.
    pub environmental_risks: Vec<String>,
    pub total_sensors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryHistoryResponse {
    pub store_id: StoreId,
    pub store_name: String,
    pub sensor_filter: Option<String>,
    pub hours: i64,
    pub total: usize,
    pub readings: Vec<TelemetryReading>,
}

impl Analytics {
    /// Latest reading per sensor with staleness and range evaluation.
    pub fn latest_telemetry(
        &self,
        store_id: StoreId,
        now: DateTime<Utc>,
    ) -> EngineResult<TelemetryStatusResponse> {
        let store = self.require_store(store_id)?;
        let policy = &self.policy().telemetry;

        let mut sensors = Vec::new();
        let mut environmental_risks = Vec::new();
        for reading in self.store().latest_telemetry(store_id)? {
            let age_minutes = (now - reading.recorded_at).num_minutes();
            let bound = policy.bound_for(&reading.sensor);
            let in_range = bound.map(|b| reading.value >= b.min && reading.value <= b.max);

            if let (Some(false), Some(bound)) = (in_range, bound) {
                environmental_risks.push(format!(
                    "{} reading {:.1} outside safe range [{:.1}, {:.1}]",
                    reading.sensor, reading.value, bound.min, bound.max
                ));
            }

            sensors.push(SensorStatus {
                sensor: reading.sensor,
                value: reading.value,
                unit: reading.unit,
                recorded_at: reading.recorded_at,
                age_minutes,
                stale: age_minutes > policy.stale_after_minutes,
                in_range,
            });
        }

        Ok(TelemetryStatusResponse {
            store,
            total_sensors: sensors.len(),
            sensors,
            environmental_risks,
        })
    }

    /// Raw reading history for a store, newest first.
    pub fn telemetry_history(
        &self,
        store_id: StoreId,
        sensor: Option<&str>,
        hours: i64,
        now: DateTime<Utc>,
    ) -> EngineResult<TelemetryHistoryResponse> {
        if hours <= 0 {
            return Err(EngineError::invalid_range("hours must be positive"));
        }
        let store = self.require_store(store_id)?;
        let since = now - Duration::hours(hours);
        let readings = self.store().telemetry_since(store_id, since, sensor)?;

        Ok(TelemetryHistoryResponse {
            store_id,
            store_name: store.name,
            sensor_filter: sensor.map(str::to_string),
            hours,
            total: readings.len(),
            readings,
        })
    }
}

//! Observation row types and the transfer ledger model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::{EngineError, SkuId, StoreId, TransferId};

/// Key of every per (store, SKU) series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub store_id: StoreId,
    pub sku_id: SkuId,
}

impl SeriesKey {
    pub fn new(store_id: StoreId, sku_id: SkuId) -> Self {
        Self { store_id, sku_id }
    }
}

/// End-of-day on-hand position. Append-only; the latest row per key is the
/// current state. `u32` carries the never-negative invariant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub store_id: StoreId,
    pub sku_id: SkuId,
    pub date: NaiveDate,
    pub on_hand: u32,
}

/// Daily sales observation. Mandatory granularity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesDaily {
    pub store_id: StoreId,
    pub sku_id: SkuId,
    pub date: NaiveDate,
    pub qty_sold: u32,
}

/// Hourly sales observation. Optional and sparse; absence degrades to a
/// synthesized curve, never an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesHourly {
    pub store_id: StoreId,
    pub sku_id: SkuId,
    pub date: NaiveDate,
    pub hour: u32,
    pub qty_sold: u32,
}

/// Daily receiving observation; nets against drawdown in anomaly detection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDaily {
    pub store_id: StoreId,
    pub sku_id: SkuId,
    pub date: NaiveDate,
    pub qty_received: u32,
}

/// Physically verified on-hand. Consumed only by confidence scoring;
/// recording one also appends the implied snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCount {
    pub store_id: StoreId,
    pub sku_id: SkuId,
    pub date: NaiveDate,
    pub counted_on_hand: u32,
}

/// IoT sensor reading; environmental-risk context only, never inventory
/// truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub store_id: StoreId,
    pub sensor: String,
    pub value: f64,
    pub unit: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Transfer lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Draft,
    Approved,
    InTransit,
    Received,
    Cancelled,
}

impl TransferStatus {
    /// Allowed lifecycle steps; `Received` and `Cancelled` are terminal.
    pub fn can_transition_to(self, next: TransferStatus) -> bool {
        use TransferStatus::*;
        matches!(
            (self, next),
            (Draft, Approved)
                | (Draft, Cancelled)
                | (Approved, InTransit)
                | (Approved, Cancelled)
                | (InTransit, Received)
                | (InTransit, Cancelled)
        )
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            "in_transit" => Ok(Self::InTransit),
            "received" => Ok(Self::Received),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::invalid_transfer(format!(
                "unknown status '{other}'"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::InTransit => "in_transit",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Request to commit a transfer draft. `requested_at` is part of the
/// idempotence key: replaying the same draft yields the same record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    pub from_store_id: StoreId,
    pub to_store_id: StoreId,
    pub sku_id: SkuId,
    pub qty: u32,
    pub requested_at: DateTime<Utc>,
}

/// A committed transfer on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub from_store_id: StoreId,
    pub to_store_id: StoreId,
    pub sku_id: SkuId,
    pub qty: u32,
    pub status: TransferStatus,
    pub requested_at: DateTime<Utc>,
    pub received_on: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions() {
        use TransferStatus::*;
        assert!(Draft.can_transition_to(Approved));
        assert!(Approved.can_transition_to(InTransit));
        assert!(InTransit.can_transition_to(Received));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(!Received.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Received));
    }

    #[test]
    fn status_parse_round_trips() {
        for s in ["draft", "approved", "in_transit", "received", "cancelled"] {
            assert_eq!(TransferStatus::parse(s).unwrap().label(), s);
        }
        assert!(TransferStatus::parse("shipped").is_err());
    }
}

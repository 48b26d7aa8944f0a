//! In-memory time series store.
//!
//! Intended for embedding and tests; a durable backend would implement the
//! same read/write surface. Reads clone rows out under the read lock. The
//! collaborator write operations take the write lock for their whole
//! effect, so a concurrent reader never observes a torn state (e.g. a cycle
//! count without its implied snapshot).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use tracing::{debug, info, warn};

use stockwise_core::{EngineError, EngineResult, SkuId, StoreId, TransferId};

use crate::catalog::{Distance, DistanceMatrix, Sku, Store};
use crate::series::{
    CycleCount, InventorySnapshot, ReceiptDaily, SalesDaily, SalesHourly, SeriesKey,
    TelemetryReading, TransferDraft, TransferRecord, TransferStatus,
};

/// Outcome of committing a transfer draft.
///
/// `replayed` is true when the draft had already been committed under the
/// same (from, to, SKU, requested-at) key and the existing record was
/// returned instead of a duplicate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommittedTransfer {
    pub id: TransferId,
    pub replayed: bool,
}

#[derive(Debug, Default)]
struct Inner {
    stores: HashMap<StoreId, Store>,
    skus: HashMap<SkuId, Sku>,
    distances: DistanceMatrix,
    snapshots: HashMap<SeriesKey, BTreeMap<NaiveDate, u32>>,
    sales_daily: HashMap<SeriesKey, BTreeMap<NaiveDate, u32>>,
    sales_hourly: HashMap<SeriesKey, BTreeMap<(NaiveDate, u32), u32>>,
    receipts: HashMap<SeriesKey, BTreeMap<NaiveDate, u32>>,
    cycle_counts: HashMap<SeriesKey, BTreeMap<NaiveDate, u32>>,
    transfers: Vec<TransferRecord>,
    transfer_index: HashMap<TransferId, usize>,
    transfer_fingerprints: HashSet<(StoreId, StoreId, SkuId, DateTime<Utc>)>,
    telemetry: HashMap<StoreId, Vec<TelemetryReading>>,
}

impl Inner {
    fn ensure_store(&self, store_id: StoreId) -> EngineResult<()> {
        if self.stores.contains_key(&store_id) {
            Ok(())
        } else {
            Err(EngineError::UnknownStore(store_id))
        }
    }

    fn ensure_sku(&self, sku_id: SkuId) -> EngineResult<()> {
        if self.skus.contains_key(&sku_id) {
            Ok(())
        } else {
            Err(EngineError::UnknownSku(sku_id))
        }
    }

    fn ensure_key(&self, key: SeriesKey) -> EngineResult<()> {
        self.ensure_store(key.store_id)?;
        self.ensure_sku(key.sku_id)
    }
}

/// In-memory, lock-guarded time series store.
#[derive(Debug, Default)]
pub struct TimeSeriesStore {
    inner: RwLock<Inner>,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| EngineError::storage("lock poisoned"))
    }

    fn write(&self) -> EngineResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| EngineError::storage("lock poisoned"))
    }

    // ----- catalog -----

    pub fn register_store(&self, store: Store) -> EngineResult<()> {
        let mut inner = self.write()?;
        debug!(store_id = %store.id, name = %store.name, "register store");
        inner.stores.insert(store.id, store);
        Ok(())
    }

    pub fn register_sku(&self, sku: Sku) -> EngineResult<()> {
        let mut inner = self.write()?;
        debug!(sku_id = %sku.id, name = %sku.name, "register sku");
        inner.skus.insert(sku.id, sku);
        Ok(())
    }

    pub fn set_distance(&self, a: StoreId, b: StoreId, distance: Distance) -> EngineResult<()> {
        let mut inner = self.write()?;
        inner.ensure_store(a)?;
        inner.ensure_store(b)?;
        inner.distances.set(a, b, distance);
        Ok(())
    }

    pub fn store(&self, store_id: StoreId) -> EngineResult<Option<Store>> {
        Ok(self.read()?.stores.get(&store_id).cloned())
    }

    pub fn sku(&self, sku_id: SkuId) -> EngineResult<Option<Sku>> {
        Ok(self.read()?.skus.get(&sku_id).cloned())
    }

    /// All stores, ordered by id for deterministic iteration.
    pub fn stores(&self) -> EngineResult<Vec<Store>> {
        let inner = self.read()?;
        let mut stores: Vec<Store> = inner.stores.values().cloned().collect();
        stores.sort_by_key(|s| s.id);
        Ok(stores)
    }

    /// All SKUs, ordered by id for deterministic iteration.
    pub fn skus(&self) -> EngineResult<Vec<Sku>> {
        let inner = self.read()?;
        let mut skus: Vec<Sku> = inner.skus.values().cloned().collect();
        skus.sort_by_key(|s| s.id);
        Ok(skus)
    }

    pub fn distance(&self, a: StoreId, b: StoreId) -> EngineResult<Option<Distance>> {
        Ok(self.read()?.distances.get(a, b))
    }

    /// Snapshot of the whole matrix for batch matching.
    pub fn distances(&self) -> EngineResult<DistanceMatrix> {
        Ok(self.read()?.distances.clone())
    }

    // ----- observation writes -----

    pub fn record_snapshot(&self, row: InventorySnapshot) -> EngineResult<()> {
        let mut inner = self.write()?;
        let key = SeriesKey::new(row.store_id, row.sku_id);
        inner.ensure_key(key)?;
        inner
            .snapshots
            .entry(key)
            .or_default()
            .insert(row.date, row.on_hand);
        Ok(())
    }

    pub fn record_sale(&self, row: SalesDaily) -> EngineResult<()> {
        let mut inner = self.write()?;
        let key = SeriesKey::new(row.store_id, row.sku_id);
        inner.ensure_key(key)?;
        inner
            .sales_daily
            .entry(key)
            .or_default()
            .insert(row.date, row.qty_sold);
        Ok(())
    }

    pub fn record_hourly_sale(&self, row: SalesHourly) -> EngineResult<()> {
        if row.hour > 23 {
            return Err(EngineError::invalid_range(format!(
                "hour {} out of range",
                row.hour
            )));
        }
        let mut inner = self.write()?;
        let key = SeriesKey::new(row.store_id, row.sku_id);
        inner.ensure_key(key)?;
        inner
            .sales_hourly
            .entry(key)
            .or_default()
            .insert((row.date, row.hour), row.qty_sold);
        Ok(())
    }

    pub fn record_receipt(&self, row: ReceiptDaily) -> EngineResult<()> {
        let mut inner = self.write()?;
        let key = SeriesKey::new(row.store_id, row.sku_id);
        inner.ensure_key(key)?;
        inner
            .receipts
            .entry(key)
            .or_default()
            .insert(row.date, row.qty_received);
        Ok(())
    }

    /// Record a physical count and the snapshot it implies, atomically.
    pub fn record_cycle_count(&self, row: CycleCount) -> EngineResult<()> {
        let mut inner = self.write()?;
        let key = SeriesKey::new(row.store_id, row.sku_id);
        inner.ensure_key(key)?;
        info!(
            store_id = %row.store_id,
            sku_id = %row.sku_id,
            date = %row.date,
            counted = row.counted_on_hand,
            "record cycle count"
        );
        inner
            .cycle_counts
            .entry(key)
            .or_default()
            .insert(row.date, row.counted_on_hand);
        inner
            .snapshots
            .entry(key)
            .or_default()
            .insert(row.date, row.counted_on_hand);
        Ok(())
    }

    pub fn record_telemetry(&self, reading: TelemetryReading) -> EngineResult<()> {
        let mut inner = self.write()?;
        inner.ensure_store(reading.store_id)?;
        inner
            .telemetry
            .entry(reading.store_id)
            .or_default()
            .push(reading);
        Ok(())
    }

    // ----- observation reads -----

    pub fn latest_snapshot(&self, key: SeriesKey) -> EngineResult<Option<InventorySnapshot>> {
        let inner = self.read()?;
        Ok(inner.snapshots.get(&key).and_then(|series| {
            series.iter().next_back().map(|(date, on_hand)| InventorySnapshot {
                store_id: key.store_id,
                sku_id: key.sku_id,
                date: *date,
                on_hand: *on_hand,
            })
        }))
    }

    /// Snapshots within `[start, end]`, ordered by date.
    pub fn snapshots_between(
        &self,
        key: SeriesKey,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<InventorySnapshot>> {
        if start > end {
            return Err(EngineError::invalid_range(format!(
                "start {start} after end {end}"
            )));
        }
        let inner = self.read()?;
        Ok(inner
            .snapshots
            .get(&key)
            .map(|series| {
                series
                    .range(start..=end)
                    .map(|(date, on_hand)| InventorySnapshot {
                        store_id: key.store_id,
                        sku_id: key.sku_id,
                        date: *date,
                        on_hand: *on_hand,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Daily sales within `[start, end]`, ordered by date.
    pub fn sales_between(
        &self,
        key: SeriesKey,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<SalesDaily>> {
        if start > end {
            return Err(EngineError::invalid_range(format!(
                "start {start} after end {end}"
            )));
        }
        let inner = self.read()?;
        Ok(inner
            .sales_daily
            .get(&key)
            .map(|series| {
                series
                    .range(start..=end)
                    .map(|(date, qty)| SalesDaily {
                        store_id: key.store_id,
                        sku_id: key.sku_id,
                        date: *date,
                        qty_sold: *qty,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn sale_on(&self, key: SeriesKey, date: NaiveDate) -> EngineResult<Option<u32>> {
        let inner = self.read()?;
        Ok(inner
            .sales_daily
            .get(&key)
            .and_then(|series| series.get(&date).copied()))
    }

    /// All hourly observations for the key, ordered by (date, hour).
    pub fn hourly_sales(&self, key: SeriesKey) -> EngineResult<Vec<SalesHourly>> {
        let inner = self.read()?;
        Ok(inner
            .sales_hourly
            .get(&key)
            .map(|series| {
                series
                    .iter()
                    .map(|((date, hour), qty)| SalesHourly {
                        store_id: key.store_id,
                        sku_id: key.sku_id,
                        date: *date,
                        hour: *hour,
                        qty_sold: *qty,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Most-recent-first samples for one (hour, weekday) slot, capped at
    /// `limit`. Degrades to hour-only matching when the weekday filter
    /// finds nothing.
    pub fn hourly_samples(
        &self,
        key: SeriesKey,
        hour: u32,
        weekday: Weekday,
        limit: usize,
    ) -> EngineResult<Vec<u32>> {
        let inner = self.read()?;
        let Some(series) = inner.sales_hourly.get(&key) else {
            return Ok(Vec::new());
        };
        let collect = |match_weekday: bool| -> Vec<u32> {
            series
                .iter()
                .rev()
                .filter(|((date, h), _)| {
                    *h == hour && (!match_weekday || date.weekday() == weekday)
                })
                .map(|(_, qty)| *qty)
                .take(limit)
                .collect()
        };
        let samples = collect(true);
        if samples.is_empty() {
            Ok(collect(false))
        } else {
            Ok(samples)
        }
    }

    pub fn receipts_on(&self, key: SeriesKey, date: NaiveDate) -> EngineResult<u32> {
        let inner = self.read()?;
        Ok(inner
            .receipts
            .get(&key)
            .and_then(|series| series.get(&date).copied())
            .unwrap_or(0))
    }

    pub fn last_cycle_count(&self, key: SeriesKey) -> EngineResult<Option<CycleCount>> {
        let inner = self.read()?;
        Ok(inner.cycle_counts.get(&key).and_then(|series| {
            series.iter().next_back().map(|(date, counted)| CycleCount {
                store_id: key.store_id,
                sku_id: key.sku_id,
                date: *date,
                counted_on_hand: *counted,
            })
        }))
    }

    // ----- transfer ledger -----

    /// Commit a transfer draft onto the ledger.
    ///
    /// Idempotent per (from, to, SKU, requested-at): replaying an already
    /// committed draft returns the existing record's id.
    pub fn commit_transfer(&self, draft: TransferDraft) -> EngineResult<CommittedTransfer> {
        if draft.from_store_id == draft.to_store_id {
            return Err(EngineError::invalid_transfer("cannot transfer to same store"));
        }
        if draft.qty == 0 {
            return Err(EngineError::invalid_transfer("quantity must be positive"));
        }

        let mut inner = self.write()?;
        inner.ensure_store(draft.from_store_id)?;
        inner.ensure_store(draft.to_store_id)?;
        inner.ensure_sku(draft.sku_id)?;

        let fingerprint = (
            draft.from_store_id,
            draft.to_store_id,
            draft.sku_id,
            draft.requested_at,
        );
        if inner.transfer_fingerprints.contains(&fingerprint) {
            let existing = inner
                .transfers
                .iter()
                .find(|t| {
                    t.from_store_id == draft.from_store_id
                        && t.to_store_id == draft.to_store_id
                        && t.sku_id == draft.sku_id
                        && t.requested_at == draft.requested_at
                })
                .map(|t| t.id)
                .ok_or_else(|| EngineError::storage("fingerprint without record"))?;
            warn!(transfer_id = %existing, "transfer draft replayed; returning existing record");
            return Ok(CommittedTransfer {
                id: existing,
                replayed: true,
            });
        }

        let record = TransferRecord {
            id: TransferId::new(),
            from_store_id: draft.from_store_id,
            to_store_id: draft.to_store_id,
            sku_id: draft.sku_id,
            qty: draft.qty,
            status: TransferStatus::Draft,
            requested_at: draft.requested_at,
            received_on: None,
        };
        info!(
            transfer_id = %record.id,
            from = %record.from_store_id,
            to = %record.to_store_id,
            qty = record.qty,
            "transfer draft committed"
        );
        let id = record.id;
        let idx = inner.transfers.len();
        inner.transfers.push(record);
        inner.transfer_index.insert(id, idx);
        inner.transfer_fingerprints.insert(fingerprint);
        Ok(CommittedTransfer {
            id,
            replayed: false,
        })
    }

    /// Advance a transfer through its lifecycle. Moving to `Received`
    /// stamps `received_on` with `as_of`.
    pub fn update_transfer_status(
        &self,
        id: TransferId,
        status: TransferStatus,
        as_of: NaiveDate,
    ) -> EngineResult<TransferRecord> {
        let mut inner = self.write()?;
        let idx = *inner
            .transfer_index
            .get(&id)
            .ok_or_else(|| EngineError::invalid_transfer(format!("unknown transfer {id}")))?;
        let current = inner.transfers[idx].status;
        if !current.can_transition_to(status) {
            return Err(EngineError::invalid_transfer(format!(
                "cannot move {} -> {}",
                current.label(),
                status.label()
            )));
        }
        let record = &mut inner.transfers[idx];
        record.status = status;
        if status == TransferStatus::Received {
            record.received_on = Some(as_of);
        }
        info!(transfer_id = %id, status = status.label(), "transfer status updated");
        Ok(record.clone())
    }

    pub fn transfer(&self, id: TransferId) -> EngineResult<Option<TransferRecord>> {
        let inner = self.read()?;
        Ok(inner
            .transfer_index
            .get(&id)
            .map(|idx| inner.transfers[*idx].clone()))
    }

    /// Ledger listing, newest request first, with optional filters.
    pub fn transfers(
        &self,
        store_id: Option<StoreId>,
        status: Option<TransferStatus>,
    ) -> EngineResult<Vec<TransferRecord>> {
        let inner = self.read()?;
        let mut records: Vec<TransferRecord> = inner
            .transfers
            .iter()
            .filter(|t| {
                store_id
                    .map(|s| t.from_store_id == s || t.to_store_id == s)
                    .unwrap_or(true)
                    && status.map(|st| t.status == st).unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| b.requested_at.cmp(&a.requested_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Units received into (store, SKU) on `date`.
    pub fn transfers_in_on(&self, key: SeriesKey, date: NaiveDate) -> EngineResult<u32> {
        let inner = self.read()?;
        Ok(inner
            .transfers
            .iter()
            .filter(|t| {
                t.to_store_id == key.store_id
                    && t.sku_id == key.sku_id
                    && t.status == TransferStatus::Received
                    && t.received_on == Some(date)
            })
            .map(|t| t.qty)
            .sum())
    }

    /// Units committed out of (store, SKU) on `date` (approved or further).
    pub fn transfers_out_on(&self, key: SeriesKey, date: NaiveDate) -> EngineResult<u32> {
        let inner = self.read()?;
        Ok(inner
            .transfers
            .iter()
            .filter(|t| {
                t.from_store_id == key.store_id
                    && t.sku_id == key.sku_id
                    && matches!(
                        t.status,
                        TransferStatus::Approved
                            | TransferStatus::InTransit
                            | TransferStatus::Received
                    )
                    && t.requested_at.date_naive() == date
            })
            .map(|t| t.qty)
            .sum())
    }

    // ----- telemetry -----

    /// Readings at or after `since`, newest first, optionally filtered by
    /// sensor id.
    pub fn telemetry_since(
        &self,
        store_id: StoreId,
        since: DateTime<Utc>,
        sensor: Option<&str>,
    ) -> EngineResult<Vec<TelemetryReading>> {
        let inner = self.read()?;
        inner.ensure_store(store_id)?;
        let mut readings: Vec<TelemetryReading> = inner
            .telemetry
            .get(&store_id)
            .map(|rs| {
                rs.iter()
                    .filter(|r| {
                        r.recorded_at >= since
                            && sensor.map(|s| r.sensor == s).unwrap_or(true)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(readings)
    }

    /// Latest reading per sensor at a store, ordered by sensor id.
    pub fn latest_telemetry(&self, store_id: StoreId) -> EngineResult<Vec<TelemetryReading>> {
        let inner = self.read()?;
        inner.ensure_store(store_id)?;
        let mut latest: BTreeMap<String, TelemetryReading> = BTreeMap::new();
        if let Some(readings) = inner.telemetry.get(&store_id) {
            for reading in readings {
                match latest.get(&reading.sensor) {
                    Some(existing) if existing.recorded_at >= reading.recorded_at => {}
                    _ => {
                        latest.insert(reading.sensor.clone(), reading.clone());
                    }
                }
            }
        }
        Ok(latest.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seeded() -> (TimeSeriesStore, StoreId, SkuId) {
        let store = TimeSeriesStore::new();
        let store_id = StoreId::new();
        let sku_id = SkuId::new();
        store
            .register_store(Store::new(store_id, "Downtown"))
            .unwrap();
        store
            .register_sku(Sku::new(sku_id, "Chicken", "Proteins"))
            .unwrap();
        (store, store_id, sku_id)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn latest_snapshot_wins_per_key() {
        let (store, store_id, sku_id) = seeded();
        let key = SeriesKey::new(store_id, sku_id);
        for (d, on_hand) in [(1, 50), (2, 44), (3, 39)] {
            store
                .record_snapshot(InventorySnapshot {
                    store_id,
                    sku_id,
                    date: day(d),
                    on_hand,
                })
                .unwrap();
        }

        let latest = store.latest_snapshot(key).unwrap().unwrap();
        assert_eq!(latest.date, day(3));
        assert_eq!(latest.on_hand, 39);
        assert_eq!(store.snapshots_between(key, day(1), day(2)).unwrap().len(), 2);
    }

    #[test]
    fn unknown_ids_rejected_at_write() {
        let (store, store_id, _) = seeded();
        let err = store
            .record_snapshot(InventorySnapshot {
                store_id,
                sku_id: SkuId::new(),
                date: day(1),
                on_hand: 10,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownSku(_)));
    }

    #[test]
    fn inverted_range_rejected() {
        let (store, store_id, sku_id) = seeded();
        let key = SeriesKey::new(store_id, sku_id);
        let err = store.snapshots_between(key, day(5), day(1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange(_)));
    }

    #[test]
    fn cycle_count_appends_count_and_snapshot_atomically() {
        let (store, store_id, sku_id) = seeded();
        let key = SeriesKey::new(store_id, sku_id);
        store
            .record_cycle_count(CycleCount {
                store_id,
                sku_id,
                date: day(4),
                counted_on_hand: 57,
            })
            .unwrap();

        assert_eq!(
            store.last_cycle_count(key).unwrap().unwrap().counted_on_hand,
            57
        );
        assert_eq!(store.latest_snapshot(key).unwrap().unwrap().on_hand, 57);
    }

    #[test]
    fn transfer_commit_is_idempotent_per_draft() {
        let (store, from, sku_id) = seeded();
        let to = StoreId::new();
        store.register_store(Store::new(to, "Airport")).unwrap();
        let draft = TransferDraft {
            from_store_id: from,
            to_store_id: to,
            sku_id,
            qty: 12,
            requested_at: Utc.with_ymd_and_hms(2025, 6, 5, 9, 30, 0).unwrap(),
        };

        let first = store.commit_transfer(draft).unwrap();
        let second = store.commit_transfer(draft).unwrap();
        assert_eq!(first.id, second.id);
        assert!(!first.replayed);
        assert!(second.replayed);
        assert_eq!(store.transfers(None, None).unwrap().len(), 1);
    }

    #[test]
    fn transfer_rejects_self_and_zero_qty() {
        let (store, from, sku_id) = seeded();
        let requested_at = Utc.with_ymd_and_hms(2025, 6, 5, 9, 30, 0).unwrap();
        assert!(
            store
                .commit_transfer(TransferDraft {
                    from_store_id: from,
                    to_store_id: from,
                    sku_id,
                    qty: 5,
                    requested_at,
                })
                .is_err()
        );
        let to = StoreId::new();
        store.register_store(Store::new(to, "Airport")).unwrap();
        assert!(
            store
                .commit_transfer(TransferDraft {
                    from_store_id: from,
                    to_store_id: to,
                    sku_id,
                    qty: 0,
                    requested_at,
                })
                .is_err()
        );
    }

    #[test]
    fn transfer_lifecycle_feeds_daily_movements() {
        let (store, from, sku_id) = seeded();
        let to = StoreId::new();
        store.register_store(Store::new(to, "Airport")).unwrap();
        let requested_at = Utc.with_ymd_and_hms(2025, 6, 5, 9, 30, 0).unwrap();
        let committed = store
            .commit_transfer(TransferDraft {
                from_store_id: from,
                to_store_id: to,
                sku_id,
                qty: 12,
                requested_at,
            })
            .unwrap();

        store
            .update_transfer_status(committed.id, TransferStatus::Approved, day(5))
            .unwrap();
        store
            .update_transfer_status(committed.id, TransferStatus::InTransit, day(5))
            .unwrap();
        store
            .update_transfer_status(committed.id, TransferStatus::Received, day(6))
            .unwrap();

        let out_key = SeriesKey::new(from, sku_id);
        let in_key = SeriesKey::new(to, sku_id);
        assert_eq!(store.transfers_out_on(out_key, day(5)).unwrap(), 12);
        assert_eq!(store.transfers_in_on(in_key, day(6)).unwrap(), 12);
        assert_eq!(store.transfers_in_on(in_key, day(5)).unwrap(), 0);

        let err = store
            .update_transfer_status(committed.id, TransferStatus::Cancelled, day(6))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransfer(_)));
    }

    #[test]
    fn latest_telemetry_keeps_one_reading_per_sensor() {
        let (store, store_id, _) = seeded();
        for (minute, value) in [(0, 3.4), (10, 4.1)] {
            store
                .record_telemetry(TelemetryReading {
                    store_id,
                    sensor: "cooler_temp_c".to_string(),
                    value,
                    unit: Some("celsius".to_string()),
                    recorded_at: Utc.with_ymd_and_hms(2025, 6, 5, 9, minute, 0).unwrap(),
                })
                .unwrap();
        }
        store
            .record_telemetry(TelemetryReading {
                store_id,
                sensor: "cooler_humidity_pct".to_string(),
                value: 41.0,
                unit: Some("pct".to_string()),
                recorded_at: Utc.with_ymd_and_hms(2025, 6, 5, 9, 5, 0).unwrap(),
            })
            .unwrap();

        let latest = store.latest_telemetry(store_id).unwrap();
        assert_eq!(latest.len(), 2);
        let cooler = latest.iter().find(|r| r.sensor == "cooler_temp_c").unwrap();
        assert_eq!(cooler.value, 4.1);
    }
}

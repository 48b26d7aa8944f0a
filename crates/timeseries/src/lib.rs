//! Time series store: reference catalog, per (store, SKU) observation
//! series, the transfer ledger, and telemetry readings.
//!
//! Pure data access — no analytics. Reads clone rows out under the read
//! lock; the two collaborator write operations (commit a transfer, record a
//! cycle count) take the write lock, so concurrent readers observe either
//! fully the pre- or fully the post-write state.

pub mod catalog;
pub mod series;
pub mod store;

pub use catalog::{Distance, DistanceMatrix, Sku, Store};
pub use series::{
    CycleCount, InventorySnapshot, ReceiptDaily, SalesDaily, SalesHourly, SeriesKey,
    TelemetryReading, TransferDraft, TransferRecord, TransferStatus,
};
pub use store::{CommittedTransfer, TimeSeriesStore};

//! Engine error model.

use thiserror::Error;

use crate::id::{SkuId, StoreId};

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Only structural failures live here: unknown identifiers, malformed
/// parameters, rejected writes. Data-quality conditions (sparse history,
/// missing hourly data, stale counts) are never errors — they are absorbed
/// into confidence tiers and estimation flags on the outputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The referenced store is not in the catalog.
    #[error("unknown store: {0}")]
    UnknownStore(StoreId),

    /// The referenced SKU is not in the catalog.
    #[error("unknown sku: {0}")]
    UnknownSku(SkuId),

    /// A date/window/hour parameter failed validation.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A transfer write was structurally invalid (self-transfer, zero qty,
    /// unknown status transition).
    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),

    /// The underlying store could not be accessed (poisoned lock).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn invalid_transfer(msg: impl Into<String>) -> Self {
        Self::InvalidTransfer(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

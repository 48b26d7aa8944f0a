//! Immutable reference data: stores, SKUs, inter-store distances.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockwise_core::{SkuId, StoreId};

/// A physical store location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// Free-form address; distance comes from the matrix, not from here.
    pub location: Option<String>,
}

impl Store {
    pub fn new(id: StoreId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A stock keeping unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub id: SkuId,
    pub name: String,
    pub category: String,
    /// Unit cost in smallest currency unit (e.g., cents).
    pub unit_cost: u64,
    /// Unit price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    /// Perishables weigh heavier in anomaly and cycle-count priority.
    pub perishable: bool,
}

impl Sku {
    pub fn new(id: SkuId, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            unit_cost: 0,
            unit_price: 0,
            perishable: false,
        }
    }

    pub fn with_pricing(mut self, unit_cost: u64, unit_price: u64) -> Self {
        self.unit_cost = unit_cost;
        self.unit_price = unit_price;
        self
    }

    pub fn perishable(mut self) -> Self {
        self.perishable = true;
        self
    }
}

/// Distance between a pair of stores, with an optional pre-negotiated
/// transfer cost overriding the policy cost model.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub km: f64,
    pub transfer_cost: Option<f64>,
}

/// Symmetric store-pair distance lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMatrix {
    entries: HashMap<(StoreId, StoreId), Distance>,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: StoreId, b: StoreId) -> (StoreId, StoreId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn set(&mut self, a: StoreId, b: StoreId, distance: Distance) {
        self.entries.insert(Self::key(a, b), distance);
    }

    pub fn get(&self, a: StoreId, b: StoreId) -> Option<Distance> {
        self.entries.get(&Self::key(a, b)).copied()
    }
}

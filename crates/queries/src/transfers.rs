//! Transfer recommendation listing and the ledger view.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::{EngineResult, SkuId, StoreId, TransferId, TransferPolicy};
use stockwise_forecast::days_of_cover;
use stockwise_timeseries::{SeriesKey, Sku, TransferStatus};
use stockwise_transfer::{
    StoreCoverage, TransferRecommendation, TransferSummary, recommend_for_sku, summarize,
};

use crate::engine::Analytics;

/// Recommendation listing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferParams {
    /// Overrides the policy's minimum urgency when set.
    pub min_urgency: Option<f64>,
    pub limit: usize,
}

impl Default for TransferParams {
    fn default() -> Self {
        Self {
            min_urgency: None,
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecommendationsResponse {
    pub recommendations: Vec<TransferRecommendation>,
    /// Receiver store name → its incoming proposals.
    pub grouped_by_receiver: BTreeMap<String, Vec<TransferRecommendation>>,
    pub total: usize,
    pub summary: TransferSummary,
}

/// One ledger row joined with catalog names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferView {
    pub id: TransferId,
    pub from_store_id: StoreId,
    pub from_store_name: String,
    pub to_store_id: StoreId,
    pub to_store_name: String,
    pub sku_id: SkuId,
    pub sku_name: String,
    pub qty: u32,
    pub status: TransferStatus,
    pub requested_at: DateTime<Utc>,
    pub received_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferListResponse {
    pub transfers: Vec<TransferView>,
    pub total: usize,
}

impl Analytics {
    /// Per-store coverage rows for one SKU, skipping stores with no
    /// snapshot or negligible demand.
    fn sku_coverages(&self, sku: &Sku, today: NaiveDate) -> EngineResult<Vec<StoreCoverage>> {
        let mut coverages = Vec::new();
        for store in self.store().stores()? {
            let key = SeriesKey::new(store.id, sku.id);
            let Some(snapshot) = self.store().latest_snapshot(key)? else {
                continue;
            };
            let forecast = self.daily_forecast(key, today, &[])?;
            if forecast.daily_demand < self.policy().forecast.demand_floor {
                continue;
            }
            coverages.push(StoreCoverage {
                store_id: store.id,
                store_name: store.name.clone(),
                on_hand: snapshot.on_hand,
                daily_demand: forecast.daily_demand,
                days_of_cover: days_of_cover(
                    snapshot.on_hand,
                    forecast.daily_demand,
                    &self.policy().forecast,
                ),
            });
        }
        Ok(coverages)
    }

    /// Ranked proposals across every SKU.
    pub fn transfer_recommendations(
        &self,
        params: &TransferParams,
        today: NaiveDate,
    ) -> EngineResult<TransferRecommendationsResponse> {
        let policy = TransferPolicy {
            min_urgency: params
                .min_urgency
                .unwrap_or(self.policy().transfer.min_urgency),
            ..self.policy().transfer.clone()
        };
        let distances = self.store().distances()?;

        let mut recommendations = Vec::new();
        for sku in self.store().skus()? {
            let coverages = self.sku_coverages(&sku, today)?;
            recommendations.extend(recommend_for_sku(
                sku.id,
                &sku.name,
                &coverages,
                &distances,
                &policy,
            ));
        }

        recommendations.sort_by(|a, b| {
            b.urgency
                .partial_cmp(&a.urgency)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.transfer_cost
                        .partial_cmp(&b.transfer_cost)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.from_store_id.cmp(&b.from_store_id))
        });
        recommendations.truncate(params.limit);

        let summary = summarize(&recommendations, &policy);
        let mut grouped_by_receiver: BTreeMap<String, Vec<TransferRecommendation>> =
            BTreeMap::new();
        for rec in &recommendations {
            grouped_by_receiver
                .entry(rec.to_store_name.clone())
                .or_default()
                .push(rec.clone());
        }

        Ok(TransferRecommendationsResponse {
            total: recommendations.len(),
            recommendations,
            grouped_by_receiver,
            summary,
        })
    }

    /// Ledger listing joined with catalog names, newest first.
    pub fn list_transfers(
        &self,
        store_id: Option<StoreId>,
        status: Option<TransferStatus>,
    ) -> EngineResult<TransferListResponse> {
        if let Some(store_id) = store_id {
            self.require_store(store_id)?;
        }
        let records = self.store().transfers(store_id, status)?;
        let mut transfers = Vec::with_capacity(records.len());
        for record in records {
            let from = self.require_store(record.from_store_id)?;
            let to = self.require_store(record.to_store_id)?;
            let sku = self.require_sku(record.sku_id)?;
            transfers.push(TransferView {
                id: record.id,
                from_store_id: record.from_store_id,
                from_store_name: from.name,
                to_store_id: record.to_store_id,
                to_store_name: to.name,
                sku_id: record.sku_id,
                sku_name: sku.name,
                qty: record.qty,
                status: record.status,
                requested_at: record.requested_at,
                received_on: record.received_on,
            });
        }
        Ok(TransferListResponse {
            total: transfers.len(),
            transfers,
        })
    }
}

//! Cycle-count priority listing: which SKUs to physically count first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwise_confidence::{CountCandidate, CycleCountRecommendation, rank_count_priority};
use stockwise_core::{EngineResult, StoreId};
use stockwise_timeseries::SeriesKey;

use crate::engine::Analytics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPriorityResponse {
    pub store_id: StoreId,
    pub store_name: String,
    pub recommendations: Vec<CycleCountRecommendation>,
    pub total: usize,
}

impl Analytics {
    /// SKUs at a store ranked by how badly they need a physical count:
    /// low confidence first, weighted by value at risk and perishability.
    pub fn cycle_count_priorities(
        &self,
        store_id: StoreId,
        limit: usize,
        today: NaiveDate,
    ) -> EngineResult<CountPriorityResponse> {
        let store = self.require_store(store_id)?;

        let mut candidates = Vec::new();
        for sku in self.store().skus()? {
            let key = SeriesKey::new(store_id, sku.id);
            let Some(snapshot) = self.store().latest_snapshot(key)? else {
                continue;
            };
            let forecast = self.daily_forecast(key, today, &[])?;
            let (_, _, confidence) = self.quality_report(key, &sku, &forecast, today)?;
            candidates.push(CountCandidate {
                sku_id: sku.id,
                sku_name: sku.name.clone(),
                category: sku.category.clone(),
                on_hand: snapshot.on_hand,
                unit_price: sku.unit_price,
                perishable: sku.perishable,
                confidence_score: confidence.score,
            });
        }

        let mut recommendations = rank_count_priority(candidates);
        recommendations.truncate(limit);

        Ok(CountPriorityResponse {
            store_id,
            store_name: store.name,
            total: recommendations.len(),
            recommendations,
        })
    }
}

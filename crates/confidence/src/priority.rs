//! Cycle-count priority: which SKUs to physically count first.

use serde::{Deserialize, Serialize};

use stockwise_core::SkuId;

/// Blend weights for the priority score. Lower confidence dominates; value
/// at risk and perishability push items up the list.
const CONFIDENCE_WEIGHT: f64 = 0.6;
const VALUE_WEIGHT: f64 = 0.3;
const PERISHABLE_BONUS: f64 = 0.3;
/// On-hand value (in currency units) at which the value factor saturates.
const VALUE_SATURATION: f64 = 1000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPriority {
    High,
    Medium,
    Low,
}

impl CountPriority {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One SKU under consideration at a store.
#[derive(Debug, Clone, PartialEq)]
pub struct CountCandidate {
    pub sku_id: SkuId,
    pub sku_name: String,
    pub category: String,
    pub on_hand: u32,
    /// Unit price in smallest currency unit (cents).
    pub unit_price: u64,
    pub perishable: bool,
    pub confidence_score: f64,
}

/// Ranked cycle-count recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleCountRecommendation {
    pub sku_id: SkuId,
    pub sku_name: String,
    pub category: String,
    pub on_hand: u32,
    /// On-hand value in currency units.
    pub value: f64,
    pub perishable: bool,
    pub confidence_score: f64,
    pub priority_score: f64,
    pub priority: CountPriority,
}

/// Rank candidates by count priority, highest first. Ties resolve by SKU
/// id so the listing is stable.
pub fn rank_count_priority(candidates: Vec<CountCandidate>) -> Vec<CycleCountRecommendation> {
    let mut recommendations: Vec<CycleCountRecommendation> = candidates
        .into_iter()
        .map(|c| {
            let value = c.on_hand as f64 * c.unit_price as f64 / 100.0;
            let confidence_factor = (100.0 - c.confidence_score).clamp(0.0, 100.0) / 100.0;
            let value_factor = (value / VALUE_SATURATION).min(1.0);
            let perishable_factor = if c.perishable { PERISHABLE_BONUS } else { 0.0 };
            let priority_score = confidence_factor * CONFIDENCE_WEIGHT
                + value_factor * VALUE_WEIGHT
                + perishable_factor;

            let priority = if priority_score > 0.7 {
                CountPriority::High
            } else if priority_score > 0.4 {
                CountPriority::Medium
            } else {
                CountPriority::Low
            };

            CycleCountRecommendation {
                sku_id: c.sku_id,
                sku_name: c.sku_name,
                category: c.category,
                on_hand: c.on_hand,
                value,
                perishable: c.perishable,
                confidence_score: c.confidence_score,
                priority_score,
                priority,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.sku_id.cmp(&b.sku_id))
    });
    recommendations
}

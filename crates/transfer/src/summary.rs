//! Opportunity summary over a recommendation set.

use serde::{Deserialize, Serialize};

use stockwise_core::TransferPolicy;

use crate::recommender::TransferRecommendation;

/// Aggregate view for the transfers dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub total_opportunities: usize,
    pub high_urgency: usize,
    pub medium_urgency: usize,
    pub low_urgency: usize,
    pub total_units: u64,
    pub estimated_savings: f64,
}

/// Bucket recommendations by urgency and estimate savings at the policy's
/// per-prevented-stockout rate.
pub fn summarize(
    recommendations: &[TransferRecommendation],
    policy: &TransferPolicy,
) -> TransferSummary {
    let high_urgency = recommendations.iter().filter(|r| r.urgency >= 0.8).count();
    let medium_urgency = recommendations
        .iter()
        .filter(|r| r.urgency >= 0.5 && r.urgency < 0.8)
        .count();
    let low_urgency = recommendations.iter().filter(|r| r.urgency < 0.5).count();

    TransferSummary {
        total_opportunities: recommendations.len(),
        high_urgency,
        medium_urgency,
        low_urgency,
        total_units: recommendations.iter().map(|r| r.qty as u64).sum(),
        estimated_savings: recommendations.len() as f64 * policy.stockout_cost_estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_core::SkuId;

    fn rec(urgency: f64, qty: u32) -> TransferRecommendation {
        TransferRecommendation {
            from_store_id: stockwise_core::StoreId::new(),
            from_store_name: "D".to_string(),
            to_store_id: stockwise_core::StoreId::new(),
            to_store_name: "R".to_string(),
            sku_id: SkuId::new(),
            sku_name: "Chicken".to_string(),
            qty,
            urgency,
            rationale: String::new(),
            distance_km: None,
            transfer_cost: None,
            receiver_days_before: 1.0,
            receiver_days_after: 5.0,
            donor_days_before: 8.0,
            donor_days_after: 5.0,
        }
    }

    #[test]
    fn buckets_and_totals() {
        let recs = vec![rec(0.9, 10), rec(0.8, 5), rec(0.6, 8), rec(0.3, 2)];
        let summary = summarize(&recs, &TransferPolicy::default());

        assert_eq!(summary.total_opportunities, 4);
        assert_eq!(summary.high_urgency, 2);
        assert_eq!(summary.medium_urgency, 1);
        assert_eq!(summary.low_urgency, 1);
        assert_eq!(summary.total_units, 25);
        assert_eq!(summary.estimated_savings, 200.0);
    }

    #[test]
    fn empty_set_is_all_zero() {
        let summary = summarize(&[], &TransferPolicy::default());
        assert_eq!(summary.total_opportunities, 0);
        assert_eq!(summary.total_units, 0);
        assert_eq!(summary.estimated_savings, 0.0);
    }
}

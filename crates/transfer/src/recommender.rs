//! Greedy donor/receiver matching.

use serde::{Deserialize, Serialize};

use stockwise_core::{SkuId, StoreId, TransferPolicy};
use stockwise_timeseries::DistanceMatrix;

/// One store's position in a SKU, as seen by the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreCoverage {
    pub store_id: StoreId,
    pub store_name: String,
    pub on_hand: u32,
    pub daily_demand: f64,
    pub days_of_cover: f64,
}

/// A ranked, costed transfer proposal. Advisory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecommendation {
    pub from_store_id: StoreId,
    pub from_store_name: String,
    pub to_store_id: StoreId,
    pub to_store_name: String,
    pub sku_id: SkuId,
    pub sku_name: String,
    pub qty: u32,
    /// Normalized [0, 1]: how far the receiver sits below target cover.
    pub urgency: f64,
    pub rationale: String,
    pub distance_km: Option<f64>,
    pub transfer_cost: Option<f64>,
    pub receiver_days_before: f64,
    pub receiver_days_after: f64,
    pub donor_days_before: f64,
    pub donor_days_after: f64,
}

/// Urgency of a receiver: (target − cover) / target, clamped to [0, 1].
pub fn urgency(days_of_cover: f64, target_cover_days: f64) -> f64 {
    if target_cover_days <= 0.0 {
        return 0.0;
    }
    ((target_cover_days - days_of_cover) / target_cover_days).clamp(0.0, 1.0)
}

struct Receiver {
    idx: usize,
    urgency: f64,
    need_units: f64,
    on_hand: f64,
}

struct Donor {
    idx: usize,
    available_units: f64,
    on_hand: f64,
}

/// Per-pair economics: pre-negotiated cost when the matrix has one,
/// otherwise the policy cost model over the (possibly defaulted) distance.
fn pair_economics(
    distances: &DistanceMatrix,
    a: StoreId,
    b: StoreId,
    policy: &TransferPolicy,
) -> (Option<f64>, f64) {
    match distances.get(a, b) {
        Some(d) => {
            let cost = d.transfer_cost.unwrap_or_else(|| policy.cost_model.cost(d.km));
            (Some(d.km), cost)
        }
        None => (None, policy.cost_model.cost(policy.default_distance_km)),
    }
}

/// Match donors against receivers for one SKU.
///
/// Receivers are served in urgency order; for each, candidate donors are
/// ranked by transfer cost ascending, then store id ascending, so identical
/// inputs always yield identical proposals. Quantities lift the receiver
/// toward target without drawing any donor below the safety floor, capped
/// at `max_supply_days` of receiver demand per move.
pub fn recommend_for_sku(
    sku_id: SkuId,
    sku_name: &str,
    coverages: &[StoreCoverage],
    distances: &DistanceMatrix,
    policy: &TransferPolicy,
) -> Vec<TransferRecommendation> {
    let mut receivers: Vec<Receiver> = Vec::new();
    let mut donors: Vec<Donor> = Vec::new();

    for (idx, coverage) in coverages.iter().enumerate() {
        if coverage.daily_demand <= 0.0 {
            continue;
        }
        let target_units = policy.target_cover_days * coverage.daily_demand;
        let safety_units = policy.donor_safety_cover_days * coverage.daily_demand;

        if coverage.days_of_cover < policy.target_cover_days {
            let need_units = target_units - coverage.on_hand as f64;
            let receiver_urgency = urgency(coverage.days_of_cover, policy.target_cover_days);
            if need_units > 0.0 && receiver_urgency >= policy.min_urgency {
                receivers.push(Receiver {
                    idx,
                    urgency: receiver_urgency,
                    need_units,
                    on_hand: coverage.on_hand as f64,
                });
            }
        } else if coverage.days_of_cover > policy.target_cover_days {
            let available_units = coverage.on_hand as f64 - safety_units;
            if available_units > 0.0 {
                donors.push(Donor {
                    idx,
                    available_units,
                    on_hand: coverage.on_hand as f64,
                });
            }
        }
    }

    receivers.sort_by(|a, b| {
        b.urgency
            .partial_cmp(&a.urgency)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(coverages[a.idx].store_id.cmp(&coverages[b.idx].store_id))
    });

    let mut recommendations = Vec::new();

    for receiver in &mut receivers {
        let receiver_cov = &coverages[receiver.idx];

        // Rank candidate donors for this receiver: cost, then id.
        let mut ranked: Vec<(usize, Option<f64>, f64)> = donors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.available_units >= 1.0)
            .map(|(i, d)| {
                let donor_cov = &coverages[d.idx];
                let (km, cost) =
                    pair_economics(distances, donor_cov.store_id, receiver_cov.store_id, policy);
                (i, km, cost)
            })
            .collect();
        ranked.sort_by(|a, b| {
            a.2.partial_cmp(&b.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(coverages[donors[a.0].idx].store_id.cmp(&coverages[donors[b.0].idx].store_id))
        });

        for (donor_pos, distance_km, cost) in ranked {
            if receiver.need_units < 1.0 {
                break;
            }
            let donor = &mut donors[donor_pos];
            let donor_cov = &coverages[donor.idx];

            let cap = policy.max_supply_days * receiver_cov.daily_demand;
            let qty = receiver
                .need_units
                .min(donor.available_units)
                .min(cap)
                .floor();
            if qty < 1.0 {
                continue;
            }

            let receiver_days_before = receiver.on_hand / receiver_cov.daily_demand;
            let receiver_days_after = (receiver.on_hand + qty) / receiver_cov.daily_demand;
            let donor_days_before = donor.on_hand / donor_cov.daily_demand;
            let donor_days_after = (donor.on_hand - qty) / donor_cov.daily_demand;

            let rationale = format!(
                "Receiver ({}) will stock out in {:.1} days. Donor ({}) has {:.1} days of cover. \
                 Transfer {} units prevents stockout. After transfer: receiver {:.1} days, donor {:.1} days.",
                receiver_cov.store_name,
                receiver_days_before,
                donor_cov.store_name,
                donor_days_before,
                qty as u32,
                receiver_days_after,
                donor_days_after,
            );

            recommendations.push(TransferRecommendation {
                from_store_id: donor_cov.store_id,
                from_store_name: donor_cov.store_name.clone(),
                to_store_id: receiver_cov.store_id,
                to_store_name: receiver_cov.store_name.clone(),
                sku_id,
                sku_name: sku_name.to_string(),
                qty: qty as u32,
                urgency: receiver.urgency,
                rationale,
                distance_km,
                transfer_cost: Some(cost),
                receiver_days_before,
                receiver_days_after,
                donor_days_before,
                donor_days_after,
            });

            donor.available_units -= qty;
            donor.on_hand -= qty;
            receiver.need_units -= qty;
            receiver.on_hand += qty;
        }
    }

    // Final ranking: urgency desc, cost asc, donor id asc.
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
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_timeseries::Distance;
    use uuid::Uuid;

    fn store_id(n: u128) -> StoreId {
        StoreId::from_uuid(Uuid::from_u128(n))
    }

    fn coverage(id: StoreId, name: &str, on_hand: u32, daily_demand: f64) -> StoreCoverage {
        StoreCoverage {
            store_id: id,
            store_name: name.to_string(),
            on_hand,
            daily_demand,
            days_of_cover: on_hand as f64 / daily_demand,
        }
    }

    fn km(matrix: &mut DistanceMatrix, a: StoreId, b: StoreId, km: f64) {
        matrix.set(
            a,
            b,
            Distance {
                km,
                transfer_cost: None,
            },
        );
    }

    fn policy() -> TransferPolicy {
        TransferPolicy {
            target_cover_days: 5.0,
            donor_safety_cover_days: 3.0,
            ..TransferPolicy::default()
        }
    }

    #[test]
    fn urgency_is_normalized_distance_below_target() {
        assert_eq!(urgency(0.0, 5.0), 1.0);
        assert!((urgency(0.5, 5.0) - 0.9).abs() < 1e-9);
        assert!((urgency(2.0, 5.0) - 0.6).abs() < 1e-9);
        assert_eq!(urgency(5.0, 5.0), 0.0);
        assert_eq!(urgency(8.0, 5.0), 0.0);
    }

    /// Five stores A–E with cover [0.5, 1, 8, 2, 6] days, target 5.0 and
    /// donor safety 3.0: donors are {C, E}, receivers ranked A > B > D,
    /// and no donor ends below 3.0 days.
    #[test]
    fn five_store_worked_example() {
        let (a, b, c, d, e) = (store_id(1), store_id(2), store_id(3), store_id(4), store_id(5));
        let coverages = vec![
            coverage(a, "A", 1, 2.0),  // 0.5 days
            coverage(b, "B", 2, 2.0),  // 1.0 days
            coverage(c, "C", 80, 10.0), // 8.0 days
            coverage(d, "D", 4, 2.0),  // 2.0 days
            coverage(e, "E", 60, 10.0), // 6.0 days
        ];

        let mut distances = DistanceMatrix::new();
        // C is the cheap donor for A and B; E for D.
        km(&mut distances, c, a, 5.0);
        km(&mut distances, c, b, 5.0);
        km(&mut distances, c, d, 50.0);
        km(&mut distances, e, a, 20.0);
        km(&mut distances, e, b, 20.0);
        km(&mut distances, e, d, 5.0);

        let recs = recommend_for_sku(SkuId::new(), "Chicken", &coverages, &distances, &policy());

        assert_eq!(recs.len(), 3);
        // Ranked by urgency: A (0.9) > B (0.8) > D (0.6).
        assert_eq!(recs[0].to_store_name, "A");
        assert_eq!(recs[1].to_store_name, "B");
        assert_eq!(recs[2].to_store_name, "D");
        // Donors are C and E only.
        assert_eq!(recs[0].from_store_name, "C");
        assert_eq!(recs[1].from_store_name, "C");
        assert_eq!(recs[2].from_store_name, "E");

        for rec in &recs {
            assert!(rec.donor_days_after >= 3.0);
            assert!(rec.receiver_days_after > rec.receiver_days_before);
            // Fully lifted to target.
            assert!((rec.receiver_days_after - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn equal_cost_breaks_ties_by_donor_id() {
        let (receiver, d1, d2) = (store_id(10), store_id(2), store_id(7));
        let coverages = vec![
            coverage(receiver, "R", 2, 2.0),
            coverage(d2, "high-id donor", 80, 10.0),
            coverage(d1, "low-id donor", 80, 10.0),
        ];
        let mut distances = DistanceMatrix::new();
        km(&mut distances, d1, receiver, 15.0);
        km(&mut distances, d2, receiver, 15.0);

        let recs = recommend_for_sku(SkuId::new(), "Guac", &coverages, &distances, &policy());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].from_store_id, d1);
    }

    #[test]
    fn donor_exhaustion_splits_across_donors() {
        let (r, d1, d2) = (store_id(1), store_id(2), store_id(3));
        let coverages = vec![
            coverage(r, "R", 0, 10.0),   // needs 50
            coverage(d1, "D1", 35, 5.0), // 7 days; 20 above safety
            coverage(d2, "D2", 60, 10.0), // 6 days; 30 above safety
        ];
        let mut distances = DistanceMatrix::new();
        km(&mut distances, d1, r, 5.0);
        km(&mut distances, d2, r, 30.0);

        let recs = recommend_for_sku(SkuId::new(), "Rice", &coverages, &distances, &policy());
        assert_eq!(recs.len(), 2);
        let total: u32 = recs.iter().map(|rec| rec.qty).sum();
        assert_eq!(total, 50);
        for rec in &recs {
            assert!(rec.donor_days_after >= 3.0);
        }
    }

    #[test]
    fn unknown_distance_uses_the_default_cost() {
        let (r, d) = (store_id(1), store_id(2));
        let coverages = vec![coverage(r, "R", 2, 2.0), coverage(d, "D", 80, 10.0)];
        let recs = recommend_for_sku(
            SkuId::new(),
            "Beans",
            &coverages,
            &DistanceMatrix::new(),
            &policy(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].distance_km, None);
        // PerKm(1.2) over the 1000 km default.
        assert_eq!(recs[0].transfer_cost, Some(1200.0));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: no donor ends below the safety floor, and no
            /// receiver ends worse than it started.
            #[test]
            fn floors_and_improvement_hold(
                positions in proptest::collection::vec((0u32..200, 1u32..30), 2..12)
            ) {
                let coverages: Vec<StoreCoverage> = positions
                    .iter()
                    .enumerate()
                    .map(|(i, (on_hand, demand))| {
                        coverage(store_id(i as u128 + 1), &format!("S{i}"), *on_hand, *demand as f64)
                    })
                    .collect();

                let recs = recommend_for_sku(
                    SkuId::new(),
                    "Prop",
                    &coverages,
                    &DistanceMatrix::new(),
                    &policy(),
                );

                for rec in &recs {
                    prop_assert!(rec.qty >= 1);
                    prop_assert!(rec.donor_days_after >= policy().donor_safety_cover_days - 1e-9);
                    prop_assert!(rec.receiver_days_after >= rec.receiver_days_before);
                    prop_assert!((0.0..=1.0).contains(&rec.urgency));
                }
            }
        }
    }
}

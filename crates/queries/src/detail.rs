//! SKU detail: forecast, history, anomalies, confidence, recommendations.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use stockwise_anomaly::{Anomaly, AnomalyPattern};
use stockwise_confidence::{ConfidenceReport, CountPriority};
use stockwise_core::{EngineError, EngineResult, SkuId, StoreId};
use stockwise_forecast::{DailyForecast, days_of_cover, reorder_plan, stockout_date};
use stockwise_timeseries::{SeriesKey, Sku, Store};

use crate::engine::Analytics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub on_hand: u32,
    pub daily_demand: f64,
    pub days_of_cover: f64,
    pub stockout_date: Option<NaiveDate>,
    pub confidence_score: f64,
    pub confidence_grade: String,
}

/// One day of the on-hand × sales join.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub on_hand: u32,
    pub sales: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderAdvice {
    pub recommended: bool,
    pub qty: u32,
    pub reorder_point: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferAdvice {
    pub recommended: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountAdvice {
    pub recommended: bool,
    pub priority: CountPriority,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub reorder: ReorderAdvice,
    pub transfer: TransferAdvice,
    pub cycle_count: CountAdvice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuDetail {
    pub store: Store,
    pub sku: Sku,
    pub current_state: CurrentState,
    pub forecast: DailyForecast,
    pub history: Vec<HistoryPoint>,
    pub anomalies: Vec<Anomaly>,
    pub anomaly_patterns: AnomalyPattern,
    pub confidence_details: ConfidenceReport,
    pub recommendations: RecommendationSet,
}

impl Analytics {
    /// Full detail view for one (store, SKU).
    pub fn sku_detail(
        &self,
        store_id: StoreId,
        sku_id: SkuId,
        days_history: u32,
        today: NaiveDate,
    ) -> EngineResult<SkuDetail> {
        if days_history == 0 {
            return Err(EngineError::invalid_range("days_history must be positive"));
        }
        let store = self.require_store(store_id)?;
        let sku = self.require_sku(sku_id)?;
        let key = SeriesKey::new(store_id, sku_id);

        let on_hand = self
            .store()
            .latest_snapshot(key)?
            .map(|snapshot| snapshot.on_hand)
            .unwrap_or(0);

        // Two passes: detect against the raw forecast, then re-estimate
        // with the flagged days discounted so one bad day doesn't skew the
        // central estimate.
        let raw_forecast = self.daily_forecast(key, today, &[])?;
        let (anomalies, pattern, confidence) =
            self.quality_report(key, &sku, &raw_forecast, today)?;
        let flagged_dates: Vec<NaiveDate> = anomalies.iter().map(|a| a.date).collect();
        let forecast = self.daily_forecast(key, today, &flagged_dates)?;

        let cover = days_of_cover(on_hand, forecast.daily_demand, &self.policy().forecast);
        let plan = reorder_plan(&forecast, &self.policy().forecast);

        let history_start = today
            .checked_sub_days(Days::new(days_history as u64))
            .unwrap_or(today);
        let history: Vec<HistoryPoint> = self
            .store()
            .snapshots_between(key, history_start, today)?
            .into_iter()
            .map(|snapshot| {
                Ok(HistoryPoint {
                    date: snapshot.date,
                    on_hand: snapshot.on_hand,
                    sales: self.store().sale_on(key, snapshot.date)?.unwrap_or(0),
                })
            })
            .collect::<EngineResult<_>>()?;

        let count_priority = if confidence.score < 60.0 {
            CountPriority::High
        } else if confidence.score < 80.0 {
            CountPriority::Medium
        } else {
            CountPriority::Low
        };

        let recommendations = RecommendationSet {
            reorder: ReorderAdvice {
                recommended: cover < 14.0,
                qty: plan.order_qty as u32,
                reorder_point: plan.reorder_point as u32,
                reason: format!(
                    "Current stock will last {cover:.1} days. Reorder when inventory drops below {:.0} units.",
                    plan.reorder_point
                ),
            },
            transfer: TransferAdvice {
                recommended: cover < 7.0,
                reason: (cover < 7.0).then(|| {
                    "Check transfer recommendations for available donors".to_string()
                }),
            },
            cycle_count: CountAdvice {
                recommended: confidence.score < 80.0,
                priority: count_priority,
                reason: format!(
                    "Confidence score is {:.0}%. Physical count recommended.",
                    confidence.score
                ),
            },
        };

        Ok(SkuDetail {
            current_state: CurrentState {
                on_hand,
                daily_demand: forecast.daily_demand,
                days_of_cover: cover,
                stockout_date: stockout_date(today, cover, &self.policy().forecast),
                confidence_score: confidence.score,
                confidence_grade: confidence.grade.label().to_string(),
            },
            store,
            sku,
            forecast,
            history,
            anomalies,
            anomaly_patterns: pattern,
            confidence_details: confidence,
            recommendations,
        })
    }
}

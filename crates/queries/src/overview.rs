//! Inventory overview listing with health metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwise_core::{EngineResult, SkuId, StoreId};
use stockwise_forecast::{days_of_cover, stockout_date};
use stockwise_timeseries::SeriesKey;

use crate::engine::Analytics;
use crate::transfers::TransferParams;

/// Stockout risk bucket derived from days of cover.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_cover(days_of_cover: f64) -> Self {
        if days_of_cover < 3.0 {
            Self::Critical
        } else if days_of_cover < 7.0 {
            Self::High
        } else if days_of_cover < 14.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn is_elevated(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

/// Listing filters; echoed back on the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewFilter {
    pub store_id: Option<StoreId>,
    pub risk_only: bool,
    pub min_confidence: f64,
    pub limit: usize,
    pub offset: usize,
}

impl Default for OverviewFilter {
    fn default() -> Self {
        Self {
            store_id: None,
            risk_only: false,
            min_confidence: 0.0,
            limit: 100,
            offset: 0,
        }
    }
}

/// One store-SKU health row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewItem {
    pub store_id: StoreId,
    pub store_name: String,
    pub sku_id: SkuId,
    pub sku_name: String,
    pub category: String,
    pub on_hand: u32,
    pub daily_demand: f64,
    pub days_of_cover: f64,
    pub stockout_date: Option<NaiveDate>,
    pub confidence_score: f64,
    pub confidence_grade: String,
    pub risk_level: RiskLevel,
    pub suggested_action: String,
    /// True when the demand estimate is the population fallback.
    pub estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewAlerts {
    pub critical_stockouts: usize,
    pub low_confidence: usize,
    pub transfer_opportunities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub items: Vec<OverviewItem>,
    /// Matching rows before pagination.
    pub total: usize,
    pub alerts: OverviewAlerts,
    pub filters: OverviewFilter,
}

fn suggested_action(days_of_cover: f64, confidence_score: f64) -> &'static str {
    if days_of_cover < 7.0 {
        "Transfer or reorder immediately"
    } else if confidence_score < 70.0 {
        "Schedule cycle count"
    } else if days_of_cover < 14.0 {
        "Monitor closely"
    } else {
        "No action needed"
    }
}

impl Analytics {
    /// Inventory overview across stores, sorted worst-risk first.
    pub fn overview(
        &self,
        filter: &OverviewFilter,
        today: NaiveDate,
    ) -> EngineResult<OverviewResponse> {
        let stores = match filter.store_id {
            Some(store_id) => vec![self.require_store(store_id)?],
            None => self.store().stores()?,
        };
        let skus = self.store().skus()?;

        let mut items = Vec::new();
        for store in &stores {
            for sku in &skus {
                let key = SeriesKey::new(store.id, sku.id);
                let Some(snapshot) = self.store().latest_snapshot(key)? else {
                    continue;
                };

                let forecast = self.daily_forecast(key, today, &[])?;
                let (_, _, confidence) = self.quality_report(key, sku, &forecast, today)?;
                let cover = days_of_cover(snapshot.on_hand, forecast.daily_demand, &self.policy().forecast);
                let risk_level = RiskLevel::from_cover(cover);

                if filter.risk_only && !risk_level.is_elevated() {
                    continue;
                }
                if confidence.score < filter.min_confidence {
                    continue;
                }

                items.push(OverviewItem {
                    store_id: store.id,
                    store_name: store.name.clone(),
                    sku_id: sku.id,
                    sku_name: sku.name.clone(),
                    category: sku.category.clone(),
                    on_hand: snapshot.on_hand,
                    daily_demand: forecast.daily_demand,
                    days_of_cover: cover,
                    stockout_date: stockout_date(today, cover, &self.policy().forecast),
                    confidence_score: confidence.score,
                    confidence_grade: confidence.grade.label().to_string(),
                    risk_level,
                    suggested_action: suggested_action(cover, confidence.score).to_string(),
                    estimated: forecast.fallback,
                });
            }
        }

        items.sort_by(|a, b| {
            a.risk_level
                .cmp(&b.risk_level)
                .then(
                    a.days_of_cover
                        .partial_cmp(&b.days_of_cover)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.store_id.cmp(&b.store_id))
                .then(a.sku_id.cmp(&b.sku_id))
        });

        let total = items.len();
        let critical_stockouts = items
            .iter()
            .filter(|i| i.risk_level == RiskLevel::Critical)
            .count();
        let low_confidence = items.iter().filter(|i| i.confidence_score < 70.0).count();

        let page: Vec<OverviewItem> = items
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        let transfer_summary =
            self.transfer_recommendations(&TransferParams::default(), today)?.summary;

        Ok(OverviewResponse {
            items: page,
            total,
            alerts: OverviewAlerts {
                critical_stockouts,
                low_confidence,
                transfer_opportunities: transfer_summary.total_opportunities,
            },
            filters: filter.clone(),
        })
    }
}

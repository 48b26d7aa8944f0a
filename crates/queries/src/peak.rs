//! Peak-hour dashboard and prep schedule.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockwise_core::{EngineResult, SkuId, StoreId};
use stockwise_prep::{PeakSummary, PrepItem, PrepPriority, PrepTask, build_schedule, peak_summary};
use stockwise_stockout::{StockoutPrediction, predict};
use stockwise_timeseries::{SeriesKey, Store};

use crate::engine::Analytics;
use crate::hourly::HourlySlot;

/// Categories watched on the peak-hours dashboard: fast-moving prepped
/// goods that cannot be restocked from the back room on demand.
const CRITICAL_CATEGORIES: &[&str] = &["Proteins", "Salsas & Sauces", "Produce"];

/// One watched SKU with its prediction and intraday forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalItem {
    pub sku_id: SkuId,
    pub sku_name: String,
    pub category: String,
    pub on_hand: u32,
    pub stockout: StockoutPrediction,
    pub hourly_forecast: Vec<HourlySlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHoursDashboard {
    pub store: Store,
    pub summary: PeakSummary,
    pub prep_schedule: Vec<PrepTask>,
    pub critical_items: Vec<CriticalItem>,
    pub total_prep_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepScheduleResponse {
    pub store_id: StoreId,
    pub store_name: String,
    pub tasks: Vec<PrepTask>,
    pub total_tasks: usize,
    pub critical_tasks: usize,
    pub high_priority_tasks: usize,
    pub overdue_tasks: usize,
}

impl Analytics {
    /// Prep inputs for every critical-category SKU carried at the store.
    fn prep_items(&self, store_id: StoreId, now: NaiveDateTime) -> EngineResult<Vec<PrepItem>> {
        let today = now.date();
        let mut items = Vec::new();
        for sku in self.store().skus()? {
            if !CRITICAL_CATEGORIES.contains(&sku.category.as_str()) {
                continue;
            }
            let key = SeriesKey::new(store_id, sku.id);
            let Some(snapshot) = self.store().latest_snapshot(key)? else {
                continue;
            };
            let forecast = self.daily_forecast(key, today, &[])?;
            let profile = self.demand_profile(key, today, forecast)?;
            let prediction = predict(snapshot.on_hand, &profile, now, self.policy());
            items.push(PrepItem {
                sku_id: sku.id,
                sku_name: sku.name.clone(),
                category: sku.category.clone(),
                on_hand: snapshot.on_hand,
                prediction,
                profile,
            });
        }
        Ok(items)
    }

    /// The peak-hours dashboard for one store.
    pub fn peak_hours(
        &self,
        store_id: StoreId,
        now: NaiveDateTime,
    ) -> EngineResult<PeakHoursDashboard> {
        let store = self.require_store(store_id)?;
        let items = self.prep_items(store_id, now)?;

        let summary = peak_summary(&items, now);
        let prep_schedule = build_schedule(&items, now, self.policy());

        let mut critical_items = Vec::with_capacity(items.len());
        for item in &items {
            let hourly = self.hourly_forecast(store_id, item.sku_id, now)?;
            critical_items.push(CriticalItem {
                sku_id: item.sku_id,
                sku_name: item.sku_name.clone(),
                category: item.category.clone(),
                on_hand: item.on_hand,
                stockout: item.prediction.clone(),
                hourly_forecast: hourly.slots,
            });
        }

        Ok(PeakHoursDashboard {
            store,
            total_prep_tasks: prep_schedule.len(),
            summary,
            prep_schedule,
            critical_items,
        })
    }

    /// The prep schedule alone, with an optional lead-time override.
    pub fn prep_schedule(
        &self,
        store_id: StoreId,
        lead_time_hours: Option<i64>,
        now: NaiveDateTime,
    ) -> EngineResult<PrepScheduleResponse> {
        let store = self.require_store(store_id)?;
        let items = self.prep_items(store_id, now)?;

        let mut policy = self.policy().clone();
        if let Some(hours) = lead_time_hours {
            policy.prep.lead_time_hours = hours;
        }
        let tasks = build_schedule(&items, now, &policy);

        let critical_tasks = tasks
            .iter()
            .filter(|t| t.priority == PrepPriority::Critical)
            .count();
        let high_priority_tasks = tasks
            .iter()
            .filter(|t| t.priority == PrepPriority::High)
            .count();
        let overdue_tasks = tasks.iter().filter(|t| t.overdue).count();

        Ok(PrepScheduleResponse {
            store_id,
            store_name: store.name,
            total_tasks: tasks.len(),
            critical_tasks,
            high_priority_tasks,
            overdue_tasks,
            tasks,
        })
    }
}

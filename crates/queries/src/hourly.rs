//! Per-hour forecast with remaining-inventory walk-down.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockwise_core::{EngineResult, PeakPeriod, SkuId, StoreId};
use stockwise_forecast::CurveSource;
use stockwise_stockout::{StockoutPrediction, predict};
use stockwise_timeseries::{SeriesKey, Sku, Store};

use crate::engine::Analytics;

/// One operating-hour slot of today's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySlot {
    pub hour: u32,
    pub predicted_demand: f64,
    pub is_peak: bool,
    pub peak_period: Option<PeakPeriod>,
    pub remaining_inventory: f64,
    pub will_stockout_this_hour: bool,
}

/// The fixed peak windows, for chart shading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHoursTable {
    pub lunch: Vec<u32>,
    pub dinner: Vec<u32>,
}

impl Default for PeakHoursTable {
    fn default() -> Self {
        Self {
            lunch: (PeakPeriod::Lunch.start_hour()..PeakPeriod::Lunch.end_hour()).collect(),
            dinner: (PeakPeriod::Dinner.start_hour()..PeakPeriod::Dinner.end_hour()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastResponse {
    pub store: Store,
    pub sku: Sku,
    pub current_on_hand: u32,
    /// `Estimated` when the curve was synthesized from daily data.
    pub curve_source: CurveSource,
    pub slots: Vec<HourlySlot>,
    pub stockout: StockoutPrediction,
    pub peak_hours: PeakHoursTable,
}

impl Analytics {
    /// Today's hourly forecast for one (store, SKU), walking the on-hand
    /// down slot by slot.
    pub fn hourly_forecast(
        &self,
        store_id: StoreId,
        sku_id: SkuId,
        now: NaiveDateTime,
    ) -> EngineResult<HourlyForecastResponse> {
        let store = self.require_store(store_id)?;
        let sku = self.require_sku(sku_id)?;
        let key = SeriesKey::new(store_id, sku_id);
        let today = now.date();

        let on_hand = self
            .store()
            .latest_snapshot(key)?
            .map(|snapshot| snapshot.on_hand)
            .unwrap_or(0);

        let forecast = self.daily_forecast(key, today, &[])?;
        let profile = self.demand_profile(key, today, forecast)?;
        let stockout = predict(on_hand, &profile, now, self.policy());

        let mut remaining = on_hand as f64;
        let slots: Vec<HourlySlot> = self
            .policy()
            .hours
            .hours()
            .map(|hour| {
                let predicted = profile.hourly_demand(today, hour, &self.policy().forecast);
                let had_stock = remaining > 0.0;
                remaining -= predicted;
                let peak_period = PeakPeriod::for_hour(hour);
                HourlySlot {
                    hour,
                    predicted_demand: predicted,
                    is_peak: peak_period.is_some(),
                    peak_period,
                    remaining_inventory: remaining.max(0.0),
                    will_stockout_this_hour: had_stock && remaining <= 0.0,
                }
            })
            .collect();

        Ok(HourlyForecastResponse {
            store,
            sku,
            current_on_hand: on_hand,
            curve_source: profile.curve.source,
            slots,
            stockout,
            peak_hours: PeakHoursTable::default(),
        })
    }
}

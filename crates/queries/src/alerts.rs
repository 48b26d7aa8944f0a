//! Top critical stockout alerts for the landing dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwise_core::EngineResult;
use stockwise_forecast::days_of_cover;
use stockwise_timeseries::SeriesKey;

use crate::engine::Analytics;

/// Number of alert messages surfaced.
const ALERT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutAlert {
    pub store_name: String,
    pub sku_name: String,
    pub days_of_cover: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub critical_stockouts: Vec<StockoutAlert>,
    pub total_critical: usize,
}

impl Analytics {
    /// Most urgent stockouts across the whole fleet, worst first.
    pub fn alerts(&self, today: NaiveDate) -> EngineResult<AlertsResponse> {
        let mut critical = Vec::new();
        for store in self.store().stores()? {
            for sku in self.store().skus()? {
                let key = SeriesKey::new(store.id, sku.id);
                let Some(snapshot) = self.store().latest_snapshot(key)? else {
                    continue;
                };
                let forecast = self.daily_forecast(key, today, &[])?;
                let cover =
                    days_of_cover(snapshot.on_hand, forecast.daily_demand, &self.policy().forecast);
                if cover < 3.0 {
                    critical.push(StockoutAlert {
                        message: format!(
                            "{} at {} will stock out in {cover:.1} days",
                            sku.name, store.name
                        ),
                        store_name: store.name.clone(),
                        sku_name: sku.name.clone(),
                        days_of_cover: cover,
                    });
                }
            }
        }

        critical.sort_by(|a, b| {
            a.days_of_cover
                .partial_cmp(&b.days_of_cover)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.store_name.cmp(&b.store_name))
                .then(a.sku_name.cmp(&b.sku_name))
        });

        let total_critical = critical.len();
        critical.truncate(ALERT_LIMIT);

        Ok(AlertsResponse {
            critical_stockouts: critical,
            total_critical,
        })
    }
}

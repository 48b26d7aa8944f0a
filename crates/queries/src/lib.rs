//! Query facade: the externally-consumed surface of the analytics engine.
//!
//! Each read operation assembles a typed, serializable response from the
//! component crates; the write operations (commit transfer, record cycle
//! count, record telemetry) are the only way derived state changes.
//! Callers pass the clock in (`today` / `now`), so every response is a
//! pure function of the store contents and the given instant.

pub mod alerts;
pub mod counts;
pub mod detail;
pub mod engine;
pub mod hourly;
pub mod overview;
pub mod peak;
pub mod telemetry;
pub mod transfers;


pub use alerts::{AlertsResponse, StockoutAlert};
pub use counts::CountPriorityResponse;
pub use detail::{
    CountAdvice, CurrentState, HistoryPoint, RecommendationSet, ReorderAdvice, SkuDetail,
    TransferAdvice,
};
pub use engine::Analytics;
pub use hourly::{HourlyForecastResponse, HourlySlot, PeakHoursTable};
pub use overview::{OverviewAlerts, OverviewFilter, OverviewItem, OverviewResponse, RiskLevel};
pub use peak::{CriticalItem, PeakHoursDashboard, PrepScheduleResponse};
pub use telemetry::{SensorStatus, TelemetryHistoryResponse, TelemetryStatusResponse};
pub use transfers::{TransferListResponse, TransferParams, TransferRecommendationsResponse, TransferView};

use serde::Serialize;

use super::Product;

/// Number of products listed under "recent" on the dashboard.
pub const RECENT_PRODUCTS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: usize,
    pub total_kpis: usize,
    /// Quality rate of the latest KPI entry, 0 without entries.
    pub last_quality_rate: f64,
    pub reserved_pending: usize,
    pub reserved_resolved: usize,
    pub reserved_scrapped: usize,
    pub recent_products: Vec<Product>,
}

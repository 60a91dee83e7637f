use serde::{Deserialize, Serialize};

/// Precomputed counters rendered on the landing view. All derivation is
/// remote; this side only selects which counters each role sees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today_appointments: i64,
    pub total_patients: i64,
    pub monthly_revenue: f64,
    pub low_stock_items: i64,
    pub pending_appointments: i64,
    pub completed_appointments: i64,
}

/// One navigable section of the dashboard, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionDescriptor {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub id: &'static str,
    pub title: &'static str,
    pub value: serde_json::Value,
}

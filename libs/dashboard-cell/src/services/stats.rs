use anyhow::Result;
use chrono::{Datelike, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::DashboardStats;

pub struct StatsService {
    supabase: SupabaseClient,
}

impl StatsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Gathers the six landing-view counters. The queries are independent
    /// reads and run concurrently; each mirrors a query the remote store
    /// serves cheaply.
    pub async fn dashboard_stats(&self, auth_token: &str) -> Result<DashboardStats> {
        let today = Utc::now().date_naive();
        let start_of_month = today.with_day(1).unwrap_or(today);

        debug!("Aggregating dashboard stats for {}", today);

        let (
            today_rows,
            patient_rows,
            revenue_rows,
            pending_rows,
            completed_rows,
            inventory_rows,
        ) = tokio::try_join!(
            self.fetch_rows(format!(
                "/rest/v1/appointments?select=id&appointment_date=eq.{}&status=neq.cancelled",
                today
            ), auth_token),
            self.fetch_rows(
                "/rest/v1/patients?select=id&is_active=eq.true".to_string(),
                auth_token
            ),
            self.fetch_rows(format!(
                "/rest/v1/financial_transactions?select=amount&transaction_type=eq.income&payment_status=eq.completed&transaction_date=gte.{}",
                start_of_month
            ), auth_token),
            self.fetch_rows(
                "/rest/v1/appointments?select=id&status=eq.scheduled".to_string(),
                auth_token
            ),
            self.fetch_rows(format!(
                "/rest/v1/appointments?select=id&status=eq.completed&appointment_date=gte.{}",
                start_of_month
            ), auth_token),
            self.fetch_rows(
                "/rest/v1/inventory_items?select=id,current_stock,min_stock".to_string(),
                auth_token
            ),
        )?;

        let monthly_revenue = revenue_rows.iter()
            .filter_map(|row| amount_of(row))
            .sum();

        // The REST surface cannot compare two columns, so low stock is
        // counted here from the fetched pair.
        let low_stock_items = inventory_rows.iter()
            .filter(|row| {
                let current = row["current_stock"].as_i64().unwrap_or(0);
                let min = row["min_stock"].as_i64().unwrap_or(0);
                current < min
            })
            .count() as i64;

        Ok(DashboardStats {
            today_appointments: today_rows.len() as i64,
            total_patients: patient_rows.len() as i64,
            monthly_revenue,
            low_stock_items,
            pending_appointments: pending_rows.len() as i64,
            completed_appointments: completed_rows.len() as i64,
        })
    }

    async fn fetch_rows(&self, path: String, auth_token: &str) -> Result<Vec<Value>> {
        self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await
    }
}

/// Numeric columns may arrive as JSON numbers or strings depending on the
/// column type.
fn amount_of(row: &Value) -> Option<f64> {
    match &row["amount"] {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

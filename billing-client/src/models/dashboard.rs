//! Dashboard statistics models.

use crate::models::BillDraft;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Everything the dashboard page renders, fetched in one call.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardData {
    pub counts: DashboardCounts,
    #[serde(default)]
    pub totals: Option<DashboardTotals>,
    pub recent_activity: ActivityFeed,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyTrend>,
    #[serde(default)]
    pub top_customers: Vec<TopCustomer>,
    #[serde(default)]
    pub weekly_activity: Option<WeeklyActivity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardCounts {
    pub drafts: i64,
    pub kacha_bills: i64,
    pub pakka_bills: i64,
    pub total_bills: i64,
    #[serde(default)]
    pub this_week_total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardTotals {
    pub revenue: Decimal,
    #[serde(default)]
    pub average_bill_amount: Decimal,
}

/// Recent records per collection (last seven days, newest first).
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityFeed {
    #[serde(default)]
    pub drafts: Vec<BillDraft>,
    #[serde(default)]
    pub kacha_bills: Vec<BillDraft>,
    #[serde(default)]
    pub pakka_bills: Vec<BillDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub kacha_bills: i64,
    pub pakka_bills: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopCustomer {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyActivity {
    pub drafts: i64,
    pub kacha_bills: i64,
    pub pakka_bills: i64,
    pub total: i64,
}

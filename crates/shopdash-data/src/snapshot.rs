//! One full recomputation of everything the dashboard shows

use crate::aggregator::{
    CategoryPerformance, CategoryPerformanceAggregator, CategoryRating, CategoryRatingAggregator,
    CityAggregator, CitySummary, DailyOrders, DailyOrdersAggregator, OrderAggregator,
    PaymentTypeAggregator, PaymentTypeSummary,
};
use crate::filter::{DateRange, FilteredOrders, RangeFilter};
use crate::record::{OrderRecord, OrderTable};
use serde::{Deserialize, Serialize};
use shopdash_common::Result;
use tracing::{debug, info, instrument};

/// The six summaries and two headline metrics for one date selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Applied range; `None` when an inverted selection was accepted as empty
    pub range: Option<DateRange>,
    /// Order-item rows inside the range
    pub filtered_rows: usize,
    /// Sum of the daily order counts
    pub total_orders: usize,
    /// Sum of the daily revenue
    pub total_revenue: f64,
    /// Orders and revenue per day
    pub daily_orders: Vec<DailyOrders>,
    /// Distinct customers per customer city
    pub customers_by_city: Vec<CitySummary>,
    /// Distinct sellers per seller city
    pub sellers_by_city: Vec<CitySummary>,
    /// Order items per category, most sold first
    pub category_performance: Vec<CategoryPerformance>,
    /// Mean score per category, lowest first
    pub category_rating: Vec<CategoryRating>,
    /// Distinct orders per payment type, least used first
    pub payment_types: Vec<PaymentTypeSummary>,
}

impl DashboardSnapshot {
    /// Filter `table` and derive every summary from the selected rows
    #[instrument(skip_all, fields(start = %filter.start(), end = %filter.end()))]
    pub fn compute(table: &OrderTable, filter: &RangeFilter) -> Result<Self> {
        let filtered = filter.apply(table)?;
        let snapshot = Self::from_filtered(&filtered);

        info!(
            rows = snapshot.filtered_rows,
            total_orders = snapshot.total_orders,
            total_revenue = snapshot.total_revenue,
            "Dashboard snapshot computed"
        );

        Ok(snapshot)
    }

    /// Derive every summary from an already-filtered view
    pub fn from_filtered(filtered: &FilteredOrders<'_>) -> Self {
        let rows = filtered.rows();

        let daily_orders = run(&DailyOrdersAggregator, rows);
        let total_orders: usize = daily_orders.iter().map(|d| d.order_count).sum();
        let total_revenue: f64 = daily_orders.iter().map(|d| d.revenue).sum();

        Self {
            range: filtered.range(),
            filtered_rows: filtered.len(),
            total_orders,
            total_revenue,
            customers_by_city: run(&CityAggregator::customers(), rows),
            sellers_by_city: run(&CityAggregator::sellers(), rows),
            category_performance: run(&CategoryPerformanceAggregator, rows),
            category_rating: run(&CategoryRatingAggregator, rows),
            payment_types: run(&PaymentTypeAggregator, rows),
            daily_orders,
        }
    }

    /// Whether the selection matched no rows
    pub fn is_empty(&self) -> bool {
        self.filtered_rows == 0
    }
}

fn run<A: OrderAggregator>(aggregator: &A, rows: &[&OrderRecord]) -> Vec<A::Summary> {
    let summary = aggregator.aggregate(rows);
    debug!(aggregation = aggregator.name(), groups = summary.len(), "Aggregation done");
    summary
}

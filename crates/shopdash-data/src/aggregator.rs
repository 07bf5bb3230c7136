//! The six aggregate views derived from a filtered set of order rows.
//!
//! Every aggregation is a pure function of the rows it is handed. Grouping
//! keys that are missing form their own `None` group, which orders before
//! every labelled group.

use crate::record::OrderRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Orders and revenue for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrders {
    /// Purchase day
    pub date: NaiveDate,
    /// Distinct order ids purchased that day
    pub order_count: usize,
    /// Sum of item prices; missing prices count as zero
    pub revenue: f64,
}

/// Distinct customers or sellers located in one city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySummary {
    /// City name, `None` for rows without one
    pub city: Option<String>,
    /// Distinct customer or seller ids in the city
    pub count: usize,
}

/// Number of order-item rows sold in one product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    /// Product category, `None` for uncategorised items
    pub category: Option<String>,
    /// Order-item rows in the category
    pub order_items: usize,
}

/// Mean review score of one product category, rounded to one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRating {
    /// Product category, `None` for uncategorised items
    pub category: Option<String>,
    /// `None` when no row in the category carries a score
    pub review_score: Option<f64>,
}

/// Distinct orders paid with one payment type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeSummary {
    /// Payment method, `None` when not recorded
    pub payment_type: Option<String>,
    /// Distinct order ids paid this way
    pub order_count: usize,
}

/// An aggregation over filtered order rows
pub trait OrderAggregator {
    /// One row of the summary table
    type Summary;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Compute the summary. Empty input yields an empty summary.
    fn aggregate(&self, rows: &[&OrderRecord]) -> Vec<Self::Summary>;
}

/// Distinct orders and revenue per day, ordered by day
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyOrdersAggregator;

impl OrderAggregator for DailyOrdersAggregator {
    type Summary = DailyOrders;

    fn name(&self) -> &'static str {
        "daily_orders"
    }

    fn aggregate(&self, rows: &[&OrderRecord]) -> Vec<Self::Summary> {
        let mut days: BTreeMap<NaiveDate, (HashSet<&str>, f64)> = BTreeMap::new();
        for row in rows {
            let (orders, revenue) = days.entry(row.purchase_date()).or_default();
            if let Some(id) = row.order_id.as_deref() {
                orders.insert(id);
            }
            *revenue += row.price.unwrap_or(0.0);
        }

        days.into_iter()
            .map(|(date, (orders, revenue))| DailyOrders {
                date,
                order_count: orders.len(),
                revenue,
            })
            .collect()
    }
}

/// Which party of the order a city summary is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityParty {
    /// Customer city and customer id
    Customer,
    /// Seller city and seller id
    Seller,
}

/// Distinct customer or seller ids per city, in city-label order
#[derive(Debug, Clone, Copy)]
pub struct CityAggregator {
    party: CityParty,
}

impl CityAggregator {
    /// Customers per customer city
    pub fn customers() -> Self {
        Self {
            party: CityParty::Customer,
        }
    }

    /// Sellers per seller city
    pub fn sellers() -> Self {
        Self {
            party: CityParty::Seller,
        }
    }

    fn key_and_id<'r>(&self, row: &'r OrderRecord) -> (Option<&'r str>, Option<&'r str>) {
        match self.party {
            CityParty::Customer => (row.customer_city.as_deref(), row.customer_id.as_deref()),
            CityParty::Seller => (row.seller_city.as_deref(), row.seller_id.as_deref()),
        }
    }
}

impl OrderAggregator for CityAggregator {
    type Summary = CitySummary;

    fn name(&self) -> &'static str {
        match self.party {
            CityParty::Customer => "customers_by_city",
            CityParty::Seller => "sellers_by_city",
        }
    }

    fn aggregate(&self, rows: &[&OrderRecord]) -> Vec<Self::Summary> {
        let mut cities: BTreeMap<Option<&str>, HashSet<&str>> = BTreeMap::new();
        for row in rows {
            let (city, id) = self.key_and_id(row);
            let ids = cities.entry(city).or_default();
            // Missing ids still register the city but are not counted
            if let Some(id) = id {
                ids.insert(id);
            }
        }

        cities
            .into_iter()
            .map(|(city, ids)| CitySummary {
                city: city.map(str::to_string),
                count: ids.len(),
            })
            .collect()
    }
}

/// Row count per category, most sold first
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryPerformanceAggregator;

impl OrderAggregator for CategoryPerformanceAggregator {
    type Summary = CategoryPerformance;

    fn name(&self) -> &'static str {
        "category_performance"
    }

    fn aggregate(&self, rows: &[&OrderRecord]) -> Vec<Self::Summary> {
        let mut counts: BTreeMap<Option<&str>, usize> = BTreeMap::new();
        for row in rows {
            *counts.entry(row.product_category.as_deref()).or_default() += 1;
        }

        let mut summary: Vec<CategoryPerformance> = counts
            .into_iter()
            .map(|(category, order_items)| CategoryPerformance {
                category: category.map(str::to_string),
                order_items,
            })
            .collect();
        summary.sort_by(|a, b| b.order_items.cmp(&a.order_items));
        summary
    }
}

/// Mean review score per category, lowest first, unscored categories last
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRatingAggregator;

impl OrderAggregator for CategoryRatingAggregator {
    type Summary = CategoryRating;

    fn name(&self) -> &'static str {
        "category_rating"
    }

    fn aggregate(&self, rows: &[&OrderRecord]) -> Vec<Self::Summary> {
        let mut scores: BTreeMap<Option<&str>, (f64, usize)> = BTreeMap::new();
        for row in rows {
            let (sum, n) = scores.entry(row.product_category.as_deref()).or_default();
            if let Some(score) = row.review_score {
                *sum += score;
                *n += 1;
            }
        }

        let mut summary: Vec<CategoryRating> = scores
            .into_iter()
            .map(|(category, (sum, n))| CategoryRating {
                category: category.map(str::to_string),
                review_score: (n > 0).then(|| round_one_decimal(sum / n as f64)),
            })
            .collect();
        summary.sort_by(|a, b| compare_scores(a.review_score, b.review_score));
        summary
    }
}

/// Distinct orders per payment type, least used first
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentTypeAggregator;

impl OrderAggregator for PaymentTypeAggregator {
    type Summary = PaymentTypeSummary;

    fn name(&self) -> &'static str {
        "payment_types"
    }

    fn aggregate(&self, rows: &[&OrderRecord]) -> Vec<Self::Summary> {
        let mut orders: BTreeMap<Option<&str>, HashSet<&str>> = BTreeMap::new();
        for row in rows {
            let ids = orders.entry(row.payment_type.as_deref()).or_default();
            if let Some(id) = row.order_id.as_deref() {
                ids.insert(id);
            }
        }

        let mut summary: Vec<PaymentTypeSummary> = orders
            .into_iter()
            .map(|(payment_type, ids)| PaymentTypeSummary {
                payment_type: payment_type.map(str::to_string),
                order_count: ids.len(),
            })
            .collect();
        summary.sort_by_key(|s| s.order_count);
        summary
    }
}

/// Distinct orders and revenue per day
pub fn daily_orders(rows: &[&OrderRecord]) -> Vec<DailyOrders> {
    DailyOrdersAggregator.aggregate(rows)
}

/// Distinct customers per customer city
pub fn customers_by_city(rows: &[&OrderRecord]) -> Vec<CitySummary> {
    CityAggregator::customers().aggregate(rows)
}

/// Distinct sellers per seller city
pub fn sellers_by_city(rows: &[&OrderRecord]) -> Vec<CitySummary> {
    CityAggregator::sellers().aggregate(rows)
}

/// Order-item rows per product category
pub fn category_performance(rows: &[&OrderRecord]) -> Vec<CategoryPerformance> {
    CategoryPerformanceAggregator.aggregate(rows)
}

/// Mean review score per product category
pub fn category_rating(rows: &[&OrderRecord]) -> Vec<CategoryRating> {
    CategoryRatingAggregator.aggregate(rows)
}

/// Distinct orders per payment type
pub fn payment_types(rows: &[&OrderRecord]) -> Vec<PaymentTypeSummary> {
    PaymentTypeAggregator.aggregate(rows)
}

/// Round to one decimal, ties to even on the scaled value (4.25 → 4.2, 4.35 → 4.4)
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use shopdash_common::test_utils::assert_approx_eq;

    fn row(order_id: &str, timestamp: &str) -> OrderRecord {
        OrderRecord {
            order_id: Some(order_id.to_string()),
            purchased_at: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
            price: None,
            customer_id: None,
            customer_city: None,
            seller_id: None,
            seller_city: None,
            product_category: None,
            review_score: None,
            payment_type: None,
        }
    }

    fn rated(category: Option<&str>, score: Option<f64>) -> OrderRecord {
        OrderRecord {
            product_category: category.map(str::to_string),
            review_score: score,
            ..row("o", "2017-01-01 00:00:00")
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_round_one_decimal_ties_to_even() {
        assert_eq!(round_one_decimal(4.25), 4.2);
        assert_eq!(round_one_decimal(4.35), 4.4);
        assert_eq!(round_one_decimal(4.15), 4.2);
        assert_eq!(round_one_decimal(4.05), 4.0);
        assert_eq!(round_one_decimal(4.1666), 4.2);
        assert_eq!(round_one_decimal(5.0), 5.0);
    }

    #[test]
    fn test_daily_orders_three_order_scenario() {
        let rows = vec![
            OrderRecord { price: Some(10.0), ..row("o1", "2017-01-01 09:15:00") },
            OrderRecord { price: Some(20.0), ..row("o2", "2017-01-02 10:00:00") },
            OrderRecord { price: Some(30.0), ..row("o3", "2017-01-02 23:59:59") },
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let daily = daily_orders(&refs);
        assert_eq!(
            daily,
            vec![
                DailyOrders { date: day(2017, 1, 1), order_count: 1, revenue: 10.0 },
                DailyOrders { date: day(2017, 1, 2), order_count: 2, revenue: 50.0 },
            ]
        );
    }

    #[test]
    fn test_daily_orders_counts_distinct_orders_and_all_items() {
        let rows = vec![
            OrderRecord { price: Some(29.99), ..row("o1", "2017-10-02 10:56:33") },
            OrderRecord { price: Some(29.99), ..row("o1", "2017-10-02 10:56:33") },
            OrderRecord { price: None, ..row("o2", "2017-10-02 18:00:00") },
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let daily = daily_orders(&refs);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].order_count, 2);
        assert_approx_eq(daily[0].revenue, 59.98, 1e-9);
    }

    #[test]
    fn test_city_summary_counts_distinct_ids() {
        let customer = |id: Option<&str>, city: Option<&str>| OrderRecord {
            customer_id: id.map(str::to_string),
            customer_city: city.map(str::to_string),
            ..row("o", "2017-01-01 00:00:00")
        };
        let rows = vec![
            customer(Some("c1"), Some("sao paulo")),
            customer(Some("c1"), Some("sao paulo")),
            customer(Some("c2"), Some("sao paulo")),
            customer(Some("c1"), Some("campinas")),
            customer(Some("c3"), None),
            customer(None, Some("curitiba")),
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let cities = customers_by_city(&refs);
        let pairs: Vec<(Option<&str>, usize)> =
            cities.iter().map(|c| (c.city.as_deref(), c.count)).collect();
        assert_eq!(
            pairs,
            vec![(None, 1), (Some("campinas"), 1), (Some("curitiba"), 0), (Some("sao paulo"), 2)]
        );
    }

    #[test]
    fn test_sellers_use_seller_columns() {
        let rows = vec![OrderRecord {
            seller_id: Some("s1".to_string()),
            seller_city: Some("maua".to_string()),
            customer_city: Some("sao paulo".to_string()),
            ..row("o", "2017-01-01 00:00:00")
        }];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let sellers = sellers_by_city(&refs);
        assert_eq!(sellers, vec![CitySummary { city: Some("maua".to_string()), count: 1 }]);
        assert_eq!(CityAggregator::sellers().name(), "sellers_by_city");
    }

    #[test]
    fn test_category_performance_sorted_descending_stable() {
        let rows = vec![
            rated(Some("toys"), None),
            rated(Some("auto"), None),
            rated(Some("toys"), None),
            rated(Some("bed_bath_table"), None),
            rated(None, None),
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let perf = category_performance(&refs);
        let pairs: Vec<(Option<&str>, usize)> =
            perf.iter().map(|p| (p.category.as_deref(), p.order_items)).collect();
        assert_eq!(
            pairs,
            vec![(Some("toys"), 2), (None, 1), (Some("auto"), 1), (Some("bed_bath_table"), 1)]
        );
    }

    #[test]
    fn test_category_rating_mean_and_order() {
        let rows = vec![
            rated(Some("toys"), Some(5.0)),
            rated(Some("toys"), Some(4.0)),
            rated(Some("toys"), Some(4.0)),
            rated(Some("toys"), Some(4.0)),
            rated(Some("auto"), Some(2.0)),
            rated(Some("auto"), None),
            rated(Some("pet_shop"), None),
            rated(Some("bed_bath_table"), Some(4.2)),
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let ratings = category_rating(&refs);
        let pairs: Vec<(Option<&str>, Option<f64>)> =
            ratings.iter().map(|r| (r.category.as_deref(), r.review_score)).collect();
        assert_eq!(
            pairs,
            vec![
                (Some("auto"), Some(2.0)),
                // 4.2 vs 4.25 → 4.2: equal scores keep label order
                (Some("bed_bath_table"), Some(4.2)),
                (Some("toys"), Some(4.2)),
                (Some("pet_shop"), None),
            ]
        );
    }

    #[test]
    fn test_category_rating_rounds_up_at_435() {
        // 7 fives and 13 fours average to 4.35
        let mut rows: Vec<OrderRecord> = (0..7).map(|_| rated(Some("toys"), Some(5.0))).collect();
        rows.extend((0..13).map(|_| rated(Some("toys"), Some(4.0))));
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        assert_eq!(category_rating(&refs)[0].review_score, Some(4.4));
    }

    #[test]
    fn test_payment_types_sorted_ascending() {
        let paid = |order: &str, kind: Option<&str>| OrderRecord {
            payment_type: kind.map(str::to_string),
            ..row(order, "2017-01-01 00:00:00")
        };
        let rows = vec![
            paid("o1", Some("credit_card")),
            paid("o1", Some("credit_card")),
            paid("o2", Some("credit_card")),
            paid("o3", Some("boleto")),
            paid("o4", Some("voucher")),
            paid("o5", Some("voucher")),
            paid("o6", Some("voucher")),
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let payments = payment_types(&refs);
        let pairs: Vec<(Option<&str>, usize)> =
            payments.iter().map(|p| (p.payment_type.as_deref(), p.order_count)).collect();
        assert_eq!(
            pairs,
            vec![(Some("boleto"), 1), (Some("credit_card"), 2), (Some("voucher"), 3)]
        );
    }

    #[test]
    fn test_rows_without_order_id() {
        let rows = vec![
            OrderRecord {
                price: Some(10.0),
                payment_type: Some("boleto".to_string()),
                product_category: Some("toys".to_string()),
                ..row("o1", "2017-01-01 09:00:00")
            },
            OrderRecord {
                order_id: None,
                price: Some(5.0),
                payment_type: Some("voucher".to_string()),
                product_category: Some("toys".to_string()),
                ..row("", "2017-01-01 11:00:00")
            },
        ];
        let refs: Vec<&OrderRecord> = rows.iter().collect();

        let daily = daily_orders(&refs);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].order_count, 1);
        assert_eq!(daily[0].revenue, 15.0);

        assert_eq!(category_performance(&refs)[0].order_items, 2);

        let payments = payment_types(&refs);
        let pairs: Vec<(Option<&str>, usize)> =
            payments.iter().map(|p| (p.payment_type.as_deref(), p.order_count)).collect();
        assert_eq!(pairs, vec![(Some("voucher"), 0), (Some("boleto"), 1)]);
    }

    #[test]
    fn test_empty_input_gives_empty_summaries() {
        let rows: Vec<&OrderRecord> = Vec::new();
        assert!(daily_orders(&rows).is_empty());
        assert!(customers_by_city(&rows).is_empty());
        assert!(sellers_by_city(&rows).is_empty());
        assert!(category_performance(&rows).is_empty());
        assert!(category_rating(&rows).is_empty());
        assert!(payment_types(&rows).is_empty());
    }
}

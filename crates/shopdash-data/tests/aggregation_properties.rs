//! Property tests for the range filter and the aggregations.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use shopdash_data::*;
use std::collections::HashSet;

const CITIES: [&str; 4] = ["sao paulo", "rio de janeiro", "curitiba", "campinas"];

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()
}

/// (order index, day offset, seconds into day, price in cents, city index)
fn row_strategy() -> impl Strategy<Value = (u8, i64, u32, Option<u32>, Option<usize>)> {
    (
        0u8..40,
        0i64..60,
        0u32..86_400,
        proptest::option::of(0u32..100_000),
        proptest::option::of(0usize..CITIES.len()),
    )
}

fn build_table(rows: &[(u8, i64, u32, Option<u32>, Option<usize>)]) -> OrderTable {
    rows.iter()
        .map(|&(order, day_offset, secs, cents, city)| {
            let purchased_at = (base_day() + Duration::days(day_offset))
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + Duration::seconds(i64::from(secs));
            OrderRecord {
                // The day is part of the id so one order never spans two days
                order_id: Some(format!("o{order}d{day_offset}")),
                purchased_at,
                price: cents.map(|c| f64::from(c) / 100.0),
                customer_id: Some(format!("c{}", order % 7)),
                customer_city: city.map(|i| CITIES[i].to_string()),
                seller_id: Some(format!("s{}", order % 3)),
                seller_city: city.map(|i| CITIES[(i + 1) % CITIES.len()].to_string()),
                product_category: Some(format!("cat{}", order % 5)),
                review_score: Some(f64::from(order % 5 + 1)),
                payment_type: Some(["credit_card", "boleto", "voucher"][usize::from(order % 3)].to_string()),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_filter_is_exact_partition(
        rows in proptest::collection::vec(row_strategy(), 0..80),
        start_offset in 0i64..60,
        len in 0i64..30
    ) {
        let table = build_table(&rows);
        let start = base_day() + Duration::days(start_offset);
        let end = start + Duration::days(len);
        let range = DateRange::new(start, end).unwrap();

        let filtered = RangeFilter::from_range(range).apply(&table).unwrap();

        // Every selected row is in range
        for row in filtered.rows() {
            prop_assert!(range.contains(row.purchase_date()));
        }

        // Every in-range row is selected exactly once
        let expected = table.iter().filter(|r| range.contains(r.purchase_date())).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn prop_daily_totals_match_dataset(rows in proptest::collection::vec(row_strategy(), 1..80)) {
        let table = build_table(&rows);
        let filter = RangeFilter::from_range(table.date_bounds().unwrap());
        let snapshot = DashboardSnapshot::compute(&table, &filter).unwrap();

        let distinct_orders: HashSet<&str> = table.iter().filter_map(|r| r.order_id.as_deref()).collect();
        prop_assert_eq!(snapshot.total_orders, distinct_orders.len());

        let price_sum: f64 = table.iter().map(|r| r.price.unwrap_or(0.0)).sum();
        prop_assert!((snapshot.total_revenue - price_sum).abs() < 1e-6);
        prop_assert_eq!(snapshot.filtered_rows, table.len());
    }

    #[test]
    fn prop_each_city_appears_once(rows in proptest::collection::vec(row_strategy(), 0..80)) {
        let table = build_table(&rows);
        let all: Vec<&OrderRecord> = table.iter().collect();

        for summary in [customers_by_city(&all), sellers_by_city(&all)] {
            let mut seen = HashSet::new();
            for city in &summary {
                prop_assert!(seen.insert(city.city.clone()));
                prop_assert!(city.count >= 1);
            }
        }
    }

    #[test]
    fn prop_ratings_in_bounds_and_sorted(rows in proptest::collection::vec(row_strategy(), 0..80)) {
        let table = build_table(&rows);
        let all: Vec<&OrderRecord> = table.iter().collect();
        let ratings = category_rating(&all);

        let scores: Vec<f64> = ratings.iter().filter_map(|r| r.review_score).collect();
        for score in &scores {
            prop_assert!((0.0..=5.0).contains(score));
        }
        prop_assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_aggregations_are_deterministic(rows in proptest::collection::vec(row_strategy(), 0..40)) {
        let table = build_table(&rows);
        let all: Vec<&OrderRecord> = table.iter().collect();

        prop_assert_eq!(daily_orders(&all), daily_orders(&all));
        prop_assert_eq!(category_performance(&all), category_performance(&all));
        prop_assert_eq!(payment_types(&all), payment_types(&all));
    }
}

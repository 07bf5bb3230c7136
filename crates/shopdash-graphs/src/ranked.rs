//! Display ordering and truncation of the summary tables.
//!
//! The aggregations return complete tables; the charts only show a few rows
//! of each, in a chart-specific order.

use crate::types::BarDatum;
use shopdash_common::key_label;
use shopdash_data::{CategoryPerformance, CategoryRating, CitySummary, PaymentTypeSummary};

fn bar(key: Option<&str>, value: f64) -> BarDatum {
    BarDatum::new(key_label(key), value)
}

fn highlight_first(mut bars: Vec<BarDatum>) -> Vec<BarDatum> {
    if let Some(first) = bars.first_mut() {
        first.highlighted = true;
    }
    bars
}

/// The `n` cities with the most distinct customers or sellers, largest first
pub fn top_cities(cities: &[CitySummary], n: usize) -> Vec<BarDatum> {
    let mut ranked: Vec<&CitySummary> = cities.iter().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    highlight_first(
        ranked
            .into_iter()
            .take(n)
            .map(|c| bar(c.city.as_deref(), c.count as f64))
            .collect(),
    )
}

/// The `n` categories with the most order items, largest first
pub fn best_performing(categories: &[CategoryPerformance], n: usize) -> Vec<BarDatum> {
    let mut ranked: Vec<&CategoryPerformance> = categories.iter().collect();
    ranked.sort_by(|a, b| b.order_items.cmp(&a.order_items));

    highlight_first(
        ranked
            .into_iter()
            .take(n)
            .map(|c| bar(c.category.as_deref(), c.order_items as f64))
            .collect(),
    )
}

/// The `n` categories with the fewest order items, smallest first
pub fn worst_performing(categories: &[CategoryPerformance], n: usize) -> Vec<BarDatum> {
    let mut ranked: Vec<&CategoryPerformance> = categories.iter().collect();
    ranked.sort_by_key(|c| c.order_items);

    highlight_first(
        ranked
            .into_iter()
            .take(n)
            .map(|c| bar(c.category.as_deref(), c.order_items as f64))
            .collect(),
    )
}

/// The `n` lowest-rated categories, listed from highest to lowest score with
/// the lowest one highlighted. Categories without any score are left out.
pub fn worst_rated(ratings: &[CategoryRating], n: usize) -> Vec<BarDatum> {
    let mut scored: Vec<(Option<&str>, f64)> = ratings
        .iter()
        .filter_map(|r| r.review_score.map(|score| (r.category.as_deref(), score)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let skip = scored.len().saturating_sub(n);
    let mut bars: Vec<BarDatum> = scored
        .into_iter()
        .skip(skip)
        .map(|(category, score)| bar(category, score))
        .collect();

    if let Some(lowest) = bars.last_mut() {
        lowest.highlighted = true;
    }
    bars
}

/// Every payment type, most used first
pub fn payment_trend(payments: &[PaymentTypeSummary]) -> Vec<BarDatum> {
    let mut ranked: Vec<&PaymentTypeSummary> = payments.iter().collect();
    ranked.sort_by(|a, b| b.order_count.cmp(&a.order_count));

    highlight_first(
        ranked
            .into_iter()
            .map(|p| bar(p.payment_type.as_deref(), p.order_count as f64))
            .collect(),
    )
}

/// Upper bound of the value axis: the largest value plus 10% headroom
pub fn axis_max(bars: &[BarDatum]) -> f64 {
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdash_common::test_utils::assert_approx_eq;

    fn city(name: Option<&str>, count: usize) -> CitySummary {
        CitySummary {
            city: name.map(str::to_string),
            count,
        }
    }

    fn perf(name: &str, order_items: usize) -> CategoryPerformance {
        CategoryPerformance {
            category: Some(name.to_string()),
            order_items,
        }
    }

    fn labels(bars: &[BarDatum]) -> Vec<&str> {
        bars.iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn test_top_cities_sorted_and_truncated() {
        let cities = vec![
            city(None, 3),
            city(Some("campinas"), 2),
            city(Some("rio de janeiro"), 7),
            city(Some("sao paulo"), 12),
            city(Some("santos"), 2),
        ];

        let bars = top_cities(&cities, 3);
        assert_eq!(labels(&bars), vec!["sao paulo", "rio de janeiro", "(unknown)"]);
        assert!(bars[0].highlighted);
        assert!(!bars[1].highlighted && !bars[2].highlighted);
        assert_eq!(bars[0].value, 12.0);
    }

    #[test]
    fn test_top_cities_keeps_label_order_on_ties() {
        let cities = vec![city(Some("campinas"), 2), city(Some("santos"), 2)];
        assert_eq!(labels(&top_cities(&cities, 5)), vec!["campinas", "santos"]);
    }

    #[test]
    fn test_best_and_worst_performing() {
        let categories = vec![
            perf("bed_bath_table", 11),
            perf("health_beauty", 9),
            perf("toys", 4),
            perf("auto", 1),
            perf("security_and_services", 1),
        ];

        assert_eq!(labels(&best_performing(&categories, 2)), vec!["bed_bath_table", "health_beauty"]);

        let worst = worst_performing(&categories, 3);
        assert_eq!(labels(&worst), vec!["auto", "security_and_services", "toys"]);
        assert!(worst[0].highlighted);
    }

    #[test]
    fn test_worst_rated() {
        let rating = |name: &str, score: Option<f64>| CategoryRating {
            category: Some(name.to_string()),
            review_score: score,
        };
        let ratings = vec![
            rating("security_and_services", Some(2.5)),
            rating("diapers", Some(3.3)),
            rating("office_furniture", Some(3.5)),
            rating("toys", Some(4.2)),
            rating("books", Some(4.5)),
            rating("unscored", None),
        ];

        let bars = worst_rated(&ratings, 3);
        assert_eq!(labels(&bars), vec!["office_furniture", "diapers", "security_and_services"]);
        assert!(bars[2].highlighted);
        assert!(!bars[0].highlighted);
        assert_eq!(bars[2].value, 2.5);
    }

    #[test]
    fn test_payment_trend() {
        let payment = |kind: &str, order_count: usize| PaymentTypeSummary {
            payment_type: Some(kind.to_string()),
            order_count,
        };
        let payments = vec![payment("debit_card", 2), payment("voucher", 5), payment("credit_card", 70)];

        let bars = payment_trend(&payments);
        assert_eq!(labels(&bars), vec!["credit_card", "voucher", "debit_card"]);
        assert!(bars[0].highlighted);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(top_cities(&[], 5).is_empty());
        assert!(worst_rated(&[], 5).is_empty());
        assert!(payment_trend(&[]).is_empty());
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(&[]), 1.0);
        let bars = vec![BarDatum::new("a", 100.0), BarDatum::new("b", 50.0)];
        assert_approx_eq(axis_max(&bars), 110.0, 1e-9);
    }
}

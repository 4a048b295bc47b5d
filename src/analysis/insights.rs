//! Product insights aggregation.
//!
//! This module computes summary statistics over an in-memory list of
//! products: totals, averages, category breakdown, and the top-rated and
//! low-stock highlight lists. It is pure and performs no I/O; the fetch
//! layer is responsible for supplying an already-resolved product list.

use crate::models::{CategorySummary, InsightsReport, Product};
use std::collections::HashMap;

/// Minimum rating for a product to count as top-rated.
pub const TOP_RATED_MIN_RATING: f64 = 4.5;

/// Stock level below which a product counts as low-stock.
pub const LOW_STOCK_THRESHOLD: u64 = 20;

/// Maximum entries in the top-rated and low-stock lists.
pub const HIGHLIGHT_LIMIT: usize = 5;

/// Compute an [`InsightsReport`] over `products`.
///
/// `total` is the size of the full backing catalog as reported by the data
/// source and may exceed `products.len()` when the input is a single page.
/// Averages are taken over the records actually aggregated; `total` only
/// feeds `total_products` and the empty-catalog short-circuit.
///
/// Never fails: missing numeric fields substitute zero, and a `total` of
/// zero yields a fully zeroed report.
pub fn compute_insights(products: &[Product], total: u64) -> InsightsReport {
    if total == 0 {
        return InsightsReport::default();
    }

    let price_sum: f64 = products.iter().map(Product::price_or_zero).sum();
    let rating_sum: f64 = products.iter().map(Product::rating_or_zero).sum();
    let total_stock: u64 = products.iter().map(Product::stock_or_zero).sum();

    let (average_price, average_rating) = if products.is_empty() {
        (0.0, 0.0)
    } else {
        let count = products.len() as f64;
        (round2(price_sum / count), round2(rating_sum / count))
    };

    InsightsReport {
        total_products: total,
        average_price,
        average_rating,
        total_stock,
        categories: category_breakdown(products),
        top_rated_products: top_rated(products),
        low_stock_products: low_stock(products),
    }
}

/// Round to 2 decimal places.
///
/// Half-away-from-zero on the f64 value: `(x * 100).round() / 100`. Decimal
/// values with no exact binary representation round on their nearest f64
/// neighbor, so `round2(10.005)` is `10.01` (the neighbor sits above the
/// half point).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

struct CategoryAccumulator {
    first_seen: usize,
    count: u64,
    price_sum: f64,
}

/// Group products by category label and summarize each group.
///
/// Groups are ordered by count descending; ties keep the order in which the
/// category was first discovered in the input.
fn category_breakdown(products: &[Product]) -> Vec<CategorySummary> {
    let mut groups: HashMap<&str, CategoryAccumulator> = HashMap::new();

    for (index, product) in products.iter().enumerate() {
        let entry = groups
            .entry(product.category_label())
            .or_insert_with(|| CategoryAccumulator {
                first_seen: index,
                count: 0,
                price_sum: 0.0,
            });
        entry.count += 1;
        entry.price_sum += product.price_or_zero();
    }

    let mut summaries: Vec<_> = groups.into_iter().collect();
    summaries.sort_by(|(_, a), (_, b)| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));

    summaries
        .into_iter()
        .map(|(name, group)| CategorySummary {
            name: name.to_string(),
            count: group.count,
            average_price: round2(group.price_sum / group.count as f64),
        })
        .collect()
}

/// Products rated at least [`TOP_RATED_MIN_RATING`], best first.
///
/// The sort is stable, so products with equal ratings keep their relative
/// input order.
fn top_rated(products: &[Product]) -> Vec<Product> {
    let mut picks: Vec<Product> = products
        .iter()
        .filter(|p| p.rating_or_zero() >= TOP_RATED_MIN_RATING)
        .cloned()
        .collect();

    picks.sort_by(|a, b| {
        b.rating_or_zero()
            .partial_cmp(&a.rating_or_zero())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    picks.truncate(HIGHLIGHT_LIMIT);

    picks
}

/// Products with stock below [`LOW_STOCK_THRESHOLD`], scarcest first.
fn low_stock(products: &[Product]) -> Vec<Product> {
    let mut picks: Vec<Product> = products
        .iter()
        .filter(|p| p.stock_or_zero() < LOW_STOCK_THRESHOLD)
        .cloned()
        .collect();

    picks.sort_by_key(|p| p.stock_or_zero());
    picks.truncate(HIGHLIGHT_LIMIT);

    picks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: u64, price: f64, rating: f64, stock: u64, category: &str) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            description: String::new(),
            price: Some(price),
            discount_percentage: None,
            rating: Some(rating),
            stock: Some(stock),
            brand: None,
            category: Some(category.to_string()),
            thumbnail: None,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_worked_example() {
        let products = vec![
            make_product(1, 10.0, 5.0, 5, "a"),
            make_product(2, 20.0, 4.6, 30, "a"),
            make_product(3, 30.0, 3.0, 10, "b"),
        ];

        let report = compute_insights(&products, 3);

        assert_eq!(report.total_products, 3);
        assert_eq!(report.average_price, 20.0);
        assert_eq!(report.average_rating, 4.2);
        assert_eq!(report.total_stock, 45);

        assert_eq!(
            report.categories,
            vec![
                CategorySummary {
                    name: "a".to_string(),
                    count: 2,
                    average_price: 15.0,
                },
                CategorySummary {
                    name: "b".to_string(),
                    count: 1,
                    average_price: 30.0,
                },
            ]
        );

        let top_ids: Vec<u64> = report.top_rated_products.iter().map(|p| p.id).collect();
        assert_eq!(top_ids, vec![1, 2]);

        let low_ids: Vec<u64> = report.low_stock_products.iter().map(|p| p.id).collect();
        assert_eq!(low_ids, vec![1, 3]);
    }

    #[test]
    fn test_zero_total_short_circuits() {
        let products = vec![make_product(1, 99.0, 5.0, 1, "a")];

        let report = compute_insights(&products, 0);

        assert_eq!(report.total_products, 0);
        assert_eq!(report.average_price, 0.0);
        assert_eq!(report.average_rating, 0.0);
        assert_eq!(report.total_stock, 0);
        assert!(report.categories.is_empty());
        assert!(report.top_rated_products.is_empty());
        assert!(report.low_stock_products.is_empty());
    }

    #[test]
    fn test_empty_input_with_nonzero_total() {
        let report = compute_insights(&[], 194);

        assert_eq!(report.total_products, 194);
        assert_eq!(report.average_price, 0.0);
        assert_eq!(report.average_rating, 0.0);
        assert_eq!(report.total_stock, 0);
        assert!(report.categories.is_empty());
    }

    #[test]
    fn test_total_stock_is_exact_sum() {
        let products = vec![
            make_product(1, 1.0, 1.0, 7, "a"),
            make_product(2, 1.0, 1.0, 0, "a"),
            make_product(3, 1.0, 1.0, 123_456, "b"),
        ];

        let report = compute_insights(&products, 3);
        assert_eq!(report.total_stock, 123_463);
    }

    #[test]
    fn test_category_ties_keep_discovery_order() {
        let products = vec![
            make_product(1, 10.0, 1.0, 50, "beauty"),
            make_product(2, 10.0, 1.0, 50, "laptops"),
            make_product(3, 10.0, 1.0, 50, "beauty"),
            make_product(4, 10.0, 1.0, 50, "laptops"),
            make_product(5, 10.0, 1.0, 50, "phones"),
        ];

        let report = compute_insights(&products, 5);
        let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();

        // beauty and laptops both count 2; beauty was seen first.
        assert_eq!(names, vec!["beauty", "laptops", "phones"]);
    }

    #[test]
    fn test_missing_category_groups_as_uncategorized() {
        let mut orphan = make_product(1, 12.0, 1.0, 50, "x");
        orphan.category = None;
        let products = vec![orphan, make_product(2, 8.0, 1.0, 50, "x")];

        let report = compute_insights(&products, 2);

        assert!(report
            .categories
            .iter()
            .any(|c| c.name == "Uncategorized" && c.count == 1 && c.average_price == 12.0));
    }

    #[test]
    fn test_top_rated_threshold_cap_and_order() {
        let products = vec![
            make_product(1, 1.0, 4.4, 50, "a"),
            make_product(2, 1.0, 4.5, 50, "a"),
            make_product(3, 1.0, 4.9, 50, "a"),
            make_product(4, 1.0, 4.7, 50, "a"),
            make_product(5, 1.0, 4.8, 50, "a"),
            make_product(6, 1.0, 4.6, 50, "a"),
            make_product(7, 1.0, 5.0, 50, "a"),
        ];

        let report = compute_insights(&products, 7);

        assert_eq!(report.top_rated_products.len(), HIGHLIGHT_LIMIT);
        let ids: Vec<u64> = report.top_rated_products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 3, 5, 4, 6]);
        assert!(report
            .top_rated_products
            .iter()
            .all(|p| p.rating_or_zero() >= TOP_RATED_MIN_RATING));
    }

    #[test]
    fn test_top_rated_ties_keep_input_order() {
        let products = vec![
            make_product(10, 1.0, 4.8, 50, "a"),
            make_product(20, 1.0, 4.9, 50, "a"),
            make_product(30, 1.0, 4.8, 50, "a"),
        ];

        let report = compute_insights(&products, 3);
        let ids: Vec<u64> = report.top_rated_products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![20, 10, 30]);
    }

    #[test]
    fn test_low_stock_threshold_cap_and_order() {
        let products = vec![
            make_product(1, 1.0, 1.0, 19, "a"),
            make_product(2, 1.0, 1.0, 20, "a"),
            make_product(3, 1.0, 1.0, 3, "a"),
            make_product(4, 1.0, 1.0, 11, "a"),
            make_product(5, 1.0, 1.0, 0, "a"),
            make_product(6, 1.0, 1.0, 15, "a"),
            make_product(7, 1.0, 1.0, 8, "a"),
        ];

        let report = compute_insights(&products, 7);

        assert_eq!(report.low_stock_products.len(), HIGHLIGHT_LIMIT);
        let ids: Vec<u64> = report.low_stock_products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 3, 7, 4, 6]);
        assert!(report
            .low_stock_products
            .iter()
            .all(|p| p.stock_or_zero() < LOW_STOCK_THRESHOLD));
    }

    #[test]
    fn test_missing_numeric_fields_count_as_zero() {
        let bare = Product {
            price: None,
            rating: None,
            stock: None,
            ..make_product(1, 0.0, 0.0, 0, "a")
        };
        let products = vec![bare, make_product(2, 10.0, 4.0, 40, "a")];

        let report = compute_insights(&products, 2);

        assert_eq!(report.average_price, 5.0);
        assert_eq!(report.average_rating, 2.0);
        assert_eq!(report.total_stock, 40);
        // A missing stock reads as 0, which is below the threshold.
        assert_eq!(report.low_stock_products.len(), 1);
        assert_eq!(report.low_stock_products[0].id, 1);
    }

    #[test]
    fn test_rounding_is_deterministic() {
        let products = vec![
            make_product(1, 10.005, 1.0, 50, "a"),
            make_product(2, 10.005, 1.0, 50, "a"),
        ];

        let report = compute_insights(&products, 2);

        // The f64 nearest 10.005 sits just above it, so the half case
        // resolves upward.
        assert_eq!(report.average_price, 10.01);
        assert_eq!(round2(10.015), 10.02);
        assert_eq!(round2(-10.015), -10.02);
        assert_eq!(round2(33.333333), 33.33);
    }

    #[test]
    fn test_idempotent() {
        let products = vec![
            make_product(1, 19.99, 4.8, 3, "beauty"),
            make_product(2, 5.49, 4.5, 44, "groceries"),
            make_product(3, 1299.0, 4.9, 12, "laptops"),
        ];

        let first = compute_insights(&products, 120);
        let second = compute_insights(&products, 120);

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_not_mutated() {
        let products = vec![make_product(1, 10.0, 4.9, 5, "a")];
        let snapshot = serde_json::to_string(&products).unwrap();

        let _ = compute_insights(&products, 1);

        assert_eq!(serde_json::to_string(&products).unwrap(), snapshot);
    }
}

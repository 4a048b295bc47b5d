//! Data models for the catalog insights tool.
//!
//! This module contains all the core data structures used throughout
//! the application for representing products, filters, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label substituted for products that carry no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A single product record as returned by the catalog API.
///
/// Numeric fields the API may omit are modeled as `Option` and substituted
/// with zero at the aggregation boundary, never at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: u64,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Product description.
    #[serde(default)]
    pub description: String,
    /// Unit price (non-negative).
    #[serde(default)]
    pub price: Option<f64>,
    /// Discount percentage in [0, 100].
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    /// Customer rating in [0, 5].
    #[serde(default)]
    pub rating: Option<f64>,
    /// Units in stock.
    #[serde(default)]
    pub stock: Option<u64>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Thumbnail image URL (opaque to aggregation).
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Gallery image URLs (opaque to aggregation).
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Returns the category label, substituting [`UNCATEGORIZED`] when the
    /// record carries no category or an empty one.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    /// Price with the zero-substitution rule applied.
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Rating with the zero-substitution rule applied.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Stock with the zero-substitution rule applied.
    pub fn stock_or_zero(&self) -> u64 {
        self.stock.unwrap_or(0)
    }
}

/// One page of products as returned by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsPage {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Size of the full backing collection.
    pub total: u64,
    /// Offset of this page within the collection.
    #[serde(default)]
    pub skip: u64,
    /// Requested page size.
    #[serde(default)]
    pub limit: u64,
}

impl ProductsPage {
    /// Returns the offset of the next page, or `None` when this page
    /// exhausts the collection.
    pub fn next_skip(&self) -> Option<u64> {
        let next = self.skip + self.limit;
        if self.limit > 0 && next < self.total {
            Some(next)
        } else {
            None
        }
    }
}

/// Filter criteria for catalog queries.
///
/// `search` and `category` select the API endpoint; the remaining fields
/// are applied client-side after the fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Full-text search query.
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Exact brand name (case-insensitive).
    pub brand: Option<String>,
    /// Minimum price, inclusive.
    pub min_price: Option<f64>,
    /// Maximum price, inclusive.
    pub max_price: Option<f64>,
    /// Minimum rating, inclusive.
    pub min_rating: Option<f64>,
}

impl ProductFilters {
    /// Returns true if any client-side refinement is set.
    pub fn has_refinements(&self) -> bool {
        self.brand.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.min_rating.is_some()
    }
}

/// Per-category aggregate within an [`InsightsReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Category label.
    pub name: String,
    /// Number of products in the category.
    pub count: u64,
    /// Mean price within the category, rounded to 2 decimal places.
    pub average_price: f64,
}

/// Aggregate statistics over a set of products.
///
/// A value object recomputed on every call; field names match what the
/// presentation layer reads verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    /// Size of the full backing catalog as reported by the source.
    pub total_products: u64,
    /// Mean price, rounded to 2 decimal places.
    pub average_price: f64,
    /// Mean rating, rounded to 2 decimal places.
    pub average_rating: f64,
    /// Exact sum of stock over the aggregated products.
    pub total_stock: u64,
    /// Category breakdown, ordered by count descending.
    pub categories: Vec<CategorySummary>,
    /// Products rated at least 4.5, best first, at most 5.
    pub top_rated_products: Vec<Product>,
    /// Products with stock below 20, scarcest first, at most 5.
    pub low_stock_products: Vec<Product>,
}

/// Metadata about a generated catalog report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Base URL of the catalog API.
    pub source_url: String,
    /// Date and time of the fetch.
    pub fetched_at: DateTime<Utc>,
    /// Number of products actually fetched and aggregated.
    pub products_fetched: usize,
    /// Size of the full backing catalog.
    pub catalog_total: u64,
    /// Duration of fetch plus aggregation in seconds.
    pub duration_seconds: f64,
}

/// The complete catalog insights report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Aggregate statistics.
    pub insights: InsightsReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: u64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            description: String::new(),
            price: Some(10.0),
            discount_percentage: None,
            rating: Some(4.0),
            stock: Some(50),
            brand: Some("Acme".to_string()),
            category: Some("widgets".to_string()),
            thumbnail: None,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_category_label_default() {
        let mut product = make_product(1);
        assert_eq!(product.category_label(), "widgets");

        product.category = None;
        assert_eq!(product.category_label(), UNCATEGORIZED);

        product.category = Some(String::new());
        assert_eq!(product.category_label(), UNCATEGORIZED);
    }

    #[test]
    fn test_zero_substitution() {
        let product = Product {
            price: None,
            rating: None,
            stock: None,
            ..make_product(1)
        };
        assert_eq!(product.price_or_zero(), 0.0);
        assert_eq!(product.rating_or_zero(), 0.0);
        assert_eq!(product.stock_or_zero(), 0);
    }

    #[test]
    fn test_page_next_skip() {
        let page = ProductsPage {
            products: Vec::new(),
            total: 100,
            skip: 0,
            limit: 30,
        };
        assert_eq!(page.next_skip(), Some(30));

        let last = ProductsPage {
            total: 100,
            skip: 90,
            limit: 30,
            ..page.clone()
        };
        assert_eq!(last.next_skip(), None);

        let exact = ProductsPage {
            total: 60,
            skip: 30,
            limit: 30,
            ..page
        };
        assert_eq!(exact.next_skip(), None);
    }

    #[test]
    fn test_filters_refinements() {
        let mut filters = ProductFilters::default();
        assert!(!filters.has_refinements());

        filters.search = Some("phone".to_string());
        assert!(!filters.has_refinements());

        filters.min_rating = Some(4.0);
        assert!(filters.has_refinements());
    }

    #[test]
    fn test_product_deserializes_with_missing_fields() {
        let json = r#"{"id": 7, "title": "Bare"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.price, None);
        assert_eq!(product.stock, None);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_product_deserializes_camel_case() {
        let json = r#"{"id": 1, "title": "Phone", "discountPercentage": 12.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.discount_percentage, Some(12.5));
    }
}

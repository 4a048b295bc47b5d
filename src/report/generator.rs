//! Markdown report generation.
//!
//! This module renders a [`CatalogReport`] into Markdown or JSON for the
//! presentation layer; the insights fields are emitted verbatim, with no
//! further transformation.

use crate::config::ReportConfig;
use crate::models::{CatalogReport, CategorySummary, InsightsReport, Product, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &CatalogReport, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Shelfscope Catalog Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Overview
    output.push_str(&generate_overview_section(&report.insights));

    // Category breakdown
    if options.include_categories {
        output.push_str(&generate_categories_section(
            &report.insights.categories,
            options.max_table_rows,
        ));
    }

    // Highlight lists
    if options.include_top_rated {
        output.push_str(&generate_top_rated_section(
            &report.insights.top_rated_products,
        ));
    }
    if options.include_low_stock {
        output.push_str(&generate_low_stock_section(
            &report.insights.low_stock_products,
        ));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source_url));
    section.push_str(&format!(
        "- **Fetched:** {}\n",
        metadata.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Products Aggregated:** {}\n",
        metadata.products_fetched
    ));
    section.push_str(&format!("- **Catalog Total:** {}\n", metadata.catalog_total));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the overview table.
fn generate_overview_section(insights: &InsightsReport) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Total Products | Average Price | Average Rating | Total Stock |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | ${:.2} | {:.2} | {} |\n\n",
        insights.total_products,
        insights.average_price,
        insights.average_rating,
        insights.total_stock
    ));

    section
}

/// Generate the category breakdown table.
fn generate_categories_section(categories: &[CategorySummary], max_rows: usize) -> String {
    let mut section = String::new();

    section.push_str("## Categories\n\n");

    if categories.is_empty() {
        section.push_str("No categories to report.\n\n");
        return section;
    }

    section.push_str("| Category | Products | Average Price |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for category in categories.iter().take(max_rows) {
        section.push_str(&format!(
            "| {} | {} | ${:.2} |\n",
            category.name, category.count, category.average_price
        ));
    }

    if categories.len() > max_rows {
        section.push_str(&format!(
            "\n*…and {} more categories.*\n",
            categories.len() - max_rows
        ));
    }
    section.push('\n');

    section
}

/// Generate the top-rated products table.
fn generate_top_rated_section(products: &[Product]) -> String {
    let mut section = String::new();

    section.push_str("## Top Rated Products\n\n");

    if products.is_empty() {
        section.push_str("No products rated 4.5 or higher.\n\n");
        return section;
    }

    section.push_str("| Product | Brand | Rating | Price |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");

    for product in products {
        section.push_str(&format!(
            "| {} | {} | {:.2} | ${:.2} |\n",
            product.title,
            product.brand.as_deref().unwrap_or("-"),
            product.rating_or_zero(),
            product.price_or_zero()
        ));
    }
    section.push('\n');

    section
}

/// Generate the low-stock products table.
fn generate_low_stock_section(products: &[Product]) -> String {
    let mut section = String::new();

    section.push_str("## Low Stock Products\n\n");

    if products.is_empty() {
        section.push_str("No products below the restock threshold. 🎉\n\n");
        return section;
    }

    section.push_str("| Product | Category | Stock | Price |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");

    for product in products {
        section.push_str(&format!(
            "| {} | {} | {} | ${:.2} |\n",
            product.title,
            product.category_label(),
            product.stock_or_zero(),
            product.price_or_zero()
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by shelfscope*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &CatalogReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

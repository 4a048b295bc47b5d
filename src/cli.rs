//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ProductFilters;
use clap::Parser;
use std::path::PathBuf;

/// Shelfscope - product catalog insights from a dummyjson-compatible API
///
/// Fetch product data, aggregate it into summary statistics (averages,
/// category breakdown, top-rated and low-stock highlights), and render a
/// Markdown or JSON report.
///
/// Examples:
///   shelfscope
///   shelfscope --all --format json --output insights.json
///   shelfscope --search phone --min-rating 4
///   shelfscope --category beauty --brand Essence
///   shelfscope --list-categories
///   shelfscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the catalog API
    #[arg(
        short,
        long,
        default_value = "https://dummyjson.com",
        env = "SHELFSCOPE_API_URL",
        value_name = "URL"
    )]
    pub base_url: String,

    /// Full-text search query
    ///
    /// Sent to the API's search endpoint. Takes precedence over --category
    /// (the API cannot combine the two).
    #[arg(short, long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Category slug to fetch
    ///
    /// Use --list-categories to see what the API offers.
    #[arg(short, long, value_name = "SLUG")]
    pub category: Option<String>,

    /// Keep only products of this brand (applied after fetch, case-insensitive)
    #[arg(long, value_name = "BRAND")]
    pub brand: Option<String>,

    /// Keep only products priced at or above this value (applied after fetch)
    #[arg(long, value_name = "PRICE")]
    pub min_price: Option<f64>,

    /// Keep only products priced at or below this value (applied after fetch)
    #[arg(long, value_name = "PRICE")]
    pub max_price: Option<f64>,

    /// Keep only products rated at or above this value (applied after fetch)
    #[arg(long, value_name = "RATING")]
    pub min_rating: Option<f64>,

    /// Fetch the entire catalog, paginating until the reported total
    #[arg(short, long, conflicts_with_all = ["limit", "skip"])]
    pub all: bool,

    /// Number of products to fetch
    #[arg(short, long, default_value = "30", value_name = "COUNT")]
    pub limit: u64,

    /// Offset into the catalog to fetch from
    #[arg(long, default_value = "0", value_name = "COUNT")]
    pub skip: u64,

    /// Output file path for the report
    ///
    /// Defaults to shelfscope_report.md (or the config file setting).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .shelfscope.toml in the current directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of concurrent page fetches when using --all
    #[arg(long, value_name = "NUM")]
    pub concurrency: Option<usize>,

    /// List the catalog's category slugs and exit
    #[arg(long)]
    pub list_categories: bool,

    /// Fetch a single product by id, print it as JSON, and exit
    #[arg(long, value_name = "ID")]
    pub product: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .shelfscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate API URL format
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate page size
        if !self.all && self.limit == 0 {
            return Err("Limit must be at least 1".to_string());
        }

        // Validate price range
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err("--min-price cannot exceed --max-price".to_string());
            }
        }
        if self.min_price.is_some_and(|p| p < 0.0) || self.max_price.is_some_and(|p| p < 0.0) {
            return Err("Price bounds must be non-negative".to_string());
        }

        // Validate rating range
        if let Some(rating) = self.min_rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err("--min-rating must be between 0 and 5".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate concurrency if provided
        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err("Concurrency must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Build the filter set from the filter-related arguments.
    pub fn filters(&self) -> ProductFilters {
        ProductFilters {
            search: self.search.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
        }
    }
}

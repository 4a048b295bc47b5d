//! Shelfscope - Product Catalog Insights CLI
//!
//! A CLI tool that fetches product data from a dummyjson-compatible
//! REST API, aggregates it into summary statistics, and renders a
//! Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, invalid arguments, etc.)

mod analysis;
mod catalog;
mod cli;
mod config;
mod models;
mod report;

use anyhow::{Context, Result};
use catalog::{apply_refinements, CatalogClient, ClientOptions};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{CatalogReport, ProductsPage, ReportMetadata};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Shelfscope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the workflow
    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .shelfscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".shelfscope.toml");

    if path.exists() {
        eprintln!("⚠️  .shelfscope.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .shelfscope.toml")?;

    println!("✅ Created .shelfscope.toml with default settings.");
    println!("   Edit it to customize the API endpoint, page size, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete fetch-aggregate-report workflow.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = CatalogClient::new(ClientOptions {
        base_url: config.api.base_url.clone(),
        timeout_seconds: config.api.timeout_seconds,
        retries: config.api.retries,
        concurrency: config.general.concurrency,
        page_size: config.api.page_size,
    })?;

    // Early-exit inspection paths
    if args.list_categories {
        return handle_list_categories(&client).await;
    }
    if let Some(id) = args.product {
        return handle_single_product(&client, id).await;
    }

    // Step 1: Fetch products
    let filters = args.filters();
    println!("📥 Fetching products from {}", config.api.base_url);

    let page = if args.all {
        client.fetch_all(&filters, !args.quiet).await?
    } else {
        client.fetch_page(&filters, args.skip, args.limit).await?
    };
    info!(
        "Fetched {} of {} products",
        page.products.len(),
        page.total
    );

    // Step 2: Apply client-side refinements
    let ProductsPage { products, total, .. } = page;
    let fetched = products.len();
    let products = apply_refinements(products, &filters);
    if filters.has_refinements() {
        info!(
            "Refinements kept {} of {} fetched products",
            products.len(),
            fetched
        );
        if products.is_empty() && fetched > 0 {
            warn!("All fetched products were filtered out by the refinement criteria");
        }
    }

    // Step 3: Aggregate
    println!("🧮 Computing insights over {} products...", products.len());
    let insights = analysis::compute_insights(&products, total);

    // Step 4: Build the report
    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        source_url: config.api.base_url.clone(),
        fetched_at: Utc::now(),
        products_fetched: products.len(),
        catalog_total: total,
        duration_seconds: duration,
    };
    let catalog_report = CatalogReport {
        metadata,
        insights: insights.clone(),
    };

    // Step 5: Render and save
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&catalog_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&catalog_report, &config.report),
    };

    let output_path = &config.general.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path))?;

    // Print summary
    println!("\n📊 Catalog Summary:");
    println!("   Products aggregated: {}", products.len());
    println!("   Catalog total: {}", insights.total_products);
    println!(
        "   Average price: ${:.2} | Average rating: {:.2}",
        insights.average_price, insights.average_rating
    );
    println!("   Total stock: {}", insights.total_stock);
    if let Some(top) = insights.categories.first() {
        println!("   Largest category: {} ({} products)", top.name, top.count);
    }
    println!(
        "   Top rated: {} | Low stock: {}",
        insights.top_rated_products.len(),
        insights.low_stock_products.len()
    );
    println!("   Duration: {:.1}s", duration);
    println!("\n✅ Report saved to: {}", output_path);

    Ok(())
}

/// Handle --list-categories: print the catalog's category slugs.
async fn handle_list_categories(client: &CatalogClient) -> Result<()> {
    let categories = client.fetch_categories().await?;

    if categories.is_empty() {
        println!("No categories reported by the catalog.");
    } else {
        println!("📚 {} categories:\n", categories.len());
        for category in &categories {
            println!("   {}", category);
        }
    }

    Ok(())
}

/// Handle --product: fetch one product and print it as JSON.
async fn handle_single_product(client: &CatalogClient, id: u64) -> Result<()> {
    let product = client.fetch_product(id).await?;

    println!("{}", serde_json::to_string_pretty(&product)?);
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .shelfscope.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

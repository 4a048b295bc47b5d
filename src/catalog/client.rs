//! HTTP client for dummyjson-compatible catalog APIs.
//!
//! This module handles all communication with the remote catalog:
//! page fetches, whole-catalog pagination, single-product lookup, and the
//! category list. Fetch failures surface as [`CatalogError`] and are never
//! converted into empty result sets.

use crate::models::{Product, ProductFilters, ProductsPage};
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors produced by the catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP client could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status code.
    #[error("catalog API returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response decoded but fails basic validation.
    #[error("invalid payload from {url}: {reason}")]
    InvalidPayload { url: String, reason: String },
}

/// Options for constructing a [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the catalog API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Extra attempts after a failed request.
    pub retries: usize,
    /// Concurrent page fetches during whole-catalog pagination.
    pub concurrency: usize,
    /// Page size used when paginating.
    pub page_size: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            timeout_seconds: 30,
            retries: 3,
            concurrency: 4,
            page_size: 30,
        }
    }
}

/// Client for a dummyjson-compatible product catalog API.
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
    retries: usize,
    concurrency: usize,
    page_size: u64,
}

impl CatalogClient {
    /// Create a new client from the given options.
    pub fn new(options: ClientOptions) -> Result<Self, CatalogError> {
        info!("Initializing catalog client for: {}", options.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(CatalogError::Build)?;

        Ok(Self {
            http_client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            retries: options.retries,
            concurrency: options.concurrency.max(1),
            page_size: options.page_size.max(1),
        })
    }

    /// Fetch one page of products matching `filters`.
    pub async fn fetch_page(
        &self,
        filters: &ProductFilters,
        skip: u64,
        limit: u64,
    ) -> Result<ProductsPage, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint_path(filters));
        let mut query: Vec<(&str, String)> =
            vec![("skip", skip.to_string()), ("limit", limit.to_string())];
        if let Some(q) = active_search(filters) {
            query.push(("q", q.to_string()));
        }

        debug!("Fetching page: {} skip={} limit={}", url, skip, limit);
        self.get_json(&url, &query).await
    }

    /// Fetch the entire catalog matching `filters`, paginating until the
    /// reported total is reached.
    ///
    /// The first page establishes the total; the remaining pages are fetched
    /// concurrently (bounded by the configured concurrency) and reassembled
    /// in offset order.
    pub async fn fetch_all(
        &self,
        filters: &ProductFilters,
        show_progress: bool,
    ) -> Result<ProductsPage, CatalogError> {
        let first = self.fetch_page(filters, 0, self.page_size).await?;
        let total = first.total;
        let offsets = remaining_offsets(total, self.page_size);
        info!(
            "Catalog reports {} products ({} additional pages)",
            total,
            offsets.len()
        );

        let progress_bar = if show_progress && !offsets.is_empty() {
            let pb = ProgressBar::new(offsets.len() as u64 + 1);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({eta})",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.inc(1);
            Some(pb)
        } else {
            None
        };

        let pages: Vec<ProductsPage> = stream::iter(offsets.into_iter().map(|skip| {
            let pb = progress_bar.clone();
            async move {
                let page = self.fetch_page(filters, skip, self.page_size).await?;
                if let Some(pb) = pb {
                    pb.inc(1);
                }
                Ok::<_, CatalogError>(page)
            }
        }))
        .buffered(self.concurrency)
        .try_collect()
        .await?;

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Fetch complete");
        }

        let mut products = first.products;
        for page in pages {
            products.extend(page.products);
        }

        Ok(ProductsPage {
            products,
            total,
            skip: 0,
            limit: self.page_size,
        })
    }

    /// Fetch a single product by id.
    pub async fn fetch_product(&self, id: u64) -> Result<Product, CatalogError> {
        let url = format!("{}/products/{}", self.base_url, id);
        let product: Product = self.get_json(&url, &[]).await?;

        if product.id == 0 {
            return Err(CatalogError::InvalidPayload {
                url,
                reason: "product has no id".to_string(),
            });
        }

        Ok(product)
    }

    /// Fetch the list of category slugs known to the catalog.
    pub async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/products/category-list", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// GET a JSON resource with per-request retries.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get_json(url, query).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt <= self.retries => {
                    warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt,
                        self.retries + 1,
                        err
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| CatalogError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json::<T>().await.map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Returns the search query when one is set and non-empty.
fn active_search(filters: &ProductFilters) -> Option<&str> {
    filters.search.as_deref().filter(|q| !q.is_empty())
}

/// Select the API path for the given filters.
///
/// A search query wins over a category filter, matching the remote API's
/// capabilities (it cannot combine the two).
fn endpoint_path(filters: &ProductFilters) -> String {
    if active_search(filters).is_some() {
        "/products/search".to_string()
    } else if let Some(category) = filters.category.as_deref().filter(|c| !c.is_empty()) {
        format!("/products/category/{}", category)
    } else {
        "/products".to_string()
    }
}

/// Page offsets after the first page: `page_size, 2*page_size, ..` below `total`.
fn remaining_offsets(total: u64, page_size: u64) -> Vec<u64> {
    let mut offsets = Vec::new();
    let mut skip = page_size;
    while skip < total {
        offsets.push(skip);
        skip += page_size;
    }
    offsets
}

/// Apply the client-side filter refinements to an already-fetched list.
///
/// Brand matching is case-insensitive; price and rating bounds are
/// inclusive and read through the zero-substitution rule.
pub fn apply_refinements(products: Vec<Product>, filters: &ProductFilters) -> Vec<Product> {
    if !filters.has_refinements() {
        return products;
    }

    products
        .into_iter()
        .filter(|product| {
            if let Some(ref brand) = filters.brand {
                let matches = product
                    .brand
                    .as_deref()
                    .is_some_and(|b| b.eq_ignore_ascii_case(brand));
                if !matches {
                    return false;
                }
            }
            if let Some(min) = filters.min_price {
                if product.price_or_zero() < min {
                    return false;
                }
            }
            if let Some(max) = filters.max_price {
                if product.price_or_zero() > max {
                    return false;
                }
            }
            if let Some(min) = filters.min_rating {
                if product.rating_or_zero() < min {
                    return false;
                }
            }
            true
        })
        .collect()
}

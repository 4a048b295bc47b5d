//! Catalog API access.

mod client;

pub use client::{apply_refinements, CatalogClient, CatalogError, ClientOptions};

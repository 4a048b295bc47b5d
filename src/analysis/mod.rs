//! Aggregation of product data into summary statistics.

mod insights;

pub use insights::{
    compute_insights, round2, HIGHLIGHT_LIMIT, LOW_STOCK_THRESHOLD, TOP_RATED_MIN_RATING,
};

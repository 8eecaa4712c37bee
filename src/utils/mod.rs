//! Utility functions.
//!
//! - [`url_normalizer`] - URL normalization for reputation cache keys

pub mod url_normalizer;

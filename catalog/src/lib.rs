//! # Catalog
//!
//! Client for the remote food-product catalog.
//!
//! The catalog is read-only: products come back by popularity-ranked feed
//! page, by free-text search, by category tag, or by exact barcode. Every
//! descriptive field on a returned product is optional, so records are
//! normalized once at ingestion before anything else touches them.

pub mod error;
pub mod models;
pub mod remote;
pub mod utils;

pub use error::CatalogError;
pub use models::{Category, Nutriments, Product};
pub use remote::Client;

//! # Food explorer
//!
//! Terminal client for a public food-product catalog: paginated, sortable,
//! filterable listings plus a shopping cart persisted across sessions. The
//! only durable state in the system is the cart snapshot.

pub mod browser;
pub mod cart;
pub mod config;

//! # Cart
//!
//! Owner of the shopping-cart aggregate.
//!
//! - One line per distinct product code, insertion-ordered. Re-adding a code
//!   bumps its quantity in place without moving the line.
//! - Quantity never drops below 1: an update to 0 removes the line.
//! - Every mutation rewrites the whole snapshot file before returning.
//!   Snapshot read happens once, at open; a missing or malformed snapshot
//!   hydrates an empty cart and is never surfaced as an error.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use catalog::Product;

/// One cart line: the product snapshot taken at add time plus a quantity.
/// The snapshot fields are flattened next to `quantity` on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

pub struct CartStore {
    items: Vec<CartItem>,
    path: PathBuf,
}

impl CartStore {
    /// Hydrates from the snapshot at `path`, or starts empty. Never fails.
    pub fn open(path: PathBuf) -> Self {
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!(
                        "cart snapshot at {} is malformed, starting empty: {err}",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self { items, path }
    }

    /// Adds one unit of `product`. An existing line with the same code keeps
    /// its original snapshot and gains quantity. Products without a code all
    /// carry the empty key and therefore merge into a single line.
    pub fn add(&mut self, product: &Product) {
        match self
            .items
            .iter_mut()
            .find(|item| item.product.code == product.code)
        {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
            }),
        }
        self.persist();
    }

    /// Deletes the line keyed by `code`; silently does nothing if absent.
    pub fn remove(&mut self, code: &str) {
        self.items.retain(|item| item.product.code != code);
        self.persist();
    }

    /// Absolute quantity set. Zero removes the line; an unknown code is a
    /// no-op.
    pub fn set_quantity(&mut self, code: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(code);
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.code == code)
        {
            item.quantity = quantity;
        }
        self.persist();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of all line quantities, not the number of lines.
    pub fn total(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.items.iter().any(|item| item.product.code == code)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).ok();
        }
        match serde_json::to_string_pretty(&self.items) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    warn!(
                        "failed to write cart snapshot to {}: {err}",
                        self.path.display()
                    );
                }
            }
            Err(err) => warn!("failed to serialize cart snapshot: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn product(code: &str, name: &str) -> Product {
        Product {
            code: code.to_string(),
            name: Some(name.to_string()),
            ..Product::default()
        }
    }

    fn open_in(dir: &tempfile::TempDir) -> CartStore {
        CartStore::open(dir.path().join("cart.json"))
    }

    #[test]
    fn adds_merge_by_code() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("1", "Apple"));
        cart.add(&product("1", "Apple"));
        cart.add(&product("1", "Apple"));
        cart.add(&product("2", "Bread"));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.items()[1].quantity, 1);
    }

    #[test]
    fn readding_keeps_position_and_original_snapshot() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("1", "Apple"));
        cart.add(&product("2", "Bread"));
        cart.add(&product("1", "Apple Renamed"));

        assert_eq!(cart.items()[0].product.code, "1");
        assert_eq!(cart.items()[0].product.name.as_deref(), Some("Apple"));
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].product.code, "2");
    }

    #[test]
    fn codeless_products_share_one_line() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("", "Mystery A"));
        cart.add(&product("", "Mystery B"));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("1", "Apple"));
        cart.add(&product("1", "Apple"));
        cart.set_quantity("1", 0);

        assert!(cart.items().is_empty());
    }

    #[test]
    fn set_quantity_is_absolute() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("1", "Apple"));
        cart.set_quantity("1", 7);

        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn unknown_code_operations_are_noops() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("1", "Apple"));
        cart.remove("404");
        cart.set_quantity("404", 5);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn total_sums_quantities() {
        let dir = tempdir().unwrap();
        let mut cart = open_in(&dir);

        cart.add(&product("1", "Apple"));
        cart.add(&product("1", "Apple"));
        cart.add(&product("1", "Apple"));
        cart.add(&product("2", "Bread"));
        cart.add(&product("2", "Bread"));

        assert_eq!(cart.total(), 5);
        assert!(cart.contains("1"));
        assert!(!cart.contains("3"));
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let mut cart = CartStore::open(path.clone());
        cart.add(&product("1", "Apple"));
        cart.add(&product("2", "Bread"));
        cart.set_quantity("2", 4);
        let before = cart.items().to_vec();
        drop(cart);

        let rehydrated = CartStore::open(path);
        assert_eq!(rehydrated.items(), before.as_slice());
    }

    #[test]
    fn missing_snapshot_hydrates_empty() {
        let dir = tempdir().unwrap();
        let cart = open_in(&dir);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn malformed_snapshot_hydrates_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "not json {{{").unwrap();

        let cart = CartStore::open(path);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn clear_persists_an_empty_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let mut cart = CartStore::open(path.clone());
        cart.add(&product("1", "Apple"));
        cart.clear();
        drop(cart);

        let rehydrated = CartStore::open(path);
        assert!(rehydrated.items().is_empty());
    }
}

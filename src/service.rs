//! # Inventory Service
//!
//! Coordinates the product repository and the movement repository so that
//! every state-changing product operation appends exactly one audit
//! movement, always in the same order: apply and persist the product
//! mutation, then append the movement. A failed operation (validation,
//! not-found, insufficient stock) leaves both collections untouched and
//! writes no movement.

use crate::error::{DepotError, Result};
use crate::model::{Category, Entity, MovementType, Product, StockMovement};
use crate::paths::DataPaths;
use crate::repo::{MovementRepository, ProductRepository, Repository};
use crate::store::CsvStore;

pub struct Inventory {
    products: ProductRepository,
    movements: MovementRepository,
}

impl Inventory {
    /// Opens (or initializes) both backing files and loads them.
    pub fn open(paths: &DataPaths) -> Result<Self> {
        let products = Repository::open(CsvStore::open(&paths.products)?)?;
        let movements = Repository::open(CsvStore::open(&paths.movements)?)?;
        Ok(Self { products, movements })
    }

    // --- Product mutations, each with its audit movement ---

    /// Creates a product and, if it starts with stock on hand, records a
    /// `Created` movement for the initial quantity. Returns the new id.
    pub fn create_product(
        &mut self,
        name: &str,
        price: f64,
        category: Category,
        quantity: u32,
    ) -> Result<u32> {
        let product = Product::new(name, price, category, quantity)?;
        let id = self.products.add(product)?;
        if quantity > 0 {
            self.record(
                id,
                quantity as i64,
                MovementType::Created,
                "Initial stock on product creation",
            )?;
        }
        Ok(id)
    }

    /// Replaces the product wholesale and records an `Edited` movement.
    /// The movement does not reconcile any quantity delta the edit implied.
    pub fn update_product(&mut self, product: Product) -> Result<()> {
        let id = product.id();
        self.products.update(product)?;
        self.record(id, 0, MovementType::Edited, "Product updated")
    }

    /// Soft-deletes the product and records a `Deactivated` movement.
    pub fn deactivate_product(&mut self, id: u32) -> Result<()> {
        if self.products.get(id).is_none() {
            return Err(DepotError::NotFound(id));
        }
        self.products.delete(id)?;
        self.record(id, 0, MovementType::Deactivated, "Product deactivated")
    }

    /// Permanently removes the product and records a `Deleted` movement
    /// keyed to the id that no longer resolves.
    pub fn delete_product(&mut self, id: u32) -> Result<()> {
        if self.products.get(id).is_none() {
            return Err(DepotError::NotFound(id));
        }
        self.products.purge(id)?;
        self.record(id, 0, MovementType::Deleted, "Product permanently removed")
    }

    pub fn increase_stock(&mut self, id: u32, amount: u32, reason: Option<&str>) -> Result<()> {
        let mut product = self
            .products
            .get(id)
            .cloned()
            .ok_or(DepotError::NotFound(id))?;
        product.increase_stock(amount)?;
        self.products.update(product)?;
        self.record(
            id,
            amount as i64,
            MovementType::Increased,
            reason_or(reason, "Stock increased"),
        )
    }

    /// Fails with `InsufficientStock` before any state changes if the
    /// product holds less than `amount`; on failure no movement is written.
    pub fn decrease_stock(&mut self, id: u32, amount: u32, reason: Option<&str>) -> Result<()> {
        let mut product = self
            .products
            .get(id)
            .cloned()
            .ok_or(DepotError::NotFound(id))?;
        product.decrease_stock(amount)?;
        self.products.update(product)?;
        self.record(
            id,
            -(amount as i64),
            MovementType::Decreased,
            reason_or(reason, "Stock decreased"),
        )
    }

    /// Deletes both backing files and starts over empty.
    pub fn reset_all_data(&mut self) -> Result<()> {
        self.products.clear()?;
        self.movements.clear()
    }

    // --- Read side ---

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn movements(&self) -> &MovementRepository {
        &self.movements
    }

    pub fn product(&self, id: u32) -> Option<&Product> {
        self.products.get(id)
    }

    /// Total units on hand across active products.
    pub fn total_quantity(&self) -> u64 {
        self.products.active().map(|p| p.quantity() as u64).sum()
    }

    pub fn total_inventory_value(&self) -> f64 {
        self.products.total_inventory_value()
    }

    pub fn most_expensive(&self) -> Option<&Product> {
        self.products
            .active()
            .max_by(|a, b| a.price().total_cmp(&b.price()))
    }

    pub fn least_expensive(&self) -> Option<&Product> {
        self.products
            .active()
            .min_by(|a, b| a.price().total_cmp(&b.price()))
    }

    fn record(
        &mut self,
        product_id: u32,
        change: i64,
        movement_type: MovementType,
        reason: &str,
    ) -> Result<()> {
        let movement = StockMovement::new(product_id, change, movement_type, reason)?;
        self.movements.add(movement)?;
        Ok(())
    }
}

fn reason_or<'a>(reason: Option<&'a str>, fallback: &'a str) -> &'a str {
    match reason {
        Some(r) if !r.trim().is_empty() => r,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;
    use tempfile::TempDir;

    fn inventory(dir: &TempDir) -> Inventory {
        Inventory::open(&DataPaths::in_dir(dir.path())).unwrap()
    }

    #[test]
    fn create_assigns_id_and_records_initial_stock() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);

        let id = inv
            .create_product("Widget", 9.99, Category::Electronics, 5)
            .unwrap();
        assert_eq!(id, 1);
        assert!(inv.products().active().any(|p| p.id() == id));

        let trail = inv.movements().by_product(id);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].quantity_change(), 5);
        assert_eq!(trail[0].movement_type(), MovementType::Created);
    }

    #[test]
    fn create_with_zero_stock_records_no_movement() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 0).unwrap();
        assert!(inv.movements().by_product(id).is_empty());
    }

    #[test]
    fn invalid_product_is_rejected_before_any_mutation() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        assert!(inv.create_product("", 1.0, Category::Other, 1).is_err());
        assert!(inv.create_product("X", -1.0, Category::Other, 1).is_err());
        assert_eq!(inv.products().count(), 0);
        assert_eq!(inv.movements().count(), 0);
    }

    #[test]
    fn update_records_a_zero_change_edited_movement() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();

        let mut edited = inv.product(id).cloned().unwrap();
        edited.set_price(12.5).unwrap();
        // An update may silently change quantity; only a generic Edited
        // movement is recorded either way.
        edited.set_quantity(7);
        inv.update_product(edited).unwrap();

        assert_eq!(inv.product(id).unwrap().quantity(), 7);
        let trail = inv.movements().by_product(id);
        assert_eq!(trail.len(), 2);
        let edited_moves = inv.movements().by_movement_type(MovementType::Edited);
        assert_eq!(edited_moves.len(), 1);
        assert_eq!(edited_moves[0].quantity_change(), 0);
    }

    #[test]
    fn update_of_unknown_product_records_nothing() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let mut orphan = Product::new("Ghost", 1.0, Category::Other, 1).unwrap();
        orphan.assign_id(42);
        assert!(matches!(
            inv.update_product(orphan),
            Err(DepotError::NotFound(42))
        ));
        assert_eq!(inv.movements().count(), 0);
    }

    #[test]
    fn increase_stock_updates_quantity_and_trail() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();

        inv.increase_stock(id, 3, Some("restock")).unwrap();
        assert_eq!(inv.product(id).unwrap().quantity(), 8);

        let increases = inv.movements().by_movement_type(MovementType::Increased);
        assert_eq!(increases.len(), 1);
        assert_eq!(increases[0].quantity_change(), 3);
        assert_eq!(increases[0].reason(), "restock");
    }

    #[test]
    fn blank_reason_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();
        inv.increase_stock(id, 1, Some("   ")).unwrap();
        inv.decrease_stock(id, 1, None).unwrap();

        let ups = inv.movements().by_movement_type(MovementType::Increased);
        assert_eq!(ups[0].reason(), "Stock increased");
        let downs = inv.movements().by_movement_type(MovementType::Decreased);
        assert_eq!(downs[0].reason(), "Stock decreased");
    }

    #[test]
    fn decrease_stock_records_negative_change() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();

        inv.decrease_stock(id, 2, Some("sold")).unwrap();
        assert_eq!(inv.product(id).unwrap().quantity(), 3);
        assert_eq!(inv.movements().net_change(id), 3); // +5 created, -2 sold
    }

    #[test]
    fn insufficient_stock_fails_atomically() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Electronics, 5).unwrap();
        let before = inv.movements().count();

        let err = inv.decrease_stock(id, 10, None).unwrap_err();
        assert!(matches!(
            err,
            DepotError::InsufficientStock { available: 5, requested: 10 }
        ));
        assert_eq!(inv.product(id).unwrap().quantity(), 5);
        assert_eq!(inv.movements().count(), before);
    }

    #[test]
    fn zero_amount_adjustments_fail_with_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();
        let before = inv.movements().count();

        assert!(inv.increase_stock(id, 0, None).is_err());
        assert!(inv.decrease_stock(id, 0, None).is_err());
        assert_eq!(inv.product(id).unwrap().quantity(), 5);
        assert_eq!(inv.movements().count(), before);
    }

    #[test]
    fn stock_operations_on_unknown_product_fail_cleanly() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        assert!(matches!(
            inv.increase_stock(7, 1, None),
            Err(DepotError::NotFound(7))
        ));
        assert!(matches!(
            inv.decrease_stock(7, 1, None),
            Err(DepotError::NotFound(7))
        ));
        assert_eq!(inv.movements().count(), 0);
    }

    #[test]
    fn deactivate_hides_from_listings_but_keeps_record() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Electronics, 5).unwrap();

        inv.deactivate_product(id).unwrap();
        assert!(inv.products().active().next().is_none());

        let kept = inv.product(id).unwrap();
        assert!(!kept.is_active());

        let deact = inv.movements().by_movement_type(MovementType::Deactivated);
        assert_eq!(deact.len(), 1);
        assert_eq!(deact[0].product_id(), id);
    }

    #[test]
    fn delete_removes_product_but_keeps_trail_keyed_to_old_id() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        let id = inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();

        inv.delete_product(id).unwrap();
        assert!(inv.product(id).is_none());

        let deleted = inv.movements().by_movement_type(MovementType::Deleted);
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].product_id(), id);
    }

    #[test]
    fn deactivate_or_delete_of_unknown_product_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        assert!(matches!(inv.deactivate_product(5), Err(DepotError::NotFound(5))));
        assert!(matches!(inv.delete_product(5), Err(DepotError::NotFound(5))));
        assert_eq!(inv.movements().count(), 0);
    }

    #[test]
    fn summary_queries_cover_active_products() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        inv.create_product("Cheap", 1.0, Category::Other, 4).unwrap();
        inv.create_product("Dear", 100.0, Category::Other, 2).unwrap();

        assert_eq!(inv.total_quantity(), 6);
        assert_eq!(inv.total_inventory_value(), 204.0);
        assert_eq!(inv.most_expensive().unwrap().name(), "Dear");
        assert_eq!(inv.least_expensive().unwrap().name(), "Cheap");

        inv.deactivate_product(2).unwrap();
        assert_eq!(inv.most_expensive().unwrap().name(), "Cheap");
    }

    #[test]
    fn reset_clears_both_collections() {
        let dir = TempDir::new().unwrap();
        let mut inv = inventory(&dir);
        inv.create_product("Widget", 9.99, Category::Other, 5).unwrap();
        inv.reset_all_data().unwrap();

        assert_eq!(inv.products().count(), 0);
        assert_eq!(inv.movements().count(), 0);

        let reopened = inventory(&dir);
        assert_eq!(reopened.products().count(), 0);
        assert_eq!(reopened.movements().count(), 0);
    }
}

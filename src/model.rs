//! # Domain Model
//!
//! Plain data types for the two stored collections: [`Product`] and
//! [`StockMovement`], plus the closed code sets they reference.
//!
//! Both types keep their fields private and validate on construction and
//! mutation, so an instance that exists is an instance that satisfies its
//! invariants. The load path uses `from_parts`, which trusts fields that
//! were validated when the file was originally written (ids stay
//! non-negative by virtue of being `u32`).

use crate::error::{DepotError, Result};
use chrono::{Local, NaiveDateTime};

/// Shared identity and lifecycle surface of every stored record.
///
/// `is_active == false` means soft-deleted: the entity is kept in storage
/// and in memory but excluded from normal listings.
pub trait Entity {
    fn id(&self) -> u32;
    fn assign_id(&mut self, id: u32);
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn created_at(&self) -> NaiveDateTime;
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Product categories, stored by integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Electronics,
    Clothing,
    Food,
    Furniture,
    Toys,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::Furniture,
        Category::Toys,
        Category::Other,
    ];

    pub fn code(self) -> u8 {
        match self {
            Category::Electronics => 0,
            Category::Clothing => 1,
            Category::Food => 2,
            Category::Furniture => 3,
            Category::Toys => 4,
            Category::Other => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Food => "Food",
            Category::Furniture => "Furniture",
            Category::Toys => "Toys",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// What a stock movement records, stored by integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementType {
    Created,
    Increased,
    Decreased,
    Edited,
    Deactivated,
    Deleted,
}

impl MovementType {
    pub const ALL: [MovementType; 6] = [
        MovementType::Created,
        MovementType::Increased,
        MovementType::Decreased,
        MovementType::Edited,
        MovementType::Deactivated,
        MovementType::Deleted,
    ];

    pub fn code(self) -> u8 {
        match self {
            MovementType::Created => 0,
            MovementType::Increased => 1,
            MovementType::Decreased => 2,
            MovementType::Edited => 3,
            MovementType::Deactivated => 4,
            MovementType::Deleted => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            MovementType::Created => "Created",
            MovementType::Increased => "Increased",
            MovementType::Decreased => "Decreased",
            MovementType::Edited => "Edited",
            MovementType::Deactivated => "Deactivated",
            MovementType::Deleted => "Deleted",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown movement type: {s}"))
    }
}

/// A tracked product. `id` is 0 until the repository assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: u32,
    name: String,
    price: f64,
    category: Category,
    quantity: u32,
    is_active: bool,
    created_at: NaiveDateTime,
}

impl Product {
    pub fn new(name: &str, price: f64, category: Category, quantity: u32) -> Result<Self> {
        validate_name(name)?;
        validate_price(price)?;
        Ok(Self {
            id: 0,
            name: name.trim().to_string(),
            price,
            category,
            quantity,
            is_active: true,
            created_at: now(),
        })
    }

    /// Rebuilds a product from already-persisted fields. Load path only.
    pub fn from_parts(
        id: u32,
        name: String,
        price: f64,
        category: Category,
        quantity: u32,
        is_active: bool,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name,
            price,
            category,
            quantity,
            is_active,
            created_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.quantity < threshold && self.is_active
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.name = name.trim().to_string();
        Ok(())
    }

    pub fn set_price(&mut self, price: f64) -> Result<()> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn increase_stock(&mut self, amount: u32) -> Result<()> {
        validate_amount(amount)?;
        self.quantity = self.quantity.checked_add(amount).ok_or_else(|| {
            DepotError::Validation("quantity would overflow".to_string())
        })?;
        Ok(())
    }

    pub fn decrease_stock(&mut self, amount: u32) -> Result<()> {
        validate_amount(amount)?;
        if amount > self.quantity {
            return Err(DepotError::InsufficientStock {
                available: self.quantity,
                requested: amount,
            });
        }
        self.quantity -= amount;
        Ok(())
    }
}

impl Entity for Product {
    fn id(&self) -> u32 {
        self.id
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// One entry in the append-only audit trail of stock changes.
///
/// `product_id` references a product by id but is not a live foreign key:
/// a movement can outlive the product it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct StockMovement {
    id: u32,
    product_id: u32,
    quantity_change: i64,
    movement_type: MovementType,
    reason: String,
    date: NaiveDateTime,
    is_active: bool,
    created_at: NaiveDateTime,
}

impl StockMovement {
    pub fn new(
        product_id: u32,
        quantity_change: i64,
        movement_type: MovementType,
        reason: &str,
    ) -> Result<Self> {
        if product_id == 0 {
            return Err(DepotError::Validation(
                "product id must be positive".to_string(),
            ));
        }
        let stamp = now();
        Ok(Self {
            id: 0,
            product_id,
            quantity_change,
            movement_type,
            reason: reason.trim().to_string(),
            date: stamp,
            is_active: true,
            created_at: stamp,
        })
    }

    /// Rebuilds a movement from already-persisted fields. Load path only.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: u32,
        product_id: u32,
        quantity_change: i64,
        movement_type: MovementType,
        reason: String,
        date: NaiveDateTime,
        is_active: bool,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity_change,
            movement_type,
            reason,
            date,
            is_active,
            created_at,
        }
    }

    pub fn product_id(&self) -> u32 {
        self.product_id
    }

    pub fn quantity_change(&self) -> i64 {
        self.quantity_change
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDateTime) {
        self.date = date;
    }

    pub fn is_increase(&self) -> bool {
        self.quantity_change > 0
    }

    pub fn is_decrease(&self) -> bool {
        self.quantity_change < 0
    }
}

impl Entity for StockMovement {
    fn id(&self) -> u32 {
        self.id
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DepotError::Validation("name cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DepotError::Validation(
            "price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_amount(amount: u32) -> Result<()> {
    if amount == 0 {
        return Err(DepotError::Validation(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}

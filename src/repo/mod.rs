//! # Repository Layer
//!
//! [`Repository<T>`] owns the in-memory collection for one entity kind,
//! loaded once from its [`CsvStore`] at construction. Every mutation is
//! applied in memory first and then persisted as a full rewrite; a save
//! failure propagates to the caller, but the in-memory state stays the
//! source of truth for the rest of the process lifetime, so the next
//! successful save still carries all accumulated changes.
//!
//! Soft delete (`delete`) flags the entity inactive and keeps it both in
//! memory and on disk; hard delete (`purge`) removes it for good. The next
//! assigned id is always `max(existing ids) + 1`, never derived from the
//! collection length.

use crate::codec::Record;
use crate::error::{DepotError, Result};
use crate::model::Entity;
use crate::store::CsvStore;

mod movements;
mod products;

pub struct Repository<T: Record> {
    items: Vec<T>,
    store: CsvStore<T>,
}

/// Repository over products, with the category, low-stock, search, and
/// aggregate queries.
pub type ProductRepository = Repository<crate::model::Product>;

/// Repository over stock movements, with the product, date-range, and
/// per-type queries.
pub type MovementRepository = Repository<crate::model::StockMovement>;

impl<T: Record> Repository<T> {
    /// Loads the collection from the store. Undecodable lines were already
    /// dropped by the store; whatever loaded is the working set.
    pub fn open(store: CsvStore<T>) -> Result<Self> {
        let items = store.load_all()?;
        Ok(Self { items, store })
    }

    /// Adds the entity, assigning it the next id, and persists. Returns
    /// the assigned id.
    pub fn add(&mut self, mut entity: T) -> Result<u32> {
        let id = self.items.iter().map(Entity::id).max().unwrap_or(0) + 1;
        entity.assign_id(id);
        self.items.push(entity);
        self.persist()?;
        Ok(id)
    }

    /// Replaces the stored entity with the same id and persists.
    pub fn update(&mut self, entity: T) -> Result<()> {
        let id = entity.id();
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(DepotError::NotFound(id))?;
        *slot = entity;
        self.persist()
    }

    /// Soft delete: flags the entity inactive and persists. No-op if the
    /// id is absent.
    pub fn delete(&mut self, id: u32) -> Result<()> {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.set_active(false);
                self.persist()
            }
            None => Ok(()),
        }
    }

    /// Hard delete: removes the entity from the collection and persists.
    /// Unrecoverable. No-op if the id is absent.
    pub fn purge(&mut self, id: u32) -> Result<()> {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return Ok(());
        }
        self.persist()
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Active entities only, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.is_active())
    }

    /// Count of active entities.
    pub fn count(&self) -> usize {
        self.active().count()
    }

    /// Every entity regardless of active flag. For the specialized query
    /// impls and the reset path.
    pub(crate) fn all(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.store.reset()
    }

    fn persist(&self) -> Result<()> {
        self.store.save_all(&self.items)
    }
}

//! # depot
//!
//! A single-user inventory tracker that persists products and an
//! append-only stock-movement audit trail to flat comma-delimited files.
//!
//! The layers, leaf first:
//!
//! - [`codec`]: one entity to/from one delimited line
//! - [`store`]: one collection to/from one file, full rewrite per save
//! - [`repo`]: in-memory collections with identity assignment and
//!   soft-delete semantics, persisted on every mutation
//! - [`service`]: the [`service::Inventory`] facade, which pairs every
//!   product mutation with exactly one audit movement
//!
//! Single-process, single-threaded, no locking: one process owns the
//! backing files for its lifetime.

pub mod codec;
pub mod error;
pub mod model;
pub mod paths;
pub mod repo;
pub mod service;
pub mod store;

pub use error::{DepotError, Result};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepotError {
    /// An entity field violates its invariant. Raised before any state
    /// changes; a failed validation never leaves a partial mutation behind.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no entity with id {0}")]
    NotFound(u32),

    #[error("insufficient stock: {available} on hand, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DepotError>;

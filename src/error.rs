//! Error types for store_inventory

use thiserror::Error;

/// Unified error type for inventory operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed numeric or date text (seed file or operator input)
    #[error("Format error: {0}")]
    Format(String),
    /// A product with this name already exists
    #[error("Duplicate product name: {0}")]
    Duplicate(String),
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// CSV read or write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for inventory operations
pub type Result<T> = std::result::Result<T, Error>;

//! Store Inventory Manager
//!
//! Loads product records from a delimited seed file into a SQLite store,
//! reconciling each row against existing records by product name with a
//! last-write-wins timestamp policy, and drives an interactive console
//! for viewing, adding and backing up products.

pub mod backup;
pub mod error;
pub mod loader;
pub mod menu;
pub mod normalize;
pub mod reconcile;
pub mod store;

pub use error::{Error, Result};
pub use store::Product;

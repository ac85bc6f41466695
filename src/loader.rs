//! Bulk CSV loader.
//!
//! Reads a seed inventory CSV and reconciles every row into the store in
//! file order. The first malformed row aborts the load; rows reconciled
//! before it stay committed.

use crate::error::Result;
use crate::normalize::{parse_price_field, parse_quantity, parse_timestamp_field};
use crate::reconcile::{self, Incoming, Outcome};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;

/// One raw row of the seed file, fields as text.
#[derive(Debug, Deserialize)]
struct SeedRow {
    product_name: String,
    product_quantity: String,
    product_price: String,
    date_updated: String,
}

/// Statistics from a bulk load
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows that created a new product
    pub inserted: usize,
    /// Rows that overwrote an existing product (same age or newer)
    pub updated: usize,
    /// Rows discarded because the stored record was strictly newer
    pub skipped: usize,
}

/// Loads a seed CSV and reconciles each row into the store.
pub fn load_file<P: AsRef<Path>>(conn: &Connection, path: P) -> Result<LoadStats> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let mut stats = LoadStats::default();
    for result in reader.deserialize() {
        let row: SeedRow = result?;
        let incoming = Incoming {
            quantity: parse_quantity(&row.product_quantity)?,
            price_cents: parse_price_field(&row.product_price)?,
            updated_at: parse_timestamp_field(&row.date_updated)?,
            name: row.product_name,
        };
        match reconcile::reconcile(conn, &incoming)? {
            Outcome::Inserted => stats.inserted += 1,
            Outcome::Updated => stats.updated += 1,
            Outcome::Skipped => stats.skipped += 1,
        }
    }

    log::info!(
        "Loaded {}: {} inserted, {} updated, {} skipped",
        path.as_ref().display(),
        stats.inserted,
        stats.updated,
        stats.skipped
    );
    Ok(stats)
}

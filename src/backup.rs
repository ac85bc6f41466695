//! CSV backup export.
//!
//! Snapshots every product to a delimited file with a fixed column
//! order. The destination is rewritten in full on every call; prices are
//! written as raw integer cents, never dollar-formatted.

use crate::error::Result;
use crate::store;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// One backup row; column order matches the seed file header.
#[derive(Debug, Serialize)]
struct BackupRow<'a> {
    product_name: &'a str,
    product_quantity: i64,
    product_price: i64,
    date_updated: String,
}

/// Writes the full store snapshot to `path`, returning the row count.
///
/// The header row is written even when the store is empty.
pub fn write_backup<P: AsRef<Path>>(conn: &Connection, path: P) -> Result<usize> {
    let products = store::list_all(conn)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    writer.write_record([
        "product_name",
        "product_quantity",
        "product_price",
        "date_updated",
    ])?;

    for product in &products {
        writer.serialize(BackupRow {
            product_name: &product.name,
            product_quantity: product.quantity,
            product_price: product.price_cents,
            date_updated: product.updated_at.to_string(),
        })?;
    }
    writer.flush()?;

    log::info!(
        "Backed up {} products to {}",
        products.len(),
        path.as_ref().display()
    );
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use crate::store::{test_db, ts};

    #[test]
    fn backup_writes_header_and_rows_in_order() {
        let conn = test_db();
        store::create(&conn, "Widget", 5, 125, ts("2026-01-15 00:00:00")).unwrap();
        store::create(&conn, "Gadget", 3, 1235, ts("2026-02-01 08:30:00")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bu_inventory.csv");
        let written = write_backup(&conn, &path).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "product_name,product_quantity,product_price,date_updated",
                "Widget,5,125,2026-01-15 00:00:00",
                "Gadget,3,1235,2026-02-01 08:30:00",
            ]
        );
    }

    #[test]
    fn backup_of_empty_store_is_header_only() {
        let conn = test_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bu_inventory.csv");

        write_backup(&conn, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim_end(),
            "product_name,product_quantity,product_price,date_updated"
        );
    }

    #[test]
    fn backup_overwrites_previous_file() {
        let conn = test_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bu_inventory.csv");

        store::create(&conn, "Widget", 5, 125, ts("2026-01-15 00:00:00")).unwrap();
        write_backup(&conn, &path).unwrap();
        store::create(&conn, "Gadget", 3, 999, ts("2026-01-16 00:00:00")).unwrap();
        write_backup(&conn, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        // Full rewrite: one header, then exactly the current snapshot
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.matches("product_name").count(), 1);
    }

    #[test]
    fn backup_reimports_to_identical_state() {
        let conn = test_db();
        store::create(&conn, "Widget", 5, 125, ts("2026-01-15 00:00:00")).unwrap();
        store::create(&conn, "Gadget", 3, 1235, ts("2026-02-01 08:30:00")).unwrap();
        let before = store::list_all(&conn).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bu_inventory.csv");
        write_backup(&conn, &path).unwrap();

        // Re-import into a fresh store: names, quantities, cents and
        // timestamps must all survive exactly.
        let fresh = test_db();
        let stats = loader::load_file(&fresh, &path).unwrap();
        assert_eq!(stats.inserted, 2);
        assert_eq!(store::list_all(&fresh).unwrap(), before);

        // Re-import into the same store: every row ties and re-applies
        // the same values, leaving the state unchanged.
        let stats = loader::load_file(&conn, &path).unwrap();
        assert_eq!(stats.updated, 2);
        assert_eq!(store::list_all(&conn).unwrap(), before);
    }
}

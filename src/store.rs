//! SQLite record store for products.
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Every create/update is a single autocommitted statement, so each
//! successful call is durable on return. Products are never deleted.

use crate::error::{Error, Result};
use crate::normalize::STORED_TIMESTAMP_PATTERN;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

/// A product record. `name` is the business key used for reconciliation;
/// `id` is the surrogate key assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub updated_at: NaiveDateTime,
}

/// Creates the `products` table if it does not already exist.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            quantity    INTEGER NOT NULL DEFAULT 0,
            price       INTEGER NOT NULL DEFAULT 0,
            updated_at  TEXT NOT NULL
        );",
    )?;
    log::info!("Database schema initialized");
    Ok(())
}

/// Inserts a new product and returns it with its assigned id.
///
/// A UNIQUE violation on `name` is reported as [`Error::Duplicate`] so
/// callers can branch into the merge path instead of failing.
pub fn create(
    conn: &Connection,
    name: &str,
    quantity: i64,
    price_cents: i64,
    updated_at: NaiveDateTime,
) -> Result<Product> {
    let stamp = updated_at.format(STORED_TIMESTAMP_PATTERN).to_string();
    let result = conn.execute(
        "INSERT INTO products (name, quantity, price, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![name, quantity, price_cents, &stamp],
    );
    match result {
        Ok(_) => Ok(Product {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            quantity,
            price_cents,
            updated_at,
        }),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(Error::Duplicate(name.to_string()))
        }
        Err(e) => Err(Error::Database(e)),
    }
}

/// Looks up a product by its business key.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, price, updated_at FROM products WHERE name = ?1",
    )?;
    let mut rows = stmt.query(params![name])?;
    match rows.next()? {
        Some(row) => Ok(Some(read_product(row)?)),
        None => Ok(None),
    }
}

/// Looks up a product by its surrogate key.
pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, price, updated_at FROM products WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(read_product(row)?)),
        None => Ok(None),
    }
}

/// Persists in-place mutation of an existing product, keyed by id.
pub fn update(conn: &Connection, product: &Product) -> Result<()> {
    let stamp = product.updated_at.format(STORED_TIMESTAMP_PATTERN).to_string();
    conn.execute(
        "UPDATE products SET name = ?1, quantity = ?2, price = ?3, updated_at = ?4
         WHERE id = ?5",
        params![
            &product.name,
            product.quantity,
            product.price_cents,
            &stamp,
            product.id
        ],
    )?;
    Ok(())
}

/// All product ids, ascending. Used to bound interactive id queries.
pub fn list_ids_ordered(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM products ORDER BY id ASC")?;
    let ids: rusqlite::Result<Vec<i64>> = stmt.query_map([], |row| row.get(0))?.collect();
    Ok(ids?)
}

/// Full snapshot in creation (id) order. Used for export.
pub fn list_all(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, price, updated_at FROM products ORDER BY id ASC",
    )?;
    let products: rusqlite::Result<Vec<Product>> =
        stmt.query_map([], |row| read_product(row))?.collect();
    Ok(products?)
}

/// Total number of products in the store.
pub fn count(conn: &Connection) -> Result<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(n)
}

fn read_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let stamp: String = row.get(4)?;
    let updated_at = NaiveDateTime::parse_from_str(&stamp, STORED_TIMESTAMP_PATTERN)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        price_cents: row.get(3)?,
        updated_at,
    })
}

#[cfg(test)]
pub use tests::{test_db, ts};

#[cfg(test)]
mod tests {
    use super::*;

    /// Create an in-memory database for testing
    pub fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    pub fn ts(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, STORED_TIMESTAMP_PATTERN).unwrap()
    }

    #[test]
    fn init_schema_creates_table() {
        let conn = test_db();
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='products'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let conn = test_db();
        let a = create(&conn, "Widget", 5, 125, ts("2026-01-01 00:00:00")).unwrap();
        let b = create(&conn, "Gadget", 3, 999, ts("2026-01-02 00:00:00")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(count(&conn).unwrap(), 2);
    }

    #[test]
    fn create_duplicate_name_is_reported() {
        let conn = test_db();
        create(&conn, "Widget", 5, 125, ts("2026-01-01 00:00:00")).unwrap();
        let err = create(&conn, "Widget", 9, 200, ts("2026-01-02 00:00:00")).unwrap_err();
        assert!(matches!(err, Error::Duplicate(name) if name == "Widget"));
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn get_by_name_round_trips_all_fields() {
        let conn = test_db();
        let created = create(&conn, "Widget", 5, 125, ts("2026-01-15 08:30:00")).unwrap();
        let fetched = get_by_name(&conn, "Widget").unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(get_by_name(&conn, "Missing").unwrap().is_none());
    }

    #[test]
    fn get_by_name_is_case_sensitive() {
        let conn = test_db();
        create(&conn, "Widget", 5, 125, ts("2026-01-01 00:00:00")).unwrap();
        assert!(get_by_name(&conn, "widget").unwrap().is_none());
    }

    #[test]
    fn get_by_id_finds_record() {
        let conn = test_db();
        create(&conn, "Widget", 5, 125, ts("2026-01-01 00:00:00")).unwrap();
        let fetched = get_by_id(&conn, 1).unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");
        assert!(get_by_id(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn update_persists_mutation() {
        let conn = test_db();
        let mut product = create(&conn, "Widget", 5, 125, ts("2026-01-01 00:00:00")).unwrap();
        product.quantity = 9;
        product.price_cents = 200;
        product.updated_at = ts("2026-02-01 12:00:00");
        update(&conn, &product).unwrap();

        let fetched = get_by_id(&conn, product.id).unwrap().unwrap();
        assert_eq!(fetched, product);
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn list_ids_ordered_ascending() {
        let conn = test_db();
        create(&conn, "A", 1, 1, ts("2026-01-01 00:00:00")).unwrap();
        create(&conn, "B", 1, 1, ts("2026-01-01 00:00:00")).unwrap();
        create(&conn, "C", 1, 1, ts("2026-01-01 00:00:00")).unwrap();
        assert_eq!(list_ids_ordered(&conn).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn list_all_in_creation_order() {
        let conn = test_db();
        create(&conn, "B", 1, 1, ts("2026-01-01 00:00:00")).unwrap();
        create(&conn, "A", 2, 2, ts("2026-01-02 00:00:00")).unwrap();
        let names: Vec<String> = list_all(&conn).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}

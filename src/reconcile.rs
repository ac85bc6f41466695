//! Merge policy for incoming product rows.
//!
//! Bulk rows carry their own freshness signal, so an existing record is
//! only overwritten when the incoming `updated_at` is the same age or
//! newer (ties favor the incoming row). Interactive edits skip the
//! comparison entirely: once the operator confirms, the entered values
//! win and are stamped with the edit's own current time.

use crate::error::Result;
use crate::store::{self, Product};
use chrono::NaiveDateTime;
use rusqlite::Connection;

/// An incoming product tuple, already normalized.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub updated_at: NaiveDateTime,
}

/// What the reconciler did with an incoming row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No record with this name existed; a new one was created.
    Inserted,
    /// The existing record was overwritten (incoming was same age or newer).
    Updated,
    /// The existing record was strictly newer; the row was discarded.
    Skipped,
}

/// Insert-or-merge for the bulk path.
///
/// The existence check is explicit: look up the name, then branch.
pub fn reconcile(conn: &Connection, incoming: &Incoming) -> Result<Outcome> {
    match store::get_by_name(conn, &incoming.name)? {
        None => {
            store::create(
                conn,
                &incoming.name,
                incoming.quantity,
                incoming.price_cents,
                incoming.updated_at,
            )?;
            Ok(Outcome::Inserted)
        }
        Some(mut existing) => {
            if existing.updated_at <= incoming.updated_at {
                existing.quantity = incoming.quantity;
                existing.price_cents = incoming.price_cents;
                existing.updated_at = incoming.updated_at;
                store::update(conn, &existing)?;
                Ok(Outcome::Updated)
            } else {
                log::debug!(
                    "Discarding stale row for '{}' ({} < {})",
                    incoming.name,
                    incoming.updated_at,
                    existing.updated_at
                );
                Ok(Outcome::Skipped)
            }
        }
    }
}

/// Unconditional overwrite for the interactive path.
///
/// No timestamp comparison: operator entry is authoritative once
/// confirmed, and is stamped with the current time passed in `now`.
pub fn overwrite(
    conn: &Connection,
    existing: &Product,
    quantity: i64,
    price_cents: i64,
    now: NaiveDateTime,
) -> Result<()> {
    let mut updated = existing.clone();
    updated.quantity = quantity;
    updated.price_cents = price_cents;
    updated.updated_at = now;
    store::update(conn, &updated)
}

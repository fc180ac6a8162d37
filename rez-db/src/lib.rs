//! SQLite-backed persistent state for the zone explorer.
//!
//! Values that outlive a session (the onboarding tour step, pending raw
//! exports) are kept here. The key-value part is exposed as a
//! [`KeyValueStore`] so the explorer core does not care where values live.
//!
//! # Usage
//!
//! ```rust
//! use rez_db::{Database, KeyValueStore};
//!
//! let db = Database::new().unwrap();
//! db.set_item("site-tour", "2").unwrap();
//! assert_eq!(db.get_item("site-tour").unwrap().as_deref(), Some("2"));
//! ```

pub mod downloads;
pub mod kv;
pub mod schema;
pub mod tour;

pub use kv::{KeyValueStore, MemoryStore};
pub use tour::TourProgress;

use rez_core::RezError;
use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding the explorer's local state.
///
/// Cheaply cloneable (via `Rc`); clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

pub(crate) fn storage_err(e: rusqlite::Error) -> RezError {
    RezError::Storage(e.to_string())
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    pub fn new() -> rez_core::Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::with_connection(conn)
    }

    /// Open (or create) an on-disk database at `path`.
    pub fn open(path: impl AsRef<Path>) -> rez_core::Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(storage_err)?;
        log::info!("Opened state database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> rez_core::Result<Self> {
        conn.execute_batch(schema::create_schema())
            .map_err(storage_err)?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_creates_successfully() {
        assert!(Database::new().is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        db.set_item("site-tour", "3").unwrap();
        assert_eq!(
            db2.get_item("site-tour").unwrap().as_deref(),
            Some("3"),
            "Clone should see same data via shared Rc"
        );
    }
}

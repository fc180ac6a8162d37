use rusqlite::{params, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::{storage_err, Database};

/// Persistent string key-value capability, in the manner of browser local
/// storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> rez_core::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> rez_core::Result<()>;
}

impl KeyValueStore for Database {
    fn get_item(&self, key: &str) -> rez_core::Result<Option<String>> {
        let conn = self.conn.borrow();
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        })
        .optional()
        .map_err(storage_err)
    }

    fn set_item(&self, key: &str, value: &str) -> rez_core::Result<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(storage_err)?;
        Ok(())
    }
}

/// Non-persistent store for tests and one-shot commands.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> rez_core::Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> rez_core::Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get_item("missing").unwrap(), None);
        store.set_item("site-tour", "1").unwrap();
        store.set_item("site-tour", "2").unwrap();
        assert_eq!(store.get_item("site-tour").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn sqlite_store_overwrites() {
        exercise(&Database::new().unwrap());
    }

    #[test]
    fn memory_store_overwrites() {
        exercise(&MemoryStore::default());
    }
}

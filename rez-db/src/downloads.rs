//! Raw-data exports that were requested and are still being processed.

use rusqlite::params;

use crate::{storage_err, Database};

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRecord {
    /// Export id returned by the backend.
    pub id: String,
    pub area_id: String,
    /// `lcoe` or `score`
    pub operation: String,
    /// RFC 3339 timestamp
    pub started_at: String,
}

impl Database {
    pub fn record_download(&self, record: &DownloadRecord) -> rez_core::Result<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT OR REPLACE INTO downloads (id, area_id, operation, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![record.id, record.area_id, record.operation, record.started_at],
        )
        .map_err(storage_err)?;
        log::info!("Recorded {} export {} for {}", record.operation, record.id, record.area_id);
        Ok(())
    }

    /// Pending downloads, oldest first.
    pub fn pending_downloads(&self) -> rez_core::Result<Vec<DownloadRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn
            .prepare(
                "SELECT id, area_id, operation, started_at FROM downloads
                 ORDER BY started_at, id",
            )
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DownloadRecord {
                    id: row.get(0)?,
                    area_id: row.get(1)?,
                    operation: row.get(2)?,
                    started_at: row.get(3)?,
                })
            })
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;
        Ok(rows)
    }

    /// Forget a download once it has been collected. Returns whether it
    /// was pending.
    pub fn remove_download(&self, id: &str) -> rez_core::Result<bool> {
        let conn = self.conn.borrow();
        let removed = conn
            .execute("DELETE FROM downloads WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(removed > 0)
    }
}

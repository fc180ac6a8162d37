//! SQL schema for the explorer's persisted local state.

/// Returns the full SQL schema as a single batch string.
///
/// - `kv` - string key-value pairs (onboarding tour step and the like)
/// - `downloads` - raw-data exports requested from the backend and not yet
///   collected
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS downloads (
        id TEXT PRIMARY KEY,
        area_id TEXT NOT NULL,
        operation TEXT NOT NULL,
        started_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_downloads_area ON downloads(area_id);
    "#
}

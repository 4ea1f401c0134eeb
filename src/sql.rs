//! SQL query constants with database-specific placeholders.
//!
//! SQLite uses `?` placeholders, PostgreSQL uses `$1, $2, ...` numbered
//! placeholders. The queries themselves are identical across backends.

#[cfg(feature = "sqlite")]
pub const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

#[cfg(feature = "postgres")]
pub const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES ($1, $2, $3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

#[cfg(feature = "sqlite")]
pub const SELECT_SETTING: &str = "SELECT value, updated_at FROM settings WHERE key = ?";

#[cfg(feature = "postgres")]
pub const SELECT_SETTING: &str = "SELECT value, updated_at FROM settings WHERE key = $1";

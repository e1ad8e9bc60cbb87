//! Schema migrations for the tracker database.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps shipped with this binary.
//! - Bring an opened database up to the latest schema in one transaction.
//!
//! # Invariants
//! - Step versions are strictly increasing, starting at 1.
//! - The applied version is recorded in `PRAGMA user_version`.
//! - A database written by a newer binary is never downgraded or touched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Returns the newest schema version this binary can produce.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Upgrades `conn` to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the stored version is newer.
/// - `Sqlite` when any step fails; no step is kept in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = stored_version(conn)?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }
    if stored == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > stored) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={stored} to_version={latest}");
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

//! Ordered schema scripts for the note store.
//!
//! `0001_notes.sql` creates the note table with its task columns;
//! `0002_note_tags.sql` adds the cascading tag rows. The applied step is
//! stamped into `PRAGMA user_version` after each script.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

type Step = (u32, &'static str);

const STEPS: &[Step] = &[
    (1, include_str!("0001_notes.sql")),
    (2, include_str!("0002_note_tags.sql")),
];

/// Highest schema version this build can write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Version stamped into the database, `0` for a fresh file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the store up to [`latest_version`] in a single transaction.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file is ahead of this build.
/// - `DbError::MigrationFailed` naming the script that broke; earlier
///   scripts from the same run are rolled back with it.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &(version, sql) in pending {
        tx.execute_batch(sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::MigrationFailed { version, source })?;
        debug!("event=db_migrate module=db status=step version={version}");
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={supported}");
    Ok(())
}

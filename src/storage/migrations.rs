//! Schema versioning for the tracker database
//!
//! Every step in `MIGRATIONS` runs once, in order, on databases whose recorded
//! version is lower than the step's. A database written by a newer build is
//! refused rather than opened.

use rusqlite::Connection;

use crate::storage::StorageError;

type Migration = fn(&Connection) -> Result<(), StorageError>;

/// Ordered schema steps; the last version is the one this build writes
const MIGRATIONS: &[(i32, Migration)] = &[(1, migration_v1)];

fn latest_version() -> i32 {
    MIGRATIONS.last().map(|(version, _)| *version).unwrap_or(0)
}

/// Bring the schema up to date, creating it on an empty database
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let stored = get_current_version(conn)?;
    let latest = latest_version();

    if stored > latest {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            stored, latest
        )));
    }

    for (version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > stored) {
        migrate(conn)?;
        set_version(conn, *version)?;
    }

    Ok(())
}

/// Recorded schema version, 0 for a fresh database
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get::<_, i32>(0),
    )?;

    Ok(version)
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: habits, tasks and the per-day quote table
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            frequency TEXT NOT NULL,
            custom_interval INTEGER NOT NULL DEFAULT 0,
            category TEXT NOT NULL DEFAULT '',
            streak INTEGER NOT NULL DEFAULT 0,
            best_streak INTEGER NOT NULL DEFAULT 0,
            last_completed TEXT,
            created_on TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            color TEXT NOT NULL DEFAULT '#FF6347',
            icon TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT '',
            due_date TEXT,
            due_time TEXT,
            priority INTEGER NOT NULL,
            is_completed BOOLEAN NOT NULL DEFAULT FALSE,
            completed_on TEXT,
            created_on TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            estimated_minutes INTEGER NOT NULL DEFAULT 0,
            actual_minutes INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS daily_quotes (
            date TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            author TEXT NOT NULL,
            fetched_at TEXT NOT NULL,
            origin TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_habits_active ON habits (is_active);
         CREATE INDEX IF NOT EXISTS idx_habits_category ON habits (category);
         CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks (is_completed);
         CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks (due_date);",
    )?;

    tracing::info!("Schema v1 applied: habits, tasks, daily_quotes");
    Ok(())
}

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};

use crate::state::DbPool;

pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    name: "001_stored_sessions",
    sql: include_str!("../../migrations/001_stored_sessions.sql"),
}];

/// Open the remembered-session database, creating its directory when missing.
pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch("PRAGMA busy_timeout = 5000; PRAGMA synchronous = NORMAL;")
    });
    let pool = Pool::builder().max_size(4).build(manager)?;
    pool.get()?.execute_batch("PRAGMA journal_mode = WAL;")?;

    Ok(pool)
}

fn is_applied(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM schema_version WHERE name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}

/// Apply pending migrations in order, each in its own transaction.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if is_applied(&conn, migration.name)? {
            continue;
        }
        tracing::info!(migration = migration.name, "applying migration");
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_version (name) VALUES (?1)",
            params![migration.name],
        )?;
        tx.commit()?;
        applied += 1;
    }

    tracing::debug!(applied, "database schema up to date");
    Ok(())
}

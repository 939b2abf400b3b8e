//! The two storage areas a browser context's sign-in can live in.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rusqlite::{params, OptionalExtension};

use crate::error::{AppError, AppResult};
use crate::state::DbPool;

/// A key/value area holding serialized sessions, keyed by browser context token.
pub trait SessionStorage: Send + Sync {
    fn read(&self, context_id: &str) -> AppResult<Option<String>>;
    fn write(&self, context_id: &str, payload: &str) -> AppResult<()>;
    fn clear(&self, context_id: &str) -> AppResult<()>;
}

/// Persistent area. Survives process restarts.
pub struct SqliteStorage {
    pool: DbPool,
}

impl SqliteStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Drop entries last written more than `max_age_days` ago. Their cookies have expired.
    pub fn prune(&self, max_age_days: u64) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute(
            "DELETE FROM stored_sessions WHERE updated_at < datetime('now', ?1)",
            params![format!("-{} days", max_age_days)],
        )?;
        Ok(removed)
    }
}

impl SessionStorage for SqliteStorage {
    fn read(&self, context_id: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;
        let payload = conn
            .query_row(
                "SELECT payload FROM stored_sessions WHERE context_id = ?1",
                params![context_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&self, context_id: &str, payload: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO stored_sessions (context_id, payload) VALUES (?1, ?2)
             ON CONFLICT(context_id) DO UPDATE SET payload = excluded.payload,
                 updated_at = datetime('now')",
            params![context_id, payload],
        )?;
        Ok(())
    }

    fn clear(&self, context_id: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM stored_sessions WHERE context_id = ?1",
            params![context_id],
        )?;
        Ok(())
    }
}

/// Volatile area. Lives only as long as the process.
///
/// Entries unused for longer than the idle limit are dropped: the browser holding the
/// session cookie has most likely been closed.
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Entry>>,
    idle_limit: Duration,
}

struct Entry {
    payload: String,
    last_used: Instant,
}

const DEFAULT_IDLE_LIMIT: Duration = Duration::from_secs(12 * 3600);

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::with_idle_limit(DEFAULT_IDLE_LIMIT)
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_limit(idle_limit: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            idle_limit,
        }
    }

    /// Drop entries last used before `now - idle_limit`.
    pub fn evict_idle(&self, now: Instant) -> AppResult<usize> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|_, entry| {
            now.saturating_duration_since(entry.last_used) <= self.idle_limit
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle volatile sessions");
        }
        Ok(evicted)
    }

    pub fn entry_count(&self) -> AppResult<usize> {
        Ok(self.entries()?.len())
    }

    fn entries(&self) -> AppResult<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries.lock().map_err(|_| AppError::Poisoned)
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, context_id: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries()?;
        let Some(entry) = entries.get_mut(context_id) else {
            return Ok(None);
        };
        if now.saturating_duration_since(entry.last_used) > self.idle_limit {
            entries.remove(context_id);
            return Ok(None);
        }
        entry.last_used = now;
        Ok(Some(entry.payload.clone()))
    }

    fn write(&self, context_id: &str, payload: &str) -> AppResult<()> {
        let now = Instant::now();
        self.evict_idle(now)?;
        let entry = Entry {
            payload: payload.to_string(),
            last_used: now,
        };
        self.entries()?.insert(context_id.to_string(), entry);
        Ok(())
    }

    fn clear(&self, context_id: &str) -> AppResult<()> {
        self.entries()?.remove(context_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn sqlite() -> (tempfile::TempDir, SqliteStorage) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = db::create_pool(&tmp.path().join("test.db")).unwrap();
        db::run_migrations(&pool).unwrap();
        (tmp, SqliteStorage::new(pool))
    }

    fn exercise(storage: &dyn SessionStorage) {
        assert_eq!(storage.read("ctx").unwrap(), None);

        storage.write("ctx", "first").unwrap();
        assert_eq!(storage.read("ctx").unwrap().as_deref(), Some("first"));

        storage.write("ctx", "second").unwrap();
        assert_eq!(storage.read("ctx").unwrap().as_deref(), Some("second"));
        assert_eq!(storage.read("other").unwrap(), None);

        storage.clear("ctx").unwrap();
        assert_eq!(storage.read("ctx").unwrap(), None);

        // Clearing an absent key is a no-op.
        storage.clear("ctx").unwrap();
    }

    #[test]
    fn memory_storage_read_write_clear() {
        exercise(&MemoryStorage::new());
    }

    #[test]
    fn memory_storage_drops_abandoned_entries() {
        let storage = MemoryStorage::with_idle_limit(Duration::from_secs(60));
        for i in 0..100 {
            storage.write(&format!("ctx-{i}"), "payload").unwrap();
        }
        assert_eq!(storage.entry_count().unwrap(), 100);

        assert_eq!(storage.evict_idle(Instant::now()).unwrap(), 0);
        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(storage.evict_idle(later).unwrap(), 100);
        assert_eq!(storage.entry_count().unwrap(), 0);
    }

    #[test]
    fn memory_storage_forgets_idle_entry_on_read() {
        let storage = MemoryStorage::with_idle_limit(Duration::ZERO);
        storage.write("ctx", "payload").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(storage.read("ctx").unwrap(), None);
        assert_eq!(storage.entry_count().unwrap(), 0);
    }

    #[test]
    fn memory_storage_write_sweeps_stale_entries() {
        let storage = MemoryStorage::with_idle_limit(Duration::ZERO);
        storage.write("abandoned", "payload").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        storage.write("fresh", "payload").unwrap();
        assert_eq!(storage.entry_count().unwrap(), 1);
    }

    #[test]
    fn sqlite_storage_read_write_clear() {
        let (_tmp, storage) = sqlite();
        exercise(&storage);
    }

    #[test]
    fn prune_drops_only_expired_entries() {
        let (_tmp, storage) = sqlite();
        storage.write("old", "a").unwrap();
        storage.write("fresh", "b").unwrap();
        storage
            .pool
            .get()
            .unwrap()
            .execute(
                "UPDATE stored_sessions SET updated_at = datetime('now', '-31 days') WHERE context_id = 'old'",
                [],
            )
            .unwrap();

        assert_eq!(storage.prune(30).unwrap(), 1);
        assert_eq!(storage.read("old").unwrap(), None);
        assert_eq!(storage.read("fresh").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn sqlite_storage_survives_new_pool() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.db");
        {
            let pool = db::create_pool(&path).unwrap();
            db::run_migrations(&pool).unwrap();
            SqliteStorage::new(pool).write("ctx", "kept").unwrap();
        }
        let pool = db::create_pool(&path).unwrap();
        db::run_migrations(&pool).unwrap();
        assert_eq!(
            SqliteStorage::new(pool).read("ctx").unwrap().as_deref(),
            Some("kept")
        );
    }
}

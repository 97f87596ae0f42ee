//! Persistent Cache Tier
//!
//! SQLite-backed cache that survives process restarts. Storage faults are
//! absorbed: a failed open leaves the cache in a no-op state and a failed
//! operation behaves like a miss.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::cache::{Backend, Cache, CacheCounters, CacheStats};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cache (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        ts    REAL NOT NULL
    )
"#;

const CREATE_TS_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_cache_ts ON cache(ts)";

/// Connections kept open against the cache file
const MAX_CONNECTIONS: u32 = 4;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// == Persistent Cache ==
/// Durable key-value cache with TTL expiry and insertion-order eviction.
///
/// Eviction removes the rows with the oldest `ts`; reads do not refresh `ts`,
/// so this tier is insertion-ordered rather than true LRU.
#[derive(Debug)]
pub struct PersistentCache {
    /// `None` when the database could not be opened
    pool: Option<SqlitePool>,
    db_path: String,
    ttl_seconds: f64,
    max_size: usize,
    counters: CacheCounters,
}

impl PersistentCache {
    // == Open ==
    /// Opens (or creates) the cache database at `db_path`.
    ///
    /// Never fails: if the file cannot be opened or the schema cannot be
    /// created, a warning is logged and the cache degrades to a no-op.
    pub async fn open(db_path: impl Into<String>, ttl_seconds: f64, max_size: usize) -> Self {
        let db_path = db_path.into();

        let pool = match connect(&db_path).await {
            Ok(pool) => {
                info!(path = %db_path, "SQLite cache opened");
                Some(pool)
            }
            Err(err) => {
                warn!(path = %db_path, error = %err, "Failed to open SQLite cache, caching disabled");
                None
            }
        };

        Self {
            pool,
            db_path,
            ttl_seconds: ttl_seconds.max(0.0),
            max_size,
            counters: CacheCounters::new(),
        }
    }

    /// Whether the backing database is usable.
    pub fn is_available(&self) -> bool {
        self.pool.is_some()
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    // == Get ==
    pub(crate) async fn get_at(&self, key: &str, now: f64) -> Option<Value> {
        let Some(pool) = &self.pool else {
            self.counters.record_miss();
            return None;
        };

        let row: Option<(String, f64)> =
            match sqlx::query_as("SELECT value, ts FROM cache WHERE key = ?")
                .bind(key)
                .fetch_optional(pool)
                .await
            {
                Ok(row) => row,
                Err(err) => {
                    debug!(key, error = %err, "SQLite cache read failed");
                    self.counters.record_miss();
                    return None;
                }
            };

        let Some((text, ts)) = row else {
            self.counters.record_miss();
            return None;
        };

        if now - ts > self.ttl_seconds {
            if let Err(err) = sqlx::query("DELETE FROM cache WHERE key = ?")
                .bind(key)
                .execute(pool)
                .await
            {
                debug!(key, error = %err, "SQLite cache expiry delete failed");
            }
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        Some(decode_value(text))
    }

    // == Set ==
    pub(crate) async fn set_at(&self, key: &str, value: &Value, now: f64) {
        let Some(pool) = &self.pool else {
            return;
        };

        let text = encode_value(value);
        if let Err(err) = sqlx::query("INSERT OR REPLACE INTO cache (key, value, ts) VALUES (?, ?, ?)")
            .bind(key)
            .bind(text)
            .bind(now)
            .execute(pool)
            .await
        {
            debug!(key, error = %err, "SQLite cache set failed");
            return;
        }

        self.enforce_max_size(pool).await;
    }

    // == Capacity ==
    /// Deletes the oldest rows by `ts` until the table fits `max_size`.
    async fn enforce_max_size(&self, pool: &SqlitePool) {
        let count: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM cache")
            .fetch_one(pool)
            .await
        {
            Ok(count) => count,
            Err(err) => {
                debug!(error = %err, "SQLite cache count failed");
                return;
            }
        };

        let max_size = i64::try_from(self.max_size).unwrap_or(i64::MAX);
        if count <= max_size {
            return;
        }

        let excess = count - max_size;
        match sqlx::query(
            "DELETE FROM cache WHERE key IN (SELECT key FROM cache ORDER BY ts ASC LIMIT ?)",
        )
        .bind(excess)
        .execute(pool)
        .await
        {
            Ok(result) => {
                self.counters.record_evictions(result.rows_affected());
                debug!(evicted = result.rows_affected(), "SQLite cache evicted oldest entries");
            }
            Err(err) => debug!(error = %err, "SQLite cache eviction failed"),
        }
    }

    async fn count_rows(&self) -> usize {
        let Some(pool) = &self.pool else {
            return 0;
        };

        match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cache")
            .fetch_one(pool)
            .await
        {
            Ok(count) => usize::try_from(count).unwrap_or(0),
            Err(err) => {
                debug!(error = %err, "SQLite cache count failed");
                0
            }
        }
    }
}

#[async_trait]
impl Cache for PersistentCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, wall_clock_secs()).await
    }

    async fn set(&self, key: &str, value: Value) {
        self.set_at(key, &value, wall_clock_secs()).await;
    }

    async fn invalidate(&self, key: &str) {
        let Some(pool) = &self.pool else {
            return;
        };

        if let Err(err) = sqlx::query("DELETE FROM cache WHERE key = ?")
            .bind(key)
            .execute(pool)
            .await
        {
            debug!(key, error = %err, "SQLite cache invalidate failed");
        }
    }

    async fn clear(&self) {
        let Some(pool) = &self.pool else {
            return;
        };

        if let Err(err) = sqlx::query("DELETE FROM cache").execute(pool).await {
            debug!(error = %err, "SQLite cache clear failed");
        }
    }

    async fn size(&self) -> usize {
        self.count_rows().await
    }

    async fn stats(&self) -> CacheStats {
        let size = self.count_rows().await;
        self.counters
            .snapshot(Backend::Persistent, size, self.max_size, self.ttl_seconds)
    }

    fn backend(&self) -> Backend {
        Backend::Persistent
    }
}

// == Helpers ==
async fn connect(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    // Every connection to an in-memory database sees its own private copy,
    // so the pool must hold exactly one connection for its whole life.
    let pool_options = if is_in_memory(db_path) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
    };
    let pool = pool_options.connect_with(options).await?;

    let mut conn = pool.acquire().await?;
    sqlx::query(CREATE_TABLE).execute(&mut *conn).await?;
    sqlx::query(CREATE_TS_INDEX).execute(&mut *conn).await?;
    drop(conn);

    Ok(pool)
}

fn is_in_memory(db_path: &str) -> bool {
    db_path == ":memory:" || db_path.contains("mode=memory")
}

/// Wall-clock seconds since the Unix epoch, comparable across restarts.
fn wall_clock_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Plain strings are stored verbatim so they are not double-quoted.
fn encode_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Stored text that is not valid JSON was a plain string.
fn decode_value(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

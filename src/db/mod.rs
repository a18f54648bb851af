//! SQLite-backed task store.
//!
//! A single connection is shared behind a mutex; every multi-statement write
//! goes through [`Database::with_transaction`].

mod filter;
pub mod tasks;

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Pragmas applied to every connection. Subtask cascades rely on `foreign_keys`.
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys=ON;
     PRAGMA busy_timeout=5000;";

/// Handle to the tasks database. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database file at `path` and bring its schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        // WAL only makes sense for file-backed databases.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!("Opened task database at {}", path.display());
        Self::init(conn)
    }

    /// Open a private in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let mut conn = self.lock()?;
        let report = embedded::migrations::runner()
            .run(&mut *conn)
            .context("Failed to apply database migrations")?;
        for migration in report.applied_migrations() {
            debug!("Applied migration {}", migration);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }

    /// Run read-only work against the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` inside a transaction, committing only if it succeeds.
    ///
    /// On error the transaction is dropped, which rolls it back.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

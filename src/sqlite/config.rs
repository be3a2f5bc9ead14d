use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool, PooledConnection};
use tokio::sync::Mutex;

use super::executor::run_blocking;
use crate::error::SqlHelperError;
use crate::helper::SqlHelper;
use crate::pool::HelperPool;
use crate::types::DatabaseType;

/// Raw connection shared between the pool slot and the blocking worker running a statement.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// A `SQLite` connection checked out of the pool.
pub type SqlitePooledConnection = PooledConnection<'static, SqliteManager>;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// bb8 manager that opens `SQLite` connections against one database path.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    db_path: String,
    busy_timeout: Duration,
}

impl SqliteManager {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn db_path(&self) -> &str {
        &self.db_path
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = SqlHelperError;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.db_path.clone();
        let busy_timeout = self.busy_timeout;
        async move {
            tracing::debug!(path = %path, "opening sqlite connection");
            let conn = tokio::task::spawn_blocking(move || {
                let conn = rusqlite::Connection::open(&path)?;
                conn.busy_timeout(busy_timeout)?;
                Ok::<_, SqlHelperError>(conn)
            })
            .await
            .map_err(|e| {
                SqlHelperError::ConnectionError(format!("sqlite open join error: {e}"))
            })??;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let handle = Arc::clone(conn);
        async move {
            run_blocking(handle, |guard| {
                guard
                    .query_row("SELECT 1", [], |_| Ok(()))
                    .map_err(SqlHelperError::SqliteError)
            })
            .await
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Options for configuring a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub max_size: Option<u32>,
    pub connection_timeout: Option<Duration>,
    pub insert_id_query: Option<String>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            max_size: None,
            connection_timeout: None,
            insert_id_query: None,
        }
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn max_size(mut self, max_size: u32) -> Self {
        self.opts.max_size = Some(max_size);
        self
    }

    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.opts.connection_timeout = Some(timeout);
        self
    }

    /// Replace `SELECT last_insert_rowid()` as the generated-id query.
    #[must_use]
    pub fn insert_id_query(mut self, query: impl Into<String>) -> Self {
        self.opts.insert_id_query = Some(query.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a `SqlHelper` backed by a `SQLite` pool.
    ///
    /// # Errors
    ///
    /// Returns `SqlHelperError` if pool creation or the initial smoke test fails.
    pub async fn build(self) -> Result<SqlHelper, SqlHelperError> {
        SqlHelper::new_sqlite(self.finish()).await
    }
}

impl SqlHelper {
    #[must_use]
    pub fn sqlite_builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Build the pool, then check out one connection to switch the database to WAL.
    ///
    /// # Errors
    /// Returns `SqlHelperError::ConfigError` for an empty path or zero pool size, and
    /// `SqlHelperError::ConnectionError` if the pool cannot produce a working connection.
    pub async fn new_sqlite(opts: SqliteOptions) -> Result<Self, SqlHelperError> {
        if opts.db_path.trim().is_empty() {
            return Err(SqlHelperError::ConfigError(
                "sqlite database path is required".to_string(),
            ));
        }
        if opts.max_size == Some(0) {
            return Err(SqlHelperError::ConfigError(
                "max_size must be greater than zero".to_string(),
            ));
        }

        let mut builder = Pool::<SqliteManager>::builder();
        if let Some(max_size) = opts.max_size {
            builder = builder.max_size(max_size);
        }
        if let Some(timeout) = opts.connection_timeout {
            builder = builder.connection_timeout(timeout);
        }
        let pool = builder
            .build(SqliteManager::new(opts.db_path.clone()))
            .await
            .map_err(|e| {
                SqlHelperError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
            })?;

        {
            let conn = pool.get().await?;
            run_blocking(Arc::clone(&*conn), |guard| {
                // The pragma reports the resulting mode as a row.
                guard
                    .query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
                    .map_err(SqlHelperError::SqliteError)
            })
            .await?;
        }
        tracing::debug!(path = %opts.db_path, "sqlite pool ready");

        Ok(SqlHelper::from_parts(
            HelperPool::Sqlite(pool),
            DatabaseType::Sqlite,
            opts.insert_id_query,
        ))
    }
}

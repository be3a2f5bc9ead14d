mod cursor;
pub(crate) mod insert;

pub use cursor::QueryCursor;

use std::sync::Arc;

use crate::config::HelperConfig;
use crate::error::SqlHelperError;
use crate::executor::AsyncDatabaseExecutor;
use crate::pool::{HelperConnection, HelperPool, PoolStatus};
use crate::types::{DatabaseType, RowValues};

/// Execution primitives over a pool.
///
/// Every operation comes in two forms. The plain form checks a connection out of the
/// pool and returns it before the call completes, on success and on error. The `_on`
/// form runs against a connection the caller already holds and leaves its lifecycle to
/// the caller.
///
/// Cloning is cheap; clones share the pool.
///
/// ```rust,no_run
/// use sql_helper::prelude::*;
///
/// # async fn demo() -> Result<(), SqlHelperError> {
/// let helper = SqlHelper::sqlite_builder("app.db".to_string()).build().await?;
/// let id = helper
///     .execute_insert("INSERT INTO users (name) VALUES (?1)", &[RowValues::from("alice")])
///     .await?;
/// let name = helper
///     .query_single("SELECT name FROM users WHERE id = ?1", &[RowValues::Int(id)])
///     .await?;
/// assert_eq!(name, Some(RowValues::Text("alice".into())));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqlHelper {
    pool: HelperPool,
    db_type: DatabaseType,
    insert_id_query: Option<Arc<str>>,
}

impl SqlHelper {
    pub(crate) fn from_parts(
        pool: HelperPool,
        db_type: DatabaseType,
        insert_id_query: Option<String>,
    ) -> Self {
        Self {
            pool,
            db_type,
            insert_id_query: insert_id_query.map(Arc::from),
        }
    }

    /// Build a helper from loaded configuration.
    ///
    /// # Errors
    /// Returns `SqlHelperError::ConfigError` for invalid configuration, or the backend's
    /// error if the pool cannot be built.
    pub async fn connect(config: &HelperConfig) -> Result<Self, SqlHelperError> {
        config.validate()?;
        let timeout = config.connection_timeout();
        match config.database_type()? {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => {
                let mut opts = crate::postgres::PostgresOptions::from_url(&config.url)?
                    .with_credentials(config.username.as_deref(), config.password.as_deref());
                opts.max_size = config.max_size;
                opts.connection_timeout = timeout;
                opts.insert_id_query.clone_from(&config.insert_id_query);
                Self::new_postgres(opts).await
            }
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => {
                let mut opts = crate::sqlite::SqliteOptions::new(config.sqlite_path().to_string());
                opts.max_size = config.max_size;
                opts.connection_timeout = timeout;
                opts.insert_id_query.clone_from(&config.insert_id_query);
                Self::new_sqlite(opts).await
            }
        }
    }

    #[must_use]
    pub fn pool(&self) -> &HelperPool {
        &self.pool
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    /// The query `execute_insert` runs to read the generated id.
    #[must_use]
    pub fn insert_id_query(&self) -> &str {
        self.insert_id_query
            .as_deref()
            .unwrap_or_else(|| self.db_type.last_insert_id_query())
    }

    #[must_use]
    pub fn pool_status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Check a connection out of the pool for use with the `_on` operations.
    ///
    /// # Errors
    /// Returns the pool error if no connection can be obtained.
    pub async fn get_connection(&self) -> Result<HelperConnection, SqlHelperError> {
        self.pool.get_connection().await
    }

    /// Execute a statement that returns no rows and report the affected row count.
    ///
    /// # Errors
    /// Returns the checkout, preparation or execution error. The connection goes back to
    /// the pool either way.
    pub async fn execute_non_query(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlHelperError> {
        let mut conn = self.get_connection().await?;
        self.execute_non_query_on(&mut conn, sql, params).await
    }

    /// # Errors
    /// Returns the preparation or execution error.
    pub async fn execute_non_query_on(
        &self,
        conn: &mut HelperConnection,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlHelperError> {
        conn.execute_dml(sql, params).await
    }

    /// Run a query and hand back a cursor that owns the connection it ran on.
    ///
    /// Release it with [`close_all`](Self::close_all) or by dropping it.
    ///
    /// # Errors
    /// Returns the checkout, preparation or execution error. On error no connection is
    /// left checked out.
    pub async fn execute_query(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryCursor, SqlHelperError> {
        let mut conn = self.get_connection().await?;
        let rows = conn.execute_select(sql, params).await?;
        Ok(QueryCursor::owning(rows, conn))
    }

    /// Run a query on a caller-held connection. The cursor holds only rows.
    ///
    /// # Errors
    /// Returns the preparation or execution error.
    pub async fn execute_query_on(
        &self,
        conn: &mut HelperConnection,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryCursor, SqlHelperError> {
        let rows = conn.execute_select(sql, params).await?;
        Ok(QueryCursor::detached(rows))
    }

    /// Run an INSERT and return the id the database generated for it.
    ///
    /// The id is read with [`insert_id_query`](Self::insert_id_query) on the same
    /// connection, right after the insert.
    ///
    /// # Errors
    /// Returns `SqlHelperError::NoGeneratedId` when the insert produced no id, otherwise
    /// the checkout or execution error.
    pub async fn execute_insert(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<i64, SqlHelperError> {
        let mut conn = self.get_connection().await?;
        self.execute_insert_on(&mut conn, sql, params).await
    }

    /// # Errors
    /// Returns `SqlHelperError::NoGeneratedId` when the insert produced no id, otherwise
    /// the execution error.
    pub async fn execute_insert_on(
        &self,
        conn: &mut HelperConnection,
        sql: &str,
        params: &[RowValues],
    ) -> Result<i64, SqlHelperError> {
        let id = conn
            .execute_insert(sql, params, self.insert_id_query())
            .await?;
        tracing::debug!(id, "insert generated id");
        Ok(id)
    }

    /// First column of the first row, or `None` when nothing matched.
    ///
    /// # Errors
    /// Returns the checkout, preparation or execution error.
    pub async fn query_single(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<RowValues>, SqlHelperError> {
        let mut conn = self.get_connection().await?;
        self.query_single_on(&mut conn, sql, params).await
    }

    /// # Errors
    /// Returns the preparation or execution error.
    pub async fn query_single_on(
        &self,
        conn: &mut HelperConnection,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<RowValues>, SqlHelperError> {
        let rows = conn.execute_select(sql, params).await?;
        Ok(rows.into_single())
    }

    /// Release a cursor along with the connection it owns, if any.
    pub fn close_all(cursor: QueryCursor) {
        cursor.close_all();
    }

    /// Roll back the open transaction on `conn`, ignoring any failure.
    pub async fn rollback(conn: &mut HelperConnection) {
        if let Err(e) = conn.try_rollback().await {
            tracing::debug!(error = %e, "rollback failed, ignoring");
        }
    }
}

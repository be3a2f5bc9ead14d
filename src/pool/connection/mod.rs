#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

use super::HelperPool;
use crate::error::SqlHelperError;
use crate::types::DatabaseType;

#[cfg(feature = "postgres")]
use crate::postgres::PgPooledConnection;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqlitePooledConnection;

/// A connection checked out of a [`HelperPool`].
///
/// Dropping it returns the connection to the pool. Statements run one at a time: every
/// operation takes `&mut self`.
pub enum HelperConnection {
    #[cfg(feature = "postgres")]
    Postgres { client: PgPooledConnection },
    #[cfg(feature = "sqlite")]
    Sqlite { conn: SqlitePooledConnection },
}

// Manual Debug implementation because pooled connections do not expose `Debug`
impl std::fmt::Debug for HelperConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { .. } => f.debug_tuple("Postgres").field(&"<Client>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite { .. } => f.debug_tuple("Sqlite").field(&"<Connection>").finish(),
        }
    }
}

impl HelperPool {
    /// Get a connection from the pool
    ///
    /// # Errors
    /// Returns `SqlHelperError::PoolErrorPostgres` or `SqlHelperError::ConnectionError` if
    /// the pool fails to provide a connection.
    pub async fn get_connection(&self) -> Result<HelperConnection, SqlHelperError> {
        let conn = match self {
            #[cfg(feature = "postgres")]
            HelperPool::Postgres(pool) => postgres::get_connection(pool).await,
            #[cfg(feature = "sqlite")]
            HelperPool::Sqlite(pool) => sqlite::get_connection(pool).await,
        }?;
        tracing::trace!(status = ?self.status(), "connection checked out");
        Ok(conn)
    }
}

impl HelperConnection {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            HelperConnection::Postgres { .. } => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            HelperConnection::Sqlite { .. } => DatabaseType::Sqlite,
        }
    }

    /// Start a transaction with a plain `BEGIN`.
    ///
    /// # Errors
    /// Returns the driver error if `BEGIN` fails (for example, a transaction is already open).
    pub async fn begin(&mut self) -> Result<(), SqlHelperError> {
        self.run_control("BEGIN").await
    }

    /// Commit the transaction opened by [`begin`](Self::begin).
    ///
    /// # Errors
    /// Returns the driver error if `COMMIT` fails.
    pub async fn commit(&mut self) -> Result<(), SqlHelperError> {
        self.run_control("COMMIT").await
    }

    /// Issue `ROLLBACK`, surfacing any failure. [`crate::SqlHelper::rollback`] is the
    /// best-effort form.
    ///
    /// # Errors
    /// Returns the driver error if `ROLLBACK` fails.
    pub async fn try_rollback(&mut self) -> Result<(), SqlHelperError> {
        self.run_control("ROLLBACK").await
    }

    async fn run_control(&mut self, statement: &str) -> Result<(), SqlHelperError> {
        match self {
            #[cfg(feature = "postgres")]
            HelperConnection::Postgres { client } => {
                crate::postgres::execute_batch(client, statement).await
            }
            #[cfg(feature = "sqlite")]
            HelperConnection::Sqlite { conn } => {
                crate::sqlite::execute_batch(conn, statement).await
            }
        }
    }
}

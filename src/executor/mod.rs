use async_trait::async_trait;

use crate::error::SqlHelperError;
use crate::pool::HelperConnection;
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

/// Statement execution on one open connection.
///
/// Implemented by [`HelperConnection`], which dispatches to the backend modules.
#[async_trait]
pub trait AsyncDatabaseExecutor {
    /// Executes parameterless SQL, possibly several statements separated by `;`.
    async fn execute_batch(&mut self, query: &str) -> Result<(), SqlHelperError>;

    /// Executes a single SELECT statement and returns the result set.
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlHelperError>;

    /// Executes a single DML statement (INSERT, UPDATE, DELETE, etc.) and returns the number of rows affected.
    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlHelperError>;

    /// Executes an INSERT and then `id_query` on the same connection, returning the generated id.
    async fn execute_insert(
        &mut self,
        query: &str,
        params: &[RowValues],
        id_query: &str,
    ) -> Result<i64, SqlHelperError>;
}

#[async_trait]
impl AsyncDatabaseExecutor for HelperConnection {
    async fn execute_batch(&mut self, query: &str) -> Result<(), SqlHelperError> {
        tracing::trace!(sql = query, "execute_batch");
        match self {
            #[cfg(feature = "postgres")]
            HelperConnection::Postgres { client } => postgres::execute_batch(client, query).await,
            #[cfg(feature = "sqlite")]
            HelperConnection::Sqlite { conn } => sqlite::execute_batch(conn, query).await,
        }
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlHelperError> {
        tracing::trace!(sql = query, params = params.len(), "execute_select");
        match self {
            #[cfg(feature = "postgres")]
            HelperConnection::Postgres { client } => {
                postgres::execute_select(client, query, params).await
            }
            #[cfg(feature = "sqlite")]
            HelperConnection::Sqlite { conn } => sqlite::execute_select(conn, query, params).await,
        }
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlHelperError> {
        tracing::trace!(sql = query, params = params.len(), "execute_dml");
        match self {
            #[cfg(feature = "postgres")]
            HelperConnection::Postgres { client } => {
                postgres::execute_dml(client, query, params).await
            }
            #[cfg(feature = "sqlite")]
            HelperConnection::Sqlite { conn } => sqlite::execute_dml(conn, query, params).await,
        }
    }

    async fn execute_insert(
        &mut self,
        query: &str,
        params: &[RowValues],
        id_query: &str,
    ) -> Result<i64, SqlHelperError> {
        tracing::trace!(sql = query, id_query, "execute_insert");
        match self {
            #[cfg(feature = "postgres")]
            HelperConnection::Postgres { client } => {
                postgres::execute_insert(client, query, params, id_query).await
            }
            #[cfg(feature = "sqlite")]
            HelperConnection::Sqlite { conn } => {
                sqlite::execute_insert(conn, query, params, id_query).await
            }
        }
    }
}

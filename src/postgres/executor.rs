use tokio_postgres::Client;
use tokio_postgres::error::SqlState;

use super::params::Params;
use super::query::{build_result_set, postgres_extract_value};
use crate::error::SqlHelperError;
use crate::helper::insert::require_generated_id;
use crate::results::ResultSet;
use crate::types::{DatabaseType, RowValues};

/// Execute one or more parameterless statements with the simple query protocol.
///
/// # Errors
/// Returns `SqlHelperError::PostgresError` if any statement fails.
pub async fn execute_batch(client: &Client, query: &str) -> Result<(), SqlHelperError> {
    client.batch_execute(query).await?;
    Ok(())
}

/// Prepare and run a SELECT, materializing every row.
///
/// # Errors
/// Returns errors from parameter conversion, preparation, execution or row extraction.
pub async fn execute_select(
    client: &Client,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlHelperError> {
    let converted = Params::convert(params);
    let stmt = client.prepare(query).await?;
    let rows = client.query(&stmt, converted.as_refs()).await?;
    build_result_set(&stmt, &rows)
}

/// Prepare and run a DML statement, returning rows affected.
///
/// # Errors
/// Returns errors from parameter conversion, preparation or execution.
pub async fn execute_dml(
    client: &Client,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SqlHelperError> {
    let converted = Params::convert(params);
    let stmt = client.prepare(query).await?;
    let rows = client.execute(&stmt, converted.as_refs()).await?;
    usize::try_from(rows).map_err(|e| {
        SqlHelperError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
    })
}

const LASTVAL_SAVEPOINT: &str = "sql_helper_lastval";

/// The session's `lastval()`, or `None` while no sequence has been used in this session.
///
/// Inside a transaction block the read runs under a savepoint so the "lastval is not yet
/// defined" error does not abort the caller's transaction. Outside one, `SAVEPOINT` itself
/// fails and nothing needs undoing.
async fn session_lastval(client: &Client) -> Result<Option<i64>, SqlHelperError> {
    let in_transaction = client
        .batch_execute(&format!("SAVEPOINT {LASTVAL_SAVEPOINT}"))
        .await
        .is_ok();
    let value = match client.query_one("SELECT lastval()", &[]).await {
        Ok(row) => Some(row.try_get::<_, i64>(0)?),
        Err(e) if e.code() == Some(&SqlState::OBJECT_NOT_IN_PREREQUISITE_STATE) => None,
        Err(e) => return Err(e.into()),
    };
    if in_transaction {
        let cleanup = if value.is_some() {
            format!("RELEASE SAVEPOINT {LASTVAL_SAVEPOINT}")
        } else {
            format!(
                "ROLLBACK TO SAVEPOINT {LASTVAL_SAVEPOINT}; RELEASE SAVEPOINT {LASTVAL_SAVEPOINT}"
            )
        };
        client.batch_execute(&cleanup).await?;
    }
    Ok(value)
}

/// Run an INSERT and return the id it generated.
///
/// An insert with a `RETURNING` clause reports the first returned column of its first row.
/// Otherwise the session's `lastval()` is read before and after the statement; if it did
/// not move, the insert used no sequence and the value left by an earlier insert is not
/// reported. When it moved, `id_query` (normally `SELECT lastval()` itself) reads the id.
///
/// # Errors
/// Returns `SqlHelperError::NoGeneratedId` when the insert touched no row or used no
/// sequence, otherwise the driver error.
pub async fn execute_insert(
    client: &Client,
    query: &str,
    params: &[RowValues],
    id_query: &str,
) -> Result<i64, SqlHelperError> {
    let converted = Params::convert(params);
    let stmt = client.prepare(query).await?;
    if !stmt.columns().is_empty() {
        let rows = client.query(&stmt, converted.as_refs()).await?;
        let returned = rows
            .first()
            .map(|row| postgres_extract_value(row, 0))
            .transpose()?;
        return require_generated_id(rows.len(), returned);
    }

    let before = session_lastval(client).await?;
    let affected = client.execute(&stmt, converted.as_refs()).await?;
    let affected = usize::try_from(affected).map_err(|e| {
        SqlHelperError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
    })?;
    let after = session_lastval(client).await?;
    if after.is_none() || after == before {
        return Err(SqlHelperError::NoGeneratedId);
    }

    let generated = if id_query == DatabaseType::Postgres.last_insert_id_query() {
        after.map(RowValues::Int)
    } else {
        client
            .query_opt(id_query, &[])
            .await?
            .as_ref()
            .map(|row| postgres_extract_value(row, 0))
            .transpose()?
    };
    require_generated_id(affected, generated)
}

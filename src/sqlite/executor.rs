use std::sync::Arc;

use super::config::{SharedSqliteConnection, SqlitePooledConnection};
use super::params::Params;
use super::query::{build_result_set, sqlite_extract_value_sync};
use crate::error::SqlHelperError;
use crate::helper::insert::require_generated_id;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run blocking `rusqlite` work on tokio's blocking pool.
///
/// The statement is prepared, used and finalized inside `func`, so nothing borrowed from
/// the connection outlives the call.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlHelperError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlHelperError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlHelperError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

fn handle(conn: &SqlitePooledConnection) -> SharedSqliteConnection {
    Arc::clone(&**conn)
}

/// Execute one or more parameterless statements.
///
/// # Errors
///
/// Returns `SqlHelperError::SqliteError` if any statement fails.
pub async fn execute_batch(
    conn: &SqlitePooledConnection,
    query: &str,
) -> Result<(), SqlHelperError> {
    let sql_owned = query.to_owned();
    run_blocking(handle(conn), move |guard| {
        guard
            .execute_batch(&sql_owned)
            .map_err(SqlHelperError::SqliteError)
    })
    .await
}

/// Execute a SELECT and materialize it into a `ResultSet`.
///
/// # Errors
///
/// Returns `SqlHelperError::SqliteError` if preparation, execution or row extraction fails.
pub async fn execute_select(
    conn: &SqlitePooledConnection,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlHelperError> {
    let sql_owned = query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(handle(conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        build_result_set(&mut stmt, &params_owned)
    })
    .await
}

/// Execute a DML statement and return rows affected.
///
/// # Errors
///
/// Returns `SqlHelperError::SqliteError` if preparation or execution fails.
pub async fn execute_dml(
    conn: &SqlitePooledConnection,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SqlHelperError> {
    let sql_owned = query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(handle(conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        let refs = params_owned.as_refs();
        Ok(stmt.execute(&refs[..])?)
    })
    .await
}

fn first_value(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Option<RowValues>, SqlHelperError> {
    let mut rows = stmt.query(params)?;
    rows.next()?
        .map(|row| sqlite_extract_value_sync(row, 0))
        .transpose()
}

/// Execute an INSERT and return the rowid it generated.
///
/// An insert with a `RETURNING` clause reports the first returned column of its first row.
/// Otherwise the connection's last insert rowid is compared before and after the statement:
/// if it did not move, the insert generated nothing (a `WITHOUT ROWID` table, an ignored
/// conflict) and the stale value from an earlier insert is not reported. When it moved,
/// `id_query` reads the id on the same connection. Everything runs in one worker hop.
///
/// A plain rowid table can hand out the rowid the connection last reported (the previous
/// maximum was deleted); that insert is treated as generating nothing.
///
/// # Errors
///
/// Returns `SqlHelperError::NoGeneratedId` when the insert produced no identifier, or
/// `SqlHelperError::SqliteError` if either statement fails.
pub async fn execute_insert(
    conn: &SqlitePooledConnection,
    query: &str,
    params: &[RowValues],
    id_query: &str,
) -> Result<i64, SqlHelperError> {
    let sql_owned = query.to_owned();
    let id_sql = id_query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(handle(conn), move |guard| {
        let before = guard.last_insert_rowid();
        let mut stmt = guard.prepare(&sql_owned)?;
        let refs = params_owned.as_refs();
        if stmt.column_count() > 0 {
            let returned = first_value(&mut stmt, &refs)?;
            return require_generated_id(usize::from(returned.is_some()), returned);
        }
        let affected = stmt.execute(&refs[..])?;
        drop(stmt);

        if guard.last_insert_rowid() == before {
            return Err(SqlHelperError::NoGeneratedId);
        }
        let mut id_stmt = guard.prepare(&id_sql)?;
        let generated = first_value(&mut id_stmt, &[])?;
        require_generated_id(affected, generated)
    })
    .await
}

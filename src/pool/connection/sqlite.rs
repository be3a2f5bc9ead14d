use bb8::Pool;

use super::HelperConnection;
use crate::error::SqlHelperError;
use crate::sqlite::SqliteManager;

pub(super) async fn get_connection(
    pool: &Pool<SqliteManager>,
) -> Result<HelperConnection, SqlHelperError> {
    let conn = pool
        .get_owned()
        .await
        .map_err(|e| SqlHelperError::ConnectionError(format!("sqlite checkout error: {e}")))?;
    Ok(HelperConnection::Sqlite { conn })
}

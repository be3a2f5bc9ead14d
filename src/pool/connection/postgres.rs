use bb8::Pool;

use super::HelperConnection;
use crate::error::SqlHelperError;
use crate::postgres::PgManager;

pub(super) async fn get_connection(
    pool: &Pool<PgManager>,
) -> Result<HelperConnection, SqlHelperError> {
    let client = pool
        .get_owned()
        .await
        .map_err(SqlHelperError::PoolErrorPostgres)?;
    Ok(HelperConnection::Postgres { client })
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlHelperError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] bb8::RunError<tokio_postgres::Error>),

    /// The insert ran but the backend reported no auto-generated identifier for it.
    #[error("No auto-generated identifier was returned for the insert")]
    NoGeneratedId,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

#[cfg(feature = "sqlite")]
impl From<bb8::RunError<SqlHelperError>> for SqlHelperError {
    fn from(err: bb8::RunError<SqlHelperError>) -> Self {
        SqlHelperError::ConnectionError(format!("SQLite pool error: {err}"))
    }
}

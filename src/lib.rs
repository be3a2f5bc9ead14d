//! Pool-backed SQL execution helpers for Postgres and `SQLite`, plus a small
//! regex-based HTML tag stripper.
//!
//! Database work goes through [`SqlHelper`]; markup cleanup lives in [`markup`].

pub mod config;
pub mod error;
pub mod executor;
pub mod helper;
pub mod markup;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::HelperConfig;
pub use error::SqlHelperError;
pub use executor::AsyncDatabaseExecutor;
pub use helper::{QueryCursor, SqlHelper};
pub use pool::{HelperConnection, HelperPool, PoolStatus};
pub use results::{DbRow, ResultSet};
pub use types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
pub use postgres::{PgManager, PostgresOptions};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteManager, SqliteOptions, SqliteOptionsBuilder};

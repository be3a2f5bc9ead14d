//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::HelperConfig;
pub use crate::error::SqlHelperError;
pub use crate::executor::AsyncDatabaseExecutor;
pub use crate::helper::{QueryCursor, SqlHelper};
pub use crate::markup::{collapse_to_plain_text, remove_tags, remove_tags_opt};
pub use crate::pool::{HelperConnection, HelperPool, PoolStatus};
pub use crate::results::{DbRow, ResultSet};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresOptions;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};

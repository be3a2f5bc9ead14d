// PostgreSQL backend
//
// - config: bb8 connection manager and pool setup
// - params: `ToSql` for `RowValues`
// - query: row extraction and result set building
// - executor: statement execution on a pooled client

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{PgManager, PgPooledConnection, PostgresOptions};
pub use executor::{execute_batch, execute_dml, execute_insert, execute_select};
pub use params::Params;
pub use query::build_result_set;

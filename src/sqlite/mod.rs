// SQLite backend
//
// - config: bb8 connection manager and pool setup
// - params: conversion from `RowValues` to rusqlite values
// - query: row extraction and result set building
// - executor: blocking statement execution on tokio's blocking pool

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SqliteManager, SqliteOptions, SqliteOptionsBuilder, SqlitePooledConnection};
pub use executor::{execute_batch, execute_dml, execute_insert, execute_select};
pub use params::Params;
pub use query::build_result_set;

pub mod connection;

pub use connection::HelperConnection;

#[cfg(feature = "postgres")]
use crate::postgres::PgManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

/// Connection pool for database access
///
/// Wraps the bb8 pool of each supported engine. Cloning is cheap and every clone
/// refers to the same pool.
#[derive(Clone)]
pub enum HelperPool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(bb8::Pool<PgManager>),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
}

// Manual Debug implementation so the pool prints its occupancy rather than its manager.
impl std::fmt::Debug for HelperPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "Postgres",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "Sqlite",
        };
        f.debug_tuple(name).field(&self.status()).finish()
    }
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Connections currently open, idle or checked out.
    pub connections: u32,
    /// Open connections sitting idle in the pool.
    pub idle_connections: u32,
}

impl PoolStatus {
    /// Connections currently lent out to callers.
    #[must_use]
    pub fn checked_out(&self) -> u32 {
        self.connections.saturating_sub(self.idle_connections)
    }
}

impl From<bb8::State> for PoolStatus {
    fn from(state: bb8::State) -> Self {
        Self {
            connections: state.connections,
            idle_connections: state.idle_connections,
        }
    }
}

impl HelperPool {
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        match self {
            #[cfg(feature = "postgres")]
            HelperPool::Postgres(pool) => pool.state().into(),
            #[cfg(feature = "sqlite")]
            HelperPool::Sqlite(pool) => pool.state().into(),
        }
    }
}

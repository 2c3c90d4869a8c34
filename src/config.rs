//! Configuration for SQLite connections

use std::time::Duration;

use sqlx::sqlite::SqliteConnectOptions;

/// Configuration applied when a [`Connection`](crate::Connection) is opened
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_simple::ConnectionConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = ConnectionConfig::default();
///
/// // Override just one field
/// let config = ConnectionConfig {
///     busy_timeout: Duration::from_millis(250),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
   /// How long SQLite keeps retrying when the database file is locked by
   /// another connection before reporting `SQLITE_BUSY`.
   ///
   /// Default: 5 seconds
   pub busy_timeout: Duration,

   /// Whether `PRAGMA foreign_keys` is switched on for the connection
   ///
   /// Default: true
   pub foreign_keys: bool,

   /// Number of prepared statements kept cached on the connection
   ///
   /// Default: 100
   pub statement_cache_capacity: usize,
}

impl Default for ConnectionConfig {
   fn default() -> Self {
      Self {
         busy_timeout: Duration::from_secs(5),
         foreign_keys: true,
         statement_cache_capacity: 100,
      }
   }
}

impl ConnectionConfig {
   pub(crate) fn apply(&self, options: SqliteConnectOptions) -> SqliteConnectOptions {
      options
         .busy_timeout(self.busy_timeout)
         .foreign_keys(self.foreign_keys)
         .statement_cache_capacity(self.statement_cache_capacity)
   }
}

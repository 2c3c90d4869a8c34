//! # sqlx-sqlite-simple
//!
//! A small access layer over a single SQLite connection, built on SQLx.
//!
//! ## Core Types
//!
//! - **[`Connection`]**: one open database file with exec, row, query, insert and
//!   transaction control
//! - **[`ResultCursor`]**: lazy, forward-only cursor over a query's rows
//! - **[`RowMap`]**: one materialized row, column name to [`Value`]
//! - **[`Value`]**: dynamic SQLite value used for parameters and cells
//! - **[`ConnectionConfig`]**: settings applied when opening
//! - **[`Error`]**: error type for database operations
//!
//! ## Example
//!
//! ```no_run
//! use sqlx_sqlite_simple::{Connection, check_base_file, params};
//!
//! # async fn run() -> sqlx_sqlite_simple::Result<()> {
//! let existed = check_base_file("goods.sqlite");
//! let mut conn = Connection::open("goods.sqlite").await?;
//! if !existed {
//!    conn.exec("CREATE TABLE goods (name TEXT)", params![]).await?;
//! }
//!
//! conn.begin().await?;
//! let id = conn.insert("INSERT INTO goods VALUES (?)", params!["Good 1"]).await?;
//! conn.commit().await?;
//!
//! let row = conn.row("SELECT * FROM goods WHERE rowid = ?", params![id]).await?;
//! assert!(!row.is_empty());
//!
//! {
//!    let mut cursor = conn.query("SELECT rowid, * FROM goods", params![]).await?;
//!    while let Some(row) = cursor.try_next().await? {
//!       println!("{:?}", row);
//!    }
//!    cursor.close();
//! }
//!
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod cursor;
mod decode;
mod error;
mod row;
mod value;

// Re-export public types
pub use config::ConnectionConfig;
pub use connection::{Connection, WriteQueryResult, check_base_file};
pub use cursor::ResultCursor;
pub use error::{Error, Result};
pub use row::RowMap;
pub use value::{Value, to_boolean};

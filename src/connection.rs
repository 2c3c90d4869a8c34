//! Single SQLite connection with open/closed lifecycle

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteQueryResult};
use sqlx::{ConnectOptions, Connection as _};
use tracing::{debug, trace};

use crate::config::ConnectionConfig;
use crate::cursor::ResultCursor;
use crate::value::bind_value;
use crate::{Error, Result, RowMap, Value};

const MEMORY_PATH: &str = ":memory:";

/// Result returned from write operations (e.g. INSERT, UPDATE, DELETE).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteQueryResult {
   /// The number of rows affected by the write operation.
   pub rows_affected: u64,
   /// The last inserted row ID (SQLite ROWID).
   ///
   /// Tables created with `WITHOUT ROWID` do not set this value.
   pub last_insert_id: i64,
}

/// Check that a database file exists and is a regular file.
///
/// Opening always creates a missing file, so callers that need "open existing"
/// semantics check first.
pub fn check_base_file(path: impl AsRef<Path>) -> bool {
   std::fs::metadata(path)
      .map(|meta| meta.is_file())
      .unwrap_or(false)
}

/// One open SQLite database.
///
/// ## State Management
///
/// - **`conn`**: the engine handle, `None` once [`close`](Self::close) has run
/// - **`path`**: database file the connection was opened on
///
/// Transactions are left entirely to SQLite: [`begin`](Self::begin),
/// [`commit`](Self::commit) and [`rollback`](Self::rollback) issue the
/// statements and report whatever error the engine returns for a misplaced
/// one.
///
/// All methods take `&mut self`. To share a connection between tasks, wrap it
/// in a `tokio::sync::Mutex`, or open one connection per worker.
#[derive(Debug)]
pub struct Connection {
   conn: Option<SqliteConnection>,
   path: PathBuf,
}

impl Connection {
   /// Open the database at `path`, creating the file if it does not exist
   pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
      Self::open_with_config(path, ConnectionConfig::default()).await
   }

   /// Open the database at `path` with custom settings
   pub async fn open_with_config(path: impl AsRef<Path>, config: ConnectionConfig) -> Result<Self> {
      let path = path.as_ref().to_path_buf();
      let options = config.apply(
         SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true),
      );

      let conn = options.connect().await?;
      debug!("Opened SQLite database: {}", path.display());

      Ok(Self {
         conn: Some(conn),
         path,
      })
   }

   /// Open a private in-memory database, discarded on close
   pub async fn open_in_memory() -> Result<Self> {
      let options = ConnectionConfig::default()
         .apply(SqliteConnectOptions::from_str("sqlite::memory:")?);

      let conn = options.connect().await?;
      debug!("Opened in-memory SQLite database");

      Ok(Self {
         conn: Some(conn),
         path: PathBuf::from(MEMORY_PATH),
      })
   }

   /// Database file path (`:memory:` for in-memory databases)
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Whether [`close`](Self::close) has already run
   pub fn is_closed(&self) -> bool {
      self.conn.is_none()
   }

   /// Execute a statement that returns no rows (DDL, UPDATE, DELETE, ...)
   pub async fn exec(&mut self, query: &str, args: impl IntoIterator<Item = Value>) -> Result<()> {
      self.run(query, args).await?;
      Ok(())
   }

   /// Execute a write statement and report affected rows and the last rowid
   pub async fn execute(
      &mut self,
      query: &str,
      args: impl IntoIterator<Item = Value>,
   ) -> Result<WriteQueryResult> {
      let result = self.run(query, args).await?;
      Ok(WriteQueryResult {
         rows_affected: result.rows_affected(),
         last_insert_id: result.last_insert_rowid(),
      })
   }

   /// Fetch the first row of a query.
   ///
   /// A query matching nothing is not an error: the returned map is empty
   /// (see [`RowMap::is_empty`]).
   pub async fn row(&mut self, query: &str, args: impl IntoIterator<Item = Value>) -> Result<RowMap> {
      let mut cursor = self.query(query, args).await?;
      let row = cursor.try_next().await?;
      cursor.close();
      Ok(row.unwrap_or_default())
   }

   /// Run a query and return a cursor positioned on its first row.
   ///
   /// Errors opening the statement or reading the first row are returned
   /// directly. The cursor is released when closed or dropped.
   pub async fn query<'c>(
      &'c mut self,
      query: &'c str,
      args: impl IntoIterator<Item = Value>,
   ) -> Result<ResultCursor<'c>> {
      let conn = self.conn.as_mut().ok_or(Error::DatabaseClosed)?;
      trace!("Query: {}", query);

      let mut q = sqlx::query(query);
      for value in args {
         q = bind_value(q, value);
      }

      ResultCursor::open(q.fetch(conn)).await
   }

   /// Execute an INSERT and return the rowid SQLite assigned to it
   pub async fn insert(&mut self, query: &str, args: impl IntoIterator<Item = Value>) -> Result<i64> {
      let result = self.run(query, args).await?;
      Ok(result.last_insert_rowid())
   }

   /// Start a transaction (`BEGIN`)
   pub async fn begin(&mut self) -> Result<()> {
      self.run("BEGIN", Vec::new()).await?;
      debug!("Transaction started for db: {}", self.path.display());
      Ok(())
   }

   /// Commit the current transaction (`COMMIT`)
   pub async fn commit(&mut self) -> Result<()> {
      self.run("COMMIT", Vec::new()).await?;
      debug!("Transaction committed for db: {}", self.path.display());
      Ok(())
   }

   /// Roll back the current transaction (`ROLLBACK`)
   pub async fn rollback(&mut self) -> Result<()> {
      self.run("ROLLBACK", Vec::new()).await?;
      debug!("Transaction rolled back for db: {}", self.path.display());
      Ok(())
   }

   /// The most recent rowid SQLite assigned on this connection
   pub async fn last_insert_id(&mut self) -> Result<i64> {
      let conn = self.conn.as_mut().ok_or(Error::DatabaseClosed)?;
      let (id,): (i64,) = sqlx::query_as("SELECT last_insert_rowid()")
         .fetch_one(conn)
         .await?;
      Ok(id)
   }

   /// Close the connection.
   ///
   /// The connection cannot be used afterwards. Closing it a second time
   /// returns [`Error::DatabaseClosed`].
   pub async fn close(&mut self) -> Result<()> {
      let conn = self.conn.take().ok_or(Error::DatabaseClosed)?;
      conn.close().await?;
      debug!("Closed SQLite database: {}", self.path.display());
      Ok(())
   }

   async fn run(
      &mut self,
      query: &str,
      args: impl IntoIterator<Item = Value>,
   ) -> Result<SqliteQueryResult> {
      let conn = self.conn.as_mut().ok_or(Error::DatabaseClosed)?;
      trace!("Execute: {}", query);

      let mut q = sqlx::query(query);
      for value in args {
         q = bind_value(q, value);
      }

      Ok(q.execute(conn).await?)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::params;
   use tempfile::TempDir;

   async fn create_test_db() -> (Connection, TempDir) {
      let temp_dir = TempDir::new().expect("Failed to create temp directory");
      let db_path = temp_dir.path().join("test.db");
      let conn = Connection::open(&db_path)
         .await
         .expect("Failed to open test database");

      (conn, temp_dir)
   }

   #[test]
   fn test_check_base_file() {
      let temp_dir = TempDir::new().unwrap();
      let file = temp_dir.path().join("base.sqlite");

      assert!(!check_base_file(&file));
      assert!(!check_base_file(temp_dir.path()));

      std::fs::write(&file, b"").unwrap();
      assert!(check_base_file(&file));
   }

   #[tokio::test]
   async fn test_open_creates_file() {
      let temp_dir = TempDir::new().unwrap();
      let db_path = temp_dir.path().join("new.db");
      assert!(!check_base_file(&db_path));

      let mut conn = Connection::open(&db_path).await.unwrap();
      conn.exec("CREATE TABLE t (id INTEGER)", params![]).await.unwrap();

      assert!(check_base_file(&db_path));
      assert_eq!(conn.path(), db_path.as_path());
      conn.close().await.unwrap();
   }

   #[tokio::test]
   async fn test_execute_and_write_result() {
      let (mut db, _temp) = create_test_db().await;

      let result = db
         .execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", params![])
         .await
         .unwrap();
      assert_eq!(result.rows_affected, 0);

      let result = db
         .execute("INSERT INTO t (name) VALUES (?), (?)", params!["Alice", "Bob"])
         .await
         .unwrap();
      assert_eq!((result.rows_affected, result.last_insert_id), (2, 2));

      let result = db
         .execute("UPDATE t SET name = 'X' WHERE id > 0", params![])
         .await
         .unwrap();
      assert_eq!(result.rows_affected, 2);
   }

   #[tokio::test]
   async fn test_last_insert_id_tracks_engine() {
      let (mut db, _temp) = create_test_db().await;
      db.exec("CREATE TABLE t (name TEXT)", params![]).await.unwrap();

      assert_eq!(db.last_insert_id().await.unwrap(), 0);

      let id = db.insert("INSERT INTO t VALUES (?)", params!["a"]).await.unwrap();
      assert_eq!(db.last_insert_id().await.unwrap(), id);

      // Plain exec of an INSERT still moves the engine's rowid
      db.exec("INSERT INTO t VALUES (?)", params!["b"]).await.unwrap();
      assert_eq!(db.last_insert_id().await.unwrap(), id + 1);
   }

   #[tokio::test]
   async fn test_operations_after_close() {
      let (mut db, _temp) = create_test_db().await;
      db.close().await.unwrap();
      assert!(db.is_closed());

      assert!(matches!(
         db.exec("SELECT 1", params![]).await,
         Err(Error::DatabaseClosed)
      ));
      assert!(matches!(db.row("SELECT 1", params![]).await, Err(Error::DatabaseClosed)));
      assert!(matches!(db.query("SELECT 1", params![]).await, Err(Error::DatabaseClosed)));
      assert!(matches!(db.begin().await, Err(Error::DatabaseClosed)));
      assert!(matches!(db.last_insert_id().await, Err(Error::DatabaseClosed)));
   }

   #[tokio::test]
   async fn test_open_in_memory() {
      let mut db = Connection::open_in_memory().await.unwrap();
      assert_eq!(db.path(), Path::new(MEMORY_PATH));

      db.exec("CREATE TABLE t (v INTEGER)", params![]).await.unwrap();
      db.exec("INSERT INTO t VALUES (?)", params![5]).await.unwrap();

      let row = db.row("SELECT v FROM t", params![]).await.unwrap();
      assert_eq!(row["v"], Value::Integer(5));

      db.close().await.unwrap();
   }
}

//! Lazy, forward-only iteration over query results

use futures::TryStreamExt;
use futures::stream::BoxStream;
use sqlx::sqlite::SqliteRow;
use tracing::{debug, trace};

use crate::decode::to_row_map;
use crate::{Result, RowMap};

type RowStream<'c> = BoxStream<'c, std::result::Result<SqliteRow, sqlx::Error>>;

/// Live cursor over the rows of a query.
///
/// Returned by [`Connection::query`](crate::Connection::query) already
/// positioned on the first row. The cursor mutably borrows its connection, so
/// nothing else can run on that connection until the cursor is dropped.
///
/// ## Usage Pattern
///
/// ```text
/// let mut cursor = conn.query("SELECT * FROM goods", params![]).await?;
/// while let Some(row) = cursor.row() {
///    // use row
///    cursor.next().await?;
/// }
/// cursor.close();
/// ```
///
/// `next()` returning `Ok(false)` means the results are exhausted; a failure
/// is always an `Err`. Once exhausted or failed the underlying statement is
/// released and the cursor stays finished.
#[must_use = "a cursor does nothing unless it is driven with next()"]
pub struct ResultCursor<'c> {
   stream: Option<RowStream<'c>>,
   row: Option<RowMap>,
   /// Set once the current row has been moved out by `try_next`
   taken: bool,
   rows_read: u64,
}

impl<'c> ResultCursor<'c> {
   /// Wrap a row stream and pre-fetch the first row
   pub(crate) async fn open(stream: RowStream<'c>) -> Result<Self> {
      let mut cursor = Self {
         stream: Some(stream),
         row: None,
         taken: false,
         rows_read: 0,
      };
      cursor.row = cursor.fetch().await?;
      Ok(cursor)
   }

   /// The current row, `None` once the results are exhausted.
   ///
   /// Also `None` after [`try_next`](Self::try_next) has moved the row out,
   /// so drive a cursor either with `row()`/`next()` or with `try_next()`,
   /// not both.
   pub fn row(&self) -> Option<&RowMap> {
      self.row.as_ref()
   }

   /// Advance to the next row.
   ///
   /// Returns `Ok(true)` when a new row is available through [`row`](Self::row)
   /// and `Ok(false)` at the end of the results.
   pub async fn next(&mut self) -> Result<bool> {
      self.taken = false;
      self.row = None;
      self.row = self.fetch().await?;
      Ok(self.row.is_some())
   }

   /// Move the next unread row out of the cursor.
   ///
   /// ```text
   /// while let Some(row) = cursor.try_next().await? { .. }
   /// ```
   pub async fn try_next(&mut self) -> Result<Option<RowMap>> {
      if self.taken {
         self.next().await?;
      }
      self.taken = true;
      Ok(self.row.take())
   }

   /// Drain all remaining rows, including the current one if it has not been
   /// read yet.
   pub async fn collect(mut self) -> Result<Vec<RowMap>> {
      let mut rows = Vec::new();
      while let Some(row) = self.try_next().await? {
         rows.push(row);
      }
      Ok(rows)
   }

   /// Number of rows materialized so far
   pub fn rows_read(&self) -> u64 {
      self.rows_read
   }

   /// Whether the underlying statement has been released
   pub fn is_closed(&self) -> bool {
      self.stream.is_none()
   }

   /// Release the underlying statement. Calling this more than once is fine.
   pub fn close(&mut self) {
      if self.stream.take().is_some() {
         debug!(rows_read = self.rows_read, "Result cursor released");
      }
      self.row = None;
   }

   async fn fetch(&mut self) -> Result<Option<RowMap>> {
      let Some(stream) = self.stream.as_mut() else {
         return Ok(None);
      };

      let next = match stream.try_next().await {
         Ok(next) => next,
         Err(e) => {
            self.close();
            return Err(e.into());
         }
      };

      match next {
         Some(row) => {
            let map = match to_row_map(&row) {
               Ok(map) => map,
               Err(e) => {
                  self.close();
                  return Err(e);
               }
            };
            self.rows_read += 1;
            trace!(rows_read = self.rows_read, "Fetched row");
            Ok(Some(map))
         }
         None => {
            self.close();
            Ok(None)
         }
      }
   }
}

impl Drop for ResultCursor<'_> {
   fn drop(&mut self) {
      self.close();
   }
}

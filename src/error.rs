//! Error types for sqlx-sqlite-simple

use thiserror::Error;

/// Errors that may occur when working with a [`Connection`](crate::Connection)
#[derive(Error, Debug)]
pub enum Error {
   /// Error reported by the SQLite engine through SQLx. Passed through as-is
   /// (malformed SQL, constraint violations, I/O failures, busy database, ...).
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// The connection has already been closed and cannot be used
   #[error("SQLite database already closed")]
   DatabaseClosed,

   /// SQLite storage class that cannot be mapped to a [`Value`](crate::Value)
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::DatabaseClosed => "DATABASE_CLOSED".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
      }
   }
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_database_closed() {
      let err = Error::DatabaseClosed;
      assert_eq!(err.error_code(), "DATABASE_CLOSED");
      assert_eq!(err.to_string(), "SQLite database already closed");
   }

   #[test]
   fn test_error_code_unsupported_datatype() {
      let err = Error::UnsupportedDatatype("WEIRD".into());
      assert_eq!(err.error_code(), "UNSUPPORTED_DATATYPE");
      assert!(err.to_string().contains("WEIRD"));
   }

   #[test]
   fn test_error_code_sqlx_non_database() {
      // RowNotFound is not a database error, so no SQLite code
      let err = Error::Sqlx(sqlx::Error::RowNotFound);
      assert_eq!(err.error_code(), "SQLX_ERROR");
   }
}

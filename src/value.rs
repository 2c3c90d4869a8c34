//! Dynamic SQLite values used for bound parameters and result cells

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

/// Interpret an integer column as a boolean.
///
/// SQLite has no boolean type, so flags are stored as integers. Anything
/// greater than zero is `true`; zero and negative values are `false`.
pub fn to_boolean(value: i64) -> bool {
   value > 0
}

/// A single SQLite value, one variant per storage class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
   Null,
   Integer(i64),
   Real(f64),
   Text(String),
   Blob(Vec<u8>),
}

impl Value {
   pub fn is_null(&self) -> bool {
      matches!(self, Value::Null)
   }

   pub fn as_i64(&self) -> Option<i64> {
      match self {
         Value::Integer(v) => Some(*v),
         _ => None,
      }
   }

   /// Returns the value as a float. Integers are widened.
   pub fn as_f64(&self) -> Option<f64> {
      match self {
         Value::Real(v) => Some(*v),
         Value::Integer(v) => Some(*v as f64),
         _ => None,
      }
   }

   pub fn as_str(&self) -> Option<&str> {
      match self {
         Value::Text(v) => Some(v),
         _ => None,
      }
   }

   pub fn as_blob(&self) -> Option<&[u8]> {
      match self {
         Value::Blob(v) => Some(v),
         _ => None,
      }
   }

   /// Boolean view of an integer cell, see [`to_boolean`].
   pub fn as_bool(&self) -> Option<bool> {
      self.as_i64().map(to_boolean)
   }

   /// Render the value as JSON. Blobs become standard base64 strings.
   pub fn to_json(&self) -> JsonValue {
      match self {
         Value::Null => JsonValue::Null,
         Value::Integer(v) => JsonValue::from(*v),
         // Non-finite floats have no JSON representation
         Value::Real(v) => serde_json::Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
         Value::Text(v) => JsonValue::String(v.clone()),
         Value::Blob(v) => JsonValue::String(STANDARD.encode(v)),
      }
   }
}

impl From<i64> for Value {
   fn from(v: i64) -> Self {
      Value::Integer(v)
   }
}

impl From<i32> for Value {
   fn from(v: i32) -> Self {
      Value::Integer(v.into())
   }
}

impl From<u32> for Value {
   fn from(v: u32) -> Self {
      Value::Integer(v.into())
   }
}

impl From<bool> for Value {
   fn from(v: bool) -> Self {
      Value::Integer(v as i64)
   }
}

impl From<f64> for Value {
   fn from(v: f64) -> Self {
      Value::Real(v)
   }
}

impl From<&str> for Value {
   fn from(v: &str) -> Self {
      Value::Text(v.to_owned())
   }
}

impl From<String> for Value {
   fn from(v: String) -> Self {
      Value::Text(v)
   }
}

impl From<Vec<u8>> for Value {
   fn from(v: Vec<u8>) -> Self {
      Value::Blob(v)
   }
}

impl From<&[u8]> for Value {
   fn from(v: &[u8]) -> Self {
      Value::Blob(v.to_vec())
   }
}

impl<T: Into<Value>> From<Option<T>> for Value {
   fn from(v: Option<T>) -> Self {
      v.map(Into::into).unwrap_or(Value::Null)
   }
}

impl From<JsonValue> for Value {
   fn from(value: JsonValue) -> Self {
      match value {
         JsonValue::Null => Value::Null,
         JsonValue::Bool(b) => Value::from(b),
         JsonValue::String(s) => Value::Text(s),
         JsonValue::Number(number) => {
            // Preserve integer precision by binding as i64 when possible
            if let Some(int_val) = number.as_i64() {
               Value::Integer(int_val)
            } else if let Some(uint_val) = number.as_u64() {
               // Value too large for i64, use f64 (will lose precision)
               Value::Real(uint_val as f64)
            } else {
               Value::Real(number.as_f64().unwrap_or_default())
            }
         }
         // Arrays and objects are stored as JSON text
         other => Value::Text(other.to_string()),
      }
   }
}

/// Bind a value to a SQLx query as the next positional parameter
pub(crate) fn bind_value<'q>(
   query: Query<'q, Sqlite, SqliteArguments<'q>>,
   value: Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
   match value {
      Value::Null => query.bind(None::<i64>),
      Value::Integer(v) => query.bind(v),
      Value::Real(v) => query.bind(v),
      Value::Text(v) => query.bind(v),
      Value::Blob(v) => query.bind(v),
   }
}

/// Build a `Vec<Value>` of positional parameters from heterogeneous
/// expressions.
///
/// ```
/// use sqlx_sqlite_simple::{params, Value};
///
/// let args = params!["Good 1", 42, 1.5, None::<i64>];
/// assert_eq!(args[1], Value::Integer(42));
/// assert!(args[3].is_null());
/// ```
#[macro_export]
macro_rules! params {
   () => {
      ::std::vec::Vec::<$crate::Value>::new()
   };
   ($($arg:expr),+ $(,)?) => {
      ::std::vec![$($crate::Value::from($arg)),+]
   };
}

//! Materialized result rows

use std::ops::Index;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::Value;

/// One materialized row: column name to value.
///
/// Columns keep the order of the result set. A `RowMap` is a snapshot, it does
/// not track later changes to the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RowMap(IndexMap<String, Value>);

impl RowMap {
   /// Create an empty row
   pub fn new() -> Self {
      Self::default()
   }

   /// Whether the map has no columns at all.
   ///
   /// [`Connection::row`](crate::Connection::row) returns an empty map when
   /// nothing matched, so this doubles as a "not found" check. A row that
   /// genuinely has zero columns looks the same.
   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   /// Number of columns
   pub fn len(&self) -> usize {
      self.0.len()
   }

   /// Value of a column, `None` if the row has no such column
   pub fn get(&self, column: &str) -> Option<&Value> {
      self.0.get(column)
   }

   /// Whether the row has the column
   pub fn contains_key(&self, column: &str) -> bool {
      self.0.contains_key(column)
   }

   /// Set a column, returning the previous value if the column existed
   pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
      self.0.insert(column.into(), value.into())
   }

   /// Column names in result-set order
   pub fn keys(&self) -> impl Iterator<Item = &str> {
      self.0.keys().map(String::as_str)
   }

   /// Columns and values in result-set order
   pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
      self.0.iter().map(|(k, v)| (k.as_str(), v))
   }

   /// Unwrap into the underlying map
   pub fn into_inner(self) -> IndexMap<String, Value> {
      self.0
   }

   /// Render the row as a JSON object
   pub fn to_json(&self) -> IndexMap<String, JsonValue> {
      self
         .0
         .iter()
         .map(|(k, v)| (k.clone(), v.to_json()))
         .collect()
   }
}

impl Index<&str> for RowMap {
   type Output = Value;

   /// Panics if the column is not present.
   fn index(&self, column: &str) -> &Value {
      &self.0[column]
   }
}

impl From<IndexMap<String, Value>> for RowMap {
   fn from(map: IndexMap<String, Value>) -> Self {
      Self(map)
   }
}

impl FromIterator<(String, Value)> for RowMap {
   fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
      Self(iter.into_iter().collect())
   }
}

impl IntoIterator for RowMap {
   type Item = (String, Value);
   type IntoIter = indexmap::map::IntoIter<String, Value>;

   fn into_iter(self) -> Self::IntoIter {
      self.0.into_iter()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn test_is_empty() {
      let mut row = RowMap::new();
      assert!(row.is_empty());

      row.insert("name", Value::Null);
      assert!(!row.is_empty());
      assert_eq!(row.len(), 1);
   }

   #[test]
   fn test_insert_replaces_existing_column() {
      let mut row = RowMap::new();
      assert_eq!(row.insert("id", 1_i64), None);
      assert_eq!(row.insert("id", 2_i64), Some(Value::Integer(1)));
      assert_eq!(row["id"], Value::Integer(2));
   }

   #[test]
   fn test_column_order_and_json() {
      let row: RowMap = [
         ("z".to_string(), Value::Text("last".into())),
         ("a".to_string(), Value::Blob(b"Hello".to_vec())),
      ]
      .into_iter()
      .collect();

      assert_eq!(row.keys().collect::<Vec<_>>(), vec!["z", "a"]);

      let json = serde_json::to_value(row.to_json()).unwrap();
      assert_eq!(json, json!({"z": "last", "a": "SGVsbG8="}));
   }

   #[test]
   fn test_serialize_untagged() {
      let mut row = RowMap::new();
      row.insert("id", 3_i64);
      row.insert("score", 1.5);
      row.insert("note", None::<String>);

      let json = serde_json::to_value(&row).unwrap();
      assert_eq!(json, json!({"id": 3, "score": 1.5, "note": null}));
   }
}

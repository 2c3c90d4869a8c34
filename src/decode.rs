use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row, TypeInfo, Value as _, ValueRef};

use crate::{Error, Result, RowMap, Value};

/// Decode a raw SQLite cell by its storage class
pub(crate) fn to_value(v: SqliteValueRef) -> Result<Value> {
   if v.is_null() {
      return Ok(Value::Null);
   }

   // An owned value reports the runtime storage class, never the declared
   // column type
   let owned = v.to_owned();
   let value = match owned.type_info().name() {
      "INTEGER" => Value::Integer(owned.try_decode_unchecked::<i64>()?),
      "REAL" => Value::Real(owned.try_decode_unchecked::<f64>()?),
      "TEXT" => Value::Text(owned.try_decode_unchecked::<String>()?),
      "BLOB" => Value::Blob(owned.try_decode_unchecked::<Vec<u8>>()?),
      other => return Err(Error::UnsupportedDatatype(other.to_string())),
   };

   Ok(value)
}

/// Materialize every column of a row into a `RowMap`
pub(crate) fn to_row_map(row: &SqliteRow) -> Result<RowMap> {
   let mut map = RowMap::new();
   for (i, column) in row.columns().iter().enumerate() {
      let v = row.try_get_raw(i)?;
      map.insert(column.name(), to_value(v)?);
   }
   Ok(map)
}

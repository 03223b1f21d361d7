//! Positional result rows
//!
//! Rows are materialized into owned values before they leave the pool, so
//! they can cross the `spawn_blocking` boundary and be decoded later, one
//! at a time, by the report builders.

use rusqlite::types::{FromSql, FromSqlError, Type, Value, ValueRef};
use thiserror::Error;

/// Why a single column could not be decoded
#[derive(Error, Debug)]
pub enum RowError {
    /// Row has fewer columns than requested
    #[error("column {index} out of range (row has {len} columns)")]
    MissingColumn { index: usize, len: usize },

    /// Column is NULL but the target type does not accept NULL
    #[error("column {index} is NULL")]
    UnexpectedNull { index: usize },

    /// Column holds a value the target type cannot be built from
    #[error("column {index} ({found}) could not be decoded: {source}")]
    Mismatch {
        index: usize,
        found: Type,
        #[source]
        source: FromSqlError,
    },
}

/// One record returned by a query, consumed by column position
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Decode the column at `index` into `T`
    pub fn get<T: FromSql>(&self, index: usize) -> Result<T, RowError> {
        let value = self.values.get(index).ok_or(RowError::MissingColumn {
            index,
            len: self.values.len(),
        })?;

        T::column_result(ValueRef::from(value)).map_err(|source| match value {
            Value::Null => RowError::UnexpectedNull { index },
            other => RowError::Mismatch {
                index,
                found: other.data_type(),
                source,
            },
        })
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Build a [`Row`] from a list of values convertible into SQLite values.
///
/// ```ignore
/// let row = row![7_i64, "Ada".to_string(), 5.5_f64];
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        $crate::db::Row::from(vec![$(::rusqlite::types::Value::from($value)),*])
    };
}

use crate::DatabaseError;
use derive_more::Deref;

/// A single column value as handed over by a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// One result row. Columns are addressed zero-based.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Fails unless the row has exactly `count` columns.
    pub fn expect_columns(&self, count: usize) -> Result<(), DatabaseError> {
        if self.0.len() == count {
            Ok(())
        } else {
            Err(DatabaseError::Decode {
                column: self.0.len(),
                reason: format!("expected {count} columns, got {}", self.0.len()),
            })
        }
    }

    pub fn text(&self, column: usize) -> Result<&str, DatabaseError> {
        match self.column(column)? {
            Value::Text(text) => Ok(text.trim()),
            other => Err(DatabaseError::Decode {
                column,
                reason: format!("expected text, got {other:?}"),
            }),
        }
    }

    /// Reads a numeric column. Drivers that only hand out text (ODBC in
    /// text mode) are parsed here.
    pub fn f64(&self, column: usize) -> Result<f64, DatabaseError> {
        match self.column(column)? {
            Value::Int(value) => Ok(*value as f64),
            Value::Float(value) => Ok(*value),
            Value::Text(text) => text.trim().parse::<f64>().map_err(|e| DatabaseError::Decode {
                column,
                reason: format!("`{}` is not numeric: {e}", text.trim()),
            }),
            Value::Null => Err(DatabaseError::Decode {
                column,
                reason: "value is NULL".to_string(),
            }),
        }
    }

    fn column(&self, column: usize) -> Result<&Value, DatabaseError> {
        self.0.get(column).ok_or_else(|| DatabaseError::Decode {
            column,
            reason: format!("row has only {} columns", self.0.len()),
        })
    }
}

impl<V: Into<Value>> FromIterator<V> for Row {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`Row`] from heterogeneous column values.
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        $crate::database::Row::new(vec![$($crate::database::Value::from($value)),*])
    };
}

use super::{
    Connection,
    Connector,
    Row,
    Value,
};
use crate::DatabaseError;
use odbc_api::{
    ConnectionOptions,
    Cursor,
    Environment,
    ResultSetMetadata,
};

/// [`Connector`] backed by the system ODBC driver manager.
pub struct OdbcConnector {
    environment: Environment,
    login_timeout_sec: Option<u32>,
}

impl OdbcConnector {
    pub fn new(login_timeout_sec: Option<u32>) -> Result<Self, DatabaseError> {
        let environment = Environment::new().map_err(|e| DatabaseError::Connect {
            target: "ODBC environment".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            environment,
            login_timeout_sec,
        })
    }
}

impl Connector for OdbcConnector {
    fn connect(&self, target: &str) -> Result<Box<dyn Connection + '_>, DatabaseError> {
        let options = ConnectionOptions {
            login_timeout_sec: self.login_timeout_sec,
            ..ConnectionOptions::default()
        };
        let connection = self
            .environment
            .connect_with_connection_string(target, options)
            .map_err(|e| DatabaseError::Connect {
                target: target.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Box::new(OdbcConnection { connection }))
    }
}

struct OdbcConnection<'env> {
    connection: odbc_api::Connection<'env>,
}

fn query_error(error: odbc_api::Error) -> DatabaseError {
    DatabaseError::Query(error.to_string())
}

impl Connection for OdbcConnection<'_> {
    fn ping(&mut self) -> Result<(), DatabaseError> {
        match self.connection.is_dead() {
            Ok(false) => Ok(()),
            Ok(true) => Err(DatabaseError::Ping("driver reports the connection as dead".to_string())),
            Err(e) => Err(DatabaseError::Ping(e.to_string())),
        }
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        let Some(mut cursor) = self.connection.execute(sql, ()).map_err(query_error)? else {
            return Ok(Vec::new());
        };

        let columns = cursor.num_result_cols().map_err(query_error)?;
        let columns = u16::try_from(columns).unwrap_or(0);

        let mut rows = Vec::new();
        let mut buffer = Vec::new();
        while let Some(mut row) = cursor.next_row().map_err(query_error)? {
            let mut values = Vec::with_capacity(usize::from(columns));
            for column in 1..=columns {
                buffer.clear();
                let value = if row.get_text(column, &mut buffer).map_err(query_error)? {
                    Value::Text(String::from_utf8_lossy(&buffer).into_owned())
                } else {
                    Value::Null
                };
                values.push(value);
            }
            rows.push(Row::new(values));
        }

        trace!(rows = rows.len(), columns, "query finished");
        Ok(rows)
    }
}

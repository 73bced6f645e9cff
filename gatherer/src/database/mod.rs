//! # Database capability
//!
//! The scrape loop only needs four things from a driver: open a connection,
//! check that it is alive, run a query to completion and close the
//! connection again (on drop). [`Connector`] and [`Connection`] capture
//! exactly that so the orchestration can be driven by ODBC in production and
//! by [`MemoryConnector`] in tests.

mod memory;
#[cfg(feature = "odbc")]
mod odbc;
mod row;

use crate::DatabaseError;
pub use memory::{
    MemoryConnector,
    MemoryServer,
};
#[cfg(feature = "odbc")]
pub use odbc::OdbcConnector;
pub use row::{
    Row,
    Value,
};

/// Opens connections to server instances.
pub trait Connector: Send + Sync {
    /// Opens a connection. Dropping the returned handle closes it.
    fn connect(&self, target: &str) -> Result<Box<dyn Connection + '_>, DatabaseError>;
}

/// An open connection to one server instance.
pub trait Connection {
    fn ping(&mut self) -> Result<(), DatabaseError>;

    /// Runs `sql` and reads the complete result set. Single attempt, no retry.
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, DatabaseError>;
}

use super::{
    Connection,
    Connector,
    Row,
};
use crate::DatabaseError;
use std::{
    collections::HashMap,
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
        PoisonError,
    },
};

/// Scripted behaviour of one server behind a [`MemoryConnector`].
#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    refuse_connections: bool,
    dead: bool,
    results: HashMap<String, Result<Vec<Row>, String>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server that refuses every connection attempt.
    pub fn unreachable() -> Self {
        Self {
            refuse_connections: true,
            ..Self::default()
        }
    }

    /// A server that accepts connections which then fail the liveness check.
    pub fn dead() -> Self {
        Self {
            dead: true,
            ..Self::default()
        }
    }

    pub fn with_rows(mut self, sql: &str, rows: Vec<Row>) -> Self {
        self.results.insert(sql.to_string(), Ok(rows));
        self
    }

    pub fn with_failure(mut self, sql: &str, message: &str) -> Self {
        self.results.insert(sql.to_string(), Err(message.to_string()));
        self
    }
}

/// In-memory [`Connector`] keyed by connection target.
///
/// Servers can be replaced between scrapes to simulate changing data. The
/// connector counts connections that are currently open so callers can check
/// that every connection was closed.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    servers: Arc<Mutex<HashMap<String, MemoryServer>>>,
    open: Arc<AtomicUsize>,
    opened_total: Arc<AtomicUsize>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(self, target: &str, server: MemoryServer) -> Self {
        self.set_server(target, server);
        self
    }

    pub fn set_server(&self, target: &str, server: MemoryServer) {
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.to_string(), server);
    }

    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn connections_opened(&self) -> usize {
        self.opened_total.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, target: &str) -> Result<Box<dyn Connection + '_>, DatabaseError> {
        let server = self
            .servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned();

        match server {
            Some(server) if !server.refuse_connections => {
                self.open.fetch_add(1, Ordering::SeqCst);
                self.opened_total.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(MemoryConnection {
                    server,
                    open: self.open.clone(),
                }))
            }
            Some(_) => Err(DatabaseError::Connect {
                target: target.to_string(),
                reason: "connection refused".to_string(),
            }),
            None => Err(DatabaseError::Connect {
                target: target.to_string(),
                reason: "unknown data source".to_string(),
            }),
        }
    }
}

struct MemoryConnection {
    server: MemoryServer,
    open: Arc<AtomicUsize>,
}

impl Connection for MemoryConnection {
    fn ping(&mut self) -> Result<(), DatabaseError> {
        if self.server.dead {
            Err(DatabaseError::Ping("server is not responding".to_string()))
        } else {
            Ok(())
        }
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        match self.server.results.get(sql) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(message)) => Err(DatabaseError::Query(message.clone())),
            None => Err(DatabaseError::Query(format!("no result scripted for `{sql}`"))),
        }
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

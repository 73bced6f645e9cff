/// Failure of a single database interaction. Every variant is scoped: a
/// connection error costs one instance one cycle, a query error one query
/// group, a decode error one row.
#[derive(thiserror::Error, Debug)]
pub enum DatabaseError {
    #[error("cannot connect to `{target}`: {reason}")]
    Connect { target: String, reason: String },
    #[error("liveness check failed: {0}")]
    Ping(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("cannot decode column {column}: {reason}")]
    Decode { column: usize, reason: String },
}

/// Inconsistent gauge family definitions. Fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("gauge family `{0}` is defined more than once")]
    DuplicateFamily(String),
    #[error("invalid gauge family `{name}`: {source}")]
    InvalidFamily {
        name: String,
        #[source]
        source: prometheus::Error,
    },
}

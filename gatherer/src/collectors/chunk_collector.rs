use crate::{
    collectors::{
        collector::route_keyed_rows,
        CollectReport,
        Collector,
    },
    database::Connection,
    metrics::MetricRegistry,
    DatabaseError,
};

/// Per chunk file I/O; value columns match the chunk catalog order.
pub const CHUNK_QUERY: &str = "select fname, pagesread, pageswritten, readtime, writetime from sysmaster:syschktab";

#[derive(Debug, Default)]
pub struct ChunkCollector;

impl ChunkCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for ChunkCollector {
    fn name(&self) -> &'static str {
        "chunk"
    }

    fn collect(
        &self,
        connection: &mut dyn Connection,
        informixserver: &str,
        registry: &MetricRegistry,
    ) -> Result<CollectReport, DatabaseError> {
        let rows = connection.query(CHUNK_QUERY)?;
        Ok(route_keyed_rows(rows, registry.chunk(), informixserver))
    }
}

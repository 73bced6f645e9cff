use crate::{
    collectors::{
        CollectReport,
        Collector,
    },
    database::Connection,
    metrics::{
        MetricRegistry,
        AUTOMATIC,
    },
    DatabaseError,
};

/// Name/value pairs of the shared memory header.
pub const SERVER_COUNTERS_QUERY: &str = "select name, value from sysmaster:sysshmhdr";

/// Routes shared memory header counters to the server counter families.
/// Counter names the catalog does not know are ignored, newer engine
/// versions expose more of them.
#[derive(Debug, Default)]
pub struct ServerCollector;

impl ServerCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for ServerCollector {
    fn name(&self) -> &'static str {
        "server"
    }

    fn collect(
        &self,
        connection: &mut dyn Connection,
        informixserver: &str,
        registry: &MetricRegistry,
    ) -> Result<CollectReport, DatabaseError> {
        let rows = connection.query(SERVER_COUNTERS_QUERY)?;
        let mut report = CollectReport::default();

        for row in rows {
            let name = match row.text(0) {
                Ok(name) => name,
                Err(error) => {
                    warn!(%error, "skipping shared memory row");
                    report.skipped_rows += 1;
                    continue;
                }
            };

            let Some(family) = registry.server_counter(name) else {
                trace!(counter = name, "ignoring unknown counter");
                report.ignored_rows += 1;
                continue;
            };

            match row.f64(1) {
                Ok(value) => {
                    family.set(&[informixserver, AUTOMATIC], value);
                    report.applied += 1;
                }
                Err(error) => {
                    warn!(counter = name, %error, "skipping shared memory row");
                    report.skipped_rows += 1;
                }
            }
        }

        Ok(report)
    }
}

use crate::{
    collectors::{
        CollectReport,
        Collector,
    },
    database::Connection,
    metrics::MetricRegistry,
    DatabaseError,
};
use informix_exporter_config::ProbeDefinition;

/// Runs the user supplied probes. A failing probe is logged and skipped, the
/// remaining probes still run, so this group never fails as a whole.
pub struct CustomCollector {
    probes: Vec<ProbeDefinition>,
}

impl CustomCollector {
    pub fn new(probes: Vec<ProbeDefinition>) -> Self {
        Self { probes }
    }
}

impl Collector for CustomCollector {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn collect(
        &self,
        connection: &mut dyn Connection,
        informixserver: &str,
        registry: &MetricRegistry,
    ) -> Result<CollectReport, DatabaseError> {
        let mut report = CollectReport::default();

        for probe in &self.probes {
            let Some(family) = registry.custom(&probe.name) else {
                warn!(probe = %probe.name, "no family registered for probe");
                continue;
            };

            let rows = match connection.query(&probe.query) {
                Ok(rows) => rows,
                Err(error) => {
                    warn!(probe = %probe.name, %error, "custom probe failed");
                    report.failed_queries += 1;
                    continue;
                }
            };

            for row in rows {
                match row.expect_columns(1).and_then(|()| row.f64(0)) {
                    Ok(value) => {
                        family.set(&[informixserver, probe.label.as_str()], value);
                        report.applied += 1;
                    }
                    Err(error) => {
                        warn!(probe = %probe.name, %error, "skipping probe row");
                        report.skipped_rows += 1;
                    }
                }
            }
        }

        Ok(report)
    }
}

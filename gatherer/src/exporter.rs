use crate::{
    collectors::Orchestrator,
    database::Connector,
    metrics::{
        Family,
        MetricRegistry,
    },
    RegistryError,
};
use informix_exporter_config::Config;
use prometheus::{
    core::Desc,
    proto::MetricFamily,
};
use std::sync::Arc;

/// The collector handed to a `prometheus::Registry`.
///
/// Every `collect` call runs a full scrape cycle before reading back the
/// families, so the scrape interval of the Prometheus server is the only
/// polling cadence. There is no background loop.
pub struct InformixExporter {
    orchestrator: Orchestrator,
}

impl InformixExporter {
    pub fn new(config: &Config, connector: Arc<dyn Connector>) -> Result<Self, RegistryError> {
        Ok(Self {
            orchestrator: Orchestrator::new(config, connector)?,
        })
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn registry(&self) -> &MetricRegistry {
        self.orchestrator.registry()
    }
}

impl prometheus::core::Collector for InformixExporter {
    fn desc(&self) -> Vec<&Desc> {
        self.registry().families().flat_map(Family::desc).collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let report = self.orchestrator.scrape();
        trace!(?report, "scrape report");
        self.registry().families().flat_map(Family::collect).collect()
    }
}

use crate::{
    collectors::{
        ChunkCollector,
        CollectReport,
        Collector,
        CustomCollector,
        DbspaceCollector,
        ServerCollector,
    },
    database::{
        Connection,
        Connector,
    },
    metrics::{
        Catalogs,
        MetricRegistry,
    },
    DatabaseError,
    RegistryError,
};
use informix_exporter_config::{
    Config,
    ServerInstance,
    Staleness,
};
use std::{
    sync::Arc,
    thread,
    time::{
        Duration,
        Instant,
    },
};
use tracing::Span;

/// What happened to one query group of one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    Collected(CollectReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceOutcome {
    /// Connecting or the liveness check failed; no group ran.
    Unreachable(String),
    /// Outcome of every group, in execution order.
    Scraped(Vec<(&'static str, GroupOutcome)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceReport {
    pub informixserver: String,
    pub outcome: InstanceOutcome,
}

impl InstanceReport {
    pub fn is_reachable(&self) -> bool {
        matches!(self.outcome, InstanceOutcome::Scraped(_))
    }

    pub fn group(&self, name: &str) -> Option<&GroupOutcome> {
        match &self.outcome {
            InstanceOutcome::Scraped(groups) => groups
                .iter()
                .find(|(group, _)| *group == name)
                .map(|(_, outcome)| outcome),
            InstanceOutcome::Unreachable(_) => None,
        }
    }
}

/// Result of one scrape cycle across all instances.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub cycle: u64,
    pub elapsed: Duration,
    pub instances: Vec<InstanceReport>,
}

impl ScrapeReport {
    pub fn instance(&self, informixserver: &str) -> Option<&InstanceReport> {
        self.instances
            .iter()
            .find(|instance| instance.informixserver == informixserver)
    }

    pub fn reachable(&self) -> usize {
        self.instances.iter().filter(|instance| instance.is_reachable()).count()
    }
}

/// Visits every configured instance and runs all query groups against it.
///
/// Failures never escape a cycle: an unreachable instance is skipped, a
/// failing group is skipped, and the cycle always runs to completion.
pub struct Orchestrator {
    servers: Vec<ServerInstance>,
    connector: Arc<dyn Connector>,
    collectors: Vec<Box<dyn Collector>>,
    registry: MetricRegistry,
    staleness: Staleness,
    parallel: bool,
}

impl Orchestrator {
    /// Builds the registry from the configured probes and the built-in
    /// catalogs and sets up the four query groups.
    pub fn new(config: &Config, connector: Arc<dyn Connector>) -> Result<Self, RegistryError> {
        let registry = MetricRegistry::build(&config.metrics, &Catalogs::BUILTIN)?;

        let collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(CustomCollector::new(config.metrics.clone())),
            Box::new(ServerCollector::new()),
            Box::new(ChunkCollector::new()),
            Box::new(DbspaceCollector::new()),
        ];

        Ok(Self {
            servers: config.servers.clone(),
            connector,
            collectors,
            registry,
            staleness: config.staleness,
            parallel: config.parallel,
        })
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn servers(&self) -> &[ServerInstance] {
        &self.servers
    }

    /// Runs one scrape cycle synchronously.
    pub fn scrape(&self) -> ScrapeReport {
        let cycle = self.registry.begin_cycle();
        let start = Instant::now();

        let instances = if self.parallel && self.servers.len() > 1 {
            self.scrape_parallel(cycle)
        } else {
            self.servers
                .iter()
                .map(|server| self.scrape_instance(server, cycle))
                .collect()
        };

        let report = ScrapeReport {
            cycle,
            elapsed: start.elapsed(),
            instances,
        };
        debug!(
            cycle,
            reachable = report.reachable(),
            instances = report.instances.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scrape finished"
        );
        report
    }

    fn scrape_parallel(&self, cycle: u64) -> Vec<InstanceReport> {
        let parent = Span::current();
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .servers
                .iter()
                .map(|server| {
                    let parent = parent.clone();
                    let handle = scope.spawn(move || parent.in_scope(|| self.scrape_instance(server, cycle)));
                    (server, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(server, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        error!(informixserver = %server.informixserver, "scrape thread panicked");
                        InstanceReport {
                            informixserver: server.informixserver.clone(),
                            outcome: InstanceOutcome::Unreachable("scrape thread panicked".to_string()),
                        }
                    })
                })
                .collect()
        })
    }

    fn open(&self, server: &ServerInstance) -> Result<Box<dyn Connection + '_>, DatabaseError> {
        let mut connection = self.connector.connect(&server.connection_target())?;
        connection.ping()?;
        Ok(connection)
    }

    fn scrape_instance(&self, server: &ServerInstance, cycle: u64) -> InstanceReport {
        let span = info_span!("scrape_instance", informixserver = %server.informixserver);
        let _entered = span.enter();
        let informixserver = server.informixserver.as_str();

        let outcome = match self.open(server) {
            Ok(mut connection) => {
                self.registry.up().set(&[informixserver], 1.0);
                let groups = self
                    .collectors
                    .iter()
                    .map(|collector| {
                        let outcome = match collector.collect(&mut *connection, informixserver, &self.registry) {
                            Ok(report) => {
                                debug!(collector = collector.name(), ?report, "query group collected");
                                GroupOutcome::Collected(report)
                            }
                            Err(error) => {
                                warn!(collector = collector.name(), %error, "query group failed");
                                GroupOutcome::Failed(error.to_string())
                            }
                        };
                        (collector.name(), outcome)
                    })
                    .collect();
                drop(connection);
                InstanceOutcome::Scraped(groups)
            }
            Err(error) => {
                warn!(%error, "instance unreachable, skipping");
                self.registry.up().set(&[informixserver], 0.0);
                InstanceOutcome::Unreachable(error.to_string())
            }
        };

        if self.staleness == Staleness::Drop {
            let removed = self.registry.sweep_instance(informixserver, cycle);
            if removed > 0 {
                debug!(removed, "dropped series not refreshed in this cycle");
            }
        }

        InstanceReport {
            informixserver: server.informixserver.clone(),
            outcome,
        }
    }
}

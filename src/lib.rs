#[macro_use]
extern crate tracing;

mod logging;

use color_eyre::Result;
use eyre::Context as _;
pub use informix_exporter_config::{
    Args,
    Config,
};
use informix_exporter_gatherer::{
    database::Connector,
    InformixExporter,
};
pub use logging::init_logging;
use std::sync::Arc;

pub fn init_errors() -> Result<()> {
    color_eyre::install()
}

/// Loads the configuration, registers the exporter and serves `/metrics`
/// until shutdown.
pub async fn run(args: Args) -> Result<()> {
    let config = Config::new(&args).wrap_err_with(|| format!("Failed to load {}", args.config.display()))?;
    config.validate()?;

    info!(
        servers = config.servers.len(),
        probes = config.metrics.len(),
        staleness = %config.staleness,
        parallel = config.parallel,
        "starting informix exporter"
    );

    let exporter = InformixExporter::new(&config, connector(&config)?)?;
    let registry = prometheus::Registry::new();
    registry.register(Box::new(exporter))?;

    let router = informix_exporter_http::create_router(registry, &config.metrics_path);
    informix_exporter_http::serve(config.listen_address, router).await
}

#[cfg(feature = "odbc")]
fn connector(config: &Config) -> Result<Arc<dyn Connector>> {
    let connector = informix_exporter_gatherer::database::OdbcConnector::new(config.login_timeout_secs)?;
    Ok(Arc::new(connector))
}

#[cfg(not(feature = "odbc"))]
fn connector(_config: &Config) -> Result<Arc<dyn Connector>> {
    Err(eyre::eyre!(
        "this build has no database driver; rebuild with `--features odbc`"
    ))
}

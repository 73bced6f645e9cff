use crate::Staleness;
use clap::Parser;
use std::{
    net::SocketAddr,
    path::PathBuf,
};

/// Prometheus exporter for Informix engine metrics
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the exporter configuration file (yaml).
    #[clap(
        long,
        short,
        env = "INFORMIX_EXPORTER_CONFIG",
        default_value = "informix-exporter.yaml",
        value_name = "FILE"
    )]
    pub config: PathBuf,

    /// Address the metrics endpoint listens on. Overrides `listen_address`.
    #[clap(long, value_name = "ADDRESS")]
    pub listen_address: Option<SocketAddr>,

    /// HTTP path serving the metrics. Overrides `metrics_path`.
    #[clap(long, value_name = "PATH")]
    pub metrics_path: Option<String>,

    /// What happens to series that were not refreshed during a scrape.
    #[clap(long, value_enum, value_name = "POLICY")]
    pub staleness: Option<Staleness>,

    /// Scrape all instances concurrently instead of one after another.
    #[clap(long, action)]
    pub parallel: bool,

    /// Log filter directive, e.g. `debug` or `informix_exporter_gatherer=trace`.
    /// Takes precedence over `RUST_LOG`.
    #[clap(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(listen_address) = &self.listen_address {
                cache.insert("listen_address".to_string(), listen_address.to_string().into());
            }
            if let Some(metrics_path) = &self.metrics_path {
                cache.insert("metrics_path".to_string(), metrics_path.clone().into());
            }
            if let Some(staleness) = &self.staleness {
                cache.insert("staleness".to_string(), staleness.to_string().into());
            }
            if self.parallel {
                cache.insert("parallel".to_string(), true.into());
            }
            Ok(cache)
        }
    }
}

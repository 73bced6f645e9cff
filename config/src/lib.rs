#[macro_use]
extern crate tracing;

mod args;
mod probe;
mod server;

pub use args::Args;
use eyre::{
    eyre,
    Result,
};
pub use probe::ProbeDefinition;
use serde::{
    Deserialize,
    Serialize,
};
pub use server::ServerInstance;
use std::{
    collections::HashSet,
    net::SocketAddr,
};

/// What happens to a series that was not written during a scrape cycle.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Staleness {
    /// Keep the last known value until the series is written again.
    #[default]
    Retain,
    /// Remove every series of an instance that was not refreshed in the cycle.
    Drop,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub listen_address: SocketAddr,
    pub metrics_path: String,
    #[serde(default)]
    pub staleness: Staleness,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_timeout_secs: Option<u32>,
    #[serde(default)]
    pub servers: Vec<ServerInstance>,
    /// Custom probes, one gauge family each.
    #[serde(default)]
    pub metrics: Vec<ProbeDefinition>,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

const ENV_PREFIX: &str = "INFORMIX_EXPORTER";

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    /// Layers the built-in defaults, the configuration file named by `args`,
    /// `INFORMIX_EXPORTER_*` environment variables and finally the command
    /// line overrides.
    pub fn new(args: &Args) -> Result<Self, config::ConfigError> {
        debug!(path = ?args.config, "loading configuration");

        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(config::File::from(args.config.as_path()).format(config::FileFormat::Yaml))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .add_source(args.clone());

        builder.build()?.try_deserialize()
    }

    /// Parses a configuration document on top of the built-in defaults.
    pub fn from_yaml(content: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(config::File::from_str(content, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }

    /// Checks the parts of the configuration the gauge registry does not
    /// already validate on construction.
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            return Err(eyre!("config.servers must be non-empty"));
        }

        let mut seen = HashSet::new();
        for server in &self.servers {
            if server.informixserver.trim().is_empty() {
                return Err(eyre!("config.servers contains an entry without informixserver"));
            }
            if !seen.insert(server.informixserver.as_str()) {
                return Err(eyre!("informixserver `{}` is configured twice", server.informixserver));
            }
        }

        if !self.metrics_path.starts_with('/') {
            return Err(eyre!("metrics_path must start with `/`, got `{}`", self.metrics_path));
        }

        Ok(())
    }
}

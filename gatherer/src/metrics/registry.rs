use super::catalog::{
    Catalog,
    Catalogs,
    INSTANCE_LABEL,
    NAMESPACE,
};
use crate::RegistryError;
use informix_exporter_config::ProbeDefinition;
use prometheus::{
    core::{
        Collector,
        Desc,
    },
    proto::MetricFamily,
    GaugeVec,
    Opts,
};
use std::{
    collections::{
        BTreeMap,
        HashMap,
        HashSet,
    },
    iter,
    sync::{
        atomic::{
            AtomicU64,
            Ordering,
        },
        Arc,
        Mutex,
        PoisonError,
    },
};

const UP_KEY: &str = "up";
const UP_HELP: &str = "Whether the last scrape could connect to the instance (1) or not (0)";

/// A gauge family with a fixed label schema.
///
/// Every write is stamped with the scrape cycle it happened in so that
/// series of an instance which were not refreshed can be swept.
pub struct Family {
    key: String,
    name: String,
    labels: Vec<String>,
    gauge: GaugeVec,
    written: Mutex<HashMap<Vec<String>, u64>>,
    clock: Arc<AtomicU64>,
}

impl Family {
    fn new(key: &str, help: &str, labels: &[&str], clock: Arc<AtomicU64>) -> Result<Self, RegistryError> {
        let gauge = GaugeVec::new(Opts::new(key, help).namespace(NAMESPACE), labels).map_err(|source| {
            RegistryError::InvalidFamily {
                name: format!("{NAMESPACE}_{key}"),
                source,
            }
        })?;

        Ok(Self {
            key: key.to_string(),
            name: format!("{NAMESPACE}_{key}"),
            labels: labels.iter().map(|label| label.to_string()).collect(),
            gauge,
            written: Mutex::new(HashMap::new()),
            clock,
        })
    }

    /// Catalog key or probe name, without namespace.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fully qualified family name as exposed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Sets the latest value of one label combination.
    pub fn set(&self, label_values: &[&str], value: f64) {
        match self.gauge.get_metric_with_label_values(label_values) {
            Ok(gauge) => {
                gauge.set(value);
                let stamp = self.clock.load(Ordering::SeqCst);
                self.written
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(label_values.iter().map(|value| value.to_string()).collect(), stamp);
            }
            Err(error) => warn!(family = %self.name, ?label_values, %error, "rejected label values"),
        }
    }

    /// Current value of one label combination, if it was ever written.
    pub fn value(&self, label_values: &[&str]) -> Option<f64> {
        let key: Vec<String> = label_values.iter().map(|value| value.to_string()).collect();
        if !self
            .written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
        {
            return None;
        }
        self.gauge
            .get_metric_with_label_values(label_values)
            .ok()
            .map(|gauge| gauge.get())
    }

    /// All current samples, ordered by label values.
    pub fn samples(&self) -> Vec<(Vec<String>, f64)> {
        let written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        let mut samples: Vec<_> = written
            .keys()
            .filter_map(|key| {
                let values: Vec<&str> = key.iter().map(String::as_str).collect();
                self.gauge
                    .get_metric_with_label_values(&values)
                    .ok()
                    .map(|gauge| (key.clone(), gauge.get()))
            })
            .collect();
        samples.sort_by(|a, b| a.0.cmp(&b.0));
        samples
    }

    /// Removes the series of `instance` that were last written before `cycle`.
    fn sweep(&self, instance: &str, cycle: u64) -> usize {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        let stale: Vec<Vec<String>> = written
            .iter()
            .filter(|(key, stamp)| key.first().is_some_and(|first| first == instance) && **stamp < cycle)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            written.remove(key);
            let values: Vec<&str> = key.iter().map(String::as_str).collect();
            if let Err(error) = self.gauge.remove_label_values(&values) {
                debug!(family = %self.name, %error, "series already gone");
            }
        }
        stale.len()
    }

    pub(crate) fn desc(&self) -> Vec<&Desc> {
        self.gauge.desc()
    }

    pub(crate) fn collect(&self) -> Vec<MetricFamily> {
        self.gauge.collect()
    }
}

/// Every gauge family the exporter exposes, built once at startup.
pub struct MetricRegistry {
    up: Family,
    custom: BTreeMap<String, Family>,
    server: BTreeMap<&'static str, Family>,
    chunk: Vec<Family>,
    dbspace: Vec<Family>,
    clock: Arc<AtomicU64>,
}

fn claim(claimed: &mut HashSet<String>, key: &str) -> Result<(), RegistryError> {
    if claimed.insert(key.to_string()) {
        Ok(())
    } else {
        Err(RegistryError::DuplicateFamily(format!("{NAMESPACE}_{key}")))
    }
}

impl MetricRegistry {
    /// Builds one family per custom probe plus one per catalog entry. Fails
    /// if any two families would share a name or a definition is rejected by
    /// prometheus (invalid metric or label name).
    pub fn build(probes: &[ProbeDefinition], catalogs: &Catalogs) -> Result<Self, RegistryError> {
        let clock = Arc::new(AtomicU64::new(0));
        let mut claimed = HashSet::new();

        claim(&mut claimed, UP_KEY)?;
        let up = Family::new(UP_KEY, UP_HELP, &[INSTANCE_LABEL], clock.clone())?;

        let mut custom = BTreeMap::new();
        for probe in probes {
            claim(&mut claimed, &probe.name)?;
            let family = Family::new(
                &probe.name,
                probe.help(),
                &[INSTANCE_LABEL, probe.label.as_str()],
                clock.clone(),
            )?;
            custom.insert(probe.name.clone(), family);
        }

        let mut server = BTreeMap::new();
        for entry in catalogs.server.entries {
            claim(&mut claimed, entry.key)?;
            let family = Family::new(entry.key, entry.help, catalogs.server.labels, clock.clone())?;
            server.insert(entry.key, family);
        }

        let chunk = Self::catalog_families(&catalogs.chunk, &mut claimed, &clock)?;
        let dbspace = Self::catalog_families(&catalogs.dbspace, &mut claimed, &clock)?;

        debug!(
            custom = custom.len(),
            server = server.len(),
            chunk = chunk.len(),
            dbspace = dbspace.len(),
            "built metric registry"
        );

        Ok(Self {
            up,
            custom,
            server,
            chunk,
            dbspace,
            clock,
        })
    }

    fn catalog_families(
        catalog: &Catalog,
        claimed: &mut HashSet<String>,
        clock: &Arc<AtomicU64>,
    ) -> Result<Vec<Family>, RegistryError> {
        catalog
            .entries
            .iter()
            .map(|entry| {
                claim(claimed, entry.key)?;
                Family::new(entry.key, entry.help, catalog.labels, clock.clone())
            })
            .collect()
    }

    pub fn up(&self) -> &Family {
        &self.up
    }

    pub fn custom(&self, probe: &str) -> Option<&Family> {
        self.custom.get(probe)
    }

    pub fn server_counter(&self, key: &str) -> Option<&Family> {
        self.server.get(key)
    }

    /// Chunk families in catalog order.
    pub fn chunk(&self) -> &[Family] {
        &self.chunk
    }

    /// Dbspace families in catalog order.
    pub fn dbspace(&self) -> &[Family] {
        &self.dbspace
    }

    /// Looks a family up by its unqualified key.
    pub fn family(&self, key: &str) -> Option<&Family> {
        self.families().find(|family| family.key() == key)
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        iter::once(&self.up)
            .chain(self.custom.values())
            .chain(self.server.values())
            .chain(self.chunk.iter())
            .chain(self.dbspace.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.custom.len() + self.server.len() + self.chunk.len() + self.dbspace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a scrape cycle. Writes from now on carry the returned stamp.
    pub(crate) fn begin_cycle(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Removes every series of `instance` not written during `cycle`.
    pub(crate) fn sweep_instance(&self, instance: &str, cycle: u64) -> usize {
        self.families().map(|family| family.sweep(instance, cycle)).sum()
    }
}

use crate::{
    database::{
        Connection,
        Row,
    },
    metrics::{
        Family,
        MetricRegistry,
        AUTOMATIC,
    },
    DatabaseError,
};

/// Row counts of one query group run against one instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectReport {
    /// Rows that updated at least one family.
    pub applied: usize,
    /// Rows that could not be decoded.
    pub skipped_rows: usize,
    /// Rows without a matching family (unknown counter names).
    pub ignored_rows: usize,
    /// Queries of the group that failed outright.
    pub failed_queries: usize,
}

/// A group of queries whose rows are routed into the registry.
///
/// Each group is its own failure boundary: an `Err` means none of its rows
/// were applied, and the orchestrator moves on to the next group.
pub trait Collector: Send + Sync {
    /// Get the name of this collector
    fn name(&self) -> &'static str;

    /// Run the group's queries on `connection` and set the families of
    /// `informixserver`.
    fn collect(
        &self,
        connection: &mut dyn Connection,
        informixserver: &str,
        registry: &MetricRegistry,
    ) -> Result<CollectReport, DatabaseError>;
}

/// Routes rows shaped `(name, value_1, .., value_n)` to `families`, where
/// `families[i]` receives `value_{i+1}` under the labels
/// `(informixserver, name, family key, "automatic")`. A row is applied
/// completely or not at all.
pub(crate) fn route_keyed_rows(rows: Vec<Row>, families: &[Family], informixserver: &str) -> CollectReport {
    let mut report = CollectReport::default();

    for row in rows {
        let decoded = row.text(0).and_then(|name| {
            let values = (1..=families.len())
                .map(|column| row.f64(column))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((name, values))
        });

        match decoded {
            Ok((name, values)) => {
                for (family, value) in families.iter().zip(values) {
                    family.set(&[informixserver, name, family.key(), AUTOMATIC], value);
                }
                report.applied += 1;
            }
            Err(error) => {
                warn!(%error, "skipping row");
                report.skipped_rows += 1;
            }
        }
    }

    report
}

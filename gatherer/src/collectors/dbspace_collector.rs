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

/// Free space in MB per dbspace. Regular chunks count free pages in `nfree`,
/// smart blob chunks in `udfree`; both assume 2K pages.
pub const DBSPACE_QUERY: &str = "\
select dbs.name[1,20] dbspace, round(sum(chk.nfree) * 2 / 1024, 2) mbfree
from sysmaster:sysdbspaces dbs, sysmaster:syschunks chk
where dbs.dbsnum = chk.dbsnum and chk.is_sbchunk <> 1
group by dbs.name
union
select dbs.name[1,20] dbspace, round(sum(chk.udfree) * 2 / 1024, 2) mbfree
from sysmaster:sysdbspaces dbs, sysmaster:syschunks chk
where dbs.dbsnum = chk.dbsnum and chk.is_sbchunk = 1
group by dbs.name
order by 1";

#[derive(Debug, Default)]
pub struct DbspaceCollector;

impl DbspaceCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for DbspaceCollector {
    fn name(&self) -> &'static str {
        "dbspace"
    }

    fn collect(
        &self,
        connection: &mut dyn Connection,
        informixserver: &str,
        registry: &MetricRegistry,
    ) -> Result<CollectReport, DatabaseError> {
        let rows = connection.query(DBSPACE_QUERY)?;
        Ok(route_keyed_rows(rows, registry.dbspace(), informixserver))
    }
}

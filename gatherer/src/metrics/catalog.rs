//! Built-in counter catalogs. Adding a counter is a table change here; the
//! registry and the collectors pick it up without further code.

/// Prefix of every exported family.
pub const NAMESPACE: &str = "informix";

/// First label of every family: the configured server identifier.
pub const INSTANCE_LABEL: &str = "informixserver";

/// Constant tag marking series sourced from built-in queries.
pub const AUTOMATIC: &str = "automatic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub help: &'static str,
}

const fn entry(key: &'static str, help: &'static str) -> CatalogEntry {
    CatalogEntry { key, help }
}

/// A table of families sharing one label schema.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub labels: &'static [&'static str],
    pub entries: &'static [CatalogEntry],
}

impl Catalog {
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}

/// Counters read from the shared memory header, one value per instance.
pub const SERVER_COUNTERS: Catalog = Catalog {
    labels: &[INSTANCE_LABEL, AUTOMATIC],
    entries: &[
        entry("pf_isamtot", "Total ISAM operations"),
        entry("pf_isopens", "Total ISAM opens"),
        entry("pf_isreads", "Total ISAM reads"),
        entry("pf_iswrites", "Total ISAM writes"),
        entry("pf_isrewrites", "Total ISAM updates"),
        entry("pf_isdeletes", "Total ISAM deletes"),
        entry("pf_iscommits", "Total commits"),
        entry("pf_isrollbacks", "Total rollbacks"),
        entry("pf_latchwts", "Total latch waits"),
        entry("pf_buffwts", "Total buffer waits"),
        entry("pf_lockreqs", "Total lock requests"),
        entry("pf_lockwts", "Total lock waits"),
        entry("pf_ckptwts", "Total checkpoint waits"),
        entry("pf_plgwrites", "Total physical log writes"),
        entry("pf_pagreads", "Total page reads"),
        entry("pf_btradata", "Read-ahead data pages"),
        entry("pf_rapgs_used", "Read-ahead pages used"),
        entry("pf_btraidx", "Read-ahead index pages"),
        entry("pf_dpra", "Read-ahead data pages through index"),
        entry("pf_seqscans", "Total sequential scans"),
        entry("pagreads_2K", "Total page reads, 2K pages"),
        entry("bufreads_2K", "Total buffer reads, 2K pages"),
        entry("pagwrites_2K", "Total page writes, 2K pages"),
        entry("bufwrites_2K", "Total buffer writes, 2K pages"),
        entry("bufwaits_2K", "Total buffer waits, 2K pages"),
        entry("pagreads_16K", "Total page reads, 16K pages"),
        entry("bufreads_16K", "Total buffer reads, 16K pages"),
        entry("pagwrites_16K", "Total page writes, 16K pages"),
        entry("bufwrites_16K", "Total buffer writes, 16K pages"),
        entry("bufwaits_16K", "Total buffer waits, 16K pages"),
        entry("net_connects", "Number of network connects"),
        entry("pf_totalsorts", "Total sorts"),
        entry("pf_memsorts", "Sorts done in memory"),
        entry("pf_disksorts", "Sorts spilled to disk"),
    ],
};

/// Per chunk I/O. Entries follow the value columns of the chunk query.
pub const CHUNK_COUNTERS: Catalog = Catalog {
    labels: &[INSTANCE_LABEL, "chunk", "metric", AUTOMATIC],
    entries: &[
        entry("reads", "Chunk pages read"),
        entry("writes", "Chunk pages written"),
        entry("readtime", "Chunk read time"),
        entry("writetime", "Chunk write time"),
    ],
};

/// Per dbspace accounting. Entries follow the value columns of the dbspace query.
pub const DBSPACE_COUNTERS: Catalog = Catalog {
    labels: &[INSTANCE_LABEL, "dbspace", "metric", AUTOMATIC],
    entries: &[entry("freespace", "Dbspace free space in MB")],
};

/// The three catalogs a registry is built from.
#[derive(Debug, Clone, Copy)]
pub struct Catalogs {
    pub server: Catalog,
    pub chunk: Catalog,
    pub dbspace: Catalog,
}

impl Catalogs {
    pub const BUILTIN: Catalogs = Catalogs {
        server: SERVER_COUNTERS,
        chunk: CHUNK_COUNTERS,
        dbspace: DBSPACE_COUNTERS,
    };
}

use informix_exporter_config::{
    Config,
    ProbeDefinition,
    ServerInstance,
    Staleness,
};
use informix_exporter_gatherer::{
    database::{
        MemoryConnector,
        MemoryServer,
    },
    row,
    GroupOutcome,
    InformixExporter,
    InstanceOutcome,
    CHUNK_QUERY,
    DBSPACE_QUERY,
    SERVER_COUNTERS_QUERY,
};
use pretty_assertions::assert_eq;
use prometheus::{
    Encoder,
    Registry,
    TextEncoder,
};
use std::sync::Arc;

const SESSIONS: &str = "select count(*) from sysmaster:syssessions";
const LOCKS: &str = "select count(*) from sysmaster:syslocks";

fn config(servers: &[&str]) -> Config {
    let mut config = Config::default();
    config.servers = servers.iter().map(|server| ServerInstance::new(*server)).collect();
    config.metrics = vec![
        ProbeDefinition::new("sessions", SESSIONS, "sessions").with_description("Number of sessions"),
        ProbeDefinition::new("locks", LOCKS, "locks").with_description("Number of locks"),
    ];
    config
}

fn healthy_server() -> MemoryServer {
    MemoryServer::new()
        .with_rows(SESSIONS, vec![row!(17_i64)])
        .with_rows(LOCKS, vec![row!(3_i64)])
        .with_rows(
            SERVER_COUNTERS_QUERY,
            vec![
                row!("pf_isreads  ", 1000_i64),
                row!("pf_lockwts", 4_i64),
                row!("pf_from_a_newer_engine", 99_i64),
            ],
        )
        .with_rows(CHUNK_QUERY, vec![row!("chunk1.dat", 100_i64, 50_i64, 1.5, 0.8)])
        .with_rows(DBSPACE_QUERY, vec![row!("rootdbs             ", 512.25), row!("sbspace", 64.0)])
}

fn exporter(config: &Config, connector: &MemoryConnector) -> InformixExporter {
    InformixExporter::new(config, Arc::new(connector.clone())).unwrap()
}

fn exposition(registry: &Registry) -> String {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn successful_cycle_updates_every_group() {
    let connector = MemoryConnector::new().with_server("DSN=ol_a", healthy_server());
    let exporter = exporter(&config(&["ol_a"]), &connector);

    let report = exporter.orchestrator().scrape();
    let registry = exporter.registry();

    assert!(report.instance("ol_a").unwrap().is_reachable());
    assert_eq!(registry.up().value(&["ol_a"]), Some(1.0));

    assert_eq!(registry.custom("sessions").unwrap().value(&["ol_a", "sessions"]), Some(17.0));
    assert_eq!(registry.custom("locks").unwrap().value(&["ol_a", "locks"]), Some(3.0));

    assert_eq!(
        registry.server_counter("pf_isreads").unwrap().value(&["ol_a", "automatic"]),
        Some(1000.0)
    );
    assert_eq!(
        registry.server_counter("pf_lockwts").unwrap().value(&["ol_a", "automatic"]),
        Some(4.0)
    );
    assert!(registry.family("pf_from_a_newer_engine").is_none());
    assert_eq!(
        report.instance("ol_a").unwrap().group("server"),
        Some(&GroupOutcome::Collected(informix_exporter_gatherer::CollectReport {
            applied: 2,
            skipped_rows: 0,
            ignored_rows: 1,
            failed_queries: 0,
        }))
    );

    let freespace = registry.family("freespace").unwrap();
    assert_eq!(freespace.value(&["ol_a", "rootdbs", "freespace", "automatic"]), Some(512.25));
    assert_eq!(freespace.value(&["ol_a", "sbspace", "freespace", "automatic"]), Some(64.0));

    assert_eq!(connector.open_connections(), 0);
}

#[test]
fn chunk_row_feeds_all_four_chunk_families() {
    let connector = MemoryConnector::new().with_server("DSN=ol_a", healthy_server());
    let exporter = exporter(&config(&["ol_a"]), &connector);
    exporter.orchestrator().scrape();

    let values: Vec<(&str, Option<f64>)> = exporter
        .registry()
        .chunk()
        .iter()
        .map(|family| {
            (
                family.key(),
                family.value(&["ol_a", "chunk1.dat", family.key(), "automatic"]),
            )
        })
        .collect();

    assert_eq!(
        values,
        vec![
            ("reads", Some(100.0)),
            ("writes", Some(50.0)),
            ("readtime", Some(1.5)),
            ("writetime", Some(0.8)),
        ]
    );
}

#[test]
fn unreachable_instance_keeps_its_previous_samples() {
    let connector = MemoryConnector::new()
        .with_server("DSN=ol_a", healthy_server())
        .with_server("DSN=ol_b", healthy_server());
    let exporter = exporter(&config(&["ol_a", "ol_b"]), &connector);
    exporter.orchestrator().scrape();

    let before = exporter.registry().server_counter("pf_isreads").unwrap().samples();

    connector.set_server("DSN=ol_a", MemoryServer::unreachable());
    connector.set_server(
        "DSN=ol_b",
        healthy_server().with_rows(SERVER_COUNTERS_QUERY, vec![row!("pf_isreads", 2000_i64)]),
    );
    let report = exporter.orchestrator().scrape();

    assert!(matches!(
        report.instance("ol_a").unwrap().outcome,
        InstanceOutcome::Unreachable(_)
    ));
    assert!(report.instance("ol_b").unwrap().is_reachable());

    let registry = exporter.registry();
    let isreads = registry.server_counter("pf_isreads").unwrap();
    assert_eq!(isreads.value(&["ol_a", "automatic"]), Some(1000.0));
    assert_eq!(isreads.value(&["ol_b", "automatic"]), Some(2000.0));
    assert_ne!(isreads.samples(), before);
    assert_eq!(
        registry.custom("sessions").unwrap().value(&["ol_a", "sessions"]),
        Some(17.0)
    );
    assert_eq!(registry.up().value(&["ol_a"]), Some(0.0));
    assert_eq!(registry.up().value(&["ol_b"]), Some(1.0));
}

#[test]
fn failed_liveness_check_skips_the_instance() {
    let connector = MemoryConnector::new().with_server("DSN=ol_a", MemoryServer::dead());
    let exporter = exporter(&config(&["ol_a"]), &connector);

    let report = exporter.orchestrator().scrape();

    assert!(!report.instance("ol_a").unwrap().is_reachable());
    assert_eq!(exporter.registry().up().value(&["ol_a"]), Some(0.0));
    assert!(exporter.registry().server_counter("pf_isreads").unwrap().samples().is_empty());
    assert_eq!(connector.open_connections(), 0);
}

#[test]
fn failing_probe_does_not_suppress_other_queries() {
    let connector = MemoryConnector::new().with_server(
        "DSN=ol_a",
        healthy_server().with_failure(SESSIONS, "-206: The specified table is not in the database"),
    );
    let exporter = exporter(&config(&["ol_a"]), &connector);

    let report = exporter.orchestrator().scrape();
    let registry = exporter.registry();

    assert_eq!(registry.custom("sessions").unwrap().value(&["ol_a", "sessions"]), None);
    assert_eq!(registry.custom("locks").unwrap().value(&["ol_a", "locks"]), Some(3.0));
    assert_eq!(
        registry.server_counter("pf_isreads").unwrap().value(&["ol_a", "automatic"]),
        Some(1000.0)
    );
    assert_eq!(registry.family("freespace").unwrap().samples().len(), 2);

    match report.instance("ol_a").unwrap().group("custom") {
        Some(GroupOutcome::Collected(custom)) => {
            assert_eq!(custom.failed_queries, 1);
            assert_eq!(custom.applied, 1);
        }
        other => panic!("unexpected custom outcome: {other:?}"),
    }
}

#[test]
fn failing_automatic_group_does_not_suppress_the_others() {
    let connector = MemoryConnector::new().with_server(
        "DSN=ol_a",
        healthy_server().with_failure(CHUNK_QUERY, "-272: No SELECT permission"),
    );
    let exporter = exporter(&config(&["ol_a"]), &connector);

    let report = exporter.orchestrator().scrape();
    let instance = report.instance("ol_a").unwrap();

    assert!(matches!(instance.group("chunk"), Some(GroupOutcome::Failed(_))));
    assert!(matches!(instance.group("dbspace"), Some(GroupOutcome::Collected(_))));
    assert!(exporter.registry().family("reads").unwrap().samples().is_empty());
    assert_eq!(exporter.registry().family("freespace").unwrap().samples().len(), 2);
}

#[test]
fn malformed_rows_are_skipped_individually() {
    let connector = MemoryConnector::new().with_server(
        "DSN=ol_a",
        healthy_server()
            .with_rows(SESSIONS, vec![row!("not a number"), row!(1_i64, 2_i64), row!(5_i64)])
            .with_rows(
                CHUNK_QUERY,
                vec![
                    row!("chunk1.dat", 100_i64, "broken", 1.5, 0.8),
                    row!("chunk2.dat", 7_i64, 8_i64, 0.5, 0.25),
                ],
            ),
    );
    let exporter = exporter(&config(&["ol_a"]), &connector);

    let report = exporter.orchestrator().scrape();
    let registry = exporter.registry();

    assert_eq!(registry.custom("sessions").unwrap().value(&["ol_a", "sessions"]), Some(5.0));
    let reads = registry.family("reads").unwrap();
    assert_eq!(reads.value(&["ol_a", "chunk1.dat", "reads", "automatic"]), None);
    assert_eq!(reads.value(&["ol_a", "chunk2.dat", "reads", "automatic"]), Some(7.0));

    match report.instance("ol_a").unwrap().group("chunk") {
        Some(GroupOutcome::Collected(chunk)) => {
            assert_eq!(chunk.applied, 1);
            assert_eq!(chunk.skipped_rows, 1);
        }
        other => panic!("unexpected chunk outcome: {other:?}"),
    }
}

#[test]
fn consecutive_cycles_with_identical_data_are_idempotent() {
    let connector = MemoryConnector::new().with_server("DSN=ol_a", healthy_server());
    let registry = Registry::new();
    registry
        .register(Box::new(exporter(&config(&["ol_a"]), &connector)))
        .unwrap();

    let first = exposition(&registry);
    let second = exposition(&registry);

    assert_eq!(first, second);
    assert_eq!(connector.connections_opened(), 2);
    assert!(first.contains(r#"informix_pf_isreads{automatic="automatic",informixserver="ol_a"} 1000"#));
    assert!(first.contains(r#"informix_sessions{informixserver="ol_a",sessions="sessions"} 17"#));
    assert_eq!(first.matches("informix_pf_isreads{").count(), 1);
}

#[test]
fn drop_policy_removes_series_that_were_not_refreshed() {
    let mut config = config(&["ol_a", "ol_b"]);
    config.staleness = Staleness::Drop;
    let connector = MemoryConnector::new()
        .with_server("DSN=ol_a", healthy_server())
        .with_server("DSN=ol_b", healthy_server());
    let exporter = exporter(&config, &connector);
    exporter.orchestrator().scrape();

    connector.set_server("DSN=ol_a", MemoryServer::unreachable());
    connector.set_server(
        "DSN=ol_b",
        healthy_server().with_rows(DBSPACE_QUERY, vec![row!("rootdbs", 500.0)]),
    );
    exporter.orchestrator().scrape();

    let registry = exporter.registry();
    assert_eq!(registry.up().value(&["ol_a"]), Some(0.0));
    assert_eq!(registry.server_counter("pf_isreads").unwrap().value(&["ol_a", "automatic"]), None);
    assert_eq!(registry.custom("sessions").unwrap().value(&["ol_a", "sessions"]), None);

    let freespace = registry.family("freespace").unwrap();
    assert_eq!(
        freespace.samples(),
        vec![(
            vec![
                "ol_b".to_string(),
                "rootdbs".to_string(),
                "freespace".to_string(),
                "automatic".to_string()
            ],
            500.0
        )]
    );
}

#[test]
fn parallel_scrape_matches_sequential_scrape() {
    let servers = ["ol_a", "ol_b", "ol_c"];
    let connector = servers.iter().fold(MemoryConnector::new(), |connector, server| {
        connector.with_server(&format!("DSN={server}"), healthy_server())
    });

    let sequential = exporter(&config(&servers), &connector);
    sequential.orchestrator().scrape();

    let mut parallel_config = config(&servers);
    parallel_config.parallel = true;
    let parallel = exporter(&parallel_config, &connector);
    let report = parallel.orchestrator().scrape();

    assert_eq!(report.reachable(), 3);
    let names: Vec<&str> = report.instances.iter().map(|i| i.informixserver.as_str()).collect();
    assert_eq!(names, servers);
    for (left, right) in sequential.registry().families().zip(parallel.registry().families()) {
        assert_eq!(left.name(), right.name());
        assert_eq!(left.samples(), right.samples());
    }
    assert_eq!(connector.open_connections(), 0);
}

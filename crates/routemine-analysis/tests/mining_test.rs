//! End-to-end mining tests over parts and flat records.

use routemine_analysis::graph::build_transitions;
use routemine_analysis::patterns::{cluster, edit_distance, PatternLibraryBuilder, RoutingMiner};
use routemine_analysis::reporting::{clustered_library_rows, pattern_library_rows, transition_rows};
use routemine_analysis::routing::{
    normalize, normalize_parts, DemandRecord, NormalizedPart, OperationRecord, OperationTiming, Part,
};
use routemine_core::config::{NormalizationConfig, RouteMineConfig};
use routemine_core::errors::{AnalysisError, RouteMineErrorCode};

fn np(id: &str, tokens: &[&str], demand: u64) -> NormalizedPart {
    NormalizedPart {
        part_id: id.to_string(),
        demand,
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn test_case_and_repeat_variants_share_one_pattern() {
    let parts = vec![
        Part::new("P1", ["a", "a", "B", "c"], 5),
        Part::new("P2", ["A", "B", "C"], 7),
    ];
    let result = RoutingMiner::with_defaults().run(&parts).unwrap();

    assert_eq!(result.library.len(), 1);
    let pattern = &result.library.patterns()[0];
    assert_eq!(pattern.signature, "A -> B -> C");
    assert_eq!(pattern.total_demand, 12);
    assert_eq!(pattern.member_count(), 2);
    assert_eq!(result.library.assignment("P1").unwrap().pattern_id, "P001");
    assert_eq!(result.library.assignment("P2").unwrap().pattern_id, "P001");
}

#[test]
fn test_one_edit_apart_patterns_cluster_under_heavier() {
    let library = PatternLibraryBuilder::default().build(&[
        np("x", &["A", "B", "C"], 100),
        np("y", &["A", "B", "D"], 50),
    ]);
    let clustering = cluster(library.patterns(), 1).unwrap();

    assert_eq!(clustering.len(), 1);
    assert_eq!(clustering.clusters()[0].representative_signature, "A -> B -> C");

    let rows = clustered_library_rows(&library, &clustering);
    assert!(rows
        .iter()
        .all(|r| r.cluster_representative_signature == "A -> B -> C"));
}

#[test]
fn test_single_part_transitions() {
    let table = build_transitions(&[np("p", &["A", "B", "C"], 10)]);
    let rows = transition_rows(&table);
    let edges: Vec<(&str, &str, u64)> = rows
        .iter()
        .map(|r| (r.from_token.as_str(), r.to_token.as_str(), r.aggregated_weight))
        .collect();
    assert_eq!(edges, vec![("A", "B", 10), ("B", "C", 10)]);
}

#[test]
fn test_short_routes_have_no_edges() {
    let table = build_transitions(&[np("a", &[], 4), np("b", &["A"], 9)]);
    assert!(table.is_empty());
}

#[test]
fn test_edit_distance_examples() {
    assert_eq!(edit_distance(&["A", "B", "C"], &["A", "C"]), 1);
    assert_eq!(edit_distance(&["A", "B", "C"], &["A", "B", "C"]), 0);
    let empty: [&str; 0] = [];
    assert_eq!(edit_distance(&empty, &["A", "B", "C", "D"]), 4);
}

/// Input order of patterns must not change which pattern represents a cluster.
#[test]
fn test_clustering_is_demand_ordered_regardless_of_input_order() {
    let library = PatternLibraryBuilder::default().build(&[
        np("light", &["A", "B", "D"], 50),
        np("heavy", &["A", "B", "C"], 100),
    ]);
    let mut light_first = library.patterns().to_vec();
    light_first.reverse();
    assert_eq!(light_first[0].signature, "A -> B -> D");

    let a = cluster(library.patterns(), 1).unwrap();
    let b = cluster(&light_first, 1).unwrap();
    assert_eq!(a.clusters(), b.clusters());
    assert_eq!(a.clusters()[0].representative_signature, "A -> B -> C");
}

#[test]
fn test_all_empty_and_zero_demand_is_not_an_error() {
    let parts = vec![Part::new("a", Vec::<String>::new(), 0), Part::new("b", ["  "], 0)];
    let result = RoutingMiner::with_defaults().with_clustering(1).run(&parts).unwrap();

    assert_eq!(result.diagnostics.zero_demand_parts, 2);
    assert_eq!(result.diagnostics.total_demand, 0);
    let rows = pattern_library_rows(&result.library);
    assert!(rows.iter().all(|r| r.demand_share_pct == 0.0));
    assert_eq!(result.diagnostics.cluster_count, Some(result.clustering.unwrap().len()));
}

#[test]
fn test_empty_routes_form_single_no_route_pattern() {
    let parts = vec![
        Part::new("a", Vec::<String>::new(), 3),
        Part::new("b", Vec::<String>::new(), 4),
        Part::new("c", ["SAW"], 1),
    ];
    let result = RoutingMiner::with_defaults().run(&parts).unwrap();
    let empty = result.library.by_signature("").unwrap();
    assert_eq!(empty.member_count(), 2);
    assert_eq!(empty.pattern_id, "P001");
    assert_eq!(result.diagnostics.empty_route_parts, 2);
}

#[test]
fn test_run_records_end_to_end() {
    let timing = OperationTiming {
        setup_hours: 1.0,
        process_hours: 0.25,
        idle_hours: 0.0,
        max_transport_batch: 4,
    };
    let operations = vec![
        OperationRecord::new("100", 20, "tm ").with_timing(timing),
        OperationRecord::new("100", 10, "saw").with_timing(timing),
        OperationRecord::new("100", 30, "CMM").with_timing(timing),
        OperationRecord::new("200", 10, "SAW"),
        OperationRecord::new("200", 20, "TM"),
        OperationRecord::new("300", 10, "MILL"),
    ];
    let demand = vec![
        DemandRecord::new("100", 6),
        DemandRecord::new("200", 2),
        DemandRecord::new("100", 2),
        DemandRecord::new("999", 40),
    ];

    let config = RouteMineConfig::from_toml(
        r#"
[normalization]
drop_steps = ["cmm"]

[clustering]
enabled = true
"#,
    )
    .unwrap();
    let miner = RoutingMiner::from_config(&config).unwrap();
    let result = miner.run_records(&operations, &demand).unwrap();

    let top = &result.library.patterns()[0];
    assert_eq!(top.signature, "SAW -> TM");
    assert_eq!(top.total_demand, 10);
    assert_eq!(result.transitions.weight("SAW", "TM"), Some(10));
    assert_eq!(result.diagnostics.unknown_demand_parts, 1);
    assert_eq!(result.diagnostics.part_count, 3);
    assert!(result.clustering.is_some());

    // The flow keeps the dropped CMM visit; hours use the leaving operation.
    let flow = &result.flows[0];
    assert_eq!(flow.pattern_id, "P001");
    assert!(flow.nodes.contains(&"CMM".to_string()));
    // Part 100: 2 links × (0.25 + 1/4) × 8; part 200 has no timing.
    assert!((flow.total_hours() - 8.0).abs() < 1e-9);
}

#[test]
fn test_negative_demand_aborts_run() {
    let operations = vec![OperationRecord::new("A", 1, "SAW")];
    let demand = vec![DemandRecord::new("A", -3)];
    let err = RoutingMiner::with_defaults()
        .run_records(&operations, &demand)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::NegativeDemand { quantity: -3, .. }));
    assert_eq!(err.error_code(), "NEGATIVE_DEMAND");
}

#[test]
fn test_drop_steps_and_disabled_repeat_removal() {
    let config = RouteMineConfig::from_toml(
        r#"
[normalization]
drop_steps = ["ET"]
remove_immediate_repeats = false
"#,
    )
    .unwrap();
    let normalization = config.normalization_config().unwrap();
    assert_eq!(normalize(["TM", "et", "tm", "MILL"], &normalization), vec!["TM", "TM", "MILL"]);
}

#[test]
fn test_normalized_parts_follow_input_order() {
    let parts: Vec<Part> = ["z", "a", "m"]
        .iter()
        .map(|id| Part::new(*id, ["x"], 1))
        .collect();
    let normalized = normalize_parts(&parts, &NormalizationConfig::default());
    let ids: Vec<&str> = normalized.iter().map(|p| p.part_id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

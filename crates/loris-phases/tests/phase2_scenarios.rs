//! End-to-end Phase II enumeration over concrete topologies.

use indexmap::IndexMap;
use loris_phases::{Phase2, PhaseError, PhaseStrategy};
use loris_topo::{EdgeSpec, NodeId, NodeParams, PathMetrics, Topology, TopologySpec};

/// The three-path topology from the README: 1→{2,4,6}, 2→5, 4→5, 5→3, 6→3.
fn readme_topology() -> Topology {
    let adjacency: IndexMap<NodeId, Vec<NodeId>> = [
        (1, vec![2, 4, 6]),
        (2, vec![5]),
        (3, vec![]),
        (4, vec![5]),
        (5, vec![3]),
        (6, vec![3]),
    ]
    .into_iter()
    .collect();
    let node_params: IndexMap<NodeId, NodeParams> = [
        (2, NodeParams::new(0.10, 0.30)),
        (4, NodeParams::new(0.15, 0.20)),
        (5, NodeParams::new(0.05, 0.50)),
        (6, NodeParams::new(0.20, 0.10)),
    ]
    .into_iter()
    .collect();
    let edges = vec![
        EdgeSpec { from: 1, to: 2, capacity: 5 },
        EdgeSpec { from: 1, to: 4, capacity: 5 },
        EdgeSpec { from: 1, to: 6, capacity: 5 },
        EdgeSpec { from: 2, to: 5, capacity: 5 },
        EdgeSpec { from: 4, to: 5, capacity: 5 },
        EdgeSpec { from: 5, to: 3, capacity: 10 },
        EdgeSpec { from: 6, to: 3, capacity: 5 },
    ];
    Topology::build(TopologySpec {
        adjacency,
        sender: 1,
        receiver: 3,
        node_params,
        edges,
        max_paths: 50,
    })
    .unwrap()
}

#[test]
fn readme_topology_emits_exactly_21_minimal_tuples() {
    let topo = readme_topology();
    let strategy = Phase2::from_topology(&topo, 0.95, 0.01).unwrap();
    let result = strategy.generate_minimal_tuples(10, None).unwrap();

    assert_eq!(result.tuples.len(), 21);
    // every minimal allocation here spends 5 shares at threshold 4
    for tuple in &result.tuples {
        assert_eq!(tuple.total(), 5, "unexpected total in {tuple}");
        assert_eq!(tuple.threshold, 4, "unexpected threshold in {tuple}");
        assert!(tuple.reliability >= 0.95);
        assert!(tuple.leakage <= 0.01);
    }
    // the extremes of the lexicographic order
    assert_eq!(result.tuples.first().unwrap().sav, vec![0, 0, 5]);
    assert_eq!(result.tuples.last().unwrap().sav, vec![5, 0, 0]);
}

#[test]
fn readme_enumeration_is_deterministic() {
    let topo = readme_topology();
    let strategy = Phase2::from_topology(&topo, 0.95, 0.01).unwrap();
    let a = strategy.generate_minimal_tuples(10, None).unwrap();
    let b = strategy.generate_minimal_tuples(10, None).unwrap();
    assert_eq!(a.tuples, b.tuples);
}

#[test]
fn no_emitted_sav_dominates_another() {
    let topo = readme_topology();
    let strategy = Phase2::from_topology(&topo, 0.95, 0.01).unwrap();
    let result = strategy.generate_minimal_tuples(10, None).unwrap();
    for (i, a) in result.tuples.iter().enumerate() {
        for (k, b) in result.tuples.iter().enumerate() {
            if i == k {
                continue;
            }
            let dominates = a.sav.iter().zip(&b.sav).all(|(x, y)| x >= y);
            assert!(!dominates, "{:?} dominates {:?}", a.sav, b.sav);
        }
    }
}

#[test]
fn symmetric_half_paths_are_infeasible_below_four_shares() {
    // two parallel identical paths, eps = rho = 0.5; sigma and tau cross
    let metrics = [
        PathMetrics { epsilon: 0.5, rho: 0.5 },
        PathMetrics { epsilon: 0.5, rho: 0.5 },
    ];
    let strategy = Phase2::new(&metrics, 0.6, 0.3).unwrap();

    // (1,1) at t = 2: reliability 0.25 < sigma, leakage 0.25 between the two
    assert_eq!(strategy.feasibility(&[1, 1]), None);
    let (rel, leak) = strategy.achieved(&[1, 1], 2);
    assert!((rel - 0.25).abs() < 1e-12);
    assert!((leak - 0.25).abs() < 1e-12);

    // nothing with N <= 3 separates the two identical tails
    assert_eq!(
        strategy.generate_minimal_tuples(3, None).unwrap_err(),
        PhaseError::InfeasibleParameters { n_max: 3 }
    );
}

#[test]
fn tuples_serialize_for_downstream_tools() {
    let topo = readme_topology();
    let strategy = Phase2::from_topology(&topo, 0.95, 0.01).unwrap();
    let result = strategy.generate_minimal_tuples(10, None).unwrap();
    let json = serde_json::to_value(&result.tuples).unwrap();
    let first = &json[0];
    assert_eq!(first["sav"], serde_json::json!([0, 0, 5]));
    assert_eq!(first["threshold"], 4);
    assert!(first["reliability"].as_f64().unwrap() >= 0.95);
}

#[test]
fn asymmetric_paths_become_feasible() {
    // a good and a bad path; the good one carries the allocation
    let metrics = [
        PathMetrics { epsilon: 0.05, rho: 0.95 },
        PathMetrics { epsilon: 0.6, rho: 0.4 },
    ];
    let strategy = Phase2::new(&metrics, 0.9, 0.05).unwrap();
    let result = strategy.generate_minimal_tuples(10, None).unwrap();
    for tuple in &result.tuples {
        let (rel, leak) = strategy.achieved(&tuple.sav, tuple.threshold);
        assert!((rel - tuple.reliability).abs() < 1e-12);
        assert!((leak - tuple.leakage).abs() < 1e-12);
        assert!(rel >= 0.9 && leak <= 0.05);
    }
}

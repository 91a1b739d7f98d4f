//! Seeded random topology generators for experiments and benchmarks.

use indexmap::IndexMap;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::metrics::NodeParams;
use crate::topology::{EdgeSpec, NodeId, TopologySpec, DEFAULT_MAX_PATHS};

/// Layered directed graph: consecutive layers are joined by probabilistic
/// edges, and every node is guaranteed at least one incoming and one
/// outgoing edge so the sender can always reach the receiver.
///
/// Sender is the first node of the first layer, receiver the first node of
/// the last layer.
pub fn layered_graph(
    nodes_per_layer: &[usize],
    edge_prob: f64,
    bandwidth_range: (u32, u32),
    seed: u64,
) -> TopologySpec {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut layers: Vec<Vec<NodeId>> = Vec::with_capacity(nodes_per_layer.len());
    let mut next_id: NodeId = 1;
    for &n in nodes_per_layer {
        layers.push((next_id..next_id + n as NodeId).collect());
        next_id += n as NodeId;
    }

    let mut adjacency: IndexMap<NodeId, Vec<NodeId>> =
        (1..next_id).map(|n| (n, Vec::new())).collect();
    let mut edges: Vec<EdgeSpec> = Vec::new();
    let add_edge = |adjacency: &mut IndexMap<NodeId, Vec<NodeId>>,
                        edges: &mut Vec<EdgeSpec>,
                        rng: &mut StdRng,
                        u: NodeId,
                        v: NodeId| {
        adjacency.get_mut(&u).expect("node exists").push(v);
        edges.push(EdgeSpec {
            from: u,
            to: v,
            capacity: rng.gen_range(bandwidth_range.0..=bandwidth_range.1),
        });
    };

    for window in layers.windows(2) {
        let (upper, lower) = (&window[0], &window[1]);
        for &u in upper {
            for &v in lower {
                if rng.gen::<f64>() < edge_prob {
                    add_edge(&mut adjacency, &mut edges, &mut rng, u, v);
                }
            }
        }
        // connectivity repair: every upper node sends, every lower node receives
        for &u in upper {
            if adjacency[&u].is_empty() {
                let v = *lower.choose(&mut rng).expect("layer is non-empty");
                add_edge(&mut adjacency, &mut edges, &mut rng, u, v);
            }
        }
        for &v in lower {
            let has_incoming = upper.iter().any(|u| adjacency[u].contains(&v));
            if !has_incoming {
                let u = *upper.choose(&mut rng).expect("layer is non-empty");
                add_edge(&mut adjacency, &mut edges, &mut rng, u, v);
            }
        }
    }

    TopologySpec {
        sender: layers[0][0],
        receiver: layers[layers.len() - 1][0],
        adjacency,
        node_params: IndexMap::new(),
        edges,
        max_paths: DEFAULT_MAX_PATHS,
    }
}

/// Barabási–Albert preferential attachment over `n` nodes, starting from a
/// complete core of `m0` and attaching each newcomer to `m` targets drawn
/// with degree-proportional weights. Edges are symmetric with a shared
/// bandwidth. Sender is node 1, receiver node 2.
pub fn barabasi_albert_graph(
    n: usize,
    m0: usize,
    m: usize,
    bandwidth_range: (u32, u32),
    seed: u64,
) -> TopologySpec {
    assert!(m <= m0, "attachment count m={m} must be <= core size m0={m0}");
    assert!(n >= m0, "node count n={n} must be >= core size m0={m0}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut adjacency: IndexMap<NodeId, Vec<NodeId>> = (1..=m0 as NodeId)
        .map(|i| {
            let neighbours = (1..=m0 as NodeId).filter(|&j| j != i).collect();
            (i, neighbours)
        })
        .collect();
    let mut edges: Vec<EdgeSpec> = Vec::new();
    for i in 1..=m0 as NodeId {
        for j in (i + 1)..=m0 as NodeId {
            let capacity = rng.gen_range(bandwidth_range.0..=bandwidth_range.1);
            edges.push(EdgeSpec { from: i, to: j, capacity });
            edges.push(EdgeSpec { from: j, to: i, capacity });
        }
    }

    for new_node in (m0 as NodeId + 1)..=(n as NodeId) {
        let nodes: Vec<NodeId> = adjacency.keys().copied().collect();
        let weights: Vec<usize> = nodes.iter().map(|u| adjacency[u].len()).collect();
        let dist = WeightedIndex::new(&weights).expect("core degrees are positive");
        let targets: Vec<NodeId> = (0..m).map(|_| nodes[dist.sample(&mut rng)]).collect();

        adjacency.insert(new_node, Vec::new());
        for target in targets {
            let capacity = rng.gen_range(bandwidth_range.0..=bandwidth_range.1);
            adjacency.get_mut(&new_node).expect("just inserted").push(target);
            adjacency.get_mut(&target).expect("target exists").push(new_node);
            edges.push(EdgeSpec { from: new_node, to: target, capacity });
            edges.push(EdgeSpec { from: target, to: new_node, capacity });
        }
    }

    TopologySpec {
        sender: 1,
        receiver: 2,
        adjacency,
        node_params: IndexMap::new(),
        edges,
        max_paths: DEFAULT_MAX_PATHS,
    }
}

/// Pick `n_compromised` interior nodes at random and assign adversary
/// parameters drawn uniformly from the given ranges (rounded to 3 decimals).
pub fn assign_adversary_params(
    spec: &TopologySpec,
    n_compromised: usize,
    p_int_range: (f64, f64),
    delta_range: (f64, f64),
    seed: u64,
) -> IndexMap<NodeId, NodeParams> {
    let mut rng = StdRng::seed_from_u64(seed);
    let eligible: Vec<NodeId> = spec
        .adjacency
        .keys()
        .copied()
        .filter(|&n| n != spec.sender && n != spec.receiver)
        .collect();

    let mut chosen: Vec<NodeId> = eligible
        .choose_multiple(&mut rng, n_compromised.min(eligible.len()))
        .copied()
        .collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|node| {
            let p_int = round3(rng.gen_range(p_int_range.0..=p_int_range.1));
            let delta = round3(rng.gen_range(delta_range.0..=delta_range.1));
            (node, NodeParams::new(p_int, delta))
        })
        .collect()
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

//! Simple-path enumeration between sender and receiver.

use indexmap::IndexMap;
use tracing::warn;

use crate::topology::NodeId;

/// Enumerate simple paths from `src` to `dst` by depth-first search in
/// adjacency declaration order, stopping after `max_paths` paths.
///
/// The bound keeps dense topologies tractable; hitting it is logged because
/// downstream feasibility then reasons over a truncated path set.
pub fn find_all_paths(
    adjacency: &IndexMap<NodeId, Vec<NodeId>>,
    src: NodeId,
    dst: NodeId,
    max_paths: usize,
) -> Vec<Vec<NodeId>> {
    let mut paths = Vec::new();
    let mut current = vec![src];
    visit(adjacency, dst, max_paths, &mut current, &mut paths);
    if paths.len() == max_paths {
        warn!(max_paths, "path enumeration truncated at the configured bound");
    }
    paths
}

fn visit(
    adjacency: &IndexMap<NodeId, Vec<NodeId>>,
    dst: NodeId,
    max_paths: usize,
    current: &mut Vec<NodeId>,
    paths: &mut Vec<Vec<NodeId>>,
) {
    if paths.len() >= max_paths {
        return;
    }
    let node = *current.last().expect("current path is never empty");
    if node == dst {
        paths.push(current.clone());
        return;
    }
    let Some(neighbours) = adjacency.get(&node) else {
        return;
    };
    for &next in neighbours {
        if current.contains(&next) {
            continue;
        }
        current.push(next);
        visit(adjacency, dst, max_paths, current, paths);
        current.pop();
    }
}

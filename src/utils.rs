use std::collections::HashSet;

use itertools::Itertools;

use crate::domain::types::{Node, NodeId, Route};

/// The same tour started `k` positions later.
pub fn rotate_route<P: Clone>(route: &Route<P>, k: usize) -> Route<P> {
    let mut nodes = route.nodes().to_vec();
    if !nodes.is_empty() {
        let k = k % nodes.len();
        nodes.rotate_left(k);
    }
    rebuild(nodes)
}

/// The same tour walked the other way round.
pub fn reverse_route<P: Clone>(route: &Route<P>) -> Route<P> {
    let mut nodes = route.nodes().to_vec();
    nodes.reverse();
    rebuild(nodes)
}

/// Start at the smallest id and head toward its smaller neighbour, so that
/// every rotation and reflection of a tour prints the same way.
pub fn canonical_route<P: Clone>(route: &Route<P>) -> Route<P> {
    let n = route.len();
    let Some((start, _)) = route.nodes().iter().enumerate().min_by_key(|(_, node)| node.id) else {
        return route.clone();
    };

    let rotated = rotate_route(route, start);
    if n < 3 {
        return rotated;
    }
    let next = rotated.nodes()[1].id;
    let prev = rotated.nodes()[n - 1].id;
    if prev < next {
        rotate_route(&reverse_route(&rotated), n - 1)
    } else {
        rotated
    }
}

/// Same id set, order ignored.
pub fn is_permutation_of<P>(a: &Route<P>, b: &Route<P>) -> bool {
    a.len() == b.len() && {
        let ids: HashSet<NodeId> = a.nodes().iter().map(|n| n.id).collect();
        b.nodes().iter().all(|n| ids.contains(&n.id))
    }
}

pub fn format_route<P>(route: &Route<P>) -> String {
    route.nodes().iter().map(|n| n.id).join(" -> ")
}

// Rotations and reflections of a valid route never repeat an id.
fn rebuild<P>(nodes: Vec<Node<P>>) -> Route<P> {
    Route::new(nodes).unwrap_or_else(|e| panic!("reordering a valid route: {e}"))
}

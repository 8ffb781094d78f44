use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

pub type NodeId = u32;

/// A point of the tour. The payload is only ever read by the cost function.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<P> {
    pub id: NodeId,
    pub payload: P,
}

impl<P> Node<P> {
    pub fn new(id: NodeId, payload: P) -> Self {
        Node { id, payload }
    }
}

/// Geographic position in TSPLIB `DDD.MM` notation (degrees, then minutes after the dot).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Node<Coordinates> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {},{}",
            self.id, self.payload.latitude, self.payload.longitude
        )
    }
}

/// Exchange the positions of the nodes carrying these two ids.
///
/// Positions are resolved against whichever route the operator is applied to,
/// so one operator can be replayed on any permutation of the same id set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapOperator {
    pub source: NodeId,
    pub target: NodeId,
}

impl SwapOperator {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        SwapOperator { source, target }
    }
}

impl fmt::Display for SwapOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SO{{ source: {}, target: {} }}", self.source, self.target)
    }
}

/// Applied front to back, each operator sees the route left by the previous one.
pub type SwapSequence = Vec<SwapOperator>;

/// A closed tour: an ordered, duplicate free sequence of nodes.
///
/// Keeps an id -> position index in sync with every swap so swap operators
/// resolve in constant time.
#[derive(Debug, Clone)]
pub struct Route<P> {
    nodes: Vec<Node<P>>,
    positions: HashMap<NodeId, usize>,
}

impl<P> Route<P> {
    pub fn new(nodes: Vec<Node<P>>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if positions.insert(node.id, pos).is_some() {
                return Err(Error::invalid_input(format!(
                    "duplicate node id {} in route",
                    node.id
                )));
            }
        }
        Ok(Route { nodes, positions })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node<P>> {
        self.nodes
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn swap_positions(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.nodes.swap(i, j);
        self.positions.insert(self.nodes[i].id, i);
        self.positions.insert(self.nodes[j].id, j);
    }

    /// Swap the two nodes named by `op`.
    ///
    /// # Panics
    ///
    /// If either id is not part of this route. That can only happen when a
    /// permutation has been corrupted, so it is not reported as an `Error`.
    pub fn apply(&mut self, op: &SwapOperator) {
        let i = self.expect_position(op.source);
        let j = self.expect_position(op.target);
        self.swap_positions(i, j);
    }

    /// Full swap sequence turning `self` into `target`, position by position.
    ///
    /// Walks the positions in order; wherever the id differs from the target's,
    /// the target's id is swapped in from wherever it currently sits in a
    /// working copy. Applying the result to `self` reproduces `target` exactly.
    pub fn difference(&self, target: &Route<P>) -> SwapSequence {
        let mut working = self.ids();
        let mut positions = self.positions.clone();
        let mut sequence = SwapSequence::new();

        for (i, wanted) in target.nodes.iter().map(|n| n.id).enumerate() {
            let current = working[i];
            if current == wanted {
                continue;
            }
            let j = *positions.get(&wanted).unwrap_or_else(|| {
                panic!("node {wanted} of the target route is missing from the source route")
            });
            working.swap(i, j);
            positions.insert(wanted, i);
            positions.insert(current, j);
            sequence.push(SwapOperator::new(current, wanted));
        }

        sequence
    }

    /// Positional equality: same id at every index.
    pub fn same_order(&self, other: &Route<P>) -> bool {
        self.len() == other.len()
            && self
                .nodes
                .iter()
                .zip(other.nodes.iter())
                .all(|(a, b)| a.id == b.id)
    }

    fn expect_position(&self, id: NodeId) -> usize {
        self.position_of(id)
            .unwrap_or_else(|| panic!("swap operator references node {id} absent from the route"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(ids: &[NodeId]) -> Route<()> {
        Route::new(ids.iter().map(|&id| Node::new(id, ())).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let nodes = vec![Node::new(1, ()), Node::new(2, ()), Node::new(1, ())];
        let err = Route::new(nodes).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_swap_positions_keeps_index_in_sync() {
        let mut r = route(&[10, 20, 30, 40]);
        r.swap_positions(0, 3);
        assert_eq!(r.ids(), vec![40, 20, 30, 10]);
        assert_eq!(r.position_of(40), Some(0));
        assert_eq!(r.position_of(10), Some(3));
        assert_eq!(r.position_of(20), Some(1));
    }

    #[test]
    fn test_apply_resolves_ids_against_current_positions() {
        let mut r = route(&[1, 2, 3, 4]);
        r.apply(&SwapOperator::new(1, 3));
        assert_eq!(r.ids(), vec![3, 2, 1, 4]);
        // Same operator again: 1 and 3 have moved, the swap follows them.
        r.apply(&SwapOperator::new(1, 3));
        assert_eq!(r.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "absent from the route")]
    fn test_apply_unknown_id_panics() {
        let mut r = route(&[1, 2, 3]);
        r.apply(&SwapOperator::new(1, 99));
    }

    #[test]
    fn test_difference_of_identical_routes_is_empty() {
        let r = route(&[5, 3, 9, 1]);
        assert!(r.difference(&r.clone()).is_empty());
    }

    #[test]
    fn test_difference_records_ids_not_indices() {
        let r = route(&[1, 2, 3]);
        let t = route(&[3, 1, 2]);
        let seq = r.difference(&t);
        assert_eq!(
            seq,
            vec![SwapOperator::new(1, 3), SwapOperator::new(2, 1)]
        );
    }

    #[test]
    fn test_same_order_is_positional() {
        let a = route(&[1, 2, 3, 4]);
        let b = route(&[2, 3, 4, 1]);
        assert!(!a.same_order(&b));
        assert!(a.same_order(&a.clone()));
    }

    #[test]
    fn test_swap_operator_display() {
        assert_eq!(
            SwapOperator::new(4, 7).to_string(),
            "SO{ source: 4, target: 7 }"
        );
    }
}

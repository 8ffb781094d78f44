use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;

use crate::domain::types::{Node, NodeId, Route};

/// Cyclic tour cost: every consecutive pair plus the wrap from last back to first.
///
/// Calls `cost` exactly `n` times for `n >= 2` nodes; shorter routes cost nothing.
pub fn route_cost<P, F>(route: &Route<P>, cost: &F) -> f64
where
    F: Fn(&Node<P>, &Node<P>) -> f64 + ?Sized,
{
    nodes_cost(route.nodes(), cost)
}

pub fn nodes_cost<P, F>(nodes: &[Node<P>], cost: &F) -> f64
where
    F: Fn(&Node<P>, &Node<P>) -> f64 + ?Sized,
{
    if nodes.len() < 2 {
        return 0.0;
    }
    nodes
        .iter()
        .circular_tuple_windows::<(_, _)>()
        .map(|(a, b)| cost(a, b))
        .sum()
}

/// Precomputed costs for a fixed node set, addressed by node id.
///
/// Handy when the underlying cost function is expensive (the geographic one
/// goes through several trigonometric calls per pair).
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    index: HashMap<NodeId, usize>,
    dm: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn build<P, F>(nodes: &[Node<P>], cost: &F) -> Self
    where
        P: Sync,
        F: Fn(&Node<P>, &Node<P>) -> f64 + Sync,
    {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();

        let dm = nodes
            .par_iter()
            .map(|from| nodes.iter().map(|to| cost(from, to)).collect())
            .collect();

        DistanceMatrix { index, dm }
    }

    pub fn len(&self) -> usize {
        self.dm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dm.is_empty()
    }

    /// # Panics
    ///
    /// If either id was not part of the node set the matrix was built from.
    pub fn dist_between(&self, from: NodeId, to: NodeId) -> f64 {
        self.dm[self.slot(from)][self.slot(to)]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.dm
    }

    fn slot(&self, id: NodeId) -> usize {
        *self
            .index
            .get(&id)
            .unwrap_or_else(|| panic!("node {id} is not covered by the distance matrix"))
    }
}

use rand::Rng;

use crate::domain::types::{Route, SwapOperator, SwapSequence};

/// Two distinct ids of `route`, drawn uniformly. Redraws while both picks land
/// on the same node.
///
/// # Panics
///
/// If the route holds fewer than two nodes. `Swarm::new` rejects such inputs.
pub fn random_swap_operator<P, R: Rng + ?Sized>(route: &Route<P>, rng: &mut R) -> SwapOperator {
    assert!(
        route.len() >= 2,
        "random swap needs at least two nodes, got {}",
        route.len()
    );
    let nodes = route.nodes();
    loop {
        let source = nodes[rng.gen_range(0..nodes.len())].id;
        let target = nodes[rng.gen_range(0..nodes.len())].id;
        if source != target {
            return SwapOperator::new(source, target);
        }
    }
}

/// One random operator per node of `route`.
pub fn random_swap_sequence<P, R: Rng + ?Sized>(route: &Route<P>, rng: &mut R) -> SwapSequence {
    (0..route.len())
        .map(|_| random_swap_operator(route, rng))
        .collect()
}

/// Apply every operator in order, each against the route as left by the previous one.
///
/// # Panics
///
/// If an operator names an id the route does not contain.
pub fn apply_sequence<P>(route: &mut Route<P>, sequence: &[SwapOperator]) {
    for op in sequence {
        route.apply(op);
    }
}

/// A random contiguous window of `pool`: start uniform in `[0, len)`, then a
/// length uniform in `[0, len - start]`.
pub fn random_velocity_slice<'a, R: Rng + ?Sized>(
    pool: &'a [SwapOperator],
    rng: &mut R,
) -> &'a [SwapOperator] {
    if pool.is_empty() {
        return pool;
    }
    let start = rng.gen_range(0..pool.len());
    let len = rng.gen_range(0..=pool.len() - start);
    &pool[start..start + len]
}

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::types::{Node, Route, SwapOperator};
use crate::evaluation::fitness::route_cost;
use crate::solver::pso::swap::apply_sequence;

/// One member of the swarm.
///
/// `founded` is the candidate tour that gets scored. `offset` is a second
/// track that only ever receives the random velocity slices; the particle is
/// pulled toward it after each slice lands, which makes it the personal term
/// of the update.
#[derive(Debug, Clone)]
pub struct Particle<P> {
    founded: Route<P>,
    offset: Route<P>,
    cost: f64,
    rng: ChaCha8Rng,
}

impl<P: Clone> Particle<P> {
    /// A uniformly shuffled copy of `template` (Fisher-Yates), used for both tracks.
    pub fn new<F>(template: &Route<P>, cost_fn: &F, mut rng: ChaCha8Rng) -> Self
    where
        F: Fn(&Node<P>, &Node<P>) -> f64 + ?Sized,
    {
        let mut founded = template.clone();
        for i in (1..founded.len()).rev() {
            let j = rng.gen_range(0..=i);
            founded.swap_positions(i, j);
        }
        let offset = founded.clone();

        let mut particle = Particle {
            founded,
            offset,
            cost: 0.0,
            rng,
        };
        particle.evaluate(cost_fn);
        particle
    }

    /// Recompute and cache the cyclic cost of the founded route.
    pub fn evaluate<F>(&mut self, cost_fn: &F) -> f64
    where
        F: Fn(&Node<P>, &Node<P>) -> f64 + ?Sized,
    {
        self.cost = route_cost(&self.founded, cost_fn);
        self.cost
    }
}

impl<P> Particle<P> {
    /// Move partway toward `target`.
    ///
    /// Computes the full swap sequence from the founded route to `target`, keeps
    /// a prefix whose length is drawn uniformly from `[0, len)` and applies only
    /// that prefix. Returns the number of swaps applied; `0` means no movement.
    /// The cached cost is left untouched, call [`Particle::evaluate`] afterwards.
    pub fn minus(&mut self, target: &Route<P>) -> usize {
        pull_toward(&mut self.founded, target, &mut self.rng)
    }

    /// Land `velocity` on the offset route in full, then move partway toward it.
    pub fn minus_offset(&mut self, velocity: &[SwapOperator]) -> usize {
        apply_sequence(&mut self.offset, velocity);
        pull_toward(&mut self.founded, &self.offset, &mut self.rng)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn route(&self) -> &Route<P> {
        &self.founded
    }

    pub fn offset_route(&self) -> &Route<P> {
        &self.offset
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

fn pull_toward<P>(route: &mut Route<P>, target: &Route<P>, rng: &mut ChaCha8Rng) -> usize {
    let mut sequence = route.difference(target);
    if sequence.is_empty() {
        return 0;
    }
    let keep = rng.gen_range(0..sequence.len());
    sequence.truncate(keep);
    apply_sequence(route, &sequence);
    keep
}

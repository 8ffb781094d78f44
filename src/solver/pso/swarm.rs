use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::config::SolverConfig;
use crate::domain::solution::{BestUpdate, GlobalBest, Solution};
use crate::domain::types::{Node, Route, SwapSequence};
use crate::error::{Error, Result};
use crate::solver::pso::particle::Particle;
use crate::solver::pso::swap::{random_swap_sequence, random_velocity_slice};

/// Outcome of a full swarm run.
#[derive(Debug, Clone)]
pub struct SwarmResult<P> {
    pub best: Solution<P>,
    /// The best cost at the close of every phase that lowered it.
    pub history: Vec<BestUpdate>,
}

/// Discrete particle swarm over permutations of a fixed node set.
pub struct Swarm<P, F> {
    config: SolverConfig,
    template: Route<P>,
    cost_fn: F,
}

impl<P, F> Swarm<P, F>
where
    P: Clone + Send + Sync,
    F: Fn(&Node<P>, &Node<P>) -> f64 + Sync,
{
    /// Validate everything up front; a `Swarm` that exists can always run.
    pub fn new(config: SolverConfig, nodes: Vec<Node<P>>, cost_fn: F) -> Result<Self> {
        if nodes.len() < 2 {
            return Err(Error::invalid_input(format!(
                "a tour needs at least 2 nodes, got {}",
                nodes.len()
            )));
        }
        if config.population_size < 1 {
            return Err(Error::invalid_input("population size must be at least 1"));
        }
        if config.parallelism < 1 {
            return Err(Error::invalid_input("parallelism must be at least 1"));
        }
        let template = Route::new(nodes)?;

        Ok(Swarm {
            config,
            template,
            cost_fn,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn template(&self) -> &Route<P> {
        &self.template
    }

    pub fn solve(&self) -> Result<SwarmResult<P>> {
        let threads = self.config.effective_parallelism();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        let mut master = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            "Starting swarm: {} nodes, {} particles, {} iterations, {} threads",
            self.template.len(),
            self.config.population_size,
            self.config.iterations,
            threads
        );

        // Drawn once against the template and read-only from here on.
        let velocity_pool = random_swap_sequence(&self.template, &mut master);
        // Per-particle streams are fixed before any task runs, so scheduling
        // order cannot change what a particle draws.
        let seeds: Vec<u64> = (0..self.config.population_size)
            .map(|_| master.gen())
            .collect();

        let best = GlobalBest::new();

        let mut particles: Vec<Particle<P>> = {
            let span = span!(Level::DEBUG, "initialization");
            let _guard = span.enter();
            pool.install(|| {
                seeds
                    .into_par_iter()
                    .map(|seed| {
                        let particle = Particle::new(
                            &self.template,
                            &self.cost_fn,
                            ChaCha8Rng::seed_from_u64(seed),
                        );
                        best.try_improve(particle.route(), particle.cost());
                        particle
                    })
                    .collect()
            })
        };
        if let Some(update) = best.close_phase(0) {
            debug!("Initial best: cost = {:.2}", update.cost);
        }

        for iteration in 1..=self.config.iterations {
            let iter_span = span!(Level::DEBUG, "iteration", iter = iteration);
            let _iter_guard = iter_span.enter();

            // Every particle of this iteration pulls toward the same snapshot;
            // improvements made now are seen from the next iteration on.
            let social = best
                .snapshot()
                .ok_or_else(|| Error::other("swarm has no global best"))?;

            pool.install(|| {
                particles.par_iter_mut().for_each(|particle| {
                    self.step(particle, &social.route, &velocity_pool, &best)
                })
            });

            if let Some(update) = best.close_phase(iteration) {
                info!("New best at iteration {}: cost = {:.2}", iteration, update.cost);
            }
        }

        let (best_solution, history) = best.into_parts();
        let best_solution = best_solution.ok_or_else(|| Error::other("swarm has no global best"))?;

        info!(
            "Swarm finished: best cost {:.2} after {} improvements",
            best_solution.cost,
            history.len()
        );

        Ok(SwarmResult {
            best: best_solution,
            history,
        })
    }

    /// One particle update: social pull, velocity plus offset pull, rescoring,
    /// then a bid for the global best.
    fn step(
        &self,
        particle: &mut Particle<P>,
        social: &Route<P>,
        velocity_pool: &SwapSequence,
        best: &GlobalBest<P>,
    ) {
        particle.minus(social);
        let velocity = random_velocity_slice(velocity_pool, particle.rng_mut());
        particle.minus_offset(velocity);
        let cost = particle.evaluate(&self.cost_fn);

        if best.try_improve(particle.route(), cost) {
            debug!("Particle installed cost {:.2}", cost);
        }
    }
}

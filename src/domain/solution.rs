use std::sync::{Mutex, MutexGuard};

use crate::domain::types::Route;

/// A route together with its cyclic cost.
#[derive(Debug, Clone)]
pub struct Solution<P> {
    pub route: Route<P>,
    pub cost: f64,
}

/// The best cost at the close of a phase that lowered it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestUpdate {
    /// `0` for the initialization phase, then `1..=iterations`.
    pub iteration: usize,
    pub cost: f64,
}

#[derive(Debug)]
struct BestState<P> {
    best: Option<Solution<P>>,
    history: Vec<BestUpdate>,
}

/// The swarm's global best, shared by every particle task.
///
/// Route and cost live behind one mutex and are only ever replaced together,
/// so no reader can pair a new cost with an old route.
#[derive(Debug)]
pub struct GlobalBest<P> {
    state: Mutex<BestState<P>>,
}

impl<P> Default for GlobalBest<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> GlobalBest<P> {
    pub fn new() -> Self {
        GlobalBest {
            state: Mutex::new(BestState {
                best: None,
                history: Vec::new(),
            }),
        }
    }

    // The stored pair is written as a unit, so a panic elsewhere cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, BestState<P>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Install `route` if it beats the current best. Returns `true` when installed.
    ///
    /// Equal costs are settled by the smaller id sequence, which keeps the final
    /// result independent of the order in which concurrent tasks get here.
    pub fn try_improve(&self, route: &Route<P>, cost: f64) -> bool
    where
        P: Clone,
    {
        let mut state = self.lock();

        let accept = match &state.best {
            None => true,
            Some(current) if cost < current.cost => true,
            Some(current) if cost == current.cost => route
                .nodes()
                .iter()
                .map(|n| n.id)
                .lt(current.route.nodes().iter().map(|n| n.id)),
            Some(_) => false,
        };

        if accept {
            state.best = Some(Solution {
                route: route.clone(),
                cost,
            });
        }
        accept
    }

    /// Log the best cost reached by the end of `iteration` if it is lower than
    /// the last logged one. Call once per phase, after every task has finished.
    pub fn close_phase(&self, iteration: usize) -> Option<BestUpdate> {
        let mut state = self.lock();
        let cost = state.best.as_ref()?.cost;
        if state.history.last().is_some_and(|last| last.cost <= cost) {
            return None;
        }
        let update = BestUpdate { iteration, cost };
        state.history.push(update);
        Some(update)
    }

    pub fn snapshot(&self) -> Option<Solution<P>>
    where
        P: Clone,
    {
        self.lock().best.clone()
    }

    pub fn best_cost(&self) -> Option<f64> {
        self.lock().best.as_ref().map(|s| s.cost)
    }

    pub fn history(&self) -> Vec<BestUpdate> {
        self.lock().history.clone()
    }

    pub fn into_parts(self) -> (Option<Solution<P>>, Vec<BestUpdate>) {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (state.best, state.history)
    }
}

use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub mod constant {
    pub(crate) const POPULATION_SIZE: usize = 100;
    pub(crate) const ITERATIONS: usize = 1000;
    pub(crate) const SEED: u64 = 64;
    pub(crate) const NODE_COUNT: usize = 30;
    pub(crate) const INPUT_PATH: &str = "burma.csv";
    pub(crate) const REPORT_PATH: &str = "best_so_far.csv";
}

/// Run parameters of the swarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub population_size: usize,
    pub iterations: usize,
    /// Upper bound on worker threads; clamped to the machine's parallelism.
    pub parallelism: usize,
    /// `None` seeds from OS entropy, so runs are not reproducible.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            population_size: constant::POPULATION_SIZE,
            iterations: constant::ITERATIONS,
            parallelism: available_parallelism(),
            seed: Some(constant::SEED),
        }
    }
}

impl SolverConfig {
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Defaults overridden by `PSO_POPULATION`, `PSO_ITERATIONS`, `PSO_THREADS`
    /// and `PSO_SEED` (a `.env` file is honoured). `PSO_SEED=random` disables seeding.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let mut config = SolverConfig::default();

        if let Some(v) = env_parse::<usize>("PSO_POPULATION")? {
            config.population_size = v;
        }
        if let Some(v) = env_parse::<usize>("PSO_ITERATIONS")? {
            config.iterations = v;
        }
        if let Some(v) = env_parse::<usize>("PSO_THREADS")? {
            config.parallelism = v;
        }
        match env::var("PSO_SEED") {
            Ok(raw) if raw.trim().eq_ignore_ascii_case("random") => config.seed = None,
            Ok(_) => config.seed = env_parse::<u64>("PSO_SEED")?,
            Err(_) => {}
        }

        info!(
            "Solver config: population {}, iterations {}, threads {}, seed {:?}",
            config.population_size, config.iterations, config.parallelism, config.seed
        );
        Ok(config)
    }

    /// Thread count actually used: the requested bound, clamped to the hardware.
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism.clamp(1, available_parallelism())
    }
}

pub fn input_path() -> String {
    env::var("PSO_INPUT").unwrap_or_else(|_| {
        debug!("PSO_INPUT not set, using {}", constant::INPUT_PATH);
        constant::INPUT_PATH.to_string()
    })
}

pub fn report_path() -> String {
    env::var("PSO_REPORT").unwrap_or_else(|_| constant::REPORT_PATH.to_string())
}

pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::invalid_input(format!("{key}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}

use std::path::Path;

use chrono::Utc;
use colored::*;
use csv::Writer;
use dotenv::dotenv;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{input_path, report_path, SolverConfig};
use crate::domain::solution::{BestUpdate, Solution};
use crate::domain::types::{Coordinates, Node};
use crate::error::{Error, Result};
use crate::evaluation::fitness::DistanceMatrix;
use crate::evaluation::geo::geo_cost;
use crate::fixtures::data_generator::load_or_generate;
use crate::solver::pso::swarm::{Swarm, SwarmResult};
use crate::utils::{canonical_route, format_route, is_permutation_of};

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .try_init()
        .map_err(|e| Error::other(format!("tracing init failed: {e}")))
}

/// Load the nodes, solve with the geographic cost and write the improvement log.
pub fn run() -> Result<()> {
    init_tracing_and_env()?;
    let config = SolverConfig::from_env()?;

    let nodes = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        load_or_generate(input_path())
    };

    let dm = DistanceMatrix::build(&nodes, &geo_cost);
    print_dist_matrix(&dm);

    let swarm = Swarm::new(config, nodes, |a: &Node<Coordinates>, b: &Node<Coordinates>| {
        dm.dist_between(a.id, b.id)
    })?;

    let started = Utc::now();
    let result = {
        let span = span!(Level::INFO, "swarm_search");
        let _guard = span.enter();
        swarm.solve()?
    };
    let elapsed = Utc::now() - started;

    if !is_permutation_of(&result.best.route, swarm.template()) {
        return Err(Error::other(
            "best route is not a permutation of the input nodes",
        ));
    }

    print_solution(&result.best);
    report_final_stats(&result, elapsed.num_milliseconds());

    save_to_csv(&result.history, report_path())?;

    Ok(())
}

fn report_final_stats<P>(result: &SwarmResult<P>, elapsed_ms: i64) {
    let last_improvement = result.history.last().map(|u| u.iteration).unwrap_or(0);
    info!(
        "Optimization complete. Best cost {:.2} last improved at iteration {}",
        result.best.cost, last_improvement
    );
    info!("Global best improvements: {}", result.history.len());
    info!("Time elapsed (ms): {}", elapsed_ms);
}

/// Writes the accepted improvements as `iteration,best_cost` rows.
pub fn save_to_csv(history: &[BestUpdate], filename: impl AsRef<Path>) -> Result<()> {
    let mut wtr = Writer::from_path(filename.as_ref())?;

    wtr.write_record(["iteration", "best_cost"])?;

    for update in history {
        wtr.write_record([update.iteration.to_string(), update.cost.to_string()])?;
    }

    wtr.flush()?;
    info!("Wrote {} improvements to {}", history.len(), filename.as_ref().display());
    Ok(())
}

fn print_solution(solution: &Solution<Coordinates>) {
    let route = canonical_route(&solution.route);
    println!("{}", "Best route:".bold());
    for node in route.nodes() {
        println!("{}", node);
    }
    println!(
        "{}",
        format_args!("Best distance: {:.2}", solution.cost)
            .to_string()
            .green()
    );
    debug!("Solution route: {}", format_route(&route));
}

// Print distance matrix for debugging
fn print_dist_matrix(dm: &DistanceMatrix) {
    debug!("Distance matrix ({} nodes):", dm.len());
    for row in dm.rows() {
        debug!("{:?}", row);
    }
}

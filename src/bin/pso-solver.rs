use route_swarm::solver::pso::search;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    search::run()?;
    Ok(())
}

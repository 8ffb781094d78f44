pub mod particle;
pub mod search;
pub mod swap;
pub mod swarm;

pub use particle::*;
pub use swap::*;
pub use swarm::*;

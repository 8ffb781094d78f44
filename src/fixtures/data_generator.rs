use crate::config::constant::{NODE_COUNT, SEED};
use crate::domain::types::{Coordinates, Node, NodeId};
use crate::setup::init::load_nodes;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{info, warn};

// Latitude/longitude box of the burma14 instance, whole degrees.
const LAT_RANGE: std::ops::Range<i32> = 14..22;
const LON_RANGE: std::ops::Range<i32> = 92..98;

/// A `DDD.MM` value: whole degrees plus minutes below 60 after the dot.
fn random_ddd_mm(rng: &mut ChaCha8Rng, degrees: std::ops::Range<i32>) -> f64 {
    let deg = rng.gen_range(degrees);
    let minutes = rng.gen_range(0..60);
    f64::from(deg) + f64::from(minutes) / 100.0
}

/// Generates `count` nodes with ids `1..=count` at random positions, reproducible per seed.
pub fn generate_random_nodes(count: usize, seed: u64) -> Vec<Node<Coordinates>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (1..=count)
        .map(|id| {
            let latitude = random_ddd_mm(&mut rng, LAT_RANGE);
            let longitude = random_ddd_mm(&mut rng, LON_RANGE);
            Node::new(
                id as NodeId,
                Coordinates {
                    latitude,
                    longitude,
                },
            )
        })
        .collect()
}

/// Loads nodes from `path`, falling back to a generated set when the file cannot be read.
pub fn load_or_generate(path: impl AsRef<Path>) -> Vec<Node<Coordinates>> {
    let path = path.as_ref();
    match load_nodes(path) {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!(
                "Failed to read nodes at {}: {}. Falling back to random generation.",
                path.display(),
                err
            );
            let nodes = generate_random_nodes(NODE_COUNT, SEED);
            info!("Generated {} nodes with seed {}", nodes.len(), SEED);
            nodes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_nodes_are_reproducible() {
        let a = generate_random_nodes(20, 9);
        let b = generate_random_nodes(20, 9);
        assert_eq!(a, b);
        assert_ne!(a, generate_random_nodes(20, 10));
    }

    #[test]
    fn test_generated_nodes_have_sequential_ids_and_valid_minutes() {
        let nodes = generate_random_nodes(15, 1);
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.id, i as NodeId + 1);
            for v in [node.payload.latitude, node.payload.longitude] {
                let minutes = (v - v.trunc()) * 100.0;
                assert!(minutes < 60.0 - 1e-9, "bad minutes in {v}");
            }
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_generated_nodes() {
        let nodes = load_or_generate("no/such/input.csv");
        assert_eq!(nodes.len(), NODE_COUNT);
    }
}

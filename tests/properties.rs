use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use route_swarm::domain::types::{Node, Route};
use route_swarm::evaluation::fitness::route_cost;
use route_swarm::solver::pso::{apply_sequence, random_swap_sequence, Particle};
use route_swarm::utils::{is_permutation_of, reverse_route, rotate_route};

fn abs_diff(a: &Node<()>, b: &Node<()>) -> f64 {
    (f64::from(a.id) - f64::from(b.id)).abs()
}

// Symmetric, but not a function of the id gap alone.
fn weighted(a: &Node<()>, b: &Node<()>) -> f64 {
    let (x, y) = (f64::from(a.id), f64::from(b.id));
    (x * y).sqrt() + (x - y).abs() * 1.5
}

fn random_route(n: u32, rng: &mut ChaCha8Rng) -> Route<()> {
    let mut nodes: Vec<Node<()>> = (1..=n).map(|id| Node::new(id, ())).collect();
    nodes.shuffle(rng);
    Route::new(nodes).unwrap()
}

#[test]
fn test_full_difference_reproduces_the_target() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for n in 2..=15 {
        for _ in 0..20 {
            let mut source = random_route(n, &mut rng);
            let target = random_route(n, &mut rng);
            let seq = source.difference(&target);
            assert!(seq.len() < n as usize);
            apply_sequence(&mut source, &seq);
            assert!(source.same_order(&target));
        }
    }
}

#[test]
fn test_difference_of_a_route_with_itself_is_empty() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for n in 2..=12 {
        let r = random_route(n, &mut rng);
        assert!(r.difference(&r.clone()).is_empty());
    }
}

#[test]
fn test_apply_sequence_preserves_permutation_validity() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for n in 2..=12 {
        let original = random_route(n, &mut rng);
        let mut r = original.clone();
        for _ in 0..10 {
            let seq = random_swap_sequence(&r, &mut rng);
            apply_sequence(&mut r, &seq);
            assert!(is_permutation_of(&r, &original));
            for (pos, node) in r.nodes().iter().enumerate() {
                assert_eq!(r.position_of(node.id), Some(pos));
            }
        }
    }
}

#[test]
fn test_cost_is_invariant_under_rotation_and_reversal() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    for n in 2..=10 {
        let r = random_route(n, &mut rng);
        let base = route_cost(&r, &weighted);
        for k in 0..n as usize {
            let rotated = rotate_route(&r, k);
            assert!((route_cost(&rotated, &weighted) - base).abs() < 1e-9);
        }
        assert!((route_cost(&reverse_route(&r), &weighted) - base).abs() < 1e-9);
    }
}

#[test]
fn test_two_node_route_costs_there_and_back() {
    let r = Route::new(vec![Node::new(3, ()), Node::new(11, ())]).unwrap();
    assert_eq!(route_cost(&r, &abs_diff), 2.0 * 8.0);
}

#[test]
fn test_two_node_particle_never_moves() {
    let template = Route::new(vec![Node::new(1, ()), Node::new(2, ())]).unwrap();
    let mut particle = Particle::new(&template, &abs_diff, ChaCha8Rng::seed_from_u64(6));
    let flipped = reverse_route(particle.route());
    for _ in 0..50 {
        let before = particle.route().clone();
        // The only corrective sequence has one swap, and the kept prefix is
        // drawn from [0, 1).
        assert_eq!(particle.minus(&flipped), 0);
        assert!(particle.route().same_order(&before));
    }
    assert_eq!(particle.evaluate(&abs_diff), 2.0);
}

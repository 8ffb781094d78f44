use crate::domain::types::{Coordinates, Node};

// Both constants are fixed by TSPLIB for GEO instances.
#[allow(clippy::approx_constant)]
const PI: f64 = 3.141592;
const RRR: f64 = 6378.388;

/// Convert a TSPLIB `DDD.MM` value to radians.
fn to_radians(value: f64) -> f64 {
    let deg = value.trunc();
    let min = value - deg;
    PI * (deg + 5.0 * min / 3.0) / 180.0
}

/// (latitude, longitude) in radians.
pub fn convert(coords: &Coordinates) -> (f64, f64) {
    (to_radians(coords.latitude), to_radians(coords.longitude))
}

/// TSPLIB `GEO` distance in whole kilometres on an idealised sphere.
pub fn geo_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let (lat_i, lon_i) = convert(from);
    let (lat_j, lon_j) = convert(to);

    let q1 = (lon_i - lon_j).cos();
    let q2 = (lat_i - lat_j).cos();
    let q3 = (lat_i + lat_j).cos();

    // Rounding can push the argument a hair past 1.0 for identical points.
    let arg = (0.5 * ((1.0 + q1) * q2 - (1.0 - q1) * q3)).clamp(-1.0, 1.0);
    (RRR * arg.acos() + 1.0).trunc()
}

/// Cost function over geographic nodes, ready to hand to the swarm.
pub fn geo_cost(a: &Node<Coordinates>, b: &Node<Coordinates>) -> f64 {
    geo_distance(&a.payload, &b.payload)
}

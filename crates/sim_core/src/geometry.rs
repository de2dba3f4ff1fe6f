//! Toroidal street grid: intersections, directions, distance, and sampling.
//!
//! The city is a `city_size x city_size` grid of intersections where both
//! axes wrap (a vehicle leaving the east edge re-enters on the west edge).
//! All distance is taxicab distance measured on that wrapped grid.

use rand::Rng;

/// A point on the grid. Coordinates are always in `[0, city_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Intersection {
    pub x: u32,
    pub y: u32,
}

impl Intersection {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Compass direction; also the unit-vector delta for one block of motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The direction that exactly undoes this one (an immediate U-turn).
    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// Axial distance on a wrapped line of length `size`.
fn wrapped_axis_distance(a: u32, b: u32, size: u32) -> u32 {
    let diff = if a > b { a - b } else { b - a };
    diff.min(size - diff)
}

fn wrap_coord(value: i64, size: u32) -> u32 {
    value.rem_euclid(size as i64) as u32
}

/// Taxicab distance between two intersections on the torus.
///
/// For each axis, distance is `min(|a-b|, city_size - |a-b|)`.
pub fn distance(a: Intersection, b: Intersection, city_size: u32) -> u32 {
    wrapped_axis_distance(a.x, b.x, city_size) + wrapped_axis_distance(a.y, b.y, city_size)
}

/// Advance one block from `location` in `direction`, wrapping at the edges.
pub fn step(location: Intersection, direction: Direction, city_size: u32) -> Intersection {
    let (dx, dy) = direction.delta();
    Intersection {
        x: wrap_coord(location.x as i64 + dx, city_size),
        y: wrap_coord(location.y as i64 + dy, city_size),
    }
}

/// Sample a single coordinate in `[0, city_size)`, biased toward the
/// midpoint when `inhomogeneity > 0`.
///
/// `inhomogeneity == 0` samples uniformly. Otherwise the coordinate is drawn
/// as the average of two uniform draws (a symmetric triangular distribution
/// centered on the midpoint), blended with a uniform draw by `inhomogeneity`
/// so that concentration at the center scales linearly with it.
fn biased_coordinate(rng: &mut impl Rng, city_size: u32, inhomogeneity: f64) -> u32 {
    if inhomogeneity <= 0.0 {
        return rng.gen_range(0..city_size);
    }
    let uniform: f64 = rng.gen_range(0.0..city_size as f64);
    let a: f64 = rng.gen_range(0.0..city_size as f64);
    let b: f64 = rng.gen_range(0.0..city_size as f64);
    let triangular = (a + b) / 2.0;
    let blended = inhomogeneity * triangular + (1.0 - inhomogeneity) * uniform;
    (blended.floor() as i64).rem_euclid(city_size as i64) as u32
}

/// Draw a random intersection, optionally biased toward the city center.
pub fn random_intersection(
    rng: &mut impl Rng,
    city_size: u32,
    inhomogeneity: f64,
) -> Intersection {
    Intersection {
        x: biased_coordinate(rng, city_size, inhomogeneity),
        y: biased_coordinate(rng, city_size, inhomogeneity),
    }
}

/// Bounded number of rejection-sampling retries before an origin/destination
/// draw is considered exhausted.
pub const MAX_TRIP_ENDPOINT_DRAWS: u32 = 1000;

/// Draw a valid (origin, destination) pair: distinct, and at least
/// `min_trip_distance` apart, and (if set) no more than `max_trip_distance`
/// apart. Returns `None` if no valid pair is found within
/// [`MAX_TRIP_ENDPOINT_DRAWS`] attempts.
pub fn random_trip_endpoints(
    rng: &mut impl Rng,
    city_size: u32,
    inhomogeneity: f64,
    min_trip_distance: u32,
    max_trip_distance: Option<u32>,
) -> Option<(Intersection, Intersection)> {
    for _ in 0..MAX_TRIP_ENDPOINT_DRAWS {
        let origin = random_intersection(rng, city_size, inhomogeneity);
        let destination = random_intersection(rng, city_size, inhomogeneity);
        if origin == destination {
            continue;
        }
        let dist = distance(origin, destination, city_size);
        if dist < min_trip_distance.max(1) {
            continue;
        }
        if let Some(max_dist) = max_trip_distance {
            if dist > max_dist {
                continue;
            }
        }
        return Some((origin, destination));
    }
    None
}

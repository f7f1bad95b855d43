use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::bacterium::{Bacterium, BacteriumId, Placement};

/// Placement and growth parameters handed to the factory
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnConstraints {
    /// On the rim of a circle of `ring_radius` around the origin
    Ring {
        ring_radius: f32,
        initial_radius: f32,
        growth_rate: f32,
    },
    /// Anywhere on the unit sphere, starting with zero angular radius
    Sphere { growth_rate: f32 },
}

impl SpawnConstraints {
    pub fn growth_rate(&self) -> f32 {
        match *self {
            SpawnConstraints::Ring { growth_rate, .. } | SpawnConstraints::Sphere { growth_rate } => {
                growth_rate
            }
        }
    }
}

/// Produces bacteria with random placement and color, numbering them in spawn order
pub struct BacteriumFactory<R: Rng> {
    rng: R,
    constraints: SpawnConstraints,
    next_id: u32,
}

impl<R: Rng> BacteriumFactory<R> {
    pub fn new(rng: R, constraints: SpawnConstraints) -> Self {
        Self {
            rng,
            constraints,
            next_id: 0,
        }
    }

    pub fn spawn(&mut self) -> Bacterium {
        let id = BacteriumId(self.next_id);
        self.next_id += 1;

        let color = random_color(&mut self.rng);
        match self.constraints {
            SpawnConstraints::Ring {
                ring_radius,
                initial_radius,
                growth_rate,
            } => {
                let center = random_ring_point(&mut self.rng, ring_radius);
                Bacterium::new(id, Placement::Disk(center), initial_radius, growth_rate, color)
            }
            SpawnConstraints::Sphere { growth_rate } => {
                let direction = random_unit_direction(&mut self.rng);
                Bacterium::new(id, Placement::Sphere(direction), 0.0, growth_rate, color)
            }
        }
    }

    pub fn spawn_batch(&mut self, count: usize) -> Vec<Bacterium> {
        (0..count).map(|_| self.spawn()).collect()
    }
}

/// Uniformly distributed point on a circle of `radius` around the origin
pub fn random_ring_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

/// Direction uniformly distributed over the sphere's area.
///
/// The polar angle is drawn through arccos so caps near the poles are not
/// oversampled.
pub fn random_unit_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let azimuth = rng.gen_range(0.0..TAU);
    let polar = (2.0 * rng.gen_range(0.0..1.0f32) - 1.0).acos();
    Vec3::new(
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    )
}

/// Opaque color with independent uniform channels
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [f32; 4] {
    [
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ring_spawns_sit_on_the_rim() {
        let constraints = SpawnConstraints::Ring {
            ring_radius: 0.8,
            initial_radius: 0.02,
            growth_rate: 0.0007,
        };
        let mut factory = BacteriumFactory::new(StdRng::seed_from_u64(1), constraints);

        for bacterium in factory.spawn_batch(50) {
            let Placement::Disk(center) = bacterium.placement else {
                panic!("ring constraints produced {:?}", bacterium.placement);
            };
            assert!((center.length() - 0.8).abs() < 1e-5);
            assert_eq!(bacterium.radius, 0.02);
            assert_eq!(bacterium.color[3], 1.0);
        }
    }

    #[test]
    fn sphere_spawns_are_unit_directions_with_zero_radius() {
        let constraints = SpawnConstraints::Sphere { growth_rate: 0.0005 };
        let mut factory = BacteriumFactory::new(StdRng::seed_from_u64(2), constraints);

        for bacterium in factory.spawn_batch(50) {
            let Placement::Sphere(direction) = bacterium.placement else {
                panic!("sphere constraints produced {:?}", bacterium.placement);
            };
            assert!((direction.length() - 1.0).abs() < 1e-4);
            assert_eq!(bacterium.radius, 0.0);
            assert_eq!(bacterium.growth_rate, 0.0005);
        }
    }

    #[test]
    fn sphere_directions_cover_both_hemispheres_evenly() {
        let mut rng = StdRng::seed_from_u64(9);
        let samples = 4000;
        let northern = (0..samples)
            .filter(|_| random_unit_direction(&mut rng).z > 0.0)
            .count();
        let share = northern as f32 / samples as f32;
        assert!((share - 0.5).abs() < 0.05, "northern share {share}");
    }

    #[test]
    fn ids_follow_spawn_order() {
        let constraints = SpawnConstraints::Sphere { growth_rate: 0.0005 };
        let mut factory = BacteriumFactory::new(StdRng::seed_from_u64(4), constraints);
        let ids: Vec<u32> = factory.spawn_batch(4).iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(factory.spawn().id, BacteriumId(4));
    }

    #[test]
    fn empty_batch_is_allowed() {
        let constraints = SpawnConstraints::Sphere { growth_rate: 0.0005 };
        let mut factory = BacteriumFactory::new(StdRng::seed_from_u64(5), constraints);
        assert!(factory.spawn_batch(0).is_empty());
    }
}

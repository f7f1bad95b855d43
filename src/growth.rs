use crate::bacterium::{Bacterium, BacteriumId};
use crate::config::Threshold;

/// Grows bacteria each tick and reports the ones that mature
#[derive(Debug, Clone, Copy)]
pub struct GrowthScheduler {
    threshold: Threshold,
}

impl GrowthScheduler {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    /// Grow every live bacterium by `dt` ticks, then flag the ones crossing
    /// the threshold for the first time. Returned ids are in spawn order and
    /// each bacterium appears at most once over the whole session.
    pub fn tick(&self, bacteria: &mut [Bacterium], dt: f32) -> Vec<BacteriumId> {
        for bacterium in bacteria.iter_mut() {
            bacterium.grow(dt);
        }

        bacteria
            .iter_mut()
            .filter(|b| b.alive && !b.scored && self.threshold.is_crossed(b))
            .filter_map(|b| b.mark_scored().then_some(b.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bacterium::Placement;
    use bevy::prelude::*;

    fn flat(id: u32, growth_rate: f32) -> Bacterium {
        Bacterium::new(
            BacteriumId(id),
            Placement::Disk(Vec2::new(0.8, 0.0)),
            0.02,
            growth_rate,
            [1.0, 0.0, 0.0, 1.0],
        )
    }

    #[test]
    fn growth_threshold_is_measured_from_initial_radius() {
        let scheduler = GrowthScheduler::new(Threshold::Growth(0.24));
        let mut bacteria = vec![flat(0, 0.05)];

        // radius 0.22 after four ticks is only 0.20 of growth
        for _ in 0..4 {
            assert!(scheduler.tick(&mut bacteria, 1.0).is_empty());
        }
        assert_eq!(scheduler.tick(&mut bacteria, 1.0), vec![BacteriumId(0)]);
    }

    #[test]
    fn crossing_is_reported_once() {
        let scheduler = GrowthScheduler::new(Threshold::Growth(0.1));
        let mut bacteria = vec![flat(0, 0.2), flat(1, 0.01)];

        let mut reported = Vec::new();
        for _ in 0..30 {
            reported.extend(scheduler.tick(&mut bacteria, 1.0));
        }
        assert_eq!(reported, vec![BacteriumId(0), BacteriumId(1)]);
        assert!(bacteria.iter().all(|b| b.scored));
    }

    #[test]
    fn radii_never_shrink() {
        let scheduler = GrowthScheduler::new(Threshold::Angular(0.5));
        let mut bacteria = vec![flat(0, 0.003), flat(1, 0.007)];
        let mut previous: Vec<f32> = bacteria.iter().map(|b| b.radius).collect();

        for step in [1.0, 0.0, 2.5, -1.0, 1.0] {
            scheduler.tick(&mut bacteria, step);
            let current: Vec<f32> = bacteria.iter().map(|b| b.radius).collect();
            assert!(current.iter().zip(&previous).all(|(now, before)| now >= before));
            previous = current;
        }
    }

    #[test]
    fn dead_bacteria_neither_grow_nor_mature() {
        let scheduler = GrowthScheduler::new(Threshold::Growth(0.1));
        let mut bacteria = vec![flat(0, 0.2)];
        bacteria[0].kill();

        assert!(scheduler.tick(&mut bacteria, 1.0).is_empty());
        assert_eq!(bacteria[0].radius, 0.02);
        assert!(!bacteria[0].scored);
    }

    #[test]
    fn angular_threshold_uses_absolute_radius() {
        let scheduler = GrowthScheduler::new(Threshold::Angular(0.3));
        let mut bacteria = vec![Bacterium::new(
            BacteriumId(3),
            Placement::Sphere(Vec3::Z),
            0.0,
            0.1,
            [0.0, 1.0, 0.0, 1.0],
        )];

        assert!(scheduler.tick(&mut bacteria, 2.0).is_empty());
        assert_eq!(scheduler.tick(&mut bacteria, 1.5), vec![BacteriumId(3)]);
    }
}

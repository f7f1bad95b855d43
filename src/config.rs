//! Configuration constants and per-variant rules for the zapper game
use std::f32::consts::PI;

use anyhow::{bail, ensure};
use bevy::prelude::*;
use rand::Rng;

use crate::bacterium::Bacterium;
use crate::factory::SpawnConstraints;

// ============================================================================
// FLAT DISK VARIANT
// ============================================================================

/// Number of bacteria spawned on the flat disk
pub const FLAT_BACTERIA_COUNT: usize = 10;

/// Radius of the playing disk in clip coordinates (bacteria spawn on its rim)
pub const DISK_RADIUS: f32 = 0.8;

/// Radius every flat bacterium starts with
pub const FLAT_INITIAL_RADIUS: f32 = 0.02;

/// Radius added to a flat bacterium per tick
pub const FLAT_GROWTH_RATE: f32 = 0.0007;

/// Growth (radius minus initial radius) at which a flat bacterium matures
pub const FLAT_GROWTH_THRESHOLD: f32 = 0.25;

/// Points the player earns per zapped flat bacterium
pub const FLAT_POINTS_PER_HIT: u32 = 1;

/// Player points needed to win the flat game
pub const FLAT_TARGET_SCORE: u32 = 10;

/// Points the game earns when a flat bacterium matures unclicked
pub const GAME_POINTS_PER_MATURITY: u32 = 5;

/// Game points at which the player loses the flat game
pub const GAME_POINTS_LIMIT: u32 = 10;

// ============================================================================
// SPHERE VARIANT
// ============================================================================

/// Inclusive bounds for the randomized sphere spawn count
pub const MIN_SPHERE_BACTERIA: usize = 2;
pub const MAX_SPHERE_BACTERIA: usize = 10;

/// Angular radius (radians) added to a sphere bacterium per tick
pub const SPHERE_GROWTH_RATE: f32 = 0.0005;

/// Angular radius at which a sphere bacterium has "reached" the player
pub const SPHERE_ANGULAR_THRESHOLD: f32 = PI / 6.0;

/// Points the player earns per zapped sphere bacterium
pub const SPHERE_POINTS_PER_HIT: u32 = 15;

/// Number of matured sphere bacteria that ends the game in a loss
pub const SPHERE_ADVERSE_LIMIT: u32 = 2;

/// Per-channel 8-bit distance below which a sampled color matches a bacterium
pub const COLOR_PICK_TOLERANCE: u8 = 10;

// ============================================================================
// PRESENTATION
// ============================================================================

/// Color of the flat playing disk
pub const DISK_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Base color of the bare sphere surface
pub const SURFACE_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Clear color behind the playing field
pub const BACKGROUND_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// World-space radius of the rendered sphere
pub const SPHERE_RADIUS: f32 = 3.0;

/// Bacterium caps are drawn on a shell this much larger than the sphere.
/// Clicks are resolved against the same shell.
pub const CAP_LIFT: f32 = 1.002;

/// Distance from the camera to the sphere center
pub const CAMERA_DISTANCE: f32 = 6.0;

/// Vertical field of view of the sphere camera
pub const CAMERA_FOV_DEGREES: f32 = 80.0;

/// Per-frame decay of the sphere spin once the drag is released
pub const DRAG_AMORTIZATION: f32 = 0.95;

// ============================================================================
// TIMING
// ============================================================================

/// Display rate the per-tick growth constants were tuned for
pub const REFERENCE_FPS: f32 = 60.0;

/// Which playing field a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Flat,
    Sphere,
}

/// How far a bacterium has to grow before it matures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Growth measured from the initial radius (flat disk)
    Growth(f32),
    /// Absolute angular radius in radians (sphere)
    Angular(f32),
}

impl Threshold {
    pub fn amount(&self) -> f32 {
        match *self {
            Threshold::Growth(amount) | Threshold::Angular(amount) => amount,
        }
    }

    pub fn is_crossed(&self, bacterium: &Bacterium) -> bool {
        match *self {
            Threshold::Growth(amount) => bacterium.growth() >= amount,
            Threshold::Angular(amount) => bacterium.radius >= amount,
        }
    }
}

/// What a bacterium maturing unclicked counts toward.
///
/// The flat game treats maturity as the game scoring against the player, the
/// sphere game counts each matured bacterium as one adverse event. Both feed
/// the same loss counter but with different weights and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaturityRule {
    GameGains { points: u32 },
    AdverseEvent,
}

impl MaturityRule {
    /// Amount added to the loss counter per matured bacterium
    pub fn weight(&self) -> u32 {
        match *self {
            MaturityRule::GameGains { points } => points,
            MaturityRule::AdverseEvent => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaturityRule::GameGains { .. } => "Game gains",
            MaturityRule::AdverseEvent => "Bacteria reached",
        }
    }
}

/// Strategy used to resolve a click into a bacterium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTesting {
    /// Point-in-circle against clip coordinates
    Geometric,
    /// Match the rendered pixel color against bacterium colors
    ColorPick { tolerance: u8 },
    /// Decode the bacterium id drawn into the picking buffer
    IdPick,
}

/// What happens to a bacterium once it is zapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Keep it in the session, marked dead and no longer drawn
    Hide,
    /// Drop it from the session
    Delete,
}

/// Rules fixed for the lifetime of a session
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameRules {
    pub variant: Variant,
    pub spawn_count: usize,
    pub spawn: SpawnConstraints,
    pub threshold: Threshold,
    pub maturity: MaturityRule,
    pub adverse_limit: u32,
    pub target_score: u32,
    pub points_per_hit: u32,
    pub hit_testing: HitTesting,
    pub removal: RemovalPolicy,
}

impl GameRules {
    /// Ten bacteria on the rim of a flat disk; first to ten points wins
    pub fn flat() -> Self {
        Self {
            variant: Variant::Flat,
            spawn_count: FLAT_BACTERIA_COUNT,
            spawn: SpawnConstraints::Ring {
                ring_radius: DISK_RADIUS,
                initial_radius: FLAT_INITIAL_RADIUS,
                growth_rate: FLAT_GROWTH_RATE,
            },
            threshold: Threshold::Growth(FLAT_GROWTH_THRESHOLD),
            maturity: MaturityRule::GameGains {
                points: GAME_POINTS_PER_MATURITY,
            },
            adverse_limit: GAME_POINTS_LIMIT,
            target_score: FLAT_TARGET_SCORE,
            points_per_hit: FLAT_POINTS_PER_HIT,
            hit_testing: HitTesting::Geometric,
            removal: RemovalPolicy::Hide,
        }
    }

    /// `count` bacteria on the sphere; zapping all of them wins
    pub fn sphere(count: usize) -> Self {
        let target_score = u32::try_from(count)
            .unwrap_or(u32::MAX)
            .saturating_mul(SPHERE_POINTS_PER_HIT);

        Self {
            variant: Variant::Sphere,
            spawn_count: count,
            spawn: SpawnConstraints::Sphere {
                growth_rate: SPHERE_GROWTH_RATE,
            },
            threshold: Threshold::Angular(SPHERE_ANGULAR_THRESHOLD),
            maturity: MaturityRule::AdverseEvent,
            adverse_limit: SPHERE_ADVERSE_LIMIT,
            target_score,
            points_per_hit: SPHERE_POINTS_PER_HIT,
            hit_testing: HitTesting::IdPick,
            removal: RemovalPolicy::Delete,
        }
    }

    /// Sphere rules with a spawn count drawn from the configured range
    pub fn sphere_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::sphere(rng.gen_range(MIN_SPHERE_BACTERIA..=MAX_SPHERE_BACTERIA))
    }

    pub fn with_hit_testing(mut self, hit_testing: HitTesting) -> Self {
        self.hit_testing = hit_testing;
        self
    }

    /// Reject rule combinations the game loop cannot run
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.adverse_limit > 0, "adverse limit must be positive");
        ensure!(self.points_per_hit > 0, "points per hit must be positive");
        ensure!(
            self.threshold.amount() > 0.0,
            "maturity threshold must be positive, got {}",
            self.threshold.amount()
        );
        ensure!(
            self.spawn.growth_rate() > 0.0,
            "growth rate must be positive, got {}",
            self.spawn.growth_rate()
        );

        match (self.variant, self.spawn, self.threshold, self.hit_testing) {
            (Variant::Flat, SpawnConstraints::Ring { .. }, Threshold::Growth(_), HitTesting::Geometric) => {}
            (
                Variant::Sphere,
                SpawnConstraints::Sphere { .. },
                Threshold::Angular(_),
                HitTesting::ColorPick { .. } | HitTesting::IdPick,
            ) => {}
            (variant, spawn, threshold, hit_testing) => bail!(
                "inconsistent {variant:?} rules: spawn {spawn:?}, threshold {threshold:?}, hit testing {hit_testing:?}"
            ),
        }

        if let HitTesting::ColorPick { tolerance } = self.hit_testing {
            ensure!(tolerance > 0, "color pick tolerance must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shipped_rules_are_valid() {
        assert!(GameRules::flat().validate().is_ok());
        assert!(GameRules::sphere(5).validate().is_ok());
        assert!(
            GameRules::sphere(5)
                .with_hit_testing(HitTesting::ColorPick { tolerance: COLOR_PICK_TOLERANCE })
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn sphere_target_scales_with_spawn_count() {
        assert_eq!(GameRules::sphere(4).target_score, 60);
    }

    #[test]
    fn random_sphere_count_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let rules = GameRules::sphere_random(&mut rng);
            assert!((MIN_SPHERE_BACTERIA..=MAX_SPHERE_BACTERIA).contains(&rules.spawn_count));
        }
    }

    #[test]
    fn mismatched_hit_testing_is_rejected() {
        let rules = GameRules::flat().with_hit_testing(HitTesting::IdPick);
        assert!(rules.validate().is_err());

        let rules = GameRules::sphere(3).with_hit_testing(HitTesting::Geometric);
        assert!(rules.validate().is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut rules = GameRules::flat();
        rules.adverse_limit = 0;
        assert!(rules.validate().is_err());
    }
}

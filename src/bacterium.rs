use bevy::prelude::*;
use bevy::utils::Instant;

/// Identity of a bacterium, unique within one session and assigned in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BacteriumId(pub u32);

/// Where a bacterium sits on the playing field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Center in clip coordinates on the flat disk
    Disk(Vec2),
    /// Unit direction from the sphere center to the bacterium center
    Sphere(Vec3),
}

/// A growing click target.
///
/// On the flat disk `radius` is a length in clip coordinates, on the sphere it
/// is the angular radius of the infected cap in radians.
#[derive(Debug, Clone)]
pub struct Bacterium {
    pub id: BacteriumId,
    pub placement: Placement,
    pub radius: f32,
    pub initial_radius: f32,
    pub growth_rate: f32,
    pub color: [f32; 4],
    pub alive: bool,
    pub scored: bool,
    pub created_at: Instant,
}

impl Bacterium {
    pub fn new(
        id: BacteriumId,
        placement: Placement,
        initial_radius: f32,
        growth_rate: f32,
        color: [f32; 4],
    ) -> Self {
        Self {
            id,
            placement,
            radius: initial_radius,
            initial_radius,
            growth_rate,
            color,
            alive: true,
            scored: false,
            created_at: Instant::now(),
        }
    }

    /// Advance the radius by `dt` ticks. Dead bacteria and negative steps leave it unchanged.
    pub fn grow(&mut self, dt: f32) {
        if self.alive && dt > 0.0 {
            self.radius += self.growth_rate * dt;
        }
    }

    /// How much the radius has grown since spawn
    pub fn growth(&self) -> f32 {
        self.radius - self.initial_radius
    }

    /// Mark the bacterium as zapped. Returns false if it was already dead.
    pub fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }

    /// Flag the bacterium as having counted toward maturity. Returns false if it already had.
    pub fn mark_scored(&mut self) -> bool {
        !std::mem::replace(&mut self.scored, true)
    }

    /// Stored color quantized to 8 bits per channel, as the renderer writes it
    pub fn rgba8(&self) -> [u8; 4] {
        to_rgba8(self.color)
    }
}

/// Quantize a normalized color to 8 bits per channel, rounding to nearest
pub fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

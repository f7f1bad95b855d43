//! Pixel readback for the sphere variant.
//!
//! The visible pass paints every bacterium cap over the gray surface with its
//! own color; the picking pass paints the bacterium id instead. Both are
//! evaluated here for a single pixel by casting that pixel's view ray onto the
//! rotated sphere, so a click can be resolved without a GPU readback. Casts
//! should use the radius caps are drawn at, otherwise slanted caps near the
//! silhouette read back as surface.

use bevy::prelude::*;

use crate::bacterium::{Bacterium, BacteriumId, Placement, to_rgba8};

/// Source of rendered colors, addressed with a bottom-left pixel origin
pub trait PixelSource {
    fn read_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]>;
}

/// Source of picking ids, addressed like [`PixelSource`]
pub trait IdSource {
    fn read_id(&self, x: u32, y: u32) -> Option<BacteriumId>;
}

/// Pixel under a cursor given in viewport coordinates (top-left origin),
/// flipped to the bottom-left origin readback uses
pub fn cursor_to_pixel(cursor: Vec2, viewport_height: u32) -> (u32, u32) {
    let x = cursor.x.max(0.0).floor() as u32;
    let row = cursor.y.max(0.0).floor() as u32;
    (x, flip_y(row, viewport_height))
}

/// Mirror a pixel row between top-left and bottom-left origins
pub fn flip_y(row: u32, height: u32) -> u32 {
    height.saturating_sub(1).saturating_sub(row)
}

/// The topmost bacterium cap covering `direction`. Later spawns paint over
/// earlier ones, matching draw order.
pub fn cap_at(direction: Vec3, bacteria: &[Bacterium]) -> Option<&Bacterium> {
    bacteria.iter().rev().find(|bacterium| match bacterium.placement {
        Placement::Sphere(center) if bacterium.alive => {
            let cos = direction.dot(center.normalize_or_zero()).clamp(-1.0, 1.0);
            cos.acos() < bacterium.radius
        }
        _ => false,
    })
}

/// Color of the sphere surface in model-space `direction`
pub fn shade_surface(direction: Vec3, bacteria: &[Bacterium], surface: [f32; 4]) -> [f32; 4] {
    cap_at(direction, bacteria).map_or(surface, |bacterium| bacterium.color)
}

/// Placement of the playing sphere in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereFrame {
    pub rotation: Quat,
    pub radius: f32,
}

impl SphereFrame {
    /// Model-space direction of the nearest surface point hit by `ray`
    pub fn surface_direction(&self, ray: Ray3d) -> Option<Vec3> {
        let direction = *ray.direction;
        let b = ray.origin.dot(direction);
        let c = ray.origin.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t = if -b - root >= 0.0 { -b - root } else { -b + root };
        if t < 0.0 {
            return None;
        }

        let hit = ray.origin + direction * t;
        Some(self.rotation.inverse() * hit.normalize())
    }
}

/// Single-pixel readback of the sphere scene.
///
/// `cast` turns a viewport position (top-left origin) into a world ray; in the
/// app it wraps `Camera::viewport_to_world`.
pub struct SurfaceReadback<'a, C>
where
    C: Fn(Vec2) -> Option<Ray3d>,
{
    pub cast: C,
    pub frame: SphereFrame,
    pub bacteria: &'a [Bacterium],
    pub viewport: UVec2,
    pub surface: [f32; 4],
    pub background: [f32; 4],
}

impl<C> SurfaceReadback<'_, C>
where
    C: Fn(Vec2) -> Option<Ray3d>,
{
    fn direction_at(&self, x: u32, y: u32) -> Option<Option<Vec3>> {
        if x >= self.viewport.x || y >= self.viewport.y {
            return None;
        }
        let row = flip_y(y, self.viewport.y);
        let center = Vec2::new(x as f32 + 0.5, row as f32 + 0.5);
        Some((self.cast)(center).and_then(|ray| self.frame.surface_direction(ray)))
    }
}

impl<C> PixelSource for SurfaceReadback<'_, C>
where
    C: Fn(Vec2) -> Option<Ray3d>,
{
    fn read_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = match self.direction_at(x, y)? {
            Some(direction) => shade_surface(direction, self.bacteria, self.surface),
            None => self.background,
        };
        Some(to_rgba8(color))
    }
}

impl<C> IdSource for SurfaceReadback<'_, C>
where
    C: Fn(Vec2) -> Option<Ray3d>,
{
    fn read_id(&self, x: u32, y: u32) -> Option<BacteriumId> {
        let direction = self.direction_at(x, y)??;
        cap_at(direction, self.bacteria).map(|bacterium| bacterium.id)
    }
}

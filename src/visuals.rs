use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;

use crate::bacterium::BacteriumId;
use crate::config::{CAP_LIFT, SPHERE_RADIUS, SURFACE_COLOR};
use crate::game_loop::DrawCommand;
use crate::plugin::LatestFrame;

/// Marker for the flat playing disk
#[derive(Component)]
pub struct PlayingField;

/// Marker for the rotating playing sphere; bacterium caps are its children
#[derive(Component)]
pub struct PlayingSphere;

/// Links a rendered entity to the bacterium it draws
#[derive(Component)]
pub struct BacteriumVisual {
    pub id: BacteriumId,
}

pub fn to_color(color: [f32; 4]) -> Color {
    Color::srgba(color[0], color[1], color[2], color[3])
}

/// Spawn the disk and one circle per bacterium from the first frame
pub fn spawn_flat_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    latest: Res<LatestFrame>,
) {
    let unit_circle = meshes.add(Circle::new(1.0));

    for (layer, command) in latest.0.commands.iter().enumerate() {
        match *command {
            DrawCommand::Disk { radius, color } => {
                commands.spawn((
                    PlayingField,
                    Mesh2d(unit_circle.clone()),
                    MeshMaterial2d(materials.add(ColorMaterial::from_color(to_color(color)))),
                    Transform::from_scale(Vec3::splat(radius)),
                ));
            }
            DrawCommand::Circle {
                id,
                center,
                radius,
                color,
            } => {
                // Draw order decides overlap, later bacteria on top
                commands.spawn((
                    BacteriumVisual { id },
                    Mesh2d(unit_circle.clone()),
                    MeshMaterial2d(materials.add(ColorMaterial::from_color(to_color(color)))),
                    Transform::from_translation(center.extend(layer as f32 * 0.01))
                        .with_scale(Vec3::splat(radius)),
                ));
            }
            DrawCommand::Surface { .. } | DrawCommand::Region { .. } => {}
        }
    }
}

/// Resize circles to the latest frame and hide the ones no longer drawn
pub fn sync_flat_bacteria(
    latest: Res<LatestFrame>,
    mut visuals: Query<(&BacteriumVisual, &mut Transform, &mut Visibility)>,
) {
    if !latest.is_changed() {
        return;
    }

    for (visual, mut transform, mut visibility) in visuals.iter_mut() {
        match latest.0.bacterium(visual.id) {
            Some(DrawCommand::Circle { radius, .. }) => {
                transform.scale = Vec3::splat(*radius);
                *visibility = Visibility::Inherited;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

const CAP_RINGS: u32 = 10;
const CAP_SEGMENTS: u32 = 48;

/// Vertices and triangle indices of a spherical cap on the unit sphere,
/// centered on +Z and spanning `angular_radius` from its pole.
///
/// Vertex 0 is the pole; ring `k` sits at `k / CAP_RINGS` of the angular
/// radius. Triangles wind counter-clockwise seen from outside.
pub fn cap_geometry(angular_radius: f32) -> (Vec<Vec3>, Vec<u32>) {
    let span = angular_radius.clamp(0.0, PI);
    let mut positions = vec![Vec3::Z];
    for ring in 1..=CAP_RINGS {
        let polar = span * ring as f32 / CAP_RINGS as f32;
        for segment in 0..CAP_SEGMENTS {
            let azimuth = TAU * segment as f32 / CAP_SEGMENTS as f32;
            positions.push(Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.sin() * azimuth.sin(),
                polar.cos(),
            ));
        }
    }

    let vertex = |ring: u32, segment: u32| 1 + (ring - 1) * CAP_SEGMENTS + segment % CAP_SEGMENTS;
    let mut indices = Vec::with_capacity((CAP_SEGMENTS * (6 * CAP_RINGS - 3)) as usize);
    for segment in 0..CAP_SEGMENTS {
        indices.extend([0, vertex(1, segment), vertex(1, segment + 1)]);
    }
    for ring in 1..CAP_RINGS {
        for segment in 0..CAP_SEGMENTS {
            let inner = vertex(ring, segment);
            let inner_next = vertex(ring, segment + 1);
            let outer = vertex(ring + 1, segment);
            let outer_next = vertex(ring + 1, segment + 1);
            indices.extend([inner, outer, outer_next, inner, outer_next, inner_next]);
        }
    }

    (positions, indices)
}

/// Unit-sphere cap mesh; [`cap_transform`] places and sizes it
pub fn spherical_cap(angular_radius: f32) -> Mesh {
    let (positions, indices) = cap_geometry(angular_radius);
    let positions: Vec<[f32; 3]> = positions.iter().map(Vec3::to_array).collect();

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_indices(Indices::U32(indices))
}

/// Turn a [`spherical_cap`] to face `center` and lift it just above the
/// sphere surface. `layer` keeps later caps on top of earlier ones.
pub fn cap_transform(center: Vec3, layer: usize) -> Transform {
    let lift = SPHERE_RADIUS * (CAP_LIFT + layer as f32 * 0.0005);
    Transform {
        translation: Vec3::ZERO,
        rotation: Quat::from_rotation_arc(Vec3::Z, center.normalize()),
        scale: Vec3::splat(lift),
    }
}

/// Spawn the sphere and one cap per bacterium from the first frame
pub fn spawn_sphere_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    latest: Res<LatestFrame>,
) {
    let mut unlit = |color: [f32; 4]| {
        materials.add(StandardMaterial {
            base_color: to_color(color),
            unlit: true,
            ..default()
        })
    };

    let (radius, surface_color) = latest
        .0
        .commands
        .iter()
        .find_map(|command| match *command {
            DrawCommand::Surface { radius, color } => Some((radius, color)),
            _ => None,
        })
        .unwrap_or((SPHERE_RADIUS, SURFACE_COLOR));
    let surface_material = unlit(surface_color);

    let caps: Vec<_> = latest
        .0
        .commands
        .iter()
        .enumerate()
        .filter_map(|(layer, command)| match *command {
            DrawCommand::Region {
                id,
                center,
                angular_radius,
                color,
            } => Some((
                id,
                spherical_cap(angular_radius),
                cap_transform(center, layer),
                unlit(color),
            )),
            _ => None,
        })
        .collect();

    commands
        .spawn((
            PlayingSphere,
            Mesh3d(meshes.add(Sphere::new(radius).mesh().uv(64, 32))),
            MeshMaterial3d(surface_material),
            Transform::default(),
        ))
        .with_children(|parent| {
            for (id, cap, transform, material) in caps {
                parent.spawn((
                    BacteriumVisual { id },
                    Mesh3d(meshes.add(cap)),
                    MeshMaterial3d(material),
                    transform,
                ));
            }
        });
}

/// Grow caps to the latest frame and despawn the ones zapped
pub fn sync_sphere_caps(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    latest: Res<LatestFrame>,
    mut visuals: Query<(Entity, &BacteriumVisual, &Mesh3d, &mut Transform)>,
) {
    if !latest.is_changed() {
        return;
    }

    for (entity, visual, mesh, mut transform) in visuals.iter_mut() {
        let drawn = latest
            .0
            .commands
            .iter()
            .enumerate()
            .find(|(_, command)| command.bacterium_id() == Some(visual.id));

        match drawn {
            Some((
                layer,
                DrawCommand::Region {
                    center,
                    angular_radius,
                    ..
                },
            )) => {
                meshes.insert(&mesh.0, spherical_cap(*angular_radius));
                *transform = cap_transform(*center, layer);
            }
            _ => commands.entity(entity).despawn_recursive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bacterium::{Bacterium, Placement};
    use crate::picking::{IdSource, SphereFrame, SurfaceReadback, flip_y};

    #[test]
    fn cap_faces_outward_above_surface() {
        let center = Vec3::new(1.0, 1.0, 0.0).normalize();
        let transform = cap_transform(center, 0);

        assert!(transform.scale.x > SPHERE_RADIUS);
        assert!((transform.rotation * Vec3::Z).distance(center) < 1e-5);
        assert_eq!(transform.translation, Vec3::ZERO);
    }

    #[test]
    fn cap_geometry_spans_the_angular_radius() {
        let (positions, indices) = cap_geometry(0.5);

        assert_eq!(positions[0], Vec3::Z);
        assert!(positions.iter().all(|p| (p.length() - 1.0).abs() < 1e-5));
        let widest = positions
            .iter()
            .map(|p| p.z.clamp(-1.0, 1.0).acos())
            .fold(0.0f32, f32::max);
        assert!((widest - 0.5).abs() < 1e-4);

        assert_eq!(indices.len() % 3, 0);
        assert!(indices.iter().all(|&i| (i as usize) < positions.len()));
        // first fan triangle faces outward
        let [a, b, c] = [0, 1, 2].map(|k| positions[indices[k] as usize]);
        assert!((b - a).cross(c - a).dot(a) > 0.0);
    }

    #[test]
    fn cap_geometry_stops_at_the_antipode() {
        let (positions, _) = cap_geometry(5.0);
        let widest = positions.iter().map(|p| p.z).fold(1.0f32, f32::min);
        assert!((widest + 1.0).abs() < 1e-5);
    }

    #[test]
    fn drawn_cap_points_pick_their_bacterium() {
        // 60 degrees off the view axis, where the cap is seen at a slant
        let center = Quat::from_rotation_y(60f32.to_radians()) * Vec3::Z;
        let mut bacterium = Bacterium::new(
            BacteriumId(7),
            Placement::Sphere(center),
            0.0,
            0.0005,
            [0.2, 0.9, 0.4, 1.0],
        );
        bacterium.radius = 0.5;
        let bacteria = [bacterium];

        // orthographic view down -Z, 1000 pixels per world unit
        let size = 8000;
        let half = size as f32 / 2.0;
        let readback = SurfaceReadback {
            cast: |cursor: Vec2| {
                let world = Vec2::new(cursor.x - half, half - cursor.y) / 1000.0;
                Some(Ray3d {
                    origin: world.extend(10.0),
                    direction: Dir3::NEG_Z,
                })
            },
            frame: SphereFrame {
                rotation: Quat::IDENTITY,
                radius: SPHERE_RADIUS * CAP_LIFT,
            },
            bacteria: &bacteria,
            viewport: UVec2::splat(size),
            surface: SURFACE_COLOR,
            background: [0.0, 0.0, 0.0, 1.0],
        };

        let transform = cap_transform(center, 0);
        let (positions, _) = cap_geometry(0.5);
        let inner = (0.9 * 0.5f32).cos() - 1e-5;
        let mut checked = 0;
        for vertex in positions.into_iter().filter(|p| p.z >= inner) {
            let world = transform.transform_point(vertex);
            let x = (world.x * 1000.0 + half).floor() as u32;
            let row = (half - world.y * 1000.0).floor() as u32;
            assert_eq!(
                readback.read_id(x, flip_y(row, size)),
                Some(BacteriumId(7)),
                "cap vertex {vertex} drawn at {world}"
            );
            checked += 1;
        }
        assert!(checked > CAP_SEGMENTS as usize);
    }
}

use std::f32::consts::TAU;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::PrimaryWindow;

use crate::config::{CAMERA_DISTANCE, CAMERA_FOV_DEGREES, DRAG_AMORTIZATION};
use crate::visuals::PlayingSphere;

#[derive(Component)]
pub struct MainCamera;

/// Drag-controlled spin of the playing sphere
#[derive(Resource, Default)]
pub struct SphereOrbit {
    /// Rotation about the vertical axis
    pub theta: f32,
    /// Rotation about the horizontal axis
    pub phi: f32,
    /// Angular velocity applied per frame
    pub spin: Vec2,
    pub is_dragging: bool,
}

impl SphereOrbit {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.theta) * Quat::from_rotation_x(self.phi)
    }

    /// Start a drag on press; end it on release or when the cursor leaves the window
    pub fn track_drag(&mut self, pressed: bool, released: bool, cursor_in_window: bool) {
        if pressed {
            self.is_dragging = true;
        }
        if released || !cursor_in_window {
            self.is_dragging = false;
        }
    }
}

/// Orthographic camera whose view spans clip space exactly, so world units
/// are the clip coordinates bacteria are placed in.
///
/// Both cameras skip tonemapping so pixels keep the stored bacterium colors.
pub fn setup_flat_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MainCamera,
        Tonemapping::None,
        OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: 2.0,
                height: 2.0,
            },
            ..OrthographicProjection::default_2d()
        },
    ));
}

pub fn setup_sphere_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        MainCamera,
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: 1.0,
            far: 100.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn orbit_sphere(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut motion_events: EventReader<MouseMotion>,
    mut orbit: ResMut<SphereOrbit>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut spheres: Query<&mut Transform, With<PlayingSphere>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    orbit.track_drag(
        mouse_button.just_pressed(MouseButton::Left),
        mouse_button.just_released(MouseButton::Left),
        window.cursor_position().is_some(),
    );

    if orbit.is_dragging {
        // A full window width of drag turns the sphere once
        let per_pixel = TAU / Vec2::new(window.width(), window.height());
        orbit.spin = motion_events
            .read()
            .fold(Vec2::ZERO, |spin, event| spin + event.delta * per_pixel);
    } else {
        motion_events.clear();
        orbit.spin *= DRAG_AMORTIZATION;
    }

    let spin = orbit.spin;
    orbit.theta += spin.x;
    orbit.phi += spin.y;

    for mut transform in spheres.iter_mut() {
        transform.rotation = orbit.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned_tonemapping<M>(setup: impl IntoSystemConfigs<M>) -> Vec<Tonemapping> {
        let mut app = App::new();
        app.add_systems(Startup, setup);
        app.update();
        app.world_mut()
            .query_filtered::<&Tonemapping, With<MainCamera>>()
            .iter(app.world())
            .copied()
            .collect()
    }

    #[test]
    fn cameras_keep_stored_colors() {
        assert_eq!(spawned_tonemapping(setup_flat_camera), vec![Tonemapping::None]);
        assert_eq!(spawned_tonemapping(setup_sphere_camera), vec![Tonemapping::None]);
    }

    #[test]
    fn drag_ends_when_cursor_leaves_window() {
        let mut orbit = SphereOrbit::default();
        orbit.track_drag(true, false, true);
        assert!(orbit.is_dragging);

        orbit.track_drag(false, false, true);
        assert!(orbit.is_dragging);

        orbit.track_drag(false, false, false);
        assert!(!orbit.is_dragging);
    }

    #[test]
    fn drag_ends_on_release() {
        let mut orbit = SphereOrbit::default();
        orbit.track_drag(true, false, true);
        orbit.track_drag(false, true, true);
        assert!(!orbit.is_dragging);
    }
}

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::camera::MainCamera;
use crate::config::{
    BACKGROUND_COLOR, CAP_LIFT, GameRules, HitTesting, SPHERE_RADIUS, SURFACE_COLOR,
};
use crate::game_loop::{GameLoopController, Probe};
use crate::hit_test::viewport_to_clip;
use crate::picking::{IdSource, PixelSource, SphereFrame, SurfaceReadback, cursor_to_pixel};
use crate::plugin::PointerClick;
use crate::visuals::PlayingSphere;

/// Whether a left click this frame should reach the playing field
fn field_clicked(mouse_button: &ButtonInput<MouseButton>, contexts: &mut EguiContexts) -> bool {
    mouse_button.just_pressed(MouseButton::Left) && !contexts.ctx_mut().is_pointer_over_area()
}

/// System turning left clicks on the flat disk into clip-space probes
pub fn flat_pointer_clicks(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut clicks: EventWriter<PointerClick>,
) {
    if !field_clicked(&mouse_button, &mut contexts) {
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };

    if let Some(cursor) = window.cursor_position() {
        let clip = viewport_to_clip(cursor, window.size());
        clicks.send(PointerClick(Probe::Point(clip)));
    }
}

/// System sampling the rendered sphere under a left click.
///
/// Runs before the orbit update so the sample matches the frame the player saw.
pub fn sphere_pointer_clicks(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    spheres: Query<&GlobalTransform, With<PlayingSphere>>,
    rules: Res<GameRules>,
    controller: Res<GameLoopController>,
    mut clicks: EventWriter<PointerClick>,
) {
    if !field_clicked(&mouse_button, &mut contexts) {
        return;
    }

    let (Ok(window), Ok((camera, camera_transform)), Ok(sphere_transform)) =
        (windows.get_single(), camera_query.get_single(), spheres.get_single())
    else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let (_, rotation, _) = sphere_transform.to_scale_rotation_translation();
    let viewport = UVec2::new(window.width() as u32, window.height() as u32);
    let readback = SurfaceReadback {
        cast: |position: Vec2| camera.viewport_to_world(camera_transform, position).ok(),
        frame: SphereFrame {
            rotation,
            radius: SPHERE_RADIUS * CAP_LIFT,
        },
        bacteria: controller.session().bacteria(),
        viewport,
        surface: SURFACE_COLOR,
        background: BACKGROUND_COLOR,
    };

    let (x, y) = cursor_to_pixel(cursor, viewport.y);
    let probe = match rules.hit_testing {
        HitTesting::ColorPick { .. } => match readback.read_pixel(x, y) {
            Some(pixel) => Probe::Pixel(pixel),
            None => return,
        },
        HitTesting::IdPick => Probe::Id(readback.read_id(x, y)),
        HitTesting::Geometric => {
            warn!("Sphere field cannot be hit tested geometrically");
            return;
        }
    };

    clicks.send(PointerClick(probe));
}

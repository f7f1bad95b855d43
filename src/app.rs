use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use crate::camera::{SphereOrbit, orbit_sphere, setup_flat_camera, setup_sphere_camera};
use crate::config::{BACKGROUND_COLOR, GameRules, Variant};
use crate::input::{flat_pointer_clicks, sphere_pointer_clicks};
use crate::plugin::{FrameTiming, GameCorePlugin, ZapperSet};
use crate::ui::scoreboard_ui;
use crate::visuals::{
    spawn_flat_field, spawn_sphere_field, sync_flat_bacteria, sync_sphere_caps, to_color,
};

/// The playable game: core loop plus camera, input, visuals and score window
pub struct ZapperPlugin {
    pub rules: GameRules,
    pub timing: FrameTiming,
}

impl ZapperPlugin {
    pub fn new(rules: GameRules) -> Self {
        Self {
            rules,
            timing: FrameTiming::default(),
        }
    }
}

impl Plugin for ZapperPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_plugins(GameCorePlugin::new(self.rules.clone()).with_timing(self.timing))
            .insert_resource(ClearColor(to_color(BACKGROUND_COLOR)))
            .add_systems(Update, scoreboard_ui.in_set(ZapperSet::Present));

        match self.rules.variant {
            Variant::Flat => {
                app.add_systems(Startup, (setup_flat_camera, spawn_flat_field))
                    .add_systems(
                        Update,
                        (
                            flat_pointer_clicks.in_set(ZapperSet::Input),
                            sync_flat_bacteria.in_set(ZapperSet::Present),
                        ),
                    );
            }
            Variant::Sphere => {
                app.init_resource::<SphereOrbit>()
                    .add_systems(Startup, (setup_sphere_camera, spawn_sphere_field))
                    .add_systems(
                        Update,
                        (
                            sphere_pointer_clicks
                                .in_set(ZapperSet::Input)
                                .before(orbit_sphere),
                            orbit_sphere.in_set(ZapperSet::Input),
                            sync_sphere_caps.in_set(ZapperSet::Present),
                        ),
                    );
            }
        }
    }
}

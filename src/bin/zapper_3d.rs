use anyhow::Context;
use bevy::prelude::*;
use zapper::app::ZapperPlugin;
use zapper::config::GameRules;

fn main() -> anyhow::Result<()> {
    let rules = GameRules::sphere_random(&mut rand::thread_rng());
    rules.validate().context("invalid sphere zapper rules")?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bacteria Zapper 3D".to_string(),
                resolution: (800.0, 800.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ZapperPlugin::new(rules))
        .run();

    Ok(())
}

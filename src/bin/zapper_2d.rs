use anyhow::Context;
use bevy::prelude::*;
use zapper::app::ZapperPlugin;
use zapper::config::GameRules;

fn main() -> anyhow::Result<()> {
    let rules = GameRules::flat();
    rules.validate().context("invalid flat zapper rules")?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bacteria Zapper".to_string(),
                // Square so the clip-space disk stays round
                resolution: (640.0, 640.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ZapperPlugin::new(rules))
        .run();

    Ok(())
}

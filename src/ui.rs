use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::Variant;
use crate::game_loop::GameLoopController;
use crate::score::GamePhase;

/// Score window: player and game counters, then the outcome once decided
pub fn scoreboard_ui(mut contexts: EguiContexts, controller: Res<GameLoopController>) {
    let session = controller.session();
    let score = session.score();
    let rules = session.rules();

    egui::Window::new("Bacteria Zapper")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.label(format!(
                "Player gains: {} / {}",
                score.player_score(),
                score.target_score()
            ));
            ui.label(format!(
                "{}: {} / {}",
                rules.maturity.label(),
                score.adverse_count(),
                score.adverse_limit()
            ));
            ui.label(format!("Bacteria left: {}", session.live_bacteria().count()));

            ui.separator();
            match score.phase() {
                GamePhase::Running => {
                    ui.label("Zap the bacteria before they grow!");
                }
                GamePhase::Won => {
                    ui.colored_label(egui::Color32::from_rgb(100, 255, 100), "You win!");
                }
                GamePhase::Lost => {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), "You lose!");
                }
            }

            ui.separator();
            ui.label("Controls:");
            ui.label("• Left Click - Zap bacterium");
            if rules.variant == Variant::Sphere {
                ui.label("• Left Drag - Spin the sphere");
            }
        });
}

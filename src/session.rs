use bevy::prelude::*;
use rand::Rng;

use crate::bacterium::{Bacterium, BacteriumId};
use crate::config::{GameRules, RemovalPolicy};
use crate::factory::BacteriumFactory;
use crate::growth::GrowthScheduler;
use crate::score::{GamePhase, ScoreTracker};

/// All mutable state of one game
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: GameRules,
    bacteria: Vec<Bacterium>,
    growth: GrowthScheduler,
    score: ScoreTracker,
    ticks: u64,
}

impl GameSession {
    /// Session over an explicit set of bacteria, in spawn order
    pub fn new(rules: GameRules, bacteria: Vec<Bacterium>) -> Self {
        let growth = GrowthScheduler::new(rules.threshold);
        let score = ScoreTracker::new(rules.target_score, rules.adverse_limit);
        Self {
            rules,
            bacteria,
            growth,
            score,
            ticks: 0,
        }
    }

    /// Spawn the rules' batch of bacteria and start a session over them
    pub fn start<R: Rng>(rules: GameRules, rng: R) -> Self {
        let bacteria = BacteriumFactory::new(rng, rules.spawn).spawn_batch(rules.spawn_count);
        Self::new(rules, bacteria)
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn bacteria(&self) -> &[Bacterium] {
        &self.bacteria
    }

    pub fn live_bacteria(&self) -> impl Iterator<Item = &Bacterium> {
        self.bacteria.iter().filter(|b| b.alive)
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    pub fn phase(&self) -> GamePhase {
        self.score.phase()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Grow everything by `dt` ticks and count the bacteria that matured.
    /// Does not settle the phase; see [`GameSession::evaluate`].
    pub fn advance(&mut self, dt: f32) -> Vec<BacteriumId> {
        if self.phase().is_terminal() {
            return Vec::new();
        }

        self.ticks += 1;
        let matured = self.growth.tick(&mut self.bacteria, dt);
        let weight = self.rules.maturity.weight();
        for id in &matured {
            self.score.record_maturity(weight);
            info!(
                "Bacterium {} matured. {}: {}",
                id.0,
                self.rules.maturity.label(),
                self.score.adverse_count()
            );
        }
        matured
    }

    pub fn evaluate(&mut self) -> GamePhase {
        self.score.evaluate()
    }

    /// Zap the bacterium at `index` and credit the player.
    /// Returns the zapped bacterium's id, or None if it was not alive.
    pub fn zap(&mut self, index: usize) -> Option<BacteriumId> {
        if self.phase().is_terminal() {
            return None;
        }

        let id = match self.rules.removal {
            RemovalPolicy::Hide => {
                let bacterium = self.bacteria.get_mut(index)?;
                bacterium.kill().then_some(bacterium.id)?
            }
            RemovalPolicy::Delete => {
                if !self.bacteria.get(index)?.alive {
                    return None;
                }
                self.bacteria.remove(index).id
            }
        };

        self.score.record_hit(self.rules.points_per_hit);
        info!(
            "Bacterium {} zapped. Player gains: {}",
            id.0,
            self.score.player_score()
        );
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn flat_zap_hides_in_place() {
        let mut session = GameSession::start(GameRules::flat(), StdRng::seed_from_u64(1));
        let id = session.zap(3).unwrap();

        assert_eq!(session.bacteria().len(), 10);
        assert_eq!(session.bacteria()[3].id, id);
        assert!(!session.bacteria()[3].alive);
        assert_eq!(session.live_bacteria().count(), 9);
        assert_eq!(session.score().player_score(), 1);

        // second zap on the same index is a miss
        assert_eq!(session.zap(3), None);
        assert_eq!(session.score().player_score(), 1);
    }

    #[test]
    fn sphere_zap_deletes() {
        let mut session = GameSession::start(GameRules::sphere(3), StdRng::seed_from_u64(2));
        let second = session.bacteria()[1].id;

        assert_eq!(session.zap(1), Some(second));
        assert_eq!(session.bacteria().len(), 2);
        assert!(session.bacteria().iter().all(|b| b.id != second));
        assert_eq!(session.score().player_score(), 15);
        assert_eq!(session.zap(5), None);
    }

    #[test]
    fn flat_maturity_awards_game_points() {
        let mut session = GameSession::start(GameRules::flat(), StdRng::seed_from_u64(3));
        session.zap(0);

        let mut matured = Vec::new();
        while matured.is_empty() {
            matured = session.advance(1.0);
        }

        // the zapped bacterium stopped growing and never matures
        assert_eq!(matured.len(), 9);
        assert_eq!(session.score().adverse_count(), 45);
        assert_eq!(session.evaluate(), GamePhase::Lost);
    }

    #[test]
    fn empty_sphere_session_wins_on_first_evaluation() {
        let mut session = GameSession::start(GameRules::sphere(0), StdRng::seed_from_u64(5));
        assert!(session.bacteria().is_empty());
        assert_eq!(session.phase(), GamePhase::Running);

        assert!(session.advance(1.0).is_empty());
        assert_eq!(session.evaluate(), GamePhase::Won);
    }

    #[test]
    fn empty_flat_session_keeps_running() {
        let rules = GameRules {
            spawn_count: 0,
            ..GameRules::flat()
        };
        let mut session = GameSession::start(rules, StdRng::seed_from_u64(6));
        for _ in 0..1000 {
            session.advance(1.0);
            assert_eq!(session.evaluate(), GamePhase::Running);
        }
        assert_eq!(session.zap(0), None);
    }

    #[test]
    fn terminal_session_stops_advancing() {
        let mut session = GameSession::start(GameRules::sphere(2), StdRng::seed_from_u64(4));
        session.zap(0);
        session.zap(0);
        assert_eq!(session.evaluate(), GamePhase::Won);

        let ticks = session.ticks();
        assert!(session.advance(5000.0).is_empty());
        assert_eq!(session.ticks(), ticks);
        assert_eq!(session.score().adverse_count(), 0);
    }
}

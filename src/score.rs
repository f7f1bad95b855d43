use std::fmt;

/// Phase of a session. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Running,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::Running
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Running => write!(f, "Running"),
            GamePhase::Won => write!(f, "You win!"),
            GamePhase::Lost => write!(f, "You lose!"),
        }
    }
}

/// Player score, loss counter and the win/loss state machine
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    player_score: u32,
    adverse_count: u32,
    target_score: u32,
    adverse_limit: u32,
    phase: GamePhase,
}

impl ScoreTracker {
    pub fn new(target_score: u32, adverse_limit: u32) -> Self {
        Self {
            player_score: 0,
            adverse_count: 0,
            target_score,
            adverse_limit,
            phase: GamePhase::Running,
        }
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn adverse_count(&self) -> u32 {
        self.adverse_count
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn adverse_limit(&self) -> u32 {
        self.adverse_limit
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Credit the player for a zapped bacterium. Ignored once terminal.
    pub fn record_hit(&mut self, points: u32) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.player_score = self.player_score.saturating_add(points);
        true
    }

    /// Count a matured bacterium toward the loss limit. Ignored once terminal.
    pub fn record_maturity(&mut self, weight: u32) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.adverse_count = self.adverse_count.saturating_add(weight);
        true
    }

    /// Settle the phase. The loss limit is checked before the target score,
    /// so a session satisfying both in one evaluation is lost.
    pub fn evaluate(&mut self) -> GamePhase {
        if self.phase == GamePhase::Running {
            if self.adverse_count >= self.adverse_limit {
                self.phase = GamePhase::Lost;
            } else if self.player_score >= self.target_score {
                self.phase = GamePhase::Won;
            }
        }
        self.phase
    }
}

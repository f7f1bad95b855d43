use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GameRules, REFERENCE_FPS};
use crate::game_loop::{ClickResult, Frame, FrameSink, GameLoopController, Probe, TickOutcome};
use crate::score::GamePhase;
use crate::session::GameSession;

/// Click delivered by the input layer, already resolved into a probe
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerClick(pub Probe);

/// Sent once, on the tick the session becomes terminal
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameFinished(pub GamePhase);

/// How many growth ticks one frame is worth
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub enum FrameTiming {
    /// A fixed number of ticks per frame regardless of frame duration
    PerFrame(f32),
    /// Frame duration scaled so growth speed matches `reference_fps` ticks per second
    RealTime { reference_fps: f32 },
}

impl Default for FrameTiming {
    fn default() -> Self {
        FrameTiming::RealTime {
            reference_fps: REFERENCE_FPS,
        }
    }
}

impl FrameTiming {
    pub fn ticks(&self, frame_secs: f32) -> f32 {
        match *self {
            FrameTiming::PerFrame(ticks) => ticks,
            FrameTiming::RealTime { reference_fps } => frame_secs * reference_fps,
        }
    }
}

/// Most recent render request from the game loop
#[derive(Resource, Debug, Default)]
pub struct LatestFrame(pub Frame);

impl FrameSink for LatestFrame {
    fn present(&mut self, frame: &Frame) {
        self.0 = frame.clone();
    }
}

/// Per-frame ordering: input is turned into clicks, the tick runs, clicks are
/// applied for the next tick to settle, then presentation reads the result
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZapperSet {
    Input,
    Tick,
    Clicks,
    Present,
}

/// Game rules, session and tick loop without any rendering or input
pub struct GameCorePlugin {
    pub rules: GameRules,
    pub seed: Option<u64>,
    pub timing: FrameTiming,
}

impl GameCorePlugin {
    pub fn new(rules: GameRules) -> Self {
        Self {
            rules,
            seed: None,
            timing: FrameTiming::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timing(mut self, timing: FrameTiming) -> Self {
        self.timing = timing;
        self
    }
}

impl Plugin for GameCorePlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let controller = GameLoopController::new(GameSession::start(self.rules.clone(), rng));
        info!(
            "{:?} session started with {} bacteria, target {} points",
            self.rules.variant,
            controller.session().bacteria().len(),
            self.rules.target_score
        );

        app.insert_resource(self.rules.clone())
            .insert_resource(self.timing)
            .insert_resource(LatestFrame(controller.frame()))
            .insert_resource(controller)
            .add_event::<PointerClick>()
            .add_event::<GameFinished>()
            .configure_sets(
                Update,
                (ZapperSet::Input, ZapperSet::Tick, ZapperSet::Clicks, ZapperSet::Present).chain(),
            )
            .add_systems(
                Update,
                (
                    advance_game.in_set(ZapperSet::Tick).run_if(game_running),
                    apply_pointer_clicks.in_set(ZapperSet::Clicks),
                ),
            );
    }
}

pub fn game_running(controller: Res<GameLoopController>) -> bool {
    controller.is_running()
}

/// System running one game loop tick per frame
pub fn advance_game(
    time: Res<Time>,
    timing: Res<FrameTiming>,
    mut controller: ResMut<GameLoopController>,
    mut latest: ResMut<LatestFrame>,
    mut finished: EventWriter<GameFinished>,
) {
    let dt = timing.ticks(time.delta_secs());
    if let TickOutcome::Finished(phase) = controller.tick(dt, &mut *latest) {
        finished.send(GameFinished(phase));
    }
}

/// System feeding clicks into the game loop
pub fn apply_pointer_clicks(
    mut clicks: EventReader<PointerClick>,
    mut controller: ResMut<GameLoopController>,
) {
    for PointerClick(probe) in clicks.read() {
        if controller.handle_click(*probe) == ClickResult::Miss {
            debug!("Click missed: {probe:?}");
        }
    }
}

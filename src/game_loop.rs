use bevy::prelude::*;

use crate::bacterium::{BacteriumId, Placement};
use crate::config::{DISK_COLOR, DISK_RADIUS, HitTesting, SPHERE_RADIUS, SURFACE_COLOR, Variant};
use crate::hit_test::{ColorPickHitTester, GeometricHitTester, HitTester, IdPickHitTester};
use crate::score::GamePhase;
use crate::session::GameSession;

/// One draw request handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The flat playing disk
    Disk {
        radius: f32,
        color: [f32; 4],
    },
    /// The bare sphere surface
    Surface {
        radius: f32,
        color: [f32; 4],
    },
    /// A flat bacterium
    Circle {
        id: BacteriumId,
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// A sphere bacterium cap
    Region {
        id: BacteriumId,
        center: Vec3,
        angular_radius: f32,
        color: [f32; 4],
    },
}

impl DrawCommand {
    pub fn bacterium_id(&self) -> Option<BacteriumId> {
        match self {
            DrawCommand::Circle { id, .. } | DrawCommand::Region { id, .. } => Some(*id),
            DrawCommand::Disk { .. } | DrawCommand::Surface { .. } => None,
        }
    }
}

/// Everything the renderer needs for one frame, in draw order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn bacterium(&self, id: BacteriumId) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.bacterium_id() == Some(id))
    }
}

/// Receives render requests from the game loop
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// What the input layer measured under a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    /// Click position in clip coordinates
    Point(Vec2),
    /// Color read back from the rendered pixel under the click
    Pixel([u8; 4]),
    /// Id read back from the picking buffer under the click
    Id(Option<BacteriumId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Finished(GamePhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    Hit(BacteriumId),
    Miss,
    /// The session is over or the probe does not fit the session's hit testing
    Ignored,
}

/// Drives a session tick by tick and routes clicks into it
#[derive(Resource, Debug, Clone)]
pub struct GameLoopController {
    session: GameSession,
}

impl GameLoopController {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn is_running(&self) -> bool {
        !self.phase().is_terminal()
    }

    /// Run one tick: growth, maturity, win/loss evaluation, then a render
    /// request. Once the session is terminal this does nothing.
    pub fn tick(&mut self, dt: f32, sink: &mut impl FrameSink) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Finished(self.phase());
        }

        self.session.advance(dt);
        let phase = self.session.evaluate();
        sink.present(&self.frame());

        if phase.is_terminal() {
            let score = self.session.score();
            info!(
                "{} Player gains: {}, {}: {} after {} ticks",
                phase,
                score.player_score(),
                self.session.rules().maturity.label(),
                score.adverse_count(),
                self.session.ticks()
            );
            TickOutcome::Finished(phase)
        } else {
            TickOutcome::Continue
        }
    }

    /// Apply a click between ticks. The score change is settled by the next tick.
    pub fn handle_click(&mut self, probe: Probe) -> ClickResult {
        if !self.is_running() {
            return ClickResult::Ignored;
        }

        let bacteria = self.session.bacteria();
        let index = match (self.session.rules().hit_testing, probe) {
            (HitTesting::Geometric, Probe::Point(point)) => {
                GeometricHitTester.test_hit(&point, bacteria)
            }
            (HitTesting::ColorPick { tolerance }, Probe::Pixel(sample)) => {
                ColorPickHitTester::new(tolerance).test_hit(&sample, bacteria)
            }
            (HitTesting::IdPick, Probe::Id(picked)) => IdPickHitTester.test_hit(&picked, bacteria),
            (hit_testing, probe) => {
                warn!("Probe {probe:?} does not fit {hit_testing:?} hit testing");
                return ClickResult::Ignored;
            }
        };

        match index.and_then(|index| self.session.zap(index)) {
            Some(id) => ClickResult::Hit(id),
            None => ClickResult::Miss,
        }
    }

    /// Draw requests for the current state
    pub fn frame(&self) -> Frame {
        let field = match self.session.rules().variant {
            Variant::Flat => DrawCommand::Disk {
                radius: DISK_RADIUS,
                color: DISK_COLOR,
            },
            Variant::Sphere => DrawCommand::Surface {
                radius: SPHERE_RADIUS,
                color: SURFACE_COLOR,
            },
        };

        let bacteria = self.session.live_bacteria().map(|bacterium| match bacterium.placement {
            Placement::Disk(center) => DrawCommand::Circle {
                id: bacterium.id,
                center,
                radius: bacterium.radius,
                color: bacterium.color,
            },
            Placement::Sphere(center) => DrawCommand::Region {
                id: bacterium.id,
                center,
                angular_radius: bacterium.radius,
                color: bacterium.color,
            },
        });

        Frame {
            commands: std::iter::once(field).chain(bacteria).collect(),
        }
    }
}

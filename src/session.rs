use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::avatar::{Avatar, Phase};
use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::obstacle::Obstacle;
use crate::scroller::Scroller;
use crate::stream::ObstacleStream;

const WING_PERIOD_MS: u128 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Floating before the first jump.
    Waiting,
    Running,
    /// Hit something; falling to the ground with the world frozen.
    Dying,
    Ended,
}

/// Something the presentation layer may want to react to, typically with a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Scored,
    Died,
    Landed,
}

/// Input gathered by the frame loop since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub jump: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub state: SessionState,
    pub score: u32,
    pub events: Vec<GameEvent>,
}

impl FrameReport {
    pub fn is_alive(&self) -> bool {
        matches!(self.state, SessionState::Waiting | SessionState::Running)
    }
}

/// Read-only view of a session for drawing.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: SessionState,
    pub score: u32,
    pub avatar: Rect,
    pub phase: Phase,
    pub wing_up: bool,
    /// Degrees of nose-down rotation; zero unless dying or ended.
    pub tilt: f64,
    pub obstacles: &'a [Obstacle],
    pub ground_offset: f64,
    pub ground_line: f64,
}

/// One play-through, from the floating start screen to the bird on the ground.
/// Build a fresh session to play again.
pub struct GameSession<R = StdRng> {
    config: GameConfig,
    rng: R,
    avatar: Avatar,
    stream: ObstacleStream,
    ground: Scroller,
    score: u32,
    state: SessionState,
    clock: Duration,
}

impl GameSession<StdRng> {
    pub fn seeded(config: &GameConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            config: config.clone(),
            rng,
            avatar: Avatar::new(config),
            stream: ObstacleStream::new(),
            ground: Scroller::new(config),
            score: 0,
            state: SessionState::Waiting,
            clock: Duration::ZERO,
        }
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self, input: FrameInput) -> FrameReport {
        self.clock += input.elapsed;
        let mut events = Vec::new();

        match self.state {
            SessionState::Waiting => {
                if input.jump {
                    self.state = SessionState::Running;
                    self.avatar.jump();
                    events.push(GameEvent::Jumped);
                    tracing::info!("session started");
                }
            }
            SessionState::Running => self.run_frame(input, &mut events),
            SessionState::Dying => self.dying_frame(&mut events),
            SessionState::Ended => {}
        }

        FrameReport {
            state: self.state,
            score: self.score,
            events,
        }
    }

    fn run_frame(&mut self, input: FrameInput, events: &mut Vec<GameEvent>) {
        if input.jump {
            self.avatar.jump();
            events.push(GameEvent::Jumped);
        }

        if self.config.spawn_obstacles {
            self.stream
                .maybe_spawn(input.elapsed, &self.config, &mut self.rng);
        }
        self.stream.advance_all(self.config.scroll_step);
        self.ground.advance();
        self.avatar.advance();

        let bbox = self.avatar.bounding_box();
        let hit_obstacle = self.stream.check_collisions(&bbox);
        if hit_obstacle || bbox.top() < 0.0 || bbox.bottom() >= self.config.ground_line() {
            self.state = SessionState::Dying;
            self.avatar.cancel_jump();
            events.push(GameEvent::Died);
            tracing::info!(score = self.score, hit_obstacle, "avatar died");
            return;
        }

        let passed = self.stream.collect_score_events(self.avatar.x());
        self.score += passed;
        events.extend(std::iter::repeat_n(GameEvent::Scored, passed as usize));
    }

    fn dying_frame(&mut self, events: &mut Vec<GameEvent>) {
        self.ground.advance();
        if !self.on_ground() {
            self.avatar.fall();
        }
        if self.on_ground() {
            self.state = SessionState::Ended;
            events.push(GameEvent::Landed);
            tracing::info!(score = self.score, "session ended");
        }
    }

    fn on_ground(&self) -> bool {
        self.avatar.bounding_box().bottom() >= self.config.ground_line()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let tilt = match self.state {
            SessionState::Dying | SessionState::Ended => {
                self.config.height / 2.0 - self.avatar.y()
            }
            _ => 0.0,
        };
        Snapshot {
            state: self.state,
            score: self.score,
            avatar: self.avatar.bounding_box(),
            phase: self.avatar.phase(),
            wing_up: self.clock.as_millis() % WING_PERIOD_MS >= WING_PERIOD_MS / 2,
            tilt,
            obstacles: self.stream.obstacles(),
            ground_offset: self.ground.offset(),
            ground_line: self.config.ground_line(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Available once the session has ended.
    pub fn final_score(&self) -> Option<u32> {
        (self.state == SessionState::Ended).then_some(self.score)
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn obstacles(&self) -> &ObstacleStream {
        &self.stream
    }

    #[cfg(test)]
    pub(crate) fn stream_mut(&mut self) -> &mut ObstacleStream {
        &mut self.stream
    }
}

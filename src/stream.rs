use std::time::Duration;

use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::obstacle::Obstacle;

/// Live obstacles in spawn order, which is also their left-to-right order
/// since they all scroll at the same speed.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    since_spawn: Duration,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates wall-clock time and spawns at most one obstacle once the
    /// interval is reached. The part of the frame past the interval carries
    /// over; whole intervals missed in one long frame are dropped. Returns
    /// whether a spawn happened.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        elapsed: Duration,
        config: &GameConfig,
        rng: &mut R,
    ) -> bool {
        self.since_spawn += elapsed;
        if self.since_spawn < config.spawn_interval {
            return false;
        }
        let interval = config.spawn_interval.as_nanos();
        self.since_spawn = Duration::from_nanos((self.since_spawn.as_nanos() % interval) as u64);
        self.push(Obstacle::new(config, rng));
        true
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        tracing::trace!(gap_top = obstacle.gap_top(), "obstacle spawned");
        self.obstacles.push(obstacle);
    }

    /// Moves every obstacle, then drops the ones that left the screen.
    pub fn advance_all(&mut self, step: f64) {
        for o in &mut self.obstacles {
            o.advance(step);
        }
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_offscreen());
        let removed = before - self.obstacles.len();
        if removed > 0 {
            tracing::trace!(removed, "obstacles despawned");
        }
    }

    pub fn check_collisions(&self, avatar: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.collides_with(avatar))
    }

    /// Number of obstacles the avatar passed for the first time this frame.
    pub fn collect_score_events(&mut self, avatar_x: f64) -> u32 {
        self.obstacles
            .iter_mut()
            .map(|o| o.mark_scored_if_passed(avatar_x))
            .filter(|scored| *scored)
            .count() as u32
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

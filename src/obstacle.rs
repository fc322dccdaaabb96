use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::Rect;

/// One pipe pair. `gap_top` is where the top pipe's image starts and is
/// usually negative: the top pipe always has its full height, part of it
/// hanging above the screen. The passable opening spans
/// `gap_top + max_barrier_height .. gap_bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    x: f64,
    gap_top: f64,
    gap_bottom: f64,
    scored: bool,
    width: f64,
    max_barrier_height: f64,
}

impl Obstacle {
    /// Spawns at the right edge of the screen with a random gap.
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let draw = rng.gen_range(config.gap_draw.clone());
        Self::with_draw(config, draw)
    }

    /// Same as [`Obstacle::new`] with the random draw already made.
    pub fn with_draw(config: &GameConfig, draw: i32) -> Self {
        let gap_top = draw as f64 - config.max_barrier_height;
        Self {
            x: config.width,
            gap_top,
            gap_bottom: gap_top + config.max_barrier_height + config.gap_height(),
            scored: false,
            width: config.barrier_width,
            max_barrier_height: config.max_barrier_height,
        }
    }

    pub fn advance(&mut self, step: f64) {
        self.x -= step;
    }

    pub fn is_offscreen(&self) -> bool {
        self.x <= -self.width
    }

    pub fn collides_with(&self, avatar: &Rect) -> bool {
        avatar.overlaps_x(self.x, self.x + self.width)
            && !avatar.strictly_within_y(self.opening_top(), self.gap_bottom)
    }

    /// Returns true exactly once: the first time the avatar is past `x`.
    pub fn mark_scored_if_passed(&mut self, avatar_x: f64) -> bool {
        if avatar_x > self.x && !self.scored {
            self.scored = true;
            return true;
        }
        false
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn gap_top(&self) -> f64 {
        self.gap_top
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_bottom
    }

    /// Y of the lower edge of the top pipe.
    pub fn opening_top(&self) -> f64 {
        self.gap_top + self.max_barrier_height
    }

    pub fn scored(&self) -> bool {
        self.scored
    }

    #[cfg(test)]
    pub(crate) fn set_x(&mut self, x: f64) {
        self.x = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn obstacle_at(x: f64, draw: i32) -> Obstacle {
        let mut o = Obstacle::with_draw(&GameConfig::default(), draw);
        o.set_x(x);
        o
    }

    #[test]
    fn spawns_at_right_edge() {
        let config = GameConfig::default();
        let o = Obstacle::with_draw(&config, 100);
        assert_eq!(o.x(), 300.0);
        assert_eq!(o.gap_top(), -220.0);
        assert_eq!(o.opening_top(), 100.0);
        assert_eq!(o.gap_bottom(), 240.0);
        assert!(!o.scored());
    }

    #[test]
    fn gap_is_constant_across_random_obstacles() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let o = Obstacle::new(&config, &mut rng);
            assert_eq!(o.gap_bottom() - o.opening_top(), config.gap_height());
            assert_eq!(
                o.gap_bottom() - o.gap_top(),
                config.max_barrier_height + config.gap_height()
            );
            assert!((50.0..=250.0).contains(&o.opening_top()));
        }
    }

    #[test]
    fn touching_the_gap_edges_collides() {
        // opening 100..240
        let o = obstacle_at(100.0, 100);
        let flush_top = Rect::new(100.0, 100.0, 48.0, 35.0);
        assert!(o.collides_with(&flush_top));
        let flush_bottom = Rect::new(100.0, 205.0, 48.0, 35.0);
        assert!(o.collides_with(&flush_bottom));
    }

    #[test]
    fn inside_the_gap_does_not_collide() {
        let o = obstacle_at(100.0, 100);
        // gap is 140 tall, so a box of 138 leaves one unit on each side
        let inside = Rect::new(100.0, 101.0, 48.0, 138.0);
        assert!(!o.collides_with(&inside));
    }

    #[test]
    fn never_collides_outside_horizontal_span() {
        let o = obstacle_at(100.0, 100);
        for y in [-100.0, 0.0, 50.0, 150.0, 300.0, 450.0] {
            assert!(!o.collides_with(&Rect::new(0.0, y, 48.0, 35.0)));
            assert!(!o.collides_with(&Rect::new(52.0, y, 48.0, 35.0)));
            assert!(!o.collides_with(&Rect::new(152.0, y, 48.0, 35.0)));
        }
    }

    #[test]
    fn scores_once() {
        let mut o = obstacle_at(90.0, 100);
        assert!(!o.mark_scored_if_passed(90.0));
        assert!(o.mark_scored_if_passed(102.0));
        assert!(!o.mark_scored_if_passed(102.0));
        assert!(o.scored());
    }

    #[test]
    fn offscreen_once_fully_past_left_edge() {
        let mut o = obstacle_at(-50.0, 100);
        assert!(!o.is_offscreen());
        o.advance(2.0);
        assert!(o.is_offscreen());
    }
}

use std::f64::consts::PI;

use crate::config::GameConfig;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Rising,
    Falling,
}

/// The player. Its x never changes; only y moves, driven by the jump counter.
#[derive(Debug, Clone)]
pub struct Avatar {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    jump_steps: u32,
    jump_steps_remaining: u32,
    jump_rise_rate: f64,
    fall_rate: f64,
}

impl Avatar {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.width / 2.0 - config.avatar_width,
            y: config.height / 2.0 - config.avatar_height / 2.0,
            w: config.avatar_width,
            h: config.avatar_height,
            jump_steps: config.jump_steps,
            jump_steps_remaining: 0,
            jump_rise_rate: config.jump_rise_rate,
            fall_rate: config.fall_rate,
        }
    }

    /// Restarts the rise. A jump mid-rise does not queue, it resets the counter.
    pub fn jump(&mut self) {
        self.jump_steps_remaining = self.jump_steps;
    }

    pub fn advance(&mut self) {
        if self.jump_steps_remaining > 0 {
            let step = (self.jump_steps - self.jump_steps_remaining) as f64;
            self.y -= (1.0 - (step * PI).cos()) * self.jump_rise_rate;
            self.jump_steps_remaining -= 1;
        } else {
            self.fall();
        }
    }

    /// Plain gravity step, ignoring any pending jump.
    pub fn fall(&mut self) {
        self.y += self.fall_rate;
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn jump_steps_remaining(&self) -> u32 {
        self.jump_steps_remaining
    }

    pub fn phase(&self) -> Phase {
        if self.jump_steps_remaining > 0 {
            Phase::Rising
        } else {
            Phase::Falling
        }
    }

    pub(crate) fn cancel_jump(&mut self) {
        self.jump_steps_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jump_deltas(avatar: &mut Avatar) -> Vec<f64> {
        avatar.jump();
        let mut deltas = Vec::new();
        while avatar.jump_steps_remaining() > 0 {
            let before = avatar.y();
            avatar.advance();
            deltas.push(before - avatar.y());
        }
        deltas
    }

    #[test]
    fn starts_centered() {
        let config = GameConfig::default();
        let avatar = Avatar::new(&config);
        assert_eq!(avatar.x(), 102.0);
        assert_eq!(avatar.y(), 232.5);
        assert_eq!(avatar.phase(), Phase::Falling);
    }

    #[test]
    fn jump_lasts_configured_steps() {
        let config = GameConfig::default();
        let mut avatar = Avatar::new(&config);
        let deltas = jump_deltas(&mut avatar);
        assert_eq!(deltas.len(), 15);
        assert_eq!(avatar.phase(), Phase::Falling);
    }

    #[test]
    fn jump_displacement_is_non_negative_and_peaks_mid_jump() {
        let config = GameConfig::default();
        let start = Avatar::new(&config).y();
        let mut avatar = Avatar::new(&config);
        let deltas = jump_deltas(&mut avatar);

        for d in &deltas {
            assert!(*d >= -1e-9, "upward step went down: {d}");
        }
        let mid = deltas[7].max(deltas[8]);
        assert!(mid > deltas[0]);
        assert!(mid > deltas[14]);

        let total: f64 = deltas.iter().sum();
        assert!((start - avatar.y() - total).abs() < 1e-9);
    }

    #[test]
    fn falls_at_constant_rate() {
        let config = GameConfig::default();
        let mut avatar = Avatar::new(&config);
        for start in [-40.0, 0.0, 17.25, 400.0] {
            avatar.y = start;
            for i in 1..=5 {
                avatar.advance();
                assert_eq!(avatar.y(), start + 3.0 * i as f64);
            }
        }
    }

    #[test]
    fn rejump_restarts_the_rise() {
        let config = GameConfig::default();
        let mut avatar = Avatar::new(&config);
        avatar.jump();
        for _ in 0..10 {
            avatar.advance();
        }
        assert_eq!(avatar.jump_steps_remaining(), 5);
        avatar.jump();
        assert_eq!(avatar.jump_steps_remaining(), 15);
    }
}

use crate::config::GameConfig;

/// The ground strip. The image is twice the screen width, so sliding it left
/// and snapping back after one screen looks like an endless floor.
#[derive(Debug, Clone)]
pub struct Scroller {
    offset: f64,
    step: f64,
    wrap_at: f64,
}

impl Scroller {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            offset: 0.0,
            step: config.scroll_step,
            wrap_at: config.width,
        }
    }

    pub fn advance(&mut self) {
        self.offset -= self.step;
        if self.offset < -self.wrap_at {
            self.offset = 0.0;
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

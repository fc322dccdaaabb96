use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Every tunable of the simulation. Built once at startup and handed out by
/// reference; nothing in the core reads process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
    pub fps: u32,

    pub avatar_width: f64,
    pub avatar_height: f64,
    /// Frames a single jump lasts.
    pub jump_steps: u32,
    pub jump_rise_rate: f64,
    pub fall_rate: f64,

    pub ground_height: f64,
    pub scroll_step: f64,

    pub barrier_width: f64,
    pub max_barrier_height: f64,
    /// Gap height as a multiple of the avatar height.
    pub gap_multiplier: f64,
    /// Range of the uniform draw that places each gap.
    pub gap_draw: RangeInclusive<i32>,
    pub spawn_interval: Duration,
    pub spawn_obstacles: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 500.0,
            fps: 60,
            avatar_width: 48.0,
            avatar_height: 35.0,
            jump_steps: 15,
            jump_rise_rate: 4.0,
            fall_rate: 3.0,
            ground_height: 73.0,
            scroll_step: 2.0,
            barrier_width: 52.0,
            max_barrier_height: 320.0,
            gap_multiplier: 4.0,
            gap_draw: 50..=250,
            spawn_interval: Duration::from_millis(2000),
            spawn_obstacles: true,
        }
    }
}

impl GameConfig {
    pub fn gap_height(&self) -> f64 {
        self.avatar_height * self.gap_multiplier
    }

    /// Y coordinate of the top of the ground strip.
    pub fn ground_line(&self) -> f64 {
        self.height - self.ground_height
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("avatar_width", self.avatar_width),
            ("avatar_height", self.avatar_height),
            ("barrier_width", self.barrier_width),
            ("gap_multiplier", self.gap_multiplier),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.gap_draw.is_empty() {
            return Err(ConfigError::EmptyGapRange {
                start: *self.gap_draw.start(),
                end: *self.gap_draw.end(),
            });
        }
        if self.ground_height < 0.0 || self.ground_height >= self.height {
            return Err(ConfigError::GroundOutOfRange {
                ground: self.ground_height,
                height: self.height,
            });
        }
        if self.gap_height() >= self.ground_line() {
            return Err(ConfigError::GapTooTall {
                gap: self.gap_height(),
                playfield: self.ground_line(),
            });
        }
        if self.spawn_interval.is_zero() {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f64 },
    ZeroFps,
    EmptyGapRange { start: i32, end: i32 },
    GroundOutOfRange { ground: f64, height: f64 },
    GapTooTall { gap: f64, playfield: f64 },
    ZeroSpawnInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::ZeroFps => write!(f, "fps must be at least 1"),
            Self::EmptyGapRange { start, end } => {
                write!(f, "gap draw range {start}..={end} is empty")
            }
            Self::GroundOutOfRange { ground, height } => write!(
                f,
                "ground height {ground} must lie within the screen height {height}"
            ),
            Self::GapTooTall { gap, playfield } => write!(
                f,
                "gap height {gap} does not fit in the {playfield}px playfield"
            ),
            Self::ZeroSpawnInterval => write!(f, "spawn interval must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

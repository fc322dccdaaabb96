//! Simulation core of a Flappy Bird clone: the bird, the pipes, the scrolling
//! ground and the session state machine, plus the persisted high score.
//! Drawing, sound and input live in the binary.

pub mod avatar;
pub mod config;
pub mod geometry;
pub mod highscore;
pub mod obstacle;
pub mod scroller;
pub mod session;
pub mod stream;

pub use avatar::{Avatar, Phase};
pub use config::{ConfigError, GameConfig};
pub use geometry::Rect;
pub use highscore::{HighScoreError, HighScoreStore};
pub use obstacle::Obstacle;
pub use scroller::Scroller;
pub use session::{FrameInput, FrameReport, GameEvent, GameSession, SessionState, Snapshot};
pub use stream::ObstacleStream;

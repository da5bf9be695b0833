//! Combo Typer - a falling-word typing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (word lifecycle, combo matching, difficulty ramp)
//! - `session`: Orchestrates the simulation and notifies collaborators
//! - `platform`: Collaborator interfaces (renderer, audio, storage, scheduling)
//! - `settings`: Data-driven game configuration
//! - `highscores`: High score leaderboard

pub mod error;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use input::Key;
pub use session::GameSession;
pub use settings::{DifficultyConfig, MatchMode, MissPolicy, Settings};

/// Game configuration constants
pub mod consts {
    /// Vertical spawn position (just above the top edge)
    pub const SPAWN_Y: f32 = -30.0;
    /// Left margin of the spawn range
    pub const SPAWN_MARGIN_LEFT: f32 = 50.0;
    /// Right margin of the spawn range (leaves room for the rendered word)
    pub const SPAWN_MARGIN_RIGHT: f32 = 100.0;

    /// A live word touching `height - FLOOR_MARGIN` ends the run
    pub const FLOOR_MARGIN: f32 = 20.0;
    /// Dead words are dropped once below `height + OFFSCREEN_MARGIN`
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Gravity applied to dead words, per tick
    pub const DEATH_GRAVITY: f32 = 1.0;
    /// Initial downward velocity of a freshly typed word
    pub const DEATH_LAUNCH_VELOCITY: f32 = 5.0;

    /// Feedback ticks after a correct keystroke (~80 ms at 60 Hz)
    pub const SHAKE_TICKS: u32 = 5;

    /// Points per word in a completed group
    pub const POINTS_PER_WORD: u64 = 10;

    /// Viewport used before the first resize
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
}

/// Clamp a horizontal spawn range to something non-empty.
///
/// Returns `(min, max)` with `max >= min` even for viewports narrower than the margins.
#[inline]
pub fn spawn_range(width: f32) -> (f32, f32) {
    let min = consts::SPAWN_MARGIN_LEFT;
    let max = (width - consts::SPAWN_MARGIN_RIGHT).max(min);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_range_normal_width() {
        assert_eq!(spawn_range(800.0), (50.0, 700.0));
    }

    #[test]
    fn test_spawn_range_narrow_width_collapses() {
        assert_eq!(spawn_range(120.0), (50.0, 50.0));
        assert_eq!(spawn_range(0.0), (50.0, 50.0));
    }
}

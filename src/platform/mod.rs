//! Platform abstraction layer
//!
//! The session talks to the outside world only through these traits:
//! - `Renderer`: draws a snapshot once per tick
//! - `AudioCue`: plays sounds for game events
//! - `ScoreStore`: keeps the best score between runs
//!
//! Browser implementations live in `web`; the in-memory ones here back the
//! native build and tests.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::error::Result;
use crate::highscores::HighScores;
use crate::sim::RenderSnapshot;

/// Consumes one snapshot per tick. Never feeds back into the game.
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot);
}

/// Sound requests. Failures are logged by the session and otherwise ignored.
pub trait AudioCue {
    /// Correct letter; `group_size` words advanced with it
    fn on_key_matched(&mut self, _group_size: usize) -> Result<()> {
        Ok(())
    }
    /// A group of `combo_size` words was typed out
    fn on_word_completed(&mut self, combo_size: usize) -> Result<()>;
    fn on_game_over(&mut self) -> Result<()>;
    fn on_reboot(&mut self) -> Result<()>;
    /// First key press of a run (browsers only allow audio after a gesture)
    fn on_first_input(&mut self) -> Result<()> {
        Ok(())
    }
}

/// High score persistence
pub trait ScoreStore {
    /// Best score so far (0 when nothing is stored)
    fn best(&self) -> Result<u64>;
    /// Record a finished run. Returns true when it beat the stored best.
    fn submit(&mut self, score: u64, words_typed: u32) -> Result<bool>;
}

/// Renderer that draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &RenderSnapshot) {}
}

/// Silent audio
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioCue for NullAudio {
    fn on_word_completed(&mut self, _combo_size: usize) -> Result<()> {
        Ok(())
    }

    fn on_game_over(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_reboot(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Leaderboard kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryScores {
    pub scores: HighScores,
}

impl MemoryScores {
    pub fn new(scores: HighScores) -> Self {
        Self { scores }
    }
}

impl ScoreStore for MemoryScores {
    fn best(&self) -> Result<u64> {
        Ok(self.scores.top_score().unwrap_or(0))
    }

    fn submit(&mut self, score: u64, words_typed: u32) -> Result<bool> {
        Ok(self.scores.submit(score, words_typed, now_ms()))
    }
}

/// Wall clock in Unix milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// The session's collaborators
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioCue>,
    pub scores: Box<dyn ScoreStore>,
}

impl Collaborators {
    /// No output, scores kept in memory
    pub fn headless() -> Self {
        Self {
            renderer: Box::new(NullRenderer),
            audio: Box::new(NullAudio),
            scores: Box::new(MemoryScores::default()),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::headless()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_scores_record() {
        let mut store = MemoryScores::default();
        assert_eq!(store.best().unwrap(), 0);
        assert!(store.submit(30, 3).unwrap());
        assert!(!store.submit(20, 2).unwrap());
        assert_eq!(store.best().unwrap(), 30);
        assert_eq!(store.scores.entries.len(), 2);
    }

    #[test]
    fn test_memory_scores_seeded() {
        let mut scores = HighScores::new();
        scores.add_score(500, 50, 0.0);
        let store = MemoryScores::new(scores);
        assert_eq!(store.best().unwrap(), 500);
    }
}

//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; the session owns
//! exactly one of these per playthrough.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::pool::WordPool;
use crate::consts::*;
use crate::settings::{MatchMode, MissPolicy, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Words are falling
    Playing,
    /// A live word reached the floor. Terminal until reset.
    GameOver,
}

/// Something collaborators care about, drained by the session after each event
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Correct letter at `char_index`; `group_size` words advanced together
    KeyMatched { char_index: usize, group_size: usize },
    /// A combo group (or a single word in prefix mode) was typed out
    WordCompleted {
        text: String,
        combo_size: usize,
        points: u64,
    },
    /// Floor collision ended the run
    GameOver { final_score: u64 },
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A live word below this line ends the run
    pub fn floor_y(&self) -> f32 {
        self.height - FLOOR_MARGIN
    }

    /// A dead word below this line is dropped
    pub fn exit_y(&self) -> f32 {
        self.height + OFFSCREEN_MARGIN
    }
}

/// A falling word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Spawn-ordered id
    pub id: u32,
    text: String,
    /// Position; `x` is fixed at spawn
    pub pos: Vec2,
    /// Vertical velocity, only non-zero once dead
    pub vy: f32,
    dead: bool,
    /// Feedback ticks remaining after a correct keystroke
    pub shake_timer: u32,
    /// Character flagged for feedback
    pub shaking_char: Option<usize>,
}

impl Word {
    pub fn new(id: u32, text: impl Into<String>, x: f32) -> Self {
        Self {
            id,
            text: text.into(),
            pos: Vec2::new(x, SPAWN_Y),
            vy: 0.0,
            dead: false,
            shake_timer: 0,
            shaking_char: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Mark as typed and launch it downward. Never undone.
    pub fn kill(&mut self) {
        if !self.dead {
            self.dead = true;
            self.vy = DEATH_LAUNCH_VELOCITY;
        }
    }

    /// Flag a character for keystroke feedback
    pub fn flag_char(&mut self, index: usize) {
        self.shaking_char = Some(index);
        self.shake_timer = SHAKE_TICKS;
    }

    /// Count down feedback; clears the flagged character on expiry
    pub fn tick_shake(&mut self) {
        if self.shake_timer > 0 {
            self.shake_timer -= 1;
            if self.shake_timer == 0 {
                self.shaking_char = None;
            }
        }
    }

    /// Character currently shaking, if feedback is still running
    pub fn active_shake(&self) -> Option<usize> {
        if self.shake_timer > 0 { self.shaking_char } else { None }
    }
}

/// Complete game state for one playthrough
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Score, always a multiple of `POINTS_PER_WORD`
    pub score: u64,
    /// Progress into the leader word (combo mode)
    pub target_index: usize,
    /// Typed buffer (prefix mode)
    pub typed: String,
    /// Current phase
    pub phase: GamePhase,
    /// Spawn interval and fall speed
    pub difficulty: Difficulty,
    /// Candidate words
    pub pool: WordPool,
    pub match_mode: MatchMode,
    pub miss_policy: MissPolicy,
    /// Active words, in spawn order
    pub words: Vec<Word>,
    pub viewport: Viewport,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Words destroyed by typing this run
    pub words_typed: u32,
    /// Pending events for collaborators
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, settings: &Settings, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            target_index: 0,
            typed: String::new(),
            phase: GamePhase::Playing,
            difficulty: Difficulty::new(settings.difficulty.clone()),
            pool: WordPool::new(settings.words.clone()),
            match_mode: settings.match_mode,
            miss_policy: settings.miss_policy,
            words: Vec::new(),
            viewport,
            time_ticks: 0,
            words_typed: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seed for the next playthrough, drawn from this run's RNG
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Insert a word at `x` directly, bypassing the pool. Text is lowercased
    /// so it can be matched against normalised key presses.
    pub fn push_word(&mut self, text: &str, x: f32) -> u32 {
        let id = self.next_entity_id();
        self.words.push(Word::new(id, &text.to_ascii_lowercase(), x));
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn word(&self, id: u32) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn word_mut(&mut self, id: u32) -> Option<&mut Word> {
        self.words.iter_mut().find(|w| w.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.words.iter().filter(|w| w.is_alive()).count()
    }

    /// End the run. Returns false if it had already ended.
    pub fn trigger_game_over(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
        });
        log::info!(
            "Game over at tick {} with score {} ({} words)",
            self.time_ticks,
            self.score,
            self.words_typed
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_word_is_alive_above_screen() {
        let word = Word::new(1, "hack", 120.0);
        assert!(word.is_alive());
        assert_eq!(word.vy, 0.0);
        assert_eq!(word.pos, Vec2::new(120.0, SPAWN_Y));
        assert_eq!(word.active_shake(), None);
    }

    #[test]
    fn test_kill_is_one_way() {
        let mut word = Word::new(1, "bug", 0.0);
        word.kill();
        assert!(word.is_dead());
        assert_eq!(word.vy, DEATH_LAUNCH_VELOCITY);

        // Killing again does not relaunch
        word.vy = 12.0;
        word.kill();
        assert!(word.is_dead());
        assert_eq!(word.vy, 12.0);
    }

    #[test]
    fn test_shake_expires_and_clears_flag() {
        let mut word = Word::new(1, "loop", 0.0);
        word.flag_char(2);
        assert_eq!(word.active_shake(), Some(2));
        for _ in 0..SHAKE_TICKS - 1 {
            word.tick_shake();
        }
        assert_eq!(word.active_shake(), Some(2));
        word.tick_shake();
        assert_eq!(word.shake_timer, 0);
        assert_eq!(word.shaking_char, None);
        word.tick_shake();
        assert_eq!(word.shake_timer, 0);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut state = GameState::new(1, &Settings::default(), Viewport::default());
        state.score = 30;
        assert!(state.trigger_game_over());
        assert!(!state.trigger_game_over());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { final_score: 30 }]);
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut state = GameState::new(7, &Settings::default(), Viewport::default());
        let a = state.push_word("if", 50.0);
        let b = state.push_word("else", 60.0);
        assert!(a < b);
        assert_eq!(state.words[0].id, a);
        assert_eq!(state.word(b).map(Word::text), Some("else"));
    }

    #[test]
    fn test_next_seed_is_deterministic() {
        let mut s1 = GameState::new(42, &Settings::default(), Viewport::default());
        let mut s2 = GameState::new(42, &Settings::default(), Viewport::default());
        assert_eq!(s1.next_seed(), s2.next_seed());
    }
}

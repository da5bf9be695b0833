//! Demo typist
//!
//! Reads the board like a player would and produces key presses at a fixed
//! rate, occasionally hitting the wrong key.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::combo::leader_text;
use super::state::GameState;
use crate::input::Key;
use crate::settings::MatchMode;

#[derive(Debug, Clone)]
pub struct Autoplay {
    rng: Pcg32,
    /// Probability a key press is the right one (0-1)
    pub accuracy: f32,
    /// Key presses per tick (fractional rates accumulate)
    pub keys_per_tick: f32,
    budget: f32,
}

impl Autoplay {
    pub fn new(seed: u64, accuracy: f32, keys_per_tick: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            keys_per_tick: keys_per_tick.max(0.0),
            budget: 0.0,
        }
    }

    /// Key presses for this tick
    pub fn keys_for_tick(&mut self, state: &GameState) -> Vec<Key> {
        self.budget += self.keys_per_tick;
        let mut keys = Vec::new();
        // At most one key per tick; leftover budget carries over
        if self.budget >= 1.0 {
            self.budget -= 1.0;
            if let Some(key) = self.next_key(state) {
                keys.push(key);
            }
        }
        keys
    }

    /// The key a player would press next, if there is anything to type
    pub fn next_key(&mut self, state: &GameState) -> Option<Key> {
        let expected = expected_letter(state)?;
        if self.rng.random::<f32>() < self.accuracy {
            return Some(Key::Char(expected));
        }
        let wrong = loop {
            let c = self.rng.random_range(b'a'..=b'z') as char;
            if c != expected {
                break c;
            }
        };
        Some(Key::Char(wrong))
    }
}

/// Next correct letter for the current matching mode
pub fn expected_letter(state: &GameState) -> Option<char> {
    if state.is_game_over() {
        return None;
    }
    match state.match_mode {
        MatchMode::Combo => {
            let text = leader_text(state)?;
            text.as_bytes().get(state.target_index).map(|b| *b as char)
        }
        MatchMode::Prefix => {
            // Finish whatever the buffer is a prefix of, oldest first
            let word = state
                .words
                .iter()
                .find(|w| w.is_alive() && w.text().starts_with(state.typed.as_str()))?;
            word.text().as_bytes().get(state.typed.len()).map(|b| *b as char)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::combo::handle_key;
    use crate::sim::state::Viewport;

    #[test]
    fn test_perfect_typist_clears_board() {
        let mut state = GameState::new(3, &Settings::default(), Viewport::default());
        state.push_word("hack", 50.0);
        state.push_word("code", 60.0);
        state.push_word("hack", 70.0);
        let mut bot = Autoplay::new(1, 1.0, 1.0);
        for _ in 0..20 {
            for key in bot.keys_for_tick(&state) {
                handle_key(&mut state, &key);
            }
        }
        assert_eq!(state.alive_count(), 0);
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_fractional_rate() {
        let mut state = GameState::new(3, &Settings::default(), Viewport::default());
        state.push_word("float", 50.0);
        let mut bot = Autoplay::new(1, 1.0, 0.5);
        let presses: usize = (0..10).map(|_| bot.keys_for_tick(&state).len()).sum();
        assert_eq!(presses, 5);
    }

    #[test]
    fn test_zero_accuracy_always_wrong() {
        let mut state = GameState::new(3, &Settings::default(), Viewport::default());
        state.push_word("int", 50.0);
        let mut bot = Autoplay::new(9, 0.0, 1.0);
        for _ in 0..50 {
            assert_ne!(bot.next_key(&state), Some(Key::Char('i')));
        }
    }

    #[test]
    fn test_prefix_mode_expected_letter() {
        let settings = Settings {
            match_mode: MatchMode::Prefix,
            ..Default::default()
        };
        let mut state = GameState::new(3, &settings, Viewport::default());
        state.push_word("else", 50.0);
        state.push_word("catch", 60.0);
        assert_eq!(expected_letter(&state), Some('e'));
        state.typed.push('c');
        assert_eq!(expected_letter(&state), Some('a'));
    }

    #[test]
    fn test_nothing_to_type() {
        let state = GameState::new(3, &Settings::default(), Viewport::default());
        assert_eq!(expected_letter(&state), None);
    }
}

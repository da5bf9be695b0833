//! Keystroke matching
//!
//! Combo mode: the leader is the oldest live word. Every live word with the
//! same text forms the combo group and advances with the leader; finishing
//! the leader kills the whole group and pays `POINTS_PER_WORD` per member.
//!
//! Prefix mode: letters build a buffer, and a buffer equal to a live word
//! removes that one word.

use super::state::{GameEvent, GameState};
use crate::consts::POINTS_PER_WORD;
use crate::input::Key;
use crate::settings::{MatchMode, MissPolicy};

/// Matcher state in combo mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherState {
    /// No live word to type
    Idle,
    /// Typing `leader_id`, next expected character at `target_index`
    Matching { leader_id: u32, target_index: usize },
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Not a letter, no target, full prefix buffer, or the run is over
    Ignored,
    /// Wrong letter
    Miss,
    /// Correct letter, word not finished yet
    Advanced { char_index: usize, group_size: usize },
    /// Word finished
    Completed { group_size: usize, points: u64 },
    /// Prefix buffer grew without matching a word
    Buffered,
    /// Prefix buffer edited (backspace/clear)
    Edited,
}

/// Index of the leader: the first live word in spawn order
pub fn leader_index(state: &GameState) -> Option<usize> {
    state.words.iter().position(|w| w.is_alive())
}

pub fn leader_text(state: &GameState) -> Option<&str> {
    leader_index(state).map(|i| state.words[i].text())
}

/// Indices of live words sharing the leader's text
pub fn combo_group(state: &GameState) -> Vec<usize> {
    let Some(text) = leader_text(state) else {
        return Vec::new();
    };
    state
        .words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_alive() && w.text() == text)
        .map(|(i, _)| i)
        .collect()
}

pub fn combo_count(state: &GameState) -> usize {
    match leader_text(state) {
        Some(text) => state
            .words
            .iter()
            .filter(|w| w.is_alive() && w.text() == text)
            .count(),
        None => 0,
    }
}

pub fn matcher_state(state: &GameState) -> MatcherState {
    match leader_index(state) {
        Some(i) => MatcherState::Matching {
            leader_id: state.words[i].id,
            target_index: state.target_index,
        },
        None => MatcherState::Idle,
    }
}

/// Feed one key press to the matcher
pub fn handle_key(state: &mut GameState, key: &Key) -> MatchOutcome {
    if state.is_game_over() {
        return MatchOutcome::Ignored;
    }
    match state.match_mode {
        MatchMode::Combo => match key.letter() {
            Some(letter) => type_combo(state, letter),
            None => MatchOutcome::Ignored,
        },
        MatchMode::Prefix => type_prefix(state, key),
    }
}

fn type_combo(state: &mut GameState, letter: char) -> MatchOutcome {
    let Some(leader) = leader_index(state) else {
        return MatchOutcome::Ignored;
    };
    let text = state.words[leader].text().to_string();

    if state.target_index >= text.len() {
        state.target_index = 0;
    }
    let char_index = state.target_index;
    let Some(&expected) = text.as_bytes().get(char_index) else {
        return MatchOutcome::Ignored;
    };
    let expected = expected as char;

    if letter != expected {
        if state.miss_policy == MissPolicy::Strict {
            state.target_index = 0;
        }
        return MatchOutcome::Miss;
    }

    let mut group_size = 0;
    for word in state
        .words
        .iter_mut()
        .filter(|w| w.is_alive() && w.text() == text)
    {
        word.flag_char(char_index);
        group_size += 1;
    }
    state.events.push(GameEvent::KeyMatched {
        char_index,
        group_size,
    });

    state.target_index += 1;
    if state.target_index < text.len() {
        return MatchOutcome::Advanced {
            char_index,
            group_size,
        };
    }

    for word in state
        .words
        .iter_mut()
        .filter(|w| w.is_alive() && w.text() == text)
    {
        word.kill();
    }
    let points = POINTS_PER_WORD * group_size as u64;
    state.score += points;
    state.words_typed += group_size as u32;
    state.target_index = 0;
    state.events.push(GameEvent::WordCompleted {
        text: text.clone(),
        combo_size: group_size,
        points,
    });
    log::debug!("Completed {:?} x{} for {} points", text, group_size, points);

    MatchOutcome::Completed { group_size, points }
}

/// Longest buffer worth keeping: nothing on screen or in the pool is longer
fn prefix_limit(state: &GameState) -> usize {
    state
        .words
        .iter()
        .filter(|w| w.is_alive())
        .map(|w| w.len())
        .max()
        .unwrap_or(0)
        .max(state.pool.longest())
}

fn type_prefix(state: &mut GameState, key: &Key) -> MatchOutcome {
    if let Some(letter) = key.letter() {
        if state.typed.len() >= prefix_limit(state) {
            return MatchOutcome::Ignored;
        }
        state.typed.push(letter);
    } else if *key == Key::Backspace {
        state.typed.pop();
        return MatchOutcome::Edited;
    } else if key.is_clear() {
        state.typed.clear();
        return MatchOutcome::Edited;
    } else {
        return MatchOutcome::Ignored;
    }

    let hit = state
        .words
        .iter()
        .position(|w| w.is_alive() && w.text() == state.typed);
    let Some(i) = hit else {
        return MatchOutcome::Buffered;
    };

    let word = state.words.remove(i);
    state.score += POINTS_PER_WORD;
    state.words_typed += 1;
    state.typed.clear();
    state.events.push(GameEvent::WordCompleted {
        text: word.text().to_string(),
        combo_size: 1,
        points: POINTS_PER_WORD,
    });

    MatchOutcome::Completed {
        group_size: 1,
        points: POINTS_PER_WORD,
    }
}

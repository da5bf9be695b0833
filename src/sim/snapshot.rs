//! Render-ready view of the simulation
//!
//! Built after the tick so it always reflects the latest positions.

use serde::Serialize;

use super::combo::{combo_count, leader_text};
use super::state::{GameState, Word};
use crate::settings::MatchMode;

/// One word as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordView {
    pub id: u32,
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Characters before this index are drawn as typed
    pub highlight_up_to: usize,
    pub is_dead: bool,
    /// Live member of the leader's combo group
    pub is_part_of_combo: bool,
    /// Character to jitter, while feedback lasts
    pub shaking_char: Option<usize>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub score: u64,
    pub high_score: u64,
    pub words: Vec<WordView>,
    /// Leader text (combo mode)
    pub target_word: Option<String>,
    /// Live words sharing the leader's text
    pub combo_count: usize,
    /// Typed buffer (prefix mode)
    pub typed: String,
    pub is_game_over: bool,
    pub width: f32,
    pub height: f32,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, high_score: u64) -> Self {
        let (target_word, combo_count) = match state.match_mode {
            MatchMode::Combo => (leader_text(state).map(str::to_string), combo_count(state)),
            MatchMode::Prefix => (None, 0),
        };

        let words = state
            .words
            .iter()
            .map(|w| view(state, w, target_word.as_deref()))
            .collect();

        Self {
            score: state.score,
            high_score,
            words,
            target_word,
            combo_count,
            typed: state.typed.clone(),
            is_game_over: state.is_game_over(),
            width: state.viewport.width,
            height: state.viewport.height,
        }
    }

    pub fn score_label(&self) -> String {
        format!("SCORE: {}", self.score)
    }

    pub fn high_score_label(&self) -> String {
        format!("MAX: {}", self.high_score)
    }

    /// Bottom banner, e.g. `TARGET: LOOP (COMBO x2!)`
    pub fn target_label(&self) -> Option<String> {
        let target = self.target_word.as_ref()?;
        let mut label = format!("TARGET: {}", target.to_uppercase());
        if self.combo_count > 1 {
            label.push_str(&format!(" (COMBO x{}!)", self.combo_count));
        }
        Some(label)
    }
}

fn view(state: &GameState, word: &Word, target: Option<&str>) -> WordView {
    let is_part_of_combo = word.is_alive() && target == Some(word.text());
    let highlight_up_to = if word.is_dead() {
        word.len()
    } else if is_part_of_combo {
        state.target_index
    } else if state.match_mode == MatchMode::Prefix
        && !state.typed.is_empty()
        && word.text().starts_with(state.typed.as_str())
    {
        state.typed.len()
    } else {
        0
    };

    WordView {
        id: word.id,
        text: word.text().to_string(),
        x: word.pos.x,
        y: word.pos.y,
        highlight_up_to,
        is_dead: word.is_dead(),
        is_part_of_combo,
        shaking_char: word.active_shake(),
    }
}

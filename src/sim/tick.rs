//! Per-frame simulation tick
//!
//! Advances every word by a constant step per call rather than by elapsed
//! time. Frame drift under load slows the game down instead of making words
//! jump, which is how the game has always played.

use super::state::GameState;
use crate::consts::DEATH_GRAVITY;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }

    state.time_ticks += 1;

    let floor_y = state.viewport.floor_y();
    let exit_y = state.viewport.exit_y();
    let fall_speed = state.difficulty.fall_speed;
    let mut hit_floor = false;

    // Reverse order so removal doesn't skip anything
    for i in (0..state.words.len()).rev() {
        let word = &mut state.words[i];

        if word.is_dead() {
            word.vy += DEATH_GRAVITY;
            word.pos.y += word.vy;
            if word.pos.y > exit_y {
                state.words.remove(i);
                continue;
            }
        } else {
            word.pos.y += fall_speed;
            if word.pos.y > floor_y {
                hit_floor = true;
            }
        }

        word.tick_shake();
    }

    // The rest of the frame still completes; the run ends after it
    if hit_floor {
        state.trigger_game_over();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::state::{GameEvent, GamePhase, Viewport};

    fn state() -> GameState {
        GameState::new(12345, &Settings::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_live_word_falls_at_fall_speed() {
        let mut state = state();
        let id = state.push_word("hack", 100.0);
        tick(&mut state);
        tick(&mut state);
        let word = state.word(id).unwrap();
        assert!((word.pos.y - (SPAWN_Y + 2.0)).abs() < 1e-5);
        assert_eq!(word.pos.x, 100.0);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_dead_word_accelerates_and_is_removed() {
        let mut state = state();
        let id = state.push_word("bug", 100.0);
        state.word_mut(id).unwrap().pos.y = 500.0;
        state.word_mut(id).unwrap().kill();

        tick(&mut state);
        let word = state.word(id).unwrap();
        assert_eq!(word.vy, DEATH_LAUNCH_VELOCITY + DEATH_GRAVITY);
        assert_eq!(word.pos.y, 500.0 + 6.0);

        tick(&mut state);
        assert_eq!(state.word(id).unwrap().pos.y, 506.0 + 7.0);

        for _ in 0..20 {
            tick(&mut state);
        }
        assert!(state.word(id).is_none());
        // Dead words never end the run
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_floor_collision_ends_run() {
        let mut state = state();
        state.score = 40;
        let a = state.push_word("loop", 100.0);
        let b = state.push_word("code", 300.0);
        state.word_mut(a).unwrap().pos.y = 580.0;
        state.word_mut(b).unwrap().flag_char(0);

        tick(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { final_score: 40 }]);
        // The remaining word still moved and counted down during that frame
        let b = state.word(b).unwrap();
        assert!((b.pos.y - (SPAWN_Y + 1.0)).abs() < 1e-5);
        assert_eq!(b.shake_timer, SHAKE_TICKS - 1);
    }

    #[test]
    fn test_exactly_on_floor_is_safe() {
        let mut state = state();
        let id = state.push_word("if", 100.0);
        state.word_mut(id).unwrap().pos.y = 579.0;
        tick(&mut state);
        assert_eq!(state.word(id).unwrap().pos.y, 580.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_no_ticks_after_game_over() {
        let mut state = state();
        let id = state.push_word("int", 100.0);
        state.trigger_game_over();
        state.events.clear();
        let y = state.word(id).unwrap().pos.y;

        tick(&mut state);
        assert_eq!(state.word(id).unwrap().pos.y, y);
        assert_eq!(state.time_ticks, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_two_words_on_floor_single_game_over() {
        let mut state = state();
        for x in [100.0, 200.0] {
            let id = state.push_word("try", x);
            state.word_mut(id).unwrap().pos.y = 590.0;
        }
        tick(&mut state);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_removal_keeps_insertion_order() {
        let mut state = state();
        let a = state.push_word("a", 0.0);
        let b = state.push_word("b", 0.0);
        let c = state.push_word("c", 0.0);
        state.word_mut(b).unwrap().pos.y = 700.0;
        state.word_mut(b).unwrap().kill();
        tick(&mut state);
        let ids: Vec<u32> = state.words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_smaller_viewport_moves_floor() {
        let mut state = state();
        let id = state.push_word("fix", 100.0);
        state.word_mut(id).unwrap().pos.y = 200.0;
        state.viewport = Viewport::new(800.0, 210.0);
        tick(&mut state);
        assert!(state.is_game_over());
    }
}

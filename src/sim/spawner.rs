//! Word spawning and spawn scheduling

use rand::Rng;

use super::state::GameState;
use crate::spawn_range;

/// Requests the next spawn after a delay.
///
/// The spawner never waits itself; whoever drives the session decides how
/// time passes and calls back once a requested spawn is due.
pub trait Scheduler {
    /// Replace any pending request with one `delay_ms` from now
    fn schedule(&mut self, delay_ms: u32);
    /// Drop the pending request
    fn cancel(&mut self);
}

/// Cap on spawns fired per frame after a long stall
pub const MAX_SPAWNS_PER_FRAME: u32 = 4;

/// Deterministic scheduler fed with elapsed frame time
#[derive(Debug, Clone, Default)]
pub struct SpawnTimer {
    now_ms: f64,
    deadline_ms: Option<f64>,
    /// When the last due request was due, so rescheduling does not drift
    anchor_ms: Option<f64>,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let time pass
    pub fn advance(&mut self, elapsed_ms: f64) {
        if elapsed_ms > 0.0 {
            self.now_ms += elapsed_ms;
        }
    }

    /// Consume the pending request if it is due
    pub fn take_due(&mut self) -> bool {
        match self.deadline_ms {
            Some(deadline) if deadline <= self.now_ms => {
                self.deadline_ms = None;
                self.anchor_ms = Some(deadline);
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until the pending request is due
    pub fn remaining_ms(&self) -> Option<f64> {
        self.deadline_ms.map(|d| (d - self.now_ms).max(0.0))
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }
}

impl Scheduler for SpawnTimer {
    fn schedule(&mut self, delay_ms: u32) {
        let base = self.anchor_ms.take().unwrap_or(self.now_ms);
        self.deadline_ms = Some(base + delay_ms as f64);
    }

    fn cancel(&mut self) {
        self.deadline_ms = None;
        self.anchor_ms = None;
    }
}

/// Spawn one word from the pool above the screen and ramp difficulty.
///
/// Returns the new word's id, or `None` once the run is over.
pub fn spawn_word(state: &mut GameState) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }

    let text = state.pool.pick(&mut state.rng).to_string();
    let (min_x, max_x) = spawn_range(state.viewport.width);
    let x = state.rng.random_range(min_x..=max_x);
    let id = state.push_word(&text, x);

    state.difficulty.advance();
    log::debug!(
        "Spawned {:?} at x={:.0}, next in {} ms, speed {:.2}",
        text,
        x,
        state.difficulty.spawn_interval_ms,
        state.difficulty.fall_speed
    );
    Some(id)
}

/// Spawn, then ask for the next spawn at the updated interval
pub fn spawn_and_reschedule<S: Scheduler + ?Sized>(
    state: &mut GameState,
    scheduler: &mut S,
) -> Option<u32> {
    let id = spawn_word(state)?;
    scheduler.schedule(state.difficulty.spawn_interval_ms);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_Y;
    use crate::settings::Settings;
    use crate::sim::state::Viewport;

    fn state() -> GameState {
        GameState::new(5, &Settings::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_spawn_position_in_bounds() {
        let mut state = state();
        for _ in 0..200 {
            spawn_word(&mut state);
        }
        for word in &state.words {
            assert!(word.pos.x >= 50.0 && word.pos.x <= 700.0);
            assert_eq!(word.pos.y, SPAWN_Y);
            assert!(word.is_alive());
            assert_eq!(word.shake_timer, 0);
            assert!(state.pool.words().iter().any(|w| w == word.text()));
        }
    }

    #[test]
    fn test_unvalidated_word_list_spawns_typeable_words() {
        use crate::input::Key;
        use crate::sim::combo::{MatchOutcome, handle_key};

        let settings = Settings {
            words: vec!["".into()],
            ..Default::default()
        };
        let mut state = GameState::new(5, &settings, Viewport::new(800.0, 600.0));
        let id = spawn_word(&mut state).unwrap();
        let text = state.word(id).unwrap().text().to_string();
        assert!(!text.is_empty());
        let first = Key::Char(text.as_bytes()[0] as char);
        assert!(matches!(
            handle_key(&mut state, &first),
            MatchOutcome::Advanced { .. } | MatchOutcome::Completed { .. }
        ));

        let settings = Settings {
            words: vec!["Hack".into()],
            ..Default::default()
        };
        let mut state = GameState::new(5, &settings, Viewport::new(800.0, 600.0));
        spawn_word(&mut state);
        for c in "hack".chars() {
            handle_key(&mut state, &Key::Char(c));
        }
        assert_eq!(state.score, 10);
        assert_eq!(state.alive_count(), 0);
    }

    #[test]
    fn test_spawn_uses_current_width() {
        let mut state = state();
        state.viewport = Viewport::new(300.0, 600.0);
        for _ in 0..50 {
            spawn_word(&mut state);
        }
        assert!(state.words.iter().all(|w| w.pos.x <= 200.0));
    }

    #[test]
    fn test_spawn_suppressed_after_game_over() {
        let mut state = state();
        let mut timer = SpawnTimer::new();
        state.trigger_game_over();
        assert_eq!(spawn_and_reschedule(&mut state, &mut timer), None);
        assert!(state.words.is_empty());
        assert!(!timer.is_pending());
        assert_eq!(state.difficulty.spawns, 0);
    }

    #[test]
    fn test_reschedule_uses_updated_interval() {
        let mut state = state();
        let mut timer = SpawnTimer::new();
        spawn_and_reschedule(&mut state, &mut timer);
        assert_eq!(timer.remaining_ms(), Some(1950.0));
        spawn_and_reschedule(&mut state, &mut timer);
        assert_eq!(timer.remaining_ms(), Some(1900.0));
    }

    #[test]
    fn test_timer_due_and_anchor() {
        let mut timer = SpawnTimer::new();
        timer.schedule(1000);
        timer.advance(999.0);
        assert!(!timer.take_due());
        timer.advance(17.0);
        assert!(timer.take_due());
        assert!(!timer.take_due());

        // Next request counts from the old deadline, not from now
        timer.schedule(500);
        assert_eq!(timer.remaining_ms(), Some(484.0));
    }

    #[test]
    fn test_timer_cancel() {
        let mut timer = SpawnTimer::new();
        timer.schedule(10);
        timer.cancel();
        timer.advance(100.0);
        assert!(!timer.take_due());
        assert_eq!(timer.remaining_ms(), None);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = state();
        let mut b = state();
        for _ in 0..20 {
            spawn_word(&mut a);
            spawn_word(&mut b);
        }
        assert_eq!(a.words, b.words);
    }
}

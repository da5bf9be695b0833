//! Game session orchestration
//!
//! One `GameSession` per playthrough owns the simulation state and is the only
//! writer to it. Every external event (spawn timer, frame, key press, resize,
//! reboot) arrives through a method here and runs to completion before the
//! next one; wrap the session in a single lock if that ever stops being true.

use crate::input::Key;
use crate::platform::Collaborators;
use crate::settings::Settings;
use crate::sim::{
    self, GameEvent, GameState, MAX_SPAWNS_PER_FRAME, MatchOutcome, RenderSnapshot, Scheduler,
    SpawnTimer, Viewport,
};

pub struct GameSession<S: Scheduler = SpawnTimer> {
    state: GameState,
    settings: Settings,
    scheduler: S,
    collab: Collaborators,
    high_score: u64,
    /// Set once the first key of the run arrives
    started: bool,
    /// Game over text, e.g. "120 (NEW RECORD!)"
    final_label: Option<String>,
}

impl<S: Scheduler> GameSession<S> {
    pub fn new(
        seed: u64,
        settings: Settings,
        viewport: Viewport,
        scheduler: S,
        collab: Collaborators,
    ) -> Self {
        let settings = settings.validated();
        let high_score = collab.scores.best().unwrap_or_else(|e| {
            log::warn!("High score unavailable: {}", e);
            0
        });
        let mut session = Self {
            state: GameState::new(seed, &settings, viewport),
            settings,
            scheduler,
            collab,
            high_score,
            started: false,
            final_label: None,
        };
        session.arm_first_spawn();
        log::info!("Session started with seed {} (best {})", seed, high_score);
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn final_score_label(&self) -> Option<&str> {
        self.final_label.as_deref()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state, self.high_score)
    }

    /// Keyboard input
    pub fn on_key_press(&mut self, key: &Key) -> MatchOutcome {
        if self.state.is_game_over() {
            return MatchOutcome::Ignored;
        }
        if !self.started {
            self.started = true;
            if let Err(e) = self.collab.audio.on_first_input() {
                log::warn!("Music failed: {}", e);
            }
        }
        let outcome = sim::handle_key(&mut self.state, key);
        self.dispatch_events();
        outcome
    }

    /// Frame callback: simulate, then hand the renderer a fresh snapshot
    pub fn on_tick(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        sim::tick(&mut self.state);
        self.dispatch_events();
        let snapshot = self.snapshot();
        self.collab.renderer.render(&snapshot);
    }

    /// Spawn timer fired
    pub fn on_spawn_timer(&mut self) -> Option<u32> {
        sim::spawn_and_reschedule(&mut self.state, &mut self.scheduler)
    }

    /// Viewport changed. Existing words stay where they are.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.state.viewport = Viewport::new(width.max(0.0), height.max(0.0));
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// End the run now. Repeated calls do nothing.
    pub fn trigger_game_over(&mut self) {
        self.state.trigger_game_over();
        self.dispatch_events();
    }

    /// Start a new playthrough with fresh state
    pub fn reset(&mut self) {
        let seed = self.state.next_seed();
        let viewport = self.state.viewport;
        self.state = GameState::new(seed, &self.settings, viewport);
        self.started = false;
        self.final_label = None;
        self.arm_first_spawn();
        if let Err(e) = self.collab.audio.on_reboot() {
            log::warn!("Reboot sound failed: {}", e);
        }
        log::info!("Session reset with seed {}", seed);
    }

    fn arm_first_spawn(&mut self) {
        self.scheduler.cancel();
        self.scheduler
            .schedule(self.settings.difficulty.first_spawn_delay_ms);
    }

    fn dispatch_events(&mut self) {
        for event in std::mem::take(&mut self.state.events) {
            match event {
                GameEvent::KeyMatched { group_size, .. } => {
                    if let Err(e) = self.collab.audio.on_key_matched(group_size) {
                        log::warn!("Key sound failed: {}", e);
                    }
                }
                GameEvent::WordCompleted { combo_size, .. } => {
                    if let Err(e) = self.collab.audio.on_word_completed(combo_size) {
                        log::warn!("Sound effect error: {}", e);
                    }
                }
                GameEvent::GameOver { final_score } => self.finish(final_score),
            }
        }
    }

    fn finish(&mut self, final_score: u64) {
        self.scheduler.cancel();
        if let Err(e) = self.collab.audio.on_game_over() {
            log::warn!("Game over sound failed: {}", e);
        }

        let new_record = match self
            .collab
            .scores
            .submit(final_score, self.state.words_typed)
        {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Could not save score: {}", e);
                false
            }
        };
        if new_record {
            self.high_score = final_score;
            log::info!("New record: {}", final_score);
        }
        self.final_label = Some(crate::highscores::final_score_label(final_score, new_record));
    }
}

impl GameSession<SpawnTimer> {
    /// Let `elapsed_ms` of wall time pass and fire any spawns that came due
    pub fn advance_time(&mut self, elapsed_ms: f64) -> u32 {
        self.scheduler.advance(elapsed_ms);
        let mut spawned = 0;
        while spawned < MAX_SPAWNS_PER_FRAME && self.scheduler.take_due() {
            if self.on_spawn_timer().is_none() {
                break;
            }
            spawned += 1;
        }
        spawned
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Constant step per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod combo;
pub mod difficulty;
pub mod pool;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autoplay::Autoplay;
pub use combo::{MatchOutcome, MatcherState, handle_key, leader_index, matcher_state};
pub use difficulty::Difficulty;
pub use pool::WordPool;
pub use snapshot::{RenderSnapshot, WordView};
pub use spawner::{MAX_SPAWNS_PER_FRAME, Scheduler, SpawnTimer, spawn_and_reschedule, spawn_word};
pub use state::{GameEvent, GamePhase, GameState, Viewport, Word};
pub use tick::tick;

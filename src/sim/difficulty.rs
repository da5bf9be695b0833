//! Difficulty ramp
//!
//! Every spawn shortens the spawn interval and speeds up falling words,
//! each toward its configured limit.

use crate::settings::DifficultyConfig;

/// One ramp step. Pure: same inputs, same outputs.
pub fn step(config: &DifficultyConfig, interval_ms: u32, fall_speed: f32) -> (u32, f32) {
    let interval_ms = if interval_ms > config.min_spawn_interval_ms {
        interval_ms
            .saturating_sub(config.spawn_interval_step_ms)
            .max(config.min_spawn_interval_ms)
    } else {
        interval_ms
    };
    let fall_speed = if fall_speed < config.max_fall_speed {
        (fall_speed + config.fall_speed_step).min(config.max_fall_speed)
    } else {
        fall_speed
    };
    (interval_ms, fall_speed)
}

/// Current spawn interval and fall speed
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    config: DifficultyConfig,
    /// Delay until the next spawn (ms)
    pub spawn_interval_ms: u32,
    /// Pixels per tick for live words
    pub fall_speed: f32,
    /// Spawns applied so far
    pub spawns: u32,
}

impl Difficulty {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            spawn_interval_ms: config.initial_spawn_interval_ms,
            fall_speed: config.initial_fall_speed,
            spawns: 0,
            config,
        }
    }

    /// State after `spawns` spawn events from the start
    pub fn after_spawns(config: DifficultyConfig, spawns: u32) -> Self {
        let mut difficulty = Self::new(config);
        for _ in 0..spawns {
            difficulty.advance();
        }
        difficulty
    }

    /// Apply one spawn event
    pub fn advance(&mut self) {
        let (interval, speed) = step(&self.config, self.spawn_interval_ms, self.fall_speed);
        self.spawn_interval_ms = interval;
        self.fall_speed = speed;
        self.spawns += 1;
    }

    /// Both values have reached their limits
    pub fn is_maxed(&self) -> bool {
        self.spawn_interval_ms <= self.config.min_spawn_interval_ms
            && self.fall_speed >= self.config.max_fall_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step() {
        let mut d = Difficulty::new(DifficultyConfig::default());
        d.advance();
        assert_eq!(d.spawn_interval_ms, 1950);
        assert!((d.fall_speed - 1.05).abs() < 1e-5);
    }

    #[test]
    fn test_interval_floor() {
        let d = Difficulty::after_spawns(DifficultyConfig::default(), 30);
        assert_eq!(d.spawn_interval_ms, 500);
        let d = Difficulty::after_spawns(DifficultyConfig::default(), 500);
        assert_eq!(d.spawn_interval_ms, 500);
    }

    #[test]
    fn test_speed_ceiling_is_exact() {
        let d = Difficulty::after_spawns(DifficultyConfig::default(), 200);
        assert_eq!(d.fall_speed, 5.0);
        assert!(d.is_maxed());
    }

    #[test]
    fn test_uneven_step_clamps_to_floor() {
        let config = DifficultyConfig {
            initial_spawn_interval_ms: 1000,
            spawn_interval_step_ms: 300,
            min_spawn_interval_ms: 500,
            ..Default::default()
        };
        let (interval, _) = step(&config, 700, 1.0);
        assert_eq!(interval, 500);
    }

    #[test]
    fn test_deterministic() {
        let a = Difficulty::after_spawns(DifficultyConfig::default(), 17);
        let b = Difficulty::after_spawns(DifficultyConfig::default(), 17);
        assert_eq!(a, b);
        assert_eq!(a.spawns, 17);
    }
}

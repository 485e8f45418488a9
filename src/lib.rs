//! Crosshair Rush - hold the crosshair, catch the bouncing target
//!
//! Core modules:
//! - `sim`: Simulation (target motion, crosshair pulse, hit test, session)
//! - `platform`: Frame loop and viewport measurement
//! - `highscores`: High score persistence
//! - `audio`: Hit/miss cues
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, MemoryStore, StoreError};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Playfield bounds for the target (percent of viewport, 5% margin each edge)
    pub const BOUND_MIN: f32 = 5.0;
    pub const BOUND_MAX: f32 = 95.0;
    /// Range for fresh target positions (start and after every hit)
    pub const SPAWN_MIN: f32 = 10.0;
    pub const SPAWN_MAX: f32 = 90.0;
    /// Playfield center, where the crosshair sits
    pub const CENTER: f32 = 50.0;

    /// Target speed (percent per tick)
    pub const START_SPEED: f32 = 2.5;
    pub const MAX_SPEED: f32 = 8.0;
    /// Added every tick
    pub const SPEED_RAMP: f32 = 0.002;
    /// Added on every scored hit
    pub const HIT_SPEED_BUMP: f32 = 0.2;
    /// Degrees per tick
    pub const ROTATION_STEP: f32 = 2.0;

    /// Heading jitter
    pub const JITTER_CHANCE: f64 = 0.02;
    pub const JITTER_AMOUNT: f32 = 0.15;

    /// Homing bias - steers a stray target back toward the crosshair
    pub const HOMING_RADIUS: f32 = 60.0;
    pub const HOMING_CHANCE: f64 = 0.10;
    /// Weight kept on the current heading when blending toward center
    pub const HOMING_BLEND: f32 = 0.8;
    /// Full homing pulse kicks in once score exceeds this
    pub const HOMING_PULSE_MIN_SCORE: u32 = 5;
    pub const HOMING_PULSE_CHANCE: f64 = 0.03;

    /// Crosshair pulse (pixels / milliseconds)
    pub const CROSSHAIR_BASE_RADIUS: f32 = 50.0;
    pub const CROSSHAIR_PULSE_AMPLITUDE: f32 = 5.0;
    pub const CROSSHAIR_PULSE_PERIOD_MS: f64 = 300.0;

    /// Glitch effect (cosmetic)
    pub const GLITCH_CHANCE: f64 = 0.005;
    pub const GLITCH_MIN_MS: f64 = 100.0;
    pub const GLITCH_MAX_MS: f64 = 300.0;
    pub const HIT_GLITCH_MS: f64 = 150.0;
    pub const GLITCH_MAX_OFFSET: f32 = 4.0;

    /// Hit test
    pub const OVERLAP_FACTOR: f32 = 0.9;
    /// Accepted overlap factors
    pub const OVERLAP_FACTOR_RANGE: (f32, f32) = (0.8, 0.9);
    pub const TOO_FAR_FACTOR: f32 = 1.5;

    /// Target visual breathing (cosmetic)
    pub const TARGET_SCALE_AMPLITUDE: f32 = 0.05;
    pub const TARGET_SCALE_PERIOD_MS: f64 = 500.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

//! Data-driven game balance
//!
//! Every knob the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning document is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be a probability in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[error("{name} range is empty ({min} >= {max})")]
    Range {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("spawn area [{spawn_min}, {spawn_max}] leaves the bounds [{bound_min}, {bound_max}]")]
    SpawnOutsideBounds {
        spawn_min: f32,
        spawn_max: f32,
        bound_min: f32,
        bound_max: f32,
    },
    #[error("{name} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub bound_min: f32,
    pub bound_max: f32,
    pub spawn_min: f32,
    pub spawn_max: f32,

    // === Target motion ===
    pub start_speed: f32,
    pub max_speed: f32,
    pub speed_ramp: f32,
    pub hit_speed_bump: f32,
    pub rotation_step: f32,
    pub jitter_chance: f64,
    pub jitter_amount: f32,

    // === Homing assist ===
    pub homing_radius: f32,
    pub homing_chance: f64,
    pub homing_blend: f32,
    pub homing_pulse_min_score: u32,
    pub homing_pulse_chance: f64,

    // === Crosshair ===
    pub crosshair_base_radius: f32,
    pub crosshair_pulse_amplitude: f32,
    pub crosshair_pulse_period_ms: f64,
    /// Cosmetic glitches (0 disables random glitches, hit glitch stays)
    pub glitch_chance: f64,

    // === Hit test ===
    pub overlap_factor: f32,
    pub too_far_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bound_min: BOUND_MIN,
            bound_max: BOUND_MAX,
            spawn_min: SPAWN_MIN,
            spawn_max: SPAWN_MAX,

            start_speed: START_SPEED,
            max_speed: MAX_SPEED,
            speed_ramp: SPEED_RAMP,
            hit_speed_bump: HIT_SPEED_BUMP,
            rotation_step: ROTATION_STEP,
            jitter_chance: JITTER_CHANCE,
            jitter_amount: JITTER_AMOUNT,

            homing_radius: HOMING_RADIUS,
            homing_chance: HOMING_CHANCE,
            homing_blend: HOMING_BLEND,
            homing_pulse_min_score: HOMING_PULSE_MIN_SCORE,
            homing_pulse_chance: HOMING_PULSE_CHANCE,

            crosshair_base_radius: CROSSHAIR_BASE_RADIUS,
            crosshair_pulse_amplitude: CROSSHAIR_PULSE_AMPLITUDE,
            crosshair_pulse_period_ms: CROSSHAIR_PULSE_PERIOD_MS,
            glitch_chance: GLITCH_CHANCE,

            overlap_factor: OVERLAP_FACTOR,
            too_far_factor: TOO_FAR_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        for (name, value) in [
            ("jitter_chance", self.jitter_chance),
            ("homing_chance", self.homing_chance),
            ("homing_pulse_chance", self.homing_pulse_chance),
            ("glitch_chance", self.glitch_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Probability { name, value });
            }
        }

        for (name, min, max) in [
            ("bound", self.bound_min, self.bound_max),
            ("spawn", self.spawn_min, self.spawn_max),
        ] {
            if !(min < max) {
                return Err(TuningError::Range { name, min, max });
            }
        }

        for (name, value) in [
            ("start_speed", self.start_speed),
            ("max_speed", self.max_speed),
            ("crosshair_base_radius", self.crosshair_base_radius),
            ("crosshair_pulse_period_ms", self.crosshair_pulse_period_ms as f32),
            ("too_far_factor", self.too_far_factor),
        ] {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        if self.spawn_min < self.bound_min || self.spawn_max > self.bound_max {
            return Err(TuningError::SpawnOutsideBounds {
                spawn_min: self.spawn_min,
                spawn_max: self.spawn_max,
                bound_min: self.bound_min,
                bound_max: self.bound_max,
            });
        }

        // Speed only ever grows and jitter samples a symmetric range
        for (name, value) in [
            ("speed_ramp", self.speed_ramp),
            ("hit_speed_bump", self.hit_speed_bump),
            ("rotation_step", self.rotation_step),
            ("jitter_amount", self.jitter_amount),
            ("homing_radius", self.homing_radius),
            ("crosshair_pulse_amplitude", self.crosshair_pulse_amplitude),
        ] {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { name, value });
            }
        }

        let (min, max) = OVERLAP_FACTOR_RANGE;
        if !(min..=max).contains(&self.overlap_factor) {
            return Err(TuningError::OutOfRange {
                name: "overlap_factor",
                value: self.overlap_factor,
                min,
                max,
            });
        }

        if !(0.0..=1.0).contains(&(self.homing_blend as f64)) {
            return Err(TuningError::Probability {
                name: "homing_blend",
                value: self.homing_blend as f64,
            });
        }

        Ok(())
    }

    /// Clamp a coordinate into the playfield bounds
    #[inline]
    pub fn clamp_to_bounds(&self, v: f32) -> f32 {
        v.clamp(self.bound_min, self.bound_max)
    }
}

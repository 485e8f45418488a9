//! Crosshair pulse model
//!
//! The crosshair breathes around its base radius and occasionally glitches
//! sideways for a few frames. Neither affects gameplay: the hit test reads
//! whatever box the viewport reports.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{GLITCH_MAX_MS, GLITCH_MAX_OFFSET, GLITCH_MIN_MS, HIT_GLITCH_MS};
use crate::tuning::Tuning;

/// A transient visual offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glitch {
    /// Pixel offset to draw the crosshair at
    pub offset: Vec2,
    /// Timestamp (ms) at which the glitch ends
    pub until_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairState {
    /// Visual radius in pixels
    pub radius: f32,
    pub glitch: Option<Glitch>,
    /// Random glitches allowed (reduced motion turns this off)
    #[serde(default = "enabled")]
    pub glitches_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl CrosshairState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            radius: tuning.crosshair_base_radius,
            glitch: None,
            glitches_enabled: true,
        }
    }

    /// Back to base radius with no glitch; keeps the glitch preference
    pub fn reset(&mut self, tuning: &Tuning) {
        self.radius = tuning.crosshair_base_radius;
        self.glitch = None;
    }

    /// Advance one frame at wall-clock time `now_ms`
    pub fn advance<R: Rng + ?Sized>(&mut self, now_ms: f64, tuning: &Tuning, rng: &mut R) {
        self.radius = pulse_radius(now_ms, tuning);

        if self.glitch.is_some_and(|g| now_ms >= g.until_ms) {
            self.glitch = None;
        }

        if self.glitches_enabled && self.glitch.is_none() && rng.random_bool(tuning.glitch_chance)
        {
            let duration = rng.random_range(GLITCH_MIN_MS..=GLITCH_MAX_MS);
            self.start_glitch(now_ms, duration, rng);
        }
    }

    /// Short glitch played on every scored hit
    pub fn hit_glitch<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        if self.glitches_enabled {
            self.start_glitch(now_ms, HIT_GLITCH_MS, rng);
        }
    }

    /// Current draw offset (zero when not glitching)
    pub fn offset(&self) -> Vec2 {
        self.glitch.map_or(Vec2::ZERO, |g| g.offset)
    }

    fn start_glitch<R: Rng + ?Sized>(&mut self, now_ms: f64, duration_ms: f64, rng: &mut R) {
        let offset = Vec2::new(
            rng.random_range(-GLITCH_MAX_OFFSET..=GLITCH_MAX_OFFSET),
            rng.random_range(-GLITCH_MAX_OFFSET..=GLITCH_MAX_OFFSET),
        );
        self.glitch = Some(Glitch {
            offset,
            until_ms: now_ms + duration_ms,
        });
    }
}

/// Absolute oscillation around the base radius
pub fn pulse_radius(now_ms: f64, tuning: &Tuning) -> f32 {
    let phase = (now_ms / tuning.crosshair_pulse_period_ms).sin() as f32;
    tuning.crosshair_base_radius + phase * tuning.crosshair_pulse_amplitude
}

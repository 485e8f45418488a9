//! Fire-time hit test
//!
//! Crosshair and target are treated as circles inscribed in their boxes. The
//! target's radius is shrunk by the overlap factor, so a shot counts when the
//! two visibly overlap rather than merely touch.

use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, center_distance};
use crate::tuning::Tuning;

/// Why a shot missed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    /// Not even close (beyond 1.5x the hit radius)
    TooFar,
    /// Close, but not overlapping enough
    Imprecise,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::TooFar => "too far",
            MissReason::Imprecise => "imprecise hit",
        }
    }
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub hit: bool,
    /// Distance between box centers (pixels)
    pub distance: f32,
    /// Threshold the distance was compared against
    pub hit_radius: f32,
    /// Set only on a miss
    pub miss_reason: Option<MissReason>,
}

/// Decide whether a shot lands
pub fn resolve(crosshair: &BoundingBox, target: &BoundingBox, tuning: &Tuning) -> HitOutcome {
    let distance = center_distance(crosshair, target);
    let hit_radius = crosshair.width / 2.0 + target.width / 2.0 * tuning.overlap_factor;
    let hit = distance < hit_radius;

    let miss_reason = if hit {
        None
    } else if distance > hit_radius * tuning.too_far_factor {
        Some(MissReason::TooFar)
    } else {
        Some(MissReason::Imprecise)
    };

    HitOutcome {
        hit,
        distance,
        hit_radius,
        miss_reason,
    }
}

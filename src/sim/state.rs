//! Session phase, events and end-of-run summary

use serde::{Deserialize, Serialize};

use super::hit::MissReason;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing on screen yet, waiting for start
    #[default]
    Idle,
    /// Target moving, shots count
    Running,
    /// Last shot missed; frozen until restart
    Ended,
}

/// Something the outside world may want to react to (sound, HUD flash).
///
/// Produced by state transitions and drained by the driver afterwards, so a
/// failing collaborator can never interfere with the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began
    Started,
    /// Shot landed; `score` is the new score
    Hit { score: u32 },
    /// Score passed the previous best
    NewHighScore { score: u32 },
    /// Shot missed and the run ended
    Miss { reason: MissReason, score: u32 },
}

/// Stats shown on the game over screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub high_score: u32,
    pub miss_reason: MissReason,
    /// Beat the best score that stood when the run started
    pub new_record: bool,
    /// Hits over shots fired, 0-100 (every run ends on its one miss)
    pub accuracy_pct: u32,
    /// Wall-clock time between the first and last frame of the run
    pub duration_ms: f64,
}

impl RunSummary {
    pub fn accuracy_for(score: u32) -> u32 {
        let shots = score as f64 + 1.0;
        (score as f64 / shots * 100.0).round() as u32
    }
}

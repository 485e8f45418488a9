//! Simulation module
//!
//! All gameplay logic lives here:
//! - One step per animation frame, driven from outside
//! - Seeded RNG only, so runs are reproducible
//! - No rendering or platform dependencies

pub mod crosshair;
pub mod geometry;
pub mod hit;
pub mod session;
pub mod state;
pub mod target;

pub use crosshair::{CrosshairState, Glitch, pulse_radius};
pub use geometry::{BoundingBox, center_distance, circles_overlap, normalize_or};
pub use hit::{HitOutcome, MissReason, resolve};
pub use session::Session;
pub use state::{GameEvent, GamePhase, RunSummary};
pub use target::TargetState;

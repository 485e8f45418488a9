//! Session state machine
//!
//! Idle -> Running on `start`, Running -> Ended on a missed shot, and back to
//! Running on `restart`. The session owns the target, the crosshair, the
//! score and the RNG; the high score is a cached mirror of the store that is
//! written through on every new record.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::crosshair::CrosshairState;
use super::geometry::BoundingBox;
use super::hit::{HitOutcome, MissReason, resolve};
use super::state::{GameEvent, GamePhase, RunSummary};
use super::target::TargetState;
use crate::highscores::HighScoreStore;
use crate::platform::{Element, Viewport};
use crate::tuning::Tuning;

pub struct Session {
    tuning: Tuning,
    rng: Pcg32,
    store: Box<dyn HighScoreStore>,

    phase: GamePhase,
    score: u32,
    high_score: u32,
    miss_reason: Option<MissReason>,

    target: Option<TargetState>,
    crosshair: CrosshairState,

    /// Timestamp of the first and most recent tick of this run
    run_started_ms: Option<f64>,
    last_tick_ms: f64,

    events: Vec<GameEvent>,
}

impl Session {
    /// Create an idle session, loading the stored high score once
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn HighScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(score) => score.unwrap_or(0),
            Err(e) => {
                log::warn!("High score unavailable, starting from 0: {}", e);
                0
            }
        };

        log::info!("Session seed: {}", seed);
        Self {
            crosshair: CrosshairState::new(&tuning),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            store,
            phase: GamePhase::Idle,
            score: 0,
            high_score,
            miss_reason: None,
            target: None,
            run_started_ms: None,
            last_tick_ms: 0.0,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run. Allowed from any phase; a run in progress is discarded.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            log::debug!("Discarding run in progress (score {})", self.score);
        }

        self.score = 0;
        self.miss_reason = None;
        self.target = Some(TargetState::spawn(&self.tuning, &mut self.rng));
        self.crosshair.reset(&self.tuning);
        self.run_started_ms = None;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);

        log::info!("Run started (best {})", self.high_score);
    }

    /// Alias of [`Session::start`]
    pub fn restart(&mut self) {
        self.start();
    }

    /// Advance target and crosshair one frame. No-op unless running.
    pub fn tick(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        let Some(target) = self.target.as_mut() else {
            return;
        };

        self.run_started_ms.get_or_insert(now_ms);
        self.last_tick_ms = now_ms;

        target.advance(self.score, &self.tuning, &mut self.rng);
        self.crosshair.advance(now_ms, &self.tuning, &mut self.rng);
    }

    /// Resolve a shot from the two on-screen boxes.
    ///
    /// Returns `None` when no run is active.
    pub fn fire(&mut self, crosshair: &BoundingBox, target: &BoundingBox) -> Option<HitOutcome> {
        if self.phase != GamePhase::Running {
            return None;
        }

        let outcome = resolve(crosshair, target, &self.tuning);
        match outcome.miss_reason {
            None => self.on_hit(),
            Some(reason) => self.on_miss(reason, outcome.distance),
        }
        Some(outcome)
    }

    /// Measure both elements and fire. Any missing measurement makes this a no-op.
    pub fn fire_measured(&mut self, viewport: &dyn Viewport) -> Option<HitOutcome> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let (Some(crosshair), Some(target)) = (
            viewport.bounding_box(Element::Crosshair),
            viewport.bounding_box(Element::Target),
        ) else {
            log::debug!("Shot ignored: element not measurable");
            return None;
        };
        self.fire(&crosshair, &target)
    }

    /// Player click: starts a run from Idle, otherwise fires.
    ///
    /// Ended runs need an explicit [`Session::restart`].
    pub fn trigger(&mut self, viewport: &dyn Viewport) -> Option<HitOutcome> {
        if self.phase == GamePhase::Idle {
            self.start();
            return None;
        }
        self.fire_measured(viewport)
    }

    fn on_hit(&mut self) {
        self.score += 1;
        if let Some(target) = self.target.as_mut() {
            target.on_hit(&self.tuning, &mut self.rng);
        }
        self.crosshair.hit_glitch(self.last_tick_ms, &mut self.rng);
        self.events.push(GameEvent::Hit { score: self.score });
        log::debug!("Hit! score {}", self.score);

        self.update_high_score();
    }

    fn on_miss(&mut self, reason: MissReason, distance: f32) {
        self.phase = GamePhase::Ended;
        self.miss_reason = Some(reason);
        self.events.push(GameEvent::Miss {
            reason,
            score: self.score,
        });
        log::info!(
            "Run ended: {} (distance {:.1}), score {}",
            reason,
            distance,
            self.score
        );
    }

    /// Keep the best score at or above the current score, writing through
    fn update_high_score(&mut self) {
        if self.score <= self.high_score {
            return;
        }
        self.high_score = self.score;
        self.events.push(GameEvent::NewHighScore {
            score: self.high_score,
        });
        if let Err(e) = self.store.store(self.high_score) {
            log::warn!("Failed to save high score {}: {}", self.high_score, e);
        }
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stop or resume random crosshair glitches (reduced motion)
    pub fn set_glitches_enabled(&mut self, enabled: bool) {
        self.crosshair.glitches_enabled = enabled;
        if !enabled {
            self.crosshair.glitch = None;
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        self.miss_reason
    }

    /// The target; `None` until the first run starts
    pub fn target(&self) -> Option<&TargetState> {
        self.target.as_ref()
    }

    pub fn crosshair(&self) -> &CrosshairState {
        &self.crosshair
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// End-of-run stats, available once the run has ended
    pub fn summary(&self) -> Option<RunSummary> {
        if self.phase != GamePhase::Ended {
            return None;
        }
        let miss_reason = self.miss_reason?;
        let duration_ms = self
            .run_started_ms
            .map_or(0.0, |start| (self.last_tick_ms - start).max(0.0));

        Some(RunSummary {
            score: self.score,
            high_score: self.high_score,
            miss_reason,
            new_record: self.score > 0 && self.score >= self.high_score,
            accuracy_pct: RunSummary::accuracy_for(self.score),
            duration_ms,
        })
    }
}

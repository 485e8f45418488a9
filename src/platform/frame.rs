//! Frame loop
//!
//! The host owns the clock (`requestAnimationFrame` in the browser). The loop
//! keeps at most one frame pending, re-registers only while the session is
//! running, and cancels the pending frame on `stop` so nothing ticks after
//! teardown.

use crate::sim::{GamePhase, Session};

/// Host-issued id of a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Something that can call us back on the next frame
pub trait FrameScheduler {
    /// Register for the next frame; `None` if the host refused
    fn request(&mut self) -> Option<FrameHandle>;
    fn cancel(&mut self, handle: FrameHandle);
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    stopped: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            stopped: true,
        }
    }

    /// Start (or resume) the loop. Does nothing if a frame is already pending.
    pub fn begin(&mut self) {
        self.stopped = false;
        if self.pending.is_none() {
            self.pending = self.scheduler.request();
            if self.pending.is_none() {
                log::warn!("Host refused frame request, loop not running");
            }
        }
    }

    /// Handle a delivered frame. Returns whether another frame was scheduled.
    pub fn on_frame(&mut self, session: &mut Session, now_ms: f64) -> bool {
        self.pending = None;
        if self.stopped {
            return false;
        }

        session.tick(now_ms);

        if session.phase() == GamePhase::Running {
            self.pending = self.scheduler.request();
        }
        self.pending.is_some()
    }

    /// Cancel any pending frame; later deliveries are ignored
    pub fn stop(&mut self) {
        self.stopped = true;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::BoundingBox;
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[derive(Default)]
    struct FakeClock {
        next_id: i32,
        requested: u32,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for FakeClock {
        fn request(&mut self) -> Option<FrameHandle> {
            self.next_id += 1;
            self.requested += 1;
            Some(FrameHandle(self.next_id))
        }

        fn cancel(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    fn running_session() -> Session {
        let mut s = Session::new(3, Tuning::default(), Box::new(MemoryStore::new()));
        s.start();
        s
    }

    #[test]
    fn test_loop_reschedules_while_running() {
        let mut session = running_session();
        let mut frames = FrameLoop::new(FakeClock::default());
        frames.begin();
        frames.begin();
        assert_eq!(frames.scheduler().requested, 1);

        let start = session.target().unwrap().pos;
        assert!(frames.on_frame(&mut session, 16.0));
        assert!(frames.on_frame(&mut session, 32.0));
        assert_eq!(frames.scheduler().requested, 3);
        assert_ne!(session.target().unwrap().pos, start);
    }

    #[test]
    fn test_loop_stops_after_miss() {
        let mut session = running_session();
        let mut frames = FrameLoop::new(FakeClock::default());
        frames.begin();

        session.fire(
            &BoundingBox::centered(Vec2::ZERO, 100.0),
            &BoundingBox::centered(Vec2::splat(500.0), 44.0),
        );
        assert!(!frames.on_frame(&mut session, 16.0));
        assert!(!frames.is_scheduled());
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut session = running_session();
        let mut frames = FrameLoop::new(FakeClock::default());
        frames.begin();
        frames.stop();

        assert_eq!(frames.scheduler().cancelled, vec![FrameHandle(1)]);
        assert!(!frames.is_scheduled());

        // A frame already in flight is ignored
        let before = session.target().cloned();
        assert!(!frames.on_frame(&mut session, 16.0));
        assert_eq!(session.target().cloned(), before);
    }
}

//! Viewport measurement
//!
//! At fire time the session asks the host for the on-screen boxes of the
//! crosshair and the target. In the browser that is
//! `getBoundingClientRect`; headless runs use [`VirtualViewport`], which lays
//! the playfield out on a fixed-size virtual screen.

use glam::Vec2;

use crate::sim::{BoundingBox, Session, TargetState, circles_overlap};

/// Elements the hit test needs measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Crosshair,
    Target,
}

/// Bounding-box query capability. `None` means the element is not mounted.
pub trait Viewport {
    fn bounding_box(&self, element: Element) -> Option<BoundingBox>;
}

/// Default on-screen target size in pixels
pub const TARGET_SIZE: f32 = 64.0;

/// Fixed-size virtual screen mirroring a session
#[derive(Debug, Clone)]
pub struct VirtualViewport {
    pub width: f32,
    pub height: f32,
    pub target_size: f32,
    crosshair: Option<BoundingBox>,
    target: Option<BoundingBox>,
}

impl VirtualViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            target_size: TARGET_SIZE,
            crosshair: None,
            target: None,
        }
    }

    /// Screen position of a playfield point (percent)
    pub fn to_screen(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x / 100.0 * self.width, pos.y / 100.0 * self.height)
    }

    /// Re-measure from the session's current state (the "render" step)
    pub fn sync(&mut self, session: &Session, now_ms: f64) {
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        let crosshair = session.crosshair();
        self.crosshair = Some(BoundingBox::centered(
            center + crosshair.offset(),
            crosshair.radius * 2.0,
        ));

        self.target = session.target().map(|t| {
            let size = self.target_size * TargetState::visual_scale(now_ms);
            BoundingBox::centered(self.to_screen(t.pos), size)
        });
    }

    /// Whether a shot fired now would land, using the hit test's overlap rule
    pub fn target_on_crosshair(&self, overlap_factor: f32) -> bool {
        match (self.crosshair, self.target) {
            (Some(c), Some(t)) => circles_overlap(
                c.center(),
                c.width / 2.0,
                t.center(),
                t.width / 2.0 * overlap_factor,
            ),
            _ => false,
        }
    }
}

impl Viewport for VirtualViewport {
    fn bounding_box(&self, element: Element) -> Option<BoundingBox> {
        match element {
            Element::Crosshair => self.crosshair,
            Element::Target => self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    #[test]
    fn test_unsynced_viewport_has_no_boxes() {
        let vp = VirtualViewport::new(800.0, 600.0);
        assert!(vp.bounding_box(Element::Crosshair).is_none());
        assert!(vp.bounding_box(Element::Target).is_none());
        assert!(!vp.target_on_crosshair(1.0));
    }

    #[test]
    fn test_sync_lays_out_boxes() {
        let mut session = Session::new(4, Tuning::default(), Box::new(MemoryStore::new()));
        let mut vp = VirtualViewport::new(800.0, 600.0);

        // Idle: crosshair only
        vp.sync(&session, 0.0);
        let c = vp.bounding_box(Element::Crosshair).unwrap();
        assert_eq!(c.center(), Vec2::new(400.0, 300.0));
        assert_eq!(c.width, 100.0);
        assert!(vp.bounding_box(Element::Target).is_none());

        session.start();
        vp.sync(&session, 0.0);
        let t = vp.bounding_box(Element::Target).unwrap();
        let expected = vp.to_screen(session.target().unwrap().pos);
        assert!((t.center() - expected).length() < 1e-3);
        assert_eq!(t.width, TARGET_SIZE);
    }

    #[test]
    fn test_shot_agrees_with_overlap_check() {
        let tuning = Tuning::default();
        let mut session = Session::new(4, tuning.clone(), Box::new(MemoryStore::new()));
        session.start();
        let mut vp = VirtualViewport::new(800.0, 600.0);

        // Wait for the target to drift over the crosshair, then shoot
        let mut now = 0.0;
        loop {
            now += 16.0;
            session.tick(now);
            vp.sync(&session, now);
            if vp.target_on_crosshair(tuning.overlap_factor) {
                break;
            }
            assert!(now < 16.0 * 200_000.0, "target never crossed the crosshair");
        }
        let outcome = session.fire_measured(&vp).unwrap();
        assert!(outcome.hit);
        assert_eq!(session.score(), 1);

        // The target teleported on the hit; wait until it is clear of the crosshair
        loop {
            now += 16.0;
            session.tick(now);
            vp.sync(&session, now);
            if !vp.target_on_crosshair(tuning.overlap_factor) {
                break;
            }
        }
        let outcome = session.fire_measured(&vp).unwrap();
        assert!(!outcome.hit);
        assert_eq!(session.phase(), GamePhase::Ended);
    }
}

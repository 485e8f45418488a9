//! Target motion model
//!
//! One call to [`TargetState::advance`] is one simulation step. The target
//! bounces inside the playfield, wanders a little, and gets nudged back toward
//! the crosshair when it strays into a corner so a fast target never becomes
//! permanently unreachable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::normalize_or;
use crate::consts::CENTER;
use crate::tuning::Tuning;
use crate::wrap_degrees;

/// The moving target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    /// Position in playfield percent (both axes within the tuning bounds)
    pub pos: Vec2,
    /// Unit-length direction of travel
    pub heading: Vec2,
    /// Percent per tick; only grows during a run
    pub speed: f32,
    /// Degrees, [0, 360)
    pub rotation: f32,
}

impl TargetState {
    /// Fresh target at a random spawn point, heading diagonally with random signs
    pub fn spawn<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let sign = |flip: bool| if flip { 1.0 } else { -1.0 };
        let heading = Vec2::new(sign(rng.random()), sign(rng.random())).normalize();

        Self {
            pos: random_spawn_point(tuning, rng),
            heading,
            speed: tuning.start_speed.min(tuning.max_speed),
            rotation: 0.0,
        }
    }

    /// Advance one tick. `score` gates the full homing pulse.
    pub fn advance<R: Rng + ?Sized>(&mut self, score: u32, tuning: &Tuning, rng: &mut R) {
        self.integrate(tuning);
        self.jitter(tuning, rng);
        self.home(score, tuning, rng);
        self.rotation = wrap_degrees(self.rotation + tuning.rotation_step);
        self.speed = (self.speed + tuning.speed_ramp).min(tuning.max_speed);
    }

    /// Scored hit: teleport somewhere new and speed up
    pub fn on_hit<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        self.pos = random_spawn_point(tuning, rng);
        self.speed = (self.speed + tuning.hit_speed_bump).min(tuning.max_speed);
    }

    /// Size multiplier for rendering (not part of the simulation)
    pub fn visual_scale(now_ms: f64) -> f32 {
        use crate::consts::{TARGET_SCALE_AMPLITUDE, TARGET_SCALE_PERIOD_MS};
        1.0 + (now_ms / TARGET_SCALE_PERIOD_MS).sin() as f32 * TARGET_SCALE_AMPLITUDE
    }

    /// Speed as shown on the HUD
    pub fn speed_readout(&self) -> u32 {
        (self.speed * 10.0).round() as u32
    }

    /// Move along the heading, bouncing off the playfield edges
    fn integrate(&mut self, tuning: &Tuning) {
        let next = self.pos + self.heading * self.speed;

        if next.x <= tuning.bound_min || next.x >= tuning.bound_max {
            self.heading.x = -self.heading.x;
        }
        if next.y <= tuning.bound_min || next.y >= tuning.bound_max {
            self.heading.y = -self.heading.y;
        }

        self.pos = Vec2::new(tuning.clamp_to_bounds(next.x), tuning.clamp_to_bounds(next.y));
    }

    /// Occasional small random turn
    fn jitter<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        if !rng.random_bool(tuning.jitter_chance) {
            return;
        }
        let amount = tuning.jitter_amount;
        let nudge = Vec2::new(
            rng.random_range(-amount..=amount),
            rng.random_range(-amount..=amount),
        );
        self.heading = normalize_or(self.heading + nudge, self.heading);
    }

    /// Steer toward the crosshair: a soft blend when far out, and a hard
    /// pulse straight at it once the player has some score
    fn home<R: Rng + ?Sized>(&mut self, score: u32, tuning: &Tuning, rng: &mut R) {
        let center = Vec2::splat(CENTER);
        let to_center = (center - self.pos) / CENTER;

        if self.pos.distance(center) > tuning.homing_radius && rng.random_bool(tuning.homing_chance)
        {
            let blend = tuning.homing_blend;
            let blended = self.heading * blend + to_center * (1.0 - blend);
            self.heading = normalize_or(blended, self.heading);
        }

        if score > tuning.homing_pulse_min_score && rng.random_bool(tuning.homing_pulse_chance) {
            self.heading = normalize_or(to_center, self.heading);
        }
    }
}

fn random_spawn_point<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(tuning.spawn_min..=tuning.spawn_max),
        rng.random_range(tuning.spawn_min..=tuning.spawn_max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Tuning with every random branch switched off
    fn calm() -> Tuning {
        Tuning {
            jitter_chance: 0.0,
            homing_chance: 0.0,
            homing_pulse_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn target_at(x: f32, y: f32, heading: Vec2, speed: f32) -> TargetState {
        TargetState {
            pos: Vec2::new(x, y),
            heading: heading.normalize(),
            speed,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_spawn_within_spawn_area() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let t = TargetState::spawn(&tuning, &mut rng);
            assert!((SPAWN_MIN..=SPAWN_MAX).contains(&t.pos.x));
            assert!((SPAWN_MIN..=SPAWN_MAX).contains(&t.pos.y));
            assert!((t.heading.length() - 1.0).abs() < 1e-5);
            assert!(t.heading.x.abs() > 0.7 && t.heading.y.abs() > 0.7);
            assert_eq!(t.speed, START_SPEED);
        }
    }

    #[test]
    fn test_linear_step() {
        let tuning = calm();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = target_at(50.0, 50.0, Vec2::X, 2.0);
        t.advance(0, &tuning, &mut rng);
        assert!((t.pos.x - 52.0).abs() < 1e-5);
        assert_eq!(t.pos.y, 50.0);
        assert_eq!(t.rotation, ROTATION_STEP);
        assert!((t.speed - (2.0 + SPEED_RAMP)).abs() < 1e-6);
    }

    #[test]
    fn test_wall_reflection_clamps_and_flips() {
        let tuning = calm();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = target_at(94.0, 50.0, Vec2::X, 3.0);
        t.advance(0, &tuning, &mut rng);
        assert_eq!(t.pos.x, BOUND_MAX);
        assert!(t.heading.x < 0.0);

        // Only the axis that hit the wall flips
        let mut t = target_at(6.0, 50.0, Vec2::new(-1.0, 1.0), 3.0);
        let before = t.heading;
        t.advance(0, &tuning, &mut rng);
        assert_eq!(t.pos.x, BOUND_MIN);
        assert_eq!(t.heading.x, -before.x);
        assert_eq!(t.heading.y, before.y);
    }

    #[test]
    fn test_speed_caps_at_max() {
        let tuning = calm();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = target_at(50.0, 50.0, Vec2::X, MAX_SPEED - 0.001);
        t.advance(0, &tuning, &mut rng);
        assert_eq!(t.speed, MAX_SPEED);

        t.on_hit(&tuning, &mut rng);
        assert_eq!(t.speed, MAX_SPEED);
    }

    #[test]
    fn test_on_hit_teleports_and_bumps_speed() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut t = target_at(5.0, 5.0, Vec2::X, 3.0);
        t.on_hit(&tuning, &mut rng);
        assert!((SPAWN_MIN..=SPAWN_MAX).contains(&t.pos.x));
        assert!((SPAWN_MIN..=SPAWN_MAX).contains(&t.pos.y));
        assert!((t.speed - 3.2).abs() < 1e-5);
    }

    #[test]
    fn test_homing_blend_turns_toward_center() {
        let tuning = Tuning {
            homing_chance: 1.0,
            ..calm()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        // Parked deep in the top-left corner, heading along the wall
        let mut t = target_at(6.0, 6.0, Vec2::new(0.0, -1.0), 0.0);
        t.advance(0, &tuning, &mut rng);
        // Blend pulls x toward the center (+x)
        assert!(t.heading.x > 0.0);
        assert!((t.heading.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_homing_blend_needs_distance() {
        let tuning = Tuning {
            homing_chance: 1.0,
            ..calm()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = target_at(30.0, 30.0, Vec2::new(-1.0, 0.0), 0.0);
        t.advance(0, &tuning, &mut rng);
        assert_eq!(t.heading, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_homing_distance_uses_clamped_position() {
        let tuning = Tuning {
            homing_chance: 1.0,
            ..calm()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        // Overshoots to x = 114 (well past the homing radius) but lands on the
        // wall at x = 95, which is inside it
        let mut t = target_at(94.0, 70.0, Vec2::X, 20.0);
        t.advance(0, &tuning, &mut rng);
        assert_eq!(t.pos, Vec2::new(BOUND_MAX, 70.0));
        assert_eq!(t.heading, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_homing_pulse_requires_score() {
        let tuning = Tuning {
            homing_pulse_chance: 1.0,
            ..calm()
        };
        let mut rng = Pcg32::seed_from_u64(1);

        let mut t = target_at(20.0, 50.0, Vec2::new(-1.0, 0.0), 0.0);
        t.advance(HOMING_PULSE_MIN_SCORE, &tuning, &mut rng);
        assert_eq!(t.heading, Vec2::new(-1.0, 0.0));

        t.advance(HOMING_PULSE_MIN_SCORE + 1, &tuning, &mut rng);
        assert!((t.heading - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_homing_pulse_at_center_keeps_heading() {
        let tuning = Tuning {
            homing_pulse_chance: 1.0,
            ..calm()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = target_at(50.0, 50.0, Vec2::Y, 0.0);
        t.advance(10, &tuning, &mut rng);
        assert_eq!(t.heading, Vec2::Y);
    }

    #[test]
    fn test_jitter_keeps_unit_heading() {
        let tuning = Tuning {
            jitter_chance: 1.0,
            ..calm()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let mut t = target_at(50.0, 50.0, Vec2::new(1.0, 1.0), 0.0);
        let before = t.heading;
        t.advance(0, &tuning, &mut rng);
        assert!((t.heading.length() - 1.0).abs() < 1e-5);
        assert_ne!(t.heading, before);
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let tuning = Tuning::default();
        let mut rng_a = Pcg32::seed_from_u64(99);
        let mut rng_b = Pcg32::seed_from_u64(99);
        let mut a = TargetState::spawn(&tuning, &mut rng_a);
        let mut b = TargetState::spawn(&tuning, &mut rng_b);
        for _ in 0..500 {
            a.advance(8, &tuning, &mut rng_a);
            b.advance(8, &tuning, &mut rng_b);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_visual_scale_range() {
        for ms in [0.0, 250.0, 785.4, 10_000.0] {
            let s = TargetState::visual_scale(ms);
            assert!((0.95..=1.05).contains(&s));
        }
        assert_eq!(TargetState::visual_scale(0.0), 1.0);
    }

    #[test]
    fn test_speed_readout() {
        let t = target_at(50.0, 50.0, Vec2::X, 2.54);
        assert_eq!(t.speed_readout(), 25);
    }

    proptest! {
        #[test]
        fn prop_motion_invariants(seed in any::<u64>(), score in 0u32..20, ticks in 1usize..2000) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut t = TargetState::spawn(&tuning, &mut rng);
            let mut last_speed = t.speed;

            for _ in 0..ticks {
                t.advance(score, &tuning, &mut rng);

                prop_assert!((BOUND_MIN..=BOUND_MAX).contains(&t.pos.x));
                prop_assert!((BOUND_MIN..=BOUND_MAX).contains(&t.pos.y));
                prop_assert!((t.heading.length() - 1.0).abs() < 1e-4);
                prop_assert!(t.speed >= last_speed);
                prop_assert!(t.speed <= MAX_SPEED);
                prop_assert!((0.0..360.0).contains(&t.rotation));
                last_speed = t.speed;
            }
        }
    }
}

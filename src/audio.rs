//! Audio cues
//!
//! Sound is fire-and-forget: the session only emits [`GameEvent`]s, and the
//! driver hands the matching cues to a [`CuePlayer`] after the transition is
//! done. Players swallow their own failures.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Shot landed
    Hit,
    /// Shot missed, run over
    Miss,
    /// Score passed the previous best
    NewRecord,
}

impl Cue {
    /// Cue to play for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Hit { .. } => Some(Cue::Hit),
            GameEvent::Miss { .. } => Some(Cue::Miss),
            GameEvent::NewHighScore { .. } => Some(Cue::NewRecord),
            GameEvent::Started => None,
        }
    }
}

/// Audio playback capability
pub trait CuePlayer {
    /// Best effort; must never panic or report failure
    fn play(&self, cue: Cue);
}

/// Play the cues for a batch of drained events
pub fn play_events(player: &dyn CuePlayer, events: &[GameEvent]) {
    for cue in events.iter().filter_map(Cue::for_event) {
        player.play(cue);
    }
}

/// Player for headless builds: logs instead of making noise
#[derive(Debug, Default)]
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play(&self, cue: Cue) {
        log::debug!("cue: {:?}", cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Cue, CuePlayer};

    /// Procedurally generated cues through the Web Audio API
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Hit - short rising blip
        fn play_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(660.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1320.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Miss - low buzzing drop
        fn play_miss(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(55.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.45).ok();
        }

        /// New record - quick arpeggio
        fn play_new_record(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [800.0, 1000.0, 1200.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }
    }

    impl CuePlayer for AudioManager {
        fn play(&self, cue: Cue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Hit => self.play_hit(ctx, vol),
                Cue::Miss => self.play_miss(ctx, vol),
                Cue::NewRecord => self.play_new_record(ctx, vol),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MissReason;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        played: RefCell<Vec<Cue>>,
    }

    impl CuePlayer for Recorder {
        fn play(&self, cue: Cue) {
            self.played.borrow_mut().push(cue);
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let recorder = Recorder::default();
        let events = [
            GameEvent::Started,
            GameEvent::Hit { score: 1 },
            GameEvent::NewHighScore { score: 1 },
            GameEvent::Miss {
                reason: MissReason::Imprecise,
                score: 1,
            },
        ];
        play_events(&recorder, &events);
        assert_eq!(
            *recorder.played.borrow(),
            vec![Cue::Hit, Cue::NewRecord, Cue::Miss]
        );
    }

    #[test]
    fn test_hit_and_miss_cues_differ() {
        assert_ne!(
            Cue::for_event(&GameEvent::Hit { score: 3 }),
            Cue::for_event(&GameEvent::Miss {
                reason: MissReason::TooFar,
                score: 3
            })
        );
    }
}

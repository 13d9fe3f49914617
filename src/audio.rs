//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run (re)started
    Start,
    /// Player switched lanes
    LaneChange,
    /// Coin collected
    Coin,
    /// Hit another car
    Crash,
    /// Run ended with a new best score
    HighScore,
}

impl SoundEffect {
    /// Effect to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(SoundEffect::Start),
            GameEvent::LaneChanged { .. } => Some(SoundEffect::LaneChange),
            GameEvent::Collected { .. } => Some(SoundEffect::Coin),
            GameEvent::Crashed { .. } => Some(SoundEffect::Crash),
            GameEvent::RunEnded {
                new_high_score: true,
                ..
            } => Some(SoundEffect::HighScore),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
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
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Effective volume (0.0 = muted)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Start => self.play_start(ctx, vol),
                SoundEffect::LaneChange => self.play_lane_change(ctx, vol),
                SoundEffect::Coin => self.play_coin(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }

        // === Sound generators ===

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

        /// Start - engine rev up
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(80.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }

        /// Lane change - quiet tyre swish
        fn play_lane_change(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.08, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(120.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Coin - bright two-note chime
        fn play_coin(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [988.0, 1319.0].iter().enumerate() {
                let delay = i as f64 * 0.07;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Crash - noisy impact with a falling tail
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            // Crunch: rapid frequency jumps
            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency().set_value_at_time(2400.0, t + 0.01).ok();
                osc.frequency().set_value_at_time(180.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(1800.0, t + 0.05).ok();
                osc.frequency().set_value_at_time(90.0, t + 0.08).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            // Bass thump
            if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.frequency().set_value_at_time(70.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }

        /// High score - celebratory
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = 0.4 + i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EntityKind;

    #[test]
    fn test_event_sounds() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Collected { id: 1, bonus: 25 }),
            Some(SoundEffect::Coin)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::RunEnded {
                score: 10,
                new_high_score: false
            }),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Spawned {
                id: 2,
                kind: EntityKind::Obstacle,
                lane: 0
            }),
            None
        );
    }
}

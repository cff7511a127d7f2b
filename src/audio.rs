//! Sound cues
//!
//! The controller turns engine outcomes into `SoundCue`s and hands them to an
//! `AudioSink`. On the web the sink synthesizes them with the Web Audio API,
//! no external files needed.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Axe swing reached its impact frame
    Swing,
    /// Tree felled, wood collected
    WaveAdvance,
    /// Boss tree felled
    BossDefeat,
    /// Upgrade bought
    UpgradePurchase,
    /// Chop rejected as too fast
    Miss,
}

/// Anything that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Keeps every cue, for headless sessions and tests
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub cues: Vec<SoundCue>,
}

impl RecordingSink {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("cue {cue:?}");
        self.cues.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};
    use crate::settings::Settings;

    /// Web Audio synthesizer
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudioSink {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
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

        /// Swing - short whoosh down
        fn play_swing(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.09)
                .ok();
            osc.frequency().set_value_at_time(520.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(180.0, t + 0.09)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }

        /// Tree down - wood crack, then a coin-ish collect
        fn play_wave_advance(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.35, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.frequency().set_value_at_time(140.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(50.0, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
            for (i, freq) in [700.0, 950.0].iter().enumerate() {
                let start = t + 0.1 + i as f64 * 0.07;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    gain.gain().set_value_at_time(vol * 0.22, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.15)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.2).ok();
                }
            }
        }

        /// Boss down - triumphant fanfare
        fn play_boss_defeat(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }

        fn play_purchase(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Miss - dull thud
        fn play_miss(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    impl AudioSink for WebAudioSink {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Swing => self.play_swing(ctx, vol),
                SoundCue::WaveAdvance => self.play_wave_advance(ctx, vol),
                SoundCue::BossDefeat => self.play_boss_defeat(ctx, vol),
                SoundCue::UpgradePurchase => self.play_purchase(ctx, vol),
                SoundCue::Miss => self.play_miss(ctx, vol),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_counts() {
        let mut sink = RecordingSink::default();
        sink.play(SoundCue::Swing);
        sink.play(SoundCue::Miss);
        sink.play(SoundCue::Swing);
        assert_eq!(sink.count(SoundCue::Swing), 2);
        assert_eq!(sink.count(SoundCue::BossDefeat), 0);
    }
}

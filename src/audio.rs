//! Audio cue hooks
//!
//! The core only names the moment (`start`, `catch`, `gameOver`); a sink
//! owned by the host does the playing. Sink failures are logged and
//! dropped, they never reach the simulation.
//!
//! On the web, `AudioManager` synthesizes the cues with the Web Audio API,
//! so no sound files are needed.

use thiserror::Error;

/// Lifecycle points that have a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Session started
    Start,
    /// Good item caught
    Catch,
    /// Bad item hit, session over
    GameOver,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Start => "start",
            AudioCue::Catch => "catch",
            AudioCue::GameOver => "gameOver",
        }
    }
}

/// Why a cue could not be played
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue) -> Result<(), AudioError>;
}

/// Sink that plays nothing (headless runs, muted hosts)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Play a cue, swallowing and logging any failure
pub fn fire(sink: &mut dyn AudioSink, cue: AudioCue) {
    if let Err(e) = sink.play(cue) {
        log::warn!("Error playing sound {}: {}", cue.name(), e);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioError, AudioSink};

    /// Procedural Web Audio player
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Oscillator routed through a gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(js_err)?;
            let gain = ctx.create_gain().map_err(js_err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(js_err)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(js_err)?;

            Ok((osc, gain))
        }

        /// One enveloped note starting `offset` seconds from now
        fn note(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            vol: f32,
            offset: f64,
            length: f64,
        ) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, freq, osc_type)?;
            let t = ctx.current_time() + offset;

            gain.gain().set_value_at_time(0.0, t).map_err(js_err)?;
            gain.gain()
                .linear_ramp_to_value_at_time(vol, t + 0.01)
                .map_err(js_err)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .map_err(js_err)?;

            osc.start_with_when(t).map_err(js_err)?;
            osc.stop_with_when(t + length + 0.02).map_err(js_err)?;
            Ok(())
        }

        /// Rising arpeggio
        fn play_start(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            for (i, freq) in [392.0, 523.25, 659.25].into_iter().enumerate() {
                Self::note(ctx, freq, OscillatorType::Triangle, vol * 0.4, i as f64 * 0.08, 0.15)?;
            }
            Ok(())
        }

        /// Short bright blip
        fn play_catch(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            Self::note(ctx, 880.0, OscillatorType::Sine, vol * 0.5, 0.0, 0.08)?;
            Self::note(ctx, 1318.5, OscillatorType::Sine, vol * 0.3, 0.04, 0.08)
        }

        /// Falling sawtooth
        fn play_game_over(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, 300.0, OscillatorType::Sawtooth)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).map_err(js_err)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .map_err(js_err)?;
            osc.frequency().set_value_at_time(300.0, t).map_err(js_err)?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.8)
                .map_err(js_err)?;

            osc.start().map_err(js_err)?;
            osc.stop_with_when(t + 0.85).map_err(js_err)?;
            Ok(())
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: AudioCue) -> Result<(), AudioError> {
            let vol = self.master_volume;
            if vol <= 0.0 {
                return Ok(());
            }

            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                AudioCue::Start => Self::play_start(ctx, vol),
                AudioCue::Catch => Self::play_catch(ctx, vol),
                AudioCue::GameOver => Self::play_game_over(ctx, vol),
            }
        }
    }

    fn js_err(e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Playback(format!("{:?}", e))
    }
}

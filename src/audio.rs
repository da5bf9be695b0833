//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::error::{Error, Result};
use crate::platform::AudioCue;
use crate::settings::Settings;

/// Number of distinct completion jingles
pub const COMPLETION_VARIANTS: u8 = 7;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct letter; pitch rises with the group size
    KeyClick { group_size: usize },
    /// Word (group) typed out; variant picks the jingle
    Completion { variant: u8, combo_size: usize },
    /// Run ended
    GameOver,
    /// Reboot button pressed
    Reboot,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    /// Background drone, while playing
    music: Option<(OscillatorNode, GainNode)>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            music: None,
        }
    }

    fn context(&self) -> Result<&AudioContext> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or_else(|| Error::AudioRejected("no AudioContext".into()))?;
        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Ok(ctx)
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) -> Result<()> {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return Ok(());
        }
        let ctx = self.context()?;

        match effect {
            SoundEffect::KeyClick { group_size } => self.play_key_click(ctx, vol, group_size),
            SoundEffect::Completion {
                variant,
                combo_size,
            } => self.play_completion(ctx, vol, variant, combo_size),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::Reboot => self.play_reboot(ctx, vol),
        }
    }

    /// Start the looping background drone
    pub fn start_music(&mut self) -> Result<()> {
        if self.music.is_some() || self.music_volume <= 0.0 {
            return Ok(());
        }
        let ctx = self.context()?;
        let (osc, gain) = create_osc(ctx, 55.0, OscillatorType::Triangle)?;
        gain.gain().set_value(self.music_volume * 0.3);
        osc.start().map_err(js_err)?;
        self.music = Some((osc, gain));
        Ok(())
    }

    /// Stop the background drone and rewind it
    pub fn stop_music(&mut self) {
        if let Some((osc, _gain)) = self.music.take() {
            let _ = osc.stop();
        }
    }

    // === Sound generators ===

    /// Short tick for each correct letter
    fn play_key_click(&self, ctx: &AudioContext, vol: f32, group_size: usize) -> Result<()> {
        let freq = 1200.0 + 150.0 * group_size.min(6) as f32;
        let (osc, gain) = create_osc(ctx, freq, OscillatorType::Square)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.08, t).map_err(js_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.03)
            .map_err(js_err)?;

        osc.start().map_err(js_err)?;
        osc.stop_with_when(t + 0.04).map_err(js_err)?;
        Ok(())
    }

    /// Rising arpeggio; bigger combos climb higher
    fn play_completion(
        &self,
        ctx: &AudioContext,
        vol: f32,
        variant: u8,
        combo_size: usize,
    ) -> Result<()> {
        // Pentatonic roots so every variant sounds "right"
        const ROOTS: [f32; COMPLETION_VARIANTS as usize] =
            [523.25, 587.33, 659.25, 783.99, 880.0, 1046.5, 1174.66];
        let root = ROOTS[variant as usize % ROOTS.len()];
        let notes = (2 + combo_size.min(4)) as f32;
        let t = ctx.current_time();

        for i in 0..notes as usize {
            let freq = root * (1.0 + i as f32 * 0.25);
            let start = t + i as f64 * 0.05;
            let (osc, gain) = create_osc(ctx, freq, OscillatorType::Square)?;
            gain.gain().set_value_at_time(0.0, t).map_err(js_err)?;
            gain.gain().set_value_at_time(vol * 0.2, start).map_err(js_err)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.12)
                .map_err(js_err)?;
            osc.start_with_when(start).map_err(js_err)?;
            osc.stop_with_when(start + 0.15).map_err(js_err)?;
        }
        Ok(())
    }

    /// Game over - descending sad tone
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) -> Result<()> {
        let (osc, gain) = create_osc(ctx, 400.0, OscillatorType::Sawtooth)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).map_err(js_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 1.0)
            .map_err(js_err)?;
        osc.frequency().set_value_at_time(400.0, t).map_err(js_err)?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 1.0)
            .map_err(js_err)?;

        osc.start().map_err(js_err)?;
        osc.stop_with_when(t + 1.1).map_err(js_err)?;
        Ok(())
    }

    /// Reboot - quick power-up sweep
    fn play_reboot(&self, ctx: &AudioContext, vol: f32) -> Result<()> {
        let (osc, gain) = create_osc(ctx, 120.0, OscillatorType::Sine)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).map_err(js_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.45)
            .map_err(js_err)?;
        osc.frequency().set_value_at_time(120.0, t).map_err(js_err)?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.4)
            .map_err(js_err)?;

        osc.start().map_err(js_err)?;
        osc.stop_with_when(t + 0.5).map_err(js_err)?;
        Ok(())
    }
}

/// Create an oscillator routed through a gain node to the speakers
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Result<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().map_err(js_err)?;
    let gain = ctx.create_gain().map_err(js_err)?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).map_err(js_err)?;
    gain.connect_with_audio_node(&ctx.destination())
        .map_err(js_err)?;

    Ok((osc, gain))
}

fn js_err(e: wasm_bindgen::JsValue) -> Error {
    Error::AudioRejected(format!("{:?}", e))
}

impl AudioCue for AudioManager {
    fn on_key_matched(&mut self, group_size: usize) -> Result<()> {
        self.play(SoundEffect::KeyClick { group_size })
    }

    fn on_word_completed(&mut self, combo_size: usize) -> Result<()> {
        let variant = rand::random_range(0..COMPLETION_VARIANTS);
        self.play(SoundEffect::Completion {
            variant,
            combo_size,
        })
    }

    fn on_game_over(&mut self) -> Result<()> {
        self.stop_music();
        self.play(SoundEffect::GameOver)
    }

    fn on_reboot(&mut self) -> Result<()> {
        self.play(SoundEffect::Reboot)
    }

    fn on_first_input(&mut self) -> Result<()> {
        self.start_music()
    }
}

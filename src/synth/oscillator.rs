// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Oscillators turn a requested frequency into a stack of (possibly detuned) voices,
//! each with its own series of overtones.

use std::f64::consts::PI;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use log::trace;
use rand::Rng;

use crate::error::{Error, Result};
use crate::note::{freq_from_semitones, semitones_from_reference};
use crate::tone::{Decay, Sine, Tone};

/// Detune, in semitones, of the outermost voices at full `detune`.
pub const DETUNE_RANGE: f64 = 2.0;

/// Settings of an oscillator.
#[derive(Clone)]
pub struct OscillatorConfig {
    /// Pressure of the overtones of each voice.
    pub decay: Arc<dyn Decay + Send + Sync>,
    /// Number of voices, at least one.
    pub voices: usize,
    /// Between 0 and 1. At 1 the outermost voices are `DETUNE_RANGE` semitones off.
    pub detune: f64,
    /// Base phase of the voices in radians.
    pub phase: f64,
    /// Between 0 and 1. At 0 every voice gets `phase`, at 1 the phase is fully random.
    pub phase_random_range: f64,
    /// Pressure of the center voice(s).
    pub pressure: f64,
    /// Offset in semitones from the requested frequency.
    pub pitch: f64,
    /// Number of partials per voice including the fundamental, at least one.
    pub overtones: usize,
    /// Pressure of the outer voices relative to the center voice(s).
    pub blend: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        OscillatorConfig {
            decay: Arc::new(Sine),
            voices: 1,
            detune: 0.0,
            phase: PI,
            phase_random_range: 1.0,
            pressure: 1.0,
            pitch: 0.0,
            overtones: 1,
            blend: 1.0,
        }
    }
}

impl fmt::Debug for OscillatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OscillatorConfig")
            .field("voices", &self.voices)
            .field("detune", &self.detune)
            .field("phase", &self.phase)
            .field("phase_random_range", &self.phase_random_range)
            .field("pressure", &self.pressure)
            .field("pitch", &self.pitch)
            .field("overtones", &self.overtones)
            .field("blend", &self.blend)
            .finish()
    }
}

/// An oscillator with a validated configuration.
#[derive(Debug, Clone)]
pub struct Oscillator {
    config: OscillatorConfig,
}

impl Oscillator {
    pub fn new(config: OscillatorConfig) -> Result<Self> {
        if config.voices == 0 {
            return Err(Error::invalid_config("an oscillator needs at least one voice"));
        }
        if config.overtones == 0 {
            return Err(Error::invalid_config(
                "an oscillator needs at least one overtone",
            ));
        }
        if !(0.0..=1.0).contains(&config.detune) {
            return Err(Error::invalid_config(format!(
                "detune must be between 0 and 1, got {}",
                config.detune
            )));
        }
        if !(0.0..=1.0).contains(&config.phase_random_range) {
            return Err(Error::invalid_config(format!(
                "phase random range must be between 0 and 1, got {}",
                config.phase_random_range
            )));
        }
        let finite = [config.phase, config.pressure, config.pitch, config.blend];
        if finite.iter().any(|x| !x.is_finite()) {
            return Err(Error::invalid_config(format!(
                "oscillator parameters must be finite: {:?}",
                config
            )));
        }
        Ok(Oscillator { config })
    }

    /// A single-voiced sine oscillator with the default settings.
    pub fn sine() -> Self {
        Oscillator {
            config: OscillatorConfig::default(),
        }
    }

    pub fn config(&self) -> &OscillatorConfig {
        &self.config
    }

    /// Fundamental frequencies of the voices when `freq` is played, lowest first.
    pub fn voice_frequencies(&self, freq: f64) -> Vec<f64> {
        let c = &self.config;
        let base = semitones_from_reference(freq);
        if c.voices == 1 {
            return vec![freq_from_semitones(base + c.pitch)];
        }
        let spread = DETUNE_RANGE * c.detune;
        let step = 2.0 * spread / (c.voices - 1) as f64;
        (0..c.voices)
            .map(|i| {
                let offset = if i == c.voices - 1 {
                    spread
                } else {
                    -spread + i as f64 * step
                };
                freq_from_semitones(offset + base + c.pitch)
            })
            .collect()
    }

    /// All partials of all voices when `freq` is played.
    ///
    /// Voice phases are drawn from `rng`, uniformly from a window of width
    /// `phase_random_range · 2π` starting at `phase · (1 - phase_random_range)`.
    pub fn tones_for<R: Rng + ?Sized>(&self, freq: f64, rng: &mut R) -> Result<Vec<Tone>> {
        if !(freq > 0.0 && freq.is_finite()) {
            return Err(Error::invalid_config(format!(
                "frequency must be positive, got {}",
                freq
            )));
        }
        let c = &self.config;
        trace!("oscillator playing {} Hz with {} voices", freq, c.voices);

        let phase_low = c.phase * (1.0 - c.phase_random_range);
        let phase_width = c.phase_random_range * 2.0 * PI;
        let center = center_voices(c.voices);

        let mut tones = Vec::with_capacity(c.voices * c.overtones);
        for (i, voice_freq) in self.voice_frequencies(freq).into_iter().enumerate() {
            let phase = phase_low + rng.random::<f64>() * phase_width;
            let pressure = if center.contains(&i) {
                c.pressure
            } else {
                c.pressure * c.blend
            };
            let voice = Tone::new(voice_freq, pressure, phase);
            tones.extend(voice.overtones(&*c.decay, c.overtones));
        }
        Ok(tones)
    }
}

/// Indices of the middle voice, or of the two middle voices for an even count.
///
/// # Examples
///
/// ```
/// use dissonance_synth::synth::oscillator::center_voices;
///
/// assert_eq!(center_voices(1), 0..=0);
/// assert_eq!(center_voices(5), 2..=2);
/// assert_eq!(center_voices(4), 1..=2);
/// ```
pub fn center_voices(voices: usize) -> RangeInclusive<usize> {
    let half = voices / 2;
    if voices % 2 == 1 {
        half..=half
    } else {
        half.saturating_sub(1)..=half
    }
}

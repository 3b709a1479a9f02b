// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This namespace contains all the parts converting from notes to tones and tones to wave data.

pub mod oscillator;

pub use oscillator::{Oscillator, OscillatorConfig};

use std::str::FromStr;

use log::debug;
use rand::Rng;

use crate::error::{Error, Result};
use crate::note::{self, Key};
use crate::tone::Tone;

/// A note to be played, either by name or directly as a frequency.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteInput {
    Name(String),
    Frequency(f64),
}

impl NoteInput {
    /// Frequency in Hz in concert tuning.
    pub fn frequency(&self) -> Result<f64> {
        match self {
            NoteInput::Name(name) => note::frequency_of(name),
            NoteInput::Frequency(freq) => Ok(*freq),
        }
    }
}

impl From<&str> for NoteInput {
    fn from(name: &str) -> Self {
        NoteInput::Name(name.to_owned())
    }
}

impl From<String> for NoteInput {
    fn from(name: String) -> Self {
        NoteInput::Name(name)
    }
}

impl From<f64> for NoteInput {
    fn from(freq: f64) -> Self {
        NoteInput::Frequency(freq)
    }
}

/// Numbers are frequencies, everything else must be a valid note name.
///
/// # Examples
///
/// ```
/// use dissonance_synth::synth::NoteInput;
///
/// assert_eq!("261.5".parse::<NoteInput>(), Ok(NoteInput::Frequency(261.5)));
/// assert_eq!("C#4".parse::<NoteInput>(), Ok(NoteInput::Name("C#4".to_string())));
/// assert!("Hb2".parse::<NoteInput>().is_err());
/// ```
impl FromStr for NoteInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(freq) = s.parse::<f64>() {
            return Ok(NoteInput::Frequency(freq));
        }
        Key::parse(s)?;
        Ok(NoteInput::Name(s.to_owned()))
    }
}

/// A synthesizer stacking the output of several oscillators.
#[derive(Debug, Clone, Default)]
pub struct Synth {
    oscillators: Vec<Oscillator>,
}

impl Synth {
    pub fn new(oscillators: Vec<Oscillator>) -> Self {
        Synth { oscillators }
    }

    pub fn oscillators(&self) -> &[Oscillator] {
        &self.oscillators
    }

    /// The tones produced when all `notes` are played at once.
    ///
    /// For every note in turn, the tones of every oscillator are appended.
    pub fn tones_for_notes<R: Rng + ?Sized>(
        &self,
        notes: &[NoteInput],
        rng: &mut R,
    ) -> Result<Vec<Tone>> {
        let mut tones = Vec::new();
        for note in notes {
            let freq = note.frequency()?;
            for osc in &self.oscillators {
                tones.extend(osc.tones_for(freq, rng)?);
            }
        }
        Ok(tones)
    }

    /// Sample the sum of `tones`, see [`render`].
    pub fn render(&self, tones: &[Tone], sample_rate: u32, duration: f64) -> Result<Vec<f64>> {
        render(tones, sample_rate, duration)
    }

    /// Sample the sound of `notes` played at once.
    pub fn render_notes<R: Rng + ?Sized>(
        &self,
        notes: &[NoteInput],
        sample_rate: u32,
        duration: f64,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        let tones = self.tones_for_notes(notes, rng)?;
        render(&tones, sample_rate, duration)
    }
}

/// Sample the sum of all `tones` at `sample_rate` for `duration` seconds.
///
/// Sample `k` is taken at `k / sample_rate` seconds, each tone contributing
/// `pressure · √2 · sin(2π · frequency · t + phase)`.
pub fn render(tones: &[Tone], sample_rate: u32, duration: f64) -> Result<Vec<f64>> {
    if sample_rate == 0 {
        return Err(Error::invalid_config("sample rate must be positive"));
    }
    if !(duration >= 0.0 && duration.is_finite()) {
        return Err(Error::invalid_config(format!(
            "duration must be a non-negative number of seconds, got {}",
            duration
        )));
    }

    let rate = sample_rate as f64;
    let count = (rate * duration).round() as usize;
    debug!(
        "rendering {} tones into {} samples at {} Hz",
        tones.len(),
        count,
        sample_rate
    );
    Ok((0..count)
        .map(|k| {
            let t = k as f64 / rate;
            tones.iter().map(|tone| tone.sample(t)).sum()
        })
        .collect())
}

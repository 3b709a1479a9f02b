// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Pure tones, the sinusoidal components every sound is built from.

use std::f64::consts::PI;

use crate::error::Result;
use crate::note;

/// Reference sound pressure of 0 dB SPL, in Pa.
pub const REFERENCE_PRESSURE: f64 = 2e-5;

/// Sound pressure level in dB of an RMS pressure in Pa.
///
/// # Examples
///
/// ```
/// use dissonance_synth::tone::pressure_level_db;
///
/// assert!((pressure_level_db(0.02) - 60.0).abs() < 1e-9);
/// ```
pub fn pressure_level_db(pressure: f64) -> f64 {
    20.0 * (pressure / REFERENCE_PRESSURE).log10()
}

/// A single sine component of a sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz.
    pub frequency: f64,
    /// RMS sound pressure in Pa. May be signed.
    pub pressure: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl Tone {
    pub fn new(frequency: f64, pressure: f64, phase: f64) -> Self {
        Tone {
            frequency,
            pressure,
            phase,
        }
    }

    /// A zero-phase tone at the frequency of a named note, e.g. `"C#4"`.
    pub fn from_name(name: &str, pressure: f64) -> Result<Self> {
        Ok(Tone::new(note::frequency_of(name)?, pressure, 0.0))
    }

    /// Sound pressure level in dB.
    pub fn pressure_level_db(&self) -> f64 {
        pressure_level_db(self.pressure)
    }

    /// The first `n` partials of this tone, shaped by `decay`.
    ///
    /// The `i`-th partial (counting from 1, which is this tone itself) has `i` times the
    /// frequency, the pressure `decay` assigns to index `i`, and the same phase.
    ///
    /// # Examples
    ///
    /// ```
    /// use dissonance_synth::tone::*;
    ///
    /// let partials = Tone::new(100.0, 1.0, 0.5).overtones(&Sawtooth, 3);
    /// assert_eq!(partials, vec![
    ///     Tone::new(100.0, 1.0, 0.5),
    ///     Tone::new(200.0, 0.5, 0.5),
    ///     Tone::new(300.0, 1.0 / 3.0, 0.5),
    /// ]);
    /// ```
    pub fn overtones<D: Decay + ?Sized>(&self, decay: &D, n: usize) -> Vec<Tone> {
        (1..=n)
            .map(|i| {
                Tone::new(
                    self.frequency * i as f64,
                    decay.pressure(self.pressure, i),
                    self.phase,
                )
            })
            .collect()
    }

    /// Instantaneous amplitude of the tone at `t` seconds.
    pub fn sample(&self, t: f64) -> f64 {
        self.pressure * 2f64.sqrt() * (2.0 * PI * self.frequency * t + self.phase).sin()
    }
}

/// Determines the pressure of the partials of a tone.
///
/// Any `Fn(f64, usize) -> f64` taking the pressure of the fundamental and the
/// 1-based partial index is a decay.
pub trait Decay {
    fn pressure(&self, base: f64, index: usize) -> f64;
}

impl<F: Fn(f64, usize) -> f64> Decay for F {
    fn pressure(&self, base: f64, index: usize) -> f64 {
        self(base, index)
    }
}

/// Only the fundamental, all overtones are silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sine;

impl Decay for Sine {
    fn pressure(&self, base: f64, index: usize) -> f64 {
        if index == 1 {
            base
        } else {
            0.0
        }
    }
}

/// All harmonics, falling off with `1/i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sawtooth;

impl Decay for Sawtooth {
    fn pressure(&self, base: f64, index: usize) -> f64 {
        base / index as f64
    }
}

/// Odd harmonics only, falling off with `1/i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl Decay for Square {
    fn pressure(&self, base: f64, index: usize) -> f64 {
        if index % 2 == 1 {
            base / index as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sine_has_no_overtones() {
        let partials = Tone::new(220.0, 0.3, 1.0).overtones(&Sine, 4);
        assert_eq!(partials.len(), 4);
        assert_eq!(partials[0], Tone::new(220.0, 0.3, 1.0));
        for (i, p) in partials.iter().enumerate().skip(1) {
            assert_eq!(p.frequency, 220.0 * (i + 1) as f64);
            assert_eq!(p.pressure, 0.0);
            assert_eq!(p.phase, 1.0);
        }
    }

    #[test]
    fn square_skips_even_harmonics() {
        let pressures: Vec<f64> = Tone::new(100.0, 1.0, 0.0)
            .overtones(&Square, 5)
            .iter()
            .map(|t| t.pressure)
            .collect();
        assert_eq!(pressures, vec![1.0, 0.0, 1.0 / 3.0, 0.0, 0.2]);
    }

    #[test]
    fn closure_decay() {
        let halving = |p: f64, i: usize| p / 2f64.powi(i as i32 - 1);
        let partials = Tone::new(50.0, 8.0, 0.0).overtones(&halving, 4);
        let pressures: Vec<f64> = partials.iter().map(|t| t.pressure).collect();
        assert_eq!(pressures, vec![8.0, 4.0, 2.0, 1.0]);
        assert!(Tone::new(50.0, 8.0, 0.0).overtones(&halving, 0).is_empty());
    }

    #[test]
    fn named() {
        let tone = Tone::from_name("A4", 0.02).unwrap();
        assert_eq!(tone, Tone::new(440.0, 0.02, 0.0));
        assert!((tone.pressure_level_db() - 60.0).abs() < 1e-9);
        assert!(Tone::from_name("Q4", 0.02).is_err());
    }

    #[test]
    fn sampling() {
        let tone = Tone::new(1.0, 1.0, 0.0);
        assert!(tone.sample(0.0).abs() < 1e-12);
        assert!((tone.sample(0.25) - 2f64.sqrt()).abs() < 1e-12);
    }
}

// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Sensory dissonance of a set of simultaneously sounding pure tones.
//!
//! Every pair of tones contributes according to how close the two frequencies are relative to
//! the critical bandwidth between them (Sethares' parametrization of the Plomp-Levelt curve),
//! weighted by the perceived loudness of both tones (Dillon, 2013).

use crate::critical_band::critical_bandwidth;
use crate::error::{Error, Result};
use crate::loudness::ReferenceCurve;
use crate::tone::{pressure_level_db, Tone};

/// Frequency distance, in critical bandwidths, from which on two tones no longer interact.
pub const INTERACTION_LIMIT: f64 = 1.2;

/// Unscaled dissonance of two pure tones of equal amplitude.
///
/// # Examples
///
/// ```
/// use dissonance_synth::dissonance::dissonance_amplitude;
///
/// assert_eq!(dissonance_amplitude(440.0, 440.0), 0.0);
/// assert!(dissonance_amplitude(440.0, 466.16) > 0.9);
/// assert_eq!(dissonance_amplitude(440.0, 880.0), 0.0);
/// ```
pub fn dissonance_amplitude(f1: f64, f2: f64) -> f64 {
    if f1 == f2 {
        return 0.0;
    }
    let x = (f1 - f2).abs() / critical_bandwidth((f1 + f2) / 2.0);
    if x >= INTERACTION_LIMIT {
        return 0.0;
    }
    4.906 * x * (INTERACTION_LIMIT - x).powi(4)
}

/// Aggregates pairwise dissonance, using a reference curve for the loudness of each tone.
#[derive(Debug, Clone, Copy)]
pub struct Dissonance<'c> {
    curve: &'c ReferenceCurve,
}

impl<'c> Dissonance<'c> {
    pub fn new(curve: &'c ReferenceCurve) -> Self {
        Dissonance { curve }
    }

    pub fn curve(&self) -> &'c ReferenceCurve {
        self.curve
    }

    /// Total dissonance of tones given as parallel slices of frequencies (Hz) and pressures (Pa).
    ///
    /// The sign of a pressure is ignored. Fewer than two tones have no dissonance.
    /// The first tone outside the range of the reference curve aborts the whole computation,
    /// as does a length mismatch or a zero pressure.
    ///
    /// Tones below the threshold of hearing have a negative loudness level. If that drives
    /// the accumulated sum below zero there is no sixth root, and the computation fails.
    pub fn total(&self, frequencies: &[f64], pressures: &[f64]) -> Result<f64> {
        if frequencies.len() != pressures.len() {
            return Err(Error::invalid_config(format!(
                "got {} frequencies but {} pressures",
                frequencies.len(),
                pressures.len()
            )));
        }

        let loudness = frequencies
            .iter()
            .zip(pressures)
            .map(|(&freq, &pressure)| {
                let magnitude = pressure.abs();
                if !(magnitude > 0.0 && magnitude.is_finite()) {
                    return Err(Error::invalid_config(format!(
                        "pressure of the {:.2} Hz tone must be non-zero and finite, got {}",
                        freq, pressure
                    )));
                }
                self.curve.loudness_phons(freq, pressure_level_db(magnitude))
            })
            .collect::<Result<Vec<f64>>>()?;

        let mut total = 0.0;
        for i in 0..frequencies.len() {
            for j in i + 1..frequencies.len() {
                let amplitude = dissonance_amplitude(frequencies[i], frequencies[j]);
                total += (loudness[i] * loudness[j]).powi(3) * amplitude.powi(6);
            }
        }
        if !(total >= 0.0 && total.is_finite()) {
            return Err(Error::invalid_config(format!(
                "accumulated dissonance {} has no sixth root, \
                 some tones are below the threshold of hearing",
                total
            )));
        }
        Ok(total.powf(1.0 / 6.0))
    }

    /// Total dissonance of a set of tones, e.g. as produced by a synthesizer.
    pub fn of_tones(&self, tones: &[Tone]) -> Result<f64> {
        let frequencies: Vec<f64> = tones.iter().map(|t| t.frequency).collect();
        let pressures: Vec<f64> = tones.iter().map(|t| t.pressure).collect();
        self.total(&frequencies, &pressures)
    }
}

impl Default for Dissonance<'static> {
    fn default() -> Self {
        Dissonance::new(ReferenceCurve::iso226())
    }
}

/// Total dissonance using the ISO 226:2003 loudness curve.
///
/// # Examples
///
/// ```
/// use dissonance_synth::dissonance::total_dissonance;
///
/// // two tones a semitone apart at 60 dB SPL
/// let d = total_dissonance(&[440.0, 466.16], &[0.02, 0.02]).unwrap();
/// assert!((d - 57.05).abs() < 0.01);
/// ```
pub fn total_dissonance(frequencies: &[f64], pressures: &[f64]) -> Result<f64> {
    Dissonance::default().total(frequencies, pressures)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loudness::CurvePoint;

    /// Pressure in Pa of a 60 dB SPL tone.
    const P60: f64 = 0.02;

    #[test]
    fn kernel_identity_and_symmetry() {
        let freqs = [20.0, 100.0, 261.6, 440.0, 466.16, 1000.0, 1010.0, 5000.0, 12500.0];
        for &f1 in freqs.iter() {
            assert_eq!(dissonance_amplitude(f1, f1), 0.0);
            for &f2 in freqs.iter() {
                assert_eq!(dissonance_amplitude(f1, f2), dissonance_amplitude(f2, f1));
                assert!(dissonance_amplitude(f1, f2) >= 0.0);
            }
        }
    }

    #[test]
    fn kernel_cutoff() {
        for i in 0..2000 {
            let f1 = 500.0;
            let f2 = 500.0 + i as f64 * 0.25;
            let x = (f1 - f2).abs() / critical_bandwidth((f1 + f2) / 2.0);
            let g = dissonance_amplitude(f1, f2);
            if x >= INTERACTION_LIMIT {
                assert_eq!(g, 0.0, "{} and {} are {} bandwidths apart", f1, f2, x);
            } else if x > 0.0 {
                assert!(g > 0.0);
            }
        }
    }

    #[test]
    fn kernel_value() {
        assert!((dissonance_amplitude(440.0, 466.16) - 0.998867).abs() < 1e-6);
    }

    #[test]
    fn fewer_than_two_tones() {
        assert_eq!(total_dissonance(&[], &[]), Ok(0.0));
        assert_eq!(total_dissonance(&[440.0], &[P60]), Ok(0.0));
    }

    #[test]
    fn semitone_beats_octave() {
        let semitone = total_dissonance(&[440.0, 466.16], &[P60, P60]).unwrap();
        let octave = total_dissonance(&[440.0, 880.0], &[P60, P60]).unwrap();
        assert!(semitone > 0.0);
        assert!(semitone > octave);
        assert_eq!(octave, 0.0);
    }

    #[test]
    fn order_and_sign_independent() {
        let a = total_dissonance(&[440.0, 466.16, 500.0], &[P60, -0.01, 0.05]).unwrap();
        let b = total_dissonance(&[500.0, 440.0, 466.16], &[0.05, P60, 0.01]).unwrap();
        assert!((a - 62.2573).abs() < 1e-3);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn duplicate_frequencies() {
        let single = total_dissonance(&[440.0, 466.16], &[P60, P60]).unwrap();
        let doubled = total_dissonance(&[440.0, 440.0, 466.16], &[P60, P60, P60]).unwrap();
        assert!(doubled > single);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            total_dissonance(&[440.0, 466.16], &[P60]),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            total_dissonance(&[440.0, 466.16], &[P60, 0.0]),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert_eq!(
            total_dissonance(&[440.0, 466.16, 15000.0], &[P60, P60, P60]),
            Err(Error::FrequencyOutOfRange {
                frequency: 15000.0,
                min: 20.0,
                max: 12500.0
            })
        );
    }

    #[test]
    fn inaudible_tone() {
        let quiet = crate::tone::pressure_level_db(1e-7);
        assert!(crate::loudness::loudness_phons(1000.0, quiet).unwrap() < 0.0);
        assert!(matches!(
            total_dissonance(&[1000.0, 1010.0], &[1e-7, P60]),
            Err(Error::InvalidConfiguration { .. })
        ));
        // Out of each other's range, the quiet tone adds nothing.
        assert_eq!(total_dissonance(&[1000.0, 3000.0], &[1e-7, P60]), Ok(0.0));
    }

    #[test]
    fn custom_curve() {
        let flat = |frequency| CurvePoint {
            frequency,
            alpha: 0.25,
            level_offset: 0.0,
            threshold: 2.4,
        };
        let curve = ReferenceCurve::new(vec![flat(100.0), flat(2000.0)]).unwrap();
        let d = Dissonance::new(&curve);
        let semitone = d.total(&[440.0, 466.16], &[P60, P60]).unwrap();
        assert!(semitone > 0.0);
        // the flat curve hears 440 Hz louder than ISO 226 does
        assert!(semitone > total_dissonance(&[440.0, 466.16], &[P60, P60]).unwrap());
        assert_eq!(
            d.total(&[440.0, 2500.0], &[P60, P60]),
            Err(Error::FrequencyOutOfRange {
                frequency: 2500.0,
                min: 100.0,
                max: 2000.0
            })
        );
    }

    #[test]
    fn tones() {
        let tones = [Tone::new(440.0, P60, 0.0), Tone::new(466.16, -P60, 1.0)];
        assert_eq!(
            Dissonance::default().of_tones(&tones),
            total_dissonance(&[440.0, 466.16], &[P60, P60])
        );
    }
}

// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Equal-loudness contours: how loud a pure tone at a given sound pressure level is perceived.
//!
//! The model is the inversion of the ISO 226:2003 contours. It is driven by a reference curve
//! that assigns to each tabulated frequency the exponent α_f, the magnitude of the linear
//! transfer function L_U and the hearing threshold T_f. Values in between are interpolated.

use std::sync::OnceLock;

use log::debug;

use crate::error::{Error, Result};

/// One row of a reference curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Exponent for loudness perception (α_f).
    pub alpha: f64,
    /// Magnitude of the linear transfer function normalized at 1 kHz, in dB (L_U).
    pub level_offset: f64,
    /// Threshold of hearing in dB (T_f).
    pub threshold: f64,
}

/// Parameters of the equal-loudness model at one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessParameters {
    pub alpha: f64,
    pub level_offset: f64,
    pub threshold: f64,
}

/// Tabulated model parameters, strictly increasing in frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCurve {
    points: Vec<CurvePoint>,
}

// (f, α_f, L_U, T_f) from ISO 226:2003, table 1.
const ISO_226: [(f64, f64, f64, f64); 29] = [
    (20.0, 0.532, -31.6, 78.5),
    (25.0, 0.506, -27.2, 68.7),
    (31.5, 0.480, -23.0, 59.5),
    (40.0, 0.455, -19.1, 51.1),
    (50.0, 0.432, -15.9, 44.0),
    (63.0, 0.409, -13.0, 37.5),
    (80.0, 0.387, -10.3, 31.5),
    (100.0, 0.367, -8.1, 26.5),
    (125.0, 0.349, -6.2, 22.1),
    (160.0, 0.330, -4.5, 17.9),
    (200.0, 0.315, -3.1, 14.4),
    (250.0, 0.301, -2.0, 11.4),
    (315.0, 0.288, -1.1, 8.6),
    (400.0, 0.276, -0.4, 6.2),
    (500.0, 0.267, 0.0, 4.4),
    (630.0, 0.259, 0.3, 3.0),
    (800.0, 0.253, 0.5, 2.2),
    (1000.0, 0.250, 0.0, 2.4),
    (1250.0, 0.246, -2.7, 3.5),
    (1600.0, 0.244, -4.1, 1.7),
    (2000.0, 0.243, -1.0, -1.3),
    (2500.0, 0.243, 1.7, -4.2),
    (3150.0, 0.243, 2.5, -6.0),
    (4000.0, 0.242, 1.2, -5.4),
    (5000.0, 0.242, -2.1, -1.5),
    (6300.0, 0.245, -7.1, 6.0),
    (8000.0, 0.254, -11.2, 12.6),
    (10000.0, 0.271, -10.7, 13.9),
    (12500.0, 0.301, -3.1, 12.3),
];

impl ReferenceCurve {
    /// Build a curve from its points.
    ///
    /// There must be at least two points, all values finite, and frequencies strictly increasing.
    pub fn new(points: Vec<CurvePoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::invalid_config(
                "reference curve needs at least two points",
            ));
        }
        for p in &points {
            let finite = p.frequency.is_finite()
                && p.alpha.is_finite()
                && p.level_offset.is_finite()
                && p.threshold.is_finite();
            if !finite {
                return Err(Error::invalid_config(format!(
                    "reference curve point {:?} is not finite",
                    p
                )));
            }
        }
        if let Some(w) = points.windows(2).find(|w| w[0].frequency >= w[1].frequency) {
            return Err(Error::invalid_config(format!(
                "reference curve frequencies must be strictly increasing, but {} is followed by {}",
                w[0].frequency, w[1].frequency
            )));
        }
        Ok(ReferenceCurve { points })
    }

    /// The ISO 226:2003 curve, covering 20 Hz to 12.5 kHz.
    ///
    /// Built once and shared for the lifetime of the process.
    pub fn iso226() -> &'static ReferenceCurve {
        static CURVE: OnceLock<ReferenceCurve> = OnceLock::new();
        CURVE.get_or_init(|| ReferenceCurve {
            points: ISO_226
                .iter()
                .map(|&(frequency, alpha, level_offset, threshold)| CurvePoint {
                    frequency,
                    alpha,
                    level_offset,
                    threshold,
                })
                .collect(),
        })
    }

    /// Parse a curve from comma separated text.
    ///
    /// The first non-empty line is a header naming the columns `f`, `af`, `Lu` and `Tf`
    /// (in any order, other columns are ignored). Every following non-empty line is one point.
    ///
    /// # Examples
    ///
    /// ```
    /// use dissonance_synth::loudness::ReferenceCurve;
    ///
    /// let curve = ReferenceCurve::parse_csv("f,af,Lu,Tf\n500,0.267,0.0,4.4\n1000,0.25,0.0,2.4\n").unwrap();
    /// assert_eq!(curve.min_frequency(), 500.0);
    /// assert_eq!(curve.max_frequency(), 1000.0);
    /// ```
    pub fn parse_csv(input: &str) -> Result<Self> {
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| Error::invalid_config("reference curve is empty"))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let column = |name: &str| {
            columns.iter().position(|c| *c == name).ok_or_else(|| {
                Error::invalid_config(format!("reference curve has no column {:?}", name))
            })
        };
        let f_col = column("f")?;
        let af_col = column("af")?;
        let lu_col = column("Lu")?;
        let tf_col = column("Tf")?;

        let mut points = Vec::new();
        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let field = |col: usize| -> Result<f64> {
                fields
                    .get(col)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        Error::invalid_config(format!(
                            "line {}: expected a number in column {} of {:?}",
                            line_no,
                            col + 1,
                            line
                        ))
                    })
            };
            points.push(CurvePoint {
                frequency: field(f_col)?,
                alpha: field(af_col)?,
                level_offset: field(lu_col)?,
                threshold: field(tf_col)?,
            });
        }

        let curve = Self::new(points)?;
        debug!(
            "parsed reference curve with {} points covering [{}, {}] Hz",
            curve.points.len(),
            curve.min_frequency(),
            curve.max_frequency()
        );
        Ok(curve)
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn min_frequency(&self) -> f64 {
        self.points[0].frequency
    }

    pub fn max_frequency(&self) -> f64 {
        self.points[self.points.len() - 1].frequency
    }

    /// Linearly interpolate the model parameters at `freq`.
    ///
    /// Fails if `freq` lies outside the tabulated range. Both bounds are inclusive.
    pub fn parameters_at(&self, freq: f64) -> Result<LoudnessParameters> {
        let (min, max) = (self.min_frequency(), self.max_frequency());
        if !(freq >= min && freq <= max) {
            return Err(Error::FrequencyOutOfRange {
                frequency: freq,
                min,
                max,
            });
        }

        // First point at or above `freq`, never the very first one so that the
        // lower bound itself falls into the first interval.
        let upper = 1 + self.points[1..]
            .iter()
            .position(|p| p.frequency >= freq)
            .unwrap_or(self.points.len() - 2);
        let lo = &self.points[upper - 1];
        let hi = &self.points[upper];

        let t = (freq - lo.frequency) / (hi.frequency - lo.frequency);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Ok(LoudnessParameters {
            alpha: lerp(lo.alpha, hi.alpha),
            level_offset: lerp(lo.level_offset, hi.level_offset),
            threshold: lerp(lo.threshold, hi.threshold),
        })
    }

    /// Loudness level in phon of a pure tone at `freq` Hz and `pressure_level` dB SPL.
    ///
    /// # Examples
    ///
    /// ```
    /// use dissonance_synth::loudness::ReferenceCurve;
    ///
    /// let phons = ReferenceCurve::iso226().loudness_phons(1000.0, 60.0).unwrap();
    /// assert!((phons - 60.0).abs() < 0.1);
    /// ```
    pub fn loudness_phons(&self, freq: f64, pressure_level: f64) -> Result<f64> {
        let LoudnessParameters {
            alpha,
            level_offset,
            threshold,
        } = self.parameters_at(freq)?;

        let excitation =
            |level: f64| (0.4 * 10f64.powf((level + level_offset) / 10.0 - 9.0)).powf(alpha);
        let b = excitation(pressure_level) - excitation(threshold) + 0.005135;
        if !(b > 0.0) {
            return Err(Error::invalid_config(format!(
                "no loudness level for {:.2} Hz at {:.2} dB: B_f = {} is not positive",
                freq, pressure_level, b
            )));
        }
        Ok(40.0 * b.log10() + 94.0)
    }
}

/// Loudness level in phon according to the ISO 226:2003 curve.
pub fn loudness_phons(freq: f64, pressure_level: f64) -> Result<f64> {
    ReferenceCurve::iso226().loudness_phons(freq, pressure_level)
}

#[cfg(test)]
mod test {
    use super::*;

    fn point(frequency: f64) -> CurvePoint {
        CurvePoint {
            frequency,
            alpha: 0.25,
            level_offset: 0.0,
            threshold: 2.4,
        }
    }

    #[test]
    fn iso_table() {
        let curve = ReferenceCurve::iso226();
        assert_eq!(curve.points().len(), 29);
        assert_eq!(curve.min_frequency(), 20.0);
        assert_eq!(curve.max_frequency(), 12500.0);
        assert!(ReferenceCurve::new(curve.points().to_vec()).is_ok());
    }

    #[test]
    fn reference_values() {
        // Computed from the ISO 226 formulas directly.
        let cases = [
            (1000.0, 60.0, 60.0206),
            (20.0, 60.0, -11.3007),
            (12500.0, 60.0, 49.8770),
            (440.0, 60.0, 56.9080),
        ];
        for &(freq, level, expected) in cases.iter() {
            let phons = loudness_phons(freq, level).unwrap();
            assert!(
                (phons - expected).abs() < 1e-3,
                "{} Hz at {} dB: expected {}, got {}",
                freq,
                level,
                expected,
                phons
            );
        }
    }

    #[test]
    fn interpolation() {
        let curve = ReferenceCurve::iso226();
        let at = curve.parameters_at(1000.0).unwrap();
        assert!((at.alpha - 0.25).abs() < 1e-12);
        assert!(at.level_offset.abs() < 1e-12);
        assert!((at.threshold - 2.4).abs() < 1e-12);
        let mid = curve.parameters_at(1125.0).unwrap();
        assert!((mid.alpha - 0.248).abs() < 1e-12);
        assert!((mid.level_offset + 1.35).abs() < 1e-12);
        assert!((mid.threshold - 2.95).abs() < 1e-12);
    }

    #[test]
    fn bounds() {
        let curve = ReferenceCurve::iso226();
        assert!(curve.loudness_phons(20.0, 40.0).is_ok());
        assert!(curve.loudness_phons(12500.0, 40.0).is_ok());
        for &freq in &[19.999, 12500.001, 0.0, -5.0, std::f64::NAN] {
            match curve.loudness_phons(freq, 40.0) {
                Err(Error::FrequencyOutOfRange { min, max, .. }) => {
                    assert_eq!((min, max), (20.0, 12500.0));
                }
                other => panic!("{} Hz should be out of range, got {:?}", freq, other),
            }
        }
    }

    #[test]
    fn two_point_curve() {
        let curve = ReferenceCurve::new(vec![point(100.0), point(200.0)]).unwrap();
        assert!(curve.parameters_at(100.0).is_ok());
        assert!(curve.parameters_at(150.0).is_ok());
        assert!(curve.parameters_at(200.0).is_ok());
    }

    #[test]
    fn non_positive_excitation() {
        let loud_threshold = CurvePoint {
            frequency: 100.0,
            alpha: 0.3,
            level_offset: 0.0,
            threshold: 80.0,
        };
        let curve = ReferenceCurve::new(vec![
            loud_threshold,
            CurvePoint {
                frequency: 200.0,
                ..loud_threshold
            },
        ])
        .unwrap();
        assert!(matches!(
            curve.loudness_phons(150.0, 20.0),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(curve.loudness_phons(150.0, 100.0).unwrap().is_finite());
    }

    #[test]
    fn invalid_curves() {
        assert!(ReferenceCurve::new(vec![]).is_err());
        assert!(ReferenceCurve::new(vec![point(100.0)]).is_err());
        assert!(ReferenceCurve::new(vec![point(200.0), point(100.0)]).is_err());
        assert!(ReferenceCurve::new(vec![point(100.0), point(100.0)]).is_err());
        assert!(ReferenceCurve::new(vec![point(100.0), point(std::f64::INFINITY)]).is_err());
    }

    #[test]
    fn csv() {
        let text = "
            Tf, f, af, Lu
            4.4, 500, 0.267, 0.0

            2.4, 1000, 0.250, 0.0
            3.5, 1250, 0.246, -2.7
        ";
        let curve = ReferenceCurve::parse_csv(text).unwrap();
        assert_eq!(curve.points().len(), 3);
        assert_eq!(
            curve.points()[1],
            CurvePoint {
                frequency: 1000.0,
                alpha: 0.25,
                level_offset: 0.0,
                threshold: 2.4
            }
        );
        let parsed = curve.loudness_phons(1000.0, 60.0).unwrap();
        let builtin = loudness_phons(1000.0, 60.0).unwrap();
        assert!((parsed - builtin).abs() < 1e-9);

        assert!(ReferenceCurve::parse_csv("").is_err());
        assert!(ReferenceCurve::parse_csv("f,af,Lu\n1,2,3\n4,5,6").is_err());
        assert!(ReferenceCurve::parse_csv("f,af,Lu,Tf\n1,2,3,x\n4,5,6,7").is_err());
    }
}

// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The errors shared by all parts of the dissonance pipeline and the synthesizer.

use snafu::Snafu;

/// Everything that can go wrong when turning notes into tones or tones into a dissonance score.
///
/// All of these indicate bad input from the caller. Nothing is retried or clamped.
#[derive(Debug, PartialEq, Snafu)]
pub enum Error {
    #[snafu(display("Unknown note: {:?}", name))]
    InvalidNote { name: String },
    #[snafu(display(
        "Frequency {:.2} not in bound. Has to be in [{:.2}, {:.2}]",
        frequency,
        min,
        max
    ))]
    FrequencyOutOfRange { frequency: f64, min: f64, max: f64 },
    #[snafu(display("Invalid configuration: {}", reason))]
    InvalidConfiguration { reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_config<S: Into<String>>(reason: S) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

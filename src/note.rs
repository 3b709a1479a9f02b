// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is, and how note names map to frequencies.

use crate::error::{Error, Result};

/// The twelve pitch classes of the chromatic scale, spelled with sharps only.
///
/// They are listed starting at A, which is how keys are counted on a piano keyboard.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PitchClass {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
    ];

    /// Position of the pitch class counted from A.
    pub fn index(self) -> i32 {
        match self {
            PitchClass::A => 0,
            PitchClass::ASharp => 1,
            PitchClass::B => 2,
            PitchClass::C => 3,
            PitchClass::CSharp => 4,
            PitchClass::D => 5,
            PitchClass::DSharp => 6,
            PitchClass::E => 7,
            PitchClass::F => 8,
            PitchClass::FSharp => 9,
            PitchClass::G => 10,
            PitchClass::GSharp => 11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
        }
    }

    /// Look up a pitch class by its exact name, e.g. `"C#"`. Flats are not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use dissonance_synth::note::*;
    ///
    /// assert_eq!(PitchClass::from_name("C#"), Some(PitchClass::CSharp));
    /// assert_eq!(PitchClass::from_name("Db"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<PitchClass> {
        PitchClass::ALL.iter().copied().find(|pc| pc.name() == name)
    }
}

/// A key on an (arbitrarily extended) piano keyboard, where A4 is key 49 and C4 is key 40.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Key(i32);

impl Key {
    /// The key of a pitch class in the given octave.
    ///
    /// Octaves roll over at C, so A, A♯ and B sit at the top of their octave.
    ///
    /// # Examples
    ///
    /// ```
    /// use dissonance_synth::note::*;
    ///
    /// assert_eq!(Key::named(PitchClass::A, 4), Key::from_index(49));
    /// assert_eq!(Key::named(PitchClass::C, 4), Key::from_index(40));
    /// assert_eq!(Key::named(PitchClass::B, 3), Key::from_index(39));
    /// ```
    pub fn named(pitch: PitchClass, octave: i32) -> Key {
        let index = pitch.index();
        let rollover = if index < 3 { 12 } else { 0 };
        Key(index + rollover + (octave - 1) * 12 + 1)
    }

    /// Parse a note name of the form `<pitch class><octave>`, e.g. `"A4"` or `"F#2"`.
    ///
    /// The pitch class is everything but the last character. For three character names
    /// the octave is the last character, otherwise it is everything after the first one.
    /// In practice this means only single digit octaves are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use dissonance_synth::note::*;
    ///
    /// assert_eq!(Key::parse("A4"), Ok(Key::from_index(49)));
    /// assert_eq!(Key::parse("A#4"), Ok(Key::from_index(50)));
    /// assert!(Key::parse("Bb4").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Key> {
        let invalid = || Error::InvalidNote {
            name: name.to_owned(),
        };
        let chars: Vec<char> = name.chars().collect();
        if chars.len() < 2 {
            return Err(invalid());
        }

        let pitch_str: String = chars[..chars.len() - 1].iter().collect();
        let pitch = PitchClass::from_name(&pitch_str).ok_or_else(invalid)?;

        let octave_str: String = if chars.len() == 3 {
            chars[2..].iter().collect()
        } else {
            chars[1..].iter().collect()
        };
        let octave = octave_str.parse().map_err(|_| invalid())?;
        Ok(Key::named(pitch, octave))
    }

    pub fn from_index(index: i32) -> Key {
        Key(index)
    }

    pub fn index(self) -> i32 {
        self.0
    }
}

/// Defines the tuning of an instrument by assigning a frequency to a certain key.
/// This defines the frequencies of all other keys at a standard tuning of 12 half-tones per octave.
///
/// # Examples
///
/// ```
/// use dissonance_synth::note::*;
/// assert_eq!(Tuning::default().frequency(Key::from_index(37)), 220.0);
/// assert_eq!(Tuning::default().frequency(Key::from_index(61)), 880.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub reference_key: Key,
    pub reference_frequency: f64,
}

impl Tuning {
    /// Return the frequency of a key relative to this tuning.
    pub fn frequency(&self, key: Key) -> f64 {
        let semitones = key.index() - self.reference_key.index();
        let octaves = semitones as f64 / 12.0;
        self.reference_frequency * 2.0f64.powf(octaves)
    }

    /// Return the frequency of a named note relative to this tuning.
    pub fn frequency_of(&self, name: &str) -> Result<f64> {
        Ok(self.frequency(Key::parse(name)?))
    }
}

/// Default concert tuning, where A4 corresponds to 440 Hz.
impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            reference_key: Key::named(PitchClass::A, 4),
            reference_frequency: 440.0,
        }
    }
}

/// Frequency in Hz of a named note in concert tuning.
///
/// # Examples
///
/// ```
/// use dissonance_synth::note::frequency_of;
///
/// assert_eq!(frequency_of("A4"), Ok(440.0));
/// assert!((frequency_of("C4").unwrap() - 261.626).abs() < 1e-3);
/// ```
pub fn frequency_of(name: &str) -> Result<f64> {
    Tuning::default().frequency_of(name)
}

/// Frequency of C0, the origin of the semitone coordinates below.
pub fn reference_frequency() -> f64 {
    Tuning::default().frequency(Key::named(PitchClass::C, 0))
}

/// Convert a frequency in Hz to (fractional) semitones above C0.
pub fn semitones_from_reference(freq: f64) -> f64 {
    12.0 * (freq / reference_frequency()).log2()
}

/// Convert (fractional) semitones above C0 back to a frequency in Hz.
pub fn freq_from_semitones(semitones: f64) -> f64 {
    reference_frequency() * 2.0f64.powf(semitones / 12.0)
}

// dissonance-synth -- sensory dissonance and additive synthesis of tones
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `dissonance` - how rough do some notes sound when played together?

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use dissonance_synth::dissonance::Dissonance;
use dissonance_synth::loudness::ReferenceCurve;
use dissonance_synth::output;
use dissonance_synth::synth::{NoteInput, Oscillator, OscillatorConfig, Synth};
use dissonance_synth::tone::{Decay, Sawtooth, Sine, Square};

#[derive(Debug, StructOpt)]
#[structopt(name = "dissonance", about = "Sensory dissonance of notes played together")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Notes played at once, as names (e.g. A#4) or frequencies in Hz.
    #[structopt(required = true)]
    notes: Vec<NoteInput>,

    /// RMS pressure in Pa of the center voice(s). 0.02 Pa is 60 dB SPL.
    #[structopt(long, default_value = "0.02")]
    pressure: f64,

    /// Number of partials per voice, including the fundamental.
    #[structopt(long, default_value = "1")]
    overtones: usize,

    /// Shape of the overtone series.
    #[structopt(long, default_value = "sine", possible_values = &["sine", "saw", "square"])]
    decay: String,

    #[structopt(long, default_value = "1")]
    voices: usize,

    /// Between 0 and 1, how far the outer voices are detuned.
    #[structopt(long, default_value = "0")]
    detune: f64,

    /// Offset in semitones from the requested notes.
    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    pitch: f64,

    /// Between 0 and 1, how random the voice phases are.
    #[structopt(long, default_value = "1")]
    phase_random_range: f64,

    /// Seed for the voice phases. Phases differ on every run if not given.
    #[structopt(long)]
    seed: Option<u64>,

    /// Reference equal-loudness curve as CSV with columns f, af, Lu, Tf. Defaults to ISO 226:2003.
    #[structopt(long, parse(from_os_str))]
    curve: Option<PathBuf>,

    /// Write the rendered sound as raw little-endian f64 mono samples.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Sample rate of the rendered sound.
    #[structopt(long, default_value = "44100")]
    rate: u32,

    /// Length of the rendered sound in seconds.
    #[structopt(long, default_value = "5")]
    duration: f64,
}

fn invalid_input(err: dissonance_synth::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let custom_curve = match &opt.curve {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Some(ReferenceCurve::parse_csv(&text).map_err(invalid_input)?)
        }
        None => None,
    };
    let curve = match &custom_curve {
        Some(curve) => curve,
        None => ReferenceCurve::iso226(),
    };

    let decay: Arc<dyn Decay + Send + Sync> = match opt.decay.as_str() {
        "saw" => Arc::new(Sawtooth),
        "square" => Arc::new(Square),
        _ => Arc::new(Sine),
    };
    let osc = Oscillator::new(OscillatorConfig {
        decay,
        voices: opt.voices,
        detune: opt.detune,
        phase_random_range: opt.phase_random_range,
        pressure: opt.pressure,
        pitch: opt.pitch,
        overtones: opt.overtones,
        ..OscillatorConfig::default()
    })
    .map_err(invalid_input)?;
    let synth = Synth::new(vec![osc]);

    let mut rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let tones = synth
        .tones_for_notes(&opt.notes, &mut rng)
        .map_err(invalid_input)?;

    for tone in &tones {
        println!(
            "{:>10.3} Hz {:>10.6} Pa {:>7.2} dB  phase {:.3}",
            tone.frequency,
            tone.pressure,
            tone.pressure_level_db(),
            tone.phase
        );
    }

    // Silent partials have no loudness, leave them out of the score.
    let audible: Vec<_> = tones.iter().copied().filter(|t| t.pressure != 0.0).collect();
    debug!("{} of {} tones are audible", audible.len(), tones.len());
    let score = Dissonance::new(curve)
        .of_tones(&audible)
        .map_err(invalid_input)?;
    println!("dissonance: {:.4}", score);

    if let Some(path) = opt.output {
        let samples = synth
            .render(&tones, opt.rate, opt.duration)
            .map_err(invalid_input)?;
        info!(
            "writing {} samples at {} Hz to {}",
            samples.len(),
            opt.rate,
            path.display()
        );
        let mut out = BufWriter::new(File::create(path)?);
        output::write_f64_samples(&samples, &mut out)?;
    }
    Ok(())
}

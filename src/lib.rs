pub mod critical_band;
pub mod dissonance;
pub mod error;
pub mod loudness;
pub mod note;
pub mod synth;
pub mod tone;

// Hand-off to external tools
pub mod output;

pub use error::{Error, Result};

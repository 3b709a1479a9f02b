//! Handing rendered samples to the outside world, e.g. `sox -t f64 -c 1 -r <rate> - out.wav`.

use std::io;

/// Copy the mono `f64` samples to little-endian bytes.
///
/// Returns the number of samples that were actually copied.
/// Might be less than the number of input samples if the output buffer was not large enough.
pub fn copy_f64_bytes(samples: &[f64], bytes: &mut [u8]) -> usize {
    let mut processed = 0;
    for (sample, target) in samples.iter().zip(bytes.chunks_exact_mut(8)) {
        target.copy_from_slice(&sample.to_le_bytes());
        processed += 1;
    }
    processed
}

/// Write all samples as raw little-endian `f64` values.
pub fn write_f64_samples<W: io::Write + ?Sized>(samples: &[f64], out: &mut W) -> io::Result<()> {
    let mut buffer = [0u8; 8 * 1024];
    for chunk in samples.chunks(1024) {
        let n = copy_f64_bytes(chunk, &mut buffer);
        out.write_all(&buffer[..8 * n])?;
    }
    out.flush()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_buffer() {
        let mut bytes = [0u8; 20];
        assert_eq!(copy_f64_bytes(&[1.0, -2.5, 3.0], &mut bytes), 2);
        assert_eq!(&bytes[8..16], &(-2.5f64).to_le_bytes()[..]);
        assert_eq!(&bytes[16..], &[0, 0, 0, 0]);
    }

    #[test]
    fn write_all_samples() {
        let samples: Vec<f64> = (0..2500).map(|i| i as f64 * 0.5).collect();
        let mut out = Vec::new();
        write_f64_samples(&samples, &mut out).unwrap();
        assert_eq!(out.len(), 8 * samples.len());
        let decoded: Vec<f64> = out
            .chunks_exact(8)
            .map(|b| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(b);
                f64::from_le_bytes(raw)
            })
            .collect();
        assert_eq!(decoded, samples);
    }
}

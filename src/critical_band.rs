//! Critical bandwidth: how far apart two frequencies must be before the ear resolves them.

/// Width in Hz of the critical band centered at `freq` Hz (Völk, 2015).
///
/// # Examples
///
/// ```
/// use dissonance_synth::critical_band::critical_bandwidth;
///
/// assert!((critical_bandwidth(1000.0) - 162.109).abs() < 1e-3);
/// ```
pub fn critical_bandwidth(freq: f64) -> f64 {
    let khz = freq / 1000.0;
    let zwicker = 25.0 + 75.0 * (1.0 + 1.4 * khz * khz).powf(0.69);
    zwicker * (1.0 - 1.0 / ((38.75 * khz).powi(2) + 1.0))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_values() {
        assert!((critical_bandwidth(1000.0) - 162.1088).abs() < 1e-3);
        assert!((critical_bandwidth(453.08) - 113.9121).abs() < 1e-3);
    }

    #[test]
    fn widens_with_frequency() {
        let mut previous = 0.0;
        for i in 1..200 {
            let width = critical_bandwidth(i as f64 * 100.0);
            assert!(width > previous);
            previous = width;
        }
    }

    #[test]
    fn vanishes_towards_zero() {
        assert_eq!(critical_bandwidth(0.0), 0.0);
        assert!(critical_bandwidth(1.0) < 1.0);
    }
}

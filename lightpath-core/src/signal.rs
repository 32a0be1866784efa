//! Probe signals that accumulate physical effects along a path
//!
//! A signal state is created once per probe and:
//! - Carries a fixed launch power
//! - Accumulates noise power and latency, never decreasing either
//! - Walks an immutable path through a read-only cursor

use serde::Serialize;

use crate::DegenerateResultError;

/// Per-traversal record of power, noise, latency and path position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalState {
    /// Launch power (W)
    power: f64,

    /// Accumulated noise power (W)
    noise: f64,

    /// Accumulated latency (s)
    latency: f64,

    /// Full path, never modified after creation
    path: Vec<String>,

    /// Index of the current head in `path`
    cursor: usize,
}

impl SignalState {
    /// Create a fresh probe with the given launch power and path
    pub fn new<I, S>(power: f64, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            power,
            noise: 0.0,
            latency: 0.0,
            path: path.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn latency(&self) -> f64 {
        self.latency
    }

    /// The full path as supplied at creation
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The part of the path not yet consumed, starting at the current head
    pub fn remaining(&self) -> &[String] {
        &self.path[self.cursor.min(self.path.len())..]
    }

    /// Current head of the remaining path
    pub fn current(&self) -> Option<&str> {
        self.remaining().first().map(String::as_str)
    }

    /// Node after the current head, if any
    pub fn next_hop(&self) -> Option<&str> {
        self.remaining().get(1).map(String::as_str)
    }

    /// Number of hops already traversed
    pub fn hops_taken(&self) -> usize {
        self.cursor
    }

    /// Consume the current head. Saturates at the end of the path.
    pub fn advance(&mut self) {
        if self.cursor < self.path.len() {
            self.cursor += 1;
        }
    }

    /// True once every node of the path has been consumed
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.path.len()
    }

    /// Add noise power. Negative or non-finite increments are ignored.
    pub fn add_noise(&mut self, increment: f64) {
        if increment.is_finite() && increment > 0.0 {
            self.noise += increment;
        }
    }

    /// Add latency. Negative or non-finite increments are ignored.
    pub fn add_latency(&mut self, increment: f64) {
        if increment.is_finite() && increment > 0.0 {
            self.latency += increment;
        }
    }

    /// Signal-to-noise ratio in dB: `10 * log10(power / noise)`
    pub fn snr_db(&self) -> Result<f64, DegenerateResultError> {
        if self.noise <= 0.0 {
            return Err(DegenerateResultError::ZeroNoise);
        }
        let snr = 10.0 * (self.power / self.noise).log10();
        if snr.is_finite() {
            Ok(snr)
        } else {
            Err(DegenerateResultError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_creation() {
        let signal = SignalState::new(1e-3, ["A", "B", "C", "D"]);

        assert_eq!(signal.power(), 1e-3);
        assert_eq!(signal.noise(), 0.0);
        assert_eq!(signal.latency(), 0.0);
        assert_eq!(signal.current(), Some("A"));
        assert_eq!(signal.next_hop(), Some("B"));
        assert!(!signal.is_complete());
    }

    #[test]
    fn test_cursor_keeps_full_path() {
        let mut signal = SignalState::new(1.0, ["A", "B", "C"]);
        signal.advance();

        assert_eq!(signal.remaining(), ["B".to_string(), "C".to_string()]);
        assert_eq!(signal.path().len(), 3);
        assert_eq!(signal.hops_taken(), 1);

        signal.advance();
        signal.advance();
        signal.advance(); // past the end, saturates
        assert!(signal.is_complete());
        assert!(signal.remaining().is_empty());
        assert_eq!(signal.current(), None);
        assert_eq!(signal.hops_taken(), 3);
    }

    #[test]
    fn test_accumulation_is_monotonic() {
        let mut signal = SignalState::new(1.0, ["A"]);
        signal.add_noise(0.05);
        signal.add_noise(-1.0);
        signal.add_noise(f64::NAN);
        signal.add_latency(10.0);
        signal.add_latency(-3.0);

        assert_eq!(signal.noise(), 0.05);
        assert_eq!(signal.latency(), 10.0);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut a = SignalState::new(1.0, ["A", "B"]);
        let b = a.clone();
        a.advance();
        a.add_noise(1.0);

        assert_eq!(b.current(), Some("A"));
        assert_eq!(b.noise(), 0.0);
    }

    #[test]
    fn test_snr() {
        let mut signal = SignalState::new(1e-3, ["A", "B"]);
        assert_eq!(signal.snr_db(), Err(DegenerateResultError::ZeroNoise));

        signal.add_noise(1e-6);
        let snr = signal.snr_db().unwrap();
        assert!((snr - 30.0).abs() < 1e-9);
    }
}

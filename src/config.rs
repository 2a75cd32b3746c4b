//! Runtime settings shared by both sides of the handshake.

use std::time::Duration;

/// Handshake configuration.
///
/// ## Field semantics
/// - `poll_interval`: delay between consumer timer ticks. Controls handshake
///   latency and the CPU spent polling; an update round trip takes up to two
///   intervals.
/// - `advance_per_poll`: units of work the producer performs between control
///   polls (`0` is treated as `1`).
#[derive(Clone, Debug)]
pub struct Config {
    pub poll_interval: Duration,
    pub advance_per_poll: usize,
}

impl Config {
    /// Builds a config with the given poll interval in milliseconds.
    pub fn from_millis(poll_interval_millis: u64) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_interval_millis),
            ..Self::default()
        }
    }

    /// Sets the number of work units between control polls.
    pub fn with_advance_per_poll(mut self, n: usize) -> Self {
        self.advance_per_poll = n;
        self
    }

    /// Returns `advance_per_poll` clamped to a minimum of 1.
    #[inline]
    pub fn advance_per_poll_clamped(&self) -> usize {
        self.advance_per_poll.max(1)
    }
}

impl Default for Config {
    /// - `poll_interval = 125ms`
    /// - `advance_per_poll = 10_000`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(125),
            advance_per_poll: 10_000,
        }
    }
}

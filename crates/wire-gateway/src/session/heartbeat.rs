//! Heartbeat governor
//!
//! Tracks the beat interval and pending acknowledgement for one connection.
//! This is a pure state machine: the controller owns the timer and calls
//! [`HeartbeatGovernor::tick`] on each expiry, so the governor itself never
//! blocks anything.

use std::time::{Duration, Instant};

use rand::Rng;

/// Outcome of a heartbeat tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    /// Send a heartbeat frame carrying the last known sequence
    Send(Option<u64>),
    /// The previous beat was never acknowledged; the connection is zombied
    Zombie,
}

/// Per-connection heartbeat bookkeeping
#[derive(Debug)]
pub struct HeartbeatGovernor {
    interval: Duration,
    ack_pending: bool,
    last_sent_at: Option<Instant>,
    last_ack_latency: Option<Duration>,
}

impl HeartbeatGovernor {
    /// Create a governor from the hello frame's interval
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            ack_pending: false,
            last_sent_at: None,
            last_ack_latency: None,
        }
    }

    /// Beat interval
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Jittered delay before the first beat, in `[0, interval)`
    ///
    /// Spreads reconnecting clients out so they do not all heartbeat in
    /// lockstep against the server.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        let millis = self.interval.as_millis().max(1) as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..millis))
    }

    /// Drive one timer expiry
    ///
    /// Yields [`Beat::Zombie`] exactly once per missed acknowledgement: the
    /// pending flag is cleared on the zombie signal, so the next tick on a
    /// fresh connection starts clean rather than re-signalling.
    pub fn tick(&mut self, last_sequence: Option<u64>) -> Beat {
        if self.ack_pending {
            self.ack_pending = false;
            self.last_sent_at = None;
            return Beat::Zombie;
        }
        self.ack_pending = true;
        self.last_sent_at = Some(Instant::now());
        Beat::Send(last_sequence)
    }

    /// Record a heartbeat-ack frame
    pub fn acknowledge(&mut self) {
        self.ack_pending = false;
        if let Some(sent_at) = self.last_sent_at.take() {
            self.last_ack_latency = Some(sent_at.elapsed());
        }
    }

    /// Whether a beat is still waiting for its acknowledgement
    #[must_use]
    pub fn is_ack_pending(&self) -> bool {
        self.ack_pending
    }

    /// Round-trip latency of the most recently acknowledged beat
    #[must_use]
    pub fn latency(&self) -> Option<Duration> {
        self.last_ack_latency
    }
}

//! Time source for token expiry
//!
//! The token cache compares a stored expiry against [`Clock::now`]. The
//! default [`SystemClock`] reports epoch milliseconds; [`ManualClock`]
//! lets callers drive time by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current instant, in clock ticks.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock, milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// How `expires_in` from the token endpoint is added to [`Clock::now`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryArithmetic {
    /// `expires_at = now + expires_in`, no unit conversion.
    #[default]
    Literal,
    /// `expires_in` is seconds and the clock counts milliseconds.
    SecondsToMillis,
}

impl ExpiryArithmetic {
    pub(crate) fn expires_at(self, now: u64, expires_in: u64) -> u64 {
        match self {
            ExpiryArithmetic::Literal => now.saturating_add(expires_in),
            ExpiryArithmetic::SecondsToMillis => {
                now.saturating_add(expires_in.saturating_mul(1000))
            }
        }
    }
}

//! Sample timestamps.
//!
//! The dispatch core has no clock of its own.  Every position sample carries
//! the time the device reported it, as milliseconds since the Unix epoch, so
//! callers can order samples and apply their own staleness policy.

use std::fmt;

/// Milliseconds since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    #[inline]
    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1_000))
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Milliseconds from `earlier` to `self`.  Negative if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// How old this timestamp is at `now`, in milliseconds.
    ///
    /// Intended for caller-side staleness checks, e.g.
    /// `sample.timestamp.age_ms(now) > 30_000`.
    #[inline]
    pub fn age_ms(self, now: Timestamp) -> i64 {
        now.since(self)
    }
}

impl std::ops::Add<i64> for Timestamp {
    type Output = Timestamp;
    #[inline]
    fn add(self, rhs_ms: i64) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs_ms))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

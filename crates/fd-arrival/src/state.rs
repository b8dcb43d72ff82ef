//! Dispatch state and transition records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PositionSample;

/// Where an engineer stands relative to the current target.
///
/// `Arrived` ends a trip's lifecycle but is not terminal at the type level:
/// a departure past the hysteresis band reverts it to `EnRoute`, and
/// assigning a new target resets to `Locating`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchState {
    /// No usable position yet, or no target assigned.
    #[default]
    Locating,
    /// Distance known and above the arrival threshold.
    EnRoute,
    /// Within the arrival threshold (or still inside the hysteresis band).
    Arrived,
}

impl DispatchState {
    #[inline]
    pub fn is_arrived(self) -> bool {
        self == DispatchState::Arrived
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchState::Locating => "locating",
            DispatchState::EnRoute  => "en-route",
            DispatchState::Arrived  => "arrived",
        };
        f.write_str(s)
    }
}

/// Emitted on every state transition, whether or not feedback fired.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    pub previous:   DispatchState,
    pub new:        DispatchState,
    /// Distance to the target that caused the transition, in metres.
    pub distance_m: f64,
    pub sample:     PositionSample,
}

impl StateChange {
    /// `true` for a `Locating`/`EnRoute` → `Arrived` edge.
    #[inline]
    pub fn is_arrival(&self) -> bool {
        self.new.is_arrived() && !self.previous.is_arrived()
    }
}

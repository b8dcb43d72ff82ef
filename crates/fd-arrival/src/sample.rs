//! Raw position readings.
//!
//! A `PositionSample` is exactly what the device location service handed
//! over.  It is not validated on construction; [`ArrivalStateMachine::ingest`]
//! checks it and rejects bad readings without disturbing state.
//!
//! [`ArrivalStateMachine::ingest`]: crate::ArrivalStateMachine::ingest

use serde::{Deserialize, Serialize};

use fd_core::{Coordinate, CoreResult, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Degrees.  A missing field deserialises as `NaN` and is rejected on
    /// ingest.
    #[serde(default = "missing_degrees")]
    pub lat: f64,

    #[serde(default = "missing_degrees")]
    pub lng: f64,

    pub timestamp: Timestamp,
}

fn missing_degrees() -> f64 {
    f64::NAN
}

impl PositionSample {
    pub fn new(lat: f64, lng: f64, timestamp: Timestamp) -> Self {
        Self { lat, lng, timestamp }
    }

    /// A sample at an already-validated position.
    pub fn at(coordinates: Coordinate, timestamp: Timestamp) -> Self {
        Self::new(coordinates.lat(), coordinates.lng(), timestamp)
    }

    /// Validate the reading into a [`Coordinate`].
    pub fn coordinates(&self) -> CoreResult<Coordinate> {
        Coordinate::new(self.lat, self.lng)
    }
}

use fd_core::{CoreError, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArrivalError {
    #[error("arrival configuration error: {0}")]
    Config(String),

    #[error("trip has no stops")]
    EmptyTrip,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ArrivalResult<T> = Result<T, ArrivalError>;

/// A position sample the machine refused.  State is left untouched and the
/// stream carries on with the next sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectedSample {
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoreError),

    #[error("sample at {got} precedes last accepted sample at {last}")]
    OutOfOrder { last: Timestamp, got: Timestamp },
}

/// Failure reported by a [`FeedbackDispatcher`](crate::FeedbackDispatcher).
/// Logged and dropped by the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("{0} is not supported on this device")]
    Unsupported(&'static str),

    #[error("feedback device error: {0}")]
    Device(String),
}

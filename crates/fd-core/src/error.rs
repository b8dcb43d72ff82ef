//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` through a
//! `#[from]` variant where coordinates cross their boundary.

use thiserror::Error;

/// Validation failures for the primitive types in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// Shorthand result type for `fd-core`.
pub type CoreResult<T> = Result<T, CoreError>;

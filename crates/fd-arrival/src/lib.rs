//! `fd-arrival` — arrival detection for dispatched field engineers.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`config`]   | `ArrivalConfig` — threshold + hysteresis, TOML/env loading      |
//! | [`state`]    | `DispatchState`, `StateChange`                                  |
//! | [`sample`]   | `PositionSample` — raw device reading                           |
//! | [`feedback`] | `FeedbackDispatcher` trait, `NoopFeedback`, `VibrationPattern`  |
//! | [`machine`]  | `ArrivalStateMachine`, `IngestOutcome`                          |
//! | [`trip`]     | `TripTracker` — ordered stops tracked leg by leg                |
//! | [`error`]    | `ArrivalError`, `RejectedSample`, `FeedbackError`               |
//!
//! # State model
//!
//! ```text
//!             d > threshold                    d <= threshold
//! Locating ─────────────────▶ EnRoute ───────────────────────▶ Arrived
//!    │                          ▲                                  │
//!    │     d <= threshold       │  d > threshold + hysteresis      │
//!    └──────────────────────────┼──────────────────────▶ Arrived   │
//!                               └──────────────────────────────────┘
//! ```
//!
//! Entering `Arrived` from `Locating` or `EnRoute` fires the feedback
//! dispatcher once.  Staying in `Arrived`, or reverting to `EnRoute`, never
//! does.
//!
//! The machine is synchronous and owned by one trip context; each sample is
//! processed to completion before the next is accepted.

pub mod config;
pub mod error;
pub mod feedback;
pub mod machine;
pub mod sample;
pub mod state;
pub mod trip;


pub use config::ArrivalConfig;
pub use error::{ArrivalError, ArrivalResult, FeedbackError, RejectedSample};
pub use feedback::{FeedbackDispatcher, NoopFeedback, VibrationPattern};
pub use machine::{ArrivalStateMachine, IngestOutcome};
pub use sample::PositionSample;
pub use state::{DispatchState, StateChange};
pub use trip::{TripOutcome, TripTracker};

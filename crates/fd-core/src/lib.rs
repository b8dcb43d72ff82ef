//! `fd-core` — foundational types for the `field_dispatch` workspace.
//!
//! Every other `fd-*` crate depends on this one.  It has no `fd-*`
//! dependencies and only `thiserror` (plus optional `serde`) from outside.
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`geo`]    | `Coordinate`, haversine distance                        |
//! | [`ids`]    | `NodeId`, `EdgeId`                                      |
//! | [`time`]   | `Timestamp` (Unix milliseconds)                         |
//! | [`error`]  | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Coordinate, EARTH_RADIUS_M};
pub use ids::{EdgeId, NodeId};
pub use time::Timestamp;

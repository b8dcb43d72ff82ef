//! `fd-spatial` — waypoint graph, snapping, loading and path solving.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`network`] | `WaypointGraph` (CSR + R-tree), `WaypointGraphBuilder`        |
//! | [`records`] | `GraphNode`, `GraphEdge` — external record shapes             |
//! | [`router`]  | `PathSolver` trait, `DijkstraSolver`, `Route`, `Path`, `Stop`, `shortest_path` |
//! | [`loader`]  | `load_graph_csv`, `load_graph_readers`                        |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Ownership
//!
//! A `WaypointGraph` is an immutable snapshot.  It is built once per planning
//! operation and handed to the solver by shared reference; nothing in this
//! crate mutates a graph after [`WaypointGraphBuilder::build`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the record types.       |

pub mod error;
pub mod loader;
pub mod network;
pub mod records;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use loader::{load_graph_csv, load_graph_readers};
pub use network::{WaypointGraph, WaypointGraphBuilder};
pub use records::{GraphEdge, GraphNode};
pub use router::{DijkstraSolver, Path, PathSolver, Route, Stop, shortest_path};

//! Record shapes exchanged with the CRUD layer.
//!
//! These are the string-keyed forms waypoints and ATMs arrive in.  They only
//! become a graph through [`WaypointGraph::from_records`], which validates
//! them.
//!
//! [`WaypointGraph::from_records`]: crate::WaypointGraph::from_records

use fd_core::Coordinate;

/// A named waypoint.  `id` must be unique within one graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub id:          String,
    pub coordinates: Coordinate,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, coordinates: Coordinate) -> Self {
        Self { id: id.into(), coordinates }
    }
}

/// A road segment between two waypoints, traversable in both directions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphEdge {
    pub from:   String,
    pub to:     String,
    /// Traversal cost.  Must be finite and `>= 0`.
    pub weight: f64,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self { from: from.into(), to: to.into(), weight }
    }
}

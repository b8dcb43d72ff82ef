//! Spatial-subsystem error type.
//!
//! Every variant is a configuration problem detected before a search runs.
//! "No route" is not an error; solvers return `Ok(None)` for it.

use thiserror::Error;

use fd_core::{CoreError, NodeId};

/// Errors produced by `fd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("duplicate waypoint id {0:?}")]
    DuplicateNode(String),

    #[error("unknown waypoint id {0:?}")]
    UnknownNode(String),

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge {from:?} -> {to:?} has negative weight {weight}")]
    NegativeWeight { from: String, to: String, weight: f64 },

    #[error("edge {from:?} -> {to:?} has a non-finite weight")]
    NonFiniteWeight { from: String, to: String },

    #[error("edge {from:?} -> {to:?} references unknown waypoint {missing:?}")]
    DanglingEdge { from: String, to: String, missing: String },

    #[error("waypoint {id:?} has invalid coordinates: {source}")]
    InvalidNode {
        id:     String,
        #[source]
        source: CoreError,
    },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

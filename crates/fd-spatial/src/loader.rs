//! CSV waypoint-network loader.
//!
//! # CSV format
//!
//! Two files: one row per waypoint, one row per undirected segment.
//!
//! ```csv
//! id,lat,lng
//! depot,52.5200,13.4050
//! atm-17,52.5234,13.4114
//! ```
//!
//! ```csv
//! from,to,weight
//! depot,atm-17,
//! atm-17,atm-22,640.5
//! ```
//!
//! An empty `weight` means "great-circle metres between the two ends".
//! Every row goes through the same validation as
//! [`WaypointGraph::from_records`]: coordinates in range, unique ids, known
//! endpoints, non-negative weights.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fd_core::Coordinate;

use crate::network::{WaypointGraph, WaypointGraphBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  String,
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:   String,
    to:     String,
    weight: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a waypoint graph from a nodes CSV and an edges CSV.
pub fn load_graph_csv(nodes: &Path, edges: &Path) -> SpatialResult<WaypointGraph> {
    let nodes_file = std::fs::File::open(nodes)?;
    let edges_file = std::fs::File::open(edges)?;
    load_graph_readers(nodes_file, edges_file)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
pub fn load_graph_readers<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<WaypointGraph> {
    let mut b = WaypointGraphBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    for result in csv_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let pos = Coordinate::new(row.lat, row.lng)
            .map_err(|source| SpatialError::InvalidNode { id: row.id.clone(), source })?;
        b.add_node(row.id, pos)?;
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut geodesic = 0usize;
    for result in csv_reader(edges).deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let (from, to) = resolve_ends(&b, &row)?;
        match row.weight {
            Some(w) => b.add_segment(from, to, w)?,
            None => {
                b.add_geodesic_segment(from, to)?;
                geodesic += 1;
            }
        }
    }

    let graph = b.build();
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        geodesic_segments = geodesic,
        "waypoint network loaded"
    );
    Ok(graph)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn resolve_ends(
    b:   &WaypointGraphBuilder,
    row: &EdgeRecord,
) -> SpatialResult<(fd_core::NodeId, fd_core::NodeId)> {
    let resolve = |key: &str| {
        b.node_id(key).ok_or_else(|| SpatialError::DanglingEdge {
            from:    row.from.clone(),
            to:      row.to.clone(),
            missing: key.to_owned(),
        })
    };
    Ok((resolve(&row.from)?, resolve(&row.to)?))
}

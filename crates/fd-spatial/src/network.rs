//! Waypoint graph representation and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  Given
//! a `NodeId n`, its outgoing edges are the `EdgeId`s
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! and `edge_from`, `edge_to`, `edge_weight` are indexed by that `EdgeId`.
//! Edges keep their insertion order within one source node, so the solver
//! relaxes them in a stable order from run to run.
//!
//! # Keys
//!
//! Waypoints are named by string keys at the boundary.  The builder interns
//! each key into a dense `NodeId` and keeps the reverse table so routes can
//! be reported back in the caller's vocabulary.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a position to the nearest `NodeId`.  Used to
//! snap an engineer's raw GPS fix onto the waypoint network before planning.
//!
//! Points are stored as unit vectors on the sphere.  Chord length between two
//! unit vectors is monotonic in great-circle distance, so R-tree order equals
//! haversine order at every latitude and across the antimeridian.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use fd_core::{Coordinate, EdgeId, NodeId};

use crate::records::{GraphEdge, GraphNode};
use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3], // unit vector, see `unit_vector`
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        self.point
            .iter()
            .zip(point)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

/// Earth-centred unit vector of `pos`.
fn unit_vector(pos: Coordinate) -> [f64; 3] {
    let lat = pos.lat().to_radians();
    let lng = pos.lng().to_radians();
    [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
}

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Directed waypoint graph in CSR format plus a spatial index.
///
/// Build with [`WaypointGraphBuilder`] or [`WaypointGraph::from_records`].
/// Once built the graph is read-only.
pub struct WaypointGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// External key of each node.  Indexed by `NodeId`.
    pub node_key: Vec<String>,

    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Row pointer; length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Non-negative, finite traversal cost.
    pub edge_weight: Vec<f64>,

    key_index:   FxHashMap<String, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl WaypointGraph {
    /// A graph with no nodes.  Every solve against it fails with
    /// [`SpatialError::NodeNotFound`].
    pub fn empty() -> Self {
        WaypointGraphBuilder::new().build()
    }

    /// Validate external records and build a graph from them.
    ///
    /// Each [`GraphEdge`] is an undirected segment and is stored in both
    /// directions.  Fails on duplicate node ids, edges naming unknown nodes
    /// and negative or non-finite weights.  Nothing is built unless every
    /// record passes.
    pub fn from_records(nodes: &[GraphNode], edges: &[GraphEdge]) -> SpatialResult<Self> {
        let mut b = WaypointGraphBuilder::with_capacity(nodes.len(), edges.len() * 2);
        for node in nodes {
            b.add_node(node.id.clone(), node.coordinates)?;
        }
        for edge in edges {
            let resolve = |key: &str| {
                b.node_id(key).ok_or_else(|| SpatialError::DanglingEdge {
                    from:    edge.from.clone(),
                    to:      edge.to.clone(),
                    missing: key.to_owned(),
                })
            };
            let from = resolve(&edge.from)?;
            let to = resolve(&edge.to)?;
            b.add_segment(from, to, edge.weight)?;
        }
        Ok(b.build())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Key lookup ────────────────────────────────────────────────────────

    /// Resolve an external key to its `NodeId`.
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// External key of `node`, if it exists.
    pub fn key(&self, node: NodeId) -> Option<&str> {
        self.node_key.get(node.index()).map(String::as_str)
    }

    pub fn position(&self, node: NodeId) -> Option<Coordinate> {
        self.node_pos.get(node.index()).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `EdgeId`s of the outgoing edges of `node`.  A contiguous range.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest waypoint to `pos` by great-circle distance.  `None` only for
    /// an empty graph.
    pub fn nearest_node(&self, pos: Coordinate) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&unit_vector(pos))
            .map(|e| e.id)
    }

    /// Up to `k` nearest waypoints to `pos`, closest first.
    pub fn k_nearest_nodes(&self, pos: Coordinate, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&unit_vector(pos))
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── WaypointGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`WaypointGraph`] incrementally, then call [`build`](Self::build).
///
/// Validation happens as records are added: a duplicate key, an edge to a
/// node that was never added, or a negative/non-finite weight is rejected on
/// the spot, so `build` itself cannot fail.
///
/// # Example
///
/// ```
/// use fd_core::Coordinate;
/// use fd_spatial::WaypointGraphBuilder;
///
/// let mut b = WaypointGraphBuilder::new();
/// let depot = b.add_node("depot", Coordinate::new(52.52, 13.40).unwrap()).unwrap();
/// let atm = b.add_node("atm-17", Coordinate::new(52.53, 13.41).unwrap()).unwrap();
/// b.add_geodesic_segment(depot, atm).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // both directions
/// ```
pub struct WaypointGraphBuilder {
    keys:      Vec<String>,
    nodes:     Vec<Coordinate>,
    key_index: FxHashMap<String, NodeId>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    weight: f64,
}

impl WaypointGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            keys:      Vec::with_capacity(nodes),
            nodes:     Vec::with_capacity(nodes),
            key_index: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a waypoint and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, key: impl Into<String>, pos: Coordinate) -> SpatialResult<NodeId> {
        let key = key.into();
        if self.key_index.contains_key(&key) {
            return Err(SpatialError::DuplicateNode(key));
        }
        let id = NodeId::try_from(self.nodes.len())
            .map_err(|_| SpatialError::Parse("too many waypoints for a u32 NodeId".into()))?;
        self.key_index.insert(key.clone(), id);
        self.keys.push(key);
        self.nodes.push(pos);
        Ok(id)
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> SpatialResult<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        if !weight.is_finite() {
            return Err(SpatialError::NonFiniteWeight {
                from: self.keys[from.index()].clone(),
                to:   self.keys[to.index()].clone(),
            });
        }
        if weight < 0.0 {
            return Err(SpatialError::NegativeWeight {
                from: self.keys[from.index()].clone(),
                to:   self.keys[to.index()].clone(),
                weight,
            });
        }
        self.raw_edges.push(RawEdge { from, to, weight });
        Ok(())
    }

    /// Add an undirected segment: one edge in each direction.
    pub fn add_segment(&mut self, a: NodeId, b: NodeId, weight: f64) -> SpatialResult<()> {
        self.add_directed_edge(a, b, weight)?;
        self.add_directed_edge(b, a, weight)
    }

    /// Add an undirected segment weighted by the great-circle distance in
    /// metres between the two nodes.  Returns the weight used.
    pub fn add_geodesic_segment(&mut self, a: NodeId, b: NodeId) -> SpatialResult<f64> {
        self.check_node(a)?;
        self.check_node(b)?;
        let weight = self.nodes[a.index()].distance_m(self.nodes[b.index()]);
        self.add_segment(a, b, weight)?;
        Ok(weight)
    }

    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    pub fn node_pos(&self, id: NodeId) -> Option<Coordinate> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    fn check_node(&self, id: NodeId) -> SpatialResult<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(SpatialError::NodeNotFound(id))
        }
    }

    /// Consume the builder and produce a [`WaypointGraph`].
    ///
    /// O(E log E) for the edge sort plus O(N log N) for the R-tree bulk load.
    pub fn build(self) -> WaypointGraph {
        let node_count = self.nodes.len();

        // Stable sort: same-source edges keep insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>    = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry {
                point: unit_vector(*pos),
                id:    NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        tracing::debug!(nodes = node_count, edges = raw.len(), "waypoint graph built");

        WaypointGraph {
            node_key: self.keys,
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            key_index: self.key_index,
            spatial_idx,
        }
    }
}

impl Default for WaypointGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

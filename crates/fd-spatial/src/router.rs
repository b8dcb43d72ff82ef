//! Path solving over a [`WaypointGraph`].
//!
//! # Pluggability
//!
//! Callers go through the [`PathSolver`] trait so a different search (A*,
//! a precomputed table) can replace [`DijkstraSolver`] without touching the
//! arrival side.
//!
//! # Outcomes
//!
//! * `Ok(Some(route))`: minimal-cost route, start and end inclusive.
//! * `Ok(None)`: no route, the network is disconnected between the two.
//! * `Err(_)`: the request itself is malformed (unknown node).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use fd_core::{Coordinate, EdgeId, NodeId};

use crate::network::WaypointGraph;
use crate::records::{GraphEdge, GraphNode};
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A solved route: nodes in travel order, start and end inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes:      Vec<NodeId>,
    pub total_cost: f64,
}

impl Route {
    /// `true` if start and end are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// External keys of the route's nodes.
    pub fn keys(&self, graph: &WaypointGraph) -> Vec<String> {
        self.nodes
            .iter()
            .map(|&n| graph.node_key[n.index()].clone())
            .collect()
    }

    /// Resolve into a stop list for leg-by-leg arrival tracking.
    pub fn stops(&self, graph: &WaypointGraph) -> Vec<Stop> {
        self.nodes
            .iter()
            .map(|&n| Stop {
                key:         graph.node_key[n.index()].clone(),
                coordinates: graph.node_pos[n.index()],
            })
            .collect()
    }
}

/// A string-keyed route, as returned by [`shortest_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub ids:  Vec<String>,
    pub cost: f64,
}

/// One target along a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub key:         String,
    pub coordinates: Coordinate,
}

impl Stop {
    pub fn new(key: impl Into<String>, coordinates: Coordinate) -> Self {
        Self { key: key.into(), coordinates }
    }
}

// ── PathSolver trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// The graph is borrowed immutably for the whole call.
pub trait PathSolver: Send + Sync {
    fn solve(
        &self,
        graph: &WaypointGraph,
        from:  NodeId,
        to:    NodeId,
    ) -> SpatialResult<Option<Route>>;
}

// ── DijkstraSolver ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm with a binary-heap frontier, O((V + E) log V).
///
/// Equal tentative costs are popped lowest `NodeId` first, so repeated
/// solves over the same graph return the same route.
pub struct DijkstraSolver;

impl PathSolver for DijkstraSolver {
    fn solve(
        &self,
        graph: &WaypointGraph,
        from:  NodeId,
        to:    NodeId,
    ) -> SpatialResult<Option<Route>> {
        for node in [from, to] {
            if !graph.contains(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        let route = dijkstra(graph, from, to);
        match &route {
            Some(r) => tracing::debug!(
                %from, %to, hops = r.hop_count(), cost = r.total_cost, "route solved"
            ),
            None => tracing::debug!(%from, %to, "no route"),
        }
        Ok(route)
    }
}

/// Solve directly from external records.
///
/// Validates `nodes`/`edges` into a [`WaypointGraph`] (edges undirected),
/// rejects unknown `start_id`/`end_id`, then runs [`DijkstraSolver`].
pub fn shortest_path(
    nodes:    &[GraphNode],
    edges:    &[GraphEdge],
    start_id: &str,
    end_id:   &str,
) -> SpatialResult<Option<Path>> {
    let graph = WaypointGraph::from_records(nodes, edges)?;
    let lookup = |key: &str| {
        graph
            .node_id(key)
            .ok_or_else(|| SpatialError::UnknownNode(key.to_owned()))
    };
    let from = lookup(start_id)?;
    let to = lookup(end_id)?;

    let route = DijkstraSolver.solve(&graph, from, to)?;
    Ok(route.map(|r| Path { ids: r.keys(&graph), cost: r.total_cost }))
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap key.  Weights are validated finite, so `total_cmp` is a true order.
#[derive(Copy, Clone, Debug)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(graph: &WaypointGraph, from: NodeId, to: NodeId) -> Option<Route> {
    if from == to {
        return Some(Route { nodes: vec![from], total_cost: 0.0 });
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Reverse turns the max-heap into a min-heap on (cost, node).
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Stale entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_weight[edge.index()];

            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_edge[next.index()] = edge;
                heap.push(Reverse((Cost(new_cost), next)));
            }
        }
    }

    None
}

fn reconstruct(
    graph:     &WaypointGraph,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    total:     f64,
) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "settled node without predecessor");
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, total_cost: total }
}

//! Unit tests for fd-spatial.
//!
//! All tests use hand-built graphs or in-memory CSV.

#[cfg(test)]
mod helpers {
    use fd_core::{Coordinate, NodeId};

    use crate::{GraphEdge, GraphNode, WaypointGraph, WaypointGraphBuilder};

    pub fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    /// A(0,0), B(0,1), C(0,2); A–B 1, B–C 1, A–C 5.
    pub fn triangle_records() -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let nodes = vec![
            GraphNode::new("A", c(0.0, 0.0)),
            GraphNode::new("B", c(0.0, 1.0)),
            GraphNode::new("C", c(0.0, 2.0)),
        ];
        let edges = vec![
            GraphEdge::new("A", "B", 1.0),
            GraphEdge::new("B", "C", 1.0),
            GraphEdge::new("A", "C", 5.0),
        ];
        (nodes, edges)
    }

    /// Nodes (lat, lng):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Segments: 0-1 10, 1-2 10, 2-4 10, 0-3 50, 3-4 10.
    /// Shortest 0→4 is 0→1→2→4 (30) rather than 0→3→4 (60).
    pub fn grid_graph() -> (WaypointGraph, [NodeId; 5]) {
        let mut b = WaypointGraphBuilder::new();
        let n0 = b.add_node("n0", c(0.0, 0.0)).unwrap();
        let n1 = b.add_node("n1", c(0.0, 1.0)).unwrap();
        let n2 = b.add_node("n2", c(0.0, 2.0)).unwrap();
        let n3 = b.add_node("n3", c(1.0, 0.0)).unwrap();
        let n4 = b.add_node("n4", c(1.0, 2.0)).unwrap();

        b.add_segment(n0, n1, 10.0).unwrap();
        b.add_segment(n1, n2, 10.0).unwrap();
        b.add_segment(n2, n4, 10.0).unwrap();
        b.add_segment(n0, n3, 50.0).unwrap();
        b.add_segment(n3, n4, 10.0).unwrap();

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fd_core::NodeId;

    use super::helpers::{c, grid_graph, triangle_records};
    use crate::{GraphEdge, GraphNode, SpatialError, WaypointGraph, WaypointGraphBuilder};

    #[test]
    fn empty_build() {
        let g = WaypointGraph::empty();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn csr_out_edges() {
        let (g, [n0, n1, n2, n3, n4]) = grid_graph();
        assert_eq!(g.out_degree(n0), 2);
        assert_eq!(g.out_degree(n1), 2);
        assert_eq!(g.out_degree(n2), 2);
        assert_eq!(g.out_degree(n3), 2);
        assert_eq!(g.out_degree(n4), 2);
        for e in g.out_edges(n0) {
            assert_eq!(g.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn directed_only_edge() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        let z = b.add_node("z", c(0.0, 1.0)).unwrap();
        b.add_directed_edge(a, z, 3.0).unwrap();
        let g = b.build();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.out_degree(z), 0);
    }

    #[test]
    fn key_lookup_roundtrip() {
        let (g, [_, n1, ..]) = grid_graph();
        assert_eq!(g.node_id("n1"), Some(n1));
        assert_eq!(g.key(n1), Some("n1"));
        assert_eq!(g.node_id("missing"), None);
        assert_eq!(g.key(NodeId(99)), None);
        assert_eq!(g.position(n1), Some(c(0.0, 1.0)));
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut b = WaypointGraphBuilder::new();
        b.add_node("atm-1", c(0.0, 0.0)).unwrap();
        let err = b.add_node("atm-1", c(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, SpatialError::DuplicateNode(k) if k == "atm-1"));
    }

    #[test]
    fn negative_weight_rejected_at_construction() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        let z = b.add_node("z", c(0.0, 1.0)).unwrap();
        let err = b.add_segment(a, z, -1.0).unwrap_err();
        assert!(matches!(err, SpatialError::NegativeWeight { weight, .. } if weight == -1.0));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn non_finite_weight_rejected() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        let z = b.add_node("z", c(0.0, 1.0)).unwrap();
        assert!(matches!(
            b.add_directed_edge(a, z, f64::NAN),
            Err(SpatialError::NonFiniteWeight { .. })
        ));
        assert!(matches!(
            b.add_directed_edge(a, z, f64::INFINITY),
            Err(SpatialError::NonFiniteWeight { .. })
        ));
    }

    #[test]
    fn edge_to_unknown_node_id_rejected() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        assert!(matches!(
            b.add_directed_edge(a, NodeId(7), 1.0),
            Err(SpatialError::NodeNotFound(NodeId(7)))
        ));
    }

    #[test]
    fn geodesic_segment_uses_haversine() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(30.0, -88.0)).unwrap();
        let z = b.add_node("z", c(31.0, -88.0)).unwrap();
        let w = b.add_geodesic_segment(a, z).unwrap();
        assert!((w - 111_195.0).abs() < 50.0, "got {w}");
        let g = b.build();
        assert_eq!(g.edge_weight, vec![w, w]);
    }

    #[test]
    fn from_records_builds_undirected() {
        let (nodes, edges) = triangle_records();
        let g = WaypointGraph::from_records(&nodes, &edges).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn from_records_rejects_dangling_edge() {
        let (nodes, mut edges) = triangle_records();
        edges.push(GraphEdge::new("C", "D", 1.0));
        let err = WaypointGraph::from_records(&nodes, &edges).err().unwrap();
        assert!(matches!(err, SpatialError::DanglingEdge { missing, .. } if missing == "D"));
    }

    #[test]
    fn from_records_rejects_duplicate_id() {
        let (mut nodes, edges) = triangle_records();
        nodes.push(GraphNode::new("B", c(5.0, 5.0)));
        assert!(matches!(
            WaypointGraph::from_records(&nodes, &edges),
            Err(SpatialError::DuplicateNode(_))
        ));
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use super::helpers::{c, grid_graph};
    use crate::WaypointGraph;

    #[test]
    fn snap_exact_position() {
        let (g, [n0, ..]) = grid_graph();
        assert_eq!(g.nearest_node(c(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (g, [n0, n1, ..]) = grid_graph();
        assert_eq!(g.nearest_node(c(0.0, 0.4)), Some(n0));
        assert_eq!(g.nearest_node(c(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn empty_graph_returns_none() {
        assert!(WaypointGraph::empty().nearest_node(c(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (g, [n0, n1, ..]) = grid_graph();
        let nearest = g.k_nearest_nodes(c(0.0, 0.1), 2);
        assert_eq!(nearest[0], n0);
        // n1 is 0.9° away along the equator, n3 about 1.005°.
        assert_eq!(nearest[1], n1);
    }

    #[test]
    fn snap_uses_ground_distance_at_high_latitude() {
        use crate::WaypointGraphBuilder;

        // At 60° N a degree of longitude is half a degree of latitude:
        // "east" is ~1001 m away, "north" ~1668 m.
        let mut b = WaypointGraphBuilder::new();
        let north = b.add_node("north", c(60.015, 0.0)).unwrap();
        let east = b.add_node("east", c(60.0, 0.018)).unwrap();
        let g = b.build();

        let fix = c(60.0, 0.0);
        assert!(fix.distance_m(c(60.0, 0.018)) < fix.distance_m(c(60.015, 0.0)));
        assert_eq!(g.nearest_node(fix), Some(east));
        assert_eq!(g.k_nearest_nodes(fix, 2), vec![east, north]);
    }

    #[test]
    fn snap_across_antimeridian() {
        use crate::WaypointGraphBuilder;

        let mut b = WaypointGraphBuilder::new();
        let west = b.add_node("west", c(0.0, -179.99)).unwrap();
        let _far = b.add_node("far", c(0.0, 179.0)).unwrap();
        let g = b.build();

        assert_eq!(g.nearest_node(c(0.0, 179.99)), Some(west));
    }
}

// ── Dijkstra solving ──────────────────────────────────────────────────────────

#[cfg(test)]
mod solving {
    use fd_core::NodeId;

    use super::helpers::{c, grid_graph, triangle_records};
    use crate::{
        DijkstraSolver, GraphEdge, GraphNode, PathSolver, SpatialError, WaypointGraph,
        WaypointGraphBuilder, shortest_path,
    };

    #[test]
    fn triangle_prefers_two_cheap_hops() {
        let (nodes, edges) = triangle_records();
        let path = shortest_path(&nodes, &edges, "A", "C").unwrap().unwrap();
        assert_eq!(path.ids, vec!["A", "B", "C"]);
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn same_node_is_single_element_zero_cost() {
        let (nodes, edges) = triangle_records();
        for id in ["A", "B", "C"] {
            let path = shortest_path(&nodes, &edges, id, id).unwrap().unwrap();
            assert_eq!(path.ids, vec![id]);
            assert_eq!(path.cost, 0.0);
        }
    }

    #[test]
    fn disconnected_is_none_not_error() {
        let nodes = vec![
            GraphNode::new("A", c(0.0, 0.0)),
            GraphNode::new("B", c(0.0, 1.0)),
            GraphNode::new("island", c(5.0, 5.0)),
        ];
        let edges = vec![GraphEdge::new("A", "B", 1.0)];
        assert_eq!(shortest_path(&nodes, &edges, "A", "island").unwrap(), None);
    }

    #[test]
    fn negative_weight_is_validation_error() {
        let (nodes, mut edges) = triangle_records();
        edges[2].weight = -5.0;
        assert!(matches!(
            shortest_path(&nodes, &edges, "A", "C"),
            Err(SpatialError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn unknown_endpoints_rejected() {
        let (nodes, edges) = triangle_records();
        assert!(matches!(
            shortest_path(&nodes, &edges, "A", "Z"),
            Err(SpatialError::UnknownNode(k)) if k == "Z"
        ));
        assert!(matches!(
            shortest_path(&nodes, &edges, "Q", "A"),
            Err(SpatialError::UnknownNode(k)) if k == "Q"
        ));
    }

    #[test]
    fn solver_rejects_out_of_range_node() {
        let (g, [n0, ..]) = grid_graph();
        assert!(matches!(
            DijkstraSolver.solve(&g, n0, NodeId(42)),
            Err(SpatialError::NodeNotFound(NodeId(42)))
        ));
        assert!(DijkstraSolver.solve(&WaypointGraph::empty(), NodeId(0), NodeId(0)).is_err());
    }

    #[test]
    fn grid_shortest_route() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let route = DijkstraSolver.solve(&g, n0, n4).unwrap().unwrap();
        assert_eq!(route.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(route.total_cost, 30.0);
        assert_eq!(route.hop_count(), 3);
        assert_eq!(route.keys(&g), vec!["n0", "n1", "n2", "n4"]);
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        let z = b.add_node("z", c(0.0, 1.0)).unwrap();
        b.add_directed_edge(a, z, 1.0).unwrap();
        let g = b.build();
        assert!(DijkstraSolver.solve(&g, a, z).unwrap().is_some());
        assert!(DijkstraSolver.solve(&g, z, a).unwrap().is_none());
    }

    #[test]
    fn zero_weight_edges_stay_loop_free() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        let m = b.add_node("m", c(0.0, 0.5)).unwrap();
        let z = b.add_node("z", c(0.0, 1.0)).unwrap();
        b.add_segment(a, m, 0.0).unwrap();
        b.add_segment(m, z, 0.0).unwrap();
        let g = b.build();
        let route = DijkstraSolver.solve(&g, a, z).unwrap().unwrap();
        assert_eq!(route.nodes, vec![a, m, z]);
        assert_eq!(route.total_cost, 0.0);
    }

    #[test]
    fn equal_cost_ties_are_stable() {
        // Two equal-cost routes a→l→z and a→r→z.
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node("a", c(0.0, 0.0)).unwrap();
        let l = b.add_node("l", c(1.0, 1.0)).unwrap();
        let r = b.add_node("r", c(-1.0, 1.0)).unwrap();
        let z = b.add_node("z", c(0.0, 2.0)).unwrap();
        b.add_segment(a, l, 1.0).unwrap();
        b.add_segment(a, r, 1.0).unwrap();
        b.add_segment(l, z, 1.0).unwrap();
        b.add_segment(r, z, 1.0).unwrap();
        let g = b.build();

        let first = DijkstraSolver.solve(&g, a, z).unwrap().unwrap();
        for _ in 0..10 {
            assert_eq!(DijkstraSolver.solve(&g, a, z).unwrap().unwrap(), first);
        }
        assert_eq!(first.total_cost, 2.0);
    }

    #[test]
    fn stops_carry_positions() {
        let (g, [n0, _, _, _, n4]) = grid_graph();
        let route = DijkstraSolver.solve(&g, n0, n4).unwrap().unwrap();
        let stops = route.stops(&g);
        assert_eq!(stops.len(), 4);
        assert_eq!(stops[0].key, "n0");
        assert_eq!(stops[3].coordinates, c(1.0, 2.0));
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loading {
    use std::io::Cursor;

    use crate::{DijkstraSolver, PathSolver, SpatialError, load_graph_csv, load_graph_readers};

    const NODES: &str = "\
id,lat,lng
depot, 52.5200, 13.4050
atm-17,52.5234,13.4114
atm-22,52.5300,13.4200
";

    const EDGES: &str = "\
from,to,weight
depot,atm-17,
atm-17,atm-22,640.5
";

    #[test]
    fn loads_nodes_and_segments() {
        let g = load_graph_readers(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 4);

        let depot = g.node_id("depot").unwrap();
        let atm22 = g.node_id("atm-22").unwrap();
        let route = DijkstraSolver.solve(&g, depot, atm22).unwrap().unwrap();
        assert_eq!(route.keys(&g), vec!["depot", "atm-17", "atm-22"]);
        // Geodesic leg is a few hundred metres; explicit leg is 640.5.
        assert!(route.total_cost > 640.5 && route.total_cost < 1_500.0);
    }

    #[test]
    fn invalid_coordinates_rejected() {
        let nodes = "id,lat,lng\nbad,95.0,0.0\n";
        let err = load_graph_readers(Cursor::new(nodes), Cursor::new("from,to,weight\n"))
            .err()
            .unwrap();
        assert!(matches!(err, SpatialError::InvalidNode { id, .. } if id == "bad"));
    }

    #[test]
    fn dangling_edge_rejected() {
        let edges = "from,to,weight\ndepot,atm-99,10\n";
        let err = load_graph_readers(Cursor::new(NODES), Cursor::new(edges))
            .err()
            .unwrap();
        assert!(matches!(err, SpatialError::DanglingEdge { missing, .. } if missing == "atm-99"));
    }

    #[test]
    fn negative_weight_rejected() {
        let edges = "from,to,weight\ndepot,atm-17,-3\n";
        assert!(matches!(
            load_graph_readers(Cursor::new(NODES), Cursor::new(edges)),
            Err(SpatialError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let nodes = "id,lat,lng\nx,not-a-number,0\n";
        assert!(matches!(
            load_graph_readers(Cursor::new(nodes), Cursor::new("from,to,weight\n")),
            Err(SpatialError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let nodes = dir.path().join("nodes.csv");
        let edges = dir.path().join("edges.csv");
        std::fs::write(&nodes, NODES).unwrap();
        std::fs::write(&edges, EDGES).unwrap();

        let g = load_graph_csv(&nodes, &edges).unwrap();
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            load_graph_csv(&missing, &missing),
            Err(SpatialError::Io(_))
        ));
    }
}

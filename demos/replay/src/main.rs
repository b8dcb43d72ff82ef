//! replay — drive the dispatch core from a recorded GPS track.
//!
//! Loads a waypoint network, snaps the track's first fix to the nearest
//! waypoint, solves a route to the target ATM and replays every fix through
//! a `TripTracker`, printing one line per sample.
//!
//! ```text
//! replay [TARGET] [TRACK_CSV] [ARRIVAL_TOML]
//! ```
//!
//! Without arguments the bundled `data/` files are used.  Set `RUST_LOG` to
//! adjust log verbosity and `FD_ARRIVAL_*` to override arrival thresholds.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use fd_arrival::{
    ArrivalConfig, FeedbackDispatcher, FeedbackError, PositionSample, RejectedSample,
    TripTracker, VibrationPattern,
};
use fd_core::Timestamp;
use fd_spatial::{DijkstraSolver, PathSolver, load_graph_readers};

// ── Bundled data ──────────────────────────────────────────────────────────────

const NODES_CSV:    &str = include_str!("../data/nodes.csv");
const EDGES_CSV:    &str = include_str!("../data/edges.csv");
const TRACK_CSV:    &str = include_str!("../data/track.csv");
const ARRIVAL_TOML: &str = include_str!("../data/arrival.toml");

const DEFAULT_TARGET: &str = "atm-22";

// ── Track rows ────────────────────────────────────────────────────────────────

/// One fix.  Empty coordinates (GPS dropout) are kept and handed to the
/// tracker, which rejects them.
#[derive(Deserialize)]
struct TrackRow {
    timestamp: i64,
    lat:       Option<f64>,
    lng:       Option<f64>,
}

impl From<TrackRow> for PositionSample {
    fn from(row: TrackRow) -> Self {
        PositionSample::new(
            row.lat.unwrap_or(f64::NAN),
            row.lng.unwrap_or(f64::NAN),
            Timestamp::from_millis(row.timestamp),
        )
    }
}

fn read_track(csv_text: &str) -> Result<Vec<PositionSample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(csv_text));
    let mut samples = Vec::new();
    for (i, row) in rdr.deserialize::<TrackRow>().enumerate() {
        let row = row.with_context(|| format!("track row {}", i + 1))?;
        samples.push(row.into());
    }
    Ok(samples)
}

// ── Console feedback ──────────────────────────────────────────────────────────

/// Stands in for the handset: prints the cues instead of buzzing.
#[derive(Default)]
struct ConsoleFeedback {
    cues: usize,
}

impl FeedbackDispatcher for ConsoleFeedback {
    fn vibrate(&mut self, pattern: &VibrationPattern) -> Result<(), FeedbackError> {
        self.cues += 1;
        println!("    >> vibrate {:?} ({} ms)", pattern.segments(), pattern.total_ms());
        Ok(())
    }

    fn play_arrival_sound(&mut self) -> Result<(), FeedbackError> {
        println!("    >> chime");
        Ok(())
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let target_key = args.next().unwrap_or_else(|| DEFAULT_TARGET.to_string());
    let track_text = match args.next() {
        Some(p) => std::fs::read_to_string(&p).with_context(|| format!("reading {p}"))?,
        None => TRACK_CSV.to_string(),
    };
    let config = match args.next() {
        Some(p) => ArrivalConfig::load_from_file(Path::new(&p))
            .with_context(|| format!("loading {p}"))?,
        None => ArrivalConfig::from_toml_str(ARRIVAL_TOML)?,
    }
    .with_env_overrides();

    println!("=== replay — field dispatch ===");
    println!(
        "Arrival: threshold {} m, hysteresis {} m (releases past {} m)",
        config.threshold_m,
        config.hysteresis_m,
        config.release_m()
    );

    // 1. Network.
    let graph = load_graph_readers(Cursor::new(NODES_CSV), Cursor::new(EDGES_CSV))?;
    println!("Network: {} waypoints, {} directed edges", graph.node_count(), graph.edge_count());

    // 2. Track.
    let track = read_track(&track_text)?;
    let Some(first_fix) = track.iter().find_map(|s| s.coordinates().ok()) else {
        bail!("track has no valid fix to start from");
    };

    // 3. Route from the nearest waypoint to the target.
    let origin = graph
        .nearest_node(first_fix)
        .context("network has no waypoints")?;
    let target = graph
        .node_id(&target_key)
        .with_context(|| format!("unknown target '{target_key}'"))?;
    let Some(route) = DijkstraSolver.solve(&graph, origin, target)? else {
        bail!("'{target_key}' is not reachable from the start position");
    };
    println!(
        "Route:   {} ({:.0} m, {} hops)",
        route.keys(&graph).join(" -> "),
        route.total_cost,
        route.hop_count()
    );
    println!();

    // 4. Replay.
    tracing::info!(destination = %target_key, samples = track.len(), "replay starting");
    let mut trip = TripTracker::from_route(&route, &graph, config, ConsoleFeedback::default())?;
    let (mut accepted, mut rejected) = (0usize, 0usize);

    println!("{:<10} {:<12} {:<10} {:>10}", "Time", "Stop", "State", "Dist (m)");
    println!("{}", "-".repeat(45));
    for sample in &track {
        match trip.ingest(sample) {
            Ok(out) => {
                accepted += 1;
                let dist = out
                    .ingest
                    .distance_m
                    .map(|d| format!("{d:.1}"))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:<10} {:<12} {:<10} {:>10}",
                    sample.timestamp.to_string(),
                    out.stop_key,
                    out.ingest.state.to_string(),
                    dist
                );
                for &leg in &out.reached {
                    println!("    reached {}", trip.stops()[leg].key);
                }
                if out.trip_complete && out.reached_stop() {
                    println!("    trip complete");
                }
            }
            Err(e) => {
                rejected += 1;
                let why = match e {
                    RejectedSample::InvalidCoordinates(_) => "bad fix",
                    RejectedSample::OutOfOrder { .. } => "stale",
                };
                println!("{:<10} {:<12} {:<10}", sample.timestamp.to_string(), "-", why);
            }
        }
    }

    println!();
    println!(
        "Samples: {accepted} accepted, {rejected} rejected  |  cues fired: {}  |  complete: {}",
        trip.machine().feedback().cues,
        if trip.is_complete() { "yes" } else { "no" }
    );

    Ok(())
}

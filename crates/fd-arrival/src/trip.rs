//! Leg-by-leg tracking of a multi-stop trip.
//!
//! A trip is an ordered list of [`Stop`]s, typically resolved from a solved
//! [`Route`].  One [`ArrivalStateMachine`] tracks the current stop; when it
//! reports an arrival and more stops remain, the tracker retargets it onto
//! the next stop.  Arrival feedback therefore fires once per stop reached.
//!
//! The whole trip is one sample stream: moving between stops keeps the
//! machine's ordering window, so a fix older than one already accepted is
//! rejected on every leg.
//!
//! After an advance the same sample is checked against the new stop, so
//! stops closer together than the threshold are all reached by one fix.  A
//! sample that is not within the threshold of the current stop but is within
//! it of a later one skips ahead to that stop; the stops in between count as
//! passed, not reached, and fire no feedback.
//!
//! Re-routing mid-trip replaces the stop list and restarts from its first
//! stop.  The previous plan's progress is discarded.

use fd_spatial::{Route, Stop, WaypointGraph};

use crate::{
    ArrivalConfig, ArrivalError, ArrivalResult, ArrivalStateMachine, FeedbackDispatcher,
    IngestOutcome, NoopFeedback, PositionSample, RejectedSample,
};

/// Result of feeding one sample to a [`TripTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct TripOutcome {
    /// Leg being tracked after the sample (index into the stop list).
    pub leg:           usize,
    pub stop_key:      String,
    /// Machine outcome for `leg`, the last stop the sample was checked against.
    pub ingest:        IngestOutcome,
    /// Legs whose stop this sample reached, in order.
    pub reached:       Vec<usize>,
    /// `true` if the tracked leg changed.
    pub advanced:      bool,
    /// `true` once the final stop has been reached.
    pub trip_complete: bool,
}

impl TripOutcome {
    /// `true` if this sample reached at least one stop.
    pub fn reached_stop(&self) -> bool {
        !self.reached.is_empty()
    }
}

pub struct TripTracker<F: FeedbackDispatcher = NoopFeedback> {
    stops:    Vec<Stop>,
    leg:      usize,
    complete: bool,
    machine:  ArrivalStateMachine<F>,
}

impl<F: FeedbackDispatcher> TripTracker<F> {
    pub fn new(stops: Vec<Stop>, config: ArrivalConfig, feedback: F) -> ArrivalResult<Self> {
        let Some(first) = stops.first() else {
            return Err(ArrivalError::EmptyTrip);
        };
        let machine = ArrivalStateMachine::with_target(config, feedback, first.coordinates)?;
        tracing::info!(stops = stops.len(), first = %first.key, "trip started");
        Ok(Self { stops, leg: 0, complete: false, machine })
    }

    /// Track the stops of a solved route.
    ///
    /// The route's first node is the origin the engineer starts from, so it
    /// is skipped unless the route is a single node.
    pub fn from_route(
        route:    &Route,
        graph:    &WaypointGraph,
        config:   ArrivalConfig,
        feedback: F,
    ) -> ArrivalResult<Self> {
        let mut stops = route.stops(graph);
        if stops.len() > 1 {
            stops.remove(0);
        }
        Self::new(stops, config, feedback)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn stops(&self) -> &[Stop] { &self.stops }
    pub fn leg(&self) -> usize { self.leg }
    pub fn is_complete(&self) -> bool { self.complete }
    pub fn machine(&self) -> &ArrivalStateMachine<F> { &self.machine }

    pub fn current_stop(&self) -> &Stop {
        &self.stops[self.leg]
    }

    pub fn into_machine(self) -> ArrivalStateMachine<F> {
        self.machine
    }

    // ── Operations ────────────────────────────────────────────────────────

    pub fn ingest(&mut self, sample: &PositionSample) -> Result<TripOutcome, RejectedSample> {
        let start_leg = self.leg;
        let mut ingest = self.machine.ingest(sample)?;
        let mut reached = Vec::new();

        // Re-ingesting the same sample cannot be rejected: its coordinates
        // were accepted and its timestamp equals the last accepted one.
        while !self.complete {
            if ingest.arrived_now {
                reached.push(self.leg);
                if self.leg + 1 == self.stops.len() {
                    self.complete = true;
                    tracing::info!(stop = %self.stops[self.leg].key, "trip complete");
                    break;
                }
                self.move_to(self.leg + 1);
            } else if let Some(ahead) = self.later_stop_within_threshold(sample) {
                tracing::info!(
                    from = %self.stops[self.leg].key,
                    to = %self.stops[ahead].key,
                    passed = ahead - self.leg,
                    "skipping ahead to a closer stop"
                );
                self.move_to(ahead);
            } else {
                break;
            }
            ingest = self.machine.ingest(sample)?;
        }

        Ok(TripOutcome {
            leg: self.leg,
            stop_key: self.stops[self.leg].key.clone(),
            ingest,
            reached,
            advanced: self.leg != start_leg,
            trip_complete: self.complete,
        })
    }

    /// Replace the remaining plan with `stops`, starting again from the
    /// first of them.  The sample stream continues, so the ordering window
    /// is kept.
    pub fn reroute(&mut self, stops: Vec<Stop>) -> ArrivalResult<()> {
        let Some(first) = stops.first() else {
            return Err(ArrivalError::EmptyTrip);
        };
        tracing::info!(stops = stops.len(), first = %first.key, "trip rerouted");
        self.machine.retarget(first.coordinates);
        self.stops = stops;
        self.leg = 0;
        self.complete = false;
        Ok(())
    }

    fn move_to(&mut self, leg: usize) {
        self.leg = leg;
        let next = &self.stops[leg];
        tracing::info!(leg, stop = %next.key, "advancing to next stop");
        self.machine.retarget(next.coordinates);
    }

    /// First stop after the current one within the arrival threshold.
    fn later_stop_within_threshold(&self, sample: &PositionSample) -> Option<usize> {
        let pos = sample.coordinates().ok()?;
        let threshold = self.machine.config().threshold_m;
        self.stops[self.leg + 1..]
            .iter()
            .position(|s| pos.distance_m(s.coordinates) <= threshold)
            .map(|i| self.leg + 1 + i)
    }
}

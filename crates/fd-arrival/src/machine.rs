//! The arrival state machine.

use fd_core::{Coordinate, Timestamp};

use crate::feedback::fire_arrival;
use crate::{
    ArrivalConfig, ArrivalResult, DispatchState, FeedbackDispatcher, NoopFeedback,
    PositionSample, RejectedSample, StateChange, VibrationPattern,
};

/// Result of ingesting one accepted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// State after the sample.
    pub state:        DispatchState,
    /// Distance to the target in metres; `None` while no target is assigned.
    pub distance_m:   Option<f64>,
    pub transitioned: bool,
    /// `true` only on the sample that crossed into `Arrived`.
    pub arrived_now:  bool,
    /// Present whenever `transitioned` is.
    pub change:       Option<StateChange>,
}

/// Decides, sample by sample, whether an engineer has reached the target.
///
/// One instance belongs to one trip context and is driven through `&mut
/// self`, so samples for a trip are processed strictly one at a time.
///
/// # Example
///
/// ```
/// use fd_arrival::{ArrivalConfig, ArrivalStateMachine, DispatchState, NoopFeedback, PositionSample};
/// use fd_core::{Coordinate, Timestamp};
///
/// let atm = Coordinate::new(52.5200, 13.4050).unwrap();
/// let mut m = ArrivalStateMachine::with_target(ArrivalConfig::default(), NoopFeedback, atm).unwrap();
///
/// let far = PositionSample::new(52.5300, 13.4050, Timestamp(0));
/// assert_eq!(m.ingest(&far).unwrap().state, DispatchState::EnRoute);
///
/// let here = PositionSample::new(52.5201, 13.4050, Timestamp(1_000));
/// let out = m.ingest(&here).unwrap();
/// assert!(out.arrived_now);
/// ```
pub struct ArrivalStateMachine<F: FeedbackDispatcher = NoopFeedback> {
    config:   ArrivalConfig,
    pattern:  VibrationPattern,
    feedback: F,

    target:          Option<Coordinate>,
    state:           DispatchState,
    last_distance_m: Option<f64>,
    last_timestamp:  Option<Timestamp>,
    arrivals:        u32,
}

impl<F: FeedbackDispatcher> ArrivalStateMachine<F> {
    /// A machine in `Locating` with no target.
    pub fn new(config: ArrivalConfig, feedback: F) -> ArrivalResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pattern: VibrationPattern::arrival(),
            feedback,
            target: None,
            state: DispatchState::Locating,
            last_distance_m: None,
            last_timestamp: None,
            arrivals: 0,
        })
    }

    /// A machine in `Locating` tracking `target`.
    pub fn with_target(config: ArrivalConfig, feedback: F, target: Coordinate) -> ArrivalResult<Self> {
        let mut m = Self::new(config, feedback)?;
        m.target = Some(target);
        Ok(m)
    }

    pub fn with_vibration_pattern(mut self, pattern: VibrationPattern) -> Self {
        self.pattern = pattern;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> DispatchState { self.state }
    pub fn target(&self) -> Option<Coordinate> { self.target }
    pub fn config(&self) -> &ArrivalConfig { &self.config }
    pub fn last_distance_m(&self) -> Option<f64> { self.last_distance_m }
    pub fn last_timestamp(&self) -> Option<Timestamp> { self.last_timestamp }

    /// Arrival edges fired since the last reset.
    pub fn arrival_count(&self) -> u32 { self.arrivals }

    pub fn feedback(&self) -> &F { &self.feedback }
    pub fn feedback_mut(&mut self) -> &mut F { &mut self.feedback }

    pub fn into_feedback(self) -> F {
        self.feedback
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Track a new target for a new job.  Returns to `Locating` and drops all
    /// bookkeeping, including the sample ordering window.
    pub fn reset(&mut self, target: Coordinate) {
        tracing::info!(%target, previous = %self.state, "arrival target reset");
        self.target = Some(target);
        self.clear_progress();
        self.last_timestamp = None;
    }

    /// Move to the next target of the same sample stream.  Like [`reset`],
    /// except the last accepted timestamp is kept, so samples older than
    /// anything already seen are still rejected.
    ///
    /// [`reset`]: Self::reset
    pub fn retarget(&mut self, target: Coordinate) {
        tracing::debug!(%target, previous = %self.state, "arrival target moved");
        self.target = Some(target);
        self.clear_progress();
    }

    /// Drop the target (job closed).  Samples are still accepted but leave
    /// the machine in `Locating`.
    pub fn clear(&mut self) {
        self.target = None;
        self.clear_progress();
        self.last_timestamp = None;
    }

    fn clear_progress(&mut self) {
        self.state = DispatchState::Locating;
        self.last_distance_m = None;
        self.arrivals = 0;
    }

    // ── Ingestion ─────────────────────────────────────────────────────────

    /// Feed one position sample.
    ///
    /// A sample with invalid coordinates, or one older than the last accepted
    /// sample, is rejected and leaves the machine exactly as it was.
    pub fn ingest(&mut self, sample: &PositionSample) -> Result<IngestOutcome, RejectedSample> {
        let position = sample.coordinates().map_err(|e| {
            tracing::warn!(error = %e, timestamp = %sample.timestamp, "position sample rejected");
            RejectedSample::InvalidCoordinates(e)
        })?;

        if let Some(last) = self.last_timestamp {
            if sample.timestamp < last {
                tracing::warn!(%last, got = %sample.timestamp, "out-of-order position sample rejected");
                return Err(RejectedSample::OutOfOrder { last, got: sample.timestamp });
            }
        }
        self.last_timestamp = Some(sample.timestamp);

        let Some(target) = self.target else {
            tracing::debug!(timestamp = %sample.timestamp, "sample accepted with no target");
            return Ok(self.unchanged(None));
        };

        let distance_m = position.distance_m(target);
        self.last_distance_m = Some(distance_m);

        let previous = self.state;
        let next = self.next_state(distance_m);
        if next == previous {
            tracing::debug!(state = %previous, distance_m, "sample accepted");
            return Ok(self.unchanged(Some(distance_m)));
        }

        self.state = next;
        let arrived_now = next.is_arrived();
        tracing::info!(%previous, %next, distance_m, "dispatch state changed");

        if arrived_now {
            self.arrivals += 1;
            fire_arrival(&mut self.feedback, &self.pattern);
        }

        Ok(IngestOutcome {
            state: next,
            distance_m: Some(distance_m),
            transitioned: true,
            arrived_now,
            change: Some(StateChange {
                previous,
                new: next,
                distance_m,
                sample: *sample,
            }),
        })
    }

    fn next_state(&self, distance_m: f64) -> DispatchState {
        match self.state {
            DispatchState::Locating | DispatchState::EnRoute => {
                if distance_m <= self.config.threshold_m {
                    DispatchState::Arrived
                } else {
                    DispatchState::EnRoute
                }
            }
            DispatchState::Arrived => {
                if distance_m > self.config.release_m() {
                    DispatchState::EnRoute
                } else {
                    DispatchState::Arrived
                }
            }
        }
    }

    fn unchanged(&self, distance_m: Option<f64>) -> IngestOutcome {
        IngestOutcome {
            state: self.state,
            distance_m,
            transitioned: false,
            arrived_now: false,
            change: None,
        }
    }
}

use crate::line::CrossingDirection;
use crate::track::voting::ClassVotes;
use crate::utils::bbox::BoundingBox;

/// Sinks for emitted crossing events
pub mod notify;

/// Track state store keyed by track id
pub mod store;

/// Class vote histogram and majority voting
pub mod voting;

/// Phase of the per-track crossing state machine, derived from [TrackState]
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackPhase {
    /// No previous side value: first observation, or the line was reconfigured
    New,
    /// The previous side value is known and the track has not been counted
    Tracking,
    /// The track has contributed to the count, terminal for the lifetime of the entry
    Counted,
}

/// Geometric crossing that waits for the class vote to be confirmed
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingCrossing {
    pub direction: CrossingDirection,
    /// Frame tick when the crossing was detected
    pub tick: usize,
}

/// Per-track memory of the counter.
///
/// Every field is initialized in [TrackState::new], the store never builds the record any
/// other way.
///
#[derive(Clone, Debug)]
pub struct TrackState {
    track_id: u64,
    previous_side: Option<f32>,
    votes: ClassVotes,
    top_confidence: f32,
    counted: bool,
    pending: Option<PendingCrossing>,
    first_seen_tick: usize,
    last_seen_tick: usize,
    last_bbox: BoundingBox,
}

impl TrackState {
    pub fn new(track_id: u64, tick: usize, bbox: BoundingBox) -> Self {
        Self {
            track_id,
            previous_side: None,
            votes: ClassVotes::default(),
            top_confidence: 0.0,
            counted: false,
            pending: None,
            first_seen_tick: tick,
            last_seen_tick: tick,
            last_bbox: bbox,
        }
    }

    pub fn track_id(&self) -> u64 {
        self.track_id
    }

    pub fn previous_side(&self) -> Option<f32> {
        self.previous_side
    }

    pub fn votes(&self) -> &ClassVotes {
        &self.votes
    }

    pub fn top_confidence(&self) -> f32 {
        self.top_confidence
    }

    pub fn is_counted(&self) -> bool {
        self.counted
    }

    pub fn pending(&self) -> Option<PendingCrossing> {
        self.pending
    }

    pub fn first_seen_tick(&self) -> usize {
        self.first_seen_tick
    }

    pub fn last_seen_tick(&self) -> usize {
        self.last_seen_tick
    }

    pub fn last_bbox(&self) -> BoundingBox {
        self.last_bbox
    }

    pub fn phase(&self) -> TrackPhase {
        if self.counted {
            TrackPhase::Counted
        } else if self.previous_side.is_none() {
            TrackPhase::New
        } else {
            TrackPhase::Tracking
        }
    }

    /// Records a geometric crossing that is not yet attributed; a later crossing replaces it
    ///
    pub fn defer(&mut self, direction: CrossingDirection, tick: usize) {
        if !self.counted {
            self.pending = Some(PendingCrossing { direction, tick });
        }
    }

    pub(crate) fn update(
        &mut self,
        class_label: &str,
        confidence: f32,
        side: Option<f32>,
        bbox: BoundingBox,
        tick: usize,
    ) {
        self.votes.add(class_label);
        self.top_confidence = self.top_confidence.max(confidence);
        if side.is_some() {
            self.previous_side = side;
        }
        self.last_bbox = bbox;
        self.last_seen_tick = tick;
    }

    pub(crate) fn set_counted(&mut self) {
        self.counted = true;
        self.pending = None;
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub(crate) fn clear_counted(&mut self) {
        self.counted = false;
    }

    pub(crate) fn forget_side(&mut self) {
        self.previous_side = None;
        self.pending = None;
    }
}

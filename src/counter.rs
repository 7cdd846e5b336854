use crate::counter::options::{CounterOptions, DeadZonePolicy, ResetPolicy};
use crate::counter::session::CountingSession;
use crate::detection::Detection;
use crate::line::crossing::detect;
use crate::line::{CrossingDirection, LineGeometry, Side};
use crate::track::notify::{CrossingNotifier, NoopNotifier};
use crate::track::store::TrackStore;
use crate::track::TrackState;
use crate::utils::bbox::BoundingBox;
use crate::Errors;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Counter builder
pub mod builder;

/// Counter configuration
pub mod options;

/// Counting aggregator
pub mod session;


/// Immutable record of a counted crossing
///
#[derive(Clone, Debug, PartialEq)]
pub struct CrossingEvent {
    pub track_id: u64,
    /// Label confirmed by the majority vote
    pub class_label: String,
    /// Best confidence the track reached
    pub confidence: f32,
    pub direction: CrossingDirection,
    /// Box of the observation that produced the event
    pub bbox: BoundingBox,
    /// Frame tick of the observation that produced the event
    pub tick: usize,
    pub timestamp_ms: u128,
}

/// Read-only view of a counter
///
#[derive(Clone, Debug, PartialEq)]
pub struct CountsSnapshot {
    pub total: usize,
    pub by_class: HashMap<String, usize>,
    /// Number of processed frames
    pub tick: usize,
    /// Tracks kept in the store, counted ones included
    pub active_tracks: usize,
    /// Crossings lost with tracks evicted before their class was confirmed
    pub lost_crossings: usize,
    pub line: LineGeometry,
}

struct CounterState<N> {
    line: LineGeometry,
    store: TrackStore,
    session: CountingSession,
    tick: usize,
    notifier: N,
}

/// Line-crossing counter of a single video stream.
///
/// Frames must be submitted in order, one at a time. Every public operation takes the internal
/// lock for its whole duration, so a control thread may query [LineCrossingCounter::snapshot],
/// [LineCrossingCounter::reset] or [LineCrossingCounter::set_line] while another thread feeds
/// frames.
///
pub struct LineCrossingCounter<N = NoopNotifier>
where
    N: CrossingNotifier,
{
    state: RwLock<CounterState<N>>,
    opts: CounterOptions,
}

impl LineCrossingCounter<NoopNotifier> {
    pub fn new(line: LineGeometry, opts: CounterOptions) -> Self {
        Self::with_notifier(line, opts, NoopNotifier)
    }
}

impl<N> LineCrossingCounter<N>
where
    N: CrossingNotifier,
{
    /// Creates the counter that also delivers every event to `notifier`
    ///
    pub fn with_notifier(line: LineGeometry, opts: CounterOptions, notifier: N) -> Self {
        let session = CountingSession::new(opts.get_vocabulary().clone());
        Self {
            state: RwLock::new(CounterState {
                line,
                store: TrackStore::new(),
                session,
                tick: 0,
                notifier,
            }),
            opts,
        }
    }

    pub fn options(&self) -> &CounterOptions {
        &self.opts
    }

    pub fn line(&self) -> LineGeometry {
        self.state.read().unwrap().line
    }

    pub fn current_tick(&self) -> usize {
        self.state.read().unwrap().tick
    }

    /// Copy of the track state, `None` when the track is unknown or evicted
    ///
    pub fn track(&self, track_id: u64) -> Option<TrackState> {
        self.state.read().unwrap().store.get(track_id).cloned()
    }

    /// Processes the detections of the next frame and returns the crossings counted in it.
    ///
    /// Malformed detections and repeated track ids within the frame are skipped with a warning;
    /// the rest of the frame is processed normally. Every label is voted; a crossing whose
    /// resolved label is not counted by the vocabulary is dropped.
    ///
    pub fn process_frame(&self, detections: &[Detection]) -> Vec<CrossingEvent> {
        let voting = self.opts.voting();
        let vocabulary = self.opts.get_vocabulary();
        let anchor = self.opts.get_anchor();
        let filter = self.opts.get_direction_filter();
        let dead_zone = self.opts.get_dead_zone();

        let mut guard = self.state.write().unwrap();
        let state = &mut *guard;
        state.tick += 1;
        let tick = state.tick;
        let line = state.line;

        let mut observed_ids = HashSet::with_capacity(detections.len());
        let mut events = Vec::new();

        for d in detections {
            let track_id = match d.validate() {
                Ok(id) => id,
                Err(e) => {
                    warn!("Detection {:?} is skipped at tick {}: {}", d, tick, e);
                    continue;
                }
            };
            if !observed_ids.insert(track_id) {
                warn!("{} Tick {}.", Errors::DuplicateTrackInFrame(track_id), tick);
                continue;
            }
            let current = line.side(&d.bbox.anchor(anchor));
            let previous = state.store.previous_side_of(track_id);
            let stored = match dead_zone {
                DeadZonePolicy::Refresh => Some(current),
                DeadZonePolicy::Hold => match line.classify_value(current) {
                    Side::On => None,
                    _ => Some(current),
                },
            };

            let track = state
                .store
                .observe(track_id, &d.class_label, d.confidence, stored, d.bbox, tick);
            if track.is_counted() {
                continue;
            }

            if let Some(direction) = detect(&line, previous, current) {
                if filter.admits(direction) {
                    debug!(
                        "Track {} crossed the line {} at tick {}",
                        track_id, direction, tick
                    );
                    track.defer(direction, tick);
                } else {
                    debug!(
                        "Track {} crossed the line {} at tick {}, the direction is filtered out",
                        track_id, direction, tick
                    );
                }
            }

            let pending = match track.pending() {
                Some(p) => p,
                None => continue,
            };
            let class_label = match voting.resolve(track.votes(), track.top_confidence()) {
                Some(label) => label.to_string(),
                None => {
                    debug!(
                        "Crossing of track {} from tick {} waits for the class, votes: {:?}, top confidence: {}",
                        track_id,
                        pending.tick,
                        track.votes().ranking(),
                        track.top_confidence()
                    );
                    continue;
                }
            };
            if !vocabulary.is_counted(&class_label) {
                debug!(
                    "Track {} crossed the line {} as '{}', the class is not counted",
                    track_id, pending.direction, class_label
                );
                track.clear_pending();
                continue;
            }
            let confidence = track.top_confidence();

            if let Some(event) = state.session.on_crossing(
                &mut state.store,
                track_id,
                &class_label,
                confidence,
                pending.direction,
                d.bbox,
                tick,
            ) {
                info!(
                    "Counted {} track {} crossing {} at tick {}, total {}",
                    event.class_label,
                    event.track_id,
                    event.direction,
                    event.tick,
                    state.session.total()
                );
                state.notifier.send(&event);
                events.push(event);
            }
        }

        let lost = self
            .opts
            .reaper()
            .reap(&mut state.store, &observed_ids, tick)
            .iter()
            .filter(|t| !t.is_counted() && t.pending().is_some())
            .count();
        state.session.record_lost(lost);

        events
    }

    /// Replaces the line.
    ///
    /// Every track forgets its previous side and pending crossing, the next observation sets a
    /// new baseline. Counts are kept.
    ///
    pub fn set_line(&self, line: LineGeometry) {
        let mut state = self.state.write().unwrap();
        state.line = line;
        state.store.forget_sides();
        info!(
            "Line is set to ({}, {}) - ({}, {}), margin {}",
            line.p1().x,
            line.p1().y,
            line.p2().x,
            line.p2().y,
            line.margin()
        );
    }

    /// Zeroes the session counters. Idempotent.
    ///
    /// With [ResetPolicy::SessionAndTracks] the tracks counted before the reset may be counted
    /// again when they cross the line once more.
    ///
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap();
        state.session.reset();
        if self.opts.get_reset_policy() == ResetPolicy::SessionAndTracks {
            state.store.clear_counted();
        }
        info!("Counter is reset at tick {}", state.tick);
    }

    pub fn snapshot(&self) -> CountsSnapshot {
        let state = self.state.read().unwrap();
        let counts = state.session.snapshot();
        CountsSnapshot {
            total: counts.total,
            by_class: counts.by_class,
            tick: state.tick,
            active_tracks: state.store.len(),
            lost_crossings: state.session.lost_crossings(),
            line: state.line,
        }
    }
}

use crate::track::store::TrackStore;
use crate::track::TrackState;
use log::{debug, warn};
use std::collections::HashSet;

/// Default number of frames a track may stay unobserved before it is evicted
pub const DEFAULT_MAX_IDLE_FRAMES: usize = 30;

/// Evicts tracks that are no longer observed.
///
/// A track is stale when it is absent from the current frame and
/// `last_seen_tick + max_idle_frames < tick`, i.e. it was missing for more than
/// `max_idle_frames` consecutive frames. `max_idle_frames == 0` evicts a track on the first
/// frame it is missing: memory stays minimal, but a single missed detection makes the track
/// start over as a new one.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaleTrackReaper {
    max_idle_frames: usize,
}

impl Default for StaleTrackReaper {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE_FRAMES)
    }
}

impl StaleTrackReaper {
    pub fn new(max_idle_frames: usize) -> Self {
        Self { max_idle_frames }
    }

    /// Evicts on the first frame a track is missing
    ///
    pub fn immediate() -> Self {
        Self::new(0)
    }

    pub fn max_idle_frames(&self) -> usize {
        self.max_idle_frames
    }

    pub fn is_stale(&self, last_seen_tick: usize, tick: usize) -> bool {
        last_seen_tick + self.max_idle_frames < tick
    }

    /// Purges stale tracks, returns them. Crossings still waiting for a class are lost with
    /// their track.
    ///
    pub fn reap(
        &self,
        store: &mut TrackStore,
        observed_ids: &HashSet<u64>,
        tick: usize,
    ) -> Vec<TrackState> {
        let evicted = store.evict_stale(observed_ids, tick, self.max_idle_frames);
        for t in &evicted {
            match t.pending() {
                Some(p) if !t.is_counted() => warn!(
                    "Track {} evicted at tick {} with an unconfirmed {} crossing from tick {}, votes: {:?}",
                    t.track_id(),
                    tick,
                    p.direction,
                    p.tick,
                    t.votes().ranking()
                ),
                _ => debug!(
                    "Track {} evicted at tick {}, last seen at {}",
                    t.track_id(),
                    tick,
                    t.last_seen_tick()
                ),
            }
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use crate::line::CrossingDirection;
    use crate::reaper::StaleTrackReaper;
    use crate::track::store::TrackStore;
    use crate::utils::bbox::BoundingBox;
    use std::collections::HashSet;

    #[test]
    fn staleness() {
        let r = StaleTrackReaper::new(2);
        assert!(!r.is_stale(5, 5));
        assert!(!r.is_stale(5, 7));
        assert!(r.is_stale(5, 8));

        let r = StaleTrackReaper::immediate();
        assert!(!r.is_stale(5, 5));
        assert!(r.is_stale(5, 6));
    }

    #[test]
    fn reap_returns_pending_tracks() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let mut store = TrackStore::new();
        store
            .observe(1, "car", 0.1, Some(10.0), bbox, 1)
            .defer(CrossingDirection::Down, 1);
        store.observe(2, "car", 0.1, Some(10.0), bbox, 1);

        let r = StaleTrackReaper::new(1);
        assert!(r.reap(&mut store, &HashSet::new(), 2).is_empty());

        let evicted = r.reap(&mut store, &HashSet::from([2]), 3);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].track_id(), 1);
        assert!(evicted[0].pending().is_some());
        assert_eq!(store.len(), 1);
    }
}

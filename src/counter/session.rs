use crate::counter::CrossingEvent;
use crate::current_time_ms;
use crate::line::CrossingDirection;
use crate::track::store::TrackStore;
use crate::utils::bbox::BoundingBox;
use crate::vocabulary::ClassVocabulary;
use itertools::Itertools;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Read-only copy of the session counters
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCounts {
    pub total: usize,
    pub by_class: HashMap<String, usize>,
}

impl SessionCounts {
    /// Per-class counts, biggest first, then by name
    ///
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        self.by_class
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .sorted_by(|(ll, lc), (rl, rc)| rc.cmp(lc).then(ll.cmp(rl)))
            .collect()
    }
}

/// Counting aggregator.
///
/// Owns the total and per-class counters and the set of counted track ids. Every mutation
/// keeps `total == sum(by_class)` and `counted_ids.len() == total`.
///
#[derive(Clone, Debug)]
pub struct CountingSession {
    total: usize,
    by_class: HashMap<String, usize>,
    counted_ids: HashSet<u64>,
    lost_crossings: usize,
}

impl CountingSession {
    /// Creates the session with a zero counter for every class of the vocabulary
    ///
    pub fn new(vocabulary: ClassVocabulary) -> Self {
        Self {
            total: 0,
            by_class: vocabulary.names().map(|n| (n.to_string(), 0)).collect(),
            counted_ids: HashSet::default(),
            lost_crossings: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count_of(&self, class_label: &str) -> usize {
        self.by_class.get(class_label).copied().unwrap_or(0)
    }

    pub fn is_counted(&self, track_id: u64) -> bool {
        self.counted_ids.contains(&track_id)
    }

    /// Crossings lost because their track was evicted before its class was confirmed
    ///
    pub fn lost_crossings(&self) -> usize {
        self.lost_crossings
    }

    pub(crate) fn record_lost(&mut self, n: usize) {
        self.lost_crossings += n;
    }

    /// Counts a confirmed crossing once per track id.
    ///
    /// Marks the track counted in `store` in the same step. Returns `None` when the id was
    /// already counted in this session.
    ///
    #[allow(clippy::too_many_arguments)]
    pub fn on_crossing(
        &mut self,
        store: &mut TrackStore,
        track_id: u64,
        class_label: &str,
        confidence: f32,
        direction: CrossingDirection,
        bbox: BoundingBox,
        tick: usize,
    ) -> Option<CrossingEvent> {
        if let Err(e) = store.mark_counted(track_id) {
            debug!("Counting track {} which is not kept in the store: {}", track_id, e);
        }
        if !self.counted_ids.insert(track_id) {
            debug!("Track {} is already counted in this session", track_id);
            return None;
        }
        self.total += 1;
        *self.by_class.entry(class_label.to_string()).or_insert(0) += 1;
        Some(CrossingEvent {
            track_id,
            class_label: class_label.to_string(),
            confidence,
            direction,
            bbox,
            tick,
            timestamp_ms: current_time_ms(),
        })
    }

    /// Zeroes the counters and forgets counted ids, the class keys are kept
    ///
    pub fn reset(&mut self) {
        self.total = 0;
        self.by_class.values_mut().for_each(|c| *c = 0);
        self.counted_ids.clear();
        self.lost_crossings = 0;
    }

    pub fn snapshot(&self) -> SessionCounts {
        SessionCounts {
            total: self.total,
            by_class: self.by_class.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::counter::session::CountingSession;
    use crate::line::CrossingDirection;
    use crate::track::store::TrackStore;
    use crate::track::TrackPhase;
    use crate::utils::bbox::BoundingBox;
    use crate::vocabulary::{ClassVocabulary, VEHICLE_CLASSES};

    fn bbox() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 4.0, 4.0)
    }

    fn consistent(s: &CountingSession) -> bool {
        let snap = s.snapshot();
        snap.total == snap.by_class.values().sum::<usize>()
    }

    #[test]
    fn pre_seeded() {
        let s = CountingSession::new(ClassVocabulary::default());
        let snap = s.snapshot();
        assert_eq!(snap.total, 0);
        assert_eq!(snap.by_class.len(), VEHICLE_CLASSES.len());
        assert!(snap.by_class.values().all(|c| *c == 0));
    }

    #[test]
    fn counts_once_per_track() {
        let mut store = TrackStore::new();
        store.observe(7, "bus", 0.9, Some(1.0), bbox(), 1);
        let mut s = CountingSession::new(ClassVocabulary::default());

        let e = s
            .on_crossing(&mut store, 7, "bus", 0.9, CrossingDirection::Down, bbox(), 1)
            .unwrap();
        assert_eq!(e.track_id, 7);
        assert_eq!(e.class_label, "bus");
        assert_eq!(e.direction, CrossingDirection::Down);
        assert_eq!(e.tick, 1);
        assert_eq!(store.get(7).unwrap().phase(), TrackPhase::Counted);

        assert!(s
            .on_crossing(&mut store, 7, "car", 0.9, CrossingDirection::Up, bbox(), 2)
            .is_none());
        assert_eq!(s.total(), 1);
        assert_eq!(s.count_of("bus"), 1);
        assert_eq!(s.count_of("car"), 0);
        assert!(s.is_counted(7));
        assert!(consistent(&s));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store = TrackStore::new();
        let mut s = CountingSession::new(ClassVocabulary::default());
        for id in 1..=3 {
            s.on_crossing(&mut store, id, "van", 0.5, CrossingDirection::Up, bbox(), 1);
        }
        s.record_lost(2);
        assert_eq!(s.total(), 3);
        assert!(consistent(&s));

        s.reset();
        let once = s.snapshot();
        s.reset();
        let twice = s.snapshot();
        assert_eq!(once, twice);
        assert_eq!(once.total, 0);
        assert_eq!(once.by_class.len(), VEHICLE_CLASSES.len());
        assert_eq!(s.lost_crossings(), 0);
        assert!(!s.is_counted(1));
        assert!(consistent(&s));
    }

    #[test]
    fn ranked() {
        let mut store = TrackStore::new();
        let mut s = CountingSession::new(ClassVocabulary::new(["car", "bus", "van"]));
        s.on_crossing(&mut store, 1, "car", 0.5, CrossingDirection::Up, bbox(), 1);
        s.on_crossing(&mut store, 2, "van", 0.5, CrossingDirection::Up, bbox(), 1);
        s.on_crossing(&mut store, 3, "van", 0.5, CrossingDirection::Up, bbox(), 1);
        assert_eq!(
            s.snapshot().ranked(),
            vec![("van", 2), ("car", 1), ("bus", 0)]
        );
    }
}

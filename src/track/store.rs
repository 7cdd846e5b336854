use crate::track::TrackState;
use crate::utils::bbox::BoundingBox;
use crate::Errors;
use anyhow::Result;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Track state store keyed by tracker-assigned track id
///
#[derive(Default, Debug, Clone)]
pub struct TrackStore {
    tracks: HashMap<u64, TrackState>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, track_id: u64) -> Option<&TrackState> {
        self.tracks.get(&track_id)
    }

    pub fn get_mut(&mut self, track_id: u64) -> Option<&mut TrackState> {
        self.tracks.get_mut(&track_id)
    }

    pub fn track_ids(&self) -> Vec<u64> {
        self.tracks.keys().copied().collect()
    }

    /// Side value the track had at its last observation.
    ///
    /// Must be read before [TrackStore::observe] replaces it.
    ///
    pub fn previous_side_of(&self, track_id: u64) -> Option<f32> {
        self.tracks.get(&track_id).and_then(|t| t.previous_side())
    }

    /// Inserts or updates the track with the frame observation
    ///
    /// # Parameters
    /// * `track_id` - tracker id
    /// * `class_label` - per-frame class, always voted
    /// * `confidence` - detector confidence, raises the top confidence
    /// * `side` - new side value, `None` keeps the previous one
    /// * `bbox` - observed box
    /// * `tick` - frame tick
    ///
    pub fn observe(
        &mut self,
        track_id: u64,
        class_label: &str,
        confidence: f32,
        side: Option<f32>,
        bbox: BoundingBox,
        tick: usize,
    ) -> &mut TrackState {
        let track = self
            .tracks
            .entry(track_id)
            .or_insert_with(|| TrackState::new(track_id, tick, bbox));
        track.update(class_label, confidence, side, bbox, tick);
        track
    }

    /// Marks the track as counted, idempotent
    ///
    pub fn mark_counted(&mut self, track_id: u64) -> Result<()> {
        match self.tracks.get_mut(&track_id) {
            Some(t) => {
                t.set_counted();
                Ok(())
            }
            None => Err(Errors::MissingTrack(track_id).into()),
        }
    }

    /// Drops the previous side and pending crossing of every track
    ///
    pub fn forget_sides(&mut self) {
        self.tracks.values_mut().for_each(|t| t.forget_side());
    }

    /// Makes every counted track countable again
    ///
    pub fn clear_counted(&mut self) {
        self.tracks.values_mut().for_each(|t| t.clear_counted());
    }

    /// Ids of tracks absent from `observed_ids` for more than `max_idle` frames at `tick`
    ///
    pub fn find_stale(&self, observed_ids: &HashSet<u64>, tick: usize, max_idle: usize) -> Vec<u64> {
        self.tracks
            .par_iter()
            .filter(|(track_id, track)| {
                !observed_ids.contains(*track_id) && track.last_seen_tick() + max_idle < tick
            })
            .map(|(track_id, _)| *track_id)
            .collect()
    }

    /// Removes the tracks from the store and returns them
    ///
    pub fn fetch_tracks(&mut self, tracks: &[u64]) -> Vec<TrackState> {
        tracks
            .iter()
            .flat_map(|track_id| self.tracks.remove(track_id))
            .collect()
    }

    /// Removes tracks absent for more than `max_idle` consecutive frames
    ///
    pub fn evict_stale(
        &mut self,
        observed_ids: &HashSet<u64>,
        tick: usize,
        max_idle: usize,
    ) -> Vec<TrackState> {
        let stale = self.find_stale(observed_ids, tick, max_idle);
        self.fetch_tracks(&stale)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

use crate::line::DirectionFilter;
use crate::reaper::{StaleTrackReaper, DEFAULT_MAX_IDLE_FRAMES};
use crate::track::voting::{MajorityVoting, DEFAULT_COUNT_CONF_MIN, DEFAULT_VOTE_MIN};
use crate::utils::bbox::Anchor;
use crate::vocabulary::ClassVocabulary;

/// What a counter reset clears besides the session counters
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Only the session counters; tracks counted before the reset can never be counted again
    SessionOnly,
    /// Session counters and the per-track counted flags
    #[default]
    SessionAndTracks,
}

/// How the previous side of a track is refreshed while it is inside the dead-zone
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeadZonePolicy {
    /// Every observation replaces the previous side; a crossing must jump over the whole
    /// dead-zone between two consecutive observations
    #[default]
    Refresh,
    /// Observations inside the dead-zone keep the last side outside of it, so slow tracks
    /// that dwell in the band are still counted when they leave it on the other side
    Hold,
}

/// Class that is used to configure the line-crossing counter
#[derive(Debug, Clone)]
pub struct CounterOptions {
    vote_min: usize,
    count_conf_min: f32,
    max_idle_frames: usize,
    direction_filter: DirectionFilter,
    anchor: Anchor,
    reset_policy: ResetPolicy,
    dead_zone: DeadZonePolicy,
    vocabulary: ClassVocabulary,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            vote_min: DEFAULT_VOTE_MIN,
            count_conf_min: DEFAULT_COUNT_CONF_MIN,
            max_idle_frames: DEFAULT_MAX_IDLE_FRAMES,
            direction_filter: DirectionFilter::default(),
            anchor: Anchor::default(),
            reset_policy: ResetPolicy::default(),
            dead_zone: DeadZonePolicy::default(),
            vocabulary: ClassVocabulary::default(),
        }
    }
}

impl CounterOptions {
    /// The minimal number of per-frame class votes a track must gather before its class is
    /// confirmed and its crossing is counted. A geometric crossing observed earlier waits until
    /// the votes are gathered.
    ///
    pub fn vote_min(mut self, n: usize) -> Self {
        assert!(n > 0, "Vote minimum must be a positive number");
        self.vote_min = n;
        self
    }

    /// The minimal best confidence a track must reach to be counted
    ///
    pub fn count_conf_min(mut self, conf: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&conf),
            "Confidence must be between 0.0 and 1.0"
        );
        self.count_conf_min = conf;
        self
    }

    /// The number of consecutive frames a track may be missing before it is evicted.
    ///
    /// `0` evicts the track on the first frame it is missing. Crossings waiting for a class
    /// confirmation are lost with the evicted track.
    ///
    pub fn max_idle_frames(mut self, n: usize) -> Self {
        self.max_idle_frames = n;
        self
    }

    pub fn direction_filter(mut self, filter: DirectionFilter) -> Self {
        self.direction_filter = filter;
        self
    }

    /// The point of the bounding box judged against the line
    ///
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn dead_zone(mut self, policy: DeadZonePolicy) -> Self {
        self.dead_zone = policy;
        self
    }

    /// Classes known to the counter; only the counted classes of the vocabulary are counted
    ///
    pub fn vocabulary(mut self, vocabulary: ClassVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn get_direction_filter(&self) -> DirectionFilter {
        self.direction_filter
    }

    pub fn get_anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn get_reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    pub fn get_dead_zone(&self) -> DeadZonePolicy {
        self.dead_zone
    }

    pub fn get_vocabulary(&self) -> &ClassVocabulary {
        &self.vocabulary
    }

    pub fn voting(&self) -> MajorityVoting {
        MajorityVoting::new(self.vote_min, self.count_conf_min)
    }

    pub fn reaper(&self) -> StaleTrackReaper {
        StaleTrackReaper::new(self.max_idle_frames)
    }
}

use itertools::Itertools;
use std::cmp::Ordering;

/// Default minimal amount of per-frame votes before a class is confirmed
pub const DEFAULT_VOTE_MIN: usize = 3;

/// Default minimal top confidence before a class is confirmed
pub const DEFAULT_COUNT_CONF_MIN: f32 = 0.25;

#[derive(Clone, Debug, PartialEq, Eq)]
struct VoteEntry {
    label: String,
    votes: usize,
    /// Sequence number of the vote that brought the entry to its current count
    settled_at: usize,
}

/// Per-track histogram of per-frame class observations.
///
/// Besides the counts it remembers when every label reached its current count, so that ties
/// are broken in favor of the label that got there first.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassVotes {
    entries: Vec<VoteEntry>,
    total: usize,
}

impl ClassVotes {
    pub fn add(&mut self, label: &str) {
        self.total += 1;
        let seq = self.total;
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(e) => {
                e.votes += 1;
                e.settled_at = seq;
            }
            None => self.entries.push(VoteEntry {
                label: label.to_string(),
                votes: 1,
                settled_at: seq,
            }),
        }
    }

    /// Votes across all labels
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn get(&self, label: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.votes)
            .unwrap_or(0)
    }

    fn rank(l: &VoteEntry, r: &VoteEntry) -> Ordering {
        r.votes.cmp(&l.votes).then(l.settled_at.cmp(&r.settled_at))
    }

    /// The label with most votes, ties go to the label that reached its count first
    ///
    pub fn leader(&self) -> Option<&str> {
        self.entries
            .iter()
            .min_by(|l, r| Self::rank(l, r))
            .map(|e| e.label.as_str())
    }

    /// Labels with their votes ordered the same way [ClassVotes::leader] picks the winner
    ///
    pub fn ranking(&self) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .sorted_by(|l, r| Self::rank(l, r))
            .map(|e| (e.label.as_str(), e.votes))
            .collect()
    }
}

/// Majority voting that confirms a track class.
///
/// A label is confirmed only when the track gathered at least `min_votes` votes across all
/// labels and its best observed confidence reached `min_confidence`.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MajorityVoting {
    min_votes: usize,
    min_confidence: f32,
}

impl Default for MajorityVoting {
    fn default() -> Self {
        Self::new(DEFAULT_VOTE_MIN, DEFAULT_COUNT_CONF_MIN)
    }
}

impl MajorityVoting {
    /// Constructs new engine
    ///
    /// # Arguments
    /// * `min_votes` - minimal amount of votes required to confirm the class
    /// * `min_confidence` - minimal top confidence of the track
    ///
    pub fn new(min_votes: usize, min_confidence: f32) -> Self {
        Self {
            min_votes,
            min_confidence,
        }
    }

    pub fn min_votes(&self) -> usize {
        self.min_votes
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn resolve<'a>(&self, votes: &'a ClassVotes, top_confidence: f32) -> Option<&'a str> {
        if votes.total() < self.min_votes || top_confidence < self.min_confidence {
            return None;
        }
        votes.leader()
    }
}

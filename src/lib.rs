use thiserror::Error;

/// Counting boundary and the pure crossing decision made against it
///
pub mod line;

/// Per-track memory, class voting and the event notifier
///
pub mod track;

/// Counting session (aggregator) and the per-stream counter that drives the whole pipeline
///
pub mod counter;

/// Stale track eviction policy
///
pub mod reaper;

/// Several isolated counters processed in parallel
///
pub mod batch;

/// Class vocabulary of the detector model
///
pub mod vocabulary;

/// Detector/tracker input records and their validation
///
pub mod detection;

/// Bounding boxes and anchors
///
pub mod utils;

/// Commonly used types
///
pub mod prelude;

/// Track generators for tests and demos
///
pub mod test_stuff;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Errors {
    #[error("Line endpoints must differ, got ({0}, {1}) twice.")]
    DegenerateLine(f32, f32),
    #[error("Line margin must be a finite non-negative number, got {0}.")]
    NegativeMargin(f32),
    #[error("Detection has no positive track id.")]
    MissingTrackId,
    #[error("Confidence {0} is outside of [0, 1].")]
    ConfidenceOutOfRange(f32),
    #[error("Bounding box ({0}, {1}, {2}, {3}) is degenerate.")]
    DegenerateBox(f32, f32, f32, f32),
    #[error("Track {0} is reported more than once in the same frame.")]
    DuplicateTrackInFrame(u64),
    #[error("Missing track {0}.")]
    MissingTrack(u64),
    #[error("Ratio {0} is outside of [0, 1].")]
    InvalidRatio(f32),
}

pub(crate) const EPS: f32 = 0.00001;

#[inline]
pub fn current_time_ms() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

use crate::counter;
use crate::track;

pub use counter::builder::CounterBuilder;
pub use counter::options::{CounterOptions, DeadZonePolicy, ResetPolicy};
pub use counter::session::CountingSession;
pub use counter::{CountsSnapshot, CrossingEvent, LineCrossingCounter};
pub use track::notify::{ChannelNotifier, CrossingNotifier, NoopNotifier};
pub use track::store::TrackStore;

pub use crate::batch::{BatchRecords, FrameBatchRequest, MultiStreamCounter};
pub use crate::detection::Detection;
pub use crate::line::{CrossingDirection, DirectionFilter, LineGeometry, Side};
pub use crate::utils::bbox::{Anchor, BoundingBox};
pub use crate::vocabulary::ClassVocabulary;

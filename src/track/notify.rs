use crate::counter::CrossingEvent;
use crossbeam::channel::{Receiver, Sender};
use log::debug;

/// Sink for crossing events emitted by a counter, called under the counter lock
///
pub trait CrossingNotifier: Send + Sync {
    fn send(&mut self, event: &CrossingEvent);
}

#[derive(Default, Clone, Debug)]
pub struct NoopNotifier;

impl CrossingNotifier for NoopNotifier {
    fn send(&mut self, _event: &CrossingEvent) {}
}

/// Notifier that forwards events to a channel; the receiver is the event stream for
/// persistence or transport
///
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    sender: Sender<CrossingEvent>,
}

impl ChannelNotifier {
    pub fn unbounded() -> (Self, Receiver<CrossingEvent>) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        (Self { sender }, receiver)
    }

    /// Bounded channel; events are dropped (and logged) when the consumer lags behind
    ///
    pub fn bounded(cap: usize) -> (Self, Receiver<CrossingEvent>) {
        let (sender, receiver) = crossbeam::channel::bounded(cap);
        (Self { sender }, receiver)
    }
}

impl CrossingNotifier for ChannelNotifier {
    fn send(&mut self, event: &CrossingEvent) {
        if let Err(e) = self.sender.try_send(event.clone()) {
            debug!(
                "Crossing event for track {} was not delivered. Error is: {:?}",
                event.track_id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::counter::CrossingEvent;
    use crate::line::CrossingDirection;
    use crate::track::notify::{ChannelNotifier, CrossingNotifier};
    use crate::utils::bbox::BoundingBox;

    fn event(track_id: u64) -> CrossingEvent {
        CrossingEvent {
            track_id,
            class_label: "bus".into(),
            confidence: 0.8,
            direction: CrossingDirection::Up,
            bbox: BoundingBox::new(0.0, 0.0, 5.0, 5.0),
            tick: 3,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn channel() {
        let (mut n, rx) = ChannelNotifier::unbounded();
        n.send(&event(1));
        n.send(&event(2));
        assert_eq!(rx.try_iter().map(|e| e.track_id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn bounded_drops_when_full_or_closed() {
        let (mut n, rx) = ChannelNotifier::bounded(1);
        n.send(&event(1));
        n.send(&event(2));
        assert_eq!(rx.try_iter().map(|e| e.track_id).collect::<Vec<_>>(), vec![1]);
        drop(rx);
        n.send(&event(3));
    }
}

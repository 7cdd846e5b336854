use crate::counter::{CountsSnapshot, CrossingEvent, LineCrossingCounter};
use crate::detection::Detection;
use crate::track::notify::{CrossingNotifier, NoopNotifier};
use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type BatchRecords<T> = HashMap<u64, Vec<T>>;
pub type StreamEvents = (u64, Vec<CrossingEvent>);

/// Next frame of several streams, one entry per stream id
///
#[derive(Debug, Clone)]
pub struct FrameBatchRequest {
    batch: BatchRecords<Detection>,
    sender: Sender<StreamEvents>,
    batch_size: Arc<Mutex<usize>>,
}

/// Receiving side of a [FrameBatchRequest], yields the events of every stream in the batch
///
#[derive(Clone, Debug)]
pub struct FrameBatchResult {
    receiver: Receiver<StreamEvents>,
    batch_size: Arc<Mutex<usize>>,
}

impl FrameBatchResult {
    pub fn ready(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Blocks until the events of the next stream arrive, `None` once every stream is delivered
    ///
    pub fn get(&self) -> Option<StreamEvents> {
        self.receiver.recv().ok()
    }

    /// Number of stream results to expect. Before processing it counts every stream added to the
    /// request; once processed it is the number of streams actually delivered, unknown streams
    /// excluded.
    ///
    pub fn batch_size(&self) -> usize {
        *self.batch_size.lock().unwrap()
    }
}

impl FrameBatchRequest {
    pub fn new() -> (Self, FrameBatchResult) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let batch_size = Arc::new(Mutex::new(0));
        (
            Self {
                batch: BatchRecords::default(),
                sender,
                batch_size: batch_size.clone(),
            },
            FrameBatchResult {
                receiver,
                batch_size,
            },
        )
    }

    pub(crate) fn send(&self, res: StreamEvents) -> bool {
        let res = self.sender.send(res);
        if let Err(e) = res {
            debug!(
                "Error occurred when sending events to the batch result object. Error is: {:?}",
                e
            );
            false
        } else {
            true
        }
    }

    pub fn batch_size(&self) -> usize {
        *self.batch_size.lock().unwrap()
    }

    /// Adds the detection to the frame of the stream
    ///
    pub fn add(&mut self, stream_id: u64, elt: Detection) {
        self.batch.entry(stream_id).or_default().push(elt);
        self.update_size();
    }

    /// Registers a frame of the stream without any detections
    ///
    pub fn add_empty(&mut self, stream_id: u64) {
        self.batch.entry(stream_id).or_default();
        self.update_size();
    }

    fn update_size(&self) {
        self.set_batch_size(self.batch.len());
    }

    pub(crate) fn set_batch_size(&self, size: usize) {
        let mut batch_size = self.batch_size.lock().unwrap();
        *batch_size = size;
    }

    pub fn get_batch(&self) -> &BatchRecords<Detection> {
        &self.batch
    }
}

/// Set of isolated per-stream counters.
///
/// The frames of different streams are processed in parallel on a dedicated pool; each stream
/// still processes its own frames strictly one at a time.
///
pub struct MultiStreamCounter<N = NoopNotifier>
where
    N: CrossingNotifier,
{
    streams: HashMap<u64, LineCrossingCounter<N>>,
    pool: ThreadPool,
}

impl<N> MultiStreamCounter<N>
where
    N: CrossingNotifier,
{
    /// Creates the counter set
    ///
    /// # Parameters
    /// * `threads` - size of the processing pool
    ///
    pub fn new(threads: usize) -> Result<Self> {
        assert!(threads > 0, "The pool must have at least one thread");
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self {
            streams: HashMap::default(),
            pool,
        })
    }

    /// Pool size is set to the number of cpu cores
    ///
    pub fn with_default_threads() -> Result<Self> {
        Self::new(num_cpus::get())
    }

    /// Registers the stream, returns the counter it replaces
    ///
    pub fn add_stream(
        &mut self,
        stream_id: u64,
        counter: LineCrossingCounter<N>,
    ) -> Option<LineCrossingCounter<N>> {
        self.streams.insert(stream_id, counter)
    }

    pub fn remove_stream(&mut self, stream_id: u64) -> Option<LineCrossingCounter<N>> {
        self.streams.remove(&stream_id)
    }

    pub fn stream(&self, stream_id: u64) -> Option<&LineCrossingCounter<N>> {
        self.streams.get(&stream_id)
    }

    pub fn stream_ids(&self) -> Vec<u64> {
        self.streams.keys().copied().collect()
    }

    /// Processes one frame per stream present in the batch. Unknown streams are skipped.
    ///
    pub fn process_batch(&self, batch: &BatchRecords<Detection>) -> BatchRecords<CrossingEvent> {
        self.pool.install(|| {
            batch
                .par_iter()
                .filter_map(|(stream_id, detections)| match self.streams.get(stream_id) {
                    Some(counter) => Some((*stream_id, counter.process_frame(detections))),
                    None => {
                        warn!("Frame of unknown stream {} is skipped", stream_id);
                        None
                    }
                })
                .collect()
        })
    }

    /// Processes the request and delivers the events of every stream to its result object
    ///
    pub fn process_request(&self, request: FrameBatchRequest) {
        let results = self.process_batch(request.get_batch());
        request.set_batch_size(results.len());
        for (stream_id, events) in results {
            request.send((stream_id, events));
        }
    }

    pub fn snapshots(&self) -> HashMap<u64, CountsSnapshot> {
        self.streams
            .iter()
            .map(|(stream_id, counter)| (*stream_id, counter.snapshot()))
            .collect()
    }
}

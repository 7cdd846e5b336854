use crate::counter::options::CounterOptions;
use crate::counter::LineCrossingCounter;
use crate::line::LineGeometry;
use crate::track::notify::{CrossingNotifier, NoopNotifier};

/// Builder for LineCrossingCounter
///
pub struct CounterBuilder<N = NoopNotifier>
where
    N: CrossingNotifier,
{
    line: LineGeometry,
    opts: Option<CounterOptions>,
    notifier: N,
}

impl CounterBuilder<NoopNotifier> {
    /// Creates a new builder
    ///
    /// # Parameters
    /// * `line` - the counting line, may be replaced later with [LineCrossingCounter::set_line]
    ///
    pub fn new(line: LineGeometry) -> Self {
        Self {
            line,
            opts: None,
            notifier: NoopNotifier,
        }
    }
}

impl<N> CounterBuilder<N>
where
    N: CrossingNotifier,
{
    /// Sets the counter options, defaults are used otherwise
    ///
    pub fn options(mut self, opts: CounterOptions) -> Self {
        assert!(
            self.opts.is_none(),
            "The method `options` must be called once."
        );
        self.opts = Some(opts);
        self
    }

    /// Sets the notifier object to use
    ///
    pub fn notifier<M: CrossingNotifier>(self, notifier: M) -> CounterBuilder<M> {
        CounterBuilder {
            line: self.line,
            opts: self.opts,
            notifier,
        }
    }

    /// Builds the counter
    ///
    pub fn build(self) -> LineCrossingCounter<N> {
        LineCrossingCounter::with_notifier(self.line, self.opts.unwrap_or_default(), self.notifier)
    }
}

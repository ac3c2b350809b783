//! Cooperative suspend/resume protocol shared by generation and pathfinding.
//!
//! Both algorithms expose a run object that performs one unit of underlying work per call and
//! yields an observable snapshot, so an animation driver can interleave drawing with algorithm
//! progress. A run is finite and not restartable in place; replaying requires constructing a
//! fresh run. Consuming a run to exhaustion leaves behind exactly the state the corresponding
//! one-shot call would have produced.

/// A finite, resumable sequence of algorithm steps.
///
/// Each call to [`advance`](Stepwise::advance) performs one unit of work and returns the snapshot
/// it produced, or `None` once the sequence is exhausted. Run objects own all of their loop-local
/// state, so multiple independent runs can coexist safely.
pub trait Stepwise {
    /// Snapshot yielded after each unit of work.
    type Step;

    /// Performs one unit of work and returns its snapshot, or `None` when finished.
    fn advance(&mut self) -> Option<Self::Step>;
}

/// Throttling adapter that batches several units of work into one observed step.
///
/// A caller animating at a fixed frame rate can wrap a run in a tempo to control how much
/// algorithm progress happens per frame. Only the last snapshot of each batch is surfaced; the
/// deterministic end state is unaffected because the underlying run performs the identical work.
pub struct Tempo<S> {
    /// The throttled run.
    inner: S,
    /// Units of underlying work per observed step, at least one.
    units: usize,
}

impl<S: Stepwise> Tempo<S> {
    /// Wraps a run so that each observed step advances it by `units` units of work.
    ///
    /// A `units` of zero is treated as one.
    #[must_use]
    pub fn new(inner: S, units: usize) -> Self {
        Self {
            inner,
            units: units.max(1),
        }
    }
}

impl<S: Stepwise> Stepwise for Tempo<S> {
    type Step = S::Step;

    fn advance(&mut self) -> Option<Self::Step> {
        let mut last = None;
        for _ in 0..self.units {
            if let Some(step) = self.inner.advance() {
                last = Some(step);
            } else {
                break;
            }
        }
        last
    }
}

/// Iterator adapter over any stepwise run.
///
/// This wrapper lets callers drive a run with ordinary iterator combinators or a `for` loop
/// instead of calling [`advance`](Stepwise::advance) by hand.
pub struct Steps<S>(S);

impl<S: Stepwise> Steps<S> {
    /// Wraps a run into an iterator over its snapshots.
    #[must_use]
    pub const fn new(run: S) -> Self {
        Self(run)
    }
}

impl<S: Stepwise> Iterator for Steps<S> {
    type Item = S::Step;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.advance()
    }
}

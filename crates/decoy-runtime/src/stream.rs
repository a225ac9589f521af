//! Infinite batch streams.
//!
//! [`OneShotStream`] turns a finite [`BatchSource`] into an endless one by
//! resetting it whenever a pass ends. [`BidirectionalStream`] alternates
//! two of them: calls 1, 3, 5, ... draw from the first stream and calls
//! 2, 4, 6, ... from the second.

use crate::loader::BatchSource;
use decoy_core::error::{DecoyError, Result};
use tracing::debug;

/// A batch source restarted transparently on exhaustion.
pub struct OneShotStream<S: BatchSource> {
    source: S,
    restarts: u64,
}

impl<S: BatchSource> OneShotStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            restarts: 0,
        }
    }

    /// How many times the source has been reset.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Next batch, restarting the source if the current pass is over.
    ///
    /// Fails with [`DecoyError::EmptySource`] if a fresh pass yields nothing.
    pub fn next_batch(&mut self) -> Result<S::Batch> {
        if let Some(batch) = self.source.next_batch() {
            return batch;
        }

        self.source.reset();
        self.restarts += 1;
        debug!(restarts = self.restarts, "batch source restarted");

        self.source.next_batch().unwrap_or(Err(DecoyError::EmptySource))
    }
}

impl<S: BatchSource> Iterator for OneShotStream<S> {
    type Item = Result<S::Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}

/// Strict alternation between two endless streams.
pub struct BidirectionalStream<A, B>
where
    A: BatchSource,
    B: BatchSource<Batch = A::Batch>,
{
    first: OneShotStream<A>,
    second: OneShotStream<B>,
    step: u64,
}

impl<A, B> BidirectionalStream<A, B>
where
    A: BatchSource,
    B: BatchSource<Batch = A::Batch>,
{
    pub fn new(first: A, second: B) -> Self {
        Self {
            first: OneShotStream::new(first),
            second: OneShotStream::new(second),
            step: 0,
        }
    }

    /// Number of batches handed out so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn first(&self) -> &OneShotStream<A> {
        &self.first
    }

    pub fn second(&self) -> &OneShotStream<B> {
        &self.second
    }

    pub fn next_batch(&mut self) -> Result<A::Batch> {
        self.step += 1;
        if self.step % 2 == 1 {
            self.first.next_batch()
        } else {
            self.second.next_batch()
        }
    }
}

impl<A, B> Iterator for BidirectionalStream<A, B>
where
    A: BatchSource,
    B: BatchSource<Batch = A::Batch>,
{
    type Item = Result<A::Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}

use std::collections::HashSet;

use thiserror::Error;

use crate::shuffle::{Seed, permute};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueueError {
    #[error("persisted queue repeats index {index}")]
    DuplicateIndex { index: u32 },
}

/// Persisted stack of not-yet-presented pair indices for one source file.
///
/// A fresh queue holds the seeded permutation of `[0, n)`; every question
/// request pops from the end and the shortened queue is written back, so the
/// presentation order is resumable across sessions and never repeats an
/// index. Entries are only put back by a full reset, which discards the
/// queue entirely.
///
/// The queue does not revalidate against the current pair count: when the
/// backing file shrinks out of band, stale entries surface at pop time and
/// the caller decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingQueue {
    indices: Vec<u32>,
}

impl RemainingQueue {
    /// Build the initial queue for a source: the seeded permutation of all
    /// `pair_count` indices.
    #[must_use]
    pub fn fresh(pair_count: u32, seed: Seed) -> Self {
        Self {
            indices: permute(pair_count, seed),
        }
    }

    /// Rehydrate a queue from persisted indices.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::DuplicateIndex` when the stored sequence repeats
    /// an index, which would break the never-repeat guarantee.
    pub fn from_persisted(indices: Vec<u32>) -> Result<Self, QueueError> {
        let mut seen = HashSet::with_capacity(indices.len());
        for &index in &indices {
            if !seen.insert(index) {
                return Err(QueueError::DuplicateIndex { index });
            }
        }
        Ok(Self { indices })
    }

    /// Pop the next pair index, or `None` when the queue is exhausted.
    pub fn pop(&mut self) -> Option<u32> {
        self.indices.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_queue_matches_permutation() {
        let seed = Seed::new(42).unwrap();
        let queue = RemainingQueue::fresh(5, seed);
        assert_eq!(queue.as_slice(), permute(5, seed).as_slice());
    }

    #[test]
    fn pops_consume_the_permutation_in_reverse() {
        let seed = Seed::new(42).unwrap();
        let order = permute(4, seed);
        let mut queue = RemainingQueue::fresh(4, seed);

        let mut popped = Vec::new();
        while let Some(index) = queue.pop() {
            popped.push(index);
        }

        let mut reversed = order;
        reversed.reverse();
        assert_eq!(popped, reversed);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn exactly_n_pops_exhaust_the_queue() {
        let seed = Seed::new(7).unwrap();
        let mut queue = RemainingQueue::fresh(3, seed);
        for remaining in [2_usize, 1, 0] {
            assert!(queue.pop().is_some());
            assert_eq!(queue.len(), remaining);
        }
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn from_persisted_rejects_duplicates() {
        let err = RemainingQueue::from_persisted(vec![2, 0, 2]).unwrap_err();
        assert_eq!(err, QueueError::DuplicateIndex { index: 2 });
    }

    #[test]
    fn from_persisted_keeps_order() {
        let queue = RemainingQueue::from_persisted(vec![2, 0, 1]).unwrap();
        assert_eq!(queue.as_slice(), &[2, 0, 1]);
    }
}

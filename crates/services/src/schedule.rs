use std::sync::Arc;

use quiz_core::model::SourceId;
use quiz_core::queue::RemainingQueue;
use quiz_core::shuffle::Seed;
use storage::repository::ScheduleRepository;

use crate::error::ScheduleError;

/// One drawn question slot: the original pair index and how many indices are
/// still queued after the draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub index: u32,
    pub remaining: usize,
}

/// The shuffled-remainder scheduler over an injected state repository.
///
/// Per source file it owns a persisted seed and a persisted remaining-index
/// queue. The queue is created lazily from the seeded permutation of
/// `[0, pair_count)` and then only ever shrinks; one `next` call pops one
/// index and writes the shortened queue back, so presentation order survives
/// process restarts without repeating a question.
#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
}

impl ScheduleService {
    #[must_use]
    pub fn new(repo: Arc<dyn ScheduleRepository>) -> Self {
        Self { repo }
    }

    async fn seed_for(&self, source: &SourceId) -> Result<Seed, ScheduleError> {
        if let Some(seed) = self.repo.seed(source).await? {
            return Ok(seed);
        }
        let seed = Seed::generate();
        self.repo.put_seed(source, seed).await?;
        Ok(seed)
    }

    /// Return the persisted queue for a source, creating and persisting the
    /// initial seeded permutation when absent.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` on storage failures or a structurally corrupt
    /// persisted queue.
    pub async fn ensure_queue(
        &self,
        source: &SourceId,
        pair_count: u32,
    ) -> Result<RemainingQueue, ScheduleError> {
        if let Some(indices) = self.repo.remaining(source).await? {
            return Ok(RemainingQueue::from_persisted(indices)?);
        }

        let seed = self.seed_for(source).await?;
        let queue = RemainingQueue::fresh(pair_count, seed);
        self.repo.put_remaining(source, queue.as_slice()).await?;
        Ok(queue)
    }

    /// Pop the next pair index for a source and persist the shortened queue.
    ///
    /// Returns `None` when the queue is exhausted, which is a normal
    /// terminal state rather than an error.
    /// Entries that no longer fit in `[0, pair_count)` (the backing file
    /// shrank out of band) are discarded with a warning and the pop moves on.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` on storage failures or a structurally corrupt
    /// persisted queue.
    pub async fn next(
        &self,
        source: &SourceId,
        pair_count: u32,
    ) -> Result<Option<Draw>, ScheduleError> {
        let mut queue = self.ensure_queue(source, pair_count).await?;

        let mut drawn = None;
        while let Some(index) = queue.pop() {
            if index < pair_count {
                drawn = Some(index);
                break;
            }
            tracing::warn!(%source, index, pair_count, "dropping stale queue entry");
        }
        self.repo.put_remaining(source, queue.as_slice()).await?;

        Ok(drawn.map(|index| Draw {
            index,
            remaining: queue.len(),
        }))
    }

    /// Delete the persisted queue only; the seed survives, so the next
    /// `ensure_queue` regenerates the identical permutation.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` on storage failures.
    pub async fn reset(&self, source: &SourceId) -> Result<(), ScheduleError> {
        self.repo.delete_remaining(source).await?;
        Ok(())
    }

    /// Delete queue and seed, so the next `ensure_queue` mints a fresh seed
    /// and a different permutation.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` on storage failures.
    pub async fn clear(&self, source: &SourceId) -> Result<(), ScheduleError> {
        self.repo.clear(source).await?;
        Ok(())
    }

    /// Length of the persisted queue, or `None` when no queue exists yet for
    /// this source. Used by progress displays without loading the file.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` on storage failures.
    pub async fn remaining_count(&self, source: &SourceId) -> Result<Option<usize>, ScheduleError> {
        Ok(self.repo.remaining(source).await?.map(|q| q.len()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::shuffle::permute;
    use storage::repository::InMemoryScheduleRepository;

    fn service() -> (ScheduleService, Arc<InMemoryScheduleRepository>) {
        let repo = Arc::new(InMemoryScheduleRepository::new());
        (ScheduleService::new(repo.clone()), repo)
    }

    fn source(name: &str) -> SourceId {
        SourceId::parse(name).unwrap()
    }

    #[tokio::test]
    async fn n_draws_exhaust_the_queue() {
        let (svc, _) = service();
        let pairs = source("pairs-1.json");

        let mut drawn = Vec::new();
        for expected_remaining in [2_usize, 1, 0] {
            let draw = svc.next(&pairs, 3).await.unwrap().unwrap();
            assert_eq!(draw.remaining, expected_remaining);
            drawn.push(draw.index);
        }

        assert_eq!(svc.next(&pairs, 3).await.unwrap(), None);

        drawn.sort_unstable();
        assert_eq!(drawn, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn draws_replay_the_seeded_permutation_in_reverse() {
        let (svc, repo) = service();
        let pairs = source("pairs-1.json");
        let seed = Seed::new(42).unwrap();
        repo.put_seed(&pairs, seed).await.unwrap();

        let mut order = permute(5, seed);
        order.reverse();

        for expected in order {
            let draw = svc.next(&pairs, 5).await.unwrap().unwrap();
            assert_eq!(draw.index, expected);
        }
    }

    #[tokio::test]
    async fn queue_survives_a_new_service_over_the_same_repo() {
        let repo = Arc::new(InMemoryScheduleRepository::new());
        let pairs = source("pairs-1.json");

        let first = ScheduleService::new(repo.clone());
        let a = first.next(&pairs, 4).await.unwrap().unwrap();

        let second = ScheduleService::new(repo.clone());
        let b = second.next(&pairs, 4).await.unwrap().unwrap();

        assert_ne!(a.index, b.index);
        assert_eq!(b.remaining, 2);
    }

    #[tokio::test]
    async fn reset_reproduces_the_same_order_under_the_same_seed() {
        let (svc, _) = service();
        let pairs = source("pairs-1.json");

        let mut before = Vec::new();
        while let Some(draw) = svc.next(&pairs, 4).await.unwrap() {
            before.push(draw.index);
        }

        svc.reset(&pairs).await.unwrap();

        let mut after = Vec::new();
        while let Some(draw) = svc.next(&pairs, 4).await.unwrap() {
            after.push(draw.index);
        }

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn clear_drops_seed_and_queue() {
        let (svc, repo) = service();
        let pairs = source("pairs-1.json");

        svc.ensure_queue(&pairs, 8).await.unwrap();
        assert!(repo.seed(&pairs).await.unwrap().is_some());

        svc.clear(&pairs).await.unwrap();
        assert_eq!(repo.seed(&pairs).await.unwrap(), None);
        assert_eq!(repo.remaining(&pairs).await.unwrap(), None);

        svc.ensure_queue(&pairs, 8).await.unwrap();
        assert!(repo.seed(&pairs).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn stale_indices_are_skipped() {
        let (svc, repo) = service();
        let pairs = source("pairs-1.json");

        // Queue built when the file had 5 pairs; the file has since shrunk to 2.
        repo.put_remaining(&pairs, &[1, 4, 3]).await.unwrap();

        let draw = svc.next(&pairs, 2).await.unwrap().unwrap();
        assert_eq!(draw.index, 1);
        assert_eq!(draw.remaining, 0);
        assert_eq!(svc.next(&pairs, 2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn remaining_count_reads_without_creating_state() {
        let (svc, _) = service();
        let pairs = source("pairs-1.json");

        assert_eq!(svc.remaining_count(&pairs).await.unwrap(), None);

        svc.ensure_queue(&pairs, 6).await.unwrap();
        assert_eq!(svc.remaining_count(&pairs).await.unwrap(), Some(6));

        svc.next(&pairs, 6).await.unwrap();
        assert_eq!(svc.remaining_count(&pairs).await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn sources_do_not_share_state() {
        let (svc, _) = service();
        let first = source("pairs-1.json");
        let second = source("pairs-2.json");

        svc.next(&first, 3).await.unwrap().unwrap();
        assert_eq!(svc.remaining_count(&second).await.unwrap(), None);
        assert_eq!(svc.remaining_count(&first).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn corrupt_queue_is_a_schedule_error() {
        let (svc, repo) = service();
        let pairs = source("pairs-1.json");
        repo.put_remaining(&pairs, &[1, 1]).await.unwrap();

        assert!(matches!(
            svc.next(&pairs, 3).await.unwrap_err(),
            ScheduleError::Queue(_)
        ));
    }
}

use core::mem;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result, Tag,
    mutex::{Mutex, MutexGuard},
    pool::{TagPool, shuffled::ShuffledState},
};

/// A lock-based pre-shuffled pool suitable for multi-threaded environments.
///
/// This pool wraps the shuffled partition in an [`Arc<Mutex<_>>`], allowing
/// safe shared use across threads. Cloning is cheap and shares the same
/// partition: two clones never hand out the same tag concurrently.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Flat acquire cost independent of occupancy
/// - ✅ Batch mode amortizes bulk acquisition ([`Self::try_batch`])
/// - ❌ Pays enumerate-and-shuffle startup cost
///
/// ## Recommended When
/// - Multiple threads acquire and release tags
/// - Many tags will be live at once, or the pool runs near exhaustion
///
/// ## See Also
/// - [`BasicShuffledPool`]
/// - [`LockScanPool`]
///
/// [`BasicShuffledPool`]: crate::BasicShuffledPool
/// [`LockScanPool`]: crate::LockScanPool
pub struct LockShuffledPool<ID>
where
    ID: Tag,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<ShuffledState<ID>>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<ShuffledState<ID>>>,
}

impl<ID> LockShuffledPool<ID>
where
    ID: Tag,
{
    /// Creates a pool with every tag available, in a freshly shuffled order.
    ///
    /// # Example
    /// ```
    /// use callsign::{Callsign, LockShuffledPool, TagPool};
    ///
    /// let pool = LockShuffledPool::<Callsign>::new();
    /// let tag = pool.try_acquire().unwrap();
    /// pool.try_release(tag).unwrap();
    /// ```
    pub fn new() -> Self {
        Self::from_state(ShuffledState::new())
    }

    /// Creates a pool whose available queue is exactly `tags`, in order.
    ///
    /// `tags` must contain every tag of the universe exactly once; this
    /// exists so tests and reproductions can pin the hand-out order instead
    /// of shuffling.
    pub fn from_ordered(tags: impl IntoIterator<Item = ID>) -> Self {
        Self::from_state(ShuffledState::from_ordered(tags))
    }

    fn from_state(state: ShuffledState<ID>) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(state))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Attempts to move one available tag to in-use.
    ///
    /// # Errors
    /// - [`Error::Exhausted`] if every tag in the universe is in use
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the lock (std mutex only)
    ///
    /// [`Error::Exhausted`]: crate::Error::Exhausted
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_acquire(&self) -> Result<ID> {
        let mut state = self.lock()?;
        state.acquire()
    }

    /// Attempts to move an in-use tag back to available.
    ///
    /// # Errors
    /// - [`Error::NotHeld`] if `tag` is not currently in use
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the lock (std mutex only)
    ///
    /// [`Error::NotHeld`]: crate::Error::NotHeld
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_release(&self, tag: ID) -> Result<()> {
        let mut state = self.lock()?;
        state.release(tag)
    }

    /// Returns the number of tags currently in use.
    ///
    /// A poisoned lock still guards a consistent count, so this reads
    /// through poisoning rather than failing.
    pub fn in_use(&self) -> usize {
        #[cfg(feature = "parking-lot")]
        {
            self.state.lock().in_use()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .in_use()
        }
    }

    /// Opens a batch scope for bulk acquisition.
    ///
    /// Within the scope, acquired tags are collected in a scratch buffer and
    /// merged into the sorted in-use index with a single sort when the guard
    /// drops. The final partition is identical to performing the same calls
    /// outside a batch; only the cost profile changes.
    ///
    /// The guard holds the mutex for its whole lifetime, so other threads
    /// (and other clones of this pool) block until the batch is dropped.
    ///
    /// # Errors
    /// Returns [`Error::LockPoisoned`] if another thread panicked while
    /// holding the lock (std mutex only).
    ///
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    ///
    /// # Example
    /// ```
    /// use callsign::{Callsign, LockShuffledPool, TagPool};
    ///
    /// let pool = LockShuffledPool::<Callsign>::new();
    /// let mut fleet = Vec::new();
    /// {
    ///     let mut batch = pool.try_batch().unwrap();
    ///     for _ in 0..1000 {
    ///         fleet.push(batch.try_acquire().unwrap());
    ///     }
    /// }
    /// assert_eq!(pool.in_use(), 1000);
    /// ```
    pub fn try_batch(&self) -> Result<LockBatch<'_, ID>> {
        Ok(LockBatch {
            state: self.lock()?,
            scratch: Vec::new(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ShuffledState<ID>>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<ID> Default for LockShuffledPool<ID>
where
    ID: Tag,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> Clone for LockShuffledPool<ID>
where
    ID: Tag,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<ID> TagPool<ID> for LockShuffledPool<ID>
where
    ID: Tag,
{
    fn try_acquire(&self) -> Result<ID> {
        self.try_acquire()
    }

    fn try_release(&self, tag: ID) -> Result<()> {
        self.try_release(tag)
    }

    fn in_use(&self) -> usize {
        self.in_use()
    }
}

/// A scoped batch over a [`LockShuffledPool`].
///
/// Holds the pool's lock for the duration of the scope; dropping the guard
/// merges everything acquired in the scope into the sorted in-use index in
/// one sort, then releases the lock.
#[must_use = "a batch does nothing until tags are acquired through it"]
pub struct LockBatch<'a, ID>
where
    ID: Tag,
{
    state: MutexGuard<'a, ShuffledState<ID>>,
    scratch: Vec<ID>,
}

impl<ID> LockBatch<'_, ID>
where
    ID: Tag,
{
    /// Attempts to move one available tag to in-use, deferring the sorted
    /// insert to the end of the batch.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] if every tag in the universe is in use.
    ///
    /// [`Error::Exhausted`]: crate::Error::Exhausted
    pub fn try_acquire(&mut self) -> Result<ID> {
        self.state.batch_acquire(&mut self.scratch)
    }

    /// Attempts to move an in-use tag back to available, whether it was
    /// acquired inside or outside this batch.
    ///
    /// # Errors
    /// Returns [`Error::NotHeld`] if `tag` is not currently in use.
    ///
    /// [`Error::NotHeld`]: crate::Error::NotHeld
    pub fn try_release(&mut self, tag: ID) -> Result<()> {
        self.state.batch_release(&mut self.scratch, tag)
    }
}

impl<ID> Drop for LockBatch<'_, ID>
where
    ID: Tag,
{
    fn drop(&mut self) {
        let scratch = mem::take(&mut self.scratch);
        self.state.absorb(scratch);
    }
}

use core::cell::{RefCell, RefMut};
use core::mem;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result, Tag,
    pool::{TagPool, shuffled::ShuffledState},
};

/// A non-concurrent pre-shuffled pool suitable for single-threaded
/// environments.
///
/// The universe is enumerated and shuffled once at construction, so acquire
/// is a queue pop plus one sorted insert regardless of occupancy, and
/// release stays O(log n). The trade is a fixed startup cost and holding the
/// whole universe in memory up front.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Flat acquire cost independent of occupancy
/// - ✅ Batch mode amortizes bulk acquisition ([`Self::batch`])
/// - ❌ Pays enumerate-and-shuffle startup cost
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - Many tags will be live at once, or the pool runs near exhaustion
/// - Construction happens rarely (e.g. once per process)
///
/// ## See Also
/// - [`LockShuffledPool`]
/// - [`BasicScanPool`]
///
/// [`LockShuffledPool`]: crate::LockShuffledPool
/// [`BasicScanPool`]: crate::BasicScanPool
pub struct BasicShuffledPool<ID>
where
    ID: Tag,
{
    state: RefCell<ShuffledState<ID>>,
}

impl<ID> BasicShuffledPool<ID>
where
    ID: Tag,
{
    /// Creates a pool with every tag available, in a freshly shuffled order.
    ///
    /// # Example
    /// ```
    /// use callsign::{BasicShuffledPool, Callsign, TagPool};
    ///
    /// let pool = BasicShuffledPool::<Callsign>::new();
    /// let tag = pool.try_acquire().unwrap();
    /// assert_eq!(pool.in_use(), 1);
    /// pool.try_release(tag).unwrap();
    /// ```
    pub fn new() -> Self {
        Self {
            state: RefCell::new(ShuffledState::new()),
        }
    }

    /// Creates a pool whose available queue is exactly `tags`, in order.
    ///
    /// `tags` must contain every tag of the universe exactly once; this
    /// exists so tests and reproductions can pin the hand-out order instead
    /// of shuffling.
    pub fn from_ordered(tags: impl IntoIterator<Item = ID>) -> Self {
        Self {
            state: RefCell::new(ShuffledState::from_ordered(tags)),
        }
    }

    /// Attempts to move one available tag to in-use.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] if every tag in the universe is in use.
    ///
    /// [`Error::Exhausted`]: crate::Error::Exhausted
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_acquire(&self) -> Result<ID> {
        self.state.borrow_mut().acquire()
    }

    /// Attempts to move an in-use tag back to available.
    ///
    /// # Errors
    /// Returns [`Error::NotHeld`] if `tag` is not currently in use.
    ///
    /// [`Error::NotHeld`]: crate::Error::NotHeld
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_release(&self, tag: ID) -> Result<()> {
        self.state.borrow_mut().release(tag)
    }

    /// Returns the number of tags currently in use.
    pub fn in_use(&self) -> usize {
        self.state.borrow().in_use()
    }

    /// Opens a batch scope for bulk acquisition.
    ///
    /// Within the scope, acquired tags are collected in a scratch buffer and
    /// merged into the sorted in-use index with a single sort when the guard
    /// drops. The final partition is identical to performing the same calls
    /// outside a batch; only the cost profile changes.
    ///
    /// The guard holds the pool's mutable borrow, so the pool itself cannot
    /// be touched while a batch is open.
    ///
    /// # Panics
    /// Panics if a batch is already open on this pool.
    ///
    /// # Example
    /// ```
    /// use callsign::{BasicShuffledPool, Callsign, TagPool};
    ///
    /// let pool = BasicShuffledPool::<Callsign>::new();
    /// let mut fleet = Vec::new();
    /// {
    ///     let mut batch = pool.batch();
    ///     for _ in 0..1000 {
    ///         fleet.push(batch.try_acquire().unwrap());
    ///     }
    /// }
    /// assert_eq!(pool.in_use(), 1000);
    /// ```
    pub fn batch(&self) -> Batch<'_, ID> {
        Batch {
            state: self.state.borrow_mut(),
            scratch: Vec::new(),
        }
    }
}

impl<ID> Default for BasicShuffledPool<ID>
where
    ID: Tag,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> TagPool<ID> for BasicShuffledPool<ID>
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

/// A scoped batch over a [`BasicShuffledPool`].
///
/// Dropping the guard merges everything acquired in the scope into the
/// sorted in-use index in one sort.
#[must_use = "a batch does nothing until tags are acquired through it"]
pub struct Batch<'a, ID>
where
    ID: Tag,
{
    state: RefMut<'a, ShuffledState<ID>>,
    scratch: Vec<ID>,
}

impl<ID> Batch<'_, ID>
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

impl<ID> Drop for Batch<'_, ID>
where
    ID: Tag,
{
    fn drop(&mut self) {
        let scratch = mem::take(&mut self.scratch);
        self.state.absorb(scratch);
    }
}

use core::cell::RefCell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    RandSource, Result, Tag,
    pool::{TagPool, scan::ScanState},
};

/// A non-concurrent generate-and-check pool suitable for single-threaded
/// environments.
///
/// Candidates are drawn at random over the full universe and re-drawn on
/// collision with the in-use set, so there is no startup cost: nothing is
/// enumerated ahead of time. The flip side is that acquire latency is
/// unbounded in expectation as occupancy approaches 100%.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Zero startup cost (no universe enumeration)
/// - ❌ Acquire degrades near exhaustion
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - Few tags are live at once relative to the universe size
/// - Startup latency matters more than steady-state latency
///
/// ## See Also
/// - [`LockScanPool`]
/// - [`BasicShuffledPool`]
///
/// [`LockScanPool`]: crate::LockScanPool
/// [`BasicShuffledPool`]: crate::BasicShuffledPool
pub struct BasicScanPool<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    state: RefCell<ScanState<ID, R>>,
}

impl<ID, R> BasicScanPool<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    /// Creates an empty pool (every tag available) drawing candidates from
    /// `rng`.
    ///
    /// # Example
    /// ```
    /// use callsign::{BasicScanPool, Callsign, TagPool, ThreadRandom};
    ///
    /// let pool = BasicScanPool::<Callsign, _>::new(ThreadRandom);
    /// let tag = pool.try_acquire().unwrap();
    /// assert_eq!(pool.in_use(), 1);
    /// pool.try_release(tag).unwrap();
    /// ```
    pub fn new(rng: R) -> Self {
        Self {
            state: RefCell::new(ScanState::new(rng)),
        }
    }

    /// Attempts to move one available tag to in-use.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] if every tag in the universe is in use.
    /// The check happens before any drawing, so a full pool fails
    /// immediately instead of looping.
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
}

impl<ID, R> TagPool<ID> for BasicScanPool<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
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

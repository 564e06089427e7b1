use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    RandSource, Result, Tag,
    mutex::Mutex,
    pool::{TagPool, scan::ScanState},
};

/// A lock-based generate-and-check pool suitable for multi-threaded
/// environments.
///
/// This pool wraps the in-use index in an [`Arc<Mutex<_>>`], allowing safe
/// shared use across threads. Cloning is cheap and shares the same
/// partition: two clones never hand out the same tag concurrently.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Zero startup cost (no universe enumeration)
/// - ❌ Acquire degrades near exhaustion
///
/// ## Recommended When
/// - Multiple threads acquire and release tags
/// - Few tags are live at once relative to the universe size
///
/// ## See Also
/// - [`BasicScanPool`]
/// - [`LockShuffledPool`]
///
/// [`BasicScanPool`]: crate::BasicScanPool
/// [`LockShuffledPool`]: crate::LockShuffledPool
pub struct LockScanPool<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<ScanState<ID, R>>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<ScanState<ID, R>>>,
}

impl<ID, R> LockScanPool<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    /// Creates an empty pool (every tag available) drawing candidates from
    /// `rng`.
    ///
    /// # Example
    /// ```
    /// use callsign::{Callsign, LockScanPool, TagPool, ThreadRandom};
    ///
    /// let pool = LockScanPool::<Callsign, _>::new(ThreadRandom);
    /// let tag = pool.try_acquire().unwrap();
    /// pool.try_release(tag).unwrap();
    /// ```
    pub fn new(rng: R) -> Self {
        let state = ScanState::new(rng);
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
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
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
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
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
}

impl<ID, R> Clone for LockScanPool<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<ID, R> TagPool<ID> for LockScanPool<ID, R>
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

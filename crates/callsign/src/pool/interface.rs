use crate::{Result, Tag};
use std::rc::Rc;
use std::sync::Arc;

/// A minimal interface for pools that hand out exclusive tags.
///
/// A pool partitions a [`Tag`] universe into two disjoint sets, *available*
/// and *in-use*. [`TagPool::try_acquire`] moves one tag from available to
/// in-use; [`TagPool::try_release`] moves it back. No tag is ever held by two
/// callers at once, and the union of the two sets is always the whole
/// universe.
///
/// Operations never block: acquiring from an exhausted pool fails
/// immediately with [`Error::Exhausted`] rather than waiting for a release.
///
/// [`Error::Exhausted`]: crate::Error::Exhausted
pub trait TagPool<ID>
where
    ID: Tag,
{
    /// Moves one available tag to in-use and returns it.
    ///
    /// # Errors
    /// - [`Error::Exhausted`] if every tag in the universe is in use. This
    ///   is terminal for the call: the pool never retries internally since
    ///   there is no more capacity by definition.
    /// - [`Error::LockPoisoned`] for lock-based pools using a std mutex.
    ///
    /// [`Error::Exhausted`]: crate::Error::Exhausted
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn try_acquire(&self) -> Result<ID>;

    /// Moves an in-use tag back to available.
    ///
    /// # Errors
    /// - [`Error::NotHeld`] if `tag` is not currently in use. A bad release
    ///   is a caller contract violation and is always reported; it is never
    ///   a silent no-op.
    /// - [`Error::LockPoisoned`] for lock-based pools using a std mutex.
    ///
    /// [`Error::NotHeld`]: crate::Error::NotHeld
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn try_release(&self, tag: ID) -> Result<()>;

    /// Returns the number of tags currently in use.
    fn in_use(&self) -> usize;

    /// Returns the total number of tags in the universe.
    fn capacity(&self) -> usize {
        ID::UNIVERSE as usize
    }

    /// Returns the number of tags currently available.
    fn available(&self) -> usize {
        self.capacity() - self.in_use()
    }

    /// Returns `true` if no tags remain available.
    fn is_exhausted(&self) -> bool {
        self.available() == 0
    }
}

// Pools are usually shared by handle: holders receive `&P`, `Rc<P>`, or
// `Arc<P>` rather than owning the partition themselves.
impl<ID, P> TagPool<ID> for &P
where
    ID: Tag,
    P: TagPool<ID> + ?Sized,
{
    fn try_acquire(&self) -> Result<ID> {
        (**self).try_acquire()
    }

    fn try_release(&self, tag: ID) -> Result<()> {
        (**self).try_release(tag)
    }

    fn in_use(&self) -> usize {
        (**self).in_use()
    }
}

impl<ID, P> TagPool<ID> for Rc<P>
where
    ID: Tag,
    P: TagPool<ID> + ?Sized,
{
    fn try_acquire(&self) -> Result<ID> {
        (**self).try_acquire()
    }

    fn try_release(&self, tag: ID) -> Result<()> {
        (**self).try_release(tag)
    }

    fn in_use(&self) -> usize {
        (**self).in_use()
    }
}

impl<ID, P> TagPool<ID> for Arc<P>
where
    ID: Tag,
    P: TagPool<ID> + ?Sized,
{
    fn try_acquire(&self) -> Result<ID> {
        (**self).try_acquire()
    }

    fn try_release(&self, tag: ID) -> Result<()> {
        (**self).try_release(tag)
    }

    fn in_use(&self) -> usize {
        (**self).in_use()
    }
}

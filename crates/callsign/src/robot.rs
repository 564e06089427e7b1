use crate::{Result, Tag, TagPool};

/// A holder that owns exactly one tag from an injected pool.
///
/// A `Robot` acquires its tag at construction and releases it when dropped.
/// The pool is passed in as a handle (`&P`, `Rc<P>`, `Arc<P>`, or a `Clone`
/// of a lock-based pool) rather than reached through any global state, so
/// several fleets can run against separate pools in one process.
///
/// Holding is exclusive: as long as this robot is alive and has not been
/// reset, no other holder can be issued the same tag.
///
/// # Example
/// ```
/// use callsign::{BasicShuffledPool, Callsign, Robot, TagPool};
///
/// let pool = BasicShuffledPool::<Callsign>::new();
/// let mut robot = Robot::try_new(&pool).unwrap();
/// let first = robot.tag();
///
/// // The tag sticks until reset.
/// assert_eq!(robot.tag(), first);
///
/// robot.try_reset().unwrap();
/// assert_eq!(pool.in_use(), 1);
/// ```
pub struct Robot<ID, P>
where
    ID: Tag,
    P: TagPool<ID>,
{
    tag: ID,
    pool: P,
}

impl<ID, P> Robot<ID, P>
where
    ID: Tag,
    P: TagPool<ID>,
{
    /// Brings a robot online, acquiring a tag from `pool`.
    ///
    /// # Errors
    /// Propagates the pool's acquire errors, notably [`Error::Exhausted`]
    /// when the universe has no free tag left for this robot.
    ///
    /// [`Error::Exhausted`]: crate::Error::Exhausted
    pub fn try_new(pool: P) -> Result<Self> {
        let tag = pool.try_acquire()?;
        Ok(Self { tag, pool })
    }

    /// Returns the robot's current tag.
    pub fn tag(&self) -> ID {
        self.tag
    }

    /// Releases the current tag and acquires a fresh one.
    ///
    /// The old tag is released *before* the new draw so the full universe is
    /// available to it; on a one-tag universe a reset therefore hands the
    /// same tag back. The new tag is returned for convenience.
    ///
    /// # Errors
    /// Propagates the pool's release and acquire errors. If the re-acquire
    /// fails (only possible through lock poisoning), the robot keeps its old
    /// tag value even though the pool no longer considers it held.
    pub fn try_reset(&mut self) -> Result<ID> {
        self.pool.try_release(self.tag)?;
        self.tag = self.pool.try_acquire()?;
        Ok(self.tag)
    }
}

impl<ID, P> Drop for Robot<ID, P>
where
    ID: Tag,
    P: TagPool<ID>,
{
    fn drop(&mut self) {
        // Best effort: a robot going offline frees its tag for reuse.
        let _ = self.pool.try_release(self.tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicScanPool, BasicShuffledPool, Callsign, LockShuffledPool, ThreadRandom};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread::scope;

    #[test]
    fn tag_sticks_between_calls() {
        let pool = BasicShuffledPool::<Callsign>::new();
        let robot = Robot::try_new(&pool).unwrap();
        assert_eq!(robot.tag(), robot.tag());
    }

    #[test]
    fn robots_never_share_a_tag() {
        let pool = BasicShuffledPool::<Callsign>::new();
        let robots: Vec<_> = (0..1000)
            .map(|_| Robot::try_new(&pool).unwrap())
            .collect();
        let tags: HashSet<_> = robots.iter().map(Robot::tag).collect();
        assert_eq!(tags.len(), robots.len());
        assert_eq!(pool.in_use(), robots.len());
    }

    #[test]
    fn reset_frees_the_old_tag() {
        let pool = BasicShuffledPool::<Callsign>::new();
        let mut robot = Robot::try_new(&pool).unwrap();
        let before = robot.tag();

        let after = robot.try_reset().unwrap();
        assert_eq!(robot.tag(), after);
        assert_eq!(pool.in_use(), 1);

        // The old tag went back to available, so someone else can take it
        // eventually; what matters here is it is no longer marked held.
        assert_eq!(pool.try_release(before).unwrap_err(), crate::Error::NotHeld);
    }

    #[test]
    fn reset_works_against_scan_pools_too() {
        let pool = BasicScanPool::<Callsign, _>::new(ThreadRandom);
        let mut robot = Robot::try_new(&pool).unwrap();
        robot.try_reset().unwrap();
        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn drop_releases_the_tag() {
        let pool = BasicShuffledPool::<Callsign>::new();
        {
            let _robot = Robot::try_new(&pool).unwrap();
            assert_eq!(pool.in_use(), 1);
        }
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn fleet_shares_a_lock_pool_across_threads() {
        let pool = Arc::new(LockShuffledPool::<Callsign>::new());

        scope(|s| {
            for _ in 0..4 {
                let pool = Arc::clone(&pool);
                s.spawn(move || {
                    for _ in 0..50 {
                        let mut robot = Robot::try_new(pool.clone()).unwrap();
                        robot.try_reset().unwrap();
                    }
                });
            }
        });

        // Every robot went out of scope, so every tag came back.
        assert_eq!(pool.in_use(), 0);
    }
}

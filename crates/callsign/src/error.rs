use core::fmt;

/// A result type for pool operations.
///
/// Unlike most ID generators, a finite pool is inherently fallible: the
/// universe can run out, and a release can name a tag nobody holds. The
/// default error type is therefore [`Error`] rather than `Infallible`.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `callsign` can emit.
///
/// When the `parking-lot` feature is enabled, mutexes do not poison, so
/// `LockPoisoned` is compiled out and the lock-based pools fail only for the
/// same reasons the basic ones do.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Error {
    /// Every tag in the universe is currently in use.
    ///
    /// This is terminal for the call: retrying cannot succeed until some
    /// holder releases a tag. The universe is fixed at the type level and
    /// never grows.
    Exhausted,

    /// The released tag is not currently in use.
    ///
    /// Releasing a tag that was never acquired, or was already released, is
    /// a contract violation by the caller and is reported rather than
    /// silently ignored.
    NotHeld,

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    LockPoisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Exhausted => write!(fmt, "all tags are in use"),
            Self::NotHeld => write!(fmt, "tag is not currently in use"),
            #[cfg(not(feature = "parking-lot"))]
            Self::LockPoisoned => write!(fmt, "pool lock was poisoned"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

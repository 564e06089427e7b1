use core::fmt;
use core::hash::Hash;

/// A trait for identifiers drawn from a fixed, finite universe.
///
/// A `Tag` type defines a closed namespace of exactly [`Tag::UNIVERSE`]
/// values and a dense index mapping over it. Pools are generic over this
/// trait: they only need to enumerate the universe, compare tags for the
/// sorted in-use index, and map random draws onto members.
///
/// The index mapping must be a bijection between `0..UNIVERSE` and the tag
/// values: `Tag::from_index(t.index()) == t` for every tag `t`, and
/// `Tag::from_index(i).index() == i` for every `i < UNIVERSE`.
///
/// # Example
/// ```
/// use callsign::Tag;
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// struct Slot(u32);
///
/// impl core::fmt::Display for Slot {
///     fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
///         write!(f, "slot-{}", self.0)
///     }
/// }
///
/// impl Tag for Slot {
///     const UNIVERSE: u32 = 4;
///     fn from_index(index: u32) -> Self {
///         assert!(index < Self::UNIVERSE);
///         Slot(index)
///     }
///     fn index(&self) -> u32 {
///         self.0
///     }
/// }
///
/// assert_eq!(Slot::universe().count(), 4);
/// ```
pub trait Tag:
    Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Number of distinct tags in the universe.
    ///
    /// The namespace is fixed at the type level; a pool can never mint more
    /// than this many live tags.
    const UNIVERSE: u32;

    /// Constructs the tag at a given dense index.
    ///
    /// # Panics
    /// Panics if `index >= Self::UNIVERSE`.
    #[must_use]
    fn from_index(index: u32) -> Self;

    /// Returns this tag's dense index in `0..Self::UNIVERSE`.
    fn index(&self) -> u32;

    /// Enumerates every tag in the universe, in index order.
    fn universe() -> impl Iterator<Item = Self> {
        (0..Self::UNIVERSE).map(Self::from_index)
    }
}

use crate::{
    BasicScanPool, BasicShuffledPool, Callsign, Error, LockScanPool, LockShuffledPool, RandSource,
    Tag, TagPool, ThreadRandom,
};
use core::cell::Cell;
use std::collections::HashSet;
use std::thread::scope;

macro_rules! micro_tag {
    ($name:ident, $universe:expr) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        struct $name(u32);

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }

        impl Tag for $name {
            const UNIVERSE: u32 = $universe;

            fn from_index(index: u32) -> Self {
                assert!(index < Self::UNIVERSE);
                Self(index)
            }

            fn index(&self) -> u32 {
                self.0
            }
        }
    };
}

micro_tag!(UnitTag, 1);
micro_tag!(PairTag, 2);
micro_tag!(MicroTag, 8);

/// A `RandSource` that replays a fixed sequence of draws, cycling.
struct SeqRand {
    values: Vec<u64>,
    next: Cell<usize>,
}

impl SeqRand {
    fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            next: Cell::new(0),
        }
    }
}

impl RandSource<u64> for SeqRand {
    fn rand(&self) -> u64 {
        let at = self.next.get();
        self.next.set((at + 1) % self.values.len());
        self.values[at]
    }
}

fn run_drain_yields_distinct_then_exhausts<ID, P>(pool: P)
where
    ID: Tag,
    P: TagPool<ID>,
{
    let mut seen = HashSet::new();
    for step in 0..pool.capacity() {
        assert_eq!(pool.in_use(), step);
        assert_eq!(pool.available(), pool.capacity() - step);
        let tag = pool.try_acquire().unwrap();
        assert!(seen.insert(tag), "duplicate live tag: {tag}");
    }
    assert!(pool.is_exhausted());
    assert_eq!(pool.try_acquire().unwrap_err(), Error::Exhausted);
    // The failed acquire must not disturb the partition.
    assert_eq!(pool.in_use(), pool.capacity());
}

fn run_release_roundtrip_restores_partition<ID, P>(pool: P)
where
    ID: Tag,
    P: TagPool<ID>,
{
    let held = pool.try_acquire().unwrap();
    let before = pool.in_use();

    let tag = pool.try_acquire().unwrap();
    pool.try_release(tag).unwrap();

    assert_eq!(pool.in_use(), before);
    // The round-tripped tag is available again while `held` is not.
    assert_eq!(pool.try_release(tag).unwrap_err(), Error::NotHeld);
    pool.try_release(held).unwrap();
}

fn run_singleton_universe_reissues_released_tag<P>(pool: P)
where
    P: TagPool<UnitTag>,
{
    let tag = pool.try_acquire().unwrap();
    pool.try_release(tag).unwrap();
    assert_eq!(pool.try_acquire().unwrap(), tag);
}

fn run_pair_universe_scenario<P>(pool: P)
where
    P: TagPool<PairTag>,
{
    let first = pool.try_acquire().unwrap();
    let second = pool.try_acquire().unwrap();
    assert_ne!(first, second);
    assert_eq!(
        HashSet::from([first, second]),
        PairTag::universe().collect::<HashSet<_>>()
    );
    assert_eq!(pool.try_acquire().unwrap_err(), Error::Exhausted);

    // Only the released tag can come back while the other is still held.
    pool.try_release(first).unwrap();
    assert_eq!(pool.try_acquire().unwrap(), first);
}

fn run_release_of_unheld_tag_fails<P>(pool: P)
where
    P: TagPool<MicroTag>,
{
    assert_eq!(
        pool.try_release(MicroTag::from_index(3)).unwrap_err(),
        Error::NotHeld
    );

    let tag = pool.try_acquire().unwrap();
    pool.try_release(tag).unwrap();
    assert_eq!(pool.try_release(tag).unwrap_err(), Error::NotHeld);
}

#[test]
fn drain_yields_distinct_then_exhausts() {
    run_drain_yields_distinct_then_exhausts(BasicShuffledPool::<MicroTag>::new());
    run_drain_yields_distinct_then_exhausts(LockShuffledPool::<MicroTag>::new());
    run_drain_yields_distinct_then_exhausts(BasicScanPool::<MicroTag, _>::new(ThreadRandom));
    run_drain_yields_distinct_then_exhausts(LockScanPool::<MicroTag, _>::new(ThreadRandom));
}

#[test]
fn release_roundtrip_restores_partition() {
    run_release_roundtrip_restores_partition(BasicShuffledPool::<MicroTag>::new());
    run_release_roundtrip_restores_partition(LockShuffledPool::<MicroTag>::new());
    run_release_roundtrip_restores_partition(BasicScanPool::<MicroTag, _>::new(ThreadRandom));
    run_release_roundtrip_restores_partition(LockScanPool::<MicroTag, _>::new(ThreadRandom));
}

#[test]
fn singleton_universe_reissues_released_tag() {
    run_singleton_universe_reissues_released_tag(BasicShuffledPool::<UnitTag>::new());
    run_singleton_universe_reissues_released_tag(LockShuffledPool::<UnitTag>::new());
    run_singleton_universe_reissues_released_tag(BasicScanPool::<UnitTag, _>::new(ThreadRandom));
    run_singleton_universe_reissues_released_tag(LockScanPool::<UnitTag, _>::new(ThreadRandom));
}

#[test]
fn pair_universe_scenario() {
    run_pair_universe_scenario(BasicShuffledPool::<PairTag>::new());
    run_pair_universe_scenario(LockShuffledPool::<PairTag>::new());
    run_pair_universe_scenario(BasicScanPool::<PairTag, _>::new(ThreadRandom));
    run_pair_universe_scenario(LockScanPool::<PairTag, _>::new(ThreadRandom));
}

#[test]
fn release_of_unheld_tag_fails() {
    run_release_of_unheld_tag_fails(BasicShuffledPool::<MicroTag>::new());
    run_release_of_unheld_tag_fails(LockShuffledPool::<MicroTag>::new());
    run_release_of_unheld_tag_fails(BasicScanPool::<MicroTag, _>::new(ThreadRandom));
    run_release_of_unheld_tag_fails(LockScanPool::<MicroTag, _>::new(ThreadRandom));
}

#[test]
fn shuffled_pool_hands_out_pinned_order() {
    let order = [5, 2, 7, 0, 1, 3, 6, 4].map(MicroTag::from_index);
    let pool = BasicShuffledPool::from_ordered(order);
    for expected in order {
        assert_eq!(pool.try_acquire().unwrap(), expected);
    }
}

#[test]
fn shuffled_release_goes_to_the_back_of_the_queue() {
    let order = MicroTag::universe().collect::<Vec<_>>();
    let pool = BasicShuffledPool::from_ordered(order.iter().copied());

    let first = pool.try_acquire().unwrap();
    pool.try_release(first).unwrap();

    // The released tag is reissued only after the rest of the queue.
    for expected in &order[1..] {
        assert_eq!(pool.try_acquire().unwrap(), *expected);
    }
    assert_eq!(pool.try_acquire().unwrap(), first);
}

#[test]
fn scan_pool_retries_colliding_draws() {
    // 0 collides on the second acquire and must be skipped in favor of 1.
    let pool = BasicScanPool::<MicroTag, _>::new(SeqRand::new(vec![0, 0, 1]));
    assert_eq!(pool.try_acquire().unwrap(), MicroTag::from_index(0));
    assert_eq!(pool.try_acquire().unwrap(), MicroTag::from_index(1));
}

#[test]
fn scan_pool_fails_fast_when_full() {
    // Cycling draws 0..8 fill the whole universe; the ninth acquire must
    // fail without drawing forever.
    let pool = BasicScanPool::<MicroTag, _>::new(SeqRand::new((0..8).collect()));
    for _ in 0..MicroTag::UNIVERSE {
        pool.try_acquire().unwrap();
    }
    assert_eq!(pool.try_acquire().unwrap_err(), Error::Exhausted);
}

#[test]
fn batch_is_observably_transparent() {
    let order = MicroTag::universe().collect::<Vec<_>>();

    let sequential = BasicShuffledPool::from_ordered(order.iter().copied());
    let batched = BasicShuffledPool::from_ordered(order.iter().copied());

    let mut plain = Vec::new();
    for _ in 0..5 {
        plain.push(sequential.try_acquire().unwrap());
    }

    let mut bulk = Vec::new();
    {
        let mut batch = batched.batch();
        for _ in 0..5 {
            bulk.push(batch.try_acquire().unwrap());
        }
    }

    // Same tags handed out, same partition afterwards.
    assert_eq!(plain, bulk);
    assert_eq!(sequential.in_use(), batched.in_use());
    for tag in bulk {
        batched.try_release(tag).unwrap();
    }
    assert_eq!(batched.in_use(), 0);
}

#[test]
fn batch_release_covers_scratch_and_index() {
    let pool = BasicShuffledPool::<MicroTag>::new();
    let outside = pool.try_acquire().unwrap();

    {
        let mut batch = pool.batch();
        let inside = batch.try_acquire().unwrap();
        let kept = batch.try_acquire().unwrap();

        // `inside` still lives in the scratch buffer; `outside` is already
        // in the sorted index.
        batch.try_release(inside).unwrap();
        batch.try_release(outside).unwrap();
        assert_eq!(batch.try_release(inside).unwrap_err(), Error::NotHeld);

        let _ = kept;
    }

    assert_eq!(pool.in_use(), 1);
}

#[test]
fn lock_batch_merges_on_drop() {
    let pool = LockShuffledPool::<MicroTag>::new();
    {
        let mut batch = pool.try_batch().unwrap();
        for _ in 0..4 {
            batch.try_acquire().unwrap();
        }
    }
    assert_eq!(pool.in_use(), 4);
    assert_eq!(pool.available(), 4);
}

#[test]
fn batch_drains_to_exhaustion_like_sequential() {
    let pool = BasicShuffledPool::<MicroTag>::new();
    let mut batch = pool.batch();
    for _ in 0..MicroTag::UNIVERSE {
        batch.try_acquire().unwrap();
    }
    assert_eq!(batch.try_acquire().unwrap_err(), Error::Exhausted);
}

#[test]
fn clone_shares_the_partition() {
    let pool = LockShuffledPool::<MicroTag>::new();
    let clone = pool.clone();

    let tag = clone.try_acquire().unwrap();
    assert_eq!(pool.in_use(), 1);

    pool.try_release(tag).unwrap();
    assert_eq!(clone.in_use(), 0);
}

fn run_concurrent_acquire_yields_distinct<P>(pool: P)
where
    P: TagPool<Callsign> + Clone + Send + Sync,
{
    const THREADS: usize = 4;
    const PER_THREAD: usize = 500;

    let mut tags = Vec::new();
    scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let pool = pool.clone();
                s.spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| pool.try_acquire().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            tags.extend(handle.join().unwrap());
        }
    });

    let distinct: HashSet<_> = tags.iter().copied().collect();
    assert_eq!(distinct.len(), THREADS * PER_THREAD);
    assert_eq!(pool.in_use(), THREADS * PER_THREAD);

    for tag in tags {
        pool.try_release(tag).unwrap();
    }
    assert_eq!(pool.in_use(), 0);
}

#[test]
fn concurrent_acquire_yields_distinct_tags() {
    run_concurrent_acquire_yields_distinct(LockShuffledPool::<Callsign>::new());
    run_concurrent_acquire_yields_distinct(LockScanPool::<Callsign, _>::new(ThreadRandom));
}

mod basic;
mod lock;

pub use basic::*;
pub use lock::*;

use crate::{Error, Result, Tag};
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// Shared bookkeeping for the pre-shuffled strategy.
///
/// The whole universe is enumerated once at construction and shuffled into
/// the available queue. Acquire pops the front; release binary-searches the
/// sorted in-use index and pushes the tag back. Batch operations defer the
/// sorted insert into a scratch buffer owned by the batch guard.
pub(crate) struct ShuffledState<ID>
where
    ID: Tag,
{
    available: VecDeque<ID>,
    used: Vec<ID>,
}

impl<ID> ShuffledState<ID>
where
    ID: Tag,
{
    pub(crate) fn new() -> Self {
        let mut tags: Vec<ID> = ID::universe().collect();
        tags.shuffle(&mut rand::rng());
        Self {
            available: tags.into(),
            used: Vec::new(),
        }
    }

    pub(crate) fn from_ordered(tags: impl IntoIterator<Item = ID>) -> Self {
        let available: VecDeque<ID> = tags.into_iter().collect();
        debug_assert_eq!(available.len(), ID::UNIVERSE as usize);
        Self {
            available,
            used: Vec::new(),
        }
    }

    pub(crate) fn acquire(&mut self) -> Result<ID> {
        let tag = self.available.pop_front().ok_or(Error::Exhausted)?;
        // Partition invariant: a tag popped from `available` is never in
        // `used`.
        let Err(slot) = self.used.binary_search(&tag) else {
            unreachable!("tag {tag} was both available and in use");
        };
        self.used.insert(slot, tag);
        Ok(tag)
    }

    pub(crate) fn release(&mut self, tag: ID) -> Result<()> {
        match self.used.binary_search(&tag) {
            Ok(slot) => {
                self.used.remove(slot);
                self.available.push_back(tag);
                Ok(())
            }
            Err(_) => Err(Error::NotHeld),
        }
    }

    pub(crate) fn batch_acquire(&mut self, scratch: &mut Vec<ID>) -> Result<ID> {
        let tag = self.available.pop_front().ok_or(Error::Exhausted)?;
        scratch.push(tag);
        Ok(tag)
    }

    pub(crate) fn batch_release(&mut self, scratch: &mut Vec<ID>, tag: ID) -> Result<()> {
        // Tags acquired within the current batch live in the scratch buffer,
        // not in the sorted index yet.
        if let Some(pos) = scratch.iter().position(|held| *held == tag) {
            scratch.swap_remove(pos);
            self.available.push_back(tag);
            return Ok(());
        }
        self.release(tag)
    }

    pub(crate) fn absorb(&mut self, mut scratch: Vec<ID>) {
        if scratch.is_empty() {
            return;
        }
        // One sort at batch exit instead of a sorted insert per acquire:
        // O(n log n) for the bulk rather than O(n²) one at a time.
        self.used.append(&mut scratch);
        self.used.sort_unstable();
    }

    pub(crate) fn in_use(&self) -> usize {
        self.used.len()
    }
}

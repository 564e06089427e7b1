mod basic;
mod lock;

pub use basic::*;
pub use lock::*;

use crate::{Error, RandSource, Result, Tag};

/// Shared bookkeeping for the generate-and-check strategy.
///
/// Only the sorted in-use vector is stored; the available set is implicit
/// (everything not in use). Candidates are drawn uniformly over the whole
/// universe and checked against the in-use index with a binary search.
pub(crate) struct ScanState<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    used: Vec<ID>,
    rng: R,
}

impl<ID, R> ScanState<ID, R>
where
    ID: Tag,
    R: RandSource<u64>,
{
    pub(crate) fn new(rng: R) -> Self {
        Self {
            used: Vec::new(),
            rng,
        }
    }

    pub(crate) fn acquire(&mut self) -> Result<ID> {
        // A full universe must fail up front: the draw loop below would
        // otherwise never terminate.
        if self.used.len() == ID::UNIVERSE as usize {
            return Err(Error::Exhausted);
        }
        loop {
            let index = (self.rng.rand() % u64::from(ID::UNIVERSE)) as u32;
            let tag = ID::from_index(index);
            match self.used.binary_search(&tag) {
                // Collision: draw again. Expected retries grow without bound
                // as occupancy approaches 100%.
                Ok(_) => {}
                Err(slot) => {
                    self.used.insert(slot, tag);
                    break Ok(tag);
                }
            }
        }
    }

    pub(crate) fn release(&mut self, tag: ID) -> Result<()> {
        match self.used.binary_search(&tag) {
            Ok(slot) => {
                self.used.remove(slot);
                Ok(())
            }
            Err(_) => Err(Error::NotHeld),
        }
    }

    pub(crate) fn in_use(&self) -> usize {
        self.used.len()
    }
}

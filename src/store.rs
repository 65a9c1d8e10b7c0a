use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::tally::WordTally;

/// One pre-allocated slot per planned chunk.
///
/// Workers write their own slot once; the lock is only held for that write.
/// `drain` is meant to run after every worker has been joined.
#[derive(Debug)]
pub struct PartialResultStore {
    slots: Mutex<Vec<Option<WordTally>>>,
}

impl PartialResultStore {
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        PartialResultStore {
            slots: Mutex::new(slots),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set(&self, index: usize, tally: WordTally) -> Result<()> {
        let mut slots = self.lock();
        let len = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(Error::SlotOutOfBounds { index, len })?;
        if slot.is_some() {
            return Err(Error::SlotOccupied(index));
        }
        *slot = Some(tally);
        Ok(())
    }

    /// Takes all results in slot order, unset slots as empty tallies.
    pub fn drain(&self) -> Vec<WordTally> {
        self.lock()
            .iter_mut()
            .map(|slot| slot.take().unwrap_or_default())
            .collect()
    }

    // a panicking writer can't leave a slot half written
    fn lock(&self) -> MutexGuard<'_, Vec<Option<WordTally>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

use std::cmp::Ordering;
use std::iter::FromIterator;
use std::slice;
use std::vec;

use bytes::Bytes;

use crate::tally::WordTally;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequencyEntry {
    pub word: Bytes,
    pub count: u64,
}

impl FrequencyEntry {
    pub fn new(word: Bytes, count: u64) -> Self {
        FrequencyEntry { word, count }
    }
}

/// Ranking order: higher count first, then ascending word bytes.
impl Ord for FrequencyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.word.cmp(&other.word))
    }
}

impl PartialOrd for FrequencyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entries in ranking order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedList {
    entries: Vec<FrequencyEntry>,
}

impl RankedList {
    /// Sorts arbitrary entries into ranking order.
    pub fn from_entries(mut entries: Vec<FrequencyEntry>) -> Self {
        entries.sort_unstable();
        RankedList { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> slice::Iter<'_, FrequencyEntry> {
        self.entries.iter()
    }

    /// Re-ranks the list. Leaves a ranked list unchanged.
    pub fn rank(self) -> Self {
        RankedList::from_entries(self.entries)
    }
}

impl IntoIterator for RankedList {
    type Item = FrequencyEntry;
    type IntoIter = vec::IntoIter<FrequencyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a FrequencyEntry;
    type IntoIter = slice::Iter<'a, FrequencyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<FrequencyEntry> for RankedList {
    fn from_iter<I: IntoIterator<Item = FrequencyEntry>>(iter: I) -> Self {
        RankedList::from_entries(Vec::from_iter(iter))
    }
}

/// Turns a merged tally into its ranked listing.
pub fn rank(tally: WordTally) -> RankedList {
    tally
        .into_iter()
        .map(|(word, count)| FrequencyEntry::new(word, count))
        .collect()
}

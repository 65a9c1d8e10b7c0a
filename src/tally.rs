use std::collections::hash_map::{self, HashMap};
use std::iter::FromIterator;

use bytes::Bytes;

/// Word to occurrence count mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTally {
    counts: HashMap<Bytes, u64>,
}

impl WordTally {
    pub fn new() -> Self {
        WordTally::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        WordTally {
            counts: HashMap::with_capacity(capacity),
        }
    }

    /// Counts one occurrence. Empty words are ignored.
    #[inline]
    pub fn count(&mut self, word: Bytes) {
        self.add(word, 1);
    }

    #[inline]
    pub fn add(&mut self, word: Bytes, count: u64) {
        if word.is_empty() {
            return;
        }
        *self.counts.entry(word).or_insert(0) += count;
    }

    pub fn get(&self, word: &[u8]) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Bytes, u64> {
        self.counts.iter()
    }

    /// Adds every count of `other` into `self`.
    pub fn absorb(&mut self, other: WordTally) {
        self.counts.reserve(other.counts.len());
        for (word, count) in other.counts {
            *self.counts.entry(word).or_insert(0) += count;
        }
    }
}

impl IntoIterator for WordTally {
    type Item = (Bytes, u64);
    type IntoIter = hash_map::IntoIter<Bytes, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl<'a> IntoIterator for &'a WordTally {
    type Item = (&'a Bytes, &'a u64);
    type IntoIter = hash_map::Iter<'a, Bytes, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl FromIterator<Bytes> for WordTally {
    fn from_iter<I: IntoIterator<Item = Bytes>>(words: I) -> Self {
        let mut tally = WordTally::new();
        for word in words {
            tally.count(word);
        }
        tally
    }
}

/// Folds partial tallies into one global tally. Order does not matter.
pub fn merge<I>(tallies: I) -> WordTally
where
    I: IntoIterator<Item = WordTally>,
{
    let tallies: Vec<WordTally> = tallies.into_iter().collect();
    let capacity = tallies.iter().map(WordTally::len).max().unwrap_or(0);
    tallies
        .into_iter()
        .fold(WordTally::with_capacity(capacity), |mut frequency, sub_table| {
            frequency.absorb(sub_table);
            frequency
        })
}

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use log::{debug, info, warn};
use tokio::runtime::Builder;
use tokio::sync::mpsc;
use tokio::task;

use crate::chunk::{plan_chunks, ByteRange, Separator};
use crate::error::{Error, Result};
use crate::rank::{rank, RankedList};
use crate::scan::{count_linear, scan_chunk};
use crate::source::{read_all, ByteSource};
use crate::store::PartialResultStore;
use crate::tally::{merge, WordTally};

/// How worker results travel back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collect {
    /// Pre-allocated slot per chunk behind a lock.
    Slots,
    /// Each worker sends its tally over a channel.
    Channel,
}

impl Default for Collect {
    fn default() -> Self {
        Collect::Slots
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub chunk_count: usize,
    pub separator: Separator,
    pub collect: Collect,
}

impl Options {
    pub fn new(chunk_count: usize) -> Self {
        Options {
            chunk_count,
            separator: Separator::default(),
            collect: Collect::default(),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new(1)
    }
}

fn scan_range<S: ByteSource + ?Sized>(
    source: &S,
    index: usize,
    range: ByteRange,
    separator: Separator,
) -> Result<WordTally> {
    let time = Instant::now();
    let tally = scan_chunk(source.open()?, source.size(), range, separator)?;
    debug!(
        "chunk {} {} ({} bytes): {} distinct words in {:?}",
        index,
        range,
        range.len(),
        tally.len(),
        time.elapsed()
    );
    Ok(tally)
}

async fn collect_slots<S>(source: Arc<S>, ranges: Vec<ByteRange>, separator: Separator) -> Result<Vec<WordTally>>
where
    S: ByteSource + 'static,
{
    let store = Arc::new(PartialResultStore::new(ranges.len()));

    let workers = ranges.into_iter().enumerate().map(|(index, range)| {
        let source = Arc::clone(&source);
        let store = Arc::clone(&store);
        task::spawn_blocking(move || {
            let tally = scan_range(&*source, index, range, separator)?;
            store.set(index, tally)
        })
    });

    // join barrier: nothing reads the store before every worker is done
    for outcome in try_join_all(workers).await? {
        outcome?;
    }

    Ok(store.drain())
}

async fn collect_channel<S>(source: Arc<S>, ranges: Vec<ByteRange>, separator: Separator) -> Result<Vec<WordTally>>
where
    S: ByteSource + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let chunk_count = ranges.len();

    for (index, range) in ranges.into_iter().enumerate() {
        let source = Arc::clone(&source);
        let tx = tx.clone();
        task::spawn_blocking(move || {
            let outcome = scan_range(&*source, index, range, separator);
            // receiver only goes away after a failure elsewhere
            let _ = tx.send((index, outcome));
        });
    }
    drop(tx);

    let mut slots: Vec<Option<WordTally>> = Vec::with_capacity(chunk_count);
    slots.resize_with(chunk_count, || None);
    while let Some((index, outcome)) = rx.recv().await {
        slots[index] = Some(outcome?);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(Error::MissingResult(index)))
        .collect()
}

/// Plans, scans in parallel, merges and ranks.
///
/// Must run inside a multi-threaded tokio runtime; every chunk is scanned on
/// the blocking pool with its own reader. Any failing chunk fails the run.
pub async fn count_words<S>(source: Arc<S>, options: &Options) -> Result<RankedList>
where
    S: ByteSource + 'static,
{
    let Options {
        chunk_count,
        separator,
        collect,
    } = *options;

    let planner = Arc::clone(&source);
    let planned = task::spawn_blocking(move || plan_chunks(&*planner, chunk_count, separator)).await?;
    let ranges = match planned {
        Ok(ranges) => ranges,
        Err(Error::EmptyFile) => {
            warn!("input is empty, nothing to count");
            return Ok(RankedList::default());
        }
        Err(e) => return Err(e),
    };
    info!(
        "scanning {} bytes in {} chunks ({} requested)",
        source.size(),
        ranges.len(),
        chunk_count
    );

    let partials = match collect {
        Collect::Slots => collect_slots(source, ranges, separator).await?,
        Collect::Channel => collect_channel(source, ranges, separator).await?,
    };

    let frequency = merge(partials);
    info!(
        "{} words, {} distinct",
        frequency.total(),
        frequency.len()
    );
    Ok(rank(frequency))
}

/// `count_words` on a runtime of its own, for callers outside async code.
pub fn count_words_blocking<S>(source: Arc<S>, options: &Options) -> Result<RankedList>
where
    S: ByteSource + 'static,
{
    let runtime = Builder::new_multi_thread().build()?;
    runtime.block_on(count_words(source, options))
}

/// Checks a ranked result against a single linear pass over the input.
pub async fn verify<S>(source: Arc<S>, separator: Separator, ranked: &RankedList) -> Result<()>
where
    S: ByteSource + 'static,
{
    let linear = task::spawn_blocking(move || -> Result<RankedList> {
        let text = read_all(&*source)?;
        Ok(rank(count_linear(&text, separator)))
    })
    .await??;

    if &linear != ranked {
        return Err(Error::VerificationFailed {
            parallel: ranked.len(),
            linear: linear.len(),
        });
    }
    debug!("linear verification passed for {} words", linear.len());
    Ok(())
}

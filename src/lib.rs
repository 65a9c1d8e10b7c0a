//! Word frequency counting over byte-range chunks of one input file.
//!
//! The input is split into ranges whose edges sit on word boundaries
//! (`chunk`), every range is scanned on its own reader (`scan`), the partial
//! tallies are merged (`tally`) and ranked by count (`rank`) before being
//! written out (`codec`).

pub mod error;

pub mod logging;
pub mod util;

pub mod chunk;
pub mod codec;
pub mod pipeline;
pub mod rank;
pub mod scan;
pub mod source;
pub mod store;
pub mod tally;

pub use crate::chunk::{find_next_boundary, plan_chunks, ByteRange, Separator};
pub use crate::codec::{render, FrequencyCodec};
pub use crate::error::{Error, Result};
pub use crate::pipeline::{count_words, count_words_blocking, verify, Collect, Options};
pub use crate::rank::{rank, FrequencyEntry, RankedList};
pub use crate::scan::{count_linear, scan_chunk};
pub use crate::source::{ByteSource, InputFile, MemorySource};
pub use crate::store::PartialResultStore;
pub use crate::tally::{merge, WordTally};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors of the chunked word count pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Input or output path could not be opened.
    #[error("can't open \"{}\": {}", path.display(), source)]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No separator between the given position and the end of the input.
    /// Recovered by the chunk planner, never reported to the user.
    #[error("no word boundary found before end of input")]
    NoBoundaryFound,

    #[error("input is empty")]
    EmptyFile,

    #[error("chunk count must be at least 1, got {0}")]
    InvalidChunkCount(usize),

    #[error("result slot {index} out of bounds ({len} slots)")]
    SlotOutOfBounds { index: usize, len: usize },

    #[error("result slot {0} written twice")]
    SlotOccupied(usize),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("chunk {0} produced no result")]
    MissingResult(usize),

    #[error("parallel count differs from linear count ({parallel} vs {linear} distinct words)")]
    VerificationFailed { parallel: usize, linear: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn file_open<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::FileOpen {
            path: path.into(),
            source,
        }
    }
}

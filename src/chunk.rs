use std::fmt;
use std::io::{BufRead, Read, Seek, SeekFrom};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::source::ByteSource;

/// Bytes that delimit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// ASCII space only.
    Space,
    /// Space, tab, line feed, form feed and carriage return.
    Whitespace,
}

impl Separator {
    #[inline]
    pub fn matches(self, byte: u8) -> bool {
        match self {
            Separator::Space => byte == b' ',
            Separator::Whitespace => byte.is_ascii_whitespace(),
        }
    }
}

impl Default for Separator {
    fn default() -> Self {
        Separator::Space
    }
}

/// Half-open byte interval `[start, end)` of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        ByteRange { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Returns the offset just after the first separator at or after `position`.
///
/// Fails with `Error::NoBoundaryFound` when no separator occurs before
/// `file_size`. Nothing at or past `file_size` is read.
pub fn find_next_boundary<R>(
    mut reader: R,
    file_size: u64,
    position: u64,
    separator: Separator,
) -> Result<u64>
where
    R: BufRead + Seek,
{
    if position >= file_size {
        return Err(Error::NoBoundaryFound);
    }

    reader.seek(SeekFrom::Start(position))?;
    for (offset, byte) in reader.take(file_size - position).bytes().enumerate() {
        if separator.matches(byte?) {
            return Ok(position + offset as u64 + 1);
        }
    }

    Err(Error::NoBoundaryFound)
}

/// Snaps `position` forward to a word boundary, collapsing to end of input
/// when there is none.
fn snap<S: ByteSource + ?Sized>(source: &S, position: u64, separator: Separator) -> Result<u64> {
    let file_size = source.size();
    match find_next_boundary(source.open()?, file_size, position, separator) {
        Ok(boundary) => Ok(boundary),
        Err(Error::NoBoundaryFound) => {
            trace!("no boundary after {}, collapsing to {}", position, file_size);
            Ok(file_size)
        }
        Err(e) => Err(e),
    }
}

/// Splits the source into at most `chunk_count` contiguous ranges whose
/// edges sit on word boundaries. Degenerate ranges are dropped.
pub fn plan_chunks<S: ByteSource + ?Sized>(
    source: &S,
    chunk_count: usize,
    separator: Separator,
) -> Result<Vec<ByteRange>> {
    if chunk_count == 0 {
        return Err(Error::InvalidChunkCount(chunk_count));
    }
    let file_size = source.size();
    if file_size == 0 {
        return Err(Error::EmptyFile);
    }

    let chunk_size = file_size / chunk_count as u64;
    let mut ranges = Vec::with_capacity(chunk_count);

    for i in 0..chunk_count {
        let mut start = i as u64 * chunk_size;
        let mut end = if i == chunk_count - 1 {
            file_size
        } else {
            start + chunk_size
        };

        if i != 0 {
            start = snap(source, start, separator)?;
        }
        if end != file_size {
            end = snap(source, end, separator)?;
        }

        if start >= end {
            trace!("dropping degenerate chunk {} at {}", i, start);
            continue;
        }
        ranges.push(ByteRange::new(start, end));
    }

    debug!(
        "planned {} of {} chunks over {} bytes",
        ranges.len(),
        chunk_count,
        file_size
    );
    Ok(ranges)
}

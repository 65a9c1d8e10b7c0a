use std::io::{BufRead, Read, Seek, SeekFrom};

use bytes::{Bytes, BytesMut};

use crate::chunk::{ByteRange, Separator};
use crate::error::Result;
use crate::tally::WordTally;

/// Counts the words of one chunk.
///
/// A word belongs to the chunk its first byte lies in: scanning stops at the
/// first word starting at or past `range.end`, while a word starting before
/// it is read to completion. Nothing at or past `file_size` is read.
pub fn scan_chunk<R>(
    mut reader: R,
    file_size: u64,
    range: ByteRange,
    separator: Separator,
) -> Result<WordTally>
where
    R: BufRead + Seek,
{
    let mut frequency = WordTally::new();
    if range.is_empty() {
        return Ok(frequency);
    }
    reader.seek(SeekFrom::Start(range.start))?;
    let mut reader = reader.take(file_size.saturating_sub(range.start));

    let mut cursor = range.start;
    let mut word = BytesMut::new();
    let mut finished = false;

    while !finished {
        let buffer = reader.fill_buf()?;
        let amount = buffer.len();
        if amount == 0 {
            break;
        }

        let mut i: usize = 0;
        while i < amount {
            if word.is_empty() {
                while i < amount && separator.matches(buffer[i]) {
                    i += 1;
                }
                if i == amount {
                    break;
                }
                if cursor + i as u64 >= range.end {
                    finished = true;
                    break;
                }
            }

            let i_start = i;
            while i < amount && !separator.matches(buffer[i]) {
                i += 1;
            }
            word.extend_from_slice(&buffer[i_start..i]);
            if i < amount {
                frequency.count(word.split().freeze());
            }
        }

        cursor += i as u64;
        reader.consume(i);
    }

    // word cut off by end of input
    if !word.is_empty() {
        frequency.count(word.freeze());
    }

    Ok(frequency)
}

/// Single pass tokenization of a whole buffer.
pub fn count_linear(text: &[u8], separator: Separator) -> WordTally {
    let text = Bytes::copy_from_slice(text);
    let mut frequency = WordTally::new();
    let mut i_start: usize = 0;
    for i in 0..text.len() {
        if separator.matches(text[i]) {
            frequency.count(text.slice(i_start..i));
            i_start = i + 1;
        }
    }
    frequency.count(text.slice(i_start..));
    frequency
}

use std::fmt::Write;
use std::io;

use bytes::{BufMut, BytesMut};
use futures::SinkExt;
use tokio::io::AsyncWrite;
use tokio_util::codec::{Encoder, FramedWrite};

use crate::rank::{FrequencyEntry, RankedList};

// room for the count and the separators
const LINE_OVERHEAD: usize = 22;

/// Encodes each entry as `<count> <word>\n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrequencyCodec {}

impl FrequencyCodec {
    pub fn new() -> Self {
        FrequencyCodec {}
    }
}

impl Encoder<FrequencyEntry> for FrequencyCodec {
    type Error = io::Error;

    fn encode(&mut self, entry: FrequencyEntry, buffer: &mut BytesMut) -> Result<(), io::Error> {
        buffer.reserve(entry.word.len() + LINE_OVERHEAD);
        buffer
            .write_fmt(format_args!("{} ", entry.count))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("formatting error: {}", e)))?;
        buffer.extend_from_slice(&entry.word);
        buffer.put_u8(b'\n');
        Ok(())
    }
}

/// Writes the ranked list to `sink` and hands the sink back once flushed.
pub async fn render<W>(ranked: RankedList, sink: W) -> io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    let mut output = FramedWrite::new(sink, FrequencyCodec::new());
    for entry in ranked {
        output.feed(entry).await?;
    }
    output.flush().await?;
    Ok(output.into_inner())
}

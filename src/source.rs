use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{Error, Result};

/// Random-access input that hands out independent readers.
///
/// Every call to `open` yields a reader with its own cursor, so the boundary
/// finder and each chunk worker can seek without disturbing one another.
pub trait ByteSource: Send + Sync {
    type Reader: BufRead + Seek;

    /// Total size in bytes, fixed for the duration of a run.
    fn size(&self) -> u64;

    fn open(&self) -> Result<Self::Reader>;
}

/// A file on disk, reopened for every reader.
#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
    size: u64,
}

impl InputFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let size = File::open(&path)
            .and_then(|file| file.metadata())
            .map_err(|e| Error::file_open(&path, e))?
            .len();
        Ok(InputFile { path, size })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for InputFile {
    type Reader = BufReader<File>;

    fn size(&self) -> u64 {
        self.size
    }

    fn open(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path).map_err(|e| Error::file_open(&self.path, e))?;
        Ok(BufReader::new(file))
    }
}

/// An in-memory buffer; readers share the bytes, not the cursor.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new<B: Into<Bytes>>(data: B) -> Self {
        MemorySource { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    type Reader = Cursor<Bytes>;

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn open(&self) -> Result<Cursor<Bytes>> {
        Ok(Cursor::new(self.data.clone()))
    }
}

impl From<&'static str> for MemorySource {
    fn from(text: &'static str) -> Self {
        MemorySource::new(Bytes::from_static(text.as_bytes()))
    }
}

/// Reads a whole source front to back, used by linear verification.
pub fn read_all<S: ByteSource + ?Sized>(source: &S) -> Result<Vec<u8>> {
    let mut reader = source.open()?;
    let mut buffer = Vec::with_capacity(source.size() as usize);
    io::copy(&mut reader, &mut buffer)?;
    Ok(buffer)
}

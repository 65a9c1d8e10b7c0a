use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use word_count::{
    count_words, count_words_blocking, plan_chunks, render, ByteSource, Collect, Error, InputFile, Options,
    RankedList, Separator,
};

fn input(text: &str) -> (NamedTempFile, Arc<InputFile>) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    let source = Arc::new(InputFile::from_path(file.path()).unwrap());
    (file, source)
}

fn lines(ranked: &RankedList) -> Vec<String> {
    ranked
        .iter()
        .map(|e| format!("{} {}", e.count, String::from_utf8_lossy(&e.word)))
        .collect()
}

fn count(text: &str, k: usize) -> Vec<String> {
    let (_file, source) = input(text);
    lines(&count_words_blocking(source, &Options::new(k)).unwrap())
}

#[test]
fn scenario_single_chunk() {
    assert_eq!(count("a b a c b a", 1), vec!["3 a", "2 b", "1 c"]);
}

#[test]
fn scenario_three_chunks_match_single() {
    assert_eq!(count("a b a c b a", 3), count("a b a c b a", 1));
}

#[test]
fn scenario_empty_file() {
    for k in 1..5 {
        assert!(count("", k).is_empty());
    }
}

#[test]
fn scenario_single_word() {
    for k in 1..16 {
        assert_eq!(count("singleword", k), vec!["1 singleword"], "k = {}", k);
    }
}

#[test]
fn scenario_more_chunks_than_boundaries() {
    let (_file, source) = input("to be or");
    let ranges = plan_chunks(&*source, 50, Separator::Space).unwrap();
    assert_eq!(ranges.len(), 2);
    assert_eq!(count("to be or", 50), vec!["1 be", "1 or", "1 to"]);
}

#[test]
fn generated_text_is_chunk_count_independent() {
    let words = ["the", "walrus", "said", "to", "talk", "of", "many", "things", "time", "has", "come"];
    let mut text = String::new();
    let mut state: u32 = 7;
    for _ in 0..5_000 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        text.push_str(words[(state >> 16) as usize % words.len()]);
        text.push(' ');
    }

    let (_file, source) = input(&text);
    let expected = count_words_blocking(Arc::clone(&source), &Options::new(1)).unwrap();
    assert_eq!(expected.iter().map(|e| e.count).sum::<u64>(), 5_000);
    for &k in &[2, 3, 7, 20, 64, 1000] {
        for &collect in &[Collect::Slots, Collect::Channel] {
            let options = Options {
                collect,
                ..Options::new(k)
            };
            let ranked = count_words_blocking(Arc::clone(&source), &options).unwrap();
            assert_eq!(ranked, expected, "k = {} via {:?}", k, collect);
        }
    }
}

#[test]
fn whitespace_separator_splits_lines() {
    let (_file, source) = input("a b\nb c\tc\nc\n");
    let options = Options {
        separator: Separator::Whitespace,
        ..Options::new(4)
    };
    let ranked = count_words_blocking(source, &options).unwrap();
    assert_eq!(lines(&ranked), vec!["3 c", "2 b", "1 a"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn renders_ranked_lines() {
    let (_file, source) = input("b a b c a b ");
    let ranked = count_words(source, &Options::new(3)).await.unwrap();
    let out = render(ranked, Vec::new()).await.unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "3 b\n2 a\n1 c\n");
}

/// In-memory input whose readers fail once they reach `fail_at`.
struct FailingSource {
    data: Bytes,
    fail_at: u64,
}

struct FailingReader {
    inner: Cursor<Bytes>,
    fail_at: u64,
}

impl ByteSource for FailingSource {
    type Reader = FailingReader;

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn open(&self) -> word_count::Result<FailingReader> {
        Ok(FailingReader {
            inner: Cursor::new(self.data.clone()),
            fail_at: self.fail_at,
        })
    }
}

impl Read for FailingReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let amount = {
            let buffer = self.fill_buf()?;
            let amount = buffer.len().min(out.len());
            out[..amount].copy_from_slice(&buffer[..amount]);
            amount
        };
        self.consume(amount);
        Ok(amount)
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let position = self.inner.position();
        if position >= self.fail_at {
            return Err(io::Error::new(io::ErrorKind::Other, "device went away"));
        }
        let limit = (self.fail_at - position) as usize;
        let buffer = self.inner.fill_buf()?;
        Ok(&buffer[..buffer.len().min(limit)])
    }

    fn consume(&mut self, amount: usize) {
        self.inner.consume(amount)
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, position: SeekFrom) -> io::Result<u64> {
        self.inner.seek(position)
    }
}

fn failing(text: &'static str, fail_at: u64) -> Arc<FailingSource> {
    Arc::new(FailingSource {
        data: Bytes::from_static(text.as_bytes()),
        fail_at,
    })
}

#[test]
fn read_error_in_a_chunk_fails_the_run() {
    // boundaries at 6, 12 and 18 are found before the failing byte
    let source = failing("aa bb cc dd ee ff gg hh", 18);
    let ranges = plan_chunks(&*source, 4, Separator::Space).unwrap();
    assert_eq!(ranges.last().map(|r| r.start), Some(18));

    for &collect in &[Collect::Slots, Collect::Channel] {
        let options = Options {
            collect,
            ..Options::new(4)
        };
        let outcome = count_words_blocking(Arc::clone(&source), &options);
        assert!(matches!(outcome, Err(Error::Io(_))), "{:?}: {:?}", collect, outcome);
    }
}

#[test]
fn read_error_while_snapping_is_not_a_missing_boundary() {
    let source = failing("aaaa bbbb cccc dddd", 2);
    let planned = plan_chunks(&*source, 2, Separator::Space);
    assert!(matches!(planned, Err(Error::Io(_))), "{:?}", planned);

    for &collect in &[Collect::Slots, Collect::Channel] {
        let options = Options {
            collect,
            ..Options::new(2)
        };
        let outcome = count_words_blocking(Arc::clone(&source), &options);
        assert!(matches!(outcome, Err(Error::Io(_))), "{:?}: {:?}", collect, outcome);
    }
}

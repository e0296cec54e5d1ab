//! Byte-exact comparison of two artifacts
//!
//! Lengths are compared first; contents are only streamed when the lengths
//! match. The result is ordering-like (`< 0`, `0`, `> 0`) but callers only
//! rely on zero versus non-zero. Every open or read failure yields a
//! non-zero result, so an unreadable file can never compare equal.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Read buffer size for each side of a streamed comparison
pub const BUFFER_SIZE: usize = 32 * 1024;

/// Result reported when either side cannot be read
const UNREADABLE: i32 = -1;

/// Something with a known length that can be opened for reading
pub trait ByteSource {
    type Reader: Read;

    /// Total length in bytes
    fn byte_len(&self) -> io::Result<u64>;

    /// Open a fresh reader positioned at the first byte
    fn open(&self) -> io::Result<Self::Reader>;
}

impl ByteSource for Path {
    type Reader = File;

    fn byte_len(&self) -> io::Result<u64> {
        self.metadata().map(|m| m.len())
    }

    fn open(&self) -> io::Result<File> {
        File::open(self)
    }
}

/// Compare two files on disk
pub fn compare_files(a: &Path, b: &Path) -> i32 {
    compare_sources(a, b)
}

/// Compare two sources: length first, then contents.
///
/// Readers are owned by this call and dropped before it returns on every
/// path.
pub fn compare_sources<A, B>(a: &A, b: &B) -> i32
where
    A: ByteSource + ?Sized,
    B: ByteSource + ?Sized,
{
    let (len_a, len_b) = match (a.byte_len(), b.byte_len()) {
        (Ok(len_a), Ok(len_b)) => (len_a, len_b),
        (Err(e), _) | (_, Err(e)) => {
            debug!("Cannot stat comparison input: {}", e);
            return UNREADABLE;
        }
    };

    match len_a.cmp(&len_b) {
        Ordering::Less => return -1,
        Ordering::Greater => return 1,
        Ordering::Equal => {}
    }

    let reader_a = match a.open() {
        Ok(reader) => reader,
        Err(e) => {
            debug!("Cannot open comparison input: {}", e);
            return UNREADABLE;
        }
    };
    let reader_b = match b.open() {
        Ok(reader) => reader,
        Err(e) => {
            debug!("Cannot open comparison input: {}", e);
            return UNREADABLE;
        }
    };

    compare_streams(reader_a, reader_b)
}

/// Compare two byte streams in lockstep.
///
/// Returns the difference of the first pair of unequal bytes (as unsigned
/// values), `0` when both streams end together without a difference, and a
/// non-zero value when one stream ends first or a read fails.
pub fn compare_streams<A: Read, B: Read>(mut a: A, mut b: B) -> i32 {
    let mut buf_a = vec![0u8; BUFFER_SIZE];
    let mut buf_b = vec![0u8; BUFFER_SIZE];
    let (mut off_a, mut len_a) = (0usize, 0usize);
    let (mut off_b, mut len_b) = (0usize, 0usize);

    loop {
        if off_a == len_a {
            len_a = match refill(&mut a, &mut buf_a) {
                Ok(n) => n,
                Err(e) => {
                    debug!("Read failed during comparison: {}", e);
                    return UNREADABLE;
                }
            };
            off_a = 0;
        }
        if off_b == len_b {
            len_b = match refill(&mut b, &mut buf_b) {
                Ok(n) => n,
                Err(e) => {
                    debug!("Read failed during comparison: {}", e);
                    return UNREADABLE;
                }
            };
            off_b = 0;
        }

        // A zero-length refill is end of stream.
        match (off_a == len_a, off_b == len_b) {
            (true, true) => return 0,
            (true, false) => return -1,
            (false, true) => return 1,
            (false, false) => {}
        }

        let n = (len_a - off_a).min(len_b - off_b);
        let chunk_a = &buf_a[off_a..off_a + n];
        let chunk_b = &buf_b[off_b..off_b + n];

        if let Some((x, y)) = chunk_a.iter().zip(chunk_b).find(|(x, y)| x != y) {
            return i32::from(*x) - i32::from(*y);
        }

        off_a += n;
        off_b += n;
    }
}

fn refill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

//! Content hashing
//!
//! Uploads are named after the MD5 digest of their bytes. The digest is computed
//! while the bytes stream to disk, so an upload is read exactly once.

use md5::{Digest, Md5};
use std::fmt;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Lowercase hex MD5 digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental MD5 hasher
#[derive(Default)]
pub struct ContentHasher {
    inner: Md5,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self { inner: Md5::new() }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> ContentHash {
        ContentHash(hex::encode(self.inner.finalize()))
    }
}

/// Hash an in-memory buffer
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hash a file on disk, returning the digest and the number of bytes read.
pub async fn hash_file(path: &Path) -> io::Result<(ContentHash, u64)> {
    let file = tokio::fs::File::open(path).await?;
    let mut reader = HashingReader::new(file, u64::MAX);
    tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    Ok(reader.finalize())
}

/// `AsyncRead` adapter that hashes and counts every byte passing through it.
///
/// Once more than `max_size` bytes have been read the next poll fails with
/// `InvalidData` and [`HashingReader::limit_exceeded`] reports `true`, so the
/// caller can tell an oversize upload apart from an I/O failure.
pub struct HashingReader<R> {
    inner: R,
    hasher: ContentHasher,
    size: u64,
    max_size: u64,
    limit_exceeded: bool,
}

impl<R> HashingReader<R> {
    pub fn new(inner: R, max_size: u64) -> Self {
        Self {
            inner,
            hasher: ContentHasher::new(),
            size: 0,
            max_size,
            limit_exceeded: false,
        }
    }

    pub fn limit_exceeded(&self) -> bool {
        self.limit_exceeded
    }

    pub fn finalize(self) -> (ContentHash, u64) {
        (self.hasher.finalize(), self.size)
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for HashingReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.limit_exceeded {
            return Poll::Ready(Err(size_limit_error(self.max_size)));
        }

        let before = buf.filled().len();
        let this = &mut *self;
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let read = &buf.filled()[before..];
                this.hasher.update(read);
                this.size += read.len() as u64;

                if this.size > this.max_size {
                    this.limit_exceeded = true;
                    return Poll::Ready(Err(size_limit_error(this.max_size)));
                }
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}

fn size_limit_error(max_size: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("upload exceeds {} bytes", max_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            hash_bytes(b"abcdefghij").as_str(),
            "a925576942e94b2ef57a066101b48876"
        );
        assert_eq!(hash_bytes(b"").as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = ContentHasher::new();
        hasher.update(b"abcde");
        hasher.update(b"fghij");
        assert_eq!(hasher.finalize(), hash_bytes(b"abcdefghij"));
    }

    #[tokio::test]
    async fn test_hashing_reader_passes_bytes_through() {
        let data: &[u8] = b"abcdefghij";
        let mut reader = HashingReader::new(data, 10);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();

        assert_eq!(out, b"abcdefghij");
        assert!(!reader.limit_exceeded());
        let (hash, size) = reader.finalize();
        assert_eq!(hash.as_str(), "a925576942e94b2ef57a066101b48876");
        assert_eq!(size, 10);
    }

    #[tokio::test]
    async fn test_hashing_reader_enforces_limit() {
        let data: &[u8] = b"abcdefghij";
        let mut reader = HashingReader::new(data, 9);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(reader.limit_exceeded());
    }

    #[tokio::test]
    async fn test_hash_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        std::fs::write(&path, b"abcdefghij").unwrap();

        let (hash, size) = hash_file(&path).await.unwrap();
        assert_eq!(hash.as_str(), "a925576942e94b2ef57a066101b48876");
        assert_eq!(size, 10);
    }
}

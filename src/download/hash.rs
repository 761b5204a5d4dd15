//! MD5 content digests for duplicate detection and fallback filenames.
//!
//! Files are hashed in fixed-size chunks so memory use stays bounded no
//! matter how large the existing file is.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use super::constants::HASH_CHUNK_SIZE;

/// A 16-byte MD5 digest of some content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 16]);

impl ContentDigest {
    /// Digest of an in-memory byte slice.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(bytes);
        Self::from_hasher(hasher)
    }

    /// Digest of a file's contents, read in [`HASH_CHUNK_SIZE`] chunks.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the file cannot be opened or read.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::of_reader(file)
    }

    /// Digest of everything a reader yields, consumed chunk by chunk.
    ///
    /// # Errors
    ///
    /// Returns the first non-interrupt read error.
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Md5::new();
        let mut buf = [0u8; HASH_CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(Self::from_hasher(hasher))
    }

    fn from_hasher(hasher: Md5) -> Self {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex rendering (32 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex characters, used for synthesized filenames.
    #[must_use]
    pub fn hex_prefix(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

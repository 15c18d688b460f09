//! Fixed-length digest type and its canonical hex form.

use std::{fmt, str::FromStr};

use bincode::{Decode, Encode};

use crate::MerkleError;

/// Length in bytes of every digest in the tree.
pub const DIGEST_LEN: usize = 32;

/// Length of the canonical lowercase hex representation of a digest.
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// A 32-byte hash output.
///
/// Displayed, parsed and combined through its canonical lowercase hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; DIGEST_LEN] {
        self.0
    }

    /// Canonical lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Write the canonical hex form as ASCII into `out`, which must be
    /// `DIGEST_HEX_LEN` bytes long.
    pub(crate) fn write_hex(&self, out: &mut [u8]) {
        hex::encode_to_slice(self.0, out).expect("output buffer is exactly twice the digest length");
    }

    /// Parse a 64-character hex string. Upper-case input is accepted and
    /// normalized; anything else of the wrong length or alphabet is rejected.
    pub fn from_hex(s: &str) -> Result<Self, MerkleError> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(MerkleError::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                DIGEST_HEX_LEN,
                s.len()
            )));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| MerkleError::InvalidDigest(format!("{}: {}", s, e)))?;
        Ok(Digest(bytes))
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Parse a list of hex digests, failing on the first malformed entry.
pub fn parse_digests<S: AsRef<str>>(hexes: &[S]) -> Result<Vec<Digest>, MerkleError> {
    hexes.iter().map(|s| Digest::from_hex(s.as_ref())).collect()
}

/// Render a list of digests as canonical hex strings.
pub fn to_hex_strings(digests: &[Digest]) -> Vec<String> {
    digests.iter().map(Digest::to_hex).collect()
}

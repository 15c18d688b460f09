//! Leaf hashing and the pair-combination rule shared by builder and verifier.
//!
//! A parent digest is the hash of the two children's canonical lowercase hex
//! strings concatenated (128 ASCII bytes), not of their raw bytes:
//!
//! `parent = H(hex(left) || hex(right))`
//!
//! Existing roots depend on this exact encoding.
//!
//! The single-chunk primitives on [`MerkleHasher`] are fixed by the hasher
//! type and carry no version. [`hash_chunks`], which produces a whole leaf
//! set, is checked against the version table like the other tree operations.

use firmware_merkle_costs::{CostResult, CostsExt, OperationCost};
use firmware_merkle_version::{check_v0, version::MerkleVersion};
use sha2::{Digest as _, Sha256};

use crate::{
    MerkleError,
    digest::{DIGEST_HEX_LEN, Digest},
};

/// A 256-bit hash primitive used for both leaves and parents.
pub trait MerkleHasher {
    /// Short name used in trace output.
    const NAME: &'static str;

    /// Hash arbitrary bytes.
    fn digest(data: &[u8]) -> Digest;

    /// Hash one chunk into a leaf digest. The empty chunk is hashed like any
    /// other input.
    fn hash_chunk(chunk: &[u8]) -> Digest {
        Self::digest(chunk)
    }

    /// Combine two digests into their parent.
    fn combine(left: &Digest, right: &Digest) -> Digest {
        let mut input = [0u8; 2 * DIGEST_HEX_LEN];
        left.write_hex(&mut input[..DIGEST_HEX_LEN]);
        right.write_hex(&mut input[DIGEST_HEX_LEN..]);
        Self::digest(&input)
    }
}

/// SHA-256, the primitive existing firmware roots were computed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    const NAME: &'static str = "sha256";

    fn digest(data: &[u8]) -> Digest {
        let out: [u8; 32] = Sha256::digest(data).into();
        Digest::new(out)
    }
}

/// BLAKE3, for trees that do not need to match SHA-256 roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    const NAME: &'static str = "blake3";

    fn digest(data: &[u8]) -> Digest {
        Digest::new(*blake3::hash(data).as_bytes())
    }
}

/// Hasher used by the string API.
pub type DefaultHasher = Sha256Hasher;

/// Hash every chunk into its leaf digest, in order.
pub fn hash_chunks<H: MerkleHasher, C: AsRef<[u8]>>(
    chunks: &[C],
    merkle_version: &MerkleVersion,
) -> CostResult<Vec<Digest>, MerkleError> {
    check_v0!(
        "hash_chunks",
        merkle_version.tree_versions.chunking.hash_chunks
    );
    chunks
        .iter()
        .map(|chunk| H::hash_chunk(chunk.as_ref()))
        .collect::<Vec<_>>()
        .wrap_fn_cost(|leaves| {
            let mut cost = OperationCost::default();
            cost.add_hash_byte_calls(leaves.len());
            cost
        })
        .map(Ok)
}

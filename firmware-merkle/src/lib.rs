//! Merkle root and inclusion proofs over fixed-size firmware chunks.
//!
//! Each chunk is hashed into a leaf digest. Leaves are folded pairwise, level
//! by level, into a single root:
//!
//! - a level of odd length has its last digest duplicated before pairing;
//! - a parent is `H(hex(left) || hex(right))`, the hash of the two
//!   children's lowercase hex strings, not of their raw bytes.
//!
//! A proof for one leaf is the list of sibling digests met on the way up,
//! leaf to root. Verification never fails; a proof that does not reconstruct
//! the root is simply `false`.
//!
//! # Layers
//!
//! - [`hash_chunk`], [`build_merkle_root`], [`generate_merkle_proof`],
//!   [`verify_merkle_proof`] and [`verify_merkle_proof_at`] speak 64-char hex
//!   strings and use SHA-256.
//! - [`tree::build_root`], [`proof::generate_proof`], [`MerkleTree`] and
//!   [`MerkleProof`] work on [`Digest`] values, are generic over the
//!   [`MerkleHasher`], and report hashing work as a
//!   [`CostResult`](firmware_merkle_costs::CostResult).

pub mod batch;
pub mod chunk;
pub mod digest;
mod error;
pub mod hash;
pub mod proof;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

pub use digest::{DIGEST_HEX_LEN, DIGEST_LEN, Digest};
pub use error::MerkleError;
pub use firmware_merkle_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use firmware_merkle_version::version::MerkleVersion;
pub use hash::{Blake3Hasher, DefaultHasher, MerkleHasher, Sha256Hasher};
pub use proof::MerkleProof;
pub use tree::MerkleTree;

use crate::digest::{parse_digests, to_hex_strings};

/// Hash one chunk and return its leaf digest as hex.
pub fn hash_chunk(bytes: &[u8]) -> String {
    DefaultHasher::hash_chunk(bytes).to_hex()
}

/// Merkle root of hex leaf digests.
///
/// Fails with [`MerkleError::EmptyInput`] on an empty list and
/// [`MerkleError::InvalidDigest`] on malformed hex.
pub fn build_merkle_root<S: AsRef<str>>(leaves: &[S]) -> Result<String, MerkleError> {
    let leaves = parse_digests(leaves)?;
    tree::build_root::<DefaultHasher>(&leaves, MerkleVersion::latest())
        .value
        .map(|root| root.to_hex())
}

/// Proof path for leaf `index`, as hex digests ordered leaf to root.
///
/// Fails with [`MerkleError::IndexOutOfRange`] when `index` is not a leaf.
pub fn generate_merkle_proof<S: AsRef<str>>(
    leaves: &[S],
    index: usize,
) -> Result<Vec<String>, MerkleError> {
    let leaves = parse_digests(leaves)?;
    proof::generate_proof::<DefaultHasher>(&leaves, index, MerkleVersion::latest())
        .value
        .map(|path| to_hex_strings(&path))
}

/// Fold `leaf` with each proof entry as `H(current || sibling)` and compare
/// with `root`. Malformed hex anywhere yields `false`.
pub fn verify_merkle_proof<S: AsRef<str>>(leaf: &str, proof: &[S], root: &str) -> bool {
    match parse_verification_inputs(leaf, proof, root) {
        Some((leaf, proof, root)) => proof::verify_proof::<DefaultHasher>(&leaf, &proof, &root),
        None => false,
    }
}

/// Positional verification of the proof for leaf `index`. Malformed hex
/// anywhere yields `false`.
pub fn verify_merkle_proof_at<S: AsRef<str>>(
    leaf: &str,
    index: usize,
    proof: &[S],
    root: &str,
) -> bool {
    match parse_verification_inputs(leaf, proof, root) {
        Some((leaf, proof, root)) => {
            proof::verify_proof_at::<DefaultHasher>(&leaf, index, &proof, &root)
        }
        None => false,
    }
}

fn parse_verification_inputs<S: AsRef<str>>(
    leaf: &str,
    proof: &[S],
    root: &str,
) -> Option<(Digest, Vec<Digest>, Digest)> {
    let leaf = Digest::from_hex(leaf).ok()?;
    let proof = parse_digests(proof).ok()?;
    let root = Digest::from_hex(root).ok()?;
    Some((leaf, proof, root))
}

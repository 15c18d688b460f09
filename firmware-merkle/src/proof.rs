//! Inclusion proof generation and verification.
//!
//! A proof path holds one sibling digest per level, ordered leaf to root. It
//! is produced by re-running the same fold as the root builder while
//! tracking the target's position: at each level the sibling of the tracked
//! index is recorded, then the index is halved.
//!
//! Two verifiers are provided:
//!
//! - [`verify_proof`] always combines `H(current || sibling)`. It does not
//!   know the leaf index, so it only reconstructs the root for paths where
//!   the tracked node is a left child at every level (leaf 0). Existing
//!   callers depend on this exact behavior.
//! - [`verify_proof_at`] takes the leaf index and puts the sibling on the
//!   side it occupied in the tree. It accepts every proof produced by
//!   [`generate_proof`].

use bincode::{Decode, Encode};
use firmware_merkle_costs::{CostResult, CostsExt, OperationCost};
use firmware_merkle_version::{check_v0, version::MerkleVersion};
use tracing::{debug, trace};

use crate::{
    Digest, MerkleError, MerkleHasher,
    tree::{fold_level, pad_level, tree_height},
};

/// Largest encoded proof accepted by [`MerkleProof::decode_from_slice`].
const MAX_ENCODED_PROOF_BYTES: usize = 1024 * 1024;

/// Index of the node paired with `index` on a padded level.
pub(crate) fn sibling_index(index: usize) -> usize {
    index ^ 1
}

/// Generate the proof path for leaf `index`.
///
/// Fails with [`MerkleError::EmptyInput`] on zero leaves and
/// [`MerkleError::IndexOutOfRange`] when `index >= leaves.len()`.
pub fn generate_proof<H: MerkleHasher>(
    leaves: &[Digest],
    index: usize,
    merkle_version: &MerkleVersion,
) -> CostResult<Vec<Digest>, MerkleError> {
    check_v0!(
        "generate_proof",
        merkle_version.tree_versions.proof.generate_proof
    );
    let mut cost = OperationCost::default();

    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput).wrap_with_cost(cost);
    }
    if index >= leaves.len() {
        return Err(MerkleError::IndexOutOfRange {
            index,
            leaf_count: leaves.len(),
        })
        .wrap_with_cost(cost);
    }

    let mut level = leaves.to_vec();
    let mut tracked = index;
    let mut path = Vec::with_capacity(tree_height(leaves.len() as u64));
    while level.len() > 1 {
        pad_level(&mut level);
        path.push(level[sibling_index(tracked)]);
        level = fold_level::<H>(&level);
        cost.add_hash_node_calls(level.len());
        tracked /= 2;
    }

    debug!(
        hasher = H::NAME,
        leaf_count = leaves.len(),
        index,
        path_len = path.len(),
        "generated merkle proof"
    );
    Ok(path).wrap_with_cost(cost)
}

/// Fold `leaf` with each sibling as `H(current || sibling)` and compare with
/// `expected_root`. Never fails; a mismatch is `false`.
pub fn verify_proof<H: MerkleHasher>(
    leaf: &Digest,
    proof: &[Digest],
    expected_root: &Digest,
) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |current, sibling| H::combine(&current, sibling));
    let matches = &computed == expected_root;
    if !matches {
        trace!(computed = %computed, expected = %expected_root, "proof did not reconstruct root");
    }
    matches
}

/// Like [`verify_proof`], but the parity of the tracked index at each level
/// decides whether the sibling is combined on the right (even) or the left
/// (odd).
pub fn verify_proof_at<H: MerkleHasher>(
    leaf: &Digest,
    index: usize,
    proof: &[Digest],
    expected_root: &Digest,
) -> bool {
    let mut tracked = index;
    let mut current = *leaf;
    for sibling in proof {
        current = if tracked % 2 == 0 {
            H::combine(&current, sibling)
        } else {
            H::combine(sibling, &current)
        };
        tracked /= 2;
    }
    let matches = &current == expected_root;
    if !matches {
        trace!(index, computed = %current, expected = %expected_root, "proof did not reconstruct root");
    }
    matches
}

/// A self-describing inclusion proof for one leaf.
///
/// Carries the leaf position and tree size next to the sibling path so it can
/// be checked on its own after being stored or sent elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct MerkleProof {
    /// 0-based index of the proved leaf.
    pub leaf_index: u64,
    /// Number of leaves in the tree the proof was cut from.
    pub leaf_count: u64,
    /// Sibling digests, leaf to root.
    pub siblings: Vec<Digest>,
}

impl MerkleProof {
    /// Generate a proof for leaf `index` by re-folding `leaves`.
    pub fn generate<H: MerkleHasher>(
        leaves: &[Digest],
        index: usize,
        merkle_version: &MerkleVersion,
    ) -> CostResult<Self, MerkleError> {
        generate_proof::<H>(leaves, index, merkle_version).map_ok(|siblings| MerkleProof {
            leaf_index: index as u64,
            leaf_count: leaves.len() as u64,
            siblings,
        })
    }

    /// Check `leaf` against `expected_root` with the positional verifier.
    ///
    /// Returns `false` (never an error) when the index is outside the tree,
    /// when the path length does not match the tree height implied by
    /// `leaf_count`, or when the root does not match.
    pub fn verify<H: MerkleHasher>(&self, leaf: &Digest, expected_root: &Digest) -> bool {
        if self.leaf_index >= self.leaf_count {
            trace!(
                leaf_index = self.leaf_index,
                leaf_count = self.leaf_count,
                "proof index outside tree"
            );
            return false;
        }
        if self.siblings.len() != tree_height(self.leaf_count) {
            trace!(
                path_len = self.siblings.len(),
                expected = tree_height(self.leaf_count),
                "proof path length does not match tree height"
            );
            return false;
        }
        let Ok(index) = usize::try_from(self.leaf_index) else {
            return false;
        };
        verify_proof_at::<H>(leaf, index, &self.siblings, expected_root)
    }

    /// Sibling path as canonical hex strings.
    pub fn to_hex_path(&self) -> Vec<String> {
        crate::digest::to_hex_strings(&self.siblings)
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleError::InvalidProof(format!("failed to encode MerkleProof: {}", e)))
    }

    /// Deserialize a proof from bytes.
    ///
    /// The decode limit is capped so a crafted length header cannot cause a
    /// huge allocation. Trailing bytes are rejected.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<MAX_ENCODED_PROOF_BYTES>();
        let (proof, read) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleError::InvalidProof(format!("failed to decode MerkleProof: {}", e)))?;
        if read != bytes.len() {
            return Err(MerkleError::InvalidProof(format!(
                "{} trailing bytes after MerkleProof",
                bytes.len() - read
            )));
        }
        Ok(proof)
    }
}

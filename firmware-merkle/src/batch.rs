//! Parallel processing of many independent trees.
//!
//! Each tree is still folded sequentially; only separate trees run
//! concurrently. Results keep the input order.

use firmware_merkle_costs::CostResult;
use firmware_merkle_version::version::MerkleVersion;
use rayon::prelude::*;

use crate::{Digest, MerkleError, MerkleHasher, MerkleProof, tree::build_root};

/// A leaf, its proof and the root it should reconstruct.
#[derive(Debug, Clone, Copy)]
pub struct ProofCheck<'a> {
    pub leaf: Digest,
    pub proof: &'a MerkleProof,
    pub root: Digest,
}

/// Build the root of every leaf set. A failing set does not affect the others.
pub fn build_roots<H, L>(
    trees: &[L],
    merkle_version: &MerkleVersion,
) -> Vec<CostResult<Digest, MerkleError>>
where
    H: MerkleHasher,
    L: AsRef<[Digest]> + Sync,
{
    trees
        .par_iter()
        .map(|leaves| build_root::<H>(leaves.as_ref(), merkle_version))
        .collect()
}

/// Verify every proof with [`MerkleProof::verify`].
pub fn verify_proofs<H: MerkleHasher>(checks: &[ProofCheck<'_>]) -> Vec<bool> {
    checks
        .par_iter()
        .map(|check| check.proof.verify::<H>(&check.leaf, &check.root))
        .collect()
}

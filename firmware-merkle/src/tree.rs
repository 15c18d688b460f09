//! Bottom-up Merkle root construction.
//!
//! Each level is folded pairwise into the next. A level of odd length has its
//! last digest duplicated before pairing, exactly once per level, and the
//! duplicate is indistinguishable from a real sibling.

use std::marker::PhantomData;

use firmware_merkle_costs::{CostResult, CostsExt, OperationCost};
use firmware_merkle_version::{check_v0, version::MerkleVersion};
use tracing::debug;

use crate::{
    Digest, MerkleError, MerkleHasher, Sha256Hasher,
    proof::{MerkleProof, sibling_index},
};

/// Duplicate the last digest of an odd-length level.
pub(crate) fn pad_level(level: &mut Vec<Digest>) {
    if level.len() % 2 == 1 {
        if let Some(&last) = level.last() {
            level.push(last);
        }
    }
}

/// Fold an even-length level into its parents.
pub(crate) fn fold_level<H: MerkleHasher>(level: &[Digest]) -> Vec<Digest> {
    level
        .chunks_exact(2)
        .map(|pair| H::combine(&pair[0], &pair[1]))
        .collect()
}

/// Number of folding levels above `leaf_count` leaves, which is also the
/// length of every proof path in that tree.
pub fn tree_height(leaf_count: u64) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (u64::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Compute the Merkle root of `leaves`.
///
/// A single leaf is its own root. Empty input is rejected with
/// [`MerkleError::EmptyInput`].
pub fn build_root<H: MerkleHasher>(
    leaves: &[Digest],
    merkle_version: &MerkleVersion,
) -> CostResult<Digest, MerkleError> {
    check_v0!(
        "build_root",
        merkle_version.tree_versions.build.build_root
    );
    let mut cost = OperationCost::default();

    let Some(&first) = leaves.first() else {
        return Err(MerkleError::EmptyInput).wrap_with_cost(cost);
    };

    let mut level = leaves.to_vec();
    let mut root = first;
    while level.len() > 1 {
        pad_level(&mut level);
        level = fold_level::<H>(&level);
        cost.add_hash_node_calls(level.len());
        root = level[0];
    }

    debug!(
        hasher = H::NAME,
        leaf_count = leaves.len(),
        hash_node_calls = cost.hash_node_calls,
        root = %root,
        "built merkle root"
    );
    Ok(root).wrap_with_cost(cost)
}

/// A fully built tree that keeps every level.
///
/// `levels()[0]` are the leaves and the last level holds only the root. Every
/// level below the root is stored after odd-length padding, so
/// `levels()[k][i]` is exactly the node a fold would pair at level `k`.
/// Proofs cut from the stored levels need no further hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree<H = Sha256Hasher> {
    levels: Vec<Vec<Digest>>,
    leaf_count: usize,
    root: Digest,
    _hasher: PhantomData<fn() -> H>,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Build the tree over `leaves`, retaining every level.
    pub fn build(
        leaves: &[Digest],
        merkle_version: &MerkleVersion,
    ) -> CostResult<Self, MerkleError> {
        check_v0!(
            "MerkleTree::build",
            merkle_version.tree_versions.build.build_tree
        );
        let mut cost = OperationCost::default();

        let Some(&first) = leaves.first() else {
            return Err(MerkleError::EmptyInput).wrap_with_cost(cost);
        };

        let mut levels = Vec::with_capacity(tree_height(leaves.len() as u64) + 1);
        let mut level = leaves.to_vec();
        let mut root = first;
        while level.len() > 1 {
            pad_level(&mut level);
            let parents = fold_level::<H>(&level);
            cost.add_hash_node_calls(parents.len());
            root = parents[0];
            levels.push(std::mem::replace(&mut level, parents));
        }
        levels.push(level);

        debug!(
            hasher = H::NAME,
            leaf_count = leaves.len(),
            height = levels.len() - 1,
            root = %root,
            "built merkle tree"
        );
        Ok(MerkleTree {
            levels,
            leaf_count: leaves.len(),
            root,
            _hasher: PhantomData,
        })
        .wrap_with_cost(cost)
    }

    pub fn root(&self) -> Digest {
        self.root
    }

    /// Number of real leaves, not counting any padding duplicate.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of levels above the leaves.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// The leaf digest at `index`, if it is a real leaf.
    pub fn leaf(&self, index: usize) -> Option<Digest> {
        if index >= self.leaf_count {
            return None;
        }
        self.levels.first().and_then(|leaves| leaves.get(index)).copied()
    }

    /// Cut the proof for leaf `index` from the stored levels.
    pub fn proof(
        &self,
        index: usize,
        merkle_version: &MerkleVersion,
    ) -> CostResult<MerkleProof, MerkleError> {
        check_v0!(
            "MerkleTree::proof",
            merkle_version.tree_versions.proof.tree_proof
        );
        let cost = OperationCost::default();
        if index >= self.leaf_count {
            return Err(MerkleError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count,
            })
            .wrap_with_cost(cost);
        }

        let mut tracked = index;
        let mut siblings = Vec::with_capacity(self.height());
        for level in &self.levels[..self.height()] {
            siblings.push(level[sibling_index(tracked)]);
            tracked /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index as u64,
            leaf_count: self.leaf_count as u64,
            siblings,
        })
        .wrap_with_cost(cost)
    }
}

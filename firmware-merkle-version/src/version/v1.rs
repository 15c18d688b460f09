use crate::version::{
    MerkleVersion,
    tree_versions::{
        MerkleChunkingVersions, MerkleTreeBuildVersions, MerkleTreeProofVersions,
        MerkleTreeVersions,
    },
};

/// SHA-256 leaves, hex-string pair concatenation, duplicate-last-node on odd
/// levels.
pub const MERKLE_V1: MerkleVersion = MerkleVersion {
    protocol_version: 0,
    tree_versions: MerkleTreeVersions {
        build: MerkleTreeBuildVersions {
            build_root: 0,
            build_tree: 0,
        },
        proof: MerkleTreeProofVersions {
            generate_proof: 0,
            tree_proof: 0,
        },
        chunking: MerkleChunkingVersions {
            hash_chunks: 0,
            leaf_digests: 0,
            leaf_digests_from_reader: 0,
        },
    },
};

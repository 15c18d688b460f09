use versioned_feature_core::FeatureVersion;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleTreeVersions {
    pub build: MerkleTreeBuildVersions,
    pub proof: MerkleTreeProofVersions,
    pub chunking: MerkleChunkingVersions,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleTreeBuildVersions {
    pub build_root: FeatureVersion,
    pub build_tree: FeatureVersion,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleTreeProofVersions {
    pub generate_proof: FeatureVersion,
    pub tree_proof: FeatureVersion,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleChunkingVersions {
    pub hash_chunks: FeatureVersion,
    pub leaf_digests: FeatureVersion,
    pub leaf_digests_from_reader: FeatureVersion,
}

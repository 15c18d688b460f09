pub mod tree_versions;
pub mod v1;

pub use versioned_feature_core::*;

use crate::version::{tree_versions::MerkleTreeVersions, v1::MERKLE_V1};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleVersion {
    pub protocol_version: u32,
    pub tree_versions: MerkleTreeVersions,
}

impl MerkleVersion {
    pub fn first<'a>() -> &'a Self {
        MERKLE_VERSIONS
            .first()
            .expect("expected to have a merkle version")
    }

    pub fn latest<'a>() -> &'a Self {
        MERKLE_VERSIONS
            .last()
            .expect("expected to have a merkle version")
    }
}

pub const MERKLE_VERSIONS: &[MerkleVersion] = &[MERKLE_V1];

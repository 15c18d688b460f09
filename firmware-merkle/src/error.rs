use firmware_merkle_version::error::MerkleVersionError;
use thiserror::Error;

/// Errors from Merkle tree construction, proof generation and chunking.
///
/// A proof that fails to reconstruct the expected root is not an error; the
/// verifiers report it as `false`.
#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("cannot build a merkle tree from zero leaves")]
    EmptyInput,
    #[error("leaf index {index} out of range (leaf_count={leaf_count})")]
    IndexOutOfRange { index: usize, leaf_count: usize },
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
    #[error("chunk size must be greater than zero, got {0}")]
    InvalidChunkSize(usize),
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Version(#[from] MerkleVersionError),
}

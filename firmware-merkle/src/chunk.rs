//! Splitting a firmware image into fixed-size chunks and hashing them into
//! leaves.

use std::io::{self, Read};

use firmware_merkle_costs::{
    CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add,
};
use firmware_merkle_version::{check_v0, version::MerkleVersion};
use tracing::debug;

use crate::{Digest, MerkleError, MerkleHasher, hash::hash_chunks, tree::build_root};

/// Chunk size used for firmware images: 4 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Split `data` into `chunk_size` pieces; the last one may be shorter.
///
/// Empty data yields no chunks.
pub fn split_chunks(data: &[u8], chunk_size: usize) -> Result<Vec<&[u8]>, MerkleError> {
    if chunk_size == 0 {
        return Err(MerkleError::InvalidChunkSize(chunk_size));
    }
    Ok(data.chunks(chunk_size).collect())
}

/// Split `data` into chunks and hash each into a leaf digest.
pub fn leaf_digests<H: MerkleHasher>(
    data: &[u8],
    chunk_size: usize,
    merkle_version: &MerkleVersion,
) -> CostResult<Vec<Digest>, MerkleError> {
    check_v0!(
        "leaf_digests",
        merkle_version.tree_versions.chunking.leaf_digests
    );
    let cost = OperationCost::default();
    let chunks = cost_return_on_error_no_add!(&cost, split_chunks(data, chunk_size));
    hash_chunks::<H, _>(&chunks, merkle_version)
}

/// Read `reader` to the end in `chunk_size` pieces and hash each into a leaf
/// digest.
///
/// Every chunk except the last is exactly `chunk_size` bytes regardless of
/// how the reader splits its reads.
pub fn leaf_digests_from_reader<H: MerkleHasher, R: Read>(
    mut reader: R,
    chunk_size: usize,
    merkle_version: &MerkleVersion,
) -> CostResult<Vec<Digest>, MerkleError> {
    check_v0!(
        "leaf_digests_from_reader",
        merkle_version.tree_versions.chunking.leaf_digests_from_reader
    );
    let mut cost = OperationCost::default();
    if chunk_size == 0 {
        return Err(MerkleError::InvalidChunkSize(chunk_size)).wrap_with_cost(cost);
    }

    let mut buf = vec![0u8; chunk_size];
    let mut leaves = Vec::new();
    loop {
        let filled = cost_return_on_error_no_add!(
            &cost,
            fill_chunk(&mut reader, &mut buf).map_err(MerkleError::from)
        );
        if filled == 0 {
            break;
        }
        leaves.push(H::hash_chunk(&buf[..filled]));
        cost.add_hash_byte_calls(1);
        if filled < chunk_size {
            break;
        }
    }

    debug!(
        hasher = H::NAME,
        chunk_size,
        chunks = leaves.len(),
        "hashed chunks from reader"
    );
    Ok(leaves).wrap_with_cost(cost)
}

/// Merkle root of a firmware image held in memory.
///
/// An empty image has no leaves and fails with [`MerkleError::EmptyInput`].
pub fn image_root<H: MerkleHasher>(
    data: &[u8],
    chunk_size: usize,
    merkle_version: &MerkleVersion,
) -> CostResult<Digest, MerkleError> {
    let mut cost = OperationCost::default();
    let leaves = cost_return_on_error!(
        &mut cost,
        leaf_digests::<H>(data, chunk_size, merkle_version)
    );
    build_root::<H>(&leaves, merkle_version).add_cost(cost)
}

/// Merkle root of a firmware image streamed from `reader`.
pub fn image_root_from_reader<H: MerkleHasher, R: Read>(
    reader: R,
    chunk_size: usize,
    merkle_version: &MerkleVersion,
) -> CostResult<Digest, MerkleError> {
    let mut cost = OperationCost::default();
    let leaves = cost_return_on_error!(
        &mut cost,
        leaf_digests_from_reader::<H, R>(reader, chunk_size, merkle_version)
    );
    build_root::<H>(&leaves, merkle_version).add_cost(cost)
}

/// Fill `buf` from `reader`, stopping early only at end of input.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{Sha256Hasher, test_utils::firmware_image};

    /// Hands out at most `step` bytes per read and fails with `Interrupted`
    /// every other call.
    struct TrickleReader<'a> {
        data: &'a [u8],
        step: usize,
        interrupt: bool,
    }

    impl Read for TrickleReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "flash read failed"))
        }
    }

    #[test]
    fn test_split_chunks_sizes() {
        let data = firmware_image(10);
        let chunks = split_chunks(&data, 4).expect("split");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], &data[0..4]);
        assert_eq!(chunks[2], &data[8..10]);

        assert!(split_chunks(&[], 4).expect("split").is_empty());
        assert_matches!(split_chunks(&data, 0), Err(MerkleError::InvalidChunkSize(0)));
    }

    #[test]
    fn test_leaf_digests_match_manual_hashing() {
        let data = firmware_image(4096 + 17);
        let ctx = leaf_digests::<Sha256Hasher>(&data, 1024, MerkleVersion::latest());
        assert_eq!(ctx.cost.hash_byte_calls, 5);
        let leaves = ctx.value.expect("leaves");
        assert_eq!(leaves.len(), 5);
        assert_eq!(leaves[4], Sha256Hasher::hash_chunk(&data[4096..]));
    }

    #[test]
    fn test_reader_boundaries_ignore_short_reads() {
        let data = firmware_image(1000);
        let expected = leaf_digests::<Sha256Hasher>(&data, 64, MerkleVersion::latest())
            .value
            .expect("leaves");

        let reader = TrickleReader {
            data: &data,
            step: 7,
            interrupt: false,
        };
        let ctx = leaf_digests_from_reader::<Sha256Hasher, _>(reader, 64, MerkleVersion::latest());
        assert_eq!(ctx.cost.hash_byte_calls, expected.len() as u32);
        assert_eq!(ctx.value.expect("leaves"), expected);
    }

    #[test]
    fn test_reader_exact_multiple_has_no_empty_tail() {
        let data = firmware_image(256);
        let leaves = leaf_digests_from_reader::<Sha256Hasher, _>(
            data.as_slice(),
            64,
            MerkleVersion::latest(),
        )
        .value
        .expect("leaves");
        assert_eq!(leaves.len(), 4);
    }

    #[test]
    fn test_reader_errors() {
        let ctx = leaf_digests_from_reader::<Sha256Hasher, _>(
            FailingReader,
            64,
            MerkleVersion::latest(),
        );
        assert_matches!(ctx.value, Err(MerkleError::Io(_)));

        let ctx = leaf_digests_from_reader::<Sha256Hasher, _>(
            &b"abc"[..],
            0,
            MerkleVersion::latest(),
        );
        assert_matches!(ctx.value, Err(MerkleError::InvalidChunkSize(0)));
    }

    #[test]
    fn test_image_root_bills_leaves_and_nodes() {
        let data = firmware_image(10 * 64);
        let ctx = image_root::<Sha256Hasher>(&data, 64, MerkleVersion::latest());
        let leaves = leaf_digests::<Sha256Hasher>(&data, 64, MerkleVersion::latest())
            .value
            .expect("leaves");
        let expected = build_root::<Sha256Hasher>(&leaves, MerkleVersion::latest());
        assert_eq!(
            ctx.cost,
            OperationCost {
                hash_byte_calls: 10,
                hash_node_calls: expected.cost.hash_node_calls,
            }
        );
        assert_eq!(ctx.value.expect("root"), expected.value.expect("root"));

        let streamed = image_root_from_reader::<Sha256Hasher, _>(
            TrickleReader {
                data: &data,
                step: 13,
                interrupt: false,
            },
            64,
            MerkleVersion::latest(),
        );
        assert_eq!(streamed.cost, ctx.cost);
    }

    #[test]
    fn test_image_root_errors() {
        let ctx = image_root::<Sha256Hasher>(&[], 64, MerkleVersion::latest());
        assert_matches!(ctx.value, Err(MerkleError::EmptyInput));
        assert!(ctx.cost.is_nothing());

        let ctx = image_root::<Sha256Hasher>(&firmware_image(8), 0, MerkleVersion::latest());
        assert_matches!(ctx.value, Err(MerkleError::InvalidChunkSize(0)));

        let ctx = image_root_from_reader::<Sha256Hasher, _>(FailingReader, 64, MerkleVersion::latest());
        assert_matches!(ctx.value, Err(MerkleError::Io(_)));
    }

    #[test]
    fn test_empty_reader_yields_no_leaves() {
        let leaves = leaf_digests_from_reader::<Sha256Hasher, _>(
            io::empty(),
            DEFAULT_CHUNK_SIZE,
            MerkleVersion::latest(),
        )
        .value
        .expect("leaves");
        assert!(leaves.is_empty());
    }
}

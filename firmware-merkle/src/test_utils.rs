use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Digest, MerkleHasher, Sha256Hasher};

/// `count` distinct leaf digests.
pub(crate) fn leaves(count: usize) -> Vec<Digest> {
    (0..count as u32)
        .map(|i| Sha256Hasher::hash_chunk(&i.to_be_bytes()))
        .collect()
}

/// A deterministic firmware-like byte pattern.
pub(crate) fn firmware_image(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Random firmware bytes from a fixed seed.
pub(crate) fn random_firmware(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(data.as_mut_slice());
    data
}

use firmware_merkle::{
    Digest, MerkleHasher, MerkleProof, MerkleTree, MerkleVersion, Sha256Hasher,
    proof::{generate_proof, verify_proof, verify_proof_at},
    tree::build_root,
};
use proptest::prelude::*;

fn leaf_set() -> impl Strategy<Value = Vec<Digest>> {
    prop::collection::vec(any::<[u8; 32]>().prop_map(Digest::new), 1..40)
}

/// Odd leaf sets of at least three leaves. A single leaf is its own root and
/// is never paired, so it has no padded form.
fn odd_leaf_set() -> impl Strategy<Value = Vec<Digest>> {
    prop::collection::vec(any::<[u8; 32]>().prop_map(Digest::new), 3..40).prop_map(|mut leaves| {
        if leaves.len() % 2 == 0 {
            leaves.pop();
        }
        leaves
    })
}

fn leaf_set_with_index() -> impl Strategy<Value = (Vec<Digest>, usize)> {
    leaf_set().prop_flat_map(|leaves| {
        let len = leaves.len();
        (Just(leaves), 0..len)
    })
}

fn root_of(leaves: &[Digest]) -> Digest {
    build_root::<Sha256Hasher>(leaves, MerkleVersion::latest())
        .value
        .expect("non-empty leaves")
}

proptest! {
    #[test]
    fn chunk_hash_is_deterministic(chunk in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(Sha256Hasher::hash_chunk(&chunk), Sha256Hasher::hash_chunk(&chunk));
        prop_assert_eq!(
            firmware_merkle::hash_chunk(&chunk),
            Sha256Hasher::hash_chunk(&chunk).to_hex()
        );
    }

    #[test]
    fn single_leaf_is_its_own_root(bytes in any::<[u8; 32]>()) {
        let leaf = Digest::new(bytes);
        prop_assert_eq!(root_of(&[leaf]), leaf);
    }

    #[test]
    fn odd_sets_equal_their_padded_form(leaves in odd_leaf_set()) {
        let mut padded = leaves.clone();
        padded.push(*leaves.last().unwrap());
        prop_assert_eq!(root_of(&leaves), root_of(&padded));
    }

    #[test]
    fn tampering_any_leaf_changes_root((leaves, index) in leaf_set_with_index(), replacement in any::<[u8; 32]>()) {
        prop_assume!(leaves.len() >= 2);
        let replacement = Digest::new(replacement);
        prop_assume!(replacement != leaves[index]);
        let mut tampered = leaves.clone();
        tampered[index] = replacement;
        prop_assert_ne!(root_of(&leaves), root_of(&tampered));
    }

    #[test]
    fn positional_proofs_are_sound((leaves, index) in leaf_set_with_index()) {
        let root = root_of(&leaves);
        let path = generate_proof::<Sha256Hasher>(&leaves, index, MerkleVersion::latest())
            .value
            .expect("valid index");
        prop_assert!(verify_proof_at::<Sha256Hasher>(&leaves[index], index, &path, &root));

        let proof = MerkleProof::generate::<Sha256Hasher>(&leaves, index, MerkleVersion::latest())
            .value
            .expect("valid index");
        prop_assert!(proof.verify::<Sha256Hasher>(&leaves[index], &root));
    }

    #[test]
    fn leaf_zero_proofs_pass_the_index_free_verifier(leaves in leaf_set()) {
        let root = root_of(&leaves);
        let path = generate_proof::<Sha256Hasher>(&leaves, 0, MerkleVersion::latest())
            .value
            .expect("valid index");
        prop_assert!(verify_proof::<Sha256Hasher>(&leaves[0], &path, &root));
    }

    #[test]
    fn tampered_leaf_fails_both_verifiers((leaves, index) in leaf_set_with_index(), replacement in any::<[u8; 32]>()) {
        let replacement = Digest::new(replacement);
        prop_assume!(replacement != leaves[index]);
        let root = root_of(&leaves);
        let path = generate_proof::<Sha256Hasher>(&leaves, index, MerkleVersion::latest())
            .value
            .expect("valid index");
        prop_assert!(!verify_proof::<Sha256Hasher>(&replacement, &path, &root));
        prop_assert!(!verify_proof_at::<Sha256Hasher>(&replacement, index, &path, &root));
    }

    #[test]
    fn arena_and_refold_agree((leaves, index) in leaf_set_with_index()) {
        let tree = MerkleTree::<Sha256Hasher>::build(&leaves, MerkleVersion::latest())
            .value
            .expect("non-empty leaves");
        prop_assert_eq!(tree.root(), root_of(&leaves));
        let cut = tree.proof(index, MerkleVersion::latest()).value.expect("valid index");
        let refolded = MerkleProof::generate::<Sha256Hasher>(&leaves, index, MerkleVersion::latest())
            .value
            .expect("valid index");
        prop_assert_eq!(cut, refolded);
    }

    #[test]
    fn encoded_proofs_survive_decoding((leaves, index) in leaf_set_with_index()) {
        let proof = MerkleProof::generate::<Sha256Hasher>(&leaves, index, MerkleVersion::latest())
            .value
            .expect("valid index");
        let bytes = proof.encode_to_vec().expect("encode");
        let decoded = MerkleProof::decode_from_slice(&bytes).expect("decode");
        prop_assert!(decoded.verify::<Sha256Hasher>(&leaves[index], &root_of(&leaves)));
    }
}

use data_segment::verifier::compute_expected_aux_data;

use crate::{
    build_one_mib_aggregate,
    flip_first_byte,
    one_mib_sub_pieces,
};

/// Scenario 5: every sub-piece of the 1 MiB deal reconstructs the deal's
/// own commitment and size from nothing but its own `(commitment, size)`
/// and the proof pair `Aggregate::proof_for_piece_info` hands back.
#[test]
fn verifies_every_sub_piece_against_the_aggregate_root() {
    let aggregate = build_one_mib_aggregate();
    for (comm, size) in one_mib_sub_pieces() {
        let (proof_subtree, proof_index) = aggregate.proof_for_piece_info(comm, size).unwrap();
        let aux = compute_expected_aux_data(
            comm,
            size,
            &proof_subtree,
            &proof_index,
            aggregate.deal_size(),
            aggregate.max_index_entries(),
        )
        .expect("a proof produced by the aggregate itself must verify");
        assert_eq!(aux.comm_pa, aggregate.piece_cid());
        assert_eq!(aux.size_pa, aggregate.deal_size());
    }
}

/// Scenario 6: flipping a single bit inside either proof's path breaks
/// verification, for every sibling position in both proofs.
#[test]
fn corrupting_any_path_node_breaks_verification() {
    let aggregate = build_one_mib_aggregate();
    let (comm, size) = one_mib_sub_pieces()[0];
    let (proof_subtree, proof_index) = aggregate.proof_for_piece_info(comm, size).unwrap();

    for i in 0..proof_subtree.path().len() {
        let mut path = proof_subtree.path().to_vec();
        flip_first_byte(&mut path[i]);
        let tampered = data_segment::proof::ProofPath::new(proof_subtree.index(), path).unwrap();
        assert!(
            compute_expected_aux_data(
                comm,
                size,
                &tampered,
                &proof_index,
                aggregate.deal_size(),
                aggregate.max_index_entries(),
            )
            .is_err(),
            "flipping subtree-path sibling {i} should break verification"
        );
    }

    for i in 0..proof_index.path().len() {
        let mut path = proof_index.path().to_vec();
        flip_first_byte(&mut path[i]);
        let tampered = data_segment::proof::ProofPath::new(proof_index.index(), path).unwrap();
        assert!(
            compute_expected_aux_data(
                comm,
                size,
                &proof_subtree,
                &tampered,
                aggregate.deal_size(),
                aggregate.max_index_entries(),
            )
            .is_err(),
            "flipping index-path sibling {i} should break verification"
        );
    }
}

/// A proof built for one sub-piece's data must not verify against another
/// sub-piece's `(commitment, size)`.
#[test]
fn a_proof_does_not_transfer_to_a_different_sub_piece() {
    let aggregate = build_one_mib_aggregate();
    let pieces = one_mib_sub_pieces();
    let (proof_subtree, proof_index) = aggregate.proof_for_piece_info(pieces[0].0, pieces[0].1).unwrap();
    let result = compute_expected_aux_data(
        pieces[1].0,
        pieces[1].1,
        &proof_subtree,
        &proof_index,
        aggregate.deal_size(),
        aggregate.max_index_entries(),
    );
    assert!(result.is_err());
}

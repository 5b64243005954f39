use data_segment::{
    aggregate::{
        Aggregate,
        SubPiece,
    },
    error::{
        CapacityExceeded,
        Error,
        InvalidArgument,
    },
};

use crate::{
    build_one_mib_aggregate,
    one_mib_sub_pieces,
};

/// Scenario 1: two sub-pieces packed into a 1 MiB deal produce a single
/// root commitment that both sub-pieces can later prove inclusion under.
#[test]
fn two_sub_pieces_in_a_one_mebibyte_deal() {
    let aggregate = build_one_mib_aggregate();
    assert_eq!(aggregate.deal_size(), 1 << 20);
    assert_eq!(aggregate.index().len(), 2);

    // The root is the deal's commitment; every entry's descriptor placed in
    // the reserved tail region must validate.
    let root = aggregate.piece_cid();
    assert_ne!(root, [0u8; 32]);
    for entry in aggregate.index().valid_entries() {
        assert_eq!(entry.offset() % 128, 0);
        assert_eq!(entry.size() % 128, 0);
    }
}

/// Scenario 2: a deal size that is not a power of two is rejected before any
/// placement work happens.
#[test]
fn rejects_non_power_of_two_deal_size() {
    let pieces = one_mib_sub_pieces();
    let err = Aggregate::new((1 << 20) + 1, &pieces).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgument(InvalidArgument::NotAPowerOfTwo { .. })
    ));
}

/// Scenario 3: sub-pieces that individually fit their own alignment but
/// together overflow the deal are rejected as too large, not silently
/// truncated or overlapped.
#[test]
fn rejects_sub_pieces_that_overflow_the_deal() {
    let pieces: Vec<SubPiece> = vec![([0xa_u8; 32], 131_072), ([0xb_u8; 32], 524_288)];
    let err = Aggregate::new(1 << 20, &pieces).unwrap_err();
    assert!(matches!(
        err,
        Error::CapacityExceeded(CapacityExceeded::SubDealsTooLarge)
    ));
}

/// A deal built from zero sub-pieces never populates its tree, so its
/// commitment is exactly the zero-commitment for the tree's depth.
#[test]
fn empty_deal_commits_to_its_zero_commitment() {
    let deal_size = 1u64 << 10;
    let aggregate = Aggregate::new(deal_size, &[]).unwrap();
    let log2_leafs = (deal_size / 32).trailing_zeros();
    assert_eq!(aggregate.piece_cid(), data_segment::zero::for_level(log2_leafs));
    assert_eq!(aggregate.index().len(), 0);
}

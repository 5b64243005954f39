use data_segment::{
    hybrid::HybridTree,
    location::{
        CommAndLoc,
        Location,
    },
    placement,
};

use crate::build_one_mib_aggregate;

/// The placements computed for the 1 MiB deal's two sub-pieces are exactly
/// the slots the aggregate's own tree holds those commitments at: building a
/// fresh tree from `placement::place`'s output independently, outside the
/// `Aggregate` orchestrator, must agree node-for-node on every placed leaf.
#[test]
fn independently_placed_leaves_land_where_the_aggregate_put_them() {
    let aggregate = build_one_mib_aggregate();
    let pieces = [([1u8; 32], 524_288u64), ([2u8; 32], 262_144u64)];
    let result = placement::place(&pieces).unwrap();

    let log2_leafs = 15; // 1 MiB / 32 = 32768 leaves = 2^15
    let mut tree = HybridTree::new(log2_leafs).unwrap();
    let comm_and_locs: Vec<CommAndLoc> = result
        .placements
        .iter()
        .map(|p| CommAndLoc::new(p.comm_ds, Location::new(p.level, p.index, log2_leafs).unwrap()))
        .collect();
    tree.batch_set(&comm_and_locs).unwrap();

    for p in &result.placements {
        let from_fresh_tree = tree.get_node(p.level, p.index).unwrap();
        let from_aggregate = aggregate.index().entries().iter().find(|e| e.comm_ds() == p.comm_ds);
        assert!(from_aggregate.is_some());
        assert_eq!(from_fresh_tree, p.comm_ds);
    }
}

/// A longer, more irregular mix of sub-piece sizes still places every piece
/// on a boundary aligned to its own span, with no two spans overlapping.
#[test]
fn an_irregular_mix_of_sizes_places_without_overlap() {
    let pieces = [
        ([1u8; 32], 32u64),
        ([2u8; 32], 128u64),
        ([3u8; 32], 64u64),
        ([4u8; 32], 32u64),
        ([5u8; 32], 256u64),
        ([6u8; 32], 32u64),
    ];
    let result = placement::place(&pieces).unwrap();

    let mut spans: Vec<(u64, u64)> = result
        .placements
        .iter()
        .map(|p| (p.leaf_offset(), p.leaf_offset() + p.leaf_span()))
        .collect();
    spans.sort_unstable();
    for window in spans.windows(2) {
        assert!(window[0].1 <= window[1].0, "overlapping spans: {window:?}");
    }
    for p in &result.placements {
        assert_eq!(p.leaf_offset() % p.leaf_span(), 0);
    }
}

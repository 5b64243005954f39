//! End-to-end scenarios spanning placement, the hybrid tree, the
//! data-segment index codec, and the prover/verifier pair, exercised
//! together the way a real caller would use the crate rather than through
//! one module's unit tests in isolation.

use data_segment::{
    aggregate::{
        Aggregate,
        SubPiece,
    },
    node::Node,
};

mod aggregate;
mod codec;
mod placement;
mod verifier;

/// The two-sub-piece, one-mebibyte deal used throughout these scenarios:
/// 524288 padded bytes (16384 nodes) and 262144 padded bytes (8192 nodes).
const ONE_MIB_DEAL: u64 = 1 << 20;

fn one_mib_sub_pieces() -> [SubPiece; 2] {
    [([1u8; 32], 524_288u64), ([2u8; 32], 262_144u64)]
}

fn build_one_mib_aggregate() -> Aggregate {
    Aggregate::new(ONE_MIB_DEAL, &one_mib_sub_pieces()).expect("two sub-pieces fit a 1 MiB deal")
}

fn flip_first_byte(node: &mut Node) {
    node[0] ^= 0xff;
}

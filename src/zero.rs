//! The precomputed table of zero-subtree commitments.
//!
//! `Z[0]` is the all-zero node; `Z[i] = H(Z[i-1], Z[i-1])`. `Z[i]` is the
//! Merkle root of a subtree of depth `i` that has not been populated with
//! any data. The hybrid tree (see [`crate::hybrid`]) relies on this table to
//! avoid ever materializing the (exponentially large) all-zero regions of a
//! sparse deal.
//!
//! The table is the only process-wide global this crate defines (per the
//! this crate's concurrency model — no locks, no shared mutable state); it
//! is computed once behind a
//! [`std::sync::OnceLock`] and shared read-only thereafter.

use std::sync::OnceLock;

use crate::node::{
    combine,
    Node,
    ZERO,
};

/// Number of precomputed levels. `log2Leafs` is bounded to `[0, 60]` (see
/// [`crate::hybrid::HybridTree::new`]), but the table carries a couple of
/// extra levels of headroom beyond that bound.
pub const LEVELS: usize = 64;

static TABLE: OnceLock<[Node; LEVELS]> = OnceLock::new();

/// The precomputed zero-commitment table, `Z[0..64]`.
#[must_use]
pub fn table() -> &'static [Node; LEVELS] {
    TABLE.get_or_init(|| {
        let mut z = [ZERO; LEVELS];
        for i in 1..LEVELS {
            z[i] = combine(&z[i - 1], &z[i - 1]);
        }
        z
    })
}

/// Returns `Z[level]`, the commitment of a fully unpopulated subtree of the
/// given level (leaves are level 0).
///
/// # Panics
/// Panics if `level >= `[`LEVELS`]. Callers within this crate never request
/// a level outside `[0, 60]`; this is a programmer error, not a runtime
/// condition a caller can trigger through public input, so unlike the
/// fallible `for_size` it is not surfaced as a `Result`.
#[must_use]
pub fn for_level(level: u32) -> Node {
    table()[level as usize]
}

/// Returns `Z[ceil(log2(bytes / 32))]`, the zero-commitment for a subtree
/// spanning `bytes` bytes of padded data.
///
/// # Errors
/// Returns [`crate::error::CapacityExceeded::ZeroCommitmentSizeUnsupported`]
/// if the implied level exceeds [`LEVELS`] - 1.
pub fn for_size(bytes: u64) -> Result<Node, crate::error::CapacityExceeded> {
    let nodes = bytes / 32;
    let level = u64::from(nodes.next_power_of_two().trailing_zeros());
    if level as usize >= LEVELS {
        return Err(crate::error::CapacityExceeded::ZeroCommitmentSizeUnsupported {
            bytes,
        });
    }
    Ok(for_level(level as u32))
}

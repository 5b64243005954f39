//! The 32-byte node primitive and its truncated sha256 hash.
//!
//! Every commitment, leaf, and intermediate value in this crate is a `Node`: a
//! 32-byte array whose top two bits are always zero when it was produced by
//! [`hash_leaf`] or [`combine`]. This mirrors the 254-bit field element size
//! used by the proving backend the aggregate is eventually verified against;
//! keeping the truncation in the hash itself (rather than bolting it on at
//! the edges) means every node in a tree, not just the root, is a valid field
//! element.

use sha2::{
    Digest as _,
    Sha256,
};

/// A 32-byte Merkle tree node.
///
/// If produced by [`hash_leaf`] or [`combine`], byte 31 has its top two bits
/// cleared. The all-zero node is reserved to mean "empty subtree" at a given
/// level (see [`crate::zero`]) and is distinguishable from any real hash
/// output with overwhelming probability.
pub type Node = [u8; 32];

/// The all-zero node, used as the base case of the zero-commitment table.
pub const ZERO: Node = [0u8; 32];

/// Clears the top two bits of the last byte of a sha256 digest, truncating
/// it to 254 bits.
#[inline]
fn truncate(mut digest: [u8; 32]) -> Node {
    digest[31] &= 0b0011_1111;
    digest
}

/// Computes `SHA256(bytes)` and truncates the result to 254 bits.
#[must_use]
pub fn truncated_hash(bytes: &[u8]) -> Node {
    truncate(Sha256::digest(bytes).into())
}

/// Calculates `H(left, right) = truncate(SHA256(left || right))`.
///
/// This is the sole combining operation used to build every non-leaf node
/// in every tree in this crate (dense, hybrid, and the precomputed zero
/// table all share it), so that a hybrid tree and a dense tree built over
/// the same leaves always agree on every intermediate node, not just the
/// root.
#[must_use]
pub fn combine(left: &Node, right: &Node) -> Node {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    truncate(hasher.finalize().into())
}

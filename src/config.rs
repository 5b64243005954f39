//! Compile-time tunables.
//!
//! The core has no CLI and no environment variables (it is a pure library);
//! the handful of tunables named below live here as associated
//! constants rather than a configuration struct, since none of them vary at
//! runtime.

/// `log2` of the number of entries grouped into one sparse storage block in
/// [`crate::hybrid::HybridTree`]. 256 entries per block is the chosen
/// default; other power-of-two sizes would change the sparse-linear-index
/// formula but not the tree's externally visible semantics.
pub const SPARSE_BLOCK_LOG2_SIZE: u32 = 8;

/// Number of entries in one sparse storage block: `2^SPARSE_BLOCK_LOG2_SIZE`.
pub const SPARSE_BLOCK_SIZE: usize = 1 << SPARSE_BLOCK_LOG2_SIZE;

/// Maximum number of sibling hashes an inclusion proof may carry, matching
/// the CBOR interoperability cap.
pub const MAX_PATH_LENGTH: usize = 128;

/// Maximum number of [`crate::segment::SegmentDesc`] entries a CBOR-encoded
/// [`crate::segment::IndexData`] may carry.
pub const MAX_INDEX_ENTRIES_CBOR: u64 = 1 << 21;

/// Byte size of one serialized [`crate::segment::SegmentDesc`].
pub const SEGMENT_DESC_SIZE: u64 = 64;

/// Number of nodes (32 bytes each) one serialized [`crate::segment::SegmentDesc`]
/// occupies in a tree: two.
pub const SEGMENT_DESC_NODES: u64 = SEGMENT_DESC_SIZE / 32;

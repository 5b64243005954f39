//! The crate's error taxonomy.
//!
//! Errors are grouped by kind rather than by module
//! (`InvalidArgument`, `CapacityExceeded`, `Corruption`,
//! `OverwriteForbidden`): callers that want to
//! distinguish "you gave me a bad argument" from "the data you handed me was
//! corrupted" can match on the outer kind without needing to know which
//! internal operation raised it. Within the crate, each module tends to only
//! ever construct one or two variants of one kind, but exposing a flat
//! per-kind enum keeps the public surface small and keeps the distinction
//! between e.g. a checksum mismatch and a CID-prefix mismatch visible to
//! callers.

use thiserror::Error;

/// An argument was outside the range the operation accepts.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidArgument {
    #[error("padded piece size must be a power of 2, got {size}")]
    NotAPowerOfTwo { size: u64 },

    #[error("log2Leafs must be in [0, 60], got {log2_leafs}")]
    Log2LeafsOutOfRange { log2_leafs: u32 },

    #[error("level {level} exceeds the tree's maximum level {max_level}")]
    LevelOutOfRange { level: u32, max_level: u32 },

    #[error("index {index} is outside the range [0, {bound}) at level {level}")]
    IndexOutOfRange {
        level: u32,
        index: u64,
        bound: u64,
    },

    #[error("size {size} is not aligned to 128 bytes")]
    SizeNotPaddedAligned { size: u64 },

    #[error("offset {offset} is not aligned to 128 bytes")]
    OffsetNotPaddedAligned { offset: u64 },

    #[error("sub-piece size {size} is not a power-of-two number of 32-byte nodes")]
    SubPieceNotNodeAlignedPowerOfTwo { size: u64 },

    #[error("buffer length {len} is not a multiple of 127")]
    NotAMultipleOf127 { len: usize },

    #[error("a tree must have at least one leaf")]
    EmptyLeaves,
}

/// An operation would have exceeded a hard capacity limit.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CapacityExceeded {
    #[error("sub-deals are too large to fit in a deal of this size")]
    SubDealsTooLarge,

    #[error("{count} index entries exceeds the maximum of {max} for a deal of this size")]
    TooManyIndexEntries { count: usize, max: u64 },

    #[error("zero-commitment size unsupported: {bytes} bytes exceeds the precomputed table")]
    ZeroCommitmentSizeUnsupported { bytes: u64 },

    #[error("multiplication overflowed while computing {context}")]
    Overflow { context: &'static str },
}

/// Data that should have been internally consistent was not.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Corruption {
    #[error("segment descriptor checksum mismatch")]
    ChecksumMismatch,

    #[error("piece commitment CID has an unrecognized prefix")]
    CidPrefixMismatch,

    #[error("serialized index data length {len} is not a multiple of 64 bytes")]
    IndexLengthNotMultipleOf64 { len: usize },

    #[error("serialized input is truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("inclusion proof path diverges from the supplied root")]
    ProofDoesNotMatchRoot,

    #[error("index entry proof position lies outside the reserved index region")]
    IndexEntryOutsideReservedRegion,

    #[error("referenced deal is not active")]
    DealNotActive,
}

/// A write was refused because it would have silently discarded data.
///
/// A public opaque struct wrapping a private reason, rather than a
/// `thiserror` enum: the single condition under which this error occurs
/// (the subtree is already populated) is unlikely to grow new variants, so
/// there is little value in exposing it as a visible enum the way the other
/// kinds are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverwriteForbidden {
    level: u32,
    index: u64,
}

impl OverwriteForbidden {
    pub(crate) fn new(level: u32, index: u64) -> Self {
        Self {
            level,
            index,
        }
    }

    /// The level of the location whose subtree was already populated.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The index of the location whose subtree was already populated.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl std::fmt::Display for OverwriteForbidden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "refusing to overwrite populated subtree at level {}, index {}",
            self.level, self.index
        )
    }
}

impl std::error::Error for OverwriteForbidden {}

/// The top-level error returned by the orchestrator and verifier APIs, which
/// can fail for any of the reasons above.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    #[error(transparent)]
    CapacityExceeded(#[from] CapacityExceeded),
    #[error(transparent)]
    Corruption(#[from] Corruption),
    #[error(transparent)]
    OverwriteForbidden(#[from] OverwriteForbidden),
}

//! The segment descriptor and the binary index built from them.
//!
//! Every sub-piece packed into a deal gets one 64-byte [`SegmentDesc`]
//! recording where it landed and a checksum over that record. The ordered
//! sequence of descriptors is the [`IndexData`]; it is itself placed as a
//! subtree near the tail of the deal (see [`crate::aggregate`]).

use sha2::{
    Digest as _,
    Sha256,
};
use tracing::debug;

use crate::{
    error::{
        Corruption,
        InvalidArgument,
    },
    node::Node,
};

/// Byte size of one serialized [`SegmentDesc`].
pub const SIZE: usize = 64;

fn compute_checksum(comm_ds: &Node, offset: u64, size: u64) -> [u8; 16] {
    let mut hasher = Sha256::new();
    hasher.update(comm_ds);
    hasher.update(offset.to_le_bytes());
    hasher.update(size.to_le_bytes());
    hasher.update([0u8; 16]);
    let digest: [u8; 32] = hasher.finalize().into();
    let mut checksum = [0u8; 16];
    checksum.copy_from_slice(&digest[0..16]);
    // 126-bit retention: clear the top two bits of the last checksum byte,
    // the same truncation [`crate::node::combine`] applies to full nodes.
    checksum[15] &= 0b0011_1111;
    checksum
}

/// A record of one sub-piece's commitment, placement, and size within a
/// deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentDesc {
    comm_ds: Node,
    offset: u64,
    size: u64,
    checksum: [u8; 16],
}

/// Either kind of error [`SegmentDesc::validate`] can return.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Invalid {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    #[error(transparent)]
    Corruption(#[from] Corruption),
}

impl SegmentDesc {
    /// Constructs a descriptor, computing its checksum.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `offset` or `size` is not a multiple
    /// of 128.
    pub fn new(comm_ds: Node, offset: u64, size: u64) -> Result<Self, InvalidArgument> {
        if offset % 128 != 0 {
            return Err(InvalidArgument::OffsetNotPaddedAligned {
                offset,
            });
        }
        if size % 128 != 0 {
            return Err(InvalidArgument::SizeNotPaddedAligned {
                size,
            });
        }
        let checksum = compute_checksum(&comm_ds, offset, size);
        Ok(Self {
            comm_ds,
            offset,
            size,
            checksum,
        })
    }

    /// Constructs a descriptor from already-known-valid fields, e.g. having
    /// been read back from local storage, without recomputing the checksum.
    #[cfg(feature = "unchecked-constructors")]
    #[must_use]
    pub fn new_unchecked(comm_ds: Node, offset: u64, size: u64, checksum: [u8; 16]) -> Self {
        Self {
            comm_ds,
            offset,
            size,
            checksum,
        }
    }

    #[must_use]
    pub fn comm_ds(&self) -> Node {
        self.comm_ds
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn checksum(&self) -> [u8; 16] {
        self.checksum
    }

    /// Checks that `offset`/`size` are 128-byte aligned and that the stored
    /// checksum matches the recomputed one.
    ///
    /// # Errors
    /// Returns [`Invalid::InvalidArgument`] for misalignment or
    /// [`Invalid::Corruption`] for a checksum mismatch.
    pub fn validate(&self) -> Result<(), Invalid> {
        if self.offset % 128 != 0 {
            return Err(InvalidArgument::OffsetNotPaddedAligned {
                offset: self.offset,
            }
            .into());
        }
        if self.size % 128 != 0 {
            return Err(InvalidArgument::SizeNotPaddedAligned {
                size: self.size,
            }
            .into());
        }
        let expected = compute_checksum(&self.comm_ds, self.offset, self.size);
        if expected != self.checksum {
            return Err(Corruption::ChecksumMismatch.into());
        }
        Ok(())
    }

    /// Serializes this descriptor to its 64-byte little-endian layout:
    /// `comm_ds[32] || offset[8] || size[8] || checksum[16]`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIZE] {
        let mut out = [0u8; SIZE];
        out[0..32].copy_from_slice(&self.comm_ds);
        out[32..40].copy_from_slice(&self.offset.to_le_bytes());
        out[40..48].copy_from_slice(&self.size.to_le_bytes());
        out[48..64].copy_from_slice(&self.checksum);
        out
    }

    /// Parses a descriptor from its 64-byte layout without validating
    /// alignment or checksum; use [`SegmentDesc::validate`] afterwards.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; SIZE]) -> Self {
        let comm_ds: Node = bytes[0..32].try_into().unwrap();
        let offset = u64::from_le_bytes(bytes[32..40].try_into().unwrap());
        let size = u64::from_le_bytes(bytes[40..48].try_into().unwrap());
        let mut checksum = [0u8; 16];
        checksum.copy_from_slice(&bytes[48..64]);
        Self {
            comm_ds,
            offset,
            size,
            checksum,
        }
    }
}

/// The ordered sequence of [`SegmentDesc`]s describing every sub-piece in a
/// deal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexData {
    entries: Vec<SegmentDesc>,
}

impl IndexData {
    #[must_use]
    pub fn new(entries: Vec<SegmentDesc>) -> Self {
        Self {
            entries,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[SegmentDesc] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenates every entry's 64-byte serialization, in order.
    #[must_use]
    pub fn marshal_binary(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entries.len() * SIZE);
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_bytes());
        }
        out
    }

    /// Parses a sequence of descriptors from their concatenated
    /// serialization.
    ///
    /// Individual descriptors are not validated here (use
    /// [`IndexData::valid_entries`] for that); only the overall length is
    /// checked.
    ///
    /// # Errors
    /// Returns [`Corruption::IndexLengthNotMultipleOf64`] if
    /// `bytes.len() % 64 != 0`.
    pub fn unmarshal_binary(bytes: &[u8]) -> Result<Self, Corruption> {
        if bytes.len() % SIZE != 0 {
            return Err(Corruption::IndexLengthNotMultipleOf64 {
                len: bytes.len(),
            });
        }
        let entries = bytes
            .chunks_exact(SIZE)
            .map(|chunk| SegmentDesc::from_bytes(chunk.try_into().unwrap()))
            .collect();
        Ok(Self {
            entries,
        })
    }

    /// Returns the subsequence of entries that individually pass
    /// [`SegmentDesc::validate`], logging and dropping the rest.
    ///
    /// An individual descriptor failing validation is filtered silently (at
    /// most logged), not propagated as an error of the whole index.
    #[must_use]
    pub fn valid_entries(&self) -> Vec<&SegmentDesc> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry.validate() {
                Ok(()) => Some(entry),
                Err(err) => {
                    debug!(index = i, %err, "skipping invalid segment descriptor");
                    None
                }
            })
            .collect()
    }
}

/// `max(4, 2^ceil(log2(dealSize / 2048 / 64)))`: the number of index entries
/// reserved for a deal of `deal_size` padded bytes, at least one entry per
/// 2 KiB of deal.
#[must_use]
pub fn max_index_entries_in_deal(deal_size: u64) -> u64 {
    let unit = deal_size / 2048 / 64;
    unit.next_power_of_two().max(4)
}

/// Converts a count of padded bytes to its unpadded equivalent:
/// `padded - padded / 128`, i.e. `padded * 127 / 128` for any `padded` that
/// is a multiple of 128.
#[must_use]
pub fn unpadded_size(padded: u64) -> u64 {
    padded - padded / 128
}

/// The unpadded byte offset at which the data-segment index begins within
/// the deal: the index sits at the very tail.
#[must_use]
pub fn data_segment_index_start_offset(deal_size: u64) -> u64 {
    let index_bytes = max_index_entries_in_deal(deal_size) * SIZE as u64;
    unpadded_size(deal_size) - unpadded_size(index_bytes)
}

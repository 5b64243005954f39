//! The verifier: reconstructs a deal's aggregate commitment and size from a
//! client-supplied `(commitment, size)` and an inclusion proof alone, with
//! no access to the `Aggregate` that produced it.

use crate::{
    error::{
        CapacityExceeded,
        Corruption,
        Error,
        InvalidArgument,
    },
    node::{
        combine,
        Node,
    },
    proof::ProofPath,
    segment::SegmentDesc,
};

/// The deal-level commitment and size a proof claims its sub-piece belongs
/// to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuxData {
    pub comm_pa: Node,
    pub size_pa: u64,
}

/// Reconstructs the deal commitment and size implied by a sub-piece's
/// `(commitment, size)` and its inclusion proof.
///
/// The index-entry proof is validated against the single combine of the
/// descriptor's own two leaf nodes (see [`crate::aggregate::Aggregate::proof_for_index_entry`]),
/// so no data beyond what is passed here is required.
///
/// # Errors
/// Returns [`InvalidArgument::NotAPowerOfTwo`] if `size_pc` is not a power
/// of two, [`CapacityExceeded::Overflow`] if the reconstructed size
/// overflows a `u64`, [`Corruption::ProofDoesNotMatchRoot`] if the two
/// proofs disagree on the deal commitment or size, or
/// [`Corruption::IndexEntryOutsideReservedRegion`] if the index-entry
/// proof's position falls outside the region `deal_size` reserves for the
/// index.
pub fn compute_expected_aux_data(
    comm_pc: Node,
    size_pc: u64,
    proof_subtree: &ProofPath,
    proof_index: &ProofPath,
    deal_size: u64,
    max_index_entries: u64,
) -> Result<AuxData, Error> {
    if !size_pc.is_power_of_two() {
        return Err(InvalidArgument::NotAPowerOfTwo {
            size: size_pc,
        }
        .into());
    }

    let assumed_comm_pa1 = proof_subtree.compute_root(comm_pc);
    let assumed_size_pa1 = size_pc
        .checked_shl(proof_subtree.depth() as u32)
        .ok_or(CapacityExceeded::Overflow {
            context: "assumed_size_pa1",
        })?;

    let offset = proof_subtree
        .index()
        .checked_mul(size_pc)
        .ok_or(CapacityExceeded::Overflow {
            context: "descriptor offset",
        })?;
    let desc = SegmentDesc::new(comm_pc, offset, size_pc)?;
    let bytes = desc.to_bytes();
    let n0: Node = bytes[0..32].try_into().unwrap();
    let n1: Node = bytes[32..64].try_into().unwrap();
    let entry_root = combine(&n0, &n1);

    let assumed_comm_pa2 = proof_index.compute_root(entry_root);
    let assumed_size_pa2 = 64u64
        .checked_shl(proof_index.depth() as u32)
        .ok_or(CapacityExceeded::Overflow {
            context: "assumed_size_pa2",
        })?;

    if assumed_comm_pa1 != assumed_comm_pa2 || assumed_size_pa1 != assumed_size_pa2 {
        return Err(Corruption::ProofDoesNotMatchRoot.into());
    }

    let index_bytes = max_index_entries * 64;
    let index_region_start = deal_size.saturating_sub(index_bytes);
    let entry_byte_offset = proof_index
        .index()
        .checked_mul(64)
        .ok_or(CapacityExceeded::Overflow {
            context: "entry byte offset",
        })?;
    if entry_byte_offset < index_region_start {
        return Err(Corruption::IndexEntryOutsideReservedRegion.into());
    }

    Ok(AuxData {
        comm_pa: assumed_comm_pa1,
        size_pa: assumed_size_pa1,
    })
}

/// Verifies that a sub-piece's proof implies a deal commitment and size
/// matching what `lookup` reports as the active deal's recorded aux data.
///
/// `lookup` is handed the reconstructed deal commitment and returns whether
/// a deal with that commitment is currently active on-chain, together with
/// the aux data the storage-network actor has recorded for it; this crate
/// has no actor-lookup of its own, so the caller supplies one.
///
/// # Errors
/// Propagates any error from [`compute_expected_aux_data`], or returns
/// [`Corruption::DealNotActive`] if `lookup` reports the deal inactive, or
/// [`Corruption::ProofDoesNotMatchRoot`] if the recorded aux data disagrees
/// with the value reconstructed from the proof.
pub fn verify_active<F>(
    comm_pc: Node,
    size_pc: u64,
    proof_subtree: &ProofPath,
    proof_index: &ProofPath,
    deal_size: u64,
    max_index_entries: u64,
    lookup: F,
) -> Result<AuxData, Error>
where
    F: FnOnce(Node) -> (bool, AuxData),
{
    let computed = compute_expected_aux_data(
        comm_pc,
        size_pc,
        proof_subtree,
        proof_index,
        deal_size,
        max_index_entries,
    )?;
    let (deal_active, recorded) = lookup(computed.comm_pa);
    if !deal_active {
        return Err(Corruption::DealNotActive.into());
    }
    if recorded != computed {
        return Err(Corruption::ProofDoesNotMatchRoot.into());
    }
    Ok(computed)
}

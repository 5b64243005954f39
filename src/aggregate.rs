//! The `Aggregate` orchestrator: binds the placement algorithm, the hybrid
//! tree, and the data-segment index into the single object that represents
//! one deal.

use tracing::debug;

use crate::{
    error::{
        CapacityExceeded,
        Error,
        InvalidArgument,
    },
    hybrid::HybridTree,
    location::{
        CommAndLoc,
        Location,
    },
    node::Node,
    placement::{
        self,
        Placement,
    },
    proof::ProofPath,
    segment::{
        self,
        IndexData,
        SegmentDesc,
    },
};

/// One sub-piece to be packed into a deal: its commitment and its padded
/// size in bytes.
pub type SubPiece = (Node, u64);

/// A constructed deal: the hybrid tree over every sub-piece's placement plus
/// the data-segment index describing those placements, appended near the
/// tail.
pub struct Aggregate {
    deal_size: u64,
    max_index_entries: u64,
    index_start_nodes: u64,
    tree: HybridTree,
    index: IndexData,
    placements: Vec<Placement>,
}

impl Aggregate {
    /// Packs `sub_pieces`, in order, into a deal of `deal_size` padded
    /// bytes.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::NotAPowerOfTwo`] if `deal_size` is not a
    /// power of two (or is smaller than one node), any placement error from
    /// [`placement::place`], [`CapacityExceeded::TooManyIndexEntries`] if
    /// `sub_pieces` has more entries than [`segment::max_index_entries_in_deal`]
    /// allows, or [`CapacityExceeded::SubDealsTooLarge`] if the placed
    /// payload together with the reserved index region does not fit in
    /// `deal_size`.
    pub fn new(deal_size: u64, sub_pieces: &[SubPiece]) -> Result<Self, Error> {
        if !deal_size.is_power_of_two() || deal_size < 32 {
            return Err(InvalidArgument::NotAPowerOfTwo {
                size: deal_size,
            }
            .into());
        }

        let max_index_entries = segment::max_index_entries_in_deal(deal_size);
        if sub_pieces.len() as u64 > max_index_entries {
            return Err(CapacityExceeded::TooManyIndexEntries {
                count: sub_pieces.len(),
                max: max_index_entries,
            }
            .into());
        }

        let placed = placement::place(sub_pieces)?;
        let index_bytes = max_index_entries * segment::SIZE as u64;
        let payload_bytes = placed.leaves_used * 32;
        if payload_bytes + index_bytes > deal_size {
            return Err(CapacityExceeded::SubDealsTooLarge.into());
        }

        let log2_leafs = (deal_size / 32).trailing_zeros();
        let mut tree = HybridTree::new(log2_leafs)?;

        let comm_and_locs: Vec<CommAndLoc> = placed
            .placements
            .iter()
            .map(|p| {
                Location::new(p.level, p.index, log2_leafs)
                    .map(|location| CommAndLoc::new(p.comm_ds, location))
            })
            .collect::<Result<_, _>>()?;
        tree.batch_set(&comm_and_locs)?;

        let entries: Vec<SegmentDesc> = placed
            .placements
            .iter()
            .map(|p| SegmentDesc::new(p.comm_ds, p.leaf_offset() * 32, p.leaf_span() * 32))
            .collect::<Result<_, _>>()?;

        let index_start_nodes = (deal_size - index_bytes) / 32;
        for (i, desc) in entries.iter().enumerate() {
            let bytes = desc.to_bytes();
            let n0: Node = bytes[0..32].try_into().unwrap();
            let n1: Node = bytes[32..64].try_into().unwrap();
            let p = index_start_nodes + 2 * i as u64;
            tree.set_node(0, p, n0)?;
            tree.set_node(0, p + 1, n1)?;
        }

        debug!(
            deal_size,
            sub_pieces = sub_pieces.len(),
            index_entries = entries.len(),
            "constructed aggregate"
        );

        Ok(Self {
            deal_size,
            max_index_entries,
            index_start_nodes,
            tree,
            index: IndexData::new(entries),
            placements: placed.placements,
        })
    }

    /// The deal's total padded size in bytes.
    #[must_use]
    pub fn deal_size(&self) -> u64 {
        self.deal_size
    }

    #[must_use]
    pub fn max_index_entries(&self) -> u64 {
        self.max_index_entries
    }

    #[must_use]
    pub fn index(&self) -> &IndexData {
        &self.index
    }

    /// The deal's commitment: the hybrid tree's root.
    #[must_use]
    pub fn piece_cid(&self) -> Node {
        self.tree.root()
    }

    /// The unpadded byte offset at which the data-segment index begins.
    #[must_use]
    pub fn index_start_position(&self) -> u64 {
        segment::data_segment_index_start_offset(self.deal_size)
    }

    /// The nominal (unpadded, tightly packed) byte size of the data-segment
    /// index: `max_index_entries * 64`.
    #[must_use]
    pub fn index_size(&self) -> u64 {
        self.max_index_entries * segment::SIZE as u64
    }

    /// Builds an inclusion proof for the sub-piece placed at entry `i`:
    /// a subtree proof over the sub-piece's own placement, and an
    /// index-entry proof over the descriptor describing that placement.
    ///
    /// The index-entry proof is rooted one level above the descriptor's own
    /// two leaf nodes (combining them once to get the node the proof
    /// proves); the verifier recomputes that same combine from the
    /// descriptor fields alone, so no data beyond `(commPc, sizePc)` and the
    /// proof itself is required to check it.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::IndexOutOfRange`] if `i` is outside the
    /// index.
    pub fn proof_for_index_entry(&self, i: usize) -> Result<(ProofPath, ProofPath), Error> {
        let placement = self.placements.get(i).ok_or(InvalidArgument::IndexOutOfRange {
            level: 0,
            index: i as u64,
            bound: self.placements.len() as u64,
        })?;
        let proof_subtree = self.tree.collect_proof(placement.level, placement.index)?;
        let level1_index = self.index_start_nodes / 2 + i as u64;
        let proof_index = self.tree.collect_proof(1, level1_index)?;
        Ok((proof_subtree, proof_index))
    }

    /// Looks up the entry matching `(commitment, size)` and delegates to
    /// [`Aggregate::proof_for_index_entry`].
    ///
    /// # Errors
    /// Returns [`InvalidArgument::IndexOutOfRange`] if no entry matches.
    pub fn proof_for_piece_info(
        &self,
        commitment: Node,
        size: u64,
    ) -> Result<(ProofPath, ProofPath), Error> {
        let i = self
            .index
            .entries()
            .iter()
            .position(|e| e.comm_ds() == commitment && e.size() == size)
            .ok_or(InvalidArgument::IndexOutOfRange {
                level: 0,
                index: 0,
                bound: self.index.len() as u64,
            })?;
        self.proof_for_index_entry(i)
    }
}

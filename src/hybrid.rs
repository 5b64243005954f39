//! The sparse hybrid tree: a perfect binary tree of up to `2^60` leaves,
//! backed by storage proportional only to the populated regions.
//!
//! A deal can be enormous (up to `2^60` 32-byte leaves), but any one deal is
//! typically only sparsely populated: a handful of sub-piece subtrees and
//! the data-segment index near the tail. [`HybridTree`] never materializes
//! the unpopulated regions; reads of an absent position fall through to the
//! precomputed [`crate::zero`] table, following the same "default leaf"
//! trick used by sparse Merkle trees throughout this corpus (e.g.
//! `matter-labs-zksync`'s `parallel_smt`, which calls this value the
//! "default leaf" rather than a zero-commitment table, but relies on the
//! identical idea of caching prehashed values for the unpopulated regions).
//!
//! Populated storage is grouped into fixed-size blocks (see
//! [`crate::config::SPARSE_BLOCK_SIZE`]) keyed by a block index derived from
//! a linearization of `(level, index)` that packs a perfect binary tree's
//! nodes into increasingly larger power-of-two-sized layers of subtrees.

use std::collections::HashMap;

use tracing::warn;

use crate::{
    config,
    error::{
        Error,
        InvalidArgument,
        OverwriteForbidden,
    },
    location::{
        CommAndLoc,
        Location,
    },
    node::{
        combine,
        Node,
        ZERO,
    },
    proof::ProofPath,
    zero,
};

type Block = Box<[Node; config::SPARSE_BLOCK_SIZE]>;

/// A sparse, perfect binary tree over 32-byte nodes.
///
/// `log2_leafs` fixes the tree's shape: it has `2^log2_leafs` leaves and
/// `log2_leafs + 1` levels, `0` (leaves) through `log2_leafs` (the root).
pub struct HybridTree {
    log2_leafs: u32,
    blocks: HashMap<u64, Block>,
}

/// Upper bound on `log2_leafs`: a deal of `2^60` leaves is `2^65` bytes,
/// already far beyond any deal size a storage network actually accepts.
pub const MAX_LOG2_LEAFS: u32 = 60;

impl HybridTree {
    /// Constructs an empty hybrid tree with `2^log2_leafs` leaves.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::Log2LeafsOutOfRange`] if `log2_leafs` is
    /// not in `[0, 60]`.
    pub fn new(log2_leafs: u32) -> Result<Self, InvalidArgument> {
        if log2_leafs > MAX_LOG2_LEAFS {
            return Err(InvalidArgument::Log2LeafsOutOfRange {
                log2_leafs,
            });
        }
        Ok(Self {
            log2_leafs,
            blocks: HashMap::new(),
        })
    }

    /// The tree's maximum level, i.e. the level of the root.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.log2_leafs
    }

    /// `log2` of the number of leaves in this tree.
    #[must_use]
    pub fn log2_leafs(&self) -> u32 {
        self.log2_leafs
    }

    /// Computes the sparse linear index for `(level, index)` in a tree with
    /// `log2_leafs` leaves.
    ///
    /// See the module documentation for the intuition; the exact recurrence
    /// partitions the tree into layers of `2^SPARSE_BLOCK_LOG2_SIZE`-sized
    /// subtrees and lays consecutive subtrees of the same depth-from-root
    /// out contiguously, so that any 256 nodes that are "close" in the tree
    /// land in the same or adjacent storage blocks.
    fn sparse_linear_index(log2_leafs: u32, level: u32, index: u64) -> u64 {
        let depth = u64::from(log2_leafs - level);
        let subtree_depth = u64::from(config::SPARSE_BLOCK_LOG2_SIZE);
        let depth_of_subtree = depth / subtree_depth;
        let depth_in_subtree = depth % subtree_depth;
        let width = 1u64 << depth_in_subtree;
        let subtree_index = index / width;
        let in_sub = width + index % width;
        let exponent = subtree_depth * (depth_of_subtree + 1);
        let layer_offset = (((1u128 << exponent) - 1) / 255 - 1) as u64;
        layer_offset + config::SPARSE_BLOCK_SIZE as u64 * subtree_index + in_sub
    }

    fn block_and_slot(&self, level: u32, index: u64) -> (u64, usize) {
        let linear = Self::sparse_linear_index(self.log2_leafs, level, index);
        let block_size = config::SPARSE_BLOCK_SIZE as u64;
        (linear / block_size, (linear % block_size) as usize)
    }

    /// Reads `(level, index)` without bounds validation, falling through to
    /// the zero-commitment table for absent positions.
    fn node_at(&self, level: u32, index: u64) -> Node {
        let (block_key, slot) = self.block_and_slot(level, index);
        match self.blocks.get(&block_key) {
            Some(block) if block[slot] != ZERO => block[slot],
            _ => zero::for_level(level),
        }
    }

    fn store_raw(&mut self, level: u32, index: u64, value: Node) {
        if value == zero::for_level(level) {
            self.clear_raw(level, index);
            return;
        }
        let (block_key, slot) = self.block_and_slot(level, index);
        let block = self
            .blocks
            .entry(block_key)
            .or_insert_with(|| Box::new([ZERO; config::SPARSE_BLOCK_SIZE]));
        block[slot] = value;
    }

    fn clear_raw(&mut self, level: u32, index: u64) {
        let (block_key, slot) = self.block_and_slot(level, index);
        if let Some(block) = self.blocks.get_mut(&block_key) {
            block[slot] = ZERO;
            if block.iter().all(|n| *n == ZERO) {
                self.blocks.remove(&block_key);
            }
        }
    }

    /// Returns the node at `(level, index)`, or the zero-commitment for that
    /// level if the position has not been populated.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `(level, index)` is outside the tree.
    pub fn get_node(&self, level: u32, index: u64) -> Result<Node, InvalidArgument> {
        Location::new(level, index, self.log2_leafs)?;
        Ok(self.node_at(level, index))
    }

    /// Writes `value` to `(level, index)` and recomputes every ancestor up
    /// to the root.
    ///
    /// Refuses to overwrite a location whose subtree is already populated:
    /// for `level > 0` this means both children of `(level, index)` must
    /// currently read as the zero-commitment for `level - 1`. Leaves
    /// (`level == 0`) have no children to check and may always be written,
    /// including back to the zero node — this is what lets
    /// `set_node(l, i, n)` followed by `set_node(l, i, 0)` restore the tree
    /// to its prior state for every level, not just internal ones.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `(level, index)` is outside the tree,
    /// or [`OverwriteForbidden`] if the subtree at `(level, index)` is
    /// already populated.
    pub fn set_node(&mut self, level: u32, index: u64, value: Node) -> Result<(), Error> {
        Location::new(level, index, self.log2_leafs)?;
        if level > 0 {
            let child_level = level - 1;
            let left = self.node_at(child_level, index * 2);
            let right = self.node_at(child_level, index * 2 + 1);
            let empty = zero::for_level(child_level);
            if left != empty || right != empty {
                warn!(level, index, "refusing to overwrite populated subtree");
                return Err(OverwriteForbidden::new(level, index).into());
            }
        }
        self.store_raw(level, index, value);

        let mut cur_level = level;
        let mut cur_index = index;
        while cur_level < self.log2_leafs {
            let parent_level = cur_level + 1;
            let parent_index = cur_index / 2;
            let left = self.node_at(cur_level, parent_index * 2);
            let right = self.node_at(cur_level, parent_index * 2 + 1);
            self.store_raw(parent_level, parent_index, combine(&left, &right));
            cur_level = parent_level;
            cur_index = parent_index;
        }
        Ok(())
    }

    /// Applies [`HybridTree::set_node`] for each item in `placements`, in
    /// order.
    ///
    /// Callers must supply non-overlapping placements (see
    /// [`crate::placement`]); the result does not depend on their order
    /// because disjoint placements commute.
    ///
    /// # Errors
    /// Returns the first error encountered, per [`HybridTree::set_node`].
    pub fn batch_set(&mut self, placements: &[CommAndLoc]) -> Result<(), Error> {
        for item in placements {
            self.set_node(item.location.level(), item.location.index(), item.commitment)?;
        }
        Ok(())
    }

    /// The root commitment of the tree: `Z[log2_leafs]` if the tree is
    /// empty.
    #[must_use]
    pub fn root(&self) -> Node {
        self.node_at(self.log2_leafs, 0)
    }

    /// Collects the inclusion proof for `(level, index)`: the sibling at
    /// each step from `(level, index)` up to the root.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `(level, index)` is outside the tree.
    pub fn collect_proof(&self, level: u32, index: u64) -> Result<ProofPath, InvalidArgument> {
        Location::new(level, index, self.log2_leafs)?;
        let mut path = Vec::with_capacity((self.log2_leafs - level) as usize);
        let mut cur_level = level;
        let mut cur_index = index;
        while cur_level < self.log2_leafs {
            path.push(self.node_at(cur_level, cur_index ^ 1));
            cur_index /= 2;
            cur_level += 1;
        }
        ProofPath::new(index, path)
    }
}

//! The dense (fully materialized) tree: a reference oracle for small trees
//! and for testing the sparse [`crate::hybrid::HybridTree`] against a
//! straightforward, allocate-everything implementation.

use crate::{
    error::{
        Corruption,
        InvalidArgument,
    },
    location::Location,
    node::{
        combine,
        truncated_hash,
        Node,
        ZERO,
    },
    proof::{
        BatchedProofPath,
        ProofPath,
    },
};

/// A fully materialized perfect binary tree.
///
/// Every level is stored explicitly as a `Vec<Node>`, `layers[0]` the
/// leaves and `layers[last()]` the single-element root layer. The leaf
/// count is padded up to the next power of two with the all-zero node,
/// matching [`crate::hybrid::HybridTree`]'s zero-commitment convention so
/// that the two trees agree on every ancestor, not just leaves that were
/// actually provided.
pub struct DenseTree {
    layers: Vec<Vec<Node>>,
    original_leaf_count: usize,
}

impl DenseTree {
    fn from_layers(layers: Vec<Vec<Node>>, original_leaf_count: usize) -> Self {
        Self {
            layers,
            original_leaf_count,
        }
    }

    fn build(mut leaves: Vec<Node>, original_leaf_count: usize) -> Result<Self, InvalidArgument> {
        if leaves.is_empty() {
            return Err(InvalidArgument::EmptyLeaves);
        }
        let padded_len = leaves.len().next_power_of_two();
        leaves.resize(padded_len, ZERO);

        let mut layers = vec![leaves];
        while layers.last().unwrap().len() > 1 {
            let prev = layers.last().unwrap();
            let next = prev
                .chunks_exact(2)
                .map(|pair| combine(&pair[0], &pair[1]))
                .collect();
            layers.push(next);
        }
        Ok(Self::from_layers(layers, original_leaf_count))
    }

    /// Hashes each of `leaf_data` with [`truncated_hash`] and builds the
    /// tree over the resulting nodes, padding up to the next power of two
    /// with the all-zero node.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::EmptyLeaves`] if `leaf_data` is empty.
    pub fn grow<I, B>(leaf_data: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let hashed: Vec<Node> = leaf_data
            .into_iter()
            .map(|leaf| truncated_hash(leaf.as_ref()))
            .collect();
        let original_leaf_count = hashed.len();
        Self::build(hashed, original_leaf_count)
    }

    /// Builds the tree directly over already-hashed leaves, skipping the
    /// leaf hash.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::EmptyLeaves`] if `leaves` is empty.
    pub fn from_hashed_leaves(leaves: &[Node]) -> Result<Self, InvalidArgument> {
        let original_leaf_count = leaves.len();
        Self::build(leaves.to_vec(), original_leaf_count)
    }

    /// The tree's depth: the number of combining steps from a leaf to the
    /// root.
    #[must_use]
    pub fn depth(&self) -> u32 {
        (self.layers.len() - 1) as u32
    }

    /// The number of leaves actually provided to [`DenseTree::grow`] or
    /// [`DenseTree::from_hashed_leaves`], before power-of-two padding.
    #[must_use]
    pub fn original_leaf_count(&self) -> usize {
        self.original_leaf_count
    }

    /// The number of leaves after power-of-two padding: `2^depth()`.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// The root commitment.
    #[must_use]
    pub fn root(&self) -> Node {
        self.layers.last().unwrap()[0]
    }

    /// The (padded) leaf layer.
    #[must_use]
    pub fn leafs(&self) -> &[Node] {
        &self.layers[0]
    }

    /// Returns the node at `(level, index)`.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `(level, index)` is outside the tree.
    pub fn node(&self, level: u32, index: u64) -> Result<Node, InvalidArgument> {
        Location::new(level, index, self.depth())?;
        Ok(self.layers[level as usize][index as usize])
    }

    /// Constructs the inclusion proof for `(level, index)`.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `(level, index)` is outside the tree.
    pub fn construct_proof(&self, level: u32, index: u64) -> Result<ProofPath, InvalidArgument> {
        Location::new(level, index, self.depth())?;
        let mut path = Vec::with_capacity(self.layers.len() - 1 - level as usize);
        let mut cur_index = index as usize;
        for layer in &self.layers[level as usize..self.layers.len() - 1] {
            path.push(layer[cur_index ^ 1]);
            cur_index /= 2;
        }
        ProofPath::new(index, path)
    }

    /// Constructs a batched proof over the two locations `left` and
    /// `right`, factoring out their common root-side suffix.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if either location is outside the tree.
    pub fn construct_batched_proof(
        &self,
        left: (u32, u64),
        right: (u32, u64),
    ) -> Result<BatchedProofPath, InvalidArgument> {
        let left_proof = self.construct_proof(left.0, left.1)?;
        let right_proof = self.construct_proof(right.0, right.1)?;
        Ok(BatchedProofPath::from_individual(&left_proof, &right_proof))
    }

    /// Serializes the tree as `original_leaf_count (u64 LE) || leafs()`.
    ///
    /// The tree can be rebuilt from this without recomputing internal
    /// layers being necessary on the wire, since [`DenseTree::from_hashed_leaves`]
    /// rebuilds them from the leaf layer alone.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.layers[0].len() * 32);
        out.extend_from_slice(&(self.original_leaf_count as u64).to_le_bytes());
        for leaf in &self.layers[0] {
            out.extend_from_slice(leaf);
        }
        out
    }

    /// Deserializes a tree previously produced by [`DenseTree::serialize`].
    ///
    /// # Errors
    /// Returns [`Corruption::Truncated`] if `bytes` is shorter than its
    /// header claims, or [`InvalidArgument::EmptyLeaves`] if it encodes zero
    /// leaves.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DeserializeError> {
        if bytes.len() < 8 {
            return Err(Corruption::Truncated {
                expected: 8,
                actual: bytes.len(),
            }
            .into());
        }
        let original_leaf_count = u64::from_le_bytes(bytes[0..8].try_into().unwrap()) as usize;
        let rest = &bytes[8..];
        if rest.len() % 32 != 0 {
            return Err(Corruption::Truncated {
                expected: rest.len() + (32 - rest.len() % 32),
                actual: rest.len(),
            }
            .into());
        }
        let leaves: Vec<Node> = rest
            .chunks_exact(32)
            .map(|chunk| chunk.try_into().unwrap())
            .collect();
        if leaves.is_empty() {
            return Err(InvalidArgument::EmptyLeaves.into());
        }
        Ok(Self::build(leaves, original_leaf_count)?)
    }
}

/// Error surfaced by [`DenseTree::deserialize`].
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeserializeError {
    #[error(transparent)]
    Corruption(#[from] Corruption),
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}

//! Inclusion proofs: a path of sibling nodes plus the index of the proven
//! node, and the batched variant over two endpoints sharing a common prefix.

use crate::{
    config,
    error::{
        Corruption,
        InvalidArgument,
    },
    node::{
        combine,
        Node,
    },
};

/// A proof that a node at some `(level, index)` location is included under
/// a tree's root.
///
/// `path` holds the sibling at each step from the proven node up to (but
/// excluding) the root, in leaf-to-root order. `index` is the index of the
/// proven node *at its own level* — not a leaf index — since that is all
/// [`ProofPath::compute_root`] needs to decide, at each step, whether the
/// accumulator is the left or right argument to [`combine`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofPath {
    index: u64,
    path: Vec<Node>,
}

impl ProofPath {
    /// Constructs a `ProofPath` from its raw parts.
    ///
    /// # Errors
    /// Returns [`InvalidArgument`] if `path` is longer than
    /// [`config::MAX_PATH_LENGTH`], the CBOR-interop cap.
    pub fn new(index: u64, path: Vec<Node>) -> Result<Self, InvalidArgument> {
        if path.len() > config::MAX_PATH_LENGTH {
            return Err(InvalidArgument::IndexOutOfRange {
                level: 0,
                index: path.len() as u64,
                bound: config::MAX_PATH_LENGTH as u64,
            });
        }
        Ok(Self {
            index,
            path,
        })
    }

    /// Constructs a `ProofPath` without validating the path length.
    #[cfg(feature = "unchecked-constructors")]
    #[must_use]
    pub fn new_unchecked(index: u64, path: Vec<Node>) -> Self {
        Self {
            index,
            path,
        }
    }

    /// The index of the proven node at its own level.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The sibling path, in leaf-to-root order.
    #[must_use]
    pub fn path(&self) -> &[Node] {
        &self.path
    }

    /// The number of steps in the path, i.e. `max_level - proven_level`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Folds the path to reconstruct the root commitment, starting from
    /// `subtree`, the commitment of the proven node.
    ///
    /// At step `i`, if bit `i` of `index` is `0` the accumulator is the left
    /// argument to [`combine`]; otherwise it is the right argument.
    #[must_use]
    pub fn compute_root(&self, subtree: Node) -> Node {
        let mut cur = subtree;
        for (i, sibling) in self.path.iter().enumerate() {
            cur = if (self.index >> i) & 1 == 0 {
                combine(&cur, sibling)
            } else {
                combine(sibling, &cur)
            };
        }
        cur
    }

    /// Returns whether folding this path starting from `subtree` reproduces
    /// `root`.
    ///
    /// # Errors
    /// Returns [`Corruption::ProofDoesNotMatchRoot`] if it does not.
    pub fn validate_subtree(&self, subtree: Node, root: Node) -> Result<(), Corruption> {
        if self.compute_root(subtree) == root {
            Ok(())
        } else {
            Err(Corruption::ProofDoesNotMatchRoot)
        }
    }
}

/// A proof over two endpoints that share a common suffix of their
/// individual paths (counted from the root side).
///
/// Splitting out the shared suffix once, rather than repeating it in both
/// proofs, is the entire point of batching: it is the same optimization
/// RFC 6962-style consistency proofs make for a contiguous leaf range.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchedProofPath {
    left_index: u64,
    right_index: u64,
    left_path: Vec<Node>,
    right_path: Vec<Node>,
    common_path: Vec<Node>,
}

impl BatchedProofPath {
    /// Constructs a batched proof from two individually-collected proofs
    /// over the same tree, factoring out their common root-side suffix.
    #[must_use]
    pub fn from_individual(left: &ProofPath, right: &ProofPath) -> Self {
        let common_len = left
            .path
            .iter()
            .rev()
            .zip(right.path.iter().rev())
            .take_while(|(l, r)| l == r)
            .count();
        let left_split = left.path.len() - common_len;
        let right_split = right.path.len() - common_len;
        Self {
            left_index: left.index,
            right_index: right.index,
            left_path: left.path[..left_split].to_vec(),
            right_path: right.path[..right_split].to_vec(),
            common_path: left.path[left_split..].to_vec(),
        }
    }

    /// Reconstructs the two endpoint `ProofPath`s that make up this batch.
    #[must_use]
    pub fn split(&self) -> (ProofPath, ProofPath) {
        let mut left_path = self.left_path.clone();
        left_path.extend_from_slice(&self.common_path);
        let mut right_path = self.right_path.clone();
        right_path.extend_from_slice(&self.common_path);
        (
            ProofPath {
                index: self.left_index,
                path: left_path,
            },
            ProofPath {
                index: self.right_index,
                path: right_path,
            },
        )
    }

    /// Validates both endpoints against a common `root`, given their
    /// respective subtree commitments.
    ///
    /// # Errors
    /// Returns [`Corruption::ProofDoesNotMatchRoot`] if either endpoint fails
    /// to reconstruct `root`.
    pub fn validate_subtrees(
        &self,
        left_subtree: Node,
        right_subtree: Node,
        root: Node,
    ) -> Result<(), Corruption> {
        let (left, right) = self.split();
        left.validate_subtree(left_subtree, root)?;
        right.validate_subtree(right_subtree, root)
    }

    /// Validates both endpoints given their raw leaves rather than
    /// pre-hashed subtree commitments, hashing each with [`crate::node::truncated_hash`]
    /// before folding.
    ///
    /// # Errors
    /// Returns [`Corruption::ProofDoesNotMatchRoot`] if either endpoint fails
    /// to reconstruct `root`.
    pub fn validate_leaves(
        &self,
        left_leaf: &[u8],
        right_leaf: &[u8],
        root: Node,
    ) -> Result<(), Corruption> {
        self.validate_subtrees(
            crate::node::truncated_hash(left_leaf),
            crate::node::truncated_hash(right_leaf),
            root,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<Node> {
        (0..n)
            .map(|i| crate::node::truncated_hash(&[i as u8]))
            .collect()
    }

    fn build_perfect(leaves: &[Node]) -> Vec<Vec<Node>> {
        // layers[0] = leaves, layers[last] = [root]
        let mut layers = vec![leaves.to_vec()];
        while layers.last().unwrap().len() > 1 {
            let prev = layers.last().unwrap();
            let next = prev
                .chunks(2)
                .map(|pair| combine(&pair[0], &pair[1]))
                .collect();
            layers.push(next);
        }
        layers
    }

    fn collect_proof(layers: &[Vec<Node>], mut index: u64) -> ProofPath {
        let start_index = index;
        let mut path = Vec::new();
        for layer in layers.iter().take(layers.len() - 1) {
            let sibling = (index ^ 1) as usize;
            path.push(layer[sibling]);
            index >>= 1;
        }
        ProofPath::new(start_index, path).unwrap()
    }

    #[test]
    fn round_trips_for_every_leaf_of_a_perfect_tree() {
        let leaves = leaves(8);
        let layers = build_perfect(&leaves);
        let root = layers.last().unwrap()[0];
        for i in 0..8u64 {
            let proof = collect_proof(&layers, i);
            assert_eq!(proof.compute_root(leaves[i as usize]), root);
        }
    }

    #[test]
    fn validate_subtree_rejects_tampered_path() {
        let leaves = leaves(4);
        let layers = build_perfect(&leaves);
        let root = layers.last().unwrap()[0];
        let mut proof = collect_proof(&layers, 2);
        proof.path[0][0] ^= 0xff;
        assert!(proof.validate_subtree(leaves[2], root).is_err());
    }

    #[test]
    fn batched_proof_extracts_common_suffix() {
        let leaves = leaves(8);
        let layers = build_perfect(&leaves);
        let root = layers.last().unwrap()[0];
        let left = collect_proof(&layers, 0);
        let right = collect_proof(&layers, 1);
        let batched = BatchedProofPath::from_individual(&left, &right);
        // Leaves 0 and 1 share every ancestor above their immediate parent.
        assert_eq!(batched.common_path.len(), 2);
        assert!(
            batched
                .validate_subtrees(leaves[0], leaves[1], root)
                .is_ok()
        );
    }
}

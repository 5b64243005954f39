//! `Location`: a `(level, index)` address into a perfect binary tree, and
//! `CommAndLoc`, the pair of a commitment and the location it was placed at.

use crate::{
    error::InvalidArgument,
    node::Node,
};

/// A `(level, index)` address into a perfect binary tree of some fixed
/// `max_level`.
///
/// `level` counts up from the leaves (`level == 0`) to the root
/// (`level == max_level`). `index` is the position of the node among its
/// peers at that level, so `index < 2^(max_level - level)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    level: u32,
    index: u64,
}

impl Location {
    /// Constructs a `Location`, validating it against `max_level`.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::LevelOutOfRange`] if `level > max_level`, or
    /// [`InvalidArgument::IndexOutOfRange`] if `index` is not in
    /// `[0, 2^(max_level - level))`.
    pub fn new(level: u32, index: u64, max_level: u32) -> Result<Self, InvalidArgument> {
        if level > max_level {
            return Err(InvalidArgument::LevelOutOfRange {
                level,
                max_level,
            });
        }
        let bound = 1u64 << (max_level - level);
        if index >= bound {
            return Err(InvalidArgument::IndexOutOfRange {
                level,
                index,
                bound,
            });
        }
        Ok(Self {
            level,
            index,
        })
    }

    /// Constructs a `Location` without validating it against a `max_level`.
    ///
    /// Intended for the case where `(level, index)` is already known-valid,
    /// e.g. having been read back from a serialized [`crate::hybrid::HybridTree`].
    #[cfg(feature = "unchecked-constructors")]
    #[must_use]
    pub fn new_unchecked(level: u32, index: u64) -> Self {
        Self {
            level,
            index,
        }
    }

    /// The level of this location, counting up from the leaves.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The index of this location among its peers at [`Location::level`].
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The index of the leftmost leaf covered by the subtree rooted at this
    /// location: `index << level`.
    #[must_use]
    pub fn leaf_index(&self) -> u64 {
        self.index << self.level
    }
}

/// A commitment paired with the location it was (or will be) placed at.
///
/// Used as the unit of work for [`crate::hybrid::HybridTree::batch_set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommAndLoc {
    pub commitment: Node,
    pub location: Location,
}

impl CommAndLoc {
    #[must_use]
    pub fn new(commitment: Node, location: Location) -> Self {
        Self {
            commitment,
            location,
        }
    }
}

//! Verifiable data aggregation for a content-addressed storage network.
//!
//! Multiple independent client sub-pieces are packed into one larger deal
//! piece. Each sub-piece can later be proved to be included in that deal,
//! bit-for-bit, without access to any of the other sub-pieces. The deal's
//! identity is the root of a binary Merkle tree whose leaves are 32-byte
//! nodes; a deterministic data-segment index recording `(commitment,
//! offset, size, checksum)` per sub-piece is itself packed as a subtree
//! near the tail of the same deal.
//!
//! # Module map
//!
//! - [`node`]: the 32-byte node primitive and its domain-truncated sha256 hash.
//! - [`zero`]: the precomputed table of zero-subtree commitments.
//! - [`location`]: `(level, index)` addressing into a perfect binary tree.
//! - [`dense`]: a fully materialized tree, used for small trees and as a
//!   reference oracle.
//! - [`hybrid`]: the sparse tree backing real (up to `2^60`-leaf) deals.
//! - [`proof`]: inclusion proofs and their verifier, plus the batched variant.
//! - [`placement`]: assigns sub-pieces to aligned subtree slots.
//! - [`segment`]: the 64-byte segment descriptor and the binary index codec.
//! - [`pad`]: the 127-byte/128-byte codec used to write the index to the deal.
//! - [`aggregate`]: binds the above into one constructed deal.
//! - [`verifier`]: reconstructs a deal's commitment and size from a client's
//!   data and an inclusion proof alone.
//! - [`cid`]: the piece-commitment CID prefix used at the storage-network
//!   boundary.
//!
//! # Usage
//! ```
//! use data_segment::aggregate::Aggregate;
//!
//! let sub_pieces = [([1u8; 32], 524_288u64), ([2u8; 32], 262_144u64)];
//! let aggregate = Aggregate::new(1 << 20, &sub_pieces).expect("valid deal");
//!
//! let (proof_subtree, proof_index) = aggregate
//!     .proof_for_piece_info(sub_pieces[0].0, sub_pieces[0].1)
//!     .expect("sub-piece is in the deal");
//!
//! let aux = data_segment::verifier::compute_expected_aux_data(
//!     sub_pieces[0].0,
//!     sub_pieces[0].1,
//!     &proof_subtree,
//!     &proof_index,
//!     aggregate.deal_size(),
//!     aggregate.max_index_entries(),
//! )
//! .expect("proof verifies");
//! assert_eq!(aux.comm_pa, aggregate.piece_cid());
//! ```
//!
//! # Scope
//! This crate is pure functions and in-memory data structures over raw
//! 32-byte nodes. CID tagging bytes beyond the prefix check, storage-network
//! actor lookups, CBOR envelope encoding, CLI tooling, and persistence of
//! aggregate state are external collaborators this crate interfaces with but
//! does not implement.
//!
//! # Further reading
//! + `go-data-segment` / `rust-fil-proofs`: the system this crate's wire
//!   format and placement algorithm are compatible with.
//! + RFC 6962: <https://datatracker.ietf.org/doc/html/rfc6962> — the
//!   inclusion-proof shape this crate's [`proof::ProofPath`] generalizes
//!   from a log's append-only tree to an aggregate's perfect binary tree.

pub mod aggregate;
pub mod cid;
pub mod config;
pub mod dense;
pub mod error;
pub mod hybrid;
pub mod location;
pub mod node;
pub mod pad;
pub mod placement;
pub mod proof;
pub mod segment;
pub mod verifier;
pub mod zero;

pub use error::Error;
pub use node::Node;

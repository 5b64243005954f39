//! The piece-commitment CID: a fixed 7-byte prefix followed by a 32-byte
//! commitment.
//!
//! Full CID tagging (multicodec/multihash negotiation, base encoding) lives
//! outside the core; this module only knows the one constant prefix the
//! storage network actually uses for piece commitments and enforces it at
//! the verifier boundary.

use crate::{
    error::Corruption,
    node::Node,
};

/// The constant 7-byte prefix of a piece-commitment CID.
pub const PREFIX: [u8; 7] = [0x01, 0x81, 0xE2, 0x03, 0x92, 0x20, 0x20];

/// Byte length of a full piece-commitment CID: 7-byte prefix + 32-byte node.
pub const LEN: usize = PREFIX.len() + 32;

/// Encodes `commitment` as a piece-commitment CID.
#[must_use]
pub fn encode(commitment: &Node) -> [u8; LEN] {
    let mut out = [0u8; LEN];
    out[..PREFIX.len()].copy_from_slice(&PREFIX);
    out[PREFIX.len()..].copy_from_slice(commitment);
    out
}

/// Parses a piece-commitment CID, requiring the exact constant prefix.
///
/// # Errors
/// Returns [`Corruption::CidPrefixMismatch`] if `bytes` is the wrong length
/// or carries a different prefix.
pub fn decode(bytes: &[u8]) -> Result<Node, Corruption> {
    if bytes.len() != LEN || bytes[..PREFIX.len()] != PREFIX {
        return Err(Corruption::CidPrefixMismatch);
    }
    Ok(bytes[PREFIX.len()..].try_into().unwrap())
}

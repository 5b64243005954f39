//! The 127-byte (unpadded) <-> 128-byte (padded) codec.
//!
//! A 32-byte node carries 254 bits of real payload (the top two bits of
//! byte 31 are always zero, per [`crate::node`]). Four nodes therefore carry
//! `4 * 254 = 1016` bits, exactly 127 bytes, while occupying `4 * 32 = 128`
//! bytes on the wire. [`pad`] and [`unpad`] losslessly convert between the
//! two representations one 127/128-byte chunk at a time by treating each
//! chunk as a flat bitstream and re-slotting it around the two zero bits
//! reserved at the top of every node.
//!
//! This is the same "shift payload bits around a few forced-zero bits per
//! node" idea the real `fr32` crate (used by `go-data-segment` and its
//! proving backend `rust-fil-proofs`) relies on for turning raw piece bytes
//! into field elements, just re-derived here from the bit budget alone
//! rather than linked against that crate, since `fr32`'s own padding
//! granularity (31 raw bytes per 32 padded bytes, repeated) differs from the
//! 127/128 grouping this crate's on-disk index layout uses.

use crate::error::InvalidArgument;

/// Number of payload (pre-padding) bytes per chunk.
pub const UNPADDED_CHUNK_SIZE: usize = 127;
/// Number of bytes per chunk once padded: four 32-byte nodes.
pub const PADDED_CHUNK_SIZE: usize = 128;

const BITS_PER_NODE_PAYLOAD: usize = 254;
const NODES_PER_CHUNK: usize = 4;

#[inline]
fn get_bit(data: &[u8], bit_index: usize) -> bool {
    (data[bit_index / 8] >> (bit_index % 8)) & 1 == 1
}

#[inline]
fn set_bit(data: &mut [u8], bit_index: usize, value: bool) {
    let byte = &mut data[bit_index / 8];
    if value {
        *byte |= 1 << (bit_index % 8);
    } else {
        *byte &= !(1 << (bit_index % 8));
    }
}

/// Pads one 127-byte chunk into 128 bytes, clearing the top two bits of
/// every 32-byte node's last byte.
fn pad_chunk(input: &[u8; UNPADDED_CHUNK_SIZE], output: &mut [u8; PADDED_CHUNK_SIZE]) {
    output.fill(0);
    let mut in_bit = 0;
    for node in 0..NODES_PER_CHUNK {
        let out_base = node * 256;
        for i in 0..BITS_PER_NODE_PAYLOAD {
            set_bit(output, out_base + i, get_bit(input, in_bit));
            in_bit += 1;
        }
        // The remaining two bits of the node (out_base + 254, out_base + 255)
        // are left cleared by the `fill(0)` above.
    }
}

/// Inverse of [`pad_chunk`]: reconstructs the 127-byte payload from a
/// 128-byte padded chunk, ignoring the two forced-zero bits of each node.
fn unpad_chunk(input: &[u8; PADDED_CHUNK_SIZE], output: &mut [u8; UNPADDED_CHUNK_SIZE]) {
    output.fill(0);
    let mut out_bit = 0;
    for node in 0..NODES_PER_CHUNK {
        let in_base = node * 256;
        for i in 0..BITS_PER_NODE_PAYLOAD {
            set_bit(output, out_bit, get_bit(input, in_base + i));
            out_bit += 1;
        }
    }
}

/// Pads `data`, whose length must be a multiple of 127, into a buffer whose
/// length is a multiple of 128.
///
/// # Errors
/// Returns [`InvalidArgument::NotAMultipleOf127`] if `data.len() % 127 != 0`.
pub fn pad(data: &[u8]) -> Result<Vec<u8>, InvalidArgument> {
    if data.len() % UNPADDED_CHUNK_SIZE != 0 {
        return Err(InvalidArgument::NotAMultipleOf127 {
            len: data.len(),
        });
    }
    let mut out = vec![0u8; data.len() / UNPADDED_CHUNK_SIZE * PADDED_CHUNK_SIZE];
    for (in_chunk, out_chunk) in data
        .chunks_exact(UNPADDED_CHUNK_SIZE)
        .zip(out.chunks_exact_mut(PADDED_CHUNK_SIZE))
    {
        let in_arr: &[u8; UNPADDED_CHUNK_SIZE] = in_chunk.try_into().unwrap();
        let out_arr: &mut [u8; PADDED_CHUNK_SIZE] = out_chunk.try_into().unwrap();
        pad_chunk(in_arr, out_arr);
    }
    Ok(out)
}

/// Inverse of [`pad`]: unpads `data`, whose length must be a multiple of
/// 128, into a buffer whose length is a multiple of 127.
///
/// # Errors
/// Returns [`InvalidArgument`] if `data.len() % 128 != 0`.
pub fn unpad(data: &[u8]) -> Result<Vec<u8>, InvalidArgument> {
    if data.len() % PADDED_CHUNK_SIZE != 0 {
        return Err(InvalidArgument::NotAMultipleOf127 {
            len: data.len(),
        });
    }
    let mut out = vec![0u8; data.len() / PADDED_CHUNK_SIZE * UNPADDED_CHUNK_SIZE];
    for (in_chunk, out_chunk) in data
        .chunks_exact(PADDED_CHUNK_SIZE)
        .zip(out.chunks_exact_mut(UNPADDED_CHUNK_SIZE))
    {
        let in_arr: &[u8; PADDED_CHUNK_SIZE] = in_chunk.try_into().unwrap();
        let out_arr: &mut [u8; UNPADDED_CHUNK_SIZE] = out_chunk.try_into().unwrap();
        unpad_chunk(in_arr, out_arr);
    }
    Ok(out)
}

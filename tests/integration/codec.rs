use data_segment::{
    cid,
    pad,
    segment::{
        IndexData,
        SegmentDesc,
    },
};

use crate::build_one_mib_aggregate;

/// Scenario 4: the data-segment index marshals to bytes, survives a
/// pad/unpad round trip through the deal's unpadded wire representation
/// (the same transform the deal's payload bytes go through), and unmarshals
/// back to the same entries the aggregate built.
#[test]
fn index_round_trips_through_marshal_and_the_padding_codec() {
    let aggregate = build_one_mib_aggregate();
    let marshaled = aggregate.index().marshal_binary();

    // Zero-extend to a multiple of 127 bytes so the general-purpose padding
    // codec (which operates on arbitrary unpadded byte streams, not just
    // descriptor-aligned ones) can round-trip it.
    let mut unpadded = marshaled.clone();
    unpadded.resize(unpadded.len().div_ceil(pad::UNPADDED_CHUNK_SIZE) * pad::UNPADDED_CHUNK_SIZE, 0);
    let padded = pad::pad(&unpadded).unwrap();
    let round_tripped = pad::unpad(&padded).unwrap();
    assert_eq!(round_tripped, unpadded);
    assert_eq!(&round_tripped[..marshaled.len()], marshaled.as_slice());

    let restored = IndexData::unmarshal_binary(&marshaled).unwrap();
    assert_eq!(restored.entries(), aggregate.index().entries());
}

/// A hand-built descriptor's 64-byte encoding matches the byte layout
/// documented on [`SegmentDesc::to_bytes`]: `comm_ds || offset || size ||
/// checksum`, all little-endian. Checked here via a hex dump rather than by
/// poking at field offsets, since that is the representation a caller
/// storing the index on disk or over the wire would actually compare
/// against.
#[test]
fn segment_desc_byte_layout_matches_its_hex_dump() {
    let desc = SegmentDesc::new([0x11u8; 32], 256, 512).unwrap();
    let bytes = desc.to_bytes();
    let dumped = hex::encode(bytes);

    assert_eq!(&dumped[0..64], &"11".repeat(32));
    // offset = 256 = 0x100, little-endian over the next 8 bytes (16 hex chars).
    assert_eq!(&dumped[64..80], "0001000000000000");
    // size = 512 = 0x200, little-endian.
    assert_eq!(&dumped[80..96], "0002000000000000");

    let redecoded: [u8; 64] = hex::decode(&dumped).unwrap().try_into().unwrap();
    assert_eq!(SegmentDesc::from_bytes(&redecoded), desc);
}

/// The piece-commitment CID is the deal's root with the fixed prefix
/// prepended, and decoding rejects anything that does not carry it.
#[test]
fn piece_cid_round_trips_and_rejects_a_foreign_prefix() {
    let aggregate = build_one_mib_aggregate();
    let encoded = cid::encode(&aggregate.piece_cid());
    assert_eq!(encoded.len(), cid::LEN);
    assert_eq!(cid::decode(&encoded).unwrap(), aggregate.piece_cid());

    let mut foreign = encoded;
    foreign[0] ^= 0xff;
    assert!(cid::decode(&foreign).is_err());
}

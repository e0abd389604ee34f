//! Address Decoder Tests.
//!
//! Verifies the bit-exact tag/index/offset split and its inverse.

use cachectl_core::common::{AddressDecoder, DecodedAddr, low_mask};

#[test]
fn low_mask_widths() {
    assert_eq!(low_mask(0), 0);
    assert_eq!(low_mask(1), 1);
    assert_eq!(low_mask(8), 0xFF);
    assert_eq!(low_mask(63), u64::MAX >> 1);
    assert_eq!(low_mask(64), u64::MAX);
}

/// 8-bit address, 2 words per block, 4 lines: tag 5 | index 2 | offset 1.
#[test]
fn decode_small_geometry() {
    let dec = AddressDecoder::new(1, 2, 5);
    assert_eq!(
        dec.decode(0),
        DecodedAddr {
            tag: 0,
            index: 0,
            offset: 0
        }
    );
    // 16 = 0b0001_0000: same index as 0, tag 2.
    assert_eq!(
        dec.decode(16),
        DecodedAddr {
            tag: 2,
            index: 0,
            offset: 0
        }
    );
    // 0b1111_1111
    assert_eq!(
        dec.decode(0xFF),
        DecodedAddr {
            tag: 0x1F,
            index: 3,
            offset: 1
        }
    );
}

#[test]
fn decode_masks_bits_above_address_width() {
    let dec = AddressDecoder::new(1, 2, 5);
    assert_eq!(dec.decode(0x1_05), dec.decode(0x05));
    assert_eq!(dec.mask(0xABCD), 0xCD);
}

#[test]
fn zero_width_fields() {
    // Direct-mapped single line, single word: everything is tag.
    let dec = AddressDecoder::new(0, 0, 16);
    let d = dec.decode(0x1234);
    assert_eq!((d.tag, d.index, d.offset), (0x1234, 0, 0));

    // No tag bits: the whole address is index and offset.
    let dec = AddressDecoder::new(2, 6, 0);
    let d = dec.decode(0xFF);
    assert_eq!((d.tag, d.index, d.offset), (0, 0x3F, 3));
}

#[test]
fn full_64_bit_address() {
    let dec = AddressDecoder::new(3, 10, 51);
    let addr = u64::MAX;
    let d = dec.decode(addr);
    assert_eq!(d.offset, 7);
    assert_eq!(d.index, 0x3FF);
    assert_eq!(d.tag, low_mask(51));
    assert_eq!(dec.compose(d.tag, d.index, d.offset), addr);
}

#[test]
fn compose_addresses_block_words() {
    let dec = AddressDecoder::new(1, 2, 5);
    assert_eq!(dec.compose(2, 0, 0), 16);
    assert_eq!(dec.compose(2, 0, 1), 17);
    assert_eq!(dec.compose(1, 3, 1), 0b0000_1111);
}

#[test]
fn accessors_report_widths() {
    let dec = AddressDecoder::new(2, 4, 10);
    assert_eq!(dec.offset_bits(), 2);
    assert_eq!(dec.index_bits(), 4);
    assert_eq!(dec.tag_bits(), 10);
    assert_eq!(dec.addr_bits(), 16);
}

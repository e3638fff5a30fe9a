/*
    TrackFox
    https://github.com/dbalsom/trackfox

    Copyright 2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    tests/longtrack.rs

    Recognition, length-gate and re-encode tests for the long-track
    protection formats.
*/
mod common;

use strum::IntoEnumIterator;
use trackfox::{
    decode_track,
    detect_track,
    encode_track,
    mfm_decode_bits,
    BitStream,
    BitcellEncoding,
    TrackBuffer,
    TrackInfo,
    TrackType,
    SPEED_AVG,
};

/// Sync plus repeated PROTEC filler, padded to `total_bits`.
fn protec_track(filler: u8, repeats: usize, total_bits: usize) -> BitStream {
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0x4454);
    for _ in 0..repeats {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, filler as u32);
    }
    common::pad_track(&mut tbuf, total_bits);
    BitStream::new(tbuf.into_bit_vec())
}

#[test]
fn test_protec_keeps_nondefault_filler() {
    common::init();
    let mut stream = protec_track(0x44, 1200, 108_000);
    let mut ti = TrackInfo::new(TrackType::ProtecLongtrack);
    decode_track(&mut ti, &mut stream).expect("PROTEC track not recognised");
    assert_eq!(ti.dat, vec![0x44]);
    assert_eq!(ti.total_bits, 110_000);

    // Re-encode must emit the stored filler, not the common 0x33.
    let mut tbuf = TrackBuffer::new();
    encode_track(&ti, &mut tbuf);
    let mut stream = BitStream::new(tbuf.into_bit_vec());
    stream.next_bits(16).unwrap();
    assert_eq!(stream.word() as u16, 0x4454);
    stream.next_bits(16).unwrap();
    assert_eq!(
        mfm_decode_bits(BitcellEncoding::Mfm, stream.word() & 0xffff) as u8,
        0x44
    );
}

#[test]
fn test_protec_length_gate_is_fatal() {
    common::init();
    let mut stream = protec_track(0x44, 1200, 106_000);
    let mut ti = TrackInfo::new(TrackType::ProtecLongtrack);
    assert!(decode_track(&mut ti, &mut stream).is_err());
}

#[test]
fn test_gremlin_roundtrip() {
    common::init();
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 32, 0x4124_4124);
    common::pad_track(&mut tbuf, 105_500);

    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::GremlinLongtrack);
    decode_track(&mut ti, &mut stream).expect("Gremlin track not recognised");
    assert!(ti.dat.is_empty());
    assert_eq!(ti.total_bits, 105_500);
    assert_eq!(ti.data_bitoff, 0);

    // Re-encoding and topping up to total_bits must decode identically.
    let mut tbuf = TrackBuffer::new();
    encode_track(&ti, &mut tbuf);
    common::pad_track(&mut tbuf, ti.total_bits as usize);
    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut again = TrackInfo::new(TrackType::GremlinLongtrack);
    decode_track(&mut again, &mut stream).expect("re-encoded track not recognised");
    assert_eq!(again.total_bits, ti.total_bits);
}

#[test]
fn test_tiertex_keeps_container_length() {
    common::init();
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 32, 0x4124_4124);
    common::pad_track(&mut tbuf, 100_150);

    // The same bits decode as either type; only the prior-set type decides
    // whether total_bits is overridden.
    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::TiertexLongtrack);
    decode_track(&mut ti, &mut stream).expect("Tiertex track not recognised");
    assert_eq!(ti.total_bits, 0);

    stream.reset();
    let mut ti = TrackInfo::new(TrackType::GremlinLongtrack);
    decode_track(&mut ti, &mut stream).expect("Gremlin track not recognised");
    assert_eq!(ti.total_bits, 105_500);
}

#[test]
fn test_crystals_of_arborea_requires_tag() {
    common::init();
    let build = |tag: u32| {
        let mut tbuf = TrackBuffer::new();
        // Gap cells ahead of the sync; the scanner matches them as part of
        // its 32-bit window.
        tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0xaaaa);
        tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0xa144);
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 32, tag);
        common::pad_track(&mut tbuf, 110_000);
        BitStream::new(tbuf.into_bit_vec())
    };

    let mut stream = build(0x524f_4430); // "ROD0"
    let mut ti = TrackInfo::new(TrackType::CrystalsOfArboreaLongtrack);
    decode_track(&mut ti, &mut stream).expect("Crystals track not recognised");
    assert!(ti.dat.is_empty());
    assert_eq!(ti.total_bits, 110_000);

    let mut stream = build(0x524f_4431); // "ROD1"
    let mut ti = TrackInfo::new(TrackType::CrystalsOfArboreaLongtrack);
    assert!(decode_track(&mut ti, &mut stream).is_err());
}

#[test]
fn test_infogrames_roundtrip() {
    common::init();
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0xa144);
    common::pad_track(&mut tbuf, 105_500);

    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::InfogramesLongtrack);
    decode_track(&mut ti, &mut stream).expect("Infogrames track not recognised");
    assert_eq!(ti.total_bits, 105_500);
}

#[test]
fn test_bat_needs_gap_before_sync() {
    common::init();
    let build = |gap: bool| {
        let mut tbuf = TrackBuffer::new();
        if gap {
            tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0xaaaa);
        }
        tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0x8945);
        common::pad_track(&mut tbuf, 110_000);
        BitStream::new(tbuf.into_bit_vec())
    };

    let mut stream = build(true);
    let mut ti = TrackInfo::new(TrackType::BatLongtrack);
    decode_track(&mut ti, &mut stream).expect("B.A.T. track not recognised");
    assert_eq!(ti.total_bits, 110_000);

    // Without the leading gap cells the 32-bit window never matches.
    let mut stream = build(false);
    let mut ti = TrackInfo::new(TrackType::BatLongtrack);
    assert!(decode_track(&mut ti, &mut stream).is_err());
}

#[test]
fn test_app_roundtrip() {
    common::init();
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0x924a);
    for _ in 0..6600 {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0xdc);
    }
    common::pad_track(&mut tbuf, 111_000);

    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::AppLongtrack);
    decode_track(&mut ti, &mut stream).expect("APP track not recognised");
    assert_eq!(ti.total_bits, 111_000);

    let mut tbuf = TrackBuffer::new();
    encode_track(&ti, &mut tbuf);
    common::pad_track(&mut tbuf, ti.total_bits as usize);
    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut again = TrackInfo::new(TrackType::AppLongtrack);
    decode_track(&mut again, &mut stream).expect("re-encoded track not recognised");
}

#[test]
fn test_sevencities_crc_capture() {
    common::init();
    let dat = common::sevencities_fixture();

    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0x924a);
    // Gap between the trailing sync and the next pass's leading sync.
    for _ in 0..25 {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0);
    }
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0x9251);
    tbuf.bytes(SPEED_AVG, BitcellEncoding::Raw, &dat);
    common::pad_track(&mut tbuf, 101_500);

    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::SevenCitiesLongtrack);
    decode_track(&mut ti, &mut stream).expect("Seven Cities track not recognised");
    assert_eq!(ti.dat, dat);
    assert_eq!(ti.len(), 122);
    assert_eq!(ti.data_bitoff, 76_000);
    assert_eq!(ti.total_bits, 101_500);
}

#[test]
fn test_sevencities_needs_trailing_sync_first() {
    common::init();
    // A leading sync with no 0x924a anywhere: the capture never starts.
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, 0x9251);
    common::pad_track(&mut tbuf, 101_500);

    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::SevenCitiesLongtrack);
    assert!(decode_track(&mut ti, &mut stream).is_err());
}

#[test]
fn test_all_zero_track_matches_only_empty() {
    common::init();
    // 110000 bitcells of MFM-encoded zeroes.
    let mut tbuf = TrackBuffer::new();
    for _ in 0..6875 {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0);
    }
    let bits = tbuf.into_bit_vec();
    assert_eq!(bits.len(), 110_000);

    let mut stream = BitStream::new(bits);
    for track_type in TrackType::iter() {
        stream.reset();
        let mut ti = TrackInfo::new(track_type);
        let accepted = decode_track(&mut ti, &mut stream).is_ok();
        assert_eq!(
            accepted,
            track_type == TrackType::EmptyLongtrack,
            "unexpected verdict from {track_type}"
        );
    }

    stream.reset();
    let ti = detect_track(&mut stream).expect("empty track not detected");
    assert_eq!(ti.track_type, TrackType::EmptyLongtrack);
    assert_eq!(ti.total_bits, 110_000);
    assert_eq!(ti.data_bitoff, 55_000);
}

#[test]
fn test_short_empty_track_is_rejected() {
    common::init();
    let mut tbuf = TrackBuffer::new();
    for _ in 0..6500 {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0);
    }
    // 104000 bits: under the empty-track threshold.
    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let mut ti = TrackInfo::new(TrackType::EmptyLongtrack);
    assert!(decode_track(&mut ti, &mut stream).is_err());
}

#[test]
fn test_detection_order() {
    common::init();
    // A Gremlin track is also long enough for the empty-track check; the
    // registration order must hand it to the stronger pattern.
    let mut tbuf = TrackBuffer::new();
    tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 32, 0x4124_4124);
    common::pad_track(&mut tbuf, 105_500);

    let mut stream = BitStream::new(tbuf.into_bit_vec());
    let ti = detect_track(&mut stream).expect("track not detected");
    assert_eq!(ti.track_type, TrackType::GremlinLongtrack);
}

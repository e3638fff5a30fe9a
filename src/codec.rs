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
*/

//! Pure MFM decode primitives and the AmigaDOS-style checksum.
//!
//! MFM pairs every payload bit with a clock cell, so a 32-bit raw word read
//! off the track carries 16 payload bits: the word is assembled most
//! significant bit first, clock cells land on the odd bit positions and
//! payload cells on the even positions (`0x5555_5555`).
//!
//! The Amiga convention additionally interleaves multi-bit payloads across
//! two raw halves. The half emitted first (the *even* half) carries the
//! value's odd-position bits; the half emitted second (the *odd* half)
//! carries the even-position bits, which sit in place once the clock cells
//! are masked off. A value already masked to `0x5555_5555` — such as an
//! AmigaDOS checksum — therefore survives a lone odd half intact, which is
//! how several formats store their checksum in a single raw longword.
//!
//! The encode direction lives on [`TrackBuffer`](crate::TrackBuffer), which
//! owns the clock-cell context that spans appends.

/// Payload bit positions within a raw MFM word.
const DATA_BITS: u32 = 0x5555_5555;

/// How a run of bitcells on the track encodes payload bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitcellEncoding {
    /// Bitcells pass through untouched. Used for sync words, which
    /// deliberately violate the MFM clocking rules so they cannot occur in
    /// encoded payload.
    Raw,
    /// Every payload bit is paired with a clock cell.
    Mfm,
    /// The odd half of an interleaved pair: payload bits occupy the data
    /// positions in place.
    MfmOdd,
    /// The even half of an interleaved pair: payload bits are the value's
    /// odd-position bits, shifted down into the data positions.
    MfmEven,
    /// Both halves of an interleaved value, even half first.
    MfmEvenOdd,
}

/// Strip clock cells from the raw word `raw` according to `enc`.
///
/// For [`BitcellEncoding::Mfm`] the data positions are compressed together,
/// so a full 32-bit raw word yields 16 payload bits and a zero-extended
/// 16-bit raw word yields 8. The half modes return the data-position bits
/// without compressing; combining a decoded even and odd half reconstructs
/// the interleaved value.
pub fn mfm_decode_bits(enc: BitcellEncoding, raw: u32) -> u32 {
    match enc {
        BitcellEncoding::Raw => raw,
        BitcellEncoding::Mfm => {
            let mut dat = 0;
            for i in (0..16).rev() {
                dat = (dat << 1) | ((raw >> (2 * i)) & 1);
            }
            dat
        }
        BitcellEncoding::MfmOdd => raw & DATA_BITS,
        BitcellEncoding::MfmEven => (raw & DATA_BITS) << 1,
        BitcellEncoding::MfmEvenOdd => {
            panic!("interleaved pairs decode via mfm_decode_bytes")
        }
    }
}

/// Decode `2n` encoded bytes from `src` into the `n`-byte `dst`.
///
/// For [`BitcellEncoding::MfmEvenOdd`] the first `n` source bytes are the
/// even halves and the last `n` the odd halves; each output byte is the
/// interleave of the matching pair.
pub fn mfm_decode_bytes(enc: BitcellEncoding, src: &[u8], dst: &mut [u8]) {
    assert_eq!(src.len(), 2 * dst.len());
    match enc {
        BitcellEncoding::Mfm => {
            for (i, out) in dst.iter_mut().enumerate() {
                let raw = u16::from_be_bytes([src[2 * i], src[2 * i + 1]]);
                *out = mfm_decode_bits(BitcellEncoding::Mfm, raw as u32) as u8;
            }
        }
        BitcellEncoding::MfmEvenOdd => {
            let (even, odd) = src.split_at(dst.len());
            for (i, out) in dst.iter_mut().enumerate() {
                *out = ((even[i] & 0x55) << 1) | (odd[i] & 0x55);
            }
        }
        _ => panic!("byte decode supports the mfm and even/odd modes only"),
    }
}

/// AmigaDOS-style checksum over `buf`: XOR of its big-endian longwords,
/// folded and masked so the result is a valid MFM data pattern. `buf` must
/// be a multiple of four bytes.
pub fn amigados_checksum(buf: &[u8]) -> u32 {
    debug_assert!(buf.len() % 4 == 0);
    let mut csum = 0u32;
    for long in buf.chunks_exact(4) {
        csum ^= u32::from_be_bytes([long[0], long[1], long[2], long[3]]);
    }
    (csum ^ (csum >> 1)) & DATA_BITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mfm_word() {
        // 0x4489 is the classic Amiga sector sync: MFM-encoded 0xA1 with a
        // clock cell suppressed. The decode ignores clock cells entirely.
        assert_eq!(mfm_decode_bits(BitcellEncoding::Mfm, 0x4489), 0xa1);
        assert_eq!(mfm_decode_bits(BitcellEncoding::Mfm, 0x4489_4489), 0xa1a1);
        assert_eq!(mfm_decode_bits(BitcellEncoding::Mfm, 0xaaaa_aaaa), 0);
        assert_eq!(mfm_decode_bits(BitcellEncoding::Mfm, 0x5555_5555), 0xffff);
    }

    #[test]
    fn test_decode_halves_reconstruct_value() {
        let value: u32 = 0xdead_beef;
        // Build the two raw halves by hand, with all clock positions set to
        // exercise the masking.
        let even_raw = ((value >> 1) & 0x5555_5555) | 0xaaaa_aaaa;
        let odd_raw = (value & 0x5555_5555) | 0xaaaa_aaaa;
        let recombined = mfm_decode_bits(BitcellEncoding::MfmEven, even_raw)
            | mfm_decode_bits(BitcellEncoding::MfmOdd, odd_raw);
        assert_eq!(recombined, value);
    }

    #[test]
    fn test_decode_even_odd_bytes() {
        let dat: Vec<u8> = (0..32).map(|i| (i * 37 + 5) as u8).collect();
        let mut src = vec![0u8; 64];
        for (i, &byte) in dat.iter().enumerate() {
            // Even half first, clock positions stuffed with ones.
            src[i] = ((byte >> 1) & 0x55) | 0xaa;
            src[32 + i] = (byte & 0x55) | 0xaa;
        }
        let mut dst = vec![0u8; 32];
        mfm_decode_bytes(BitcellEncoding::MfmEvenOdd, &src, &mut dst);
        assert_eq!(dst, dat);
    }

    #[test]
    fn test_amigados_checksum_zeroes() {
        assert_eq!(amigados_checksum(&[0u8; 64]), 0);
    }

    #[test]
    fn test_amigados_checksum_fold() {
        // A lone high bit folds down onto the adjacent data position.
        assert_eq!(amigados_checksum(&[0x80, 0, 0, 0]), 0x4000_0000);
        // Identical longwords cancel.
        assert_eq!(amigados_checksum(&[0x12, 0x34, 0x56, 0x78, 0x12, 0x34, 0x56, 0x78]), 0);
    }

    #[test]
    fn test_amigados_checksum_is_mfm_valid() {
        let buf: Vec<u8> = (0..128).map(|i| (i * 11 + 7) as u8).collect();
        assert_eq!(amigados_checksum(&buf) & 0xaaaa_aaaa, 0);
    }
}

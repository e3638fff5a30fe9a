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

//! The custom data-track formats used by R-Type (Electric Dreams / Factor 5
//! / Rainbow Arts).
//!
//! Both variants open with the same sync and a single encoded zero byte,
//! then diverge:
//!
//! Variant A:
//! ```text
//!   u16 0x9521          :: sync (raw)
//!   u8  0               :: mfm
//!   u32 csum            :: mfm_odd, AmigaDOS-style checksum
//!   u8  data_even[5968] :: even halves of the whole track
//!   u8  data_odd[5968]  :: odd halves of the whole track
//! ```
//!
//! Variant B:
//! ```text
//!   u16 0x9521          :: sync (raw)
//!   u8  0               :: mfm
//!   u32 data[6552/4]    :: each longword mfm_even_odd on its own
//!   u32 csum            :: mfm_even_odd, (AmigaDOS-style & 0x55555555) | 0xaaaaaaaa
//! ```

use crate::{
    bitstream::BitStream,
    codec::{amigados_checksum, mfm_decode_bits, mfm_decode_bytes, BitcellEncoding},
    track::TrackInfo,
    track_buffer::{TrackBuffer, SPEED_AVG},
    track_format::{FormatOps, TrackFormat},
};

const RTYPE_SYNC: u16 = 0x9521;

/// R-Type variant A: one 5968-byte sector interleaved across the whole
/// track behind a single checksum longword.
pub(super) struct RTypeA;

impl TrackFormat for RTypeA {
    fn ops(&self) -> FormatOps {
        FormatOps::DECODE_MFM | FormatOps::ENCODE_MFM
    }

    fn bytes_per_sector(&self) -> usize {
        5968
    }

    fn nr_sectors(&self) -> usize {
        1
    }

    fn decode_mfm(&self, ti: &mut TrackInfo, stream: &mut BitStream) -> Option<Vec<u8>> {
        let len = self.bytes_per_sector();
        while stream.next_bit().is_some() {
            if stream.word() as u16 != RTYPE_SYNC {
                continue;
            }
            ti.data_bitoff = stream.index_offset_bc().saturating_sub(16) as u32;

            stream.next_bits(16)?;
            if mfm_decode_bits(BitcellEncoding::Mfm, stream.word() & 0xffff) != 0 {
                continue;
            }

            stream.next_bits(32)?;
            let csum = mfm_decode_bits(BitcellEncoding::MfmOdd, stream.word());

            let mut raw = vec![0u8; 2 * len];
            stream.next_bytes(&mut raw)?;
            let mut dat = vec![0u8; len];
            mfm_decode_bytes(BitcellEncoding::MfmEvenOdd, &raw, &mut dat);

            if amigados_checksum(&dat) != csum {
                continue;
            }

            ti.valid_sectors = (1 << ti.nr_sectors) - 1;
            return Some(dat);
        }
        None
    }

    fn encode_mfm(&self, ti: &TrackInfo, tbuf: &mut TrackBuffer) {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, RTYPE_SYNC as u32);
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0);
        tbuf.bits(SPEED_AVG, BitcellEncoding::MfmOdd, 32, amigados_checksum(&ti.dat));
        tbuf.bytes(SPEED_AVG, BitcellEncoding::MfmEvenOdd, &ti.dat);
    }
}

/// R-Type variant B: one 6552-byte sector interleaved per longword with a
/// trailing checksum whose odd bits are forced on.
pub(super) struct RTypeB;

impl RTypeB {
    fn checksum(dat: &[u8]) -> u32 {
        (amigados_checksum(dat) & 0x5555_5555) | 0xaaaa_aaaa
    }
}

impl TrackFormat for RTypeB {
    fn ops(&self) -> FormatOps {
        FormatOps::DECODE_MFM | FormatOps::ENCODE_MFM
    }

    fn bytes_per_sector(&self) -> usize {
        6552
    }

    fn nr_sectors(&self) -> usize {
        1
    }

    fn decode_mfm(&self, ti: &mut TrackInfo, stream: &mut BitStream) -> Option<Vec<u8>> {
        let len = self.bytes_per_sector();
        while stream.next_bit().is_some() {
            if stream.word() as u16 != RTYPE_SYNC {
                continue;
            }
            ti.data_bitoff = stream.index_offset_bc().saturating_sub(16) as u32;

            stream.next_bits(16)?;
            if mfm_decode_bits(BitcellEncoding::Mfm, stream.word() & 0xffff) != 0 {
                continue;
            }

            let mut raw = vec![0u8; 2 * len];
            stream.next_bytes(&mut raw)?;
            let mut dat = vec![0u8; len];
            for (group, out) in raw.chunks_exact(8).zip(dat.chunks_exact_mut(4)) {
                mfm_decode_bytes(BitcellEncoding::MfmEvenOdd, group, out);
            }

            let mut raw_csum = [0u8; 8];
            stream.next_bytes(&mut raw_csum)?;
            let mut dec_csum = [0u8; 4];
            mfm_decode_bytes(BitcellEncoding::MfmEvenOdd, &raw_csum, &mut dec_csum);
            if Self::checksum(&dat) != u32::from_be_bytes(dec_csum) {
                continue;
            }

            ti.valid_sectors = (1 << ti.nr_sectors) - 1;
            ti.total_bits = 105_500;
            return Some(dat);
        }
        None
    }

    fn encode_mfm(&self, ti: &TrackInfo, tbuf: &mut TrackBuffer) {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 16, RTYPE_SYNC as u32);
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0);
        for long in ti.dat.chunks_exact(4) {
            tbuf.bytes(SPEED_AVG, BitcellEncoding::MfmEvenOdd, long);
        }
        tbuf.bits(SPEED_AVG, BitcellEncoding::MfmEvenOdd, 32, Self::checksum(&ti.dat));
    }
}

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

    tests/common/mod.rs

    Common support routines for tests
*/
#![allow(dead_code)]

use trackfox::{crc16_ccitt, BitcellEncoding, TrackBuffer, SPEED_AVG};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Pad a synthesized track with MFM-encoded zero bytes (and a few raw zero
/// cells for the remainder) until it is exactly `total_bits` long, the way
/// a container tops a track up to its gap.
pub fn pad_track(tbuf: &mut TrackBuffer, total_bits: usize) {
    while tbuf.len() + 16 <= total_bits {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Mfm, 8, 0);
    }
    while tbuf.len() < total_bits {
        tbuf.bits(SPEED_AVG, BitcellEncoding::Raw, 1, 0);
    }
}

/// 122 bytes whose CRC-16/CCITT comes out at the value the Seven Cities of
/// Gold loader expects: an arbitrary body with the last two bytes chosen to
/// steer the CRC.
pub fn sevencities_fixture() -> Vec<u8> {
    let mut dat: Vec<u8> = (0..120u32).map(|i| (i * 7 + 3) as u8).collect();
    let base = crc16_ccitt(&dat, None);
    let tail = (0..=u16::MAX)
        .find(|t| crc16_ccitt(&t.to_be_bytes(), Some(base)) == 0x010a)
        .expect("no CRC steering tail exists");
    dat.extend_from_slice(&tail.to_be_bytes());
    assert_eq!(crc16_ccitt(&dat, None), 0x010a);
    dat
}

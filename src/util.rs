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

    src/util.rs

    CRC-16/CCITT, as used by protection loaders to fingerprint raw track
    data. The stream feeds the running CRC a bit at a time.
*/

const CRC16_CCITT_POLY: u16 = 0x1021;

/// Advance a CRC-16/CCITT by one bit, most significant bit first.
#[inline]
pub(crate) fn crc16_ccitt_bit(crc: u16, bit: bool) -> u16 {
    let feedback = ((crc >> 15) != 0) ^ bit;
    let crc = crc << 1;
    if feedback {
        crc ^ CRC16_CCITT_POLY
    }
    else {
        crc
    }
}

/// CRC-16/CCITT over `data`, continuing from `init` if given, otherwise
/// starting from the standard `0xffff` preset.
pub fn crc16_ccitt(data: &[u8], init: Option<u16>) -> u16 {
    let mut crc = init.unwrap_or(0xffff);
    for &byte in data {
        for i in (0..8).rev() {
            crc = crc16_ccitt_bit(crc, (byte >> i) & 1 != 0);
        }
    }
    crc
}

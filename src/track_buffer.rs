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

    src/track_buffer.rs

    Write-side counterpart of the bit stream: appends bitcells under a
    named encoding mode, inserting MFM clock cells as it goes.
*/

use bit_vec::BitVec;

use crate::codec::BitcellEncoding;

/// Nominal bitcell timing hint. Formats in this crate write every cell at
/// the average rate; the constant exists so downstream flux generators see
/// an explicit speed for each run.
pub const SPEED_AVG: u16 = 1000;

/// A run of consecutively appended bitcells sharing one timing hint.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SpeedRun {
    pub bits:  usize,
    pub speed: u16,
}

/// An append-only buffer of raw bitcells.
///
/// The MFM clocking rule — a clock cell is 1 only when the payload cells on
/// both sides are 0 — spans append boundaries, so the buffer carries the
/// last emitted cell as context. Timing hints are recorded as run-length
/// [`SpeedRun`]s and never affect the cell values.
pub struct TrackBuffer {
    bits: BitVec,
    speeds: Vec<SpeedRun>,
    last_bit: bool,
}

impl Default for TrackBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackBuffer {
    pub fn new() -> Self {
        TrackBuffer {
            bits: BitVec::new(),
            speeds: Vec::new(),
            last_bit: false,
        }
    }

    /// Append the low `nr_bits` of `value` under `enc`.
    ///
    /// `nr_bits` counts payload bits. [`BitcellEncoding::Raw`] emits them
    /// verbatim; [`BitcellEncoding::Mfm`] and [`BitcellEncoding::MfmEvenOdd`]
    /// emit `2 * nr_bits` cells; the single-half modes emit `nr_bits` cells
    /// carrying half of the value's bits each.
    pub fn bits(&mut self, speed: u16, enc: BitcellEncoding, nr_bits: u32, value: u32) {
        debug_assert!((1..=32).contains(&nr_bits));
        let start = self.bits.len();
        match enc {
            BitcellEncoding::Raw => {
                for i in (0..nr_bits).rev() {
                    self.push_raw_bit((value >> i) & 1 != 0);
                }
            }
            BitcellEncoding::Mfm => {
                for i in (0..nr_bits).rev() {
                    self.push_data_bit((value >> i) & 1 != 0);
                }
            }
            BitcellEncoding::MfmEven => {
                debug_assert!(nr_bits % 2 == 0);
                for i in (0..nr_bits / 2).rev() {
                    self.push_data_bit((value >> (2 * i + 1)) & 1 != 0);
                }
            }
            BitcellEncoding::MfmOdd => {
                debug_assert!(nr_bits % 2 == 0);
                for i in (0..nr_bits / 2).rev() {
                    self.push_data_bit((value >> (2 * i)) & 1 != 0);
                }
            }
            BitcellEncoding::MfmEvenOdd => {
                self.bits(speed, BitcellEncoding::MfmEven, nr_bits, value);
                self.bits(speed, BitcellEncoding::MfmOdd, nr_bits, value);
                // Speed recorded by the nested calls.
                return;
            }
        }
        self.record_speed(self.bits.len() - start, speed);
    }

    /// Append `src` under `enc`. For [`BitcellEncoding::MfmEvenOdd`] every
    /// byte's even half is emitted before any odd half; formats that
    /// interleave per longword pass each longword separately.
    pub fn bytes(&mut self, speed: u16, enc: BitcellEncoding, src: &[u8]) {
        match enc {
            BitcellEncoding::Raw | BitcellEncoding::Mfm => {
                for &byte in src {
                    self.bits(speed, enc, 8, byte as u32);
                }
            }
            BitcellEncoding::MfmEvenOdd => {
                for &byte in src {
                    self.bits(speed, BitcellEncoding::MfmEven, 8, byte as u32);
                }
                for &byte in src {
                    self.bits(speed, BitcellEncoding::MfmOdd, 8, byte as u32);
                }
            }
            _ => panic!("byte appends support the raw, mfm and even/odd modes"),
        }
    }

    /// Number of bitcells appended so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bit_vec(&self) -> &BitVec {
        &self.bits
    }

    pub fn into_bit_vec(self) -> BitVec {
        self.bits
    }

    /// Timing hints for the appended cells, in order.
    pub fn speed_runs(&self) -> &[SpeedRun] {
        &self.speeds
    }

    fn push_raw_bit(&mut self, bit: bool) {
        self.bits.push(bit);
        self.last_bit = bit;
    }

    fn push_data_bit(&mut self, bit: bool) {
        let clock = !self.last_bit && !bit;
        self.bits.push(clock);
        self.bits.push(bit);
        self.last_bit = bit;
    }

    fn record_speed(&mut self, nr_bits: usize, speed: u16) {
        if nr_bits == 0 {
            return;
        }
        if let Some(last) = self.speeds.last_mut() {
            if last.speed == speed {
                last.bits += nr_bits;
                return;
            }
        }
        self.speeds.push(SpeedRun { bits: nr_bits, speed });
    }
}

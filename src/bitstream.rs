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

    src/bitstream.rs

    Read-side abstraction over a track's raw bitcells: a forward-only
    cursor with a rolling shift register, index-pulse accounting and a
    running CRC.
*/

use bit_vec::BitVec;

use crate::util::crc16_ccitt_bit;

const CRC_INIT: u16 = 0xffff;

/// A forward-only cursor over the raw bitcells of one track revolution,
/// optionally looped over several identical revolutions so a scan that
/// straddles the index can retry.
///
/// Track formats scan by shifting one bit at a time into the 32-bit
/// [`word`](BitStream::word) register and comparing it against their sync
/// patterns, so recognition is never byte-aligned. `index_offset_bc` counts
/// the raw bits consumed since the last index pulse; `track_len_bc` is set
/// to the length of a revolution each time the cursor crosses an index
/// pulse, including the pulse that terminates the final revolution.
pub struct BitStream {
    bits: BitVec,
    nr_revolutions: u32,
    consumed: usize,
    word: u32,
    index_offset_bc: usize,
    track_len_bc: usize,
    crc16: u16,
}

impl BitStream {
    /// Wrap a single revolution of raw bitcells.
    pub fn new(bits: BitVec) -> Self {
        Self::with_revolutions(bits, 1)
    }

    /// Wrap one revolution's bitcells, looped `nr_revolutions` times with an
    /// index pulse at each boundary.
    pub fn with_revolutions(bits: BitVec, nr_revolutions: u32) -> Self {
        assert!(nr_revolutions > 0);
        BitStream {
            bits,
            nr_revolutions,
            consumed: 0,
            word: 0,
            index_offset_bc: 0,
            track_len_bc: 0,
            crc16: CRC_INIT,
        }
    }

    /// Rewind to the start of the first revolution.
    pub fn reset(&mut self) {
        self.consumed = 0;
        self.word = 0;
        self.index_offset_bc = 0;
        self.track_len_bc = 0;
        self.crc16 = CRC_INIT;
    }

    fn total_bits(&self) -> usize {
        self.bits.len() * self.nr_revolutions as usize
    }

    fn step(&mut self) -> bool {
        let len = self.bits.len();
        let bit = self.bits[self.consumed % len];
        self.consumed += 1;
        self.index_offset_bc = (self.consumed - 1) % len + 1;
        if self.index_offset_bc == 1 && self.consumed > 1 {
            // First bit past an index pulse.
            self.track_len_bc = len;
        }
        self.word = (self.word << 1) | bit as u32;
        self.crc16 = crc16_ccitt_bit(self.crc16, bit);
        bit
    }

    /// Consume one raw bit into the shift register. `None` once the final
    /// revolution is exhausted.
    pub fn next_bit(&mut self) -> Option<bool> {
        if self.bits.is_empty() || self.consumed == self.total_bits() {
            return None;
        }
        Some(self.step())
    }

    /// Consume `nr` raw bits, `1..=32`; the newest occupy the low positions
    /// of the shift register. Returns the updated register, or `None` at end
    /// of stream.
    pub fn next_bits(&mut self, nr: u32) -> Option<u32> {
        debug_assert!((1..=32).contains(&nr));
        for _ in 0..nr {
            self.next_bit()?;
        }
        Some(self.word)
    }

    /// Fill `dst` with raw bytes at the current bit alignment.
    pub fn next_bytes(&mut self, dst: &mut [u8]) -> Option<()> {
        for byte in dst.iter_mut() {
            self.next_bits(8)?;
            *byte = self.word as u8;
        }
        Some(())
    }

    /// Advance to the next index pulse; on return `track_len_bc` holds the
    /// raw-bit length of the just-finished revolution. `None` if the stream
    /// was already exhausted.
    pub fn next_index(&mut self) -> Option<()> {
        let len = self.bits.len();
        if len == 0 || self.consumed == self.total_bits() {
            return None;
        }
        loop {
            self.step();
            if self.consumed % len == 0 {
                self.track_len_bc = len;
                self.index_offset_bc = 0;
                return Some(());
            }
        }
    }

    /// Reset the running CRC-16/CCITT; bits consumed from here on
    /// accumulate into [`crc16_ccitt`](BitStream::crc16_ccitt).
    pub fn start_crc(&mut self) {
        self.crc16 = CRC_INIT;
    }

    /// The running CRC-16/CCITT over the bits consumed since the last
    /// [`start_crc`](BitStream::start_crc).
    pub fn crc16_ccitt(&self) -> u16 {
        self.crc16
    }

    /// The rolling shift register: the 32 most recently consumed raw bits,
    /// newest in bit 0.
    pub fn word(&self) -> u32 {
        self.word
    }

    /// Raw bits consumed since the last index pulse.
    pub fn index_offset_bc(&self) -> usize {
        self.index_offset_bc
    }

    /// Raw-bit length of the last completed revolution; zero until an index
    /// pulse has been crossed.
    pub fn track_len_bc(&self) -> usize {
        self.track_len_bc
    }
}

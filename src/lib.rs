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

//! TrackFox decodes and re-encodes Amiga floppy tracks stored in game- and
//! protection-specific MFM formats.
//!
//! The crate is organised around a set of named *track formats*. Each format
//! implements the [`TrackFormat`] contract: it recognises its own raw bit
//! stream (scanning for sync words, validating checksums or structural
//! properties) and decodes it into a canonical payload held in a
//! [`TrackInfo`] record, and it re-encodes that payload into a bit stream
//! playable on the original drive. Upstream flux capture and downstream
//! image containers are out of scope; they talk to this crate through
//! [`BitStream`] (read side) and [`TrackBuffer`] (write side).
//!
//! When the track type is known, [`decode_track`] runs that format directly.
//! When it is not, [`detect_track`] tries every registered format in a fixed
//! order and the first match wins.

mod bitstream;
mod codec;
mod track;
mod track_buffer;
mod track_format;
mod util;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("no registered track format matched the bit stream")]
    Unrecognized,
}

pub use crate::{
    bitstream::BitStream,
    codec::{amigados_checksum, mfm_decode_bits, mfm_decode_bytes, BitcellEncoding},
    track::{TrackInfo, TrackType},
    track_buffer::{SpeedRun, TrackBuffer, SPEED_AVG},
    track_format::{decode_track, detect_track, encode_track, FormatOps, TrackFormat},
    util::crc16_ccitt,
};

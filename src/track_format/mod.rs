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

//! The four-operation contract every named track format implements, and the
//! fixed-order recognition over the registered formats.
//!
//! A format exposes up to four operations: decode from and encode to an
//! MFM-interpreted stream, and the same pair over raw bitcells. Data-track
//! formats implement the MFM pair; the long-track protections, whose
//! notable property is structural rather than encoded data, implement the
//! raw pair. The implemented subset is advertised through [`FormatOps`] and
//! the dispatch helpers below pick the right side, raw first.
//!
//! All decoders share one scanning policy: search for the sync word one bit
//! at a time, and on a validation failure keep scanning from the current
//! position — spurious sync matches are expected in noisy streams. Only the
//! long-track length gate is fatal, since by then the sync and filler have
//! matched and a short track can never satisfy the protection.

mod dispatch;
mod longtrack;
mod rtype;

use bitflags::bitflags;
use strum::IntoEnumIterator;

use crate::{
    bitstream::BitStream,
    track::{TrackInfo, TrackType},
    track_buffer::TrackBuffer,
    TrackError,
};

bitflags! {
    /// The contract operations a track format implements.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct FormatOps: u8 {
        const DECODE_MFM = 0b0000_0001;
        const ENCODE_MFM = 0b0000_0010;
        const DECODE_RAW = 0b0000_0100;
        const ENCODE_RAW = 0b0000_1000;
    }
}

/// A named track format.
///
/// Decode operations scan the stream for the format's structure and return
/// the canonical payload on success, updating the bit offset, sector
/// validity and track length fields of the [`TrackInfo`] as they go; `None`
/// means the stream was exhausted without a valid match. Encode operations
/// replay the stored payload into a [`TrackBuffer`].
///
/// Absent operations keep their defaults: a default decode recognises
/// nothing and a default encode panics. Go through [`decode_track`] and
/// [`encode_track`], which consult [`TrackFormat::ops`] and never invoke an
/// absent operation.
pub trait TrackFormat: Send + Sync {
    /// The operations this format implements.
    fn ops(&self) -> FormatOps;

    /// Default payload bytes per sector; zero for formats carrying no real
    /// data.
    fn bytes_per_sector(&self) -> usize {
        0
    }

    /// Default sector count.
    fn nr_sectors(&self) -> usize {
        0
    }

    /// Scan an MFM stream for this format and decode its payload.
    fn decode_mfm(&self, _ti: &mut TrackInfo, _stream: &mut BitStream) -> Option<Vec<u8>> {
        None
    }

    /// Emit the MFM-encoded track from the payload stored in `ti`.
    fn encode_mfm(&self, _ti: &TrackInfo, _tbuf: &mut TrackBuffer) {
        panic!("track format has no MFM encode operation");
    }

    /// As [`TrackFormat::decode_mfm`], over raw bitcells.
    fn decode_raw(&self, _ti: &mut TrackInfo, _stream: &mut BitStream) -> Option<Vec<u8>> {
        None
    }

    /// As [`TrackFormat::encode_mfm`], over raw bitcells.
    fn encode_raw(&self, _ti: &TrackInfo, _tbuf: &mut TrackBuffer) {
        panic!("track format has no raw encode operation");
    }
}

/// Run the decode operation of `ti`'s track type over `stream`, storing the
/// recovered payload in `ti` on success.
pub fn decode_track(ti: &mut TrackInfo, stream: &mut BitStream) -> Result<(), TrackError> {
    let handler = ti.track_type.handler();
    let ops = handler.ops();
    let dat = if ops.contains(FormatOps::DECODE_RAW) {
        handler.decode_raw(ti, stream)
    }
    else if ops.contains(FormatOps::DECODE_MFM) {
        handler.decode_mfm(ti, stream)
    }
    else {
        None
    };
    match dat {
        Some(dat) => {
            log::debug!(
                "decode_track(): {} matched: {} payload bytes at bit offset {}",
                ti.track_type,
                dat.len(),
                ti.data_bitoff
            );
            ti.dat = dat;
            Ok(())
        }
        None => Err(TrackError::Unrecognized),
    }
}

/// Re-encode the payload stored in `ti` into `tbuf` using its track type's
/// encode operation.
pub fn encode_track(ti: &TrackInfo, tbuf: &mut TrackBuffer) {
    let handler = ti.track_type.handler();
    if handler.ops().contains(FormatOps::ENCODE_RAW) {
        handler.encode_raw(ti, tbuf);
    }
    else {
        handler.encode_mfm(ti, tbuf);
    }
}

/// Try every registered format in declaration order, rewinding `stream`
/// between candidates. The first format to decode wins.
pub fn detect_track(stream: &mut BitStream) -> Result<TrackInfo, TrackError> {
    for track_type in TrackType::iter() {
        stream.reset();
        let mut ti = TrackInfo::new(track_type);
        if decode_track(&mut ti, stream).is_ok() {
            log::debug!("detect_track(): recognised as {}", track_type);
            return Ok(ti);
        }
    }
    Err(TrackError::Unrecognized)
}

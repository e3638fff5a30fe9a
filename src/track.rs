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

//! Per-track metadata and the registry of named track types.

use std::fmt::{self, Display, Formatter};

/// Identifies a registered track format.
///
/// Declaration order is the recognition order used by
/// [`detect_track`](crate::detect_track) when the type is inferred from the
/// stream; weaker patterns come last, so the empty long track — which only
/// measures length — cannot shadow a format with real structure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackType {
    RTypeA,
    RTypeB,
    ProtecLongtrack,
    GremlinLongtrack,
    TiertexLongtrack,
    CrystalsOfArboreaLongtrack,
    InfogramesLongtrack,
    BatLongtrack,
    AppLongtrack,
    SevenCitiesLongtrack,
    EmptyLongtrack,
}

impl Display for TrackType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TrackType::RTypeA => write!(f, "R-Type (variant A)"),
            TrackType::RTypeB => write!(f, "R-Type (variant B)"),
            TrackType::ProtecLongtrack => write!(f, "PROTEC long track"),
            TrackType::GremlinLongtrack => write!(f, "Gremlin long track"),
            TrackType::TiertexLongtrack => write!(f, "Tiertex long track"),
            TrackType::CrystalsOfArboreaLongtrack => write!(f, "Crystals of Arborea long track"),
            TrackType::InfogramesLongtrack => write!(f, "Infogrames long track"),
            TrackType::BatLongtrack => write!(f, "B.A.T. long track"),
            TrackType::AppLongtrack => write!(f, "Amiga Power Pack long track"),
            TrackType::SevenCitiesLongtrack => write!(f, "Seven Cities of Gold long track"),
            TrackType::EmptyLongtrack => write!(f, "empty long track"),
        }
    }
}

/// Per-track record: format identity, canonical payload, logical layout and
/// re-encode placement hints.
///
/// A record is set up for a type (or a detection candidate) before decoding,
/// populated by exactly one format's decode operation, and read back by the
/// matching encode operation.
#[derive(Clone, Debug)]
pub struct TrackInfo {
    /// Which format owns this track. Set before decoding; the Tiertex long
    /// track reads it to distinguish itself from the Gremlin decode it
    /// shares.
    pub track_type: TrackType,
    /// Canonical decoded payload, owned by this record.
    pub dat: Vec<u8>,
    /// Logical sector layout, preset from the format's defaults.
    pub nr_sectors: u32,
    pub bytes_per_sector: u32,
    /// Bitmask of the sectors successfully recovered.
    pub valid_sectors: u32,
    /// Raw-bit offset from the index pulse at which the sync mark begins.
    pub data_bitoff: u32,
    /// Raw-bit track length to use on re-encode; several protections demand
    /// a longer-than-standard track. Zero when the container default
    /// applies.
    pub total_bits: u32,
}

impl TrackInfo {
    /// Set up a fresh record for `track_type`, presetting the layout from
    /// the format's defaults.
    pub fn new(track_type: TrackType) -> Self {
        let handler = track_type.handler();
        TrackInfo {
            track_type,
            dat: Vec::new(),
            nr_sectors: handler.nr_sectors() as u32,
            bytes_per_sector: handler.bytes_per_sector() as u32,
            valid_sectors: 0,
            data_bitoff: 0,
            total_bits: 0,
        }
    }

    /// Decoded payload size in bytes.
    pub fn len(&self) -> usize {
        self.dat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dat.is_empty()
    }
}

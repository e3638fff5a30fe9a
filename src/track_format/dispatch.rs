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

use crate::{
    track::TrackType,
    track_format::{
        longtrack::{
            AppLongtrack,
            BatLongtrack,
            CrystalsOfArboreaLongtrack,
            EmptyLongtrack,
            GremlinLongtrack,
            InfogramesLongtrack,
            ProtecLongtrack,
            SevenCitiesLongtrack,
            TiertexLongtrack,
        },
        rtype::{RTypeA, RTypeB},
        TrackFormat,
    },
};

impl TrackType {
    /// Look up the format implementation for this track type. The mapping
    /// is fixed at compile time and read-only.
    pub fn handler(self) -> &'static dyn TrackFormat {
        match self {
            TrackType::RTypeA => &RTypeA,
            TrackType::RTypeB => &RTypeB,
            TrackType::ProtecLongtrack => &ProtecLongtrack,
            TrackType::GremlinLongtrack => &GremlinLongtrack,
            TrackType::TiertexLongtrack => &TiertexLongtrack,
            TrackType::CrystalsOfArboreaLongtrack => &CrystalsOfArboreaLongtrack,
            TrackType::InfogramesLongtrack => &InfogramesLongtrack,
            TrackType::BatLongtrack => &BatLongtrack,
            TrackType::AppLongtrack => &AppLongtrack,
            TrackType::SevenCitiesLongtrack => &SevenCitiesLongtrack,
            TrackType::EmptyLongtrack => &EmptyLongtrack,
        }
    }
}

//! Handlebar position from frame and stem geometry.

use crate::types::PtMm;

use super::{FrameGeometry, StemAssembly, StemGeometry};

/// Absolute (BB-relative) bar clamp position, unrounded.
pub fn handlebar_position(frame: &FrameGeometry, stem: &StemGeometry) -> PtMm {
    let chain = StemAssembly::mounted(frame.head_tube_angle, stem);
    frame.datum() + chain.stem_center + chain.clamp
}

/// Polyline for drawing the front end: frame datum, top of headset and
/// spacers, stem centre, bar clamp. Points are unrounded so the segments
/// join without kinks.
pub fn position_path(frame: &FrameGeometry, stem: &StemGeometry) -> [PtMm; 4] {
    let chain = StemAssembly::mounted(frame.head_tube_angle, stem);
    let datum = frame.datum();
    let stem_center = datum + chain.stem_center;
    [datum, datum + chain.steerer, stem_center, stem_center + chain.clamp]
}

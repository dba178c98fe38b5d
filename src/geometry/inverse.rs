//! Frame reach and stack needed to put the bars at a given point.
//!
//! The handlebar position is affine in (reach, stack), so the inverse is
//! a subtraction of the same stem chain.

use crate::types::{Degrees, Mm, PtMm};

use super::{StemAssembly, StemGeometry};

/// Frame reach and stack, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCoordinates {
    pub reach: Mm,
    pub stack: Mm,
}

/// Frame coordinates that, fitted with `stem`, place the bar clamp at `target`.
pub fn frame_for_handlebar(target: PtMm, head_tube_angle: Degrees, stem: &StemGeometry) -> FrameCoordinates {
    let frame = target - StemAssembly::mounted(head_tube_angle, stem).total();
    FrameCoordinates { reach: frame.x, stack: frame.y }
}

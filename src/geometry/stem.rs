//! Reach and stack contributed by spacers and stem alone.

use std::ops::Sub;

use serde::Serialize;

use crate::types::{Degrees, Mm};

use super::{StemAssembly, StemGeometry};

/// Stem contribution, unrounded. Callers usually feed this into more
/// arithmetic before displaying anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StemOffset {
    pub effective_reach: Mm,
    pub effective_stack: Mm,
}

/// Offset from the top of the headset to the bar clamp. Headset height is
/// left out so stems compare the same on any frame.
pub fn effective_offset(head_tube_angle: Degrees, stem: &StemGeometry) -> StemOffset {
    let total = StemAssembly::stem_only(head_tube_angle, stem).total();
    StemOffset {
        effective_reach: total.dx,
        effective_stack: total.dy,
    }
}

/// Change from one stem to another
impl Sub for StemOffset {
    type Output = StemOffset;
    fn sub(self, rhs: StemOffset) -> StemOffset {
        StemOffset {
            effective_reach: self.effective_reach - rhs.effective_reach,
            effective_stack: self.effective_stack - rhs.effective_stack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_stem_offset() {
        let offset = effective_offset(Degrees(73.0), &StemGeometry::default());
        assert!((offset.effective_reach.raw() - 89.3916).abs() < 1e-3);
        assert!((offset.effective_stack.raw() - 47.7700).abs() < 1e-3);
    }

    #[test]
    fn headset_height_is_ignored() {
        let a = effective_offset(Degrees(73.0), &StemGeometry::default());
        let b = effective_offset(
            Degrees(73.0),
            &StemGeometry { headset_height: Mm(35.0), ..StemGeometry::default() },
        );
        assert_eq!(a, b);
    }

    #[test]
    fn identical_stems_have_no_change() {
        let a = effective_offset(Degrees(72.5), &StemGeometry::default());
        let change = a - a;
        assert_eq!(change.effective_reach, Mm::ZERO);
        assert_eq!(change.effective_stack, Mm::ZERO);
    }

    #[test]
    fn flipping_the_stem_raises_the_bars() {
        let down = effective_offset(Degrees(73.0), &StemGeometry::default());
        let up = effective_offset(
            Degrees(73.0),
            &StemGeometry { stem_angle: Degrees(6.0), ..StemGeometry::default() },
        );
        let change = up - down;
        assert!(change.effective_stack.raw() > 0.0);
    }
}

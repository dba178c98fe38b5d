//! Default fit values (millimetres / degrees) and the policy that applies them.
//!
//! The nominal set is a typical road stem.

use crate::types::{Degrees, Mm};

use super::{SaddleInput, SaddleOffset, StemGeometry, StemInput};

pub const STEM_LENGTH: Mm = Mm(100.0);
pub const STEM_ANGLE: Degrees = Degrees(-6.0);
pub const SPACER_HEIGHT: Mm = Mm(20.0);
pub const STEM_HEIGHT: Mm = Mm(40.0);
pub const HEADSET_HEIGHT: Mm = Mm(10.0);

/// Placeholder for a linear output in the single-value calculators.
pub const PLACEHOLDER_MM: &str = "-- mm";
/// Placeholder for a derived metric.
pub const PLACEHOLDER: &str = "--";

/// How absent stem and saddle fields are filled in before computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// Typical road stem; used by the single-bike calculators.
    Nominal,
    /// Everything absent is zero; used by the multi-bike simulator.
    Zero,
}

impl DefaultPolicy {
    pub fn stem(self) -> StemGeometry {
        match self {
            DefaultPolicy::Nominal => StemGeometry {
                stem_length: STEM_LENGTH,
                stem_angle: STEM_ANGLE,
                stem_height: STEM_HEIGHT,
                spacer_height: SPACER_HEIGHT,
                headset_height: HEADSET_HEIGHT,
            },
            DefaultPolicy::Zero => StemGeometry {
                stem_length: Mm::ZERO,
                stem_angle: Degrees(0.0),
                stem_height: Mm::ZERO,
                spacer_height: Mm::ZERO,
                headset_height: Mm::ZERO,
            },
        }
    }

    /// Fill absent stem fields. Present values, zero included, are kept.
    pub fn resolve_stem(self, input: &StemInput) -> StemGeometry {
        let base = self.stem();
        StemGeometry {
            stem_length: input.stem_length.map_or(base.stem_length, Mm),
            stem_angle: input.stem_angle.map_or(base.stem_angle, Degrees),
            stem_height: input.stem_height.map_or(base.stem_height, Mm),
            spacer_height: input.spacer_height.map_or(base.spacer_height, Mm),
            headset_height: input.headset_height.map_or(base.headset_height, Mm),
        }
    }

    /// Fill absent saddle offsets. There is no nominal saddle, so both
    /// policies default to zero.
    pub fn resolve_saddle(self, input: &SaddleInput) -> SaddleOffset {
        SaddleOffset {
            setback: input.saddle_setback.map_or(Mm::ZERO, Mm),
            height: input.saddle_height.map_or(Mm::ZERO, Mm),
        }
    }
}

//! Bike-fit geometry engine.
//!
//! Coordinates: X is reach (forward), Y is stack (up), origin at the bottom
//! bracket. The frame datum is the top of the head tube at (reach, stack).
//! Every function here is pure; nothing is rounded until an output field is
//! produced by the caller.

pub mod compare;
pub mod defaults;
pub mod handlebar;
pub mod inverse;
pub mod saddle;
pub mod stem;

use glam::DVec2;
use serde::Deserialize;

use crate::errors::InsufficientData;
use crate::lenient;
use crate::types::{Degrees, Mm, Offset, Point, PtMm};

pub use compare::{BikeCandidate, BikeFit, Comparison, FitTarget, PositionDiff, RiderPosition, compare_bikes};
pub use defaults::DefaultPolicy;
pub use handlebar::{handlebar_position, position_path};
pub use inverse::{FrameCoordinates, frame_for_handlebar};
pub use saddle::{SaddleOffset, SeatTubeMetrics, saddle_position, seat_tube_metrics};
pub use stem::{StemOffset, effective_offset};

// ============================================================================
// Inputs (possibly incomplete, as decoded from a request)
// ============================================================================

/// Frame fields as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub reach: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stack: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub head_tube_angle: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub seat_tube_angle: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub seat_tube_length: Option<f64>,
}

impl FrameInput {
    /// Validate the required fields. Optional seat-tube fields pass through.
    pub fn resolve(&self) -> Result<FrameGeometry, InsufficientData> {
        let (seat_tube_angle, seat_tube_length) = self.seat_tube();
        Ok(FrameGeometry {
            reach: require_mm(self.reach, "reach")?,
            stack: require_mm(self.stack, "stack")?,
            head_tube_angle: require_degrees(self.head_tube_angle, "headTubeAngle")?,
            seat_tube_angle,
            seat_tube_length,
        })
    }

    /// Seat-tube angle and length, each only if usable.
    pub fn seat_tube(&self) -> (Option<Degrees>, Option<Mm>) {
        (
            self.seat_tube_angle.and_then(|v| Degrees::try_new(v).ok()),
            self.seat_tube_length.and_then(|v| Mm::try_new(v).ok()),
        )
    }
}

/// Stem fields as supplied by a caller; absent ones are filled by a
/// [`DefaultPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StemInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub stem_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stem_angle: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stem_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spacer_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub headset_height: Option<f64>,
}

/// Saddle offsets relative to the frame datum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaddleInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub saddle_setback: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub saddle_height: Option<f64>,
}

pub(crate) fn require_mm(value: Option<f64>, field: &'static str) -> Result<Mm, InsufficientData> {
    value
        .and_then(|v| Mm::try_new(v).ok())
        .ok_or(InsufficientData { field })
}

pub(crate) fn require_degrees(
    value: Option<f64>,
    field: &'static str,
) -> Result<Degrees, InsufficientData> {
    value
        .and_then(|v| Degrees::try_new(v).ok())
        .ok_or(InsufficientData { field })
}

// ============================================================================
// Resolved geometry
// ============================================================================

/// One frame's fixed dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub reach: Mm,
    pub stack: Mm,
    /// Closer to 90° means a more upright head tube
    pub head_tube_angle: Degrees,
    pub seat_tube_angle: Option<Degrees>,
    pub seat_tube_length: Option<Mm>,
}

impl FrameGeometry {
    pub fn new(reach: Mm, stack: Mm, head_tube_angle: Degrees) -> Self {
        FrameGeometry {
            reach,
            stack,
            head_tube_angle,
            seat_tube_angle: None,
            seat_tube_length: None,
        }
    }

    /// Top of the head tube, BB-relative.
    pub fn datum(&self) -> PtMm {
        Point::new(self.reach, self.stack)
    }
}

/// Fully populated stem and steerer stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemGeometry {
    pub stem_length: Mm,
    /// Negative slopes down
    pub stem_angle: Degrees,
    /// Clamp height of the stem body
    pub stem_height: Mm,
    pub spacer_height: Mm,
    pub headset_height: Mm,
}

impl Default for StemGeometry {
    fn default() -> Self {
        DefaultPolicy::Nominal.stem()
    }
}

// ============================================================================
// Trigonometric primitives
// ============================================================================

/// Unit vector up the head tube (up and rearward for angles below 90°).
pub(crate) fn head_tube_axis(head_tube_angle: Degrees) -> DVec2 {
    (Degrees(180.0) - head_tube_angle).direction()
}

/// Unit vector along the stem, from its centre toward the bar clamp.
pub(crate) fn stem_axis(head_tube_angle: Degrees, stem_angle: Degrees) -> DVec2 {
    (Degrees(90.0) - head_tube_angle + stem_angle).direction()
}

/// The two-segment chain from the frame datum to the bar clamp: along the
/// head tube to the stem centre, then along the stem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemAssembly {
    /// Datum to the top of whatever sits below the stem body
    pub steerer: Offset<Mm>,
    /// Datum to the centre of the stem body
    pub stem_center: Offset<Mm>,
    /// Stem centre to the bar clamp
    pub clamp: Offset<Mm>,
}

impl StemAssembly {
    /// Chain with `below_stem` of headset and spacers under the stem body.
    pub fn new(head_tube_angle: Degrees, stem: &StemGeometry, below_stem: Mm) -> Self {
        let axis = head_tube_axis(head_tube_angle);
        let mid_stack = below_stem + stem.stem_height / 2.0;
        StemAssembly {
            steerer: Offset::along(axis, below_stem),
            stem_center: Offset::along(axis, mid_stack),
            clamp: Offset::along(stem_axis(head_tube_angle, stem.stem_angle), stem.stem_length),
        }
    }

    /// Chain as mounted on a frame: headset, spacers, then the stem.
    pub fn mounted(head_tube_angle: Degrees, stem: &StemGeometry) -> Self {
        Self::new(head_tube_angle, stem, stem.headset_height + stem.spacer_height)
    }

    /// Spacers and stem only; the headset belongs to the frame.
    pub fn stem_only(head_tube_angle: Degrees, stem: &StemGeometry) -> Self {
        Self::new(head_tube_angle, stem, stem.spacer_height)
    }

    /// Datum to bar clamp.
    pub fn total(&self) -> Offset<Mm> {
        self.stem_center + self.clamp
    }
}

//! Saddle position and the seat-tube metrics derived from it.
//!
//! The four metrics are gated independently: a missing seat-tube angle or
//! length only blanks the values that need it.

use crate::types::{Degrees, Mm, Offset, PtMm};

/// Saddle offsets from the frame datum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaddleOffset {
    /// Horizontal
    pub setback: Mm,
    /// Vertical
    pub height: Mm,
}

/// Saddle rail centre: frame datum shifted by the saddle offsets.
pub fn saddle_position(datum: PtMm, offset: &SaddleOffset) -> PtMm {
    datum + Offset::new(offset.setback, offset.height)
}

/// Metrics realised by a saddle position, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatTubeMetrics {
    /// Angle of the BB-to-saddle line from horizontal
    pub effective_sta: Degrees,
    /// Straight-line BB to saddle rail centre
    pub bb_to_src: Mm,
    /// Saddle X against the nominal seat-tube line at saddle height.
    /// Needs a seat-tube angle.
    pub setback_vs_sta: Option<Mm>,
    /// Distance along the nominal seat tube up to saddle height.
    /// Needs a seat-tube angle.
    pub bb_to_rail: Option<Mm>,
    /// `bb_to_rail` minus seat-tube length. Needs both.
    pub exposed_seatpost: Option<Mm>,
}

impl SeatTubeMetrics {
    /// `bb_to_rail`, or the straight BB-to-saddle distance without a
    /// seat-tube angle.
    pub fn bb_to_rail_or_src(&self) -> Mm {
        self.bb_to_rail.unwrap_or(self.bb_to_src)
    }
}

/// Compute every metric the inputs allow.
pub fn seat_tube_metrics(
    saddle: PtMm,
    seat_tube_angle: Option<Degrees>,
    seat_tube_length: Option<Mm>,
) -> SeatTubeMetrics {
    let (x, y) = (saddle.x.raw(), saddle.y.raw());

    let effective_sta = Degrees(90.0 - x.atan2(y).to_degrees());
    let bb_to_src = Mm(x.hypot(y));

    let setback_vs_sta = seat_tube_angle
        .map(|sta| y * (Degrees(90.0) - sta).to_radians().tan() - x)
        .and_then(finite);

    let bb_to_rail = seat_tube_angle
        .map(|sta| y / (Degrees(180.0) - sta).to_radians().sin())
        .and_then(finite);

    let exposed_seatpost = bb_to_rail
        .zip(seat_tube_length)
        .and_then(|(rail, length)| finite((rail - length).raw()));

    SeatTubeMetrics {
        effective_sta,
        bb_to_src,
        setback_vs_sta,
        bb_to_rail,
        exposed_seatpost,
    }
}

fn finite(value: f64) -> Option<Mm> {
    Mm::try_new(value).ok()
}

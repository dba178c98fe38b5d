//! Multi-bike comparison against a rider's target position.
//!
//! Candidates are evaluated in input order and returned in input order;
//! the engine never sorts. Each candidate carries an opaque payload `E`
//! that comes back untouched.

use crate::errors::InsufficientData;
use crate::log::debug;
use crate::types::{Mm, PtMm};

use super::{
    DefaultPolicy, FrameInput, SaddleInput, SeatTubeMetrics, StemInput, handlebar_position,
    position_path, saddle_position, seat_tube_metrics,
};

/// One bike to evaluate: frame, stem and saddle as supplied, plus whatever
/// the caller wants carried through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikeCandidate<E> {
    pub frame: FrameInput,
    pub stem: StemInput,
    pub saddle: SaddleInput,
    pub extra: E,
}

/// Where the rider wants their contact points. Either part may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitTarget {
    /// Target bar position as (reach, stack)
    pub handlebar: Option<PtMm>,
    pub saddle: Option<PtMm>,
}

/// Contact points a candidate produces, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderPosition {
    pub handlebar: PtMm,
    pub saddle: PtMm,
    /// Datum, headset/spacer top, stem centre, bar clamp
    pub path: [PtMm; 4],
}

/// Bar position relative to the target. Positive is further forward or higher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionDiff {
    pub reach_diff: Mm,
    pub stack_diff: Mm,
    /// L1 distance: |reach_diff| + |stack_diff|
    pub total_diff: Mm,
}

impl PositionDiff {
    pub fn between(handlebar: PtMm, target: PtMm) -> Self {
        let reach_diff = handlebar.x - target.x;
        let stack_diff = handlebar.y - target.y;
        PositionDiff {
            reach_diff,
            stack_diff,
            total_diff: reach_diff.abs() + stack_diff.abs(),
        }
    }
}

/// Everything computed for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeFit {
    pub position: Result<RiderPosition, InsufficientData>,
    /// None without a position or without a target
    pub diff: Option<PositionDiff>,
    /// Metrics of the *target* saddle on this frame; None without a target saddle
    pub seat_tube: Option<SeatTubeMetrics>,
}

/// A candidate paired with its fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a, E> {
    pub candidate: &'a BikeCandidate<E>,
    pub fit: BikeFit,
}

impl<E> BikeCandidate<E> {
    /// Evaluate this bike with the simulator's zero defaults.
    pub fn fit(&self, target: &FitTarget) -> BikeFit {
        let position = self.position(DefaultPolicy::Zero);
        if let Err(missing) = &position {
            debug!(field = missing.field, "candidate lacks frame data");
        }

        let diff = match (&position, target.handlebar) {
            (Ok(pos), Some(goal)) => Some(PositionDiff::between(pos.handlebar, goal)),
            _ => None,
        };

        // The question is "what if my current saddle went on this frame",
        // so the target saddle is used, not this bike's own.
        let (seat_tube_angle, seat_tube_length) = self.frame.seat_tube();
        let seat_tube = target
            .saddle
            .map(|saddle| seat_tube_metrics(saddle, seat_tube_angle, seat_tube_length));

        BikeFit { position, diff, seat_tube }
    }

    fn position(&self, policy: DefaultPolicy) -> Result<RiderPosition, InsufficientData> {
        let frame = self.frame.resolve()?;
        let stem = policy.resolve_stem(&self.stem);
        let saddle = policy.resolve_saddle(&self.saddle);
        Ok(RiderPosition {
            handlebar: handlebar_position(&frame, &stem),
            saddle: saddle_position(frame.datum(), &saddle),
            path: position_path(&frame, &stem),
        })
    }
}

/// Evaluate every candidate against `target`, preserving input order.
pub fn compare_bikes<'a, E>(candidates: &'a [BikeCandidate<E>], target: &FitTarget) -> Vec<Comparison<'a, E>> {
    debug!(count = candidates.len(), "comparing bikes");
    candidates
        .iter()
        .map(|candidate| Comparison {
            candidate,
            fit: candidate.fit(target),
        })
        .collect()
}

//! Payloads and results for each calculation kind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CalcError, InsufficientData};
use crate::geometry::defaults::{PLACEHOLDER, PLACEHOLDER_MM};
use crate::geometry::{
    BikeCandidate, BikeFit, DefaultPolicy, FitTarget, FrameInput, SaddleInput, SaddleOffset, StemInput, StemOffset,
    compare_bikes, effective_offset, frame_for_handlebar, handlebar_position, require_degrees, require_mm,
    saddle_position, seat_tube_metrics,
};
use crate::lenient;
use crate::log::{debug, insufficient};
use crate::reading::{PathPoint, Reading};
use crate::types::{Mm, Point, PtMm};

use super::{Calculate, CalculationKind, encode};

fn both(x: Option<f64>, y: Option<f64>) -> Option<PtMm> {
    Some(Point::new(Mm::try_new(x?).ok()?, Mm::try_new(y?).ok()?))
}

// ============================================================================
// xy-position
// ============================================================================

/// Handlebar position for one frame and stem (nominal stem defaults).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct XyPosition {
    #[serde(flatten)]
    pub frame: FrameInput,
    #[serde(flatten)]
    pub stem: StemInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HandlebarResult {
    handlebar_x: Reading,
    handlebar_y: Reading,
}

impl Calculate for XyPosition {
    fn calculate(&self) -> Result<Value, CalcError> {
        let result = match self.frame.resolve() {
            Ok(frame) => {
                let stem = DefaultPolicy::Nominal.resolve_stem(&self.stem);
                let bar = handlebar_position(&frame, &stem);
                HandlebarResult {
                    handlebar_x: Reading::mm(bar.x),
                    handlebar_y: Reading::mm(bar.y),
                }
            }
            Err(missing) => {
                insufficient!(CalculationKind::XyPosition, missing);
                HandlebarResult {
                    handlebar_x: Reading::Unavailable(PLACEHOLDER_MM),
                    handlebar_y: Reading::Unavailable(PLACEHOLDER_MM),
                }
            }
        };
        encode(&result)
    }
}

// ============================================================================
// stack-reach
// ============================================================================

/// Frame reach and stack needed to hit a handlebar target (nominal stem defaults).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackReach {
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_x: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_y: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub head_tube_angle: Option<f64>,
    #[serde(flatten)]
    pub stem: StemInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameResult {
    frame_reach: Reading,
    frame_stack: Reading,
}

impl StackReach {
    fn solve(&self) -> Result<(Mm, Mm), InsufficientData> {
        let target = Point::new(require_mm(self.target_x, "targetX")?, require_mm(self.target_y, "targetY")?);
        let head_tube_angle = require_degrees(self.head_tube_angle, "headTubeAngle")?;
        let stem = DefaultPolicy::Nominal.resolve_stem(&self.stem);
        let frame = frame_for_handlebar(target, head_tube_angle, &stem);
        Ok((frame.reach, frame.stack))
    }
}

impl Calculate for StackReach {
    fn calculate(&self) -> Result<Value, CalcError> {
        let result = match self.solve() {
            Ok((reach, stack)) => FrameResult {
                frame_reach: Reading::mm(reach),
                frame_stack: Reading::mm(stack),
            },
            Err(missing) => {
                insufficient!(CalculationKind::StackReach, missing);
                FrameResult {
                    frame_reach: Reading::Unavailable(PLACEHOLDER_MM),
                    frame_stack: Reading::Unavailable(PLACEHOLDER_MM),
                }
            }
        };
        encode(&result)
    }
}

// ============================================================================
// seatpost
// ============================================================================

/// Seat-tube metrics for a saddle position.
///
/// The saddle is `saddleX`/`saddleY` when given, otherwise the frame datum
/// plus `saddleSetback`/`saddleHeight`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seatpost {
    #[serde(default, deserialize_with = "lenient::number")]
    pub saddle_x: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub saddle_y: Option<f64>,
    #[serde(flatten)]
    pub frame: FrameInput,
    #[serde(flatten)]
    pub saddle: SaddleInput,
}

#[derive(Debug, Serialize)]
struct SeatpostResult {
    #[serde(rename = "saddleX")]
    saddle_x: Reading,
    #[serde(rename = "saddleY")]
    saddle_y: Reading,
    #[serde(rename = "effectiveSTA")]
    effective_sta: Reading,
    #[serde(rename = "setbackVsSTA")]
    setback_vs_sta: Reading,
    #[serde(rename = "bbToSRC")]
    bb_to_src: Reading,
    #[serde(rename = "bbToRail")]
    bb_to_rail: Reading,
    #[serde(rename = "exposedSeatpost")]
    exposed_seatpost: Reading,
}

impl Seatpost {
    fn saddle(&self) -> Result<PtMm, InsufficientData> {
        if self.saddle_x.is_some() || self.saddle_y.is_some() {
            return Ok(Point::new(
                require_mm(self.saddle_x, "saddleX")?,
                require_mm(self.saddle_y, "saddleY")?,
            ));
        }
        let datum = Point::new(require_mm(self.frame.reach, "reach")?, require_mm(self.frame.stack, "stack")?);
        let offset = SaddleOffset {
            setback: require_mm(self.saddle.saddle_setback, "saddleSetback")?,
            height: require_mm(self.saddle.saddle_height, "saddleHeight")?,
        };
        Ok(saddle_position(datum, &offset))
    }
}

impl Calculate for Seatpost {
    fn calculate(&self) -> Result<Value, CalcError> {
        let result = match self.saddle() {
            Ok(saddle) => {
                let (seat_tube_angle, seat_tube_length) = self.frame.seat_tube();
                let metrics = seat_tube_metrics(saddle, seat_tube_angle, seat_tube_length);
                SeatpostResult {
                    saddle_x: Reading::mm(saddle.x),
                    saddle_y: Reading::mm(saddle.y),
                    effective_sta: Reading::angle(metrics.effective_sta),
                    setback_vs_sta: Reading::mm_or(metrics.setback_vs_sta, PLACEHOLDER),
                    bb_to_src: Reading::mm(metrics.bb_to_src),
                    // Without a seat-tube angle the straight BB-to-saddle line stands in
                    bb_to_rail: Reading::mm(metrics.bb_to_rail_or_src()),
                    exposed_seatpost: Reading::mm_or(metrics.exposed_seatpost, PLACEHOLDER),
                }
            }
            Err(missing) => {
                insufficient!(CalculationKind::Seatpost, missing);
                let blank = || Reading::Unavailable(PLACEHOLDER);
                SeatpostResult {
                    saddle_x: blank(),
                    saddle_y: blank(),
                    effective_sta: blank(),
                    setback_vs_sta: blank(),
                    bb_to_src: blank(),
                    bb_to_rail: blank(),
                    exposed_seatpost: blank(),
                }
            }
        };
        encode(&result)
    }
}

// ============================================================================
// stem
// ============================================================================

/// Effective reach and stack of a stem, optionally against a candidate stem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StemComparison {
    #[serde(default, deserialize_with = "lenient::number")]
    pub head_tube_angle: Option<f64>,
    #[serde(flatten)]
    pub stem: StemInput,
    #[serde(default, deserialize_with = "lenient::object")]
    pub candidate: Option<StemInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StemReadings {
    effective_reach: Reading,
    effective_stack: Reading,
}

impl StemReadings {
    fn from_offset(offset: StemOffset) -> Self {
        StemReadings {
            effective_reach: Reading::raw(offset.effective_reach),
            effective_stack: Reading::raw(offset.effective_stack),
        }
    }

    fn unavailable() -> Self {
        StemReadings {
            effective_reach: Reading::Unavailable(PLACEHOLDER),
            effective_stack: Reading::Unavailable(PLACEHOLDER),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StemResult {
    #[serde(flatten)]
    current: StemReadings,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate: Option<StemReadings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reach_change: Option<Reading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_change: Option<Reading>,
}

impl Calculate for StemComparison {
    fn calculate(&self) -> Result<Value, CalcError> {
        let result = match require_degrees(self.head_tube_angle, "headTubeAngle") {
            Ok(head_tube_angle) => {
                let offset = |input: &StemInput| {
                    effective_offset(head_tube_angle, &DefaultPolicy::Nominal.resolve_stem(input))
                };
                let current = offset(&self.stem);
                let candidate = self.candidate.as_ref().map(offset);
                let change = candidate.map(|c| c - current);
                StemResult {
                    current: StemReadings::from_offset(current),
                    candidate: candidate.map(StemReadings::from_offset),
                    reach_change: change.map(|c| Reading::raw(c.effective_reach)),
                    stack_change: change.map(|c| Reading::raw(c.effective_stack)),
                }
            }
            Err(missing) => {
                insufficient!(CalculationKind::Stem, missing);
                let compared = self.candidate.is_some();
                StemResult {
                    current: StemReadings::unavailable(),
                    candidate: compared.then(StemReadings::unavailable),
                    reach_change: compared.then_some(Reading::Unavailable(PLACEHOLDER)),
                    stack_change: compared.then_some(Reading::Unavailable(PLACEHOLDER)),
                }
            }
        };
        encode(&result)
    }
}

// ============================================================================
// position-simulator
// ============================================================================

/// Several bikes against one rider target. Absent stem and saddle fields
/// on a bike are zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSimulator {
    /// Bike records; entries that are not objects keep their slot
    #[serde(default, deserialize_with = "lenient::list")]
    pub bikes: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_reach: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_stack: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_saddle_x: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_saddle_y: Option<f64>,
}

/// The geometry fields a bike record may carry.
#[derive(Debug, Default, Deserialize)]
struct CandidateFields {
    #[serde(flatten)]
    frame: FrameInput,
    #[serde(flatten)]
    stem: StemInput,
    #[serde(flatten)]
    saddle: SaddleInput,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PathCell {
    Points([PathPoint; 4]),
    Unavailable(&'static str),
}

#[derive(Debug, Serialize)]
struct SimulatedFit {
    #[serde(rename = "handlebarX")]
    handlebar_x: Reading,
    #[serde(rename = "handlebarY")]
    handlebar_y: Reading,
    #[serde(rename = "saddleX")]
    saddle_x: Reading,
    #[serde(rename = "saddleY")]
    saddle_y: Reading,
    #[serde(rename = "reachDiff")]
    reach_diff: Reading,
    #[serde(rename = "stackDiff")]
    stack_diff: Reading,
    #[serde(rename = "totalDiff")]
    total_diff: Reading,
    #[serde(rename = "effectiveSTA")]
    effective_sta: Reading,
    #[serde(rename = "setbackVsSTA")]
    setback_vs_sta: Reading,
    #[serde(rename = "bbToSRC")]
    bb_to_src: Reading,
    #[serde(rename = "bbToRail")]
    bb_to_rail: Reading,
    #[serde(rename = "exposedSeatpost")]
    exposed_seatpost: Reading,
    #[serde(rename = "positionPath")]
    position_path: PathCell,
}

impl SimulatedFit {
    fn unavailable() -> Self {
        let blank = || Reading::Unavailable(PLACEHOLDER);
        SimulatedFit {
            handlebar_x: blank(),
            handlebar_y: blank(),
            saddle_x: blank(),
            saddle_y: blank(),
            reach_diff: blank(),
            stack_diff: blank(),
            total_diff: blank(),
            effective_sta: blank(),
            setback_vs_sta: blank(),
            bb_to_src: blank(),
            bb_to_rail: blank(),
            exposed_seatpost: blank(),
            position_path: PathCell::Unavailable(PLACEHOLDER),
        }
    }
}

impl From<&BikeFit> for SimulatedFit {
    fn from(fit: &BikeFit) -> Self {
        let position = fit.position.as_ref().ok();
        let diff = fit.diff.as_ref();
        let seat = fit.seat_tube.as_ref();
        let mm = |value: Option<Mm>| Reading::mm_or(value, PLACEHOLDER);

        SimulatedFit {
            handlebar_x: mm(position.map(|p| p.handlebar.x)),
            handlebar_y: mm(position.map(|p| p.handlebar.y)),
            saddle_x: mm(position.map(|p| p.saddle.x)),
            saddle_y: mm(position.map(|p| p.saddle.y)),
            reach_diff: mm(diff.map(|d| d.reach_diff)),
            stack_diff: mm(diff.map(|d| d.stack_diff)),
            total_diff: mm(diff.map(|d| d.total_diff)),
            effective_sta: seat.map_or(Reading::Unavailable(PLACEHOLDER), |s| Reading::angle(s.effective_sta)),
            setback_vs_sta: mm(seat.and_then(|s| s.setback_vs_sta)),
            bb_to_src: mm(seat.map(|s| s.bb_to_src)),
            // No fallback to bbToSRC here, unlike the seatpost calculator
            bb_to_rail: mm(seat.and_then(|s| s.bb_to_rail)),
            exposed_seatpost: mm(seat.and_then(|s| s.exposed_seatpost)),
            position_path: position.map_or(PathCell::Unavailable(PLACEHOLDER), |p| {
                PathCell::Points(p.path.map(PathPoint::from))
            }),
        }
    }
}

impl PositionSimulator {
    pub fn target(&self) -> FitTarget {
        FitTarget {
            handlebar: both(self.target_reach, self.target_stack),
            saddle: both(self.target_saddle_x, self.target_saddle_y),
        }
    }

    /// Typed candidates, each carrying its raw record for pass-through.
    /// A non-object entry has no record and no geometry.
    pub fn candidates(&self) -> Vec<BikeCandidate<Option<&Map<String, Value>>>> {
        self.bikes
            .iter()
            .map(|entry| {
                let record = entry.as_object();
                let fields: CandidateFields = record
                    .and_then(|r| serde_json::from_value(Value::Object(r.clone())).ok())
                    .unwrap_or_default();
                BikeCandidate {
                    frame: fields.frame,
                    stem: fields.stem,
                    saddle: fields.saddle,
                    extra: record,
                }
            })
            .collect()
    }
}

impl Calculate for PositionSimulator {
    fn calculate(&self) -> Result<Value, CalcError> {
        let candidates = self.candidates();
        let target = self.target();
        let mut results = Vec::with_capacity(candidates.len());
        for comparison in compare_bikes(&candidates, &target) {
            let record = comparison.candidate.extra;
            let fit = match record {
                Some(_) => SimulatedFit::from(&comparison.fit),
                None => {
                    debug!("bike entry is not an object");
                    SimulatedFit::unavailable()
                }
            };
            // Computed fields win over same-named input fields
            let mut merged = record.cloned().unwrap_or_default();
            if let Value::Object(computed) = encode(&fit)? {
                merged.extend(computed);
            }
            results.push(Value::Object(merged));
        }
        Ok(Value::Array(results))
    }
}

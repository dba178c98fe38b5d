//! Output cells of a calculation result.

use serde::Serialize;

use crate::types::{Degrees, Mm, PtMm};

/// One output value as it goes over the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    /// Whole millimetres
    Mm(i64),
    /// Unrounded value for callers that keep computing with it
    Raw(f64),
    /// Preformatted value
    Text(String),
    /// The value could not be computed
    Unavailable(&'static str),
}

impl Reading {
    pub fn mm(value: Mm) -> Self {
        Reading::Mm(value.rounded())
    }

    pub fn raw(value: Mm) -> Self {
        Reading::Raw(value.raw())
    }

    /// Angle with one decimal place. Halves round up, as in [`round_mm`](crate::types::round_mm).
    pub fn angle(value: Degrees) -> Self {
        let tenths = (value.raw() * 10.0 + 0.5).floor();
        Reading::Text(format!("{:.1}", tenths / 10.0))
    }

    /// Rounded value, or `placeholder` when absent.
    pub fn mm_or(value: Option<Mm>, placeholder: &'static str) -> Self {
        value.map_or(Reading::Unavailable(placeholder), Reading::mm)
    }
}

/// Unrounded point for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl From<PtMm> for PathPoint {
    fn from(p: PtMm) -> Self {
        PathPoint { x: p.x.raw(), y: p.y.raw() }
    }
}

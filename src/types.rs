//! Strongly-typed measurement primitives for bikefit (zero-cost newtypes).
//!
//! Linear measurements are millimetres, angles are degrees. Radians only
//! exist inside the trig helpers in `geometry`.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::DVec2;
use serde::Serialize;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Round a millimetre value for display.
///
/// Halves round toward positive infinity: `-2.5` becomes `-2`.
#[inline]
pub fn round_mm(val: f64) -> i64 {
    (val + 0.5).floor() as i64
}

/// Length in millimetres
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Mm(pub f64);

impl Mm {
    pub const ZERO: Mm = Mm(0.0);

    /// Create a length with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Mm, NumericError> {
        check_finite(val).map(Mm)
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn abs(self) -> Mm {
        Mm(self.0.abs())
    }

    /// Nearest whole millimetre, for output fields.
    #[inline]
    pub fn rounded(self) -> i64 {
        round_mm(self.0)
    }
}

impl Add for Mm {
    type Output = Mm;
    fn add(self, rhs: Mm) -> Mm { Mm(self.0 + rhs.0) }
}
impl Sub for Mm {
    type Output = Mm;
    fn sub(self, rhs: Mm) -> Mm { Mm(self.0 - rhs.0) }
}
impl Mul<f64> for Mm {
    type Output = Mm;
    fn mul(self, rhs: f64) -> Mm { Mm(self.0 * rhs) }
}
impl Div<f64> for Mm {
    type Output = Mm;
    fn div(self, rhs: f64) -> Mm { Mm(self.0 / rhs) }
}
impl Neg for Mm {
    type Output = Mm;
    fn neg(self) -> Mm { Mm(-self.0) }
}

impl fmt::Display for Mm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.0)
    }
}

/// Angle in degrees, measured from horizontal
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Create an angle with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Degrees, NumericError> {
        check_finite(val).map(Degrees)
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Unit direction vector at this angle (counter-clockwise from +X).
    #[inline]
    pub fn direction(self) -> DVec2 {
        DVec2::from_angle(self.to_radians())
    }
}

impl Add for Degrees {
    type Output = Degrees;
    fn add(self, rhs: Degrees) -> Degrees { Degrees(self.0 + rhs.0) }
}
impl Sub for Degrees {
    type Output = Degrees;
    fn sub(self, rhs: Degrees) -> Degrees { Degrees(self.0 - rhs.0) }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Generic 2D point. BB-relative unless documented otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self { Point { x, y } }
}

/// A displacement vector (not an absolute position).
/// Point + Offset = Point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset<T> {
    pub dx: T,
    pub dy: T,
}

impl<T> Offset<T> {
    pub fn new(dx: T, dy: T) -> Self {
        Offset { dx, dy }
    }
}

impl Offset<Mm> {
    /// Offset of `len` along a unit direction.
    pub fn along(dir: DVec2, len: Mm) -> Self {
        Offset { dx: Mm(dir.x * len.0), dy: Mm(dir.y * len.0) }
    }
}

impl Add for Offset<Mm> {
    type Output = Offset<Mm>;
    fn add(self, rhs: Offset<Mm>) -> Offset<Mm> {
        Offset { dx: self.dx + rhs.dx, dy: self.dy + rhs.dy }
    }
}

impl Add<Offset<Mm>> for Point<Mm> {
    type Output = Point<Mm>;
    fn add(self, rhs: Offset<Mm>) -> Point<Mm> {
        Point { x: self.x + rhs.dx, y: self.y + rhs.dy }
    }
}

impl Sub<Offset<Mm>> for Point<Mm> {
    type Output = Point<Mm>;
    fn sub(self, rhs: Offset<Mm>) -> Point<Mm> {
        Point { x: self.x - rhs.dx, y: self.y - rhs.dy }
    }
}

/// Subtract two points to get an offset
impl Sub<Point<Mm>> for Point<Mm> {
    type Output = Offset<Mm>;
    fn sub(self, rhs: Point<Mm>) -> Offset<Mm> {
        Offset { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

/// Convenient alias
pub type PtMm = Point<Mm>;

pub fn pmm(x: f64, y: f64) -> PtMm {
    Point::new(Mm(x), Mm(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_try_new_valid() {
        assert!(Mm::try_new(380.0).is_ok());
        assert!(Mm::try_new(0.0).is_ok());
        assert!(Mm::try_new(-12.5).is_ok());
    }

    #[test]
    fn mm_try_new_rejects_nan() {
        assert_eq!(Mm::try_new(f64::NAN), Err(NumericError::NaN));
    }

    #[test]
    fn mm_try_new_rejects_infinity() {
        assert_eq!(Mm::try_new(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(Degrees::try_new(f64::NEG_INFINITY), Err(NumericError::Infinite));
    }

    #[test]
    fn mm_arithmetic() {
        let a = Mm(30.0);
        let b = Mm(20.0);

        assert_eq!(a + b, Mm(50.0));
        assert_eq!(a - b, Mm(10.0));
        assert_eq!(a * 2.0, Mm(60.0));
        assert_eq!(b / 2.0, Mm(10.0));
        assert_eq!(-a, Mm(-30.0));
        assert_eq!(Mm(-4.0).abs(), Mm(4.0));
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_mm(2.5), 3);
        assert_eq!(round_mm(-2.5), -2);
        assert_eq!(round_mm(463.544), 464);
        assert_eq!(round_mm(-0.4), 0);
        assert_eq!(Mm(626.896).rounded(), 627);
    }

    #[test]
    fn direction_is_unit_length() {
        for deg in [0.0, 17.0, 90.0, 107.0, 180.0, -6.0] {
            let dir = Degrees(deg).direction();
            assert!((dir.length() - 1.0).abs() < 1e-12);
        }
        let up = Degrees(90.0).direction();
        assert!(up.x.abs() < 1e-12);
        assert!((up.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn point_plus_offset_gives_point() {
        let p = pmm(380.0, 560.0);
        let o = Offset::new(Mm(10.0), Mm(-5.0));
        assert_eq!(p + o, pmm(390.0, 555.0));
        assert_eq!((p + o) - o, p);
    }

    #[test]
    fn point_minus_point_gives_offset() {
        let offset = pmm(5.0, 7.0) - pmm(2.0, 3.0);
        assert_eq!(offset.dx, Mm(3.0));
        assert_eq!(offset.dy, Mm(4.0));
    }

    #[test]
    fn offset_along_direction() {
        let o = Offset::along(Degrees(0.0).direction(), Mm(100.0));
        assert_eq!(o.dx, Mm(100.0));
        assert_eq!(o.dy, Mm(0.0));
    }
}

use fixed::types::{I32F32, I64F64};
use serde::{Deserialize, Serialize};

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every quantity in the simulation (material, cargo, weights, rates,
/// coordinates) is a `Fixed64` so runs replay bit-for-bit.
pub type Fixed64 = I32F32;

/// Q64.64, used only for intermediate squared distances.
pub type Wide = I64F64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and reporting.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// `part / whole`, clamped to `[0, 1]`. A zero `whole` yields zero.
#[inline]
pub fn clamped_ratio(part: Fixed64, whole: Fixed64) -> Fixed64 {
    let one = Fixed64::from_num(1);
    part.checked_div(whole)
        .unwrap_or(Fixed64::ZERO)
        .clamp(Fixed64::ZERO, one)
}

/// A point in the world. Opaque to the engine except for reach checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: Fixed64,
    pub y: Fixed64,
}

impl Position {
    pub fn new(x: Fixed64, y: Fixed64) -> Self {
        Self { x, y }
    }

    /// Convenience constructor for setup code and tests.
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new(f64_to_fixed64(x), f64_to_fixed64(y))
    }

    /// Squared Euclidean distance in Q64.64. Saturates for points near
    /// opposite corners of the Q32.32 range.
    pub fn distance_squared(&self, other: &Position) -> Wide {
        let dx = Wide::from_num(self.x) - Wide::from_num(other.x);
        let dy = Wide::from_num(self.y) - Wide::from_num(other.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Whether `other` lies within `reach` of this point (inclusive).
    pub fn within(&self, other: &Position, reach: Fixed64) -> bool {
        if reach < Fixed64::ZERO {
            return false;
        }
        let r = Wide::from_num(reach);
        self.distance_squared(other) <= r * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(v: f64) -> Fixed64 {
        f64_to_fixed64(v)
    }

    #[test]
    fn ratio_of_equal_parts_is_one() {
        assert_eq!(clamped_ratio(fixed(12.0), fixed(12.0)), fixed(1.0));
    }

    #[test]
    fn ratio_is_clamped_above_one() {
        assert_eq!(clamped_ratio(fixed(30.0), fixed(10.0)), fixed(1.0));
    }

    #[test]
    fn ratio_with_zero_whole_is_zero() {
        assert_eq!(clamped_ratio(fixed(5.0), Fixed64::ZERO), Fixed64::ZERO);
    }

    #[test]
    fn ratio_of_half() {
        assert_eq!(clamped_ratio(fixed(5.0), fixed(10.0)), fixed(0.5));
    }

    #[test]
    fn reach_is_inclusive() {
        let a = Position::from_f64(0.0, 0.0);
        let b = Position::from_f64(3.0, 4.0);
        assert!(a.within(&b, fixed(5.0)));
        assert!(!a.within(&b, fixed(4.99)));
    }

    #[test]
    fn reach_is_symmetric() {
        let a = Position::from_f64(-10.0, 2.5);
        let b = Position::from_f64(6.0, -1.0);
        assert_eq!(a.within(&b, fixed(16.5)), b.within(&a, fixed(16.5)));
    }

    #[test]
    fn far_apart_coordinates_do_not_overflow() {
        let a = Position::new(Fixed64::MIN, Fixed64::MIN);
        let b = Position::new(Fixed64::MAX, Fixed64::MAX);
        assert!(!a.within(&b, fixed(1000.0)));
    }

    #[test]
    fn negative_reach_never_matches() {
        let a = Position::from_f64(1.0, 1.0);
        assert!(!a.within(&a, fixed(-1.0)));
    }

    #[test]
    fn zero_reach_matches_same_point() {
        let a = Position::from_f64(1.0, 1.0);
        assert!(a.within(&a, Fixed64::ZERO));
    }
}

//! One-lane backend
//!
//! Running a kernel's lane path through `ScalarVector<f64>` exercises the same code
//! as the wide backends with a group size of 1, so every input takes the lane path
//! and no remainder is left over.

use crate::traits::{SimdMask, SimdVector};

/// A single `f64` posing as a lane group
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(transparent)]
pub struct ScalarVector<T>(pub T);

/// Comparison result for [`ScalarVector`]
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(transparent)]
pub struct ScalarMask(pub bool);

impl SimdVector for ScalarVector<f64> {
    type Scalar = f64;
    type Mask = ScalarMask;

    const LANES: usize = 1;

    #[inline(always)]
    fn splat(value: Self::Scalar) -> Self {
        ScalarVector(value)
    }

    #[inline(always)]
    fn from_slice(slice: &[Self::Scalar]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for scalar load");
        ScalarVector(slice[0])
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [Self::Scalar]) {
        assert!(
            slice.len() >= Self::LANES,
            "Slice too short for scalar store"
        );
        slice[0] = self.0;
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        ScalarVector(self.0 + rhs.0)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        ScalarVector(self.0 - rhs.0)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        ScalarVector(self.0 * rhs.0)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        ScalarVector(self.0 / rhs.0)
    }

    #[inline(always)]
    fn neg(self) -> Self {
        ScalarVector(-self.0)
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 < rhs.0)
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 <= rhs.0)
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 >= rhs.0)
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        if mask.0 {
            true_val
        } else {
            false_val
        }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        ScalarVector(libm::floor(self.0))
    }
}

impl SimdMask for ScalarMask {
    #[inline(always)]
    fn all(self) -> bool {
        self.0
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        ScalarMask(self.0 || rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_select_and_floor() {
        let x = ScalarVector(-2.5f64);
        assert_eq!(x.floor().0, -3.0);

        let mask = x.lt(ScalarVector(0.0));
        assert!(mask.all());
        let picked = ScalarVector::select(mask, ScalarVector(1.0), ScalarVector(2.0));
        assert_eq!(picked.0, 1.0);
    }

    #[test]
    fn test_scalar_comparisons_on_boundary() {
        let x = ScalarVector(1.0f64);
        assert!(x.le(ScalarVector(1.0)).all());
        assert!(x.ge(ScalarVector(1.0)).all());
        assert!(!x.lt(ScalarVector(1.0)).any());
    }
}

//! Portable array backend
//!
//! `LaneVector<N>` holds `N` doubles in a plain array and applies every operation with a
//! fixed-trip-count loop. The loops carry no dependencies between lanes, so the optimizer
//! turns them into whatever vector instructions the target offers.

use crate::traits::{SimdMask, SimdVector};

/// `N` lanes of f64 backed by an array
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(C, align(32))]
pub struct LaneVector<const N: usize>(pub [f64; N]);

/// Per-lane boolean mask for [`LaneVector`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LaneMask<const N: usize>(pub [bool; N]);

impl<const N: usize> LaneVector<N> {
    #[inline(always)]
    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = f(self.0[i]);
        }
        LaneVector(out)
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = f(self.0[i], rhs.0[i]);
        }
        LaneVector(out)
    }

    #[inline(always)]
    fn compare(self, rhs: Self, f: impl Fn(f64, f64) -> bool) -> LaneMask<N> {
        let mut out = [false; N];
        for i in 0..N {
            out[i] = f(self.0[i], rhs.0[i]);
        }
        LaneMask(out)
    }
}

impl<const N: usize> SimdVector for LaneVector<N> {
    type Scalar = f64;
    type Mask = LaneMask<N>;

    const LANES: usize = N;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        LaneVector([value; N])
    }

    #[inline(always)]
    fn from_slice(slice: &[f64]) -> Self {
        let mut out = [0.0; N];
        out.copy_from_slice(&slice[..N]);
        LaneVector(out)
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f64]) {
        slice[..N].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }

    #[inline(always)]
    fn neg(self) -> Self {
        self.map(|a| -a)
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a < b)
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a <= b)
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a >= b)
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = if mask.0[i] {
                true_val.0[i]
            } else {
                false_val.0[i]
            };
        }
        LaneVector(out)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        self.map(libm::floor)
    }
}

impl<const N: usize> SimdMask for LaneMask<N> {
    #[inline(always)]
    fn all(self) -> bool {
        self.0.iter().all(|&lane| lane)
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0.iter().any(|&lane| lane)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        let mut out = [false; N];
        for i in 0..N {
            out[i] = self.0[i] || rhs.0[i];
        }
        LaneMask(out)
    }
}

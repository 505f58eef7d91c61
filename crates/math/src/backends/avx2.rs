//! Four `f64` lanes in one 256-bit register
//!
//! Compiled only when the `avx2` feature is on and the build targets AVX2, so every
//! intrinsic below is statically available; the crate never probes the CPU at run time.
//! Comparisons are ordered and quiet, so a NaN lane compares false exactly as the scalar `<`, `<=` and `>=` do. `floor` matches
//! `libm::floor` for every finite input.

use crate::traits::{SimdMask, SimdVector};

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

/// Four `f64` lanes
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2Vector(__m256d);

/// All-ones or all-zeros per lane, as produced by `_mm256_cmp_pd`
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2Mask(__m256d);

impl SimdVector for Avx2Vector {
    type Scalar = f64;
    type Mask = Avx2Mask;

    const LANES: usize = 4;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        unsafe { Avx2Vector(_mm256_set1_pd(value)) }
    }

    #[inline(always)]
    fn from_slice(slice: &[f64]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for AVX2 load");
        unsafe { Avx2Vector(_mm256_loadu_pd(slice.as_ptr())) }
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f64]) {
        assert!(slice.len() >= Self::LANES, "Slice too short for AVX2 store");
        unsafe { _mm256_storeu_pd(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_add_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_sub_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_mul_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_div_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Avx2Vector(_mm256_xor_pd(self.0, _mm256_set1_pd(-0.0))) }
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_pd::<_CMP_LT_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_pd::<_CMP_LE_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_pd::<_CMP_GE_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        unsafe { Avx2Vector(_mm256_blendv_pd(false_val.0, true_val.0, mask.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { Avx2Vector(_mm256_floor_pd(self.0)) }
    }
}

impl SimdMask for Avx2Mask {
    #[inline(always)]
    fn all(self) -> bool {
        unsafe { _mm256_movemask_pd(self.0) == 0xf }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm256_movemask_pd(self.0) != 0 }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { Avx2Mask(_mm256_or_pd(self.0, rhs.0)) }
    }
}

//! Interpolation kernels
//!
//! Linear blending between adjacent samples, plus the "sublinear" nearest-higher
//! lookup. The lane versions gather table entries one lane at a time and do the
//! arithmetic with vector operations in the same order as the scalar versions.

use crate::table::SampleTable;
use crate::traits::SimdVector;

/// Widest lane count the gather scratch buffers support.
pub const MAX_LANES: usize = 16;

/// How a table coordinate becomes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// `values[i] * (1 - frac) + values[i + 1] * frac`
    #[default]
    Linear,
    /// `values[i + 1]`, no blending
    Sublinear,
}

/// Linear interpolation
///
/// lerp(a, b, t) = a * (1 - t) + b * t
///
/// # Example
///
/// ```rust
/// use varr_math::interpolate::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(lerp(3.0, 7.0, 0.0), 3.0);
/// ```
#[inline(always)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Lane-wise [`lerp`]
///
/// # Example
///
/// ```rust
/// use varr_math::{DefaultSimdVector, SimdVector};
/// use varr_math::interpolate::lerp_lanes;
///
/// let a = DefaultSimdVector::splat(0.0);
/// let b = DefaultSimdVector::splat(10.0);
/// let t = DefaultSimdVector::splat(0.5);
/// let mut out = [0.0; 8];
/// lerp_lanes(a, b, t).to_slice(&mut out);
/// assert_eq!(out[0], 5.0);
/// ```
#[inline(always)]
pub fn lerp_lanes<V: SimdVector<Scalar = f64>>(a: V, b: V, t: V) -> V {
    a.mul(V::splat(1.0).sub(t)).add(b.mul(t))
}

/// Gather the sample pairs for every lane of `floor`.
///
/// Returns `(values[i], values[i + 1])` with `i = table.index(floor[lane])`.
#[inline(always)]
pub fn gather<V: SimdVector<Scalar = f64>>(table: &SampleTable<f64>, floor: V) -> (V, V) {
    debug_assert!(V::LANES <= MAX_LANES);
    let mut floors = [0.0; MAX_LANES];
    let mut lo = [0.0; MAX_LANES];
    let mut hi = [0.0; MAX_LANES];
    floor.to_slice(&mut floors);
    for lane in 0..V::LANES {
        let (a, b) = table.pair(table.index(floors[lane]));
        lo[lane] = a;
        hi[lane] = b;
    }
    (V::from_slice(&lo), V::from_slice(&hi))
}

/// Lane-wise [`SampleTable::interpolate`].
#[inline(always)]
pub fn interpolate_lanes<V: SimdVector<Scalar = f64>>(
    table: &SampleTable<f64>,
    t: V,
    mode: Interpolation,
) -> V {
    let floor = t.floor();
    let (lo, hi) = gather(table, floor);
    match mode {
        Interpolation::Linear => lerp_lanes(lo, hi, t.sub(floor)),
        Interpolation::Sublinear => hi,
    }
}

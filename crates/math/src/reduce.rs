//! Domain reduction
//!
//! Three strategies map an arbitrary input onto a table's sampled interval:
//!
//! - **Multiplicative**: reflect `x < 1` through `1/x`, split off `2^k` with
//!   `k = floor(log2(x))` and look up the mantissa in `[1, 2)`.
//! - **Clamped affine**: inputs outside `[lower, upper]` return cached boundary values.
//! - **Modular**: floored modulo into `[0, 2π)`.
//!
//! The reconstruction factors for the multiplicative strategy live in `static` tables
//! built at compile time and shared by every accelerator.

use core::f64::consts::{LN_2, TAU};

use crate::interpolate::MAX_LANES;
use crate::table::SampleTable;
use crate::traits::SimdVector;

/// Number of exponents `k` covered by the reduction tables (`k` in `[0, 63]`).
pub const EXPONENT_COUNT: usize = 64;

/// `2^-k`
pub static POW2_NEG: [f64; EXPONENT_COUNT] = {
    let mut table = [0.0; EXPONENT_COUNT];
    let mut value = 1.0;
    let mut k = 0;
    while k < EXPONENT_COUNT {
        table[k] = value;
        value *= 0.5;
        k += 1;
    }
    table
};

/// `ln(2^k) = k ln 2`
pub static LN_POW2: [f64; EXPONENT_COUNT] = {
    let mut table = [0.0; EXPONENT_COUNT];
    let mut k = 0;
    while k < EXPONENT_COUNT {
        table[k] = k as f64 * LN_2;
        k += 1;
    }
    table
};

/// `2^(r/4)` for r in 0..4
#[allow(clippy::excessive_precision)]
const FOURTH_ROOTS_OF_TWO: [f64; 4] = [
    1.0,
    1.189_207_115_002_721_066_7,
    core::f64::consts::SQRT_2,
    1.681_792_830_507_429_086_1,
];

/// `2^(r/6)` for r in 0..6
#[allow(clippy::excessive_precision)]
const SIXTH_ROOTS_OF_TWO: [f64; 6] = [
    1.0,
    1.122_462_048_309_372_981_4,
    1.259_921_049_894_873_164_8,
    core::f64::consts::SQRT_2,
    1.587_401_051_968_199_474_8,
    1.781_797_436_280_678_609_5,
];

/// `(2^k)^(3/4)`
pub static THREE_QUARTERS_POW2: [f64; EXPONENT_COUNT] = rational_pow2(3, &FOURTH_ROOTS_OF_TWO);

/// `(2^k)^(1/6)`
pub static SIXTH_ROOT_POW2: [f64; EXPONENT_COUNT] = rational_pow2(1, &SIXTH_ROOTS_OF_TWO);

/// `(2^k)^(n/D)` built from an exact power of two and a tabulated root.
///
/// `k * n = q * D + r`, so `(2^k)^(n/D) = 2^q * 2^(r/D)`; the product is a single
/// correctly rounded multiplication.
const fn rational_pow2<const D: usize>(
    numerator: usize,
    roots: &[f64; D],
) -> [f64; EXPONENT_COUNT] {
    let mut table = [0.0; EXPONENT_COUNT];
    let mut k = 0;
    while k < EXPONENT_COUNT {
        let q = k * numerator / D;
        let r = k * numerator % D;
        let mut scale = 1.0;
        let mut i = 0;
        while i < q {
            scale *= 2.0;
            i += 1;
        }
        table[k] = scale * roots[r];
        k += 1;
    }
    table
}

/// `floor(log2(x))` for `x >= 1`, via the highest set bit of the integer part.
///
/// Integer parts of 0 (inputs below 1, NaN) give 0; inputs of `2^64` and above
/// saturate to 63.
///
/// # Example
///
/// ```rust
/// use varr_math::reduce::floor_log2;
///
/// assert_eq!(floor_log2(1.0), 0);
/// assert_eq!(floor_log2(3.99), 1);
/// assert_eq!(floor_log2(1024.0), 10);
/// ```
#[inline(always)]
pub fn floor_log2(x: f64) -> usize {
    (x as u64).checked_ilog2().unwrap_or(0) as usize
}

/// Reflect inputs below 1 through `1/x`.
///
/// Returns the reflected value and whether a reflection happened.
#[inline(always)]
pub fn reflect(x: f64) -> (f64, bool) {
    if x < 1.0 {
        (1.0 / x, true)
    } else {
        (x, false)
    }
}

/// Lane-wise [`reflect`].
#[inline(always)]
pub fn reflect_lanes<V: SimdVector<Scalar = f64>>(x: V) -> (V, V::Mask) {
    let one = V::splat(1.0);
    let inverted = x.lt(one);
    (V::select(inverted, one.div(x), x), inverted)
}

/// Precomputed constants for the multiplicative reduction.
///
/// `normalize(x, k) = x * (step_size_inverse / 2^k) - domain_start * step_size_inverse`,
/// the table coordinate of `x / 2^k` without any division.
#[derive(Debug, Clone)]
pub struct ExponentSplit {
    step_size_inverse_powers: [f64; EXPONENT_COUNT],
    offset: f64,
}

impl ExponentSplit {
    /// Derive the constants from a table over `[1, 2]`.
    pub fn new(table: &SampleTable<f64>) -> Self {
        let inverse = table.step_size_inverse();
        let mut step_size_inverse_powers = [0.0; EXPONENT_COUNT];
        for (k, power) in step_size_inverse_powers.iter_mut().enumerate() {
            *power = inverse * POW2_NEG[k];
        }
        Self {
            step_size_inverse_powers,
            offset: table.domain_start() * inverse,
        }
    }

    /// `step_size_inverse / 2^k`
    #[inline(always)]
    pub fn inverse_power(&self, k: usize) -> f64 {
        self.step_size_inverse_powers[k]
    }

    /// `domain_start * step_size_inverse`
    #[inline(always)]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Table coordinate of `x / 2^k`.
    #[inline(always)]
    pub fn normalize(&self, x: f64, k: usize) -> f64 {
        x * self.step_size_inverse_powers[k] - self.offset
    }

    pub(crate) fn release(&mut self) {
        self.step_size_inverse_powers = [f64::NAN; EXPONENT_COUNT];
        self.offset = f64::NAN;
    }
}

/// Floored modulo into `[0, 2π)`.
///
/// Unlike `%`, negative phases land in `[0, 2π)` too. A result that rounds up to
/// `2π` folds back to 0.
///
/// # Example
///
/// ```rust
/// use core::f64::consts::{PI, TAU};
/// use varr_math::reduce::wrap_phase;
///
/// assert!((wrap_phase(-PI / 2.0) - 1.5 * PI).abs() < 1e-15);
/// assert_eq!(wrap_phase(TAU), 0.0);
/// assert_eq!(wrap_phase(1.0), 1.0);
/// ```
#[inline(always)]
pub fn wrap_phase(x: f64) -> f64 {
    let r = libm::fmod(x, TAU);
    let wrapped = if r < 0.0 { r + TAU } else { r };
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Apply a scalar function to every lane.
#[inline(always)]
pub fn map_lanes<V: SimdVector<Scalar = f64>>(x: V, f: impl Fn(f64) -> f64) -> V {
    let mut lanes = [0.0; MAX_LANES];
    x.to_slice(&mut lanes);
    for lane in lanes.iter_mut().take(V::LANES) {
        *lane = f(*lane);
    }
    V::from_slice(&lanes)
}

/// Lane-wise [`wrap_phase`].
#[inline(always)]
pub fn wrap_phase_lanes<V: SimdVector<Scalar = f64>>(x: V) -> V {
    map_lanes(x, wrap_phase)
}

/// Boundary short-circuit for the clamped affine reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp {
    /// Lower bound of the table domain
    pub lower: f64,
    /// Upper bound of the table domain
    pub upper: f64,
    /// Cached `f(lower)`
    pub f_lower: f64,
    /// Cached `f(upper)`
    pub f_upper: f64,
}

impl Clamp {
    /// Boundary value for inputs at or past either bound.
    #[inline(always)]
    pub fn boundary(&self, x: f64) -> Option<f64> {
        if x <= self.lower {
            Some(self.f_lower)
        } else if x >= self.upper {
            Some(self.f_upper)
        } else {
            None
        }
    }

    /// Replace lanes at or past either bound with the boundary values.
    #[inline(always)]
    pub fn apply_lanes<V: SimdVector<Scalar = f64>>(&self, x: V, inside: V) -> V {
        let below = x.le(V::splat(self.lower));
        let above = x.ge(V::splat(self.upper));
        V::select(
            below,
            V::splat(self.f_lower),
            V::select(above, V::splat(self.f_upper), inside),
        )
    }

    pub(crate) fn release(&mut self) {
        self.lower = f64::NAN;
        self.upper = f64::NAN;
        self.f_lower = f64::NAN;
        self.f_upper = f64::NAN;
    }
}

//! Power laws `x^p` for `x > 0`
//!
//! The table holds `u^p` for `u` in `[1, 2]`. An input is reflected through `1/x` when
//! below 1, split as `x = 2^k * u`, and reconstructed as `table(u) * (2^k)^p`
//! (inverted again if it was reflected).
//!
//! Preconditions: `x > 0` and `x < 2^64`. Zero, negative, NaN or larger inputs produce
//! meaningless values without faulting.

use alloc::boxed::Box;

use crate::accelerator::Accelerator;
use crate::batch::{process, Kernel};
use crate::burst::{self, Burst, BurstWorkspace};
use crate::error::{LifecycleError, TableError, TableErrorCode};
use crate::functions::multiplicative::{self, Multiplicative};
use crate::interpolate::Interpolation;
use crate::reduce::{ExponentSplit, EXPONENT_COUNT, SIXTH_ROOT_POW2, THREE_QUARTERS_POW2};
use crate::table::{Domain, SampleTable, TableBuilder};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

static RELEASED_SCALES: [f64; EXPONENT_COUNT] = [f64::NAN; EXPONENT_COUNT];

/// `(2^k)^p` reconstruction factors
#[derive(Debug, Clone)]
enum Scales {
    /// Compile-time table shared by every instance of a fixed exponent
    Shared(&'static [f64; EXPONENT_COUNT]),
    /// Built at construction for an arbitrary exponent
    Owned(Box<[f64; EXPONENT_COUNT]>),
}

impl Scales {
    #[inline(always)]
    fn get(&self, k: usize) -> f64 {
        match self {
            Scales::Shared(table) => table[k],
            Scales::Owned(table) => table[k],
        }
    }
}

/// Table-accelerated `x^p`.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, Interpolation, PowerLaw};
///
/// let linear = PowerLaw::sixth_root(1 << 20).unwrap();
/// assert!((linear.evaluate(64.0) - 2.0).abs() < 1e-12);
///
/// let sublinear = PowerLaw::sixth_root(1 << 20)
///     .unwrap()
///     .with_interpolation(Interpolation::Sublinear);
/// assert!((sublinear.evaluate(64.0) - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct PowerLaw {
    exponent: f64,
    table: SampleTable,
    split: ExponentSplit,
    scales: Scales,
    interpolation: Interpolation,
}

impl PowerLaw {
    /// `x^(3/4)`
    pub fn three_quarters(sample_count: usize) -> Result<Self, TableError> {
        Self::build(0.75, sample_count, Scales::Shared(&THREE_QUARTERS_POW2))
    }

    /// `x^(1/6)`
    pub fn sixth_root(sample_count: usize) -> Result<Self, TableError> {
        Self::build(1.0 / 6.0, sample_count, Scales::Shared(&SIXTH_ROOT_POW2))
    }

    /// `x^p` for any `p` whose `(2^63)^p` is a normal double.
    pub fn new(exponent: f64, sample_count: usize) -> Result<Self, TableError> {
        if !exponent.is_finite() {
            return Err(TableError::new(TableErrorCode::ExponentOutOfRange).with_value(exponent));
        }
        let mut scales = Box::new([0.0; EXPONENT_COUNT]);
        for (k, scale) in scales.iter_mut().enumerate() {
            *scale = libm::pow(2.0, k as f64 * exponent);
            if !scale.is_normal() {
                return Err(
                    TableError::new(TableErrorCode::ExponentOutOfRange).with_value(exponent)
                );
            }
        }
        Self::build(exponent, sample_count, Scales::Owned(scales))
    }

    fn build(exponent: f64, sample_count: usize, scales: Scales) -> Result<Self, TableError> {
        let table = TableBuilder::new(sample_count)
            .domain(Domain::octave())
            .build(|u| libm::pow(u, exponent))?;
        let split = ExponentSplit::new(&table);
        log::debug!("power law x^{}: {} samples", exponent, sample_count);
        Ok(Self {
            exponent,
            table,
            split,
            scales,
            interpolation: Interpolation::Linear,
        })
    }

    /// Switch between linear and sublinear lookup.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The exponent `p`.
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Active interpolation mode.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

impl Multiplicative for PowerLaw {
    fn table(&self) -> &SampleTable {
        &self.table
    }

    fn split(&self) -> &ExponentSplit {
        &self.split
    }

    fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    #[inline(always)]
    fn prefix(&self, k: usize) -> f64 {
        self.scales.get(k)
    }

    #[inline(always)]
    fn combine(value: f64, prefix: f64) -> f64 {
        value * prefix
    }

    #[inline(always)]
    fn combine_lanes<V: SimdVector<Scalar = f64>>(value: V, prefix: V) -> V {
        value.mul(prefix)
    }

    #[inline(always)]
    fn reflect_back(y: f64) -> f64 {
        1.0 / y
    }

    #[inline(always)]
    fn reflect_back_lanes<V: SimdVector<Scalar = f64>>(y: V) -> V {
        V::splat(1.0).div(y)
    }
}

impl Kernel for PowerLaw {
    #[inline]
    fn scalar(&self, x: f64) -> f64 {
        multiplicative::evaluate(self, x)
    }

    #[inline]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        multiplicative::evaluate_lanes(self, x)
    }
}

impl Accelerator for PowerLaw {
    type Output = f64;
    const RELEASED: f64 = f64::NAN;

    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        multiplicative::evaluate(self, x)
    }

    fn evaluate_batch(&self, input: &[f64], output: &mut [f64]) {
        process::<DefaultSimdVector, _>(self, input, output);
    }

    fn sample_count(&self) -> usize {
        self.table.sample_count()
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        self.table.release()?;
        self.split.release();
        self.scales = Scales::Shared(&RELEASED_SCALES);
        self.exponent = f64::NAN;
        Ok(())
    }
}

impl Burst for PowerLaw {
    fn evaluate_burst(&self, input: &[f64], output: &mut [f64], workspace: &mut BurstWorkspace) {
        burst::run(self, input, output, workspace);
    }

    fn evaluate_burst_in_place(&self, data: &mut [f64], workspace: &mut BurstWorkspace) {
        burst::run_in_place(self, data, workspace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::lanes::LaneVector;

    fn rel(a: f64, b: f64) -> f64 {
        (a / b - 1.0).abs()
    }

    #[test]
    fn test_exact_at_powers_of_two() {
        let pow = PowerLaw::three_quarters(1000).unwrap();
        assert_eq!(pow.evaluate(1.0), 1.0);
        assert_eq!(pow.evaluate(16.0), 8.0);
        assert_eq!(pow.evaluate(1.0 / 16.0), 0.125);
    }

    #[test]
    fn test_reflection_covers_small_inputs() {
        let pow = PowerLaw::sixth_root(100_000).unwrap();
        for &x in &[1e-18, 3.7e-9, 0.5, 0.999, 1.0, 7.5, 1e18] {
            assert!(rel(pow.evaluate(x), libm::pow(x, 1.0 / 6.0)) < 1e-10, "x = {}", x);
        }
    }

    #[test]
    fn test_arbitrary_exponent() {
        let pow = PowerLaw::new(-1.5, 100_000).unwrap();
        for &x in &[0.01, 2.0, 123.456] {
            assert!(rel(pow.evaluate(x), libm::pow(x, -1.5)) < 1e-9, "x = {}", x);
        }
        assert_eq!(pow.exponent(), -1.5);
    }

    #[test]
    fn test_rejects_unrepresentable_exponents() {
        let err = PowerLaw::new(40.0, 64).unwrap_err();
        assert_eq!(err.code, TableErrorCode::ExponentOutOfRange);
        let err = PowerLaw::new(f64::NAN, 64).unwrap_err();
        assert_eq!(err.code, TableErrorCode::ExponentOutOfRange);
        let err = PowerLaw::three_quarters(1).unwrap_err();
        assert_eq!(err.code, TableErrorCode::SampleCountTooSmall);
    }

    #[test]
    fn test_out_of_precondition_inputs_do_not_fault() {
        let pow = PowerLaw::three_quarters(64).unwrap();
        for &x in &[0.0, -1.0, f64::NAN, f64::INFINITY, 1e300] {
            let _ = pow.evaluate(x);
        }
        let mut out = [0.0; 5];
        pow.evaluate_batch(&[0.0, -1.0, f64::NAN, f64::INFINITY, 1e300], &mut out);
    }

    #[test]
    fn test_lanes_match_scalar() {
        let pow = PowerLaw::sixth_root(4096).unwrap();
        let xs = [0.3, 5.0, 1e-12, 77.0];
        let v = pow.lanes(LaneVector::<4>(xs));
        for (lane, &x) in xs.iter().enumerate() {
            assert_eq!(v.0[lane].to_bits(), pow.scalar(x).to_bits());
        }
    }

    #[test]
    fn test_release_poisons() {
        let mut pow = PowerLaw::new(2.5, 128).unwrap();
        pow.release().unwrap();
        assert!(pow.evaluate(3.0).is_nan());
        assert!(pow.exponent().is_nan());
        assert_eq!(pow.sample_count(), 0);
        assert!(pow.release().is_err());
    }
}

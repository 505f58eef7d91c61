//! Clamped affine reduction: any smooth `f` over a finite interval
//!
//! Inputs inside `(min, max)` are mapped linearly onto the table. Inputs at or past a
//! bound return the cached boundary value.

use crate::accelerator::Accelerator;
use crate::batch::{process, Kernel};
use crate::error::{LifecycleError, TableError, TableErrorCode};
use crate::interpolate::{interpolate_lanes, Interpolation};
use crate::reduce::Clamp;
use crate::table::{Domain, SampleTable, TableBuilder};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Default half-width of the arctangent table domain.
pub const ARCTANGENT_BOUND: f64 = 50.0;

/// Table-accelerated `f(x)` on `[min, max]`, saturating outside.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, Bounded};
///
/// let f = Bounded::new(1 << 16, 0.0, core::f64::consts::TAU, |x| libm::cos(2.2 * x)).unwrap();
/// assert!((f.evaluate(1.0) - libm::cos(2.2)).abs() < 1e-8);
/// assert_eq!(f.evaluate(-3.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Bounded {
    table: SampleTable,
    clamp: Clamp,
    interpolation: Interpolation,
}

impl Bounded {
    /// Sample `delegate` at `sample_count` points spanning `[min, max]`.
    ///
    /// Fails if the interval is empty or not finite, or if `delegate` is not finite at
    /// a sample point or at either bound.
    pub fn new<F>(sample_count: usize, min: f64, max: f64, delegate: F) -> Result<Self, TableError>
    where
        F: Fn(f64) -> f64,
    {
        let table = TableBuilder::new(sample_count)
            .domain(Domain::new(min, max))
            .build(&delegate)?;
        let f_lower = table.values()[0];
        let f_upper = delegate(max);
        if !f_upper.is_finite() {
            return Err(TableError::new(TableErrorCode::NonFiniteSample).with_value(max));
        }
        log::debug!("bounded: {} samples over [{}, {}]", sample_count, min, max);
        Ok(Self {
            table,
            clamp: Clamp {
                lower: min,
                upper: max,
                f_lower,
                f_upper,
            },
            interpolation: Interpolation::Linear,
        })
    }

    /// Switch between linear and sublinear lookup.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The `[min, max]` bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.clamp.lower, self.clamp.upper)
    }
}

impl Kernel for Bounded {
    #[inline]
    fn scalar(&self, x: f64) -> f64 {
        match self.clamp.boundary(x) {
            Some(value) => value,
            None => self
                .table
                .interpolate(self.table.normalize(x), self.interpolation),
        }
    }

    #[inline]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        let t = x
            .sub(V::splat(self.table.domain_start()))
            .mul(V::splat(self.table.step_size_inverse()));
        let inside = interpolate_lanes(&self.table, t, self.interpolation);
        self.clamp.apply_lanes(x, inside)
    }
}

impl Accelerator for Bounded {
    type Output = f64;
    const RELEASED: f64 = f64::NAN;

    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        self.scalar(x)
    }

    fn evaluate_batch(&self, input: &[f64], output: &mut [f64]) {
        process::<DefaultSimdVector, _>(self, input, output);
    }

    fn sample_count(&self) -> usize {
        self.table.sample_count()
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        self.table.release()?;
        self.clamp.release();
        Ok(())
    }
}

/// Table-accelerated `atan(x)`, saturating to `atan(±bound)` outside the table.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, Arctangent};
///
/// let atan = Arctangent::new(1 << 20).unwrap();
/// assert!((atan.evaluate(1.0) - core::f64::consts::FRAC_PI_4).abs() < 1e-9);
/// assert_eq!(atan.evaluate(1e6), atan.evaluate(50.0));
/// ```
#[derive(Debug, Clone)]
pub struct Arctangent(Bounded);

impl Arctangent {
    /// Table over `[-50, 50]`.
    pub fn new(sample_count: usize) -> Result<Self, TableError> {
        Self::with_bound(sample_count, ARCTANGENT_BOUND)
    }

    /// Table over `[-bound, bound]`.
    pub fn with_bound(sample_count: usize, bound: f64) -> Result<Self, TableError> {
        Ok(Self(Bounded::new(sample_count, -bound, bound, libm::atan)?))
    }

    /// Switch between linear and sublinear lookup.
    pub fn with_interpolation(self, interpolation: Interpolation) -> Self {
        Self(self.0.with_interpolation(interpolation))
    }
}

impl Kernel for Arctangent {
    #[inline]
    fn scalar(&self, x: f64) -> f64 {
        self.0.scalar(x)
    }

    #[inline]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        self.0.lanes(x)
    }
}

impl Accelerator for Arctangent {
    type Output = f64;
    const RELEASED: f64 = f64::NAN;

    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        self.0.scalar(x)
    }

    fn evaluate_batch(&self, input: &[f64], output: &mut [f64]) {
        process::<DefaultSimdVector, _>(self, input, output);
    }

    fn sample_count(&self) -> usize {
        self.0.sample_count()
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        self.0.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::lanes::LaneVector;

    #[test]
    fn test_saturates_outside_bounds() {
        let f = Bounded::new(100, -1.0, 3.0, |x| x * x * x).unwrap();
        assert_eq!(f.evaluate(-1.0), -1.0);
        assert_eq!(f.evaluate(-7.5), -1.0);
        assert_eq!(f.evaluate(3.0), 27.0);
        assert_eq!(f.evaluate(f64::INFINITY), 27.0);
        assert_eq!(f.bounds(), (-1.0, 3.0));
    }

    #[test]
    fn test_lanes_saturate_like_scalar() {
        let f = Bounded::new(1000, 0.0, 2.0, libm::sqrt).unwrap();
        let xs = [-1.0, 0.0, 0.7, 1.3, 2.0, 2.5, 1.999, 1e-9];
        let v = f.lanes(LaneVector::<8>(xs));
        for (lane, &x) in xs.iter().enumerate() {
            assert_eq!(v.0[lane].to_bits(), f.scalar(x).to_bits(), "x = {}", x);
        }
    }

    #[test]
    fn test_rejects_non_finite_boundary() {
        let err = Bounded::new(16, 0.0, 1.0, |x| 1.0 / (1.0 - x)).unwrap_err();
        assert_eq!(err.code, TableErrorCode::NonFiniteSample);
        let err = Bounded::new(16, 2.0, 1.0, |x| x).unwrap_err();
        assert_eq!(err.code, TableErrorCode::InvalidDomain);
    }

    #[test]
    fn test_arctangent_is_odd() {
        let atan = Arctangent::new(1 << 16).unwrap();
        for &x in &[0.1, 1.0, 12.0, 49.0, 80.0] {
            assert!((atan.evaluate(-x) + atan.evaluate(x)).abs() < 1e-10, "x = {}", x);
        }
        assert_eq!(atan.evaluate(-1e9), libm::atan(-50.0));
    }

    #[test]
    fn test_release_poisons() {
        let mut atan = Arctangent::with_bound(64, 5.0).unwrap();
        atan.release().unwrap();
        assert!(atan.evaluate(1.0).is_nan());
        assert!(atan.evaluate(100.0).is_nan());
        assert!(atan.release().is_err());
    }
}

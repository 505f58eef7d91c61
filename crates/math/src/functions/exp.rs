//! Exponential `e^x` by integer/fraction split
//!
//! `e^x = e^n * e^f` with `n = floor(x)` read from a table of whole powers and
//! `f` in `[0, 1)` interpolated from a table of `e^f`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::accelerator::Accelerator;
use crate::batch::{process, Kernel};
use crate::error::{LifecycleError, TableError};
use crate::interpolate::{interpolate_lanes, Interpolation, MAX_LANES};
use crate::table::{Domain, SampleTable, TableBuilder};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Smallest whole exponent with a nonzero `e^n`.
pub const EXP_MIN_EXPONENT: i32 = -745;

/// Largest whole exponent with a finite `e^n`.
pub const EXP_MAX_EXPONENT: i32 = 709;

/// Table-accelerated `e^x`.
///
/// Returns `0` below `-745` and `+inf` at or above `710`.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, Exponential};
///
/// let exp = Exponential::new(1 << 16).unwrap();
/// assert_eq!(exp.evaluate(0.0), 1.0);
/// assert!((exp.evaluate(-2.5) / libm::exp(-2.5) - 1.0).abs() < 1e-10);
/// assert_eq!(exp.evaluate(-1000.0), 0.0);
/// assert_eq!(exp.evaluate(710.0), f64::INFINITY);
/// ```
#[derive(Debug, Clone)]
pub struct Exponential {
    fraction: SampleTable,
    /// `e^n` for `n` in `[EXP_MIN_EXPONENT, EXP_MAX_EXPONENT]`
    scales: Box<[f64]>,
    last_scale: usize,
    underflow: f64,
    overflow: f64,
    interpolation: Interpolation,
}

impl Exponential {
    /// Fraction table of `sample_count` samples over `[0, 1]`.
    pub fn new(sample_count: usize) -> Result<Self, TableError> {
        let fraction = TableBuilder::new(sample_count)
            .domain(Domain::unit())
            .build(libm::exp)?;
        let scales: Vec<f64> = (EXP_MIN_EXPONENT..=EXP_MAX_EXPONENT)
            .map(|n| libm::exp(n as f64))
            .collect();
        log::debug!(
            "exponential: {} samples, {} whole powers",
            sample_count,
            scales.len()
        );
        Ok(Self {
            fraction,
            last_scale: scales.len() - 1,
            scales: scales.into_boxed_slice(),
            underflow: EXP_MIN_EXPONENT as f64,
            overflow: (EXP_MAX_EXPONENT + 1) as f64,
            interpolation: Interpolation::Linear,
        })
    }

    /// Switch between linear and sublinear lookup.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[inline(always)]
    fn scale(&self, n: f64) -> f64 {
        self.scales[((n - self.underflow) as usize).min(self.last_scale)]
    }
}

impl Kernel for Exponential {
    #[inline]
    fn scalar(&self, x: f64) -> f64 {
        if x < self.underflow {
            return 0.0;
        }
        if x >= self.overflow {
            return f64::INFINITY;
        }
        let n = libm::floor(x);
        let f = x - n;
        self.fraction
            .interpolate(self.fraction.normalize(f), self.interpolation)
            * self.scale(n)
    }

    #[inline]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        let n = x.floor();
        let f = x.sub(n);

        let mut whole = [0.0; MAX_LANES];
        let mut scales = [0.0; MAX_LANES];
        n.to_slice(&mut whole);
        for lane in 0..V::LANES {
            scales[lane] = self.scale(whole[lane]);
        }

        let t = f
            .sub(V::splat(self.fraction.domain_start()))
            .mul(V::splat(self.fraction.step_size_inverse()));
        let y =
            interpolate_lanes(&self.fraction, t, self.interpolation).mul(V::from_slice(&scales));

        let below = x.lt(V::splat(self.underflow));
        let above = x.ge(V::splat(self.overflow));
        V::select(
            below,
            V::splat(0.0),
            V::select(above, V::splat(f64::INFINITY), y),
        )
    }
}

impl Accelerator for Exponential {
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
        self.fraction.sample_count()
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        self.fraction.release()?;
        self.scales = Box::new([f64::NAN]);
        self.last_scale = 0;
        self.underflow = f64::NAN;
        self.overflow = f64::NAN;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::lanes::LaneVector;

    #[test]
    fn test_whole_exponents_are_table_values() {
        let exp = Exponential::new(1000).unwrap();
        assert_eq!(exp.evaluate(0.0), 1.0);
        assert_eq!(exp.evaluate(3.0), libm::exp(3.0));
        assert_eq!(exp.evaluate(-7.0), libm::exp(-7.0));
    }

    #[test]
    fn test_saturation() {
        let exp = Exponential::new(64).unwrap();
        assert_eq!(exp.evaluate(-745.5), 0.0);
        assert_eq!(exp.evaluate(f64::NEG_INFINITY), 0.0);
        assert!(exp.evaluate(709.5).is_finite());
        assert_eq!(exp.evaluate(1e10), f64::INFINITY);
    }

    #[test]
    fn test_relative_accuracy() {
        let exp = Exponential::new(1 << 20).unwrap();
        for &x in &[-9.99, -0.5, 0.123, 4.75, 9.5] {
            let rel = (exp.evaluate(x) / libm::exp(x) - 1.0).abs();
            assert!(rel < 1e-12, "x = {}, rel = {:e}", x, rel);
        }
    }

    #[test]
    fn test_lanes_match_scalar() {
        let exp = Exponential::new(333).unwrap();
        let xs = [-800.0, -745.0, -3.3, 0.0, 0.7, 12.25, 709.99, 710.0];
        let v = exp.lanes(LaneVector::<8>(xs));
        for (lane, &x) in xs.iter().enumerate() {
            assert_eq!(v.0[lane].to_bits(), exp.scalar(x).to_bits(), "x = {}", x);
        }
    }

    #[test]
    fn test_release_poisons_saturation() {
        let mut exp = Exponential::new(64).unwrap();
        exp.release().unwrap();
        assert!(exp.evaluate(-1000.0).is_nan());
        assert!(exp.evaluate(1000.0).is_nan());
        assert!(exp.evaluate(1.0).is_nan());
        assert!(exp.release().is_err());
    }
}

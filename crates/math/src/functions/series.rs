//! Table-free logarithm from a truncated odd series
//!
//! `x = m * 2^e` with `m` in `[√½, √2)`, then
//! `ln m = 2 (y + y³/3 + y⁵/5 + ...)` with `y = (m - 1) / (m + 1)`, `|y| < 0.172`.

use alloc::vec::Vec;
use core::f64::consts::{FRAC_1_SQRT_2, LN_2};

use crate::accelerator::Accelerator;
use crate::batch::{process, Kernel};
use crate::error::{LifecycleError, TableError, TableErrorCode};
use crate::interpolate::MAX_LANES;
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Series terms used by [`SeriesLog::default`].
pub const DEFAULT_SERIES_TERMS: usize = 12;

/// `ln(x)` for `x > 0` without a lookup table.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, SeriesLog};
///
/// let ln = SeriesLog::new(12).unwrap();
/// assert!((ln.evaluate(10.0) - core::f64::consts::LN_10).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct SeriesLog {
    /// `2 / (2i + 1)`, lowest order first
    coefficients: Vec<f64>,
    ln2: f64,
}

impl Default for SeriesLog {
    fn default() -> Self {
        Self {
            coefficients: coefficients(DEFAULT_SERIES_TERMS),
            ln2: LN_2,
        }
    }
}

fn coefficients(terms: usize) -> Vec<f64> {
    (0..terms).map(|i| 2.0 / (2 * i + 1) as f64).collect()
}

/// Split `x` into `(m, e)` with `m` in `[√½, √2)`.
#[inline(always)]
fn split(x: f64) -> (f64, f64) {
    let (m, e) = libm::frexp(x);
    if m < FRAC_1_SQRT_2 {
        (m * 2.0, (e - 1) as f64)
    } else {
        (m, e as f64)
    }
}

impl SeriesLog {
    /// Series truncated after `terms` odd powers (at least 1).
    pub fn new(terms: usize) -> Result<Self, TableError> {
        if terms == 0 {
            return Err(TableError::new(TableErrorCode::SampleCountTooSmall).with_value(0.0));
        }
        log::debug!("series log: {} terms", terms);
        Ok(Self {
            coefficients: coefficients(terms),
            ln2: LN_2,
        })
    }

    /// Number of series terms.
    pub fn terms(&self) -> usize {
        self.coefficients.len()
    }
}

impl Kernel for SeriesLog {
    #[inline]
    fn scalar(&self, x: f64) -> f64 {
        let (m, e) = split(x);
        let y = (m - 1.0) / (m + 1.0);
        let y2 = y * y;
        let mut sum = 0.0;
        for &c in self.coefficients.iter().rev() {
            sum = sum * y2 + c;
        }
        y * sum + e * self.ln2
    }

    #[inline]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        let mut values = [0.0; MAX_LANES];
        let mut mantissas = [0.0; MAX_LANES];
        let mut exponents = [0.0; MAX_LANES];
        x.to_slice(&mut values);
        for lane in 0..V::LANES {
            (mantissas[lane], exponents[lane]) = split(values[lane]);
        }

        let one = V::splat(1.0);
        let m = V::from_slice(&mantissas);
        let y = m.sub(one).div(m.add(one));
        let y2 = y.mul(y);
        let mut sum = V::splat(0.0);
        for &c in self.coefficients.iter().rev() {
            sum = sum.mul(y2).add(V::splat(c));
        }
        y.mul(sum)
            .add(V::from_slice(&exponents).mul(V::splat(self.ln2)))
    }
}

impl Accelerator for SeriesLog {
    type Output = f64;
    const RELEASED: f64 = f64::NAN;

    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        self.scalar(x)
    }

    fn evaluate_batch(&self, input: &[f64], output: &mut [f64]) {
        process::<DefaultSimdVector, _>(self, input, output);
    }

    /// Number of series terms; 0 once released.
    fn sample_count(&self) -> usize {
        self.coefficients.len()
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        if self.coefficients.is_empty() {
            return Err(LifecycleError::AlreadyDisposed);
        }
        self.coefficients = Vec::new();
        self.ln2 = f64::NAN;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::lanes::LaneVector;

    #[test]
    fn test_matches_libm_across_binades() {
        let ln = SeriesLog::default();
        assert_eq!(ln.terms(), DEFAULT_SERIES_TERMS);
        for &x in &[1e-300, 1e-10, 0.5, 0.75, 1.0, 1.4, 3.0, 1e10, 1e300] {
            let err = (ln.evaluate(x) - libm::log(x)).abs();
            assert!(err <= 1e-15 * libm::log(x).abs().max(1.0), "x = {}, err = {:e}", x, err);
        }
    }

    #[test]
    fn test_fewer_terms_are_less_accurate() {
        let coarse = SeriesLog::new(2).unwrap();
        let fine = SeriesLog::new(12).unwrap();
        let x = 1.4;
        let reference = libm::log(x);
        assert!((coarse.evaluate(x) - reference).abs() > (fine.evaluate(x) - reference).abs());
    }

    #[test]
    fn test_lanes_match_scalar() {
        let ln = SeriesLog::new(7).unwrap();
        let xs = [0.1, 1.0, 2.5, 1e-200];
        let v = ln.lanes(LaneVector::<4>(xs));
        for (lane, &x) in xs.iter().enumerate() {
            assert_eq!(v.0[lane].to_bits(), ln.scalar(x).to_bits(), "x = {}", x);
        }
    }

    #[test]
    fn test_zero_terms_rejected() {
        let err = SeriesLog::new(0).unwrap_err();
        assert_eq!(err.code, TableErrorCode::SampleCountTooSmall);
    }

    #[test]
    fn test_release_poisons() {
        let mut ln = SeriesLog::new(4).unwrap();
        ln.release().unwrap();
        // no coefficients leaves y * 0, the exponent term carries the poison
        assert!(ln.evaluate(3.0).is_nan());
        assert!(ln.release().is_err());
    }
}

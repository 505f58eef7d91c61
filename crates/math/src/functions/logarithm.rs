//! Natural logarithm for `x > 0`
//!
//! `ln(x) = ln(2^k) + ln(u)` with `u` in `[1, 2]` read from the table; inputs below 1
//! use `ln(x) = -ln(1/x)`.

use crate::accelerator::Accelerator;
use crate::batch::{process, Kernel};
use crate::burst::{self, Burst, BurstWorkspace};
use crate::error::{LifecycleError, TableError};
use crate::functions::multiplicative::{self, Multiplicative};
use crate::interpolate::Interpolation;
use crate::reduce::{ExponentSplit, LN_POW2};
use crate::table::{Domain, SampleTable, TableBuilder};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Table-accelerated `ln(x)`.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, Logarithm};
///
/// let log = Logarithm::new(1 << 16).unwrap();
/// assert_eq!(log.evaluate(1.0), 0.0);
/// assert!((log.evaluate(1e-6) + 13.815510557964274).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct Logarithm {
    table: SampleTable,
    split: ExponentSplit,
    released: bool,
    interpolation: Interpolation,
}

impl Logarithm {
    /// Table of `sample_count` samples of `ln` over `[1, 2]`.
    pub fn new(sample_count: usize) -> Result<Self, TableError> {
        let table = TableBuilder::new(sample_count)
            .domain(Domain::octave())
            .build(libm::log)?;
        let split = ExponentSplit::new(&table);
        log::debug!("logarithm: {} samples", sample_count);
        Ok(Self {
            table,
            split,
            released: false,
            interpolation: Interpolation::Linear,
        })
    }

    /// Switch between linear and sublinear lookup.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Active interpolation mode.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

impl Multiplicative for Logarithm {
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
        if self.released {
            f64::NAN
        } else {
            LN_POW2[k]
        }
    }

    #[inline(always)]
    fn combine(value: f64, prefix: f64) -> f64 {
        prefix + value
    }

    #[inline(always)]
    fn combine_lanes<V: SimdVector<Scalar = f64>>(value: V, prefix: V) -> V {
        prefix.add(value)
    }

    #[inline(always)]
    fn reflect_back(y: f64) -> f64 {
        -y
    }

    #[inline(always)]
    fn reflect_back_lanes<V: SimdVector<Scalar = f64>>(y: V) -> V {
        y.neg()
    }
}

impl Kernel for Logarithm {
    #[inline]
    fn scalar(&self, x: f64) -> f64 {
        multiplicative::evaluate(self, x)
    }

    #[inline]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        multiplicative::evaluate_lanes(self, x)
    }
}

impl Accelerator for Logarithm {
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
        self.released = true;
        Ok(())
    }
}

impl Burst for Logarithm {
    fn evaluate_burst(&self, input: &[f64], output: &mut [f64], workspace: &mut BurstWorkspace) {
        burst::run(self, input, output, workspace);
    }

    fn evaluate_burst_in_place(&self, data: &mut [f64], workspace: &mut BurstWorkspace) {
        burst::run_in_place(self, data, workspace);
    }
}

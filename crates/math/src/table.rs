//! Sample tables over evenly spaced domains
//!
//! A [`SampleTable`] owns a dense run of generator values plus the affine constants
//! that map an input onto table coordinates. Tables are filled exactly once by
//! [`TableBuilder::build`] and are read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use varr_math::table::{Domain, TableBuilder};
//! use varr_math::Interpolation;
//!
//! // ln over [1, 2], 4096 samples
//! let table = TableBuilder::new(4096)
//!     .domain(Domain::octave())
//!     .build(libm::log)
//!     .unwrap();
//!
//! let t = table.normalize(1.5);
//! let approx: f64 = table.interpolate(t, Interpolation::Linear);
//! assert!((approx - libm::log(1.5)).abs() < 1e-7);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::f64::consts::TAU;
use core::fmt::Debug;

use num_complex::Complex64;

use crate::error::{LifecycleError, TableError, TableErrorCode};
use crate::interpolate::{lerp, Interpolation};

/// Default number of samples stored past the nominal upper bound.
pub const DEFAULT_PADDING: usize = 2;

/// Element type storable in a [`SampleTable`].
pub trait Sample: Copy + Debug + Send + Sync + 'static {
    /// Sentinel written into released tables.
    const RELEASED: Self;

    /// Whether the sample is usable for interpolation.
    fn is_finite_sample(&self) -> bool;

    /// `lo * (1 - frac) + hi * frac`
    fn blend(lo: Self, hi: Self, frac: f64) -> Self;
}

impl Sample for f64 {
    const RELEASED: Self = f64::NAN;

    #[inline(always)]
    fn is_finite_sample(&self) -> bool {
        self.is_finite()
    }

    #[inline(always)]
    fn blend(lo: Self, hi: Self, frac: f64) -> Self {
        lerp(lo, hi, frac)
    }
}

impl Sample for Complex64 {
    const RELEASED: Self = Complex64::new(f64::NAN, f64::NAN);

    #[inline(always)]
    fn is_finite_sample(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    #[inline(always)]
    fn blend(lo: Self, hi: Self, frac: f64) -> Self {
        Complex64::new(lerp(lo.re, hi.re, frac), lerp(lo.im, hi.im, frac))
    }
}

/// Sampling interval of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Lower bound (first sample)
    pub start: f64,
    /// Upper bound
    pub end: f64,
}

impl Domain {
    /// Custom `[start, end]`
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// `[0, 1]`
    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// `[1, 2]`, the mantissa range of the multiplicative reduction
    pub const fn octave() -> Self {
        Self::new(1.0, 2.0)
    }

    /// `[0, 2π]`
    pub const fn period() -> Self {
        Self::new(0.0, TAU)
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// How nominal samples are laid across the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// `sample_count - 1` intervals; the last nominal sample lands on `end`.
    Closed,
    /// `sample_count` intervals; `end` is the first padding sample.
    Periodic,
}

/// Builder for [`SampleTable`].
///
/// # Example
///
/// ```rust
/// use varr_math::table::{Domain, Spacing, TableBuilder};
///
/// let table = TableBuilder::new(8)
///     .domain(Domain::new(0.0, 8.0))
///     .spacing(Spacing::Periodic)
///     .build(|x| x * x)
///     .unwrap();
/// assert_eq!(table.step_size(), 1.0);
/// assert_eq!(table.values()[9], 81.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TableBuilder {
    sample_count: usize,
    domain: Domain,
    spacing: Spacing,
    padding: usize,
}

impl TableBuilder {
    /// Start a table of `sample_count` nominal samples over `[0, 1]`.
    pub fn new(sample_count: usize) -> Self {
        Self {
            sample_count,
            domain: Domain::unit(),
            spacing: Spacing::Closed,
            padding: DEFAULT_PADDING,
        }
    }

    /// Set the sampled interval.
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Set the sample layout.
    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the number of trailing samples past the nominal range (at least 1).
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding.max(1);
        self
    }

    /// Evaluate `generator` at every sample position and freeze the result.
    ///
    /// Padding samples the generator reports as non-finite hold the last nominal
    /// value instead.
    pub fn build<T, F>(self, generator: F) -> Result<SampleTable<T>, TableError>
    where
        T: Sample,
        F: Fn(f64) -> T,
    {
        let n = self.sample_count;
        if n < 2 {
            return Err(TableError::new(TableErrorCode::SampleCountTooSmall).with_value(n as f64));
        }

        let Domain { start, end } = self.domain;
        if !start.is_finite() {
            return Err(TableError::new(TableErrorCode::InvalidDomain).with_value(start));
        }
        if !end.is_finite() || end <= start {
            return Err(TableError::new(TableErrorCode::InvalidDomain).with_value(end));
        }

        let intervals = match self.spacing {
            Spacing::Closed => n - 1,
            Spacing::Periodic => n,
        };
        let step_size = self.domain.width() / intervals as f64;

        let total = n + self.padding;
        let mut values = Vec::with_capacity(total);
        for i in 0..n {
            let value = generator(start + i as f64 * step_size);
            if !value.is_finite_sample() {
                return Err(TableError::new(TableErrorCode::NonFiniteSample).with_index(i));
            }
            values.push(value);
        }
        let edge = values[n - 1];
        for i in n..total {
            let value = generator(start + i as f64 * step_size);
            values.push(if value.is_finite_sample() { value } else { edge });
        }

        log::debug!(
            "built table: {} samples (+{} padding) over [{}, {}], step {:e}, {} bytes",
            n,
            self.padding,
            start,
            end,
            step_size,
            total * core::mem::size_of::<T>()
        );

        Ok(SampleTable {
            values: values.into_boxed_slice(),
            domain_start: start,
            domain_end: end,
            step_size,
            step_size_inverse: 1.0 / step_size,
            sample_count: n,
            last_index: total - 2,
        })
    }
}

/// Immutable table of generator samples and its affine constants.
#[derive(Debug, Clone)]
pub struct SampleTable<T = f64> {
    values: Box<[T]>,
    domain_start: f64,
    domain_end: f64,
    step_size: f64,
    step_size_inverse: f64,
    sample_count: usize,
    last_index: usize,
}

impl<T: Sample> SampleTable<T> {
    /// All stored samples, padding included.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Logical number of samples (padding excluded); 0 once released.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Position of sample 0.
    pub fn domain_start(&self) -> f64 {
        self.domain_start
    }

    /// Nominal upper bound of the sampled interval.
    pub fn domain_end(&self) -> f64 {
        self.domain_end
    }

    /// Distance between consecutive samples.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// `1 / step_size`
    pub fn step_size_inverse(&self) -> f64 {
        self.step_size_inverse
    }

    /// Whether the table has been released.
    pub fn is_released(&self) -> bool {
        self.sample_count == 0
    }

    /// Map a domain position onto table coordinates.
    #[inline(always)]
    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.domain_start) * self.step_size_inverse
    }

    /// Table index for an already floored coordinate.
    ///
    /// Clamped so that `index + 1` is always readable; negative and NaN coordinates
    /// map to 0.
    #[inline(always)]
    pub fn index(&self, floor: f64) -> usize {
        (floor as usize).min(self.last_index)
    }

    /// Samples at `index` and `index + 1`.
    #[inline(always)]
    pub fn pair(&self, index: usize) -> (T, T) {
        (self.values[index], self.values[index + 1])
    }

    /// Interpolate at table coordinate `t`.
    #[inline(always)]
    pub fn interpolate(&self, t: f64, mode: Interpolation) -> T {
        let floor = libm::floor(t);
        let (lo, hi) = self.pair(self.index(floor));
        match mode {
            Interpolation::Linear => T::blend(lo, hi, t - floor),
            Interpolation::Sublinear => hi,
        }
    }

    /// Free the samples and poison every constant.
    ///
    /// The storage is replaced by two sentinel samples so any later read yields the
    /// sentinel instead of faulting.
    pub(crate) fn release(&mut self) -> Result<(), LifecycleError> {
        if self.is_released() {
            return Err(LifecycleError::AlreadyDisposed);
        }
        log::debug!(
            "releasing table: {} samples, {} bytes",
            self.sample_count,
            self.values.len() * core::mem::size_of::<T>()
        );
        self.values = alloc::vec![T::RELEASED; 2].into_boxed_slice();
        self.domain_start = f64::NAN;
        self.domain_end = f64::NAN;
        self.step_size = f64::NAN;
        self.step_size_inverse = f64::NAN;
        self.sample_count = 0;
        self.last_index = 0;
        Ok(())
    }
}

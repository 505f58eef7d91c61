//! Complex phasor `e^{iφ} = cos φ + i sin φ`
//!
//! Two constructions are offered:
//!
//! - [`LinearPhasor`] interpolates a single complex table, blending the real and
//!   imaginary parts independently.
//! - [`SplitPhasor`] owns a sine and a cosine evaluator and combines their outputs.

use num_complex::Complex64;

use crate::accelerator::{Accelerator, Evaluator};
use crate::error::{LifecycleError, TableError};
use crate::functions::trig::{Cosine, Sine};
use crate::interpolate::{lerp_lanes, Interpolation, MAX_LANES};
use crate::reduce::{wrap_phase, wrap_phase_lanes};
use crate::table::{Domain, SampleTable, Spacing, TableBuilder};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Elements per stack buffer in [`SplitPhasor::evaluate_batch`].
const SPLIT_CHUNK: usize = 256;

/// Phasor read from one periodic complex table.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, LinearPhasor};
///
/// let phasor = LinearPhasor::new(1 << 16).unwrap();
/// let z = phasor.evaluate(core::f64::consts::FRAC_PI_2);
/// assert!(z.re.abs() < 1e-9);
/// assert!((z.im - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LinearPhasor {
    table: SampleTable<Complex64>,
    interpolation: Interpolation,
}

impl LinearPhasor {
    /// `sample_count` samples per period.
    pub fn new(sample_count: usize) -> Result<Self, TableError> {
        let table = TableBuilder::new(sample_count)
            .domain(Domain::period())
            .spacing(Spacing::Periodic)
            .build(|phi| Complex64::new(libm::cos(phi), libm::sin(phi)))?;
        log::debug!("linear phasor: {} samples", sample_count);
        Ok(Self {
            table,
            interpolation: Interpolation::Linear,
        })
    }

    /// Switch between linear and sublinear lookup.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Evaluate one lane group, returning the real and imaginary parts.
    #[inline]
    pub fn evaluate_lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> (V, V) {
        let t = wrap_phase_lanes(x)
            .sub(V::splat(self.table.domain_start()))
            .mul(V::splat(self.table.step_size_inverse()));
        let floor = t.floor();

        let mut floors = [0.0; MAX_LANES];
        let mut re = [[0.0; MAX_LANES]; 2];
        let mut im = [[0.0; MAX_LANES]; 2];
        floor.to_slice(&mut floors);
        for lane in 0..V::LANES {
            let (lo, hi) = self.table.pair(self.table.index(floors[lane]));
            re[0][lane] = lo.re;
            re[1][lane] = hi.re;
            im[0][lane] = lo.im;
            im[1][lane] = hi.im;
        }

        let (re_lo, re_hi) = (V::from_slice(&re[0]), V::from_slice(&re[1]));
        let (im_lo, im_hi) = (V::from_slice(&im[0]), V::from_slice(&im[1]));
        match self.interpolation {
            Interpolation::Linear => {
                let frac = t.sub(floor);
                (lerp_lanes(re_lo, re_hi, frac), lerp_lanes(im_lo, im_hi, frac))
            }
            Interpolation::Sublinear => (re_hi, im_hi),
        }
    }

    /// [`Accelerator::evaluate_batch`] with an explicit lane backend.
    pub fn evaluate_batch_with<V: SimdVector<Scalar = f64>>(
        &self,
        input: &[f64],
        output: &mut [Complex64],
    ) {
        assert_eq!(
            input.len(),
            output.len(),
            "Input and output slices must have the same length"
        );

        let lanes = V::LANES;
        let mut re = [0.0; MAX_LANES];
        let mut im = [0.0; MAX_LANES];
        let mut groups = input.chunks_exact(lanes);
        let mut outputs = output.chunks_exact_mut(lanes);
        for (group, out) in (&mut groups).zip(&mut outputs) {
            let (r, i) = self.evaluate_lanes(V::from_slice(group));
            r.to_slice(&mut re);
            i.to_slice(&mut im);
            for (lane, z) in out.iter_mut().enumerate() {
                *z = Complex64::new(re[lane], im[lane]);
            }
        }

        // Remainder
        for (z, &x) in outputs.into_remainder().iter_mut().zip(groups.remainder()) {
            *z = self.evaluate(x);
        }
    }
}

impl Accelerator for LinearPhasor {
    type Output = Complex64;
    const RELEASED: Complex64 = Complex64::new(f64::NAN, f64::NAN);

    #[inline]
    fn evaluate(&self, x: f64) -> Complex64 {
        self.table
            .interpolate(self.table.normalize(wrap_phase(x)), self.interpolation)
    }

    fn evaluate_batch(&self, input: &[f64], output: &mut [Complex64]) {
        self.evaluate_batch_with::<DefaultSimdVector>(input, output);
    }

    fn sample_count(&self) -> usize {
        self.table.sample_count()
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        self.table.release()
    }
}

/// Phasor assembled from a sine and a cosine evaluator.
///
/// # Example
///
/// ```rust
/// use varr_math::{Accelerator, SplitPhasor};
///
/// let mut phasor = SplitPhasor::new(1 << 17).unwrap();
/// let z = phasor.evaluate(core::f64::consts::PI);
/// assert!((z.re + 1.0).abs() < 1e-9);
/// assert_eq!(phasor.release(), Ok(()));
/// ```
#[derive(Debug)]
pub struct SplitPhasor {
    sine: Evaluator<Sine>,
    cosine: Evaluator<Cosine>,
}

impl SplitPhasor {
    /// Sine and cosine tables of `sample_count` samples each.
    pub fn new(sample_count: usize) -> Result<Self, TableError> {
        Ok(Self {
            sine: Evaluator::new(Sine::new(sample_count)?),
            cosine: Evaluator::new(Cosine::new(sample_count)?),
        })
    }

    /// The imaginary-part evaluator.
    pub fn sine(&self) -> &Evaluator<Sine> {
        &self.sine
    }

    /// The real-part evaluator.
    pub fn cosine(&self) -> &Evaluator<Cosine> {
        &self.cosine
    }
}

impl Accelerator for SplitPhasor {
    type Output = Complex64;
    const RELEASED: Complex64 = Complex64::new(f64::NAN, f64::NAN);

    #[inline]
    fn evaluate(&self, x: f64) -> Complex64 {
        Complex64::new(self.cosine.evaluate(x), self.sine.evaluate(x))
    }

    fn evaluate_batch(&self, input: &[f64], output: &mut [Complex64]) {
        assert_eq!(
            input.len(),
            output.len(),
            "Input and output slices must have the same length"
        );

        let mut re = [0.0; SPLIT_CHUNK];
        let mut im = [0.0; SPLIT_CHUNK];
        for (chunk, out) in input.chunks(SPLIT_CHUNK).zip(output.chunks_mut(SPLIT_CHUNK)) {
            let n = chunk.len();
            self.cosine.evaluate_batch(chunk, &mut re[..n]);
            self.sine.evaluate_batch(chunk, &mut im[..n]);
            for ((z, &r), &i) in out.iter_mut().zip(&re[..n]).zip(&im[..n]) {
                *z = Complex64::new(r, i);
            }
        }
    }

    fn sample_count(&self) -> usize {
        self.sine.accelerator().map_or(0, |s| s.sample_count())
    }

    /// Dispose both halves; fails if either was already gone.
    fn release(&mut self) -> Result<(), LifecycleError> {
        let sine = self.sine.dispose();
        let cosine = self.cosine.dispose();
        sine.and(cosine)
    }
}

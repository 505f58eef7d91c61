//! Accelerator lifecycle and the uniform evaluator handle
//!
//! Every function family is an [`Accelerator`]: it owns its table and derived
//! constants and evaluates through `&self`. [`Evaluator`] wraps one accelerator in a
//! handle that can be disposed explicitly (with double-dispose detection) or simply
//! dropped.
//!
//! Evaluation only reads the accelerator, so a shared `&Evaluator` may be used from
//! any number of threads at once. Disposal needs `&mut Evaluator`, which the borrow
//! checker keeps exclusive of every in-flight evaluation.
//!
//! # Example
//!
//! ```rust
//! use varr_math::{Evaluator, LifecycleError, PowerLaw};
//!
//! let mut pow = Evaluator::new(PowerLaw::three_quarters(1 << 16).unwrap());
//! assert!((pow.evaluate(16.0) - 8.0).abs() < 1e-9);
//!
//! assert_eq!(pow.dispose(), Ok(()));
//! assert_eq!(pow.dispose(), Err(LifecycleError::AlreadyDisposed));
//! assert!(pow.evaluate(16.0).is_nan());
//! ```

use alloc::boxed::Box;

use crate::batch::{process, process_in_place, Kernel};
use crate::burst::{Burst, BurstWorkspace};
use crate::error::LifecycleError;
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// A table-backed evaluator for one function family.
pub trait Accelerator: Send + Sync {
    /// Value produced per input.
    type Output: Copy;

    /// Value reported by a disposed evaluator.
    const RELEASED: Self::Output;

    /// Evaluate one input.
    fn evaluate(&self, x: f64) -> Self::Output;

    /// Evaluate `input` elementwise into `output`, lane groups first, remainder last.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` differ in length.
    fn evaluate_batch(&self, input: &[f64], output: &mut [Self::Output]);

    /// Logical table size (0 once released).
    fn sample_count(&self) -> usize;

    /// Free the table and poison every derived constant.
    ///
    /// Fails if the accelerator was already released.
    fn release(&mut self) -> Result<(), LifecycleError>;
}

/// Owning handle around one [`Accelerator`].
///
/// `Evaluator::default()` is the null handle: it evaluates to the sentinel and
/// refuses to dispose.
#[derive(Debug)]
pub struct Evaluator<A> {
    accelerator: Option<Box<A>>,
}

impl<A> Default for Evaluator<A> {
    fn default() -> Self {
        Self { accelerator: None }
    }
}

impl<A: Accelerator> Evaluator<A> {
    /// Take ownership of a freshly built accelerator.
    pub fn new(accelerator: A) -> Self {
        Self {
            accelerator: Some(Box::new(accelerator)),
        }
    }

    /// Borrow the accelerator, if not yet disposed.
    pub fn accelerator(&self) -> Option<&A> {
        self.accelerator.as_deref()
    }

    /// Whether the handle no longer owns an accelerator.
    pub fn is_disposed(&self) -> bool {
        self.accelerator.is_none()
    }

    /// Evaluate one input; [`Accelerator::RELEASED`] after disposal.
    #[inline]
    pub fn evaluate(&self, x: f64) -> A::Output {
        match &self.accelerator {
            Some(accelerator) => accelerator.evaluate(x),
            None => A::RELEASED,
        }
    }

    /// Evaluate a slice; fills `output` with the sentinel after disposal.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` differ in length.
    pub fn evaluate_batch(&self, input: &[f64], output: &mut [A::Output]) {
        match &self.accelerator {
            Some(accelerator) => accelerator.evaluate_batch(input, output),
            None => {
                assert_eq!(
                    input.len(),
                    output.len(),
                    "Input and output slices must have the same length"
                );
                output.fill(A::RELEASED);
            }
        }
    }

    /// Release the accelerator.
    ///
    /// Poisons its constants, frees its table and drops it. Disposing a null or
    /// already disposed handle returns [`LifecycleError::AlreadyDisposed`].
    pub fn dispose(&mut self) -> Result<(), LifecycleError> {
        let mut accelerator = self
            .accelerator
            .take()
            .ok_or(LifecycleError::AlreadyDisposed)?;
        let result = accelerator.release();
        log::debug!("disposed evaluator: {:?}", result);
        result
    }
}

impl<A: Accelerator<Output = f64> + Kernel> Evaluator<A> {
    /// Overwrite `data` with the function values.
    pub fn evaluate_in_place(&self, data: &mut [f64]) {
        self.evaluate_in_place_with::<DefaultSimdVector>(data);
    }

    /// [`Evaluator::evaluate_batch`] with an explicit lane backend.
    pub fn evaluate_batch_with<V: SimdVector<Scalar = f64>>(
        &self,
        input: &[f64],
        output: &mut [f64],
    ) {
        match &self.accelerator {
            Some(accelerator) => process::<V, A>(accelerator, input, output),
            None => self.evaluate_batch(input, output),
        }
    }

    /// [`Evaluator::evaluate_in_place`] with an explicit lane backend.
    pub fn evaluate_in_place_with<V: SimdVector<Scalar = f64>>(&self, data: &mut [f64]) {
        match &self.accelerator {
            Some(accelerator) => process_in_place::<V, A>(accelerator, data),
            None => data.fill(A::RELEASED),
        }
    }
}

impl<A: Accelerator<Output = f64> + Burst> Evaluator<A> {
    /// Chunked multi-stage batch evaluation; same results as [`Evaluator::evaluate_batch`].
    pub fn evaluate_burst(
        &self,
        input: &[f64],
        output: &mut [f64],
        workspace: &mut BurstWorkspace,
    ) {
        match &self.accelerator {
            Some(accelerator) => accelerator.evaluate_burst(input, output, workspace),
            None => self.evaluate_batch(input, output),
        }
    }

    /// In-place [`Evaluator::evaluate_burst`].
    pub fn evaluate_burst_in_place(&self, data: &mut [f64], workspace: &mut BurstWorkspace) {
        match &self.accelerator {
            Some(accelerator) => accelerator.evaluate_burst_in_place(data, workspace),
            None => data.fill(A::RELEASED),
        }
    }
}

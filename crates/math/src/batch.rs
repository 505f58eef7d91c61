//! Lane-group batch driver
//!
//! Splits a slice into groups of `V::LANES`, runs the vector kernel on each group and
//! finishes the `len % LANES` tail with the scalar kernel. A kernel's lane path and
//! scalar path perform identical arithmetic, so the output does not depend on where
//! the group boundaries fall.

use crate::traits::SimdVector;

/// A function family's evaluation pipeline in scalar and lane form.
pub trait Kernel {
    /// Evaluate one input.
    fn scalar(&self, x: f64) -> f64;

    /// Evaluate one lane group; must match [`Kernel::scalar`] bit for bit per lane.
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V;
}

/// Process a slice through `kernel` into `output`
///
/// Handles:
/// - Chunking input slice into lane groups
/// - Calling the lane kernel on each group
/// - Storing results back to output slice
/// - Processing the remainder with the scalar kernel
///
/// # Panics
///
/// Panics if `input` and `output` differ in length.
///
/// # Example
///
/// ```rust
/// use varr_math::batch::process;
/// use varr_math::{LaneVector, PowerLaw};
///
/// let pow = PowerLaw::three_quarters(4096).unwrap();
/// let input = [1.0, 16.0, 81.0, 0.0625, 256.0];
/// let mut output = [0.0; 5];
/// process::<LaneVector<4>, _>(&pow, &input, &mut output);
/// assert!((output[1] - 8.0).abs() < 1e-6);
/// ```
#[inline]
pub fn process<V, K>(kernel: &K, input: &[f64], output: &mut [f64])
where
    V: SimdVector<Scalar = f64>,
    K: Kernel,
{
    assert_eq!(
        input.len(),
        output.len(),
        "Input and output slices must have the same length"
    );

    let lanes = V::LANES;
    let len = input.len();
    let chunks = len / lanes;

    for i in 0..chunks {
        let start = i * lanes;
        let end = start + lanes;
        kernel
            .lanes(V::from_slice(&input[start..end]))
            .to_slice(&mut output[start..end]);
    }

    // Remainder
    let tail = chunks * lanes;
    for (out, &x) in output[tail..].iter_mut().zip(&input[tail..]) {
        *out = kernel.scalar(x);
    }
}

/// Process a slice through `kernel`, overwriting it with the results
///
/// Every lane group is fully loaded before any of its results are stored.
#[inline]
pub fn process_in_place<V, K>(kernel: &K, data: &mut [f64])
where
    V: SimdVector<Scalar = f64>,
    K: Kernel,
{
    let lanes = V::LANES;
    let len = data.len();
    let chunks = len / lanes;

    for i in 0..chunks {
        let group = &mut data[i * lanes..(i + 1) * lanes];
        let x = V::from_slice(group);
        kernel.lanes(x).to_slice(group);
    }

    // Remainder
    for value in &mut data[chunks * lanes..] {
        *value = kernel.scalar(*value);
    }
}

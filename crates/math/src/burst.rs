//! Chunked multi-stage batch evaluation for the multiplicative families
//!
//! Large inputs are cut into chunks of [`CHUNK_GROUPS`] lane groups. Each chunk runs
//! through one pass per stage over scratch buffers sized to a single chunk:
//!
//! 1. reflect (`x < 1` becomes `1/x`)
//! 2. exponent (`k = floor(log2(x))`)
//! 3. prefix lookup (`f(2^k)`)
//! 4. normalize (table coordinate of `x / 2^k`)
//! 5. index and fraction
//! 6. gather, interpolate and combine with the prefix
//! 7. reflect back
//!
//! Each stage is a tight loop over contiguous memory, and the working set stays bounded
//! however long the input is. The per-element arithmetic is exactly that of the scalar
//! evaluator, so results are bit-identical to [`Evaluator::evaluate_batch`](crate::Evaluator::evaluate_batch).
//! Elements past the last full lane group take the scalar path.

use alloc::vec;
use alloc::vec::Vec;

use crate::functions::multiplicative::{self, Multiplicative};
use crate::interpolate::{lerp, Interpolation};
use crate::reduce::{floor_log2, reflect};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Lane groups per chunk.
pub const CHUNK_GROUPS: usize = 8192;

/// Chunked evaluation entry points.
pub trait Burst {
    /// Evaluate `input` into `output` chunk by chunk.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` differ in length.
    fn evaluate_burst(&self, input: &[f64], output: &mut [f64], workspace: &mut BurstWorkspace);

    /// Overwrite `data` with the function values chunk by chunk.
    fn evaluate_burst_in_place(&self, data: &mut [f64], workspace: &mut BurstWorkspace);
}

/// Reusable scratch buffers for one chunk.
///
/// # Example
///
/// ```rust
/// use varr_math::{Burst, BurstWorkspace, Logarithm};
///
/// let log = Logarithm::new(1 << 16).unwrap();
/// let mut workspace = BurstWorkspace::new();
/// let mut data = vec![core::f64::consts::E; 100_003];
/// log.evaluate_burst_in_place(&mut data, &mut workspace);
/// assert!((data[100_002] - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BurstWorkspace {
    lanes: usize,
    reflected: Vec<f64>,
    inverted: Vec<bool>,
    exponents: Vec<usize>,
    prefixes: Vec<f64>,
    indices: Vec<usize>,
    fractions: Vec<f64>,
}

impl Default for BurstWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl BurstWorkspace {
    /// Scratch sized for the default lane backend.
    pub fn new() -> Self {
        Self::with_lanes(DefaultSimdVector::LANES)
    }

    /// Scratch for `lanes`-wide groups (at least 1).
    pub fn with_lanes(lanes: usize) -> Self {
        let lanes = lanes.max(1);
        let len = CHUNK_GROUPS * lanes;
        Self {
            lanes,
            reflected: vec![0.0; len],
            inverted: vec![false; len],
            exponents: vec![0; len],
            prefixes: vec![0.0; len],
            indices: vec![0; len],
            fractions: vec![0.0; len],
        }
    }

    /// Group width.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Elements per chunk.
    pub fn chunk_len(&self) -> usize {
        self.reflected.len()
    }

    /// Stage 1: copy a chunk in, reflecting inputs below 1.
    fn load(&mut self, src: &[f64]) {
        for ((x, reflected), inverted) in src
            .iter()
            .zip(&mut self.reflected)
            .zip(&mut self.inverted)
        {
            (*reflected, *inverted) = reflect(*x);
        }
    }

    /// Stages 2 through 6.
    fn transform<M: Multiplicative>(&mut self, m: &M, n: usize) {
        let table = m.table();
        let split = m.split();

        for (x, k) in self.reflected[..n].iter().zip(&mut self.exponents) {
            *k = floor_log2(*x);
        }

        for (k, prefix) in self.exponents[..n].iter().zip(&mut self.prefixes) {
            *prefix = m.prefix(*k);
        }

        for ((x, k), t) in self.reflected[..n]
            .iter()
            .zip(&self.exponents)
            .zip(&mut self.fractions)
        {
            *t = split.normalize(*x, *k);
        }

        for (t, index) in self.fractions[..n].iter_mut().zip(&mut self.indices) {
            let floor = libm::floor(*t);
            *index = table.index(floor);
            *t -= floor;
        }

        let mode = m.interpolation();
        for (((y, index), frac), prefix) in self.reflected[..n]
            .iter_mut()
            .zip(&self.indices)
            .zip(&self.fractions)
            .zip(&self.prefixes)
        {
            let (lo, hi) = table.pair(*index);
            let value = match mode {
                Interpolation::Linear => lerp(lo, hi, *frac),
                Interpolation::Sublinear => hi,
            };
            *y = M::combine(value, *prefix);
        }
    }

    /// Stage 7: undo the reflection while copying the chunk out.
    fn store<M: Multiplicative>(&self, dst: &mut [f64]) {
        for ((out, y), inverted) in dst.iter_mut().zip(&self.reflected).zip(&self.inverted) {
            *out = if *inverted { M::reflect_back(*y) } else { *y };
        }
    }
}

pub(crate) fn run<M: Multiplicative>(
    m: &M,
    input: &[f64],
    output: &mut [f64],
    workspace: &mut BurstWorkspace,
) {
    assert_eq!(
        input.len(),
        output.len(),
        "Input and output slices must have the same length"
    );

    let grouped = input.len() / workspace.lanes * workspace.lanes;
    let chunk = workspace.chunk_len();
    let mut start = 0;
    while start < grouped {
        let end = (start + chunk).min(grouped);
        workspace.load(&input[start..end]);
        workspace.transform(m, end - start);
        workspace.store::<M>(&mut output[start..end]);
        start = end;
    }
    log::trace!(
        "burst: {} elements in {} chunks, {} remainder",
        input.len(),
        grouped.div_ceil(chunk),
        input.len() - grouped
    );

    // Remainder
    for (out, &x) in output[grouped..].iter_mut().zip(&input[grouped..]) {
        *out = multiplicative::evaluate(m, x);
    }
}

pub(crate) fn run_in_place<M: Multiplicative>(
    m: &M,
    data: &mut [f64],
    workspace: &mut BurstWorkspace,
) {
    let grouped = data.len() / workspace.lanes * workspace.lanes;
    let chunk = workspace.chunk_len();
    let mut start = 0;
    while start < grouped {
        let end = (start + chunk).min(grouped);
        workspace.load(&data[start..end]);
        workspace.transform(m, end - start);
        workspace.store::<M>(&mut data[start..end]);
        start = end;
    }

    // Remainder
    for value in &mut data[grouped..] {
        *value = multiplicative::evaluate(m, *value);
    }
}

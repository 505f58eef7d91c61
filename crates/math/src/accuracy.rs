//! Accuracy measurement against reference evaluations
//!
//! The figure of merit is the worst relative difference over a sequence, with each
//! difference damped near zero by `1 - exp(-α²(r² + a²))`. The damping keeps values
//! that are tiny compared with the typical magnitude of the sequence (the median of
//! `|reference|`, scaled by `alpha_scale`) from dominating the result.
//!
//! # Example
//!
//! ```rust
//! use varr_math::accuracy::{sample_points, worst_weighted_difference, Sampling, DEFAULT_ALPHA_SCALE};
//! use varr_math::{Accelerator, PowerLaw};
//!
//! let pow = PowerLaw::sixth_root(1 << 16).unwrap();
//! let x = sample_points(1e-6, 1e6, 10_000, Sampling::Logarithmic);
//! let reference: Vec<f64> = x.iter().map(|&x| libm::pow(x, 1.0 / 6.0)).collect();
//! let mut approx = vec![0.0; x.len()];
//! pow.evaluate_batch(&x, &mut approx);
//!
//! let worst = worst_weighted_difference(&reference, &approx, DEFAULT_ALPHA_SCALE);
//! assert!(worst < 1e-10);
//! ```

use alloc::vec::Vec;

use num_complex::Complex64;

/// Default `alpha_scale`.
pub const DEFAULT_ALPHA_SCALE: f64 = 1e3;

/// Input spacing for [`sample_points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Evenly spaced
    #[default]
    Linear,
    /// Evenly spaced in `ln x`; both bounds must be positive
    Logarithmic,
}

/// `count` inputs from `lower` to `upper` inclusive.
///
/// # Example
///
/// ```rust
/// use varr_math::accuracy::{sample_points, Sampling};
///
/// assert_eq!(sample_points(0.0, 1.0, 5, Sampling::Linear), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// let decades = sample_points(1.0, 1000.0, 4, Sampling::Logarithmic);
/// assert!((decades[2] - 100.0).abs() < 1e-12);
/// ```
pub fn sample_points(lower: f64, upper: f64, count: usize, sampling: Sampling) -> Vec<f64> {
    if count < 2 {
        return core::iter::repeat_n(lower, count).collect();
    }
    let intervals = (count - 1) as f64;
    match sampling {
        Sampling::Linear => {
            let step = (upper - lower) / intervals;
            (0..count).map(|i| lower + step * i as f64).collect()
        }
        Sampling::Logarithmic => {
            let (log_lower, log_upper) = (libm::log(lower), libm::log(upper));
            let step = (log_upper - log_lower) / intervals;
            (0..count)
                .map(|i| libm::exp(log_lower + step * i as f64))
                .collect()
        }
    }
}

/// `|1 - small / large|`, or 0 when both values are zero.
///
/// `large` is whichever value has the larger magnitude.
///
/// # Example
///
/// ```rust
/// use varr_math::accuracy::relative_difference;
///
/// assert_eq!(relative_difference(0.0, 0.0), 0.0);
/// assert_eq!(relative_difference(2.0, 1.0), 0.5);
/// assert_eq!(relative_difference(1.0, 2.0), 0.5);
/// ```
pub fn relative_difference(reference: f64, approx: f64) -> f64 {
    if reference == 0.0 && approx == 0.0 {
        0.0
    } else if reference.abs() > approx.abs() {
        (1.0 - approx / reference).abs()
    } else {
        (1.0 - reference / approx).abs()
    }
}

/// Complex [`relative_difference`] using moduli.
pub fn relative_difference_complex(reference: Complex64, approx: Complex64) -> f64 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    if reference == zero && approx == zero {
        0.0
    } else if modulus(reference) > modulus(approx) {
        modulus(one - approx / reference)
    } else {
        modulus(one - reference / approx)
    }
}

#[inline]
fn modulus(z: Complex64) -> f64 {
    libm::hypot(z.re, z.im)
}

/// Median of the given magnitudes (mean of the two middle values for even counts).
fn median(mut magnitudes: Vec<f64>) -> f64 {
    if magnitudes.is_empty() {
        return 0.0;
    }
    magnitudes.sort_unstable_by(f64::total_cmp);
    let mid = magnitudes.len() / 2;
    if magnitudes.len() % 2 == 0 {
        0.5 * magnitudes[mid - 1] + 0.5 * magnitudes[mid]
    } else {
        magnitudes[mid]
    }
}

/// `1 - exp(-α²(r² + a²))`, or 1 where that is not a number.
fn weight(alpha_sq: f64, r: f64, a: f64) -> f64 {
    let w = 1.0 - libm::exp(-alpha_sq * r * r - alpha_sq * a * a);
    if w.is_nan() {
        1.0
    } else {
        w
    }
}

/// Worst weighted relative difference between two equally long sequences.
///
/// # Panics
///
/// Panics if the sequences differ in length.
pub fn worst_weighted_difference(reference: &[f64], approx: &[f64], alpha_scale: f64) -> f64 {
    assert_eq!(
        reference.len(),
        approx.len(),
        "Reference and approximation must have the same length"
    );
    let alpha = alpha_scale / median(reference.iter().map(|r| r.abs()).collect());
    let alpha_sq = alpha * alpha;

    reference
        .iter()
        .zip(approx)
        .map(|(&r, &a)| relative_difference(r, a) * weight(alpha_sq, r, a))
        .fold(0.0, f64::max)
}

/// Complex [`worst_weighted_difference`], weighting by moduli.
///
/// # Panics
///
/// Panics if the sequences differ in length.
pub fn worst_weighted_difference_complex(
    reference: &[Complex64],
    approx: &[Complex64],
    alpha_scale: f64,
) -> f64 {
    assert_eq!(
        reference.len(),
        approx.len(),
        "Reference and approximation must have the same length"
    );
    let alpha = alpha_scale / median(reference.iter().map(|&r| modulus(r)).collect());
    let alpha_sq = alpha * alpha;

    reference
        .iter()
        .zip(approx)
        .map(|(&r, &a)| {
            relative_difference_complex(r, a) * weight(alpha_sq, modulus(r), modulus(a))
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_relative_difference_is_symmetric() {
        assert_eq!(relative_difference(3.0, 4.0), relative_difference(4.0, 3.0));
        assert_eq!(relative_difference(-2.0, -2.0), 0.0);
        assert_eq!(relative_difference(0.0, 1e-300), 1.0);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(vec![]), 0.0);
    }

    #[test]
    fn test_weight_damps_values_near_zero() {
        // median 1, alpha 1e3: a difference at 1e-6 is damped by ~1e-6
        let reference = [1.0, 1.0, 1.0, 1e-6];
        let approx = [1.0, 1.0, 1.0, 2e-6];
        let worst = worst_weighted_difference(&reference, &approx, DEFAULT_ALPHA_SCALE);
        assert!(worst < 1e-5, "worst = {}", worst);

        let unweighted = worst_weighted_difference(&reference, &approx, f64::INFINITY);
        assert_eq!(unweighted, 0.5);
    }

    #[test]
    fn test_complex_difference() {
        let z = Complex64::new(0.0, 1.0);
        assert_eq!(relative_difference_complex(z, z), 0.0);
        let worst = worst_weighted_difference_complex(
            &[z, Complex64::new(1.0, 0.0)],
            &[z, Complex64::new(0.5, 0.0)],
            DEFAULT_ALPHA_SCALE,
        );
        assert!((worst - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_sample_points_edges() {
        assert!(sample_points(0.0, 1.0, 0, Sampling::Linear).is_empty());
        assert_eq!(sample_points(3.0, 9.0, 1, Sampling::Logarithmic), vec![3.0]);
        let xs = sample_points(1e-18, 1e18, 37, Sampling::Logarithmic);
        assert!((xs[18] - 1.0).abs() < 1e-12);
        assert!((xs[36] / 1e18 - 1.0).abs() < 1e-12);
    }
}

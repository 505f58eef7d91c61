#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! varr-math: table-lookup approximations of elementary functions
//!
//! Every function family follows the same pattern:
//!
//! 1. sample the function once into a [`table::SampleTable`] over a small domain
//! 2. reduce an arbitrary input into that domain ([`reduce`])
//! 3. interpolate between neighbouring samples ([`interpolate`])
//! 4. reconstruct the result from the lookup and the reduction
//!
//! Families are evaluated one input at a time, over whole slices in lane groups
//! ([`batch`]), or chunk by chunk through a staged pipeline ([`burst`]). An
//! [`Evaluator`] owns one family and handles disposal.
//!
//! # Quick Start
//!
//! ```rust
//! use varr_math::{Evaluator, Logarithm};
//!
//! let log = Evaluator::new(Logarithm::new(1 << 16).unwrap());
//!
//! let input = [0.5, 1.0, 2.0, 10.0, 1e-8];
//! let mut output = [0.0; 5];
//! log.evaluate_batch(&input, &mut output);
//! assert!((output[3] - core::f64::consts::LN_10).abs() < 1e-9);
//! ```

extern crate alloc;

// Core trait definitions
pub mod traits;

// Backend implementations
pub mod backends;

// Table construction
pub mod table;

// Domain reduction
pub mod reduce;

// Interpolation
pub mod interpolate;

// Batch drivers
pub mod batch;
pub mod burst;

// Lifecycle
pub mod accelerator;

// Errors
pub mod error;

// Function families
pub mod functions;

// Accuracy measurement
pub mod accuracy;

// Public re-exports for convenience
pub use traits::{SimdMask, SimdVector};

pub use backends::lanes::{LaneMask, LaneVector};
pub use backends::scalar::{ScalarMask, ScalarVector};

// AVX2 types exist only when the feature is on and the target CPU guarantees AVX2
#[cfg(all(
    feature = "avx2",
    target_feature = "avx2",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub use backends::avx2::{Avx2Mask, Avx2Vector};

pub use accelerator::{Accelerator, Evaluator};
pub use batch::Kernel;
pub use burst::{Burst, BurstWorkspace};
pub use error::{status, LifecycleError, TableError, TableErrorCode};
pub use interpolate::Interpolation;

pub use functions::{
    Arctangent, Bounded, Cosine, Exponential, LinearPhasor, Logarithm, PhasePolicy, PowerLaw,
    SeriesLog, Sine, SplitPhasor,
};

/// Default lane backend
///
/// - `avx2` feature on x86-64 built with `-C target-feature=+avx2`: `Avx2Vector` (4 lanes)
/// - otherwise: `LaneVector<4>` (portable, 4 lanes)
#[cfg(not(all(feature = "avx2", target_feature = "avx2", target_arch = "x86_64")))]
pub type DefaultSimdVector = LaneVector<4>;

/// Default lane backend (AVX2 backend for x86-64)
#[cfg(all(feature = "avx2", target_feature = "avx2", target_arch = "x86_64"))]
pub type DefaultSimdVector = Avx2Vector;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_has_four_lanes() {
        assert_eq!(<DefaultSimdVector as SimdVector>::LANES, 4);
    }

    #[cfg(not(target_feature = "avx2"))]
    #[test]
    fn test_avx2_backend_requires_target_feature() {
        use core::any::TypeId;
        assert_eq!(TypeId::of::<DefaultSimdVector>(), TypeId::of::<LaneVector<4>>());
    }
}

//! Lane backend implementations
//!
//! The scalar and portable array backends are always available. The AVX2 backend needs
//! both the `avx2` cargo feature and an AVX2 target (`-C target-feature=+avx2`); the
//! feature alone leaves the portable backend in place.

// Scalar backend (single lane reference)
pub mod scalar;

// Portable fixed-width array backend
pub mod lanes;

#[cfg(all(
    feature = "avx2",
    target_feature = "avx2",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub mod avx2;

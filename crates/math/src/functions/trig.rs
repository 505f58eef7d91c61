//! Sine and cosine over one closed period
//!
//! The table spans `[0, 2π]` with both ends sampled. How an input outside that
//! interval is handled is chosen by [`PhasePolicy`].

use core::f64::consts::TAU;

use crate::accelerator::Accelerator;
use crate::batch::{process, Kernel};
use crate::error::{LifecycleError, TableError};
use crate::interpolate::{interpolate_lanes, Interpolation};
use crate::reduce::{wrap_phase, wrap_phase_lanes};
use crate::table::{Domain, SampleTable, TableBuilder};
use crate::traits::{SimdMask, SimdVector};
use crate::DefaultSimdVector;

/// Treatment of phases outside `(0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhasePolicy {
    /// Floored modulo into `[0, 2π)`; periodic everywhere.
    #[default]
    Wrap,
    /// Any phase at or past either end of `[0, 2π]` returns the value at phase 0.
    Snap,
}

/// Shared state of [`Sine`] and [`Cosine`]
#[derive(Debug, Clone)]
struct Periodic {
    table: SampleTable,
    /// `f(0)`, returned by [`PhasePolicy::Snap`]
    origin: f64,
    policy: PhasePolicy,
    interpolation: Interpolation,
}

impl Periodic {
    fn new(sample_count: usize, f: fn(f64) -> f64) -> Result<Self, TableError> {
        let table = TableBuilder::new(sample_count)
            .domain(Domain::period())
            .build(f)?;
        Ok(Self {
            origin: table.values()[0],
            table,
            policy: PhasePolicy::Wrap,
            interpolation: Interpolation::Linear,
        })
    }

    #[inline(always)]
    fn scalar(&self, x: f64) -> f64 {
        let x = match self.policy {
            PhasePolicy::Wrap => wrap_phase(x),
            PhasePolicy::Snap => {
                if x <= 0.0 || x >= TAU {
                    return self.origin;
                }
                x
            }
        };
        self.table
            .interpolate(self.table.normalize(x), self.interpolation)
    }

    #[inline(always)]
    fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
        let phase = match self.policy {
            PhasePolicy::Wrap => wrap_phase_lanes(x),
            PhasePolicy::Snap => x,
        };
        let t = phase
            .sub(V::splat(self.table.domain_start()))
            .mul(V::splat(self.table.step_size_inverse()));
        let inside = interpolate_lanes(&self.table, t, self.interpolation);
        match self.policy {
            PhasePolicy::Wrap => inside,
            PhasePolicy::Snap => {
                let outside = x.le(V::splat(0.0)).or(x.ge(V::splat(TAU)));
                V::select(outside, V::splat(self.origin), inside)
            }
        }
    }

    fn release(&mut self) -> Result<(), LifecycleError> {
        self.table.release()?;
        self.origin = f64::NAN;
        Ok(())
    }
}

macro_rules! periodic_family {
    ($(#[$doc:meta])* $name:ident, $f:path, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(Periodic);

        impl $name {
            #[doc = concat!("Table of `sample_count` samples of ", $label, " over `[0, 2π]`.")]
            pub fn new(sample_count: usize) -> Result<Self, TableError> {
                log::debug!("{}: {} samples", $label, sample_count);
                Ok(Self(Periodic::new(sample_count, $f)?))
            }

            /// Choose how out-of-period phases are handled.
            pub fn with_policy(mut self, policy: PhasePolicy) -> Self {
                self.0.policy = policy;
                self
            }

            /// Switch between linear and sublinear lookup.
            pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
                self.0.interpolation = interpolation;
                self
            }

            /// Active phase policy.
            pub fn policy(&self) -> PhasePolicy {
                self.0.policy
            }
        }

        impl Kernel for $name {
            #[inline]
            fn scalar(&self, x: f64) -> f64 {
                self.0.scalar(x)
            }

            #[inline]
            fn lanes<V: SimdVector<Scalar = f64>>(&self, x: V) -> V {
                self.0.lanes(x)
            }
        }

        impl Accelerator for $name {
            type Output = f64;
            const RELEASED: f64 = f64::NAN;

            #[inline]
            fn evaluate(&self, x: f64) -> f64 {
                self.0.scalar(x)
            }

            fn evaluate_batch(&self, input: &[f64], output: &mut [f64]) {
                process::<DefaultSimdVector, _>(self, input, output);
            }

            fn sample_count(&self) -> usize {
                self.0.table.sample_count()
            }

            fn release(&mut self) -> Result<(), LifecycleError> {
                self.0.release()
            }
        }
    };
}

periodic_family!(
    /// Table-accelerated `sin(x)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use varr_math::{Accelerator, PhasePolicy, Sine};
    ///
    /// let sin = Sine::new(1 << 16).unwrap();
    /// assert!((sin.evaluate(-core::f64::consts::FRAC_PI_2) + 1.0).abs() < 1e-9);
    ///
    /// let snapped = Sine::new(1 << 16).unwrap().with_policy(PhasePolicy::Snap);
    /// assert_eq!(snapped.evaluate(-core::f64::consts::FRAC_PI_2), 0.0);
    /// ```
    Sine,
    libm::sin,
    "sin"
);

periodic_family!(
    /// Table-accelerated `cos(x)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use varr_math::{Accelerator, Cosine};
    ///
    /// let cos = Cosine::new(1 << 17).unwrap();
    /// assert!((cos.evaluate(core::f64::consts::PI) + 1.0).abs() < 1e-9);
    /// assert!((cos.evaluate(13.0 * core::f64::consts::PI) + 1.0).abs() < 1e-9);
    /// ```
    Cosine,
    libm::cos,
    "cos"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::lanes::LaneVector;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_wrap_is_periodic() {
        let sin = Sine::new(1 << 14).unwrap();
        for &x in &[0.3, 1.7, 4.0, 6.0] {
            let base = sin.evaluate(x);
            assert!((sin.evaluate(x + 4.0 * TAU) - base).abs() < 1e-9, "x = {}", x);
            assert!((sin.evaluate(x - 3.0 * TAU) - base).abs() < 1e-9, "x = {}", x);
        }
    }

    #[test]
    fn test_snap_returns_origin_value() {
        let cos = Cosine::new(1024).unwrap().with_policy(PhasePolicy::Snap);
        assert_eq!(cos.policy(), PhasePolicy::Snap);
        assert_eq!(cos.evaluate(0.0), 1.0);
        assert_eq!(cos.evaluate(-PI), 1.0);
        assert_eq!(cos.evaluate(TAU), 1.0);
        assert_eq!(cos.evaluate(10.0), 1.0);
        assert!((cos.evaluate(PI) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lanes_match_scalar_under_both_policies() {
        let xs = [-FRAC_PI_2, 0.0, 1.0, PI, TAU, 7.0, -20.0, 6.28];
        for policy in [PhasePolicy::Wrap, PhasePolicy::Snap] {
            let sin = Sine::new(777).unwrap().with_policy(policy);
            let v = sin.lanes(LaneVector::<8>(xs));
            for (lane, &x) in xs.iter().enumerate() {
                assert_eq!(v.0[lane].to_bits(), sin.scalar(x).to_bits(), "{:?} x = {}", policy, x);
            }
        }
    }

    #[test]
    fn test_sample_points_are_exact() {
        let sin = Sine::new(5).unwrap();
        // samples at 0, π/2, π, 3π/2, 2π
        assert_eq!(sin.evaluate(0.0), 0.0);
        assert!((sin.evaluate(FRAC_PI_2) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_release_poisons() {
        let mut cos = Cosine::new(32).unwrap().with_policy(PhasePolicy::Snap);
        cos.release().unwrap();
        assert!(cos.evaluate(-1.0).is_nan());
        assert!(cos.evaluate(1.0).is_nan());
        assert_eq!(cos.sample_count(), 0);
    }
}

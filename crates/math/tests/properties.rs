//! Property-based tests for varr-math
//!
//! Uses proptest to check the evaluation invariants of every family: batch and
//! in-place results equal scalar results bit for bit at every lane width, and the
//! reductions respect the symmetries of the functions they approximate.

use std::sync::OnceLock;

use proptest::prelude::*;
use varr_math::{
    Accelerator, Arctangent, Cosine, Evaluator, Exponential, Kernel, LaneVector, Logarithm,
    PhasePolicy, PowerLaw, ScalarVector, SeriesLog, Sine,
};

use test_utils::*;

use proptest::test_runner::Config as ProptestConfig;

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 10_000,
        ..ProptestConfig::default()
    }
}

fn sixth_root() -> &'static Evaluator<PowerLaw> {
    static EVALUATOR: OnceLock<Evaluator<PowerLaw>> = OnceLock::new();
    EVALUATOR.get_or_init(|| Evaluator::new(PowerLaw::sixth_root(4096).unwrap()))
}

fn three_quarters() -> &'static Evaluator<PowerLaw> {
    static EVALUATOR: OnceLock<Evaluator<PowerLaw>> = OnceLock::new();
    EVALUATOR.get_or_init(|| Evaluator::new(PowerLaw::three_quarters(4096).unwrap()))
}

fn log() -> &'static Evaluator<Logarithm> {
    static EVALUATOR: OnceLock<Evaluator<Logarithm>> = OnceLock::new();
    EVALUATOR.get_or_init(|| Evaluator::new(Logarithm::new(4096).unwrap()))
}

fn atan() -> &'static Evaluator<Arctangent> {
    static EVALUATOR: OnceLock<Evaluator<Arctangent>> = OnceLock::new();
    EVALUATOR.get_or_init(|| Evaluator::new(Arctangent::new(4096).unwrap()))
}

fn sine(policy: PhasePolicy) -> &'static Evaluator<Sine> {
    static WRAP: OnceLock<Evaluator<Sine>> = OnceLock::new();
    static SNAP: OnceLock<Evaluator<Sine>> = OnceLock::new();
    let cell = match policy {
        PhasePolicy::Wrap => &WRAP,
        PhasePolicy::Snap => &SNAP,
    };
    cell.get_or_init(|| Evaluator::new(Sine::new(4096).unwrap().with_policy(policy)))
}

fn cosine() -> &'static Evaluator<Cosine> {
    static EVALUATOR: OnceLock<Evaluator<Cosine>> = OnceLock::new();
    EVALUATOR.get_or_init(|| Evaluator::new(Cosine::new(4096).unwrap()))
}

fn exp() -> &'static Evaluator<Exponential> {
    static EVALUATOR: OnceLock<Evaluator<Exponential>> = OnceLock::new();
    EVALUATOR.get_or_init(|| Evaluator::new(Exponential::new(4096).unwrap()))
}

/// Batch (W = 1, 4, 8 and default) and in-place output all equal the scalar output.
fn check_batch_equivalence<A>(evaluator: &Evaluator<A>, input: &[f64], context: &str)
where
    A: Accelerator<Output = f64> + Kernel,
{
    let scalar: Vec<f64> = input.iter().map(|&x| evaluator.evaluate(x)).collect();

    let mut output = vec![0.0; input.len()];
    evaluator.evaluate_batch(input, &mut output);
    assert_bitwise_eq(&output, &scalar, &format!("{} (default)", context));

    evaluator.evaluate_batch_with::<ScalarVector<f64>>(input, &mut output);
    assert_bitwise_eq(&output, &scalar, &format!("{} (W = 1)", context));

    evaluator.evaluate_batch_with::<LaneVector<4>>(input, &mut output);
    assert_bitwise_eq(&output, &scalar, &format!("{} (W = 4)", context));

    evaluator.evaluate_batch_with::<LaneVector<8>>(input, &mut output);
    assert_bitwise_eq(&output, &scalar, &format!("{} (W = 8)", context));

    let mut data = input.to_vec();
    evaluator.evaluate_in_place(&mut data);
    assert_bitwise_eq(&data, &scalar, &format!("{} (in place)", context));

    let mut data = input.to_vec();
    evaluator.evaluate_in_place_with::<LaneVector<8>>(&mut data);
    assert_bitwise_eq(&data, &scalar, &format!("{} (in place, W = 8)", context));
}

#[test]
fn test_power_law_batch_equals_scalar() {
    proptest!(proptest_config(), |(input in batch_of(positive_f64()))| {
        check_batch_equivalence(sixth_root(), &input, "sixth root");
        check_batch_equivalence(three_quarters(), &input, "x^(3/4)");
    });
}

#[test]
fn test_log_batch_equals_scalar() {
    proptest!(proptest_config(), |(input in batch_of(positive_f64()))| {
        check_batch_equivalence(log(), &input, "ln");
    });
}

#[test]
fn test_bounded_batch_equals_scalar() {
    proptest!(proptest_config(), |(input in batch_of(wide_f64()))| {
        check_batch_equivalence(atan(), &input, "atan");
    });
}

#[test]
fn test_trig_batch_equals_scalar() {
    proptest!(proptest_config(), |(input in batch_of(phase_f64()))| {
        check_batch_equivalence(sine(PhasePolicy::Wrap), &input, "sin (wrap)");
        check_batch_equivalence(sine(PhasePolicy::Snap), &input, "sin (snap)");
        check_batch_equivalence(cosine(), &input, "cos");
    });
}

#[test]
fn test_exp_batch_equals_scalar() {
    proptest!(proptest_config(), |(input in batch_of(exponent_f64()))| {
        check_batch_equivalence(exp(), &input, "exp");
    });
}

#[test]
fn test_series_log_batch_equals_scalar() {
    let series = Evaluator::new(SeriesLog::default());
    proptest!(proptest_config(), |(input in batch_of(positive_f64()))| {
        check_batch_equivalence(&series, &input, "series ln");
    });
}

/// Property: ln(1/x) = -ln(x) up to the rounding of 1/x
#[test]
fn test_log_reciprocal_symmetry() {
    proptest!(proptest_config(), |(x in positive_f64())| {
        let sum = log().evaluate(x) + log().evaluate(1.0 / x);
        prop_assert!(sum.abs() < 1e-12, "ln({}) + ln(1/{}) = {}", x, x, sum);
    });
}

/// Property: x^p * (1/x)^p = 1 up to the rounding of 1/x
#[test]
fn test_power_law_reflection() {
    proptest!(proptest_config(), |(x in positive_f64())| {
        let product = three_quarters().evaluate(x) * three_quarters().evaluate(1.0 / x);
        prop_assert!((product - 1.0).abs() < 1e-12, "x = {}, product = {}", x, product);
    });
}

/// Property: scaling by 2^6 scales the sixth root by exactly 2
#[test]
fn test_sixth_root_octave_scaling() {
    proptest!(proptest_config(), |(x in 1.0f64..1e12)| {
        let y = sixth_root().evaluate(x);
        let y64 = sixth_root().evaluate(x * 64.0);
        prop_assert_eq!(y64, y * 2.0);
    });
}

/// Property: atan is odd and saturates at the table bounds
#[test]
fn test_arctangent_clamping() {
    let lower = atan().evaluate(-50.0);
    let upper = atan().evaluate(50.0);
    proptest!(proptest_config(), |(x in 50.0f64..1e300)| {
        prop_assert_eq!(atan().evaluate(x), upper);
        prop_assert_eq!(atan().evaluate(-x), lower);
    });
}

/// Property: wrapped sine is periodic
#[test]
fn test_sine_periodicity() {
    proptest!(proptest_config(), |(x in 0.0f64..core::f64::consts::TAU, k in -5i32..5)| {
        let shifted = x + k as f64 * core::f64::consts::TAU;
        let sin = sine(PhasePolicy::Wrap);
        let diff = (sin.evaluate(shifted) - sin.evaluate(x)).abs();
        prop_assert!(diff < 1e-8, "x = {}, k = {}, diff = {}", x, k, diff);
    });
}

/// Property: snapped sine returns 0 outside (0, 2π)
#[test]
fn test_sine_snap_outside_period() {
    let outside = prop_oneof![-100.0f64..=0.0, core::f64::consts::TAU..100.0];
    proptest!(proptest_config(), |(x in outside)| {
        prop_assert_eq!(sine(PhasePolicy::Snap).evaluate(x), 0.0);
    });
}

/// Property: exp saturates below -745 and at or above 710
#[test]
fn test_exp_saturation() {
    proptest!(proptest_config(), |(x in 745.0001f64..1e300)| {
        prop_assert_eq!(exp().evaluate(-x), 0.0);
        prop_assert_eq!(exp().evaluate(x.max(710.0)), f64::INFINITY);
    });
}

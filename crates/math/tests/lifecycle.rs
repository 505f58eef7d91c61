//! Evaluator lifecycle: construction errors, disposal and shared use across threads

use std::sync::Arc;
use std::thread;

use num_complex::Complex64;
use varr_math::{
    status, Accelerator, Arctangent, Bounded, BurstWorkspace, Cosine, Evaluator, Exponential,
    LifecycleError, LinearPhasor, Logarithm, PowerLaw, SeriesLog, Sine, SplitPhasor,
    TableErrorCode,
};

/// Dispose twice, checking the status codes and the poisoned evaluation.
fn check_dispose<A>(mut evaluator: Evaluator<A>, probe: f64)
where
    A: Accelerator<Output = f64>,
{
    assert!(!evaluator.evaluate(probe).is_nan());
    assert_eq!(status(evaluator.dispose()), 0);
    assert!(evaluator.is_disposed());
    assert!(evaluator.evaluate(probe).is_nan());
    assert_eq!(status(evaluator.dispose()), 1);
}

#[test]
fn test_every_family_disposes_once() {
    check_dispose(Evaluator::new(PowerLaw::three_quarters(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(PowerLaw::sixth_root(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(PowerLaw::new(2.5, 256).unwrap()), 3.0);
    check_dispose(Evaluator::new(Logarithm::new(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(Arctangent::new(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(Bounded::new(256, 0.0, 1.0, libm::sqrt).unwrap()), 0.5);
    check_dispose(Evaluator::new(Sine::new(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(Cosine::new(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(Exponential::new(256).unwrap()), 3.0);
    check_dispose(Evaluator::new(SeriesLog::new(8).unwrap()), 3.0);
}

#[test]
fn test_phasors_dispose_once() {
    for mut phasor in [
        Evaluator::new(SplitPhasor::new(256).unwrap()),
        Evaluator::<SplitPhasor>::default(),
    ] {
        let was_live = !phasor.is_disposed();
        let result = phasor.dispose();
        assert_eq!(result.is_ok(), was_live);
        assert!(phasor.evaluate(1.0).im.is_nan());
        assert_eq!(phasor.dispose(), Err(LifecycleError::AlreadyDisposed));
    }

    let mut phasor = Evaluator::new(LinearPhasor::new(256).unwrap());
    assert_eq!(phasor.dispose(), Ok(()));
    let mut out = [Complex64::new(0.0, 0.0); 3];
    phasor.evaluate_batch(&[0.0, 1.0, 2.0], &mut out);
    assert!(out.iter().all(|z| z.re.is_nan() && z.im.is_nan()));
}

#[test]
fn test_disposed_burst_fills_sentinel() {
    let mut log = Evaluator::new(Logarithm::new(256).unwrap());
    log.dispose().unwrap();
    let mut workspace = BurstWorkspace::new();
    let mut data = vec![2.0; 10];
    log.evaluate_burst_in_place(&mut data, &mut workspace);
    assert!(data.iter().all(|y| y.is_nan()));

    let mut out = vec![0.0; 10];
    log.evaluate_burst(&[2.0; 10], &mut out, &mut workspace);
    assert!(out.iter().all(|y| y.is_nan()));
}

#[test]
fn test_error_codes_carry_guidance() {
    let err = Logarithm::new(0).unwrap_err();
    assert_eq!(err.code, TableErrorCode::SampleCountTooSmall);
    assert_eq!(err.code.code(), "E001");
    assert!(!err.code.guidance().is_empty());
    assert!(err.to_string().contains("E001"));

    let err = Bounded::new(16, 1.0, f64::INFINITY, libm::sqrt).unwrap_err();
    assert_eq!(err.code, TableErrorCode::InvalidDomain);

    let err = Bounded::new(16, -1.0, 1.0, libm::log).unwrap_err();
    assert_eq!(err.code, TableErrorCode::NonFiniteSample);
    assert_eq!(err.index, Some(0));

    let err = PowerLaw::new(1e3, 16).unwrap_err();
    assert_eq!(err.code, TableErrorCode::ExponentOutOfRange);
    assert_eq!(err.code.code(), "E004");

    assert_eq!(LifecycleError::AlreadyDisposed.code(), "L001");
}

#[test]
fn test_drop_releases_without_dispose() {
    let evaluator = Evaluator::new(Sine::new(1 << 12).unwrap());
    assert_eq!(evaluator.accelerator().map(|s| s.sample_count()), Some(1 << 12));
    drop(evaluator);
}

#[test]
fn test_shared_evaluation_across_threads() {
    let pow = Arc::new(Evaluator::new(PowerLaw::three_quarters(1 << 14).unwrap()));
    let expected: Vec<f64> = (1..=1000).map(|i| pow.evaluate(i as f64)).collect();
    let expected = Arc::new(expected);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pow = Arc::clone(&pow);
            let expected = Arc::clone(&expected);
            thread::spawn(move || {
                let input: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
                let mut output = vec![0.0; input.len()];
                pow.evaluate_batch(&input, &mut output);
                assert_eq!(output, *expected);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // every shared reference is gone, so disposal is possible again
    let mut pow = Arc::try_unwrap(pow).unwrap();
    assert_eq!(pow.dispose(), Ok(()));
}

#[test]
#[should_panic(expected = "same length")]
fn test_batch_length_mismatch_panics() {
    let sin = Evaluator::new(Sine::new(64).unwrap());
    let mut output = [0.0; 3];
    sin.evaluate_batch(&[0.0; 4], &mut output);
}

//! `varr timing`: wall-clock comparison against libm per evaluation mode.

use anyhow::Result;
use clap::Args;
use num_complex::Complex64;
use std::hint::black_box;
use std::time::{Duration, Instant};
use varr_math::BurstWorkspace;

use super::{reference_phasor, SweepArgs};

/// Options for `varr timing`.
#[derive(Args, Debug)]
pub struct TimingArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Repetitions per mode; the fastest is reported
    #[arg(long, default_value = "5")]
    pub repeats: usize,
}

/// Execute `varr timing`.
pub fn execute(args: TimingArgs) -> Result<()> {
    let function = args.sweep.function;
    let input = args.sweep.sweep()?;
    let repeats = args.repeats.max(1);

    let build_start = Instant::now();
    let mut approximation = args.sweep.build()?;
    let build_time = build_start.elapsed();

    let reference = best_of(repeats, || {
        if function.is_complex() {
            let values: Vec<Complex64> = input.iter().map(|&x| reference_phasor(x)).collect();
            black_box(values);
        } else {
            let values: Vec<f64> = input.iter().map(|&x| function.reference(x)).collect();
            black_box(values);
        }
        Ok(())
    })?;

    println!("Function: {}", function.label());
    println!("Samples: {}", args.sweep.sample_count());
    println!("Points: {}", input.len());
    println!("Build: {:.3} ms", build_time.as_secs_f64() * 1e3);
    println!();
    println!("{:<10} {:>12} {:>10}", "mode", "ns/point", "speedup");
    print_row("libm", reference, reference, input.len());

    let mut workspace = BurstWorkspace::new();
    for &mode in function.modes() {
        let elapsed = best_of(repeats, || {
            black_box(approximation.evaluate(mode, &input, &mut workspace)?);
            Ok(())
        })?;
        print_row(mode.name(), elapsed, reference, input.len());
    }

    approximation.dispose()
}

fn best_of(repeats: usize, mut run: impl FnMut() -> Result<()>) -> Result<Duration> {
    let mut best = Duration::MAX;
    for _ in 0..repeats {
        let start = Instant::now();
        run()?;
        best = best.min(start.elapsed());
    }
    Ok(best)
}

fn print_row(name: &str, elapsed: Duration, reference: Duration, points: usize) {
    let per_point = elapsed.as_secs_f64() * 1e9 / points as f64;
    let speedup = reference.as_secs_f64() / elapsed.as_secs_f64().max(f64::MIN_POSITIVE);
    println!("{:<10} {:>12.3} {:>9.2}x", name, per_point, speedup);
}

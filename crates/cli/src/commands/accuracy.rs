//! `varr accuracy`: worst weighted relative difference against libm.

use anyhow::{bail, Result};
use clap::Args;
use varr_math::accuracy::{
    worst_weighted_difference, worst_weighted_difference_complex, DEFAULT_ALPHA_SCALE,
};
use varr_math::BurstWorkspace;

use super::{reference_phasor, Mode, SweepArgs, Values};

/// Options for `varr accuracy`.
#[derive(Args, Debug)]
pub struct AccuracyArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Evaluation entry point to measure
    #[arg(short, long, value_enum, default_value_t = Mode::Batch)]
    pub mode: Mode,

    /// Fail when the worst weighted difference exceeds this
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Scale of the weighting that discounts differences near zero
    #[arg(long, default_value_t = DEFAULT_ALPHA_SCALE)]
    pub alpha_scale: f64,
}

/// Execute `varr accuracy`.
pub fn execute(args: AccuracyArgs) -> Result<()> {
    let function = args.sweep.function;
    if !function.modes().contains(&args.mode) {
        bail!(
            "{} does not support {} mode",
            function.label(),
            args.mode.name()
        );
    }

    let input = args.sweep.sweep()?;
    let mut approximation = args.sweep.build()?;
    let mut workspace = BurstWorkspace::new();

    let worst = match approximation.evaluate(args.mode, &input, &mut workspace)? {
        Values::Real(actual) => {
            let expected: Vec<f64> = input.iter().map(|&x| function.reference(x)).collect();
            worst_weighted_difference(&expected, &actual, args.alpha_scale)
        }
        Values::Complex(actual) => {
            let expected: Vec<_> = input.iter().map(|&x| reference_phasor(x)).collect();
            worst_weighted_difference_complex(&expected, &actual, args.alpha_scale)
        }
    };
    approximation.dispose()?;

    println!("Function: {}", function.label());
    println!("Samples: {}", args.sweep.sample_count());
    println!("Points: {}", input.len());
    println!("Mode: {}", args.mode.name());
    println!("Worst weighted relative difference: {:.6e}", worst);

    if let Some(threshold) = args.threshold {
        if worst.is_nan() || worst > threshold {
            bail!(
                "worst weighted relative difference {:.6e} exceeds threshold {:.6e}",
                worst,
                threshold
            );
        }
        println!("Within threshold {:.6e}", threshold);
    }

    Ok(())
}

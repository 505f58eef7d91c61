//! Function catalogue and evaluation plumbing shared by the subcommands.

pub mod accuracy;
pub mod list;
pub mod timing;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use num_complex::Complex64;
use std::f64::consts::{PI, TAU};
use varr_math::accuracy::{sample_points, Sampling};
use varr_math::functions::DEFAULT_SERIES_TERMS;
use varr_math::{
    Accelerator, Arctangent, Burst, BurstWorkspace, Cosine, Evaluator, Exponential,
    Interpolation, Kernel, LinearPhasor, Logarithm, PowerLaw, SeriesLog, Sine, SplitPhasor,
};

/// Functions the harness can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FunctionName {
    /// x^(3/4)
    ThreeQuarters,
    /// x^(1/6)
    SixthRoot,
    /// ln x from a mantissa table
    Log,
    /// ln x from the odd series, no table
    SeriesLog,
    /// atan x clamped to [-50, 50]
    Atan,
    /// sin x
    Sin,
    /// cos x
    Cos,
    /// e^x
    Exp,
    /// e^(ix) from separate sine and cosine tables
    Phasor,
    /// e^(ix) from one complex table
    LinearPhasor,
}

impl FunctionName {
    /// Display name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::ThreeQuarters => "x^(3/4)",
            Self::SixthRoot => "x^(1/6)",
            Self::Log => "ln x",
            Self::SeriesLog => "ln x (series)",
            Self::Atan => "atan x",
            Self::Sin => "sin x",
            Self::Cos => "cos x",
            Self::Exp => "e^x",
            Self::Phasor => "e^(ix) (split)",
            Self::LinearPhasor => "e^(ix) (complex table)",
        }
    }

    /// Domain swept when no `--range` is given.
    pub fn default_range(self) -> (f64, f64) {
        match self {
            Self::ThreeQuarters | Self::SixthRoot => (1e-18, 1e18),
            Self::Log | Self::SeriesLog => (1e-10, 1e10),
            Self::Atan => (-50.0, 50.0),
            Self::Sin | Self::Cos => (0.0, TAU),
            Self::Exp => (-10.0, 10.0),
            Self::Phasor | Self::LinearPhasor => (-6.0 * PI, 6.0 * PI),
        }
    }

    /// Sampling used when `--log` is not given.
    pub fn default_sampling(self) -> Sampling {
        match self {
            Self::ThreeQuarters | Self::SixthRoot | Self::Log | Self::SeriesLog => {
                Sampling::Logarithmic
            }
            _ => Sampling::Linear,
        }
    }

    /// Table size when no `--samples` is given (series terms for the series log).
    pub fn default_samples(self) -> usize {
        match self {
            Self::Log => 100_000,
            Self::Sin | Self::Cos => 500_000,
            Self::SeriesLog => DEFAULT_SERIES_TERMS,
            _ => 3_000_000,
        }
    }

    /// Whether the function produces complex values.
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Phasor | Self::LinearPhasor)
    }

    /// Modes this function supports.
    pub fn modes(self) -> &'static [Mode] {
        match self {
            Self::ThreeQuarters | Self::SixthRoot | Self::Log => &Mode::ALL,
            Self::Phasor | Self::LinearPhasor => &[Mode::Scalar, Mode::Batch],
            _ => &[Mode::Scalar, Mode::Batch, Mode::InPlace],
        }
    }

    /// Real libm reference.
    pub fn reference(self, x: f64) -> f64 {
        match self {
            Self::ThreeQuarters => libm::pow(x, 0.75),
            Self::SixthRoot => libm::pow(x, 1.0 / 6.0),
            Self::Log | Self::SeriesLog => libm::log(x),
            Self::Atan => libm::atan(x),
            Self::Sin => libm::sin(x),
            Self::Cos => libm::cos(x),
            Self::Exp => libm::exp(x),
            Self::Phasor | Self::LinearPhasor => f64::NAN,
        }
    }
}

/// Complex libm reference `e^(ix)`.
pub fn reference_phasor(x: f64) -> Complex64 {
    Complex64::new(libm::cos(x), libm::sin(x))
}

/// Evaluation entry point being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One call per element
    Scalar,
    /// Lane-group batch into a separate output
    Batch,
    /// Batch overwriting the input
    InPlace,
    /// Chunked multi-stage batch
    Burst,
}

impl Mode {
    /// Every mode, in report order.
    pub const ALL: [Mode; 4] = [Mode::Scalar, Mode::Batch, Mode::InPlace, Mode::Burst];

    /// Name as typed on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Scalar => "scalar",
            Mode::Batch => "batch",
            Mode::InPlace => "in-place",
            Mode::Burst => "burst",
        }
    }
}

/// Command-line spelling of [`Interpolation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InterpolationArg {
    /// Blend the two neighbouring samples
    #[default]
    Linear,
    /// Take the upper neighbour
    Sublinear,
}

impl From<InterpolationArg> for Interpolation {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Linear => Interpolation::Linear,
            InterpolationArg::Sublinear => Interpolation::Sublinear,
        }
    }
}

/// Evaluator construction and sweep options common to `accuracy` and `timing`.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Function to evaluate
    #[arg(value_enum)]
    pub function: FunctionName,

    /// Table size (terms for series-log); defaults per function
    #[arg(short, long)]
    pub samples: Option<usize>,

    /// Number of sweep points
    #[arg(short, long, default_value = "1000000")]
    pub points: usize,

    /// Sweep bounds; defaults per function
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["LOWER", "UPPER"],
        allow_negative_numbers = true
    )]
    pub range: Option<Vec<f64>>,

    /// Space sweep points logarithmically
    #[arg(long)]
    pub log: bool,

    /// Interpolation between neighbouring samples
    #[arg(short, long, value_enum, default_value_t = InterpolationArg::Linear)]
    pub interpolation: InterpolationArg,
}

impl SweepArgs {
    /// Resolved table size.
    pub fn sample_count(&self) -> usize {
        self.samples
            .unwrap_or_else(|| self.function.default_samples())
    }

    /// Resolved sweep inputs.
    pub fn sweep(&self) -> Result<Vec<f64>> {
        let (lower, upper) = match self.range.as_deref() {
            Some(&[lower, upper]) => (lower, upper),
            Some(other) => bail!("--range takes two values, got {}", other.len()),
            None => self.function.default_range(),
        };
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            bail!("sweep range is empty: [{}, {}]", lower, upper);
        }
        if self.points == 0 {
            bail!("--points must be at least 1");
        }
        let sampling = if self.log {
            Sampling::Logarithmic
        } else {
            self.function.default_sampling()
        };
        if sampling == Sampling::Logarithmic && lower <= 0.0 {
            bail!("logarithmic sampling needs a positive lower bound, got {}", lower);
        }
        log::info!(
            "{} points over [{}, {}] ({:?})",
            self.points,
            lower,
            upper,
            sampling
        );
        Ok(sample_points(lower, upper, self.points, sampling))
    }

    /// Build the requested evaluator.
    pub fn build(&self) -> Result<Approximation> {
        let n = self.sample_count();
        let interpolation = Interpolation::from(self.interpolation);
        let context = || format!("failed to build {} with {} samples", self.function.label(), n);

        let built = match self.function {
            FunctionName::ThreeQuarters => Approximation::Power(Evaluator::new(
                PowerLaw::three_quarters(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::SixthRoot => Approximation::Power(Evaluator::new(
                PowerLaw::sixth_root(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::Log => Approximation::Log(Evaluator::new(
                Logarithm::new(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::SeriesLog => {
                self.require_linear()?;
                Approximation::Series(Evaluator::new(SeriesLog::new(n).with_context(context)?))
            }
            FunctionName::Atan => Approximation::Atan(Evaluator::new(
                Arctangent::new(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::Sin => Approximation::Sine(Evaluator::new(
                Sine::new(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::Cos => Approximation::Cosine(Evaluator::new(
                Cosine::new(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::Exp => Approximation::Exp(Evaluator::new(
                Exponential::new(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
            FunctionName::Phasor => {
                self.require_linear()?;
                Approximation::SplitPhasor(Evaluator::new(
                    SplitPhasor::new(n).with_context(context)?,
                ))
            }
            FunctionName::LinearPhasor => Approximation::LinearPhasor(Evaluator::new(
                LinearPhasor::new(n)
                    .with_context(context)?
                    .with_interpolation(interpolation),
            )),
        };
        log::info!("built {} with {} samples", self.function.label(), n);
        Ok(built)
    }

    fn require_linear(&self) -> Result<()> {
        if self.interpolation != InterpolationArg::Linear {
            bail!(
                "{} does not support {:?} interpolation",
                self.function.label(),
                self.interpolation
            );
        }
        Ok(())
    }
}

/// A built evaluator of any family.
pub enum Approximation {
    /// `x^p`
    Power(Evaluator<PowerLaw>),
    /// Table `ln x`
    Log(Evaluator<Logarithm>),
    /// Series `ln x`
    Series(Evaluator<SeriesLog>),
    /// `atan x`
    Atan(Evaluator<Arctangent>),
    /// `sin x`
    Sine(Evaluator<Sine>),
    /// `cos x`
    Cosine(Evaluator<Cosine>),
    /// `e^x`
    Exp(Evaluator<Exponential>),
    /// Split `e^(ix)`
    SplitPhasor(Evaluator<SplitPhasor>),
    /// Complex-table `e^(ix)`
    LinearPhasor(Evaluator<LinearPhasor>),
}

/// Values produced by one evaluation pass.
pub enum Values {
    /// Real outputs
    Real(Vec<f64>),
    /// Complex outputs
    Complex(Vec<Complex64>),
}

impl Approximation {
    /// Evaluate `input` with `mode`, reusing `workspace` for burst mode.
    pub fn evaluate(
        &self,
        mode: Mode,
        input: &[f64],
        workspace: &mut BurstWorkspace,
    ) -> Result<Values> {
        let values = match self {
            Self::Power(e) => Values::Real(evaluate_burst(e, mode, input, workspace)?),
            Self::Log(e) => Values::Real(evaluate_burst(e, mode, input, workspace)?),
            Self::Series(e) => Values::Real(evaluate_real(e, mode, input)?),
            Self::Atan(e) => Values::Real(evaluate_real(e, mode, input)?),
            Self::Sine(e) => Values::Real(evaluate_real(e, mode, input)?),
            Self::Cosine(e) => Values::Real(evaluate_real(e, mode, input)?),
            Self::Exp(e) => Values::Real(evaluate_real(e, mode, input)?),
            Self::SplitPhasor(e) => Values::Complex(evaluate_complex(e, mode, input)?),
            Self::LinearPhasor(e) => Values::Complex(evaluate_complex(e, mode, input)?),
        };
        Ok(values)
    }

    /// Dispose the evaluator, reporting a double dispose as an error.
    pub fn dispose(&mut self) -> Result<()> {
        let result = match self {
            Self::Power(e) => e.dispose(),
            Self::Log(e) => e.dispose(),
            Self::Series(e) => e.dispose(),
            Self::Atan(e) => e.dispose(),
            Self::Sine(e) => e.dispose(),
            Self::Cosine(e) => e.dispose(),
            Self::Exp(e) => e.dispose(),
            Self::SplitPhasor(e) => e.dispose(),
            Self::LinearPhasor(e) => e.dispose(),
        };
        result.context("dispose failed")
    }
}

fn evaluate_real<A>(evaluator: &Evaluator<A>, mode: Mode, input: &[f64]) -> Result<Vec<f64>>
where
    A: Accelerator<Output = f64> + Kernel,
{
    Ok(match mode {
        Mode::Scalar => input.iter().map(|&x| evaluator.evaluate(x)).collect(),
        Mode::Batch => {
            let mut output = vec![0.0; input.len()];
            evaluator.evaluate_batch(input, &mut output);
            output
        }
        Mode::InPlace => {
            let mut data = input.to_vec();
            evaluator.evaluate_in_place(&mut data);
            data
        }
        Mode::Burst => bail!("burst mode is only available for the power and log tables"),
    })
}

fn evaluate_burst<A>(
    evaluator: &Evaluator<A>,
    mode: Mode,
    input: &[f64],
    workspace: &mut BurstWorkspace,
) -> Result<Vec<f64>>
where
    A: Accelerator<Output = f64> + Kernel + Burst,
{
    if mode != Mode::Burst {
        return evaluate_real(evaluator, mode, input);
    }
    let mut output = vec![0.0; input.len()];
    evaluator.evaluate_burst(input, &mut output, workspace);
    Ok(output)
}

fn evaluate_complex<A>(
    evaluator: &Evaluator<A>,
    mode: Mode,
    input: &[f64],
) -> Result<Vec<Complex64>>
where
    A: Accelerator<Output = Complex64>,
{
    Ok(match mode {
        Mode::Scalar => input.iter().map(|&x| evaluator.evaluate(x)).collect(),
        Mode::Batch => {
            let mut output = vec![Complex64::new(0.0, 0.0); input.len()];
            evaluator.evaluate_batch(input, &mut output);
            output
        }
        Mode::InPlace | Mode::Burst => {
            bail!("{} mode is not available for complex outputs", mode.name())
        }
    })
}

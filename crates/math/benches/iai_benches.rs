//! iai-callgrind benchmarks for varr-math
//!
//! Measures instruction counts per evaluation (deterministic, cachegrind-based).
//! Table construction happens in the setup functions and is excluded from the counts.
//! Run with: cargo bench --bench iai_benches

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use varr_math::accuracy::{sample_points, Sampling};
use varr_math::{
    Accelerator, Arctangent, BurstWorkspace, DefaultSimdVector, Exponential, Kernel, Logarithm,
    PowerLaw, SeriesLog, Sine, SimdVector,
};
use std::hint::black_box;

const TABLE_SIZE: usize = 1 << 12;
const BLOCK: usize = 1024;

fn sixth_root() -> PowerLaw {
    PowerLaw::sixth_root(TABLE_SIZE).unwrap()
}

fn log() -> Logarithm {
    Logarithm::new(TABLE_SIZE).unwrap()
}

fn positive_block() -> (Vec<f64>, Vec<f64>) {
    (
        sample_points(1e-6, 1e6, BLOCK, Sampling::Logarithmic),
        vec![0.0; BLOCK],
    )
}

// Scalar evaluation

#[library_benchmark]
#[bench::sixth_root(sixth_root())]
fn bench_scalar_power(pow: PowerLaw) -> f64 {
    black_box(pow.evaluate(black_box(123.456)))
}

#[library_benchmark]
#[bench::log(log())]
fn bench_scalar_log(log: Logarithm) -> f64 {
    black_box(log.evaluate(black_box(123.456)))
}

#[library_benchmark]
#[bench::atan(Arctangent::new(TABLE_SIZE).unwrap())]
fn bench_scalar_atan(atan: Arctangent) -> f64 {
    black_box(atan.evaluate(black_box(3.7)))
}

#[library_benchmark]
#[bench::sin(Sine::new(TABLE_SIZE).unwrap())]
fn bench_scalar_sin(sin: Sine) -> f64 {
    black_box(sin.evaluate(black_box(37.7)))
}

#[library_benchmark]
#[bench::exp(Exponential::new(TABLE_SIZE).unwrap())]
fn bench_scalar_exp(exp: Exponential) -> f64 {
    black_box(exp.evaluate(black_box(3.7)))
}

#[library_benchmark]
fn bench_scalar_series_log() -> f64 {
    let series = SeriesLog::default();
    black_box(series.evaluate(black_box(123.456)))
}

#[library_benchmark]
fn bench_libm_log() -> f64 {
    black_box(libm::log(black_box(123.456)))
}

// One lane group

#[library_benchmark]
#[bench::sixth_root(sixth_root())]
fn bench_lanes_power(pow: PowerLaw) -> f64 {
    let x = black_box(DefaultSimdVector::splat(123.456));
    let mut out = [0.0; 8];
    pow.lanes(x).to_slice(&mut out);
    black_box(out[0])
}

#[library_benchmark]
#[bench::log(log())]
fn bench_lanes_log(log: Logarithm) -> f64 {
    let x = black_box(DefaultSimdVector::splat(123.456));
    let mut out = [0.0; 8];
    log.lanes(x).to_slice(&mut out);
    black_box(out[0])
}

// Blocks

#[library_benchmark]
#[bench::block(positive_block())]
fn bench_block_batch((input, mut output): (Vec<f64>, Vec<f64>)) -> f64 {
    let pow = sixth_root();
    pow.evaluate_batch(black_box(&input), &mut output);
    black_box(output[BLOCK - 1])
}

#[library_benchmark]
#[bench::block(positive_block())]
fn bench_block_burst((input, mut output): (Vec<f64>, Vec<f64>)) -> f64 {
    use varr_math::Burst;
    let pow = sixth_root();
    let mut workspace = BurstWorkspace::new();
    pow.evaluate_burst(black_box(&input), &mut output, &mut workspace);
    black_box(output[BLOCK - 1])
}

#[library_benchmark]
#[bench::block(positive_block())]
fn bench_block_libm((input, mut output): (Vec<f64>, Vec<f64>)) -> f64 {
    for (y, &x) in output.iter_mut().zip(black_box(&input)) {
        *y = libm::pow(x, 1.0 / 6.0);
    }
    black_box(output[BLOCK - 1])
}

library_benchmark_group!(
    name = scalar_group;
    benchmarks = bench_scalar_power, bench_scalar_log, bench_scalar_atan, bench_scalar_sin,
                 bench_scalar_exp, bench_scalar_series_log, bench_libm_log
);

library_benchmark_group!(
    name = lanes_group;
    benchmarks = bench_lanes_power, bench_lanes_log
);

library_benchmark_group!(
    name = block_group;
    benchmarks = bench_block_batch, bench_block_burst, bench_block_libm
);

main!(
    library_benchmark_groups = scalar_group,
    lanes_group,
    block_group
);

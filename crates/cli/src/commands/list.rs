//! `varr list`: available functions and their defaults.

use anyhow::Result;
use clap::ValueEnum;
use varr_math::accuracy::Sampling;

use super::FunctionName;

/// Execute `varr list`.
pub fn execute() -> Result<()> {
    println!(
        "{:<15} {:<24} {:<28} {:>9}  {}",
        "name", "function", "default range", "samples", "modes"
    );
    for function in FunctionName::value_variants() {
        let name = function
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        let (lower, upper) = function.default_range();
        let spacing = match function.default_sampling() {
            Sampling::Linear => "",
            Sampling::Logarithmic => " log",
        };
        let range = format!("[{:.4e}, {:.4e}]{}", lower, upper, spacing);
        let modes: Vec<_> = function.modes().iter().map(|mode| mode.name()).collect();
        println!(
            "{:<15} {:<24} {:<28} {:>9}  {}",
            name,
            function.label(),
            range,
            function.default_samples(),
            modes.join(", ")
        );
    }
    Ok(())
}

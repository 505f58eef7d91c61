//! Function families built on the table, reduction and interpolation primitives
//!
//! | Family | Reduction | Table domain |
//! |---|---|---|
//! | [`PowerLaw`] | reflect, exponent split | `[1, 2]` |
//! | [`Logarithm`] | reflect, exponent split | `[1, 2]` |
//! | [`Bounded`], [`Arctangent`] | clamped affine | `[min, max]` |
//! | [`Sine`], [`Cosine`] | floored modulo or snap | `[0, 2π]` |
//! | [`LinearPhasor`] | floored modulo | `[0, 2π)`, complex |
//! | [`SplitPhasor`] | delegates to [`Sine`] and [`Cosine`] | |
//! | [`Exponential`] | integer/fraction split | `[0, 1]` |
//! | [`SeriesLog`] | exponent split, no table | |

pub(crate) mod multiplicative;

mod bounded;
mod exp;
mod logarithm;
mod phasor;
mod power;
mod series;
mod trig;

pub use bounded::{Arctangent, Bounded, ARCTANGENT_BOUND};
pub use exp::{Exponential, EXP_MAX_EXPONENT, EXP_MIN_EXPONENT};
pub use logarithm::Logarithm;
pub use phasor::{LinearPhasor, SplitPhasor};
pub use power::PowerLaw;
pub use series::{SeriesLog, DEFAULT_SERIES_TERMS};
pub use trig::{Cosine, PhasePolicy, Sine};

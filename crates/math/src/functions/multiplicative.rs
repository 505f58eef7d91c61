//! Shared pipeline for the multiplicatively reduced families (power laws, log)

use crate::interpolate::{interpolate_lanes, Interpolation, MAX_LANES};
use crate::reduce::{floor_log2, reflect, reflect_lanes, ExponentSplit};
use crate::table::SampleTable;
use crate::traits::SimdVector;

/// A family evaluated as `reconstruct(table(x / 2^k), f(2^k))` after reflecting `x < 1`.
pub(crate) trait Multiplicative {
    fn table(&self) -> &SampleTable;
    fn split(&self) -> &ExponentSplit;
    fn interpolation(&self) -> Interpolation;

    /// `f(2^k)`
    fn prefix(&self, k: usize) -> f64;

    /// Merge the mantissa lookup with the prefix.
    fn combine(value: f64, prefix: f64) -> f64;
    fn combine_lanes<V: SimdVector<Scalar = f64>>(value: V, prefix: V) -> V;

    /// `f(x)` from `f(1/x)`.
    fn reflect_back(y: f64) -> f64;
    fn reflect_back_lanes<V: SimdVector<Scalar = f64>>(y: V) -> V;
}

#[inline(always)]
pub(crate) fn evaluate<M: Multiplicative>(m: &M, x: f64) -> f64 {
    let (x, inverted) = reflect(x);
    let k = floor_log2(x);
    let t = m.split().normalize(x, k);
    let y = M::combine(m.table().interpolate(t, m.interpolation()), m.prefix(k));
    if inverted {
        M::reflect_back(y)
    } else {
        y
    }
}

#[inline(always)]
pub(crate) fn evaluate_lanes<M: Multiplicative, V: SimdVector<Scalar = f64>>(m: &M, x: V) -> V {
    let (x, inverted) = reflect_lanes(x);

    // exponent extraction is per lane
    let split = m.split();
    let mut reflected = [0.0; MAX_LANES];
    let mut powers = [0.0; MAX_LANES];
    let mut prefixes = [0.0; MAX_LANES];
    x.to_slice(&mut reflected);
    for lane in 0..V::LANES {
        let k = floor_log2(reflected[lane]);
        powers[lane] = split.inverse_power(k);
        prefixes[lane] = m.prefix(k);
    }

    let t = x
        .mul(V::from_slice(&powers))
        .sub(V::splat(split.offset()));
    let y = M::combine_lanes(
        interpolate_lanes(m.table(), t, m.interpolation()),
        V::from_slice(&prefixes),
    );
    V::select(inverted, M::reflect_back_lanes(y), y)
}

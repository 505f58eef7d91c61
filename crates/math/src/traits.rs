//! Core lane abstraction traits
//!
//! Batch evaluation is written once against [`SimdVector`] and compiles to whatever
//! lane width the chosen backend provides. Every backend must perform plain IEEE 754
//! double arithmetic per lane (no fused operations), so a kernel run through any
//! backend produces the same bits as the scalar path.

/// Fixed-width vector of `f64` lanes
///
/// Implemented by the scalar (1 lane), portable array (`N` lanes) and AVX2 (4 lanes)
/// backends.
///
/// # Example
///
/// ```rust
/// use varr_math::{DefaultSimdVector, SimdVector};
///
/// let a = DefaultSimdVector::splat(2.0);
/// let b = DefaultSimdVector::splat(3.0);
/// let mut out = [0.0; 8];
/// a.mul(b).to_slice(&mut out);
/// assert_eq!(out[0], 6.0);
/// ```
pub trait SimdVector: Copy + Clone + Sized {
    /// The underlying scalar type
    type Scalar: Copy;

    /// Associated mask type for comparison operations
    type Mask: SimdMask;

    /// Number of lanes
    const LANES: usize;

    // Construction

    /// Broadcast a scalar value to all lanes
    fn splat(value: Self::Scalar) -> Self;

    /// Load from a slice (must have at least LANES elements)
    ///
    /// # Panics
    ///
    /// Panics if slice has fewer than LANES elements
    fn from_slice(slice: &[Self::Scalar]) -> Self;

    /// Store to a slice (must have at least LANES elements)
    ///
    /// # Panics
    ///
    /// Panics if slice has fewer than LANES elements
    fn to_slice(self, slice: &mut [Self::Scalar]);

    // Arithmetic operations

    /// Element-wise addition
    fn add(self, rhs: Self) -> Self;

    /// Element-wise subtraction
    fn sub(self, rhs: Self) -> Self;

    /// Element-wise multiplication
    fn mul(self, rhs: Self) -> Self;

    /// Element-wise division
    fn div(self, rhs: Self) -> Self;

    /// Element-wise negation
    fn neg(self) -> Self;

    // Comparison operations (return masks)

    /// Element-wise less-than comparison
    fn lt(self, rhs: Self) -> Self::Mask;

    /// Element-wise less-or-equal comparison
    fn le(self, rhs: Self) -> Self::Mask;

    /// Element-wise greater-or-equal comparison
    fn ge(self, rhs: Self) -> Self::Mask;

    // Blending

    /// Select values based on mask
    ///
    /// For each lane: mask[i] ? true_val[i] : false_val[i]
    ///
    /// # Example
    ///
    /// ```rust
    /// use varr_math::{DefaultSimdVector, SimdVector};
    /// let x = DefaultSimdVector::splat(0.25);
    /// let one = DefaultSimdVector::splat(1.0);
    /// let reflected = DefaultSimdVector::select(x.lt(one), one.div(x), x);
    /// let mut out = [0.0; 8];
    /// reflected.to_slice(&mut out);
    /// assert_eq!(out[0], 4.0);
    /// ```
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self;

    // Rounding

    /// Round toward negative infinity
    fn floor(self) -> Self;
}

/// Mask type for conditional lane operations
pub trait SimdMask: Copy + Clone + Sized {
    /// Returns true if all lanes are set
    fn all(self) -> bool;

    /// Returns true if any lane is set
    fn any(self) -> bool;

    /// Bitwise OR of two masks
    fn or(self, rhs: Self) -> Self;
}

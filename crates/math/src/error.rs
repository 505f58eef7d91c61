//! Construction and lifecycle errors.
//!
//! # Error Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | E001 | Sample count below 2 |
//! | E002 | Empty or non-finite domain |
//! | E003 | Generator produced a non-finite sample |
//! | E004 | Exponent outside the representable reconstruction range |
//! | L001 | Evaluator already disposed (or never built) |

use core::fmt;

/// Error codes for table construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableErrorCode {
    /// E001: sample_count < 2
    SampleCountTooSmall,
    /// E002: domain bounds are non-finite or not strictly increasing
    InvalidDomain,
    /// E003: a nominal sample is NaN or Infinity
    NonFiniteSample,
    /// E004: power-law exponent whose `(2^k)^p` table over/underflows
    ExponentOutOfRange,
}

impl TableErrorCode {
    /// Get the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            Self::SampleCountTooSmall => "E001",
            Self::InvalidDomain => "E002",
            Self::NonFiniteSample => "E003",
            Self::ExponentOutOfRange => "E004",
        }
    }

    /// Get guidance on how to fix this error.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::SampleCountTooSmall => {
                "Request at least 2 samples; accuracy grows with the square of the sample count."
            }
            Self::InvalidDomain => {
                "Use finite bounds with lower < upper."
            }
            Self::NonFiniteSample => {
                "The generator must be finite on every nominal sample of the domain."
            }
            Self::ExponentOutOfRange => {
                "Keep |p| small enough that (2^63)^p stays a normal double (roughly |p| <= 16)."
            }
        }
    }
}

impl fmt::Display for TableErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error type for table construction failures.
#[derive(Debug, Clone, PartialEq)]
pub struct TableError {
    /// The error code for programmatic handling.
    pub code: TableErrorCode,
    /// Offending sample index for `NonFiniteSample`.
    pub index: Option<usize>,
    /// Offending numeric value (sample count, bound or exponent).
    pub value: Option<f64>,
}

impl TableError {
    /// Create a new error with just a code.
    pub fn new(code: TableErrorCode) -> Self {
        Self {
            code,
            index: None,
            value: None,
        }
    }

    /// Attach the offending sample index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code)?;
        match self.code {
            TableErrorCode::SampleCountTooSmall => write!(f, "sample count too small")?,
            TableErrorCode::InvalidDomain => write!(f, "invalid domain")?,
            TableErrorCode::NonFiniteSample => write!(f, "non-finite sample")?,
            TableErrorCode::ExponentOutOfRange => write!(f, "exponent out of range")?,
        }
        if let Some(index) = self.index {
            write!(f, " at index {}", index)?;
        }
        if let Some(value) = self.value {
            write!(f, " ({})", value)?;
        }
        write!(f, "\n  Guidance: {}", self.code.guidance())
    }
}

impl core::error::Error for TableError {}

/// Lifecycle misuse reported by [`Evaluator::dispose`](crate::Evaluator::dispose).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// L001: the handle holds no accelerator
    AlreadyDisposed,
}

impl LifecycleError {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyDisposed => "L001",
        }
    }

    /// Nonzero procedural status for this failure.
    pub fn status(&self) -> i32 {
        match self {
            Self::AlreadyDisposed => 1,
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDisposed => write!(f, "[{}] evaluator already disposed", self.code()),
        }
    }
}

impl core::error::Error for LifecycleError {}

/// Collapse a dispose outcome into the procedural status code (0 = success).
///
/// # Example
///
/// ```rust
/// use varr_math::{status, Evaluator, Sine};
///
/// let mut sine = Evaluator::new(Sine::new(1024).unwrap());
/// assert_eq!(status(sine.dispose()), 0);
/// assert_ne!(status(sine.dispose()), 0);
/// ```
pub fn status(result: Result<(), LifecycleError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_table_error_display_carries_code_and_guidance() {
        let err = TableError::new(TableErrorCode::SampleCountTooSmall).with_value(1.0);
        let text = err.to_string();
        assert!(text.contains("E001"));
        assert!(text.contains("(1)"));
        assert!(text.contains("Guidance"));
    }

    #[test]
    fn test_non_finite_sample_reports_index() {
        let err = TableError::new(TableErrorCode::NonFiniteSample).with_index(7);
        assert!(err.to_string().contains("at index 7"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status(Ok(())), 0);
        assert_eq!(status(Err(LifecycleError::AlreadyDisposed)), 1);
        assert_eq!(LifecycleError::AlreadyDisposed.code(), "L001");
    }
}

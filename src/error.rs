//! Error type shared by every test procedure.
//!
//! Failures fall into three groups: precondition violations on the caller's
//! data (sizes, lengths, α, proportions), degenerate inputs that leave a
//! statistic undefined (zero variance, perfect correlation, all-zero
//! differences, an empty table), and parameter errors reported by the
//! distribution backend.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TestError>;

/// Errors returned by the test procedures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    #[error("sample is empty")]
    EmptySample,

    #[error("samples differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("{test} requires at least {required} observations, got {actual}")]
    InsufficientData {
        test: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("expected between {min} and {max} groups, got {actual}")]
    GroupCount {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("non-finite value at position {index}")]
    NonFinite { index: usize },

    #[error("significance level must lie strictly between 0 and 1, got {0}")]
    InvalidAlpha(f64),

    #[error("hypothesized proportion must lie strictly between 0 and 1, got {0}")]
    InvalidProportion(f64),

    #[error("contingency table is not rectangular: row {row} has {actual} cells, expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("contingency table total is zero")]
    EmptyTable,

    #[error("zero variance: {0}")]
    ZeroVariance(&'static str),

    #[error("perfect correlation (r = {r}) leaves the t statistic undefined")]
    PerfectCorrelation { r: f64 },

    #[error("all paired differences are zero")]
    AllDifferencesZero,

    #[error("{0} is not finite; values are too large to combine")]
    NonFiniteStatistic(&'static str),

    #[error("contingency table counts overflow a 64-bit total")]
    CountOverflow,

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),
}

impl TestError {
    /// `true` for errors caused by degenerate but well-formed data.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            TestError::ZeroVariance(_)
                | TestError::PerfectCorrelation { .. }
                | TestError::AllDifferencesZero
                | TestError::EmptyTable
                | TestError::NonFiniteStatistic(_)
                | TestError::CountOverflow
        )
    }
}

// ---------------------------------------------------------------------------
// Shared precondition checks
// ---------------------------------------------------------------------------

/// Rejects empty or non-finite samples.
pub(crate) fn check_sample(data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Err(TestError::EmptySample);
    }
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(TestError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Rejects paired samples of different length or fewer than `required` pairs.
pub(crate) fn check_paired(
    test: &'static str,
    x: &[f64],
    y: &[f64],
    required: usize,
) -> Result<()> {
    if x.len() != y.len() {
        return Err(TestError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    check_sample(x)?;
    check_sample(y)?;
    if x.len() < required {
        return Err(TestError::InsufficientData {
            test,
            required,
            actual: x.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        let e = TestError::LengthMismatch { left: 3, right: 4 };
        assert_eq!(e.to_string(), "samples differ in length: 3 vs 4");

        let e = TestError::InsufficientData {
            test: "Pearson",
            required: 3,
            actual: 2,
        };
        assert_eq!(
            e.to_string(),
            "Pearson requires at least 3 observations, got 2"
        );
    }

    #[test]
    fn degenerate_classification() {
        assert!(TestError::AllDifferencesZero.is_degenerate());
        assert!(TestError::ZeroVariance("x").is_degenerate());
        assert!(TestError::NonFiniteStatistic("F").is_degenerate());
        assert!(!TestError::EmptySample.is_degenerate());
        assert!(!TestError::InvalidAlpha(2.0).is_degenerate());
    }

    #[test]
    fn sample_checks() {
        assert_eq!(check_sample(&[]), Err(TestError::EmptySample));
        assert_eq!(
            check_sample(&[1.0, f64::NAN]),
            Err(TestError::NonFinite { index: 1 })
        );
        assert!(check_sample(&[1.0, 2.0]).is_ok());
    }

    #[test]
    fn paired_checks() {
        assert_eq!(
            check_paired("t", &[1.0, 2.0], &[1.0], 2),
            Err(TestError::LengthMismatch { left: 2, right: 1 })
        );
        assert!(matches!(
            check_paired("t", &[1.0], &[2.0], 2),
            Err(TestError::InsufficientData { required: 2, .. })
        ));
        assert!(check_paired("t", &[1.0, 2.0], &[3.0, 4.0], 2).is_ok());
    }
}

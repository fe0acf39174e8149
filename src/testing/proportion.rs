//! One-sample proportion z-test.

use tracing::{debug, instrument};

use crate::config::check_alpha;
use crate::critical::Distribution;
use crate::error::{Result, TestError};
use crate::verdict::{Tail, Verdict};

/// Result of the one-sample proportion z-test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProportionResult {
    pub successes: u64,
    pub trials: u64,
    /// Hypothesized proportion p₀.
    pub p0: f64,
    /// Observed proportion p̂ = x/n.
    pub p_hat: f64,
    /// √(p₀(1−p₀)/n).
    pub std_error: f64,
    pub z: f64,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// One-sample proportion z-test: H₀: p = p₀.
///
/// p̂ = x/n, Z = (p̂ − p₀) / √(p₀(1−p₀)/n), compared with the two-tailed
/// normal critical value.
///
/// `successes ≤ trials` is not checked; a larger count yields p̂ > 1 and a
/// meaningless but finite statistic.
///
/// # Errors
///
/// - [`TestError::InsufficientData`] when `trials` is 0.
/// - [`TestError::InvalidProportion`] when p₀ is not strictly inside (0, 1).
/// - Invalid α.
///
/// # Examples
///
/// ```
/// use u_inference::testing::proportion_z_test;
///
/// let r = proportion_z_test(10, 20, 0.5, 0.05).unwrap();
/// assert_eq!(r.p_hat, 0.5);
/// assert_eq!(r.z, 0.0);
/// assert!(!r.verdict.reject);
/// ```
#[instrument(skip_all, fields(successes = successes, trials = trials, p0 = p0))]
pub fn proportion_z_test(
    successes: u64,
    trials: u64,
    p0: f64,
    alpha: f64,
) -> Result<ProportionResult> {
    let alpha = check_alpha(alpha)?;
    if trials == 0 {
        return Err(TestError::InsufficientData {
            test: "proportion z-test",
            required: 1,
            actual: 0,
        });
    }
    if !(p0 > 0.0 && p0 < 1.0) {
        return Err(TestError::InvalidProportion(p0));
    }

    let n = trials as f64;
    let p_hat = successes as f64 / n;
    let std_error = (p0 * (1.0 - p0) / n).sqrt();
    let z = (p_hat - p0) / std_error;

    let verdict = Verdict::decide(z, Distribution::StandardNormal, Tail::TwoSided, alpha)?;
    debug!(p_hat, z, reject = verdict.reject, "proportion");

    let conclusion = verdict.conclude(
        "Z",
        &format!("The observed proportion ({p_hat:.3}) differs significantly from {p0:.2}."),
        &format!(
            "No significant difference between the observed proportion ({p_hat:.3}) and {p0:.2}."
        ),
    );

    Ok(ProportionResult {
        successes,
        trials,
        p0,
        p_hat,
        std_error,
        z,
        verdict,
        conclusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportion_matches_null() {
        let r = proportion_z_test(10, 20, 0.5, 0.05).expect("should compute");
        assert_eq!(r.p_hat, 0.5);
        assert_eq!(r.z, 0.0);
        assert!((r.std_error - (0.25_f64 / 20.0).sqrt()).abs() < 1e-15);
        assert!(!r.verdict.reject);
        assert!(r.conclusion.contains("No significant difference"));
        assert!(r.conclusion.contains("(0.500)"));
    }

    #[test]
    fn proportion_far_from_null() {
        let r = proportion_z_test(80, 100, 0.5, 0.05).expect("should compute");
        // Z = 0.3 / 0.05 = 6
        assert!((r.z - 6.0).abs() < 1e-12);
        assert!(r.verdict.reject);
        assert!(r.conclusion.contains("differs significantly"));
    }

    #[test]
    fn proportion_below_null() {
        let r = proportion_z_test(2, 50, 0.2, 0.01).expect("should compute");
        assert!(r.z < 0.0);
        assert!(r.verdict.reject, "z = {}", r.z);
    }

    #[test]
    fn proportion_successes_above_trials_is_not_checked() {
        let r = proportion_z_test(30, 20, 0.5, 0.05).expect("should compute");
        assert!(r.p_hat > 1.0);
        assert!(r.z.is_finite());
    }

    #[test]
    fn proportion_edge_cases() {
        assert!(matches!(
            proportion_z_test(0, 0, 0.5, 0.05),
            Err(TestError::InsufficientData { .. })
        ));
        assert_eq!(
            proportion_z_test(5, 10, 0.0, 0.05).unwrap_err(),
            TestError::InvalidProportion(0.0)
        );
        assert_eq!(
            proportion_z_test(5, 10, 1.0, 0.05).unwrap_err(),
            TestError::InvalidProportion(1.0)
        );
        assert!(proportion_z_test(5, 10, 0.5, 0.0).is_err());
    }
}

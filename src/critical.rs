//! Reference-distribution quantiles and tail probabilities.
//!
//! Inverse CDFs come from `statrs`; this module only maps a
//! [`Distribution`] description and a significance level onto the right
//! quantile.
//!
//! # Examples
//!
//! ```
//! use u_inference::critical::{two_tailed, upper_tail, Distribution};
//!
//! let z = two_tailed(Distribution::StandardNormal, 0.05).unwrap();
//! assert!((z - 1.959964).abs() < 1e-5);
//!
//! let chi = upper_tail(Distribution::ChiSquared { df: 1.0 }, 0.05).unwrap();
//! assert!((chi - 3.841459).abs() < 1e-3);
//! ```

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::error::{Result, TestError};

/// A reference distribution with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    StandardNormal,
    StudentT { df: f64 },
    FisherF { df1: f64, df2: f64 },
    ChiSquared { df: f64 },
}

impl Distribution {
    /// Short notation used in conclusions, e.g. `t(8)` or `F(2, 12)`.
    pub fn label(&self) -> String {
        match *self {
            Distribution::StandardNormal => "N(0, 1)".to_string(),
            Distribution::StudentT { df } => format!("t({df})"),
            Distribution::FisherF { df1, df2 } => format!("F({df1}, {df2})"),
            Distribution::ChiSquared { df } => format!("χ²({df})"),
        }
    }

    fn inverse_cdf(&self, p: f64) -> Result<f64> {
        let q = match *self {
            Distribution::StandardNormal => Normal::new(0.0, 1.0).map_err(backend)?.inverse_cdf(p),
            Distribution::StudentT { df } => {
                StudentsT::new(0.0, 1.0, df).map_err(backend)?.inverse_cdf(p)
            }
            Distribution::FisherF { df1, df2 } => {
                FisherSnedecor::new(df1, df2).map_err(backend)?.inverse_cdf(p)
            }
            Distribution::ChiSquared { df } => ChiSquared::new(df).map_err(backend)?.inverse_cdf(p),
        };
        Ok(q)
    }

    fn cdf(&self, x: f64) -> Result<f64> {
        let c = match *self {
            Distribution::StandardNormal => Normal::new(0.0, 1.0).map_err(backend)?.cdf(x),
            Distribution::StudentT { df } => StudentsT::new(0.0, 1.0, df).map_err(backend)?.cdf(x),
            Distribution::FisherF { df1, df2 } => {
                FisherSnedecor::new(df1, df2).map_err(backend)?.cdf(x)
            }
            Distribution::ChiSquared { df } => ChiSquared::new(df).map_err(backend)?.cdf(x),
        };
        Ok(c)
    }
}

fn backend(e: impl std::fmt::Display) -> TestError {
    TestError::Distribution(e.to_string())
}

/// Inverse CDF at cumulative probability `p`.
///
/// # Errors
///
/// [`TestError::Distribution`] for parameters the backend rejects or `p`
/// outside (0, 1).
pub fn quantile(distribution: Distribution, p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(TestError::Distribution(format!(
            "probability must lie strictly between 0 and 1, got {p}"
        )));
    }
    let q = distribution.inverse_cdf(p)?;
    if q.is_finite() {
        Ok(q)
    } else {
        Err(TestError::Distribution(format!(
            "{} quantile at {p} is not finite",
            distribution.label()
        )))
    }
}

/// CDF at `x`.
pub fn cdf(distribution: Distribution, x: f64) -> Result<f64> {
    distribution.cdf(x)
}

/// Critical value for a two-tailed test: quantile at 1 − α/2.
pub fn two_tailed(distribution: Distribution, alpha: f64) -> Result<f64> {
    quantile(distribution, 1.0 - alpha / 2.0)
}

/// Critical value for an upper-tail test: quantile at 1 − α.
pub fn upper_tail(distribution: Distribution, alpha: f64) -> Result<f64> {
    quantile(distribution, 1.0 - alpha)
}

/// P(|X| ≥ |statistic|) for a distribution symmetric around zero.
pub fn two_tailed_p_value(distribution: Distribution, statistic: f64) -> Result<f64> {
    let upper = 1.0 - cdf(distribution, statistic.abs())?;
    Ok((2.0 * upper).clamp(0.0, 1.0))
}

/// P(X ≥ statistic).
pub fn upper_tail_p_value(distribution: Distribution, statistic: f64) -> Result<f64> {
    Ok((1.0 - cdf(distribution, statistic)?).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_quantiles() {
        let z = two_tailed(Distribution::StandardNormal, 0.05).expect("should compute");
        assert!((z - 1.959_963_985).abs() < 1e-6, "z = {z}");
        let z = two_tailed(Distribution::StandardNormal, 0.01).expect("should compute");
        assert!((z - 2.575_829_304).abs() < 1e-6, "z = {z}");
    }

    #[test]
    fn student_t_quantile() {
        // t(0.975; 10) = 2.228139
        let t = two_tailed(Distribution::StudentT { df: 10.0 }, 0.05).expect("should compute");
        assert!((t - 2.228_139).abs() < 1e-4, "t = {t}");
    }

    #[test]
    fn f_quantile() {
        // F(0.95; 2, 12) = 3.885294
        let f = upper_tail(Distribution::FisherF { df1: 2.0, df2: 12.0 }, 0.05)
            .expect("should compute");
        assert!((f - 3.885_294).abs() < 1e-3, "F = {f}");
    }

    #[test]
    fn chi_squared_quantile() {
        // χ²(0.95; 4) = 9.487729
        let c = upper_tail(Distribution::ChiSquared { df: 4.0 }, 0.05).expect("should compute");
        assert!((c - 9.487_729).abs() < 1e-3, "χ² = {c}");
    }

    #[test]
    fn p_values_match_quantiles() {
        let dist = Distribution::StudentT { df: 7.0 };
        let t = two_tailed(dist, 0.05).expect("should compute");
        let p = two_tailed_p_value(dist, t).expect("should compute");
        assert!((p - 0.05).abs() < 1e-4, "p = {p}");

        let dist = Distribution::ChiSquared { df: 3.0 };
        let c = upper_tail(dist, 0.1).expect("should compute");
        let p = upper_tail_p_value(dist, c).expect("should compute");
        assert!((p - 0.1).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn invalid_inputs() {
        assert!(quantile(Distribution::StandardNormal, 0.0).is_err());
        assert!(quantile(Distribution::StandardNormal, 1.0).is_err());
        assert!(matches!(
            quantile(Distribution::ChiSquared { df: 0.0 }, 0.5),
            Err(TestError::Distribution(_))
        ));
        assert!(quantile(Distribution::StudentT { df: -1.0 }, 0.5).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(Distribution::StudentT { df: 8.0 }.label(), "t(8)");
        assert_eq!(
            Distribution::FisherF { df1: 2.0, df2: 12.0 }.label(),
            "F(2, 12)"
        );
    }
}

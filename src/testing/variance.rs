//! Homogeneity-of-variance tests: Bartlett and Levene.

use statrs::statistics::{Data, Median, Statistics};
use tracing::{debug, instrument};

use crate::config::{check_alpha, LeveneCenter};
use crate::critical::Distribution;
use crate::error::{Result, TestError};
use crate::testing::anova::{check_groups, Decomposition};
use crate::verdict::{Tail, Verdict};

// ---------------------------------------------------------------------------
// Bartlett
// ---------------------------------------------------------------------------

/// Result of Bartlett's test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BartlettResult {
    /// Corrected statistic T.
    pub statistic: f64,
    /// k − 1.
    pub df: usize,
    /// s²ₚ = Σ(nᵢ−1)s²ᵢ / (N−k).
    pub pooled_variance: f64,
    /// Unbiased variance of each group.
    pub variances: Vec<f64>,
    pub sizes: Vec<usize>,
    /// C = 1 + [Σ1/(nᵢ−1) − 1/(N−k)] / (3(k−1)).
    pub correction: f64,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Bartlett test for equality of variances: H₀: all groups have equal variance.
///
/// Assumes data are from **normal** distributions. For non-normal data, prefer
/// [`levene_test`].
///
/// # Algorithm
///
/// 1. Pooled variance: s²ₚ = Σ(nᵢ-1)s²ᵢ / (N-k)
/// 2. Numerator: (N-k) ln(s²ₚ) - Σ(nᵢ-1) ln(s²ᵢ)
/// 3. Correction factor: C = 1 + [1/(3(k-1))] × [Σ 1/(nᵢ-1) - 1/(N-k)]
/// 4. Statistic: T = numerator / C, compared with upper-tail χ²(k-1)
///
/// # Errors
///
/// - Group count outside 2–10, a group with fewer than 2 observations,
///   non-finite values, invalid α.
/// - [`TestError::ZeroVariance`] when any group is constant (ln undefined).
///
/// # References
///
/// Bartlett (1937). "Properties of sufficiency and statistical tests".
/// Proceedings of the Royal Society A, 160(901), 268–282.
///
/// # Examples
///
/// ```
/// use u_inference::testing::bartlett_test;
///
/// let g1 = [2.0, 3.0, 4.0, 5.0, 6.0]; // variance 2.5
/// let g2 = [10.0, 20.0, 30.0, 40.0, 50.0]; // variance 250
/// let r = bartlett_test(&[&g1, &g2], 0.05).unwrap();
/// assert!(r.verdict.reject);
/// ```
#[instrument(skip_all, fields(k = groups.len()))]
pub fn bartlett_test(groups: &[&[f64]], alpha: f64) -> Result<BartlettResult> {
    let alpha = check_alpha(alpha)?;
    check_groups("Bartlett's test", groups)?;

    let k = groups.len();
    let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    let variances: Vec<f64> = groups.iter().map(|g| g.iter().variance()).collect();
    if variances.iter().any(|&v| v <= 0.0) {
        return Err(TestError::ZeroVariance("a group is constant"));
    }

    let n_total: usize = sizes.iter().sum();
    let nk = (n_total - k) as f64;

    let pooled_variance = sizes
        .iter()
        .zip(variances.iter())
        .map(|(&n, &v)| (n as f64 - 1.0) * v)
        .sum::<f64>()
        / nk;

    let num = nk * pooled_variance.ln()
        - sizes
            .iter()
            .zip(variances.iter())
            .map(|(&n, &v)| (n as f64 - 1.0) * v.ln())
            .sum::<f64>();

    let sum_recip: f64 = sizes.iter().map(|&n| 1.0 / (n as f64 - 1.0)).sum();
    let correction = 1.0 + (sum_recip - 1.0 / nk) / (3.0 * (k as f64 - 1.0));

    let statistic = num / correction;
    let df = k - 1;
    let verdict = Verdict::decide(
        statistic,
        Distribution::ChiSquared { df: df as f64 },
        Tail::Upper,
        alpha,
    )?;
    debug!(statistic, pooled_variance, reject = verdict.reject, "bartlett");

    let conclusion = verdict.conclude(
        "T",
        "The variances differ significantly.",
        "No significant difference between the variances can be concluded.",
    );

    Ok(BartlettResult {
        statistic,
        df,
        pooled_variance,
        variances,
        sizes,
        correction,
        verdict,
        conclusion,
    })
}

// ---------------------------------------------------------------------------
// Levene
// ---------------------------------------------------------------------------

/// Result of Levene's test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeveneResult {
    /// ANOVA F over the absolute deviations.
    pub f_statistic: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ms_between: f64,
    pub ms_within: f64,
    /// Mean absolute deviation of each group.
    pub deviation_means: Vec<f64>,
    /// Mean absolute deviation over all observations.
    pub overall_deviation_mean: f64,
    pub center: LeveneCenter,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Levene test with deviations taken from the group mean.
///
/// See [`levene_test_with_center`].
pub fn levene_test(groups: &[&[f64]], alpha: f64) -> Result<LeveneResult> {
    levene_test_with_center(groups, alpha, LeveneCenter::Mean)
}

/// Levene test for equality of variances: H₀: all groups have equal variance.
///
/// # Algorithm
///
/// 1. zᵢⱼ = |xᵢⱼ − cᵢ| where cᵢ is the group mean ([`LeveneCenter::Mean`])
///    or median ([`LeveneCenter::Median`], the Brown–Forsythe variant)
/// 2. One-way ANOVA on the zᵢⱼ values, F against upper-tail F(k−1, N−k)
///
/// # Errors
///
/// - Group count outside 2–10, a group with fewer than 2 observations,
///   non-finite values, invalid α.
/// - [`TestError::ZeroVariance`] when every group's deviations are constant.
///
/// # References
///
/// - Levene (1960). "Robust tests for equality of variances". In
///   Olkin (Ed.), Contributions to Probability and Statistics.
/// - Brown & Forsythe (1974). "Robust tests for the equality of variances".
///   JASA, 69(346), 364–367.
///
/// # Examples
///
/// ```
/// use u_inference::testing::levene_test;
///
/// let g1 = [4.9, 5.0, 5.0, 5.1, 5.0]; // tight cluster
/// let g2 = [0.0, 3.0, 5.0, 7.0, 10.0]; // wide spread
/// let r = levene_test(&[&g1, &g2], 0.05).unwrap();
/// assert!(r.verdict.reject);
/// ```
#[instrument(skip_all, fields(k = groups.len(), center = center.label()))]
pub fn levene_test_with_center(
    groups: &[&[f64]],
    alpha: f64,
    center: LeveneCenter,
) -> Result<LeveneResult> {
    let alpha = check_alpha(alpha)?;
    check_groups("Levene's test", groups)?;

    let z_groups: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let c = match center {
                LeveneCenter::Mean => g.iter().sum::<f64>() / g.len() as f64,
                LeveneCenter::Median => Data::new(g.to_vec()).median(),
            };
            g.iter().map(|&x| (x - c).abs()).collect()
        })
        .collect();

    let z_refs: Vec<&[f64]> = z_groups.iter().map(|v| v.as_slice()).collect();
    let d = Decomposition::compute(&z_refs)?;
    let verdict = d.verdict(alpha)?;
    debug!(f = d.f_statistic, reject = verdict.reject, "levene");

    let conclusion = verdict.conclude(
        "F",
        "The variances are not all equal.",
        "No significant difference between the variances can be concluded.",
    );

    Ok(LeveneResult {
        f_statistic: d.f_statistic,
        df_between: d.df_between,
        df_within: d.df_within,
        ms_between: d.ms_between,
        ms_within: d.ms_within,
        deviation_means: d.group_means,
        overall_deviation_mean: d.grand_mean,
        center,
        verdict,
        conclusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Bartlett
    // -----------------------------------------------------------------------

    #[test]
    fn bartlett_equal_variances() {
        let g1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let g2 = [11.0, 12.0, 13.0, 14.0, 15.0];
        let r = bartlett_test(&[&g1, &g2], 0.05).expect("should compute");
        assert!(r.statistic.abs() < 1e-10, "T = {}", r.statistic);
        assert!(!r.verdict.reject);
        assert!((r.pooled_variance - 2.5).abs() < 1e-12);
    }

    #[test]
    fn bartlett_unequal_variances() {
        let g1 = [2.0, 3.0, 4.0, 5.0, 6.0];
        let g2 = [10.0, 20.0, 30.0, 40.0, 50.0];
        let r = bartlett_test(&[&g1, &g2], 0.05).expect("should compute");
        assert!((r.variances[0] - 2.5).abs() < 1e-10);
        assert!((r.variances[1] - 250.0).abs() < 1e-8);
        assert_eq!(r.sizes, vec![5, 5]);
        assert_eq!(r.df, 1);
        // C = 1 + (1/4 + 1/4 − 1/8) / 3 = 1.125
        assert!((r.correction - 1.125).abs() < 1e-12);
        // T = [8 ln 126.25 − 4 ln 2.5 − 4 ln 250] / 1.125
        let expected =
            (8.0 * 126.25_f64.ln() - 4.0 * 2.5_f64.ln() - 4.0 * 250.0_f64.ln()) / 1.125;
        assert!((r.statistic - expected).abs() < 1e-8);
        assert!(r.verdict.reject);
    }

    #[test]
    fn bartlett_three_groups() {
        let g1 = [4.0, 5.0, 6.0, 5.0];
        let g2 = [3.0, 5.0, 7.0, 5.0];
        let g3 = [4.5, 5.5, 5.0, 5.0];
        let r = bartlett_test(&[&g1, &g2, &g3], 0.05).expect("should compute");
        assert_eq!(r.df, 2);
        assert!(r.statistic >= 0.0);
    }

    #[test]
    fn bartlett_edge_cases() {
        let g1 = [1.0, 2.0, 3.0];
        let flat = [4.0, 4.0, 4.0];
        assert_eq!(
            bartlett_test(&[&g1, &flat], 0.05).unwrap_err(),
            TestError::ZeroVariance("a group is constant")
        );
        assert!(matches!(
            bartlett_test(&[&g1, &[1.0]], 0.05),
            Err(TestError::InsufficientData { .. })
        ));
        assert!(bartlett_test(&[&g1], 0.05).is_err());
    }

    #[test]
    fn bartlett_overflowing_variance_fails() {
        let wide = [1e200, -1e200, 0.0];
        let g = [1.0, 2.0, 3.0];
        assert!(matches!(
            bartlett_test(&[&wide, &g], 0.05),
            Err(TestError::NonFiniteStatistic(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Levene
    // -----------------------------------------------------------------------

    #[test]
    fn levene_equal_spread() {
        let g1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let g2 = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = levene_test(&[&g1, &g2], 0.05).expect("should compute");
        assert!(r.f_statistic.abs() < 1e-12);
        assert!(!r.verdict.reject);
        assert_eq!(r.center, LeveneCenter::Mean);
        // |x − 3| = 2,1,0,1,2 → mean 1.2
        assert!((r.deviation_means[0] - 1.2).abs() < 1e-12);
        assert!((r.overall_deviation_mean - 1.2).abs() < 1e-12);
    }

    #[test]
    fn levene_unequal_spread() {
        let g1 = [4.9, 5.0, 5.0, 5.1, 5.0];
        let g2 = [0.0, 3.0, 5.0, 7.0, 10.0];
        let r = levene_test(&[&g1, &g2], 0.05).expect("should compute");
        assert!(r.verdict.reject, "F = {}", r.f_statistic);
        assert_eq!(r.df_between, 1);
        assert_eq!(r.df_within, 8);
    }

    #[test]
    fn levene_center_changes_deviations() {
        let g1 = [1.0, 2.0, 3.0, 4.0, 100.0];
        let g2 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mean = levene_test(&[&g1, &g2], 0.05).expect("should compute");
        let median = levene_test_with_center(&[&g1, &g2], 0.05, LeveneCenter::Median)
            .expect("should compute");
        assert_eq!(median.center, LeveneCenter::Median);
        // mean 22 → |d| = 21,20,19,18,78; median 3 → 2,1,0,1,97
        assert!((mean.deviation_means[0] - 31.2).abs() < 1e-10);
        assert!((median.deviation_means[0] - 20.2).abs() < 1e-10);
    }

    #[test]
    fn levene_edge_cases() {
        let g1 = [1.0, 2.0, 3.0];
        assert!(matches!(
            levene_test(&[&g1], 0.05),
            Err(TestError::GroupCount { .. })
        ));
        // every deviation is 1 → no within-group spread
        let a = [1.0, 3.0];
        let b = [2.0, 4.0];
        assert!(matches!(
            levene_test(&[&a, &b], 0.05),
            Err(TestError::ZeroVariance(_))
        ));
        let c1 = [0.1, 0.1, 0.1];
        let c2 = [0.7, 0.7, 0.7];
        for center in [LeveneCenter::Mean, LeveneCenter::Median] {
            assert!(matches!(
                levene_test_with_center(&[&c1, &c2], 0.05, center),
                Err(TestError::ZeroVariance(_))
            ));
        }
    }
}

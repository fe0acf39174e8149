//! One-way analysis of variance.

use tracing::{debug, instrument};

use crate::config::{check_alpha, MAX_GROUPS, MIN_GROUPS};
use crate::critical::Distribution;
use crate::error::{check_sample, Result, TestError};
use crate::verdict::{Tail, Verdict};

/// Result of one-way ANOVA.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaResult {
    /// F = MS_between / MS_within.
    pub f_statistic: f64,
    /// k − 1.
    pub df_between: usize,
    /// N − k.
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ms_between: f64,
    pub ms_within: f64,
    pub group_means: Vec<f64>,
    pub grand_mean: f64,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Sums-of-squares decomposition shared by ANOVA and Levene.
#[derive(Debug, Clone)]
pub(crate) struct Decomposition {
    pub ss_between: f64,
    pub ss_within: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ms_between: f64,
    pub ms_within: f64,
    pub f_statistic: f64,
    pub group_means: Vec<f64>,
    pub grand_mean: f64,
}

impl Decomposition {
    pub fn compute(groups: &[&[f64]]) -> Result<Self> {
        let k = groups.len();
        let total_n: usize = groups.iter().map(|g| g.len()).sum();
        if total_n <= k {
            return Err(TestError::InsufficientData {
                test: "one-way ANOVA",
                required: k + 1,
                actual: total_n,
            });
        }

        let grand_sum: f64 = groups.iter().flat_map(|g| g.iter()).sum();
        let grand_mean = grand_sum / total_n as f64;
        let group_means: Vec<f64> = groups
            .iter()
            .map(|g| g.iter().sum::<f64>() / g.len() as f64)
            .collect();

        let ss_between: f64 = groups
            .iter()
            .zip(group_means.iter())
            .map(|(g, &gm)| g.len() as f64 * (gm - grand_mean).powi(2))
            .sum();

        let ss_within: f64 = groups
            .iter()
            .zip(group_means.iter())
            .map(|(g, &gm)| g.iter().map(|&x| (x - gm).powi(2)).sum::<f64>())
            .sum();

        if groups.iter().all(|g| g.windows(2).all(|w| w[0] == w[1])) {
            return Err(TestError::ZeroVariance("every group is constant"));
        }

        let df_between = k - 1;
        let df_within = total_n - k;
        let ms_between = ss_between / df_between as f64;
        let ms_within = ss_within / df_within as f64;

        if ms_within <= 0.0 {
            return Err(TestError::ZeroVariance("every group is constant"));
        }

        Ok(Self {
            ss_between,
            ss_within,
            df_between,
            df_within,
            ms_between,
            ms_within,
            f_statistic: ms_between / ms_within,
            group_means,
            grand_mean,
        })
    }

    /// Upper-tail F(k−1, N−k) decision.
    pub fn verdict(&self, alpha: f64) -> Result<Verdict> {
        Verdict::decide(
            self.f_statistic,
            Distribution::FisherF {
                df1: self.df_between as f64,
                df2: self.df_within as f64,
            },
            Tail::Upper,
            alpha,
        )
    }
}

/// Validates a group set: 2–10 groups, each with at least 2 finite values.
pub(crate) fn check_groups(test: &'static str, groups: &[&[f64]]) -> Result<()> {
    if !(MIN_GROUPS..=MAX_GROUPS).contains(&groups.len()) {
        return Err(TestError::GroupCount {
            min: MIN_GROUPS,
            max: MAX_GROUPS,
            actual: groups.len(),
        });
    }
    for g in groups {
        check_sample(g)?;
        if g.len() < 2 {
            return Err(TestError::InsufficientData {
                test,
                required: 2,
                actual: g.len(),
            });
        }
    }
    Ok(())
}

/// One-way ANOVA: H₀: all group means are equal.
///
/// # Algorithm
///
/// SS_between = Σ nᵢ(x̄ᵢ − x̄)², SS_within = ΣᵢΣⱼ (xᵢⱼ − x̄ᵢ)²,
/// F = [SS_between/(k−1)] / [SS_within/(N−k)], rejected when F exceeds the
/// upper-tail F(k−1, N−k) critical value.
///
/// # Errors
///
/// - Group count outside 2–10, a group with fewer than 2 observations,
///   non-finite values, invalid α.
/// - [`TestError::ZeroVariance`] when every group is constant.
///
/// # References
///
/// Fisher (1925). "Statistical Methods for Research Workers".
///
/// # Examples
///
/// ```
/// use u_inference::testing::one_way_anova;
///
/// let group1 = [5.0, 6.0, 7.0, 5.5, 6.5];
/// let group2 = [8.0, 9.0, 8.5, 9.5, 8.0];
/// let group3 = [4.0, 3.0, 3.5, 4.5, 4.0];
/// let r = one_way_anova(&[&group1, &group2, &group3], 0.05).unwrap();
/// assert!(r.verdict.reject);
/// ```
#[instrument(skip_all, fields(k = groups.len()))]
pub fn one_way_anova(groups: &[&[f64]], alpha: f64) -> Result<AnovaResult> {
    let alpha = check_alpha(alpha)?;
    check_groups("one-way ANOVA", groups)?;

    let d = Decomposition::compute(groups)?;
    let verdict = d.verdict(alpha)?;
    debug!(f = d.f_statistic, reject = verdict.reject, "anova");

    let conclusion = verdict.conclude(
        "F",
        "At least one group mean differs from the others.",
        "No significant difference between the group means can be concluded.",
    );

    Ok(AnovaResult {
        f_statistic: d.f_statistic,
        df_between: d.df_between,
        df_within: d.df_within,
        ss_between: d.ss_between,
        ss_within: d.ss_within,
        ms_between: d.ms_between,
        ms_within: d.ms_within,
        group_means: d.group_means,
        grand_mean: d.grand_mean,
        verdict,
        conclusion,
    })
}

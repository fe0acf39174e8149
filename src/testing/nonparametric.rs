//! Rank-based two-sample tests: Mann-Whitney U and Wilcoxon signed-rank.

use tracing::{debug, instrument};

use crate::config::check_alpha;
use crate::critical::Distribution;
use crate::error::{check_paired, check_sample, Result, TestError};
use crate::rank::{pooled_ranks, signed_ranks, SignedRank};
use crate::verdict::{Tail, Verdict};

// ---------------------------------------------------------------------------
// Mann-Whitney U
// ---------------------------------------------------------------------------

/// Result of the Mann-Whitney U test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MannWhitneyResult {
    pub n1: usize,
    pub n2: usize,
    /// Rank sum of the first sample in the pooled ranking.
    pub w1: f64,
    /// Rank sum of the second sample.
    pub w2: f64,
    pub u1: f64,
    pub u2: f64,
    /// min(U₁, U₂).
    pub u: f64,
    /// n₁n₂/2.
    pub mu: f64,
    /// √(n₁n₂(n₁+n₂+1)/12), without tie correction.
    pub sigma: f64,
    pub z: f64,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Mann-Whitney U test: H₀: both samples come from the same distribution.
///
/// # Algorithm
///
/// 1. Pool both samples and assign midranks.
/// 2. W₁, W₂ = rank sums; U₁ = W₁ − n₁(n₁+1)/2, U₂ = W₂ − n₂(n₂+1)/2.
/// 3. U = min(U₁, U₂), Z = (U − n₁n₂/2) / √(n₁n₂(n₁+n₂+1)/12).
/// 4. Compare |Z| with the two-tailed normal critical value.
///
/// No continuity or tie correction is applied to σ.
///
/// # Errors
///
/// Empty or non-finite samples, invalid α.
///
/// # References
///
/// Mann & Whitney (1947). "On a test of whether one of two random
/// variables is stochastically larger than the other". Annals of
/// Mathematical Statistics, 18(1), 50–60.
///
/// # Examples
///
/// ```
/// use u_inference::testing::mann_whitney_u_test;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [6.0, 7.0, 8.0, 9.0, 10.0];
/// let r = mann_whitney_u_test(&a, &b, 0.05).unwrap();
/// assert_eq!(r.u, 0.0);
/// assert!(r.verdict.reject);
/// ```
#[instrument(skip_all, fields(n1 = a.len(), n2 = b.len()))]
pub fn mann_whitney_u_test(a: &[f64], b: &[f64], alpha: f64) -> Result<MannWhitneyResult> {
    let alpha = check_alpha(alpha)?;
    check_sample(a)?;
    check_sample(b)?;

    let n1 = a.len();
    let n2 = b.len();
    let n1f = n1 as f64;
    let n2f = n2 as f64;

    let ranked = pooled_ranks(&[a, b])?;
    let (w1, w2) = ranked.iter().fold((0.0, 0.0), |(w1, w2), obs| {
        if obs.sample == 0 {
            (w1 + obs.rank, w2)
        } else {
            (w1, w2 + obs.rank)
        }
    });

    let u1 = w1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = w2 - n2f * (n2f + 1.0) / 2.0;
    let u = u1.min(u2);

    let mu = n1f * n2f / 2.0;
    let sigma = (n1f * n2f * (n1f + n2f + 1.0) / 12.0).sqrt();
    let z = (u - mu) / sigma;

    let verdict = Verdict::decide(z, Distribution::StandardNormal, Tail::TwoSided, alpha)?;
    debug!(u1, u2, z, reject = verdict.reject, "mann-whitney");

    let conclusion = verdict.conclude(
        "Z",
        "The two groups differ significantly.",
        "No significant difference between the two groups can be concluded.",
    );

    Ok(MannWhitneyResult {
        n1,
        n2,
        w1,
        w2,
        u1,
        u2,
        u,
        mu,
        sigma,
        z,
        verdict,
        conclusion,
    })
}

// ---------------------------------------------------------------------------
// Wilcoxon signed-rank
// ---------------------------------------------------------------------------

/// Result of the Wilcoxon signed-rank test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WilcoxonResult {
    /// Number of non-zero differences.
    pub n_eff: usize,
    /// Sum of ranks of positive differences (y > x).
    pub r_pos: f64,
    /// Sum of ranks of negative differences.
    pub r_neg: f64,
    /// min(R⁺, R⁻).
    pub w: f64,
    pub mu: f64,
    pub sigma: f64,
    pub z: f64,
    /// Ranked |d| in ascending order.
    pub ranks: Vec<SignedRank>,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Wilcoxon signed-rank test on paired samples: H₀: the median difference is 0.
///
/// # Algorithm
///
/// 1. dᵢ = yᵢ − xᵢ; zero differences are dropped (n_eff = remaining count).
/// 2. Midrank |dᵢ|; R⁺, R⁻ = rank sums by sign; W = min(R⁺, R⁻).
/// 3. μ = n(n+1)/4, σ = √(n(n+1)(2n+1)/24) with n = n_eff; Z = (W − μ)/σ.
/// 4. Compare |Z| with the two-tailed normal critical value.
///
/// # Errors
///
/// - Length mismatch, fewer than 2 pairs, non-finite values, invalid α.
/// - [`TestError::AllDifferencesZero`] when every pair is tied.
///
/// # References
///
/// Wilcoxon (1945). "Individual comparisons by ranking methods".
/// Biometrics Bulletin, 1(6), 80–83.
///
/// # Examples
///
/// ```
/// use u_inference::testing::wilcoxon_signed_rank_test;
///
/// let before = [5.0, 6.0, 7.0, 8.0, 9.0];
/// let after  = [6.0, 7.5, 8.0, 9.5, 11.0];
/// let r = wilcoxon_signed_rank_test(&before, &after, 0.05).unwrap();
/// assert_eq!(r.r_neg, 0.0);
/// assert_eq!(r.r_pos, 15.0);
/// ```
#[instrument(skip_all, fields(n = x.len()))]
pub fn wilcoxon_signed_rank_test(x: &[f64], y: &[f64], alpha: f64) -> Result<WilcoxonResult> {
    let alpha = check_alpha(alpha)?;
    check_paired("Wilcoxon signed-rank", x, y, 2)?;

    let diffs: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(&a, &b)| b - a)
        .filter(|&d| d != 0.0)
        .collect();
    if diffs.is_empty() {
        return Err(TestError::AllDifferencesZero);
    }

    let ranks = signed_ranks(&diffs)?;
    let (r_pos, r_neg) = ranks.iter().fold((0.0, 0.0), |(pos, neg), s| {
        if s.positive {
            (pos + s.rank, neg)
        } else {
            (pos, neg + s.rank)
        }
    });
    let w = r_pos.min(r_neg);

    let n_eff = ranks.len();
    let nf = n_eff as f64;
    let mu = nf * (nf + 1.0) / 4.0;
    let sigma = (nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0).sqrt();
    let z = (w - mu) / sigma;

    let verdict = Verdict::decide(z, Distribution::StandardNormal, Tail::TwoSided, alpha)?;
    debug!(n_eff, r_pos, r_neg, z, reject = verdict.reject, "wilcoxon");

    let conclusion = verdict.conclude(
        "Z",
        "The paired samples differ significantly.",
        "No significant difference between the paired samples is detected.",
    );

    Ok(WilcoxonResult {
        n_eff,
        r_pos,
        r_neg,
        w,
        mu,
        sigma,
        z,
        ranks,
        verdict,
        conclusion,
    })
}

//! Correlation tests.
//!
//! Kendall's simplified tau, Pearson's product-moment correlation and
//! Spearman's rank correlation, each tested for H₀: no association.
//!
//! # Examples
//!
//! ```
//! use u_inference::correlation::{kendall_tau, pearson, spearman};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//!
//! let p = pearson(&x, &y, 0.05).unwrap();
//! assert!(p.r > 0.7);
//!
//! let k = kendall_tau(&x, &y, 0.05).unwrap();
//! assert!(k.tau > 0.5);
//!
//! let s = spearman(&x, &y, 0.05).unwrap();
//! assert!(s.rho > 0.6);
//! ```

use statrs::statistics::Statistics;
use tracing::{debug, instrument, warn};

use crate::config::{check_alpha, CriticalValuePolicy, LEGACY_Z_CRITICAL, SPEARMAN_MIN_N_FOR_NORMAL};
use crate::critical::Distribution;
use crate::error::{check_paired, Result, TestError};
use crate::rank::midranks;
use crate::verdict::{Tail, Verdict};

// Two-tailed normal decision for the z-approximations, honoring the policy.
fn normal_verdict(z: f64, alpha: f64, policy: CriticalValuePolicy) -> Result<Verdict> {
    match policy {
        CriticalValuePolicy::Lookup => {
            Verdict::decide(z, Distribution::StandardNormal, Tail::TwoSided, alpha)
        }
        CriticalValuePolicy::LegacyFixed => {
            debug!(critical = LEGACY_Z_CRITICAL, "using fixed critical value");
            Verdict::against(
                z,
                LEGACY_Z_CRITICAL,
                Distribution::StandardNormal,
                Tail::TwoSided,
                alpha,
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Kendall
// ---------------------------------------------------------------------------

/// Result of Kendall's simplified tau test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KendallResult {
    /// τ = (C − D) / (C + D), 0 when no pair is concordant or discordant.
    pub tau: f64,
    pub concordant: usize,
    pub discordant: usize,
    pub n: usize,
    /// Var(τ) under H₀.
    pub variance: f64,
    /// Z = τ / √Var(τ).
    pub z: f64,
    pub policy: CriticalValuePolicy,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Kendall's simplified tau with the critical value looked up at α.
///
/// See [`kendall_tau_with_policy`].
pub fn kendall_tau(x: &[f64], y: &[f64], alpha: f64) -> Result<KendallResult> {
    kendall_tau_with_policy(x, y, alpha, CriticalValuePolicy::default())
}

/// Kendall's simplified tau: H₀: x and y are not associated.
///
/// # Algorithm
///
/// Each pair i < j is concordant when (xᵢ−xⱼ)(yᵢ−yⱼ) > 0, discordant when it
/// is < 0 and ignored otherwise. τ = (C−D)/(C+D), Var(τ) = 2(2n+5)/(9n(n−1)),
/// Z = τ/√Var(τ) compared with a two-tailed normal critical value.
///
/// Ties get no correction; a pair tied in either variable simply does not
/// count.
///
/// # Errors
///
/// Length mismatch, fewer than 2 pairs, non-finite values or invalid α.
///
/// # Examples
///
/// ```
/// use u_inference::correlation::kendall_tau_with_policy;
/// use u_inference::config::CriticalValuePolicy;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// let r = kendall_tau_with_policy(&x, &y, 0.05, CriticalValuePolicy::LegacyFixed).unwrap();
/// assert_eq!(r.concordant, 10);
/// assert_eq!(r.verdict.critical_value, 1.96);
/// ```
#[instrument(skip_all, fields(n = x.len(), policy = ?policy))]
pub fn kendall_tau_with_policy(
    x: &[f64],
    y: &[f64],
    alpha: f64,
    policy: CriticalValuePolicy,
) -> Result<KendallResult> {
    let alpha = check_alpha(alpha)?;
    check_paired("Kendall's tau", x, y, 2)?;
    let n = x.len();

    let mut concordant = 0usize;
    let mut discordant = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let product = (x[i] - x[j]) * (y[i] - y[j]);
            if product > 0.0 {
                concordant += 1;
            } else if product < 0.0 {
                discordant += 1;
            }
        }
    }

    let total = concordant + discordant;
    let tau = if total == 0 {
        0.0
    } else {
        (concordant as f64 - discordant as f64) / total as f64
    };

    let nf = n as f64;
    let variance = 2.0 * (2.0 * nf + 5.0) / (9.0 * nf * (nf - 1.0));
    let z = tau / variance.sqrt();
    let verdict = normal_verdict(z, alpha, policy)?;

    debug!(tau, concordant, discordant, z, reject = verdict.reject, "kendall tau");

    let conclusion = verdict.conclude(
        "Z",
        "There is a significant association between the two variables.",
        "No significant association between the two variables can be concluded.",
    );

    Ok(KendallResult {
        tau,
        concordant,
        discordant,
        n,
        variance,
        z,
        policy,
        verdict,
        conclusion,
    })
}

// ---------------------------------------------------------------------------
// Pearson
// ---------------------------------------------------------------------------

/// Result of the Pearson correlation t-test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PearsonResult {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// t = r√(n−2) / √(1−r²).
    pub t: f64,
    /// n − 2.
    pub df: usize,
    pub x_mean: f64,
    pub y_mean: f64,
    pub n: usize,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Pearson correlation test: H₀: ρ = 0.
///
/// # Algorithm
///
/// r = Σ(x−x̄)(y−ȳ) / (√Σ(x−x̄)² · √Σ(y−ȳ)²), then
/// t = r√(n−2)/√(1−r²) against a two-tailed Student-t(n−2).
///
/// # Errors
///
/// - Length mismatch, fewer than 3 pairs, non-finite values, invalid α.
/// - [`TestError::ZeroVariance`] when either sample is constant.
/// - [`TestError::PerfectCorrelation`] when |r| = 1, where t is undefined.
/// - [`TestError::NonFiniteStatistic`] when the sums of squares overflow.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
///
/// # Examples
///
/// ```
/// use u_inference::correlation::pearson;
/// use u_inference::TestError;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// assert!(matches!(pearson(&x, &y, 0.05), Err(TestError::PerfectCorrelation { .. })));
/// ```
#[instrument(skip_all, fields(n = x.len()))]
pub fn pearson(x: &[f64], y: &[f64], alpha: f64) -> Result<PearsonResult> {
    let alpha = check_alpha(alpha)?;
    check_paired("Pearson correlation", x, y, 3)?;
    let n = x.len();

    let x_mean = x.iter().mean();
    let y_mean = y.iter().mean();

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if !(sxx.is_finite() && syy.is_finite() && sxy.is_finite()) {
        return Err(TestError::NonFiniteStatistic("Pearson sum of squares"));
    }
    if sxx <= 0.0 {
        return Err(TestError::ZeroVariance("x is constant"));
    }
    if syy <= 0.0 {
        return Err(TestError::ZeroVariance("y is constant"));
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    let one_minus_r2 = 1.0 - r * r;
    if one_minus_r2 <= 1e-12 {
        warn!(r, "perfect linear correlation");
        return Err(TestError::PerfectCorrelation { r: r.signum() });
    }

    let df = n - 2;
    let t = r * (df as f64).sqrt() / one_minus_r2.sqrt();
    let verdict = Verdict::decide(
        t,
        Distribution::StudentT { df: df as f64 },
        Tail::TwoSided,
        alpha,
    )?;

    debug!(r, t, df, reject = verdict.reject, "pearson");

    let conclusion = format!(
        "{} (df = {df})",
        verdict.conclude(
            "t",
            "There is a significant linear correlation between the two variables.",
            "No significant linear correlation can be concluded.",
        )
    );

    Ok(PearsonResult {
        r,
        t,
        df,
        x_mean,
        y_mean,
        n,
        verdict,
        conclusion,
    })
}

// ---------------------------------------------------------------------------
// Spearman
// ---------------------------------------------------------------------------

/// How Spearman's ρ was tested.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpearmanApproximation {
    /// n > 10: z = ρ√(n−1) against a two-tailed normal critical value.
    Normal { z: f64, verdict: Verdict },
    /// n ≤ 10: the normal approximation is not interpretable.
    NotApplicable { n: usize },
}

/// Result of Spearman's rank correlation test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpearmanResult {
    /// ρ = 1 − 6Σd² / (n(n²−1)).
    pub rho: f64,
    pub ranks_x: Vec<f64>,
    pub ranks_y: Vec<f64>,
    /// (rank_xᵢ − rank_yᵢ)² per pair.
    pub d_squared: Vec<f64>,
    pub sum_d_squared: f64,
    pub n: usize,
    pub policy: CriticalValuePolicy,
    pub approximation: SpearmanApproximation,
    pub conclusion: String,
}

impl SpearmanResult {
    /// The decision, when the sample was large enough to make one.
    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.approximation {
            SpearmanApproximation::Normal { verdict, .. } => Some(verdict),
            SpearmanApproximation::NotApplicable { .. } => None,
        }
    }

    /// z statistic, when computed.
    pub fn z(&self) -> Option<f64> {
        match self.approximation {
            SpearmanApproximation::Normal { z, .. } => Some(z),
            SpearmanApproximation::NotApplicable { .. } => None,
        }
    }
}

/// Spearman's rank correlation with the critical value looked up at α.
///
/// See [`spearman_with_policy`].
pub fn spearman(x: &[f64], y: &[f64], alpha: f64) -> Result<SpearmanResult> {
    spearman_with_policy(x, y, alpha, CriticalValuePolicy::default())
}

/// Spearman's rank correlation: H₀: no monotone association.
///
/// # Algorithm
///
/// x and y are ranked independently (midranks for ties),
/// ρ = 1 − 6Σd²/(n(n²−1)). For n > 10, z = ρ√(n−1) is compared with a
/// two-tailed normal critical value; for n ≤ 10 the result reports
/// [`SpearmanApproximation::NotApplicable`] instead of a decision.
///
/// # Errors
///
/// Length mismatch, fewer than 2 pairs, non-finite values or invalid α.
///
/// # References
///
/// Spearman (1904). "The proof and measurement of association between two
/// things". The American Journal of Psychology, 15(1), 72–101.
///
/// # Examples
///
/// ```
/// use u_inference::correlation::{spearman, SpearmanApproximation};
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [5.0, 6.0, 7.0, 8.0, 7.0];
/// let r = spearman(&x, &y, 0.05).unwrap();
/// assert!(r.rho > 0.5);
/// assert_eq!(r.approximation, SpearmanApproximation::NotApplicable { n: 5 });
/// ```
#[instrument(skip_all, fields(n = x.len(), policy = ?policy))]
pub fn spearman_with_policy(
    x: &[f64],
    y: &[f64],
    alpha: f64,
    policy: CriticalValuePolicy,
) -> Result<SpearmanResult> {
    let alpha = check_alpha(alpha)?;
    check_paired("Spearman correlation", x, y, 2)?;
    let n = x.len();

    let ranks_x = midranks(x)?;
    let ranks_y = midranks(y)?;
    let d_squared: Vec<f64> = ranks_x
        .iter()
        .zip(ranks_y.iter())
        .map(|(rx, ry)| (rx - ry).powi(2))
        .collect();
    let sum_d_squared: f64 = d_squared.iter().sum();

    let nf = n as f64;
    let rho = 1.0 - 6.0 * sum_d_squared / (nf * (nf * nf - 1.0));

    let (approximation, conclusion) = if n > SPEARMAN_MIN_N_FOR_NORMAL {
        let z = rho * (nf - 1.0).sqrt();
        let verdict = normal_verdict(z, alpha, policy)?;
        debug!(rho, z, reject = verdict.reject, "spearman");
        let conclusion = verdict.conclude(
            "Z",
            "There is a significant monotone correlation between the two variables.",
            "No significant monotone correlation can be concluded.",
        );
        (SpearmanApproximation::Normal { z, verdict }, conclusion)
    } else {
        debug!(rho, n, "spearman sample too small for normal approximation");
        let conclusion = format!(
            "Sample size n = {n} is too small for the normal approximation; \
             the test is not interpretable for n ≤ {SPEARMAN_MIN_N_FOR_NORMAL}."
        );
        (SpearmanApproximation::NotApplicable { n }, conclusion)
    };

    Ok(SpearmanResult {
        rho,
        ranks_x,
        ranks_y,
        d_squared,
        sum_d_squared,
        n,
        policy,
        approximation,
        conclusion,
    })
}

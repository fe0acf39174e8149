//! Per-call settings and constants.
//!
//! There is no ambient configuration: every knob is passed explicitly to the
//! test that uses it.

use crate::error::{Result, TestError};

/// Conventional significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Two-tailed normal critical value at α = 0.05, used by
/// [`CriticalValuePolicy::LegacyFixed`].
pub const LEGACY_Z_CRITICAL: f64 = 1.96;

/// Spearman's normal approximation is only reported for n strictly above this.
pub const SPEARMAN_MIN_N_FOR_NORMAL: usize = 10;

/// Smallest group count accepted by ANOVA-family tests.
pub const MIN_GROUPS: usize = 2;

/// Largest group count accepted by ANOVA-family tests.
pub const MAX_GROUPS: usize = 10;

/// How the normal-approximation tests (Kendall, Spearman) obtain their
/// critical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriticalValuePolicy {
    /// Two-tailed standard normal quantile at the caller's α.
    #[default]
    Lookup,
    /// Always ±1.96 regardless of α. α still appears in the conclusion text.
    LegacyFixed,
}

/// Center used by Levene's deviation transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeveneCenter {
    /// |x − group mean| (classic Levene).
    #[default]
    Mean,
    /// |x − group median| (Brown–Forsythe).
    Median,
}

impl LeveneCenter {
    /// Lower-case name used in log fields.
    pub fn label(self) -> &'static str {
        match self {
            LeveneCenter::Mean => "mean",
            LeveneCenter::Median => "median",
        }
    }
}

/// Validates a significance level.
///
/// # Examples
///
/// ```
/// use u_inference::config::check_alpha;
///
/// assert!(check_alpha(0.05).is_ok());
/// assert!(check_alpha(0.0).is_err());
/// assert!(check_alpha(1.0).is_err());
/// ```
pub fn check_alpha(alpha: f64) -> Result<f64> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(TestError::InvalidAlpha(alpha))
    }
}
